/*
 * Copyright © 2024, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! The 32-bit type token used to reject a non-matching [`crate::message::Message`] in O(1),
//! before the slower [`crate::try_match`] walk runs.
//!
//! A token is a fold of the ordered sequence of element [`TypeId`]s. The same fold is
//! used both when a [`crate::pattern::Pattern`] is built (static, compile-time known
//! types) and when a [`crate::message::Message`] is constructed (runtime types), so a
//! message and a pattern describing the same type sequence always produce equal tokens.
//!
//! `TypeId` is stable only for the lifetime of one process - that is exactly the
//! invariant this crate needs, since patterns and messages are both built and consumed
//! within a single run.

use std::any::TypeId;
use std::hash::{Hash, Hasher};
use std::collections::hash_map::DefaultHasher;

/// sentinel folded in for the wildcard slot; arbitrary but fixed so it never collides
/// with a real `TypeId` hash by construction (it is folded in *after* the type hash,
/// not instead of it, so an accidental numeric collision would still be harmless -
/// wildcard patterns never use the token for equality filtering anyway, see `Pattern::has_wildcard`).
const WILDCARD_SENTINEL: u32 = 0xDEAD_BEEF;

/// avalanche seed; an odd golden-ratio constant, the same family of constant used by
/// `rustc-hash`/`FxHash` to spread low-entropy inputs (small integers, pointer-derived
/// hashes) across the full 32-bit range.
const SEED: u32 = 0x9E37_79B9;

#[inline]
fn fold_one(type_id: TypeId) -> u32 {
    let mut hasher = DefaultHasher::new();
    type_id.hash(&mut hasher);
    let h = hasher.finish();
    (h as u32) ^ ((h >> 32) as u32)
}

/// computes the type token for an ordered sequence of concrete (non-wildcard) type ids.
/// `arity` is the *full* element count of the message (or, for a pattern, the count
/// including any trailing wildcard) - it is folded in separately so that e.g. `(i32)`
/// and `(i32, i32)` with the second element's hash happening to rotate back to zero
/// cannot produce the same token purely from `ids`.
pub fn fold_token<I: IntoIterator<Item = TypeId>>(ids: I, arity: usize) -> u32 {
    let mut acc = SEED;
    let mut n: u32 = 0;
    for id in ids {
        acc = acc.rotate_left(5) ^ fold_one(id);
        n += 1;
    }
    acc ^ (arity as u32).wrapping_mul(0x2545_F491) ^ n
}

/// folds a type token for a pattern that ends in a wildcard. The wildcard sentinel is
/// mixed in like any other slot, purely for `Debug`/diagnostic purposes - callers must
/// not rely on this value for equality filtering (see `Pattern::has_wildcard`).
pub fn fold_token_with_wildcard<I: IntoIterator<Item = TypeId>>(concrete_ids: I, arity: usize) -> u32 {
    let base = fold_token(concrete_ids, arity);
    base.rotate_left(5) ^ WILDCARD_SENTINEL
}

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

//! [`Pattern`] is the compile-time-known description of a sequence of expected slot
//! types that a [`crate::match_case::MatchCase`] matches a [`crate::message::Message`]
//! against. It replaces the original's type-level `type_list`/`int_list` machinery with
//! a plain runtime-tagged `Vec<SlotSpec>`, per the "heavy compile-time metaprogramming"
//! design note.

use std::any::TypeId;

use crate::errors::{DispatchError, Result};
use crate::token::{fold_token, fold_token_with_wildcard};

/// one slot in a [`Pattern`]: either a concrete expected type, or the (at most one,
/// trailing-only) wildcard that absorbs the rest of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSpec {
    Exact(TypeId),
    Wildcard,
}

#[derive(Debug, Clone)]
pub struct Pattern {
    slots: Vec<SlotSpec>,
    token: u32,
    has_wildcard: bool,
    filtered_len: usize,
}

impl Pattern {
    pub fn builder() -> PatternBuilder {
        PatternBuilder { slots: Vec::new() }
    }

    /// the lone-wildcard catch-all pattern: matches any message regardless of shape.
    pub fn catch_all() -> Self {
        Pattern::builder().wildcard().build().expect("a single trailing wildcard is always valid")
    }

    pub fn slots(&self) -> &[SlotSpec] { &self.slots }

    #[inline]
    pub fn has_wildcard(&self) -> bool { self.has_wildcard }

    /// number of non-wildcard slots.
    #[inline]
    pub fn filtered_len(&self) -> usize { self.filtered_len }

    #[inline]
    pub fn token(&self) -> u32 { self.token }
}

/// fluent builder for [`Pattern`], validating the "at most one wildcard, trailing only"
/// invariant at `build()` time rather than on every slot push.
#[derive(Debug, Default)]
pub struct PatternBuilder {
    slots: Vec<SlotSpec>,
}

impl PatternBuilder {
    pub fn new() -> Self { PatternBuilder { slots: Vec::new() } }

    pub fn slot<T: 'static>(mut self) -> Self {
        self.slots.push(SlotSpec::Exact(TypeId::of::<T>()));
        self
    }

    pub fn wildcard(mut self) -> Self {
        self.slots.push(SlotSpec::Wildcard);
        self
    }

    pub fn build(self) -> Result<Pattern> {
        let wildcard_positions: Vec<usize> = self.slots.iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, SlotSpec::Wildcard))
            .map(|(i, _)| i)
            .collect();

        if wildcard_positions.len() > 1 {
            return Err(DispatchError::MultipleWildcards);
        }
        if let Some(&pos) = wildcard_positions.first() {
            if pos != self.slots.len() - 1 {
                return Err(DispatchError::WildcardNotTrailing);
            }
        }

        let has_wildcard = !wildcard_positions.is_empty();
        let concrete_ids: Vec<TypeId> = self.slots.iter()
            .filter_map(|s| match s { SlotSpec::Exact(id) => Some(*id), SlotSpec::Wildcard => None })
            .collect();
        let filtered_len = concrete_ids.len();

        let token = if has_wildcard {
            fold_token_with_wildcard(concrete_ids, self.slots.len())
        } else {
            fold_token(concrete_ids, self.slots.len())
        };

        Ok(Pattern { slots: self.slots, token, has_wildcard, filtered_len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catch_all_has_wildcard_and_zero_filtered_len() {
        let p = Pattern::catch_all();
        assert!(p.has_wildcard());
        assert_eq!(p.filtered_len(), 0);
    }

    #[test]
    fn rejects_two_wildcards() {
        let err = Pattern::builder().wildcard().wildcard().build().unwrap_err();
        assert!(matches!(err, DispatchError::MultipleWildcards));
    }

    #[test]
    fn rejects_leading_wildcard() {
        let err = Pattern::builder().wildcard().slot::<i32>().build().unwrap_err();
        assert!(matches!(err, DispatchError::WildcardNotTrailing));
    }

    #[test]
    fn exact_pattern_token_matches_message_with_same_types() {
        use crate::message;
        let p = Pattern::builder().slot::<i32>().slot::<&str>().build().unwrap();
        let m = message!(1i32, "pong");
        assert_eq!(p.token(), m.type_token());
    }

    #[test]
    fn trailing_wildcard_pattern_builds_ok() {
        let p = Pattern::builder().slot::<i32>().wildcard().build().unwrap();
        assert!(p.has_wildcard());
        assert_eq!(p.filtered_len(), 1);
    }
}

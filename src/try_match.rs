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

//! Aligns a [`crate::pattern::Pattern`] against a [`crate::message::Message`], producing
//! borrows into the message's payload. This is the `TryMatch` step of §4.2: it runs
//! *after* the O(1) type-token rejection in [`crate::match_case::MatchCase::invoke`] and
//! is itself side-effect free on the message - it never clones it (though [`try_match_mut`]
//! requires the caller to have already detached it, per §5's ordering requirement).

use crate::message::{AnyValue, Message};
use crate::pattern::{Pattern, SlotSpec};

/// checks the arity/wildcard contract and the per-slot type identities, without
/// producing any borrows yet - shared by [`try_match`] and [`try_match_mut`].
fn slots_align(msg: &Message, pattern: &Pattern) -> bool {
    let n = msg.arity();
    let k = pattern.filtered_len();
    let w = pattern.has_wildcard();

    if !w && n != k { return false; }
    if w && n < k { return false; }

    for (i, slot) in pattern.slots().iter().take(k).enumerate() {
        let SlotSpec::Exact(expected) = slot else {
            unreachable!("wildcard can only be the trailing slot, excluded by take(k)");
        };
        if msg.type_of(i) != *expected {
            return false;
        }
    }
    true
}

/// borrows into a message's payload, bound to the non-wildcard slots of a pattern, in
/// slot order. Valid only for the lifetime of the `Message` it was produced from.
pub struct MatchView<'m> {
    refs: Vec<&'m dyn AnyValue>,
}

impl<'m> MatchView<'m> {
    pub fn len(&self) -> usize { self.refs.len() }
    pub fn is_empty(&self) -> bool { self.refs.is_empty() }
    pub fn get(&self, i: usize) -> &'m dyn AnyValue { self.refs[i] }
    pub fn iter(&self) -> impl Iterator<Item = &'m dyn AnyValue> + '_ {
        self.refs.iter().copied()
    }
}

/// attempts to align `pattern`'s slots against `msg`'s elements left-to-right. Returns
/// `None` ("no match") rather than an error - a mismatch is an ordinary, expected
/// outcome on the dispatch hot path, not a fault (see §7).
pub fn try_match<'m>(msg: &'m Message, pattern: &Pattern) -> Option<MatchView<'m>> {
    if !slots_align(msg, pattern) {
        return None;
    }

    let k = pattern.filtered_len();
    let mut refs = Vec::with_capacity(k);
    for i in 0..k {
        refs.push(msg.element_at(i));
    }
    Some(MatchView { refs })
}

/// mutable borrows into a message's payload, bound to the non-wildcard slots of a
/// pattern, in slot order - the manipulator-case counterpart to [`MatchView`]. Valid
/// only for the lifetime of the `Message` it was produced from.
pub struct MatchViewMut<'m> {
    refs: Vec<&'m mut dyn AnyValue>,
}

impl<'m> MatchViewMut<'m> {
    pub fn len(&self) -> usize { self.refs.len() }
    pub fn is_empty(&self) -> bool { self.refs.is_empty() }

    /// consumes the view, handing back its mutable borrows in slot order. Each is
    /// independently `'m`-lived since they were split out of disjoint positions in the
    /// message's own storage.
    pub fn into_vec(self) -> Vec<&'m mut dyn AnyValue> { self.refs }
}

/// the manipulator-case counterpart to [`try_match`]: first detaches `msg` so its
/// storage is uniquely owned (§5's ordering requirement - detach happens *before* any
/// borrow produced here is handed out), then aligns `pattern`'s non-wildcard slots
/// against the now-exclusively-owned payload and returns mutable borrows into it.
pub fn try_match_mut<'m>(msg: &'m mut Message, pattern: &Pattern) -> Option<MatchViewMut<'m>> {
    if !slots_align(msg, pattern) {
        return None;
    }

    let k = pattern.filtered_len();
    let slots = msg.force_detach();
    let (head, _tail) = slots.split_at_mut(k);
    let refs = head.iter_mut().map(|b| b.as_mut()).collect();
    Some(MatchViewMut { refs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message;

    #[test]
    fn exact_arity_mismatch_misses() {
        let p = Pattern::builder().slot::<i32>().build().unwrap();
        let m = message!(1i32, "extra");
        assert!(try_match(&m, &p).is_none());
    }

    #[test]
    fn exact_type_mismatch_misses() {
        let p = Pattern::builder().slot::<i32>().build().unwrap();
        let m = message!("not an i32");
        assert!(try_match(&m, &p).is_none());
    }

    #[test]
    fn exact_match_produces_view_in_slot_order() {
        let p = Pattern::builder().slot::<i32>().slot::<&str>().build().unwrap();
        let m = message!(7i32, "pong");
        let view = try_match(&m, &p).expect("should match");
        assert_eq!(view.len(), 2);
        assert_eq!(view.get(0).downcast_ref::<i32>(), Some(&7));
        assert_eq!(view.get(1).downcast_ref::<&str>(), Some(&"pong"));
    }

    #[test]
    fn wildcard_absorbs_trailing_elements() {
        let p = Pattern::builder().slot::<i32>().wildcard().build().unwrap();
        let m = message!(1i32, "a", "b", "c");
        let view = try_match(&m, &p).expect("should match");
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn wildcard_requires_at_least_the_filtered_length() {
        let p = Pattern::builder().slot::<i32>().slot::<&str>().wildcard().build().unwrap();
        let m = message!(1i32);
        assert!(try_match(&m, &p).is_none());
    }

    #[test]
    fn empty_message_matches_lone_wildcard() {
        let p = Pattern::catch_all();
        let m = Message::empty();
        let view = try_match(&m, &p).expect("should match");
        assert!(view.is_empty());
    }

    #[test]
    fn try_match_mut_detaches_and_yields_writable_slots() {
        let p = Pattern::builder().slot::<i32>().build().unwrap();
        let mut shared = message!(10i32);
        let sharer = shared.clone();

        {
            let view = try_match_mut(&mut shared, &p).expect("should match");
            let mut refs = view.into_vec();
            *refs[0].downcast_mut::<i32>().unwrap() += 1;
        }

        assert_eq!(shared.element_ref::<i32>(0), Some(&11));
        assert_eq!(sharer.element_ref::<i32>(0), Some(&10));
    }

    #[test]
    fn try_match_mut_misses_on_type_mismatch_without_detaching() {
        let p = Pattern::builder().slot::<i32>().build().unwrap();
        let mut shared = message!("not an i32");
        let sharer = shared.clone();
        assert!(try_match_mut(&mut shared, &p).is_none());
        assert!(sharer.element_ref::<&str>(0).is_some());
    }
}

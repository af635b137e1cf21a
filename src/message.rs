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

//! `Message` is the opaque, heterogeneous, shared tuple of values that flows into
//! [`crate::behavior::Behavior::invoke`]. It is reference counted (`Arc`) so that
//! publishing the same message to several actors never clones it, and only upgrades to
//! exclusive ownership (`force_detach`) the moment a handler actually wants to mutate a
//! slot in place.

use std::any::{Any, TypeId};
use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::token::{fold_token, fold_token_with_wildcard};

/// object-safe supertrait every message element must implement. Implemented
/// automatically for any `T: Any + Clone + Send + Sync + Debug`; the `clone_boxed`
/// method is what makes `Message::force_detach`'s copy-on-write possible without the
/// `Message` itself knowing the concrete element types.
pub trait AnyValue: Any + Send + Sync + Debug {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clone_boxed(&self) -> Box<dyn AnyValue>;
}

impl<T: Any + Clone + Send + Sync + Debug> AnyValue for T {
    fn as_any(&self) -> &dyn Any { self }
    fn as_any_mut(&mut self) -> &mut dyn Any { self }
    fn clone_boxed(&self) -> Box<dyn AnyValue> { Box::new(self.clone()) }
}

impl dyn AnyValue {
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    #[inline]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}

impl Clone for Box<dyn AnyValue> {
    fn clone(&self) -> Self { self.as_ref().clone_boxed() }
}

/// a shared, heterogeneous, type-erased tuple with a cached [`crate::token::fold_token`] hash.
#[derive(Clone)]
pub struct Message {
    slots: Arc<Vec<Box<dyn AnyValue>>>,
    token: u32,
}

impl Message {
    pub fn empty() -> Self {
        Message { slots: Arc::new(Vec::new()), token: fold_token(std::iter::empty(), 0) }
    }

    pub fn from_values(values: Vec<Box<dyn AnyValue>>) -> Self {
        let ids = values.iter().map(|v| v.as_ref().type_id());
        let token = fold_token(ids, values.len());
        Message { slots: Arc::new(values), token }
    }

    /// same as [`Self::from_values`] but folds the wildcard sentinel in too - used only
    /// when constructing a *reply* message whose shape was produced by a wildcard-absorbing
    /// case; regular messages built by callers should use [`Self::from_values`].
    pub fn from_values_with_wildcard(values: Vec<Box<dyn AnyValue>>) -> Self {
        let ids = values.iter().map(|v| v.as_ref().type_id());
        let token = fold_token_with_wildcard(ids, values.len());
        Message { slots: Arc::new(values), token }
    }

    #[inline]
    pub fn arity(&self) -> usize { self.slots.len() }

    #[inline]
    pub fn type_token(&self) -> u32 { self.token }

    pub fn type_of(&self, i: usize) -> TypeId {
        self.slots[i].as_ref().type_id()
    }

    pub fn element_at(&self, i: usize) -> &dyn AnyValue {
        self.slots[i].as_ref()
    }

    pub fn element_ref<T: 'static>(&self, i: usize) -> Option<&T> {
        self.slots[i].as_ref().downcast_ref()
    }

    /// ensures the payload is uniquely owned, cloning the underlying `Vec` (and every
    /// element in it, via `AnyValue::clone_boxed`) iff another `Message` still shares it.
    /// A no-op - and therefore idempotent - when the strong count is already 1.
    pub fn force_detach(&mut self) -> &mut Vec<Box<dyn AnyValue>> {
        Arc::make_mut(&mut self.slots)
    }

    pub fn element_mut<T: 'static>(&mut self, i: usize) -> Option<&mut T> {
        self.force_detach()[i].as_mut().downcast_mut()
    }

    pub fn is_uniquely_owned(&self) -> bool {
        Arc::strong_count(&self.slots) == 1
    }
}

impl Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.slots.iter().map(|v| v.as_ref())).finish()
    }
}

/// builds a [`Message`] from a list of already-boxed, cloneable, debuggable values.
/// ```
/// # use actora_behavior::message;
/// let m = message!(7i32, "pong");
/// assert_eq!(m.arity(), 2);
/// ```
#[macro_export]
macro_rules! message {
    ( $( $v:expr ),* $(,)? ) => {
        $crate::message::Message::from_values(vec![ $( Box::new($v) as Box<dyn $crate::message::AnyValue> ),* ])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_has_zero_arity() {
        let m = Message::empty();
        assert_eq!(m.arity(), 0);
    }

    #[test]
    fn macro_builds_typed_elements() {
        let m = message!(7i32, "pong");
        assert_eq!(m.arity(), 2);
        assert_eq!(m.element_ref::<i32>(0), Some(&7));
        assert_eq!(m.element_ref::<&str>(1), Some(&"pong"));
    }

    #[test]
    fn identical_type_sequences_share_a_token() {
        let a = message!(1i32, "x");
        let b = message!(2i32, "y");
        assert_eq!(a.type_token(), b.type_token());
    }

    #[test]
    fn force_detach_is_idempotent_and_preserves_other_sharers() {
        let mut shared = message!(1i32);
        let sharer = shared.clone();
        assert!(!shared.is_uniquely_owned());

        shared.force_detach();
        assert!(shared.is_uniquely_owned());
        *shared.element_mut::<i32>(0).unwrap() += 1;

        assert_eq!(sharer.element_ref::<i32>(0), Some(&1));
        assert_eq!(shared.element_ref::<i32>(0), Some(&2));

        // already unique - force_detach must not clone again or change anything
        shared.force_detach();
        assert_eq!(shared.element_ref::<i32>(0), Some(&2));
    }
}

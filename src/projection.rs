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

//! Per-slot projections and guards, run after [`crate::try_match::try_match`] /
//! [`crate::try_match::try_match_mut`] succeed and before the handler is invoked (§4.3).

use crate::message::AnyValue;

/// a slot's raw, unprojected borrow: immutable for an ordinary case, mutable for a
/// manipulator case (§5). `apply` reads through either variant the same way; only
/// `Projection::Identity` preserves the mutability of a `RefMut` all the way to the
/// handler, since `Transform`/`Guard`/`GuardOnly` only ever need to read the value.
pub enum RawSlot<'m> {
    Ref(&'m dyn AnyValue),
    RefMut(&'m mut dyn AnyValue),
}

/// a forwarded argument: a raw immutable borrow, a raw mutable borrow (manipulator
/// cases only - the `Identity` projection never allocates for either), or a value
/// produced by a `Transform`/`Guard` projection.
pub enum ProjectedArg<'m> {
    Borrowed(&'m dyn AnyValue),
    BorrowedMut(&'m mut dyn AnyValue),
    Owned(Box<dyn AnyValue>),
}

impl<'m> ProjectedArg<'m> {
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            ProjectedArg::Borrowed(v) => v.downcast_ref(),
            ProjectedArg::BorrowedMut(v) => v.downcast_ref(),
            ProjectedArg::Owned(v) => v.as_ref().downcast_ref(),
        }
    }

    /// writable access to the underlying value - only ever `Some` for the `BorrowedMut`
    /// forwarded to a manipulator case's handler (§4.2, §5).
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        match self {
            ProjectedArg::BorrowedMut(v) => v.downcast_mut(),
            ProjectedArg::Borrowed(_) | ProjectedArg::Owned(_) => None,
        }
    }
}

/// one slot's projection. `GuardOnly` is the "consumed-by-guard-only" case from §4.3:
/// it can still reject the match, but its value is never forwarded to the handler.
pub enum Projection {
    Identity,
    Transform(Box<dyn Fn(&dyn AnyValue) -> Box<dyn AnyValue> + Send + Sync>),
    Guard(Box<dyn Fn(&dyn AnyValue) -> Option<Box<dyn AnyValue>> + Send + Sync>),
    GuardOnly(Box<dyn Fn(&dyn AnyValue) -> bool + Send + Sync>),
}

impl Projection {
    pub fn transform<F>(f: F) -> Self
        where F: Fn(&dyn AnyValue) -> Box<dyn AnyValue> + Send + Sync + 'static
    {
        Projection::Transform(Box::new(f))
    }

    pub fn guard<F>(f: F) -> Self
        where F: Fn(&dyn AnyValue) -> Option<Box<dyn AnyValue>> + Send + Sync + 'static
    {
        Projection::Guard(Box::new(f))
    }

    pub fn guard_only<F>(f: F) -> Self
        where F: Fn(&dyn AnyValue) -> bool + Send + Sync + 'static
    {
        Projection::GuardOnly(Box::new(f))
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Projection::Identity)
    }
}

/// what running a single projection against a raw slot value produced.
pub enum ProjectionOutcome<'m> {
    /// a guard rejected the value - the case misses, no handler call.
    Miss,
    /// the (possibly transformed) value is forwarded to the handler.
    Forward(ProjectedArg<'m>),
    /// a `GuardOnly` projection accepted the value but does not forward it.
    Consumed,
}

/// reborrows a `RawSlot` as a plain immutable `&dyn AnyValue` - all a `Transform`/
/// `Guard`/`GuardOnly` projection ever needs, even for a manipulator slot.
fn as_ref<'a, 'm>(raw: &'a RawSlot<'m>) -> &'a dyn AnyValue {
    match raw {
        RawSlot::Ref(r) => *r,
        RawSlot::RefMut(r) => &**r,
    }
}

pub fn apply<'m>(projection: &Projection, raw: RawSlot<'m>) -> ProjectionOutcome<'m> {
    match projection {
        Projection::Identity => match raw {
            RawSlot::Ref(r) => ProjectionOutcome::Forward(ProjectedArg::Borrowed(r)),
            RawSlot::RefMut(r) => ProjectionOutcome::Forward(ProjectedArg::BorrowedMut(r)),
        },
        Projection::Transform(f) => ProjectionOutcome::Forward(ProjectedArg::Owned(f(as_ref(&raw)))),
        Projection::Guard(g) => match g(as_ref(&raw)) {
            Some(y) => ProjectionOutcome::Forward(ProjectedArg::Owned(y)),
            None => ProjectionOutcome::Miss,
        },
        Projection::GuardOnly(g) => {
            if g(as_ref(&raw)) { ProjectionOutcome::Consumed } else { ProjectionOutcome::Miss }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_borrows_without_allocating() {
        let v: Box<dyn AnyValue> = Box::new(7i32);
        match apply(&Projection::Identity, RawSlot::Ref(v.as_ref())) {
            ProjectionOutcome::Forward(ProjectedArg::Borrowed(r)) => {
                assert_eq!(r.downcast_ref::<i32>(), Some(&7));
            }
            _ => panic!("expected a borrowed forward"),
        }
    }

    #[test]
    fn identity_on_a_mutable_slot_forwards_a_mutable_borrow() {
        let mut v: Box<dyn AnyValue> = Box::new(7i32);
        match apply(&Projection::Identity, RawSlot::RefMut(v.as_mut())) {
            ProjectionOutcome::Forward(mut arg) => {
                *arg.downcast_mut::<i32>().unwrap() += 1;
                assert_eq!(arg.downcast_ref::<i32>(), Some(&8));
            }
            _ => panic!("expected a mutably borrowed forward"),
        }
        assert_eq!(v.downcast_ref::<i32>(), Some(&8));
    }

    #[test]
    fn transform_produces_owned_value() {
        let v: Box<dyn AnyValue> = Box::new(7i32);
        let proj = Projection::transform(|x: &dyn AnyValue| {
            let n = *x.downcast_ref::<i32>().unwrap();
            Box::new(n * 2) as Box<dyn AnyValue>
        });
        match apply(&proj, RawSlot::Ref(v.as_ref())) {
            ProjectionOutcome::Forward(arg) => assert_eq!(arg.downcast_ref::<i32>(), Some(&14)),
            _ => panic!("expected a forward"),
        }
    }

    #[test]
    fn guard_none_misses() {
        let v: Box<dyn AnyValue> = Box::new(7i32);
        let proj = Projection::guard(|_x: &dyn AnyValue| None);
        assert!(matches!(apply(&proj, RawSlot::Ref(v.as_ref())), ProjectionOutcome::Miss));
    }

    #[test]
    fn guard_only_consumes_without_forwarding() {
        let v: Box<dyn AnyValue> = Box::new(7i32);
        let proj = Projection::guard_only(|x: &dyn AnyValue| *x.downcast_ref::<i32>().unwrap() > 0);
        assert!(matches!(apply(&proj, RawSlot::Ref(v.as_ref())), ProjectionOutcome::Consumed));
    }
}

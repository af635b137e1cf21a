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

//! [`MatchCase`]: one handler paired with a [`Pattern`] and per-slot projections/guards.
//! This is the C4 component - §4.4's `invoke` state machine
//! (`FilterByToken → TryMatch → RunProjections → RunHandler → Normalize`) lives here.

use trait_set::trait_set;

use crate::errors::{DispatchError, Result};
use crate::message::Message;
use crate::pattern::Pattern;
use crate::projection::{apply, Projection, ProjectedArg, ProjectionOutcome, RawSlot};
use crate::reply::{normalize, HandlerResult, Reply};
use crate::try_match::{try_match, try_match_mut};

trait_set! {
    /// the bound every `MatchCase` handler closure must satisfy. A named alias via the
    /// `trait-set` crate, since stable Rust has no `trait_alias` of its own yet. The
    /// slice is `&mut` uniformly - a non-manipulator handler never calls `downcast_mut`
    /// on its args, and `&mut [T]` coerces to `&[T]` at the `arg()` call site for free.
    pub trait CaseHandlerFn = Fn(&mut [ProjectedArg<'_>]) -> HandlerResult + Send + Sync;
}

/// pure performance classification of a case, computed once at build time (§4.4). Never
/// changes the *result* of `invoke`, only how much bookkeeping it does to get there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseShape {
    /// no wildcard, every projection is `Identity`: the forwarded arguments are exactly
    /// the matched borrows, in order. Skips the per-slot projection dispatch entirely.
    Trivial,
    /// a lone wildcard pattern (filtered length zero) - always matches, no detach/TryMatch
    /// cost beyond the wildcard itself. The hot path for an unhandled-message handler.
    CatchAll,
    /// everything else: a mix of transforms/guards, or a wildcard combined with leading
    /// exact slots.
    General,
}

pub type Handler = Box<dyn CaseHandlerFn>;

pub struct MatchCase {
    pattern: Pattern,
    projections: Vec<Projection>,
    handler: Handler,
    is_manipulator: bool,
    shape: CaseShape,
}

impl MatchCase {
    /// builds a case from an already-constructed pattern, one projection per non-wildcard
    /// slot, and a type-erased handler. `is_manipulator` must be `true` iff the handler
    /// takes a mutable reference to any forwarded slot (see §5, force_detach ordering);
    /// only a manipulator case's forwarded args can ever `downcast_mut` to something.
    pub fn new(
        pattern: Pattern,
        projections: Vec<Projection>,
        is_manipulator: bool,
        handler: impl CaseHandlerFn + 'static,
    ) -> Result<Self> {
        if projections.len() != pattern.filtered_len() {
            return Err(DispatchError::ArityMismatch {
                handler_arity: projections.len(),
                slot_count: pattern.filtered_len(),
            });
        }

        let shape = if pattern.has_wildcard() && pattern.filtered_len() == 0 {
            CaseShape::CatchAll
        } else if !pattern.has_wildcard() && projections.iter().all(Projection::is_identity) {
            CaseShape::Trivial
        } else {
            CaseShape::General
        };

        Ok(MatchCase { pattern, projections, handler: Box::new(handler), is_manipulator, shape })
    }

    /// the catch-all form: a lone wildcard, nullary handler. Takes a plain `Reply`
    /// rather than a `HandlerResult`, since `Reply` has no variant meaning "no match" -
    /// this makes it impossible for a catch-all to ever produce a `Miss` (§4.4, §10).
    pub fn catch_all(handler: impl Fn() -> Reply + Send + Sync + 'static) -> Self {
        MatchCase {
            pattern: Pattern::catch_all(),
            projections: Vec::new(),
            handler: Box::new(move |_args| match handler() {
                Reply::Empty => HandlerResult::Unit,
                Reply::Value(m) => HandlerResult::Message(m),
                Reply::Skip => HandlerResult::Skip,
            }),
            is_manipulator: false,
            shape: CaseShape::CatchAll,
        }
    }

    pub fn shape(&self) -> CaseShape { self.shape }
    pub fn token(&self) -> u32 { self.pattern.token() }
    pub fn has_wildcard(&self) -> bool { self.pattern.has_wildcard() }
    pub fn is_manipulator(&self) -> bool { self.is_manipulator }

    /// §4.4's `invoke` state machine. Returns `None` ("Miss") the instant any phase
    /// fails; no phase is retried. A manipulator case runs entirely through
    /// [`try_match_mut`] so its forwarded args can `downcast_mut` and write back into
    /// the message's own storage; an ordinary case runs through [`try_match`] and only
    /// ever forwards immutable borrows.
    pub fn invoke(&self, msg: &mut Message) -> Option<Reply> {
        if self.shape == CaseShape::CatchAll {
            return normalize((self.handler)(&mut []));
        }

        // FilterByToken: wildcard patterns never use the token for equality (§4.1).
        if !self.pattern.has_wildcard() && msg.type_token() != self.pattern.token() {
            return None;
        }

        let mut forwarded = if self.is_manipulator {
            // force_detach happens inside try_match_mut, before any borrow it returns
            // is handed out (§5's ordering requirement).
            let view = try_match_mut(msg, &self.pattern)?;
            self.project_mut(view.into_vec())?
        } else {
            let view = try_match(msg, &self.pattern)?;
            self.project_ref(&view)?
        };

        // RunHandler + Normalize
        normalize((self.handler)(&mut forwarded))
    }

    fn project_ref<'m>(&self, view: &crate::try_match::MatchView<'m>) -> Option<Vec<ProjectedArg<'m>>> {
        if self.shape == CaseShape::Trivial {
            return Some(view.iter().map(ProjectedArg::Borrowed).collect());
        }
        let mut forwarded = Vec::with_capacity(view.len());
        for (raw, projection) in view.iter().zip(self.projections.iter()) {
            match apply(projection, RawSlot::Ref(raw)) {
                ProjectionOutcome::Miss => return None,
                ProjectionOutcome::Forward(arg) => forwarded.push(arg),
                ProjectionOutcome::Consumed => {}
            }
        }
        Some(forwarded)
    }

    fn project_mut<'m>(&self, refs: Vec<&'m mut dyn crate::message::AnyValue>) -> Option<Vec<ProjectedArg<'m>>> {
        if self.shape == CaseShape::Trivial {
            return Some(refs.into_iter().map(ProjectedArg::BorrowedMut).collect());
        }
        let mut forwarded = Vec::with_capacity(refs.len());
        for (raw, projection) in refs.into_iter().zip(self.projections.iter()) {
            match apply(projection, RawSlot::RefMut(raw)) {
                ProjectionOutcome::Miss => return None,
                ProjectionOutcome::Forward(arg) => forwarded.push(arg),
                ProjectionOutcome::Consumed => {}
            }
        }
        Some(forwarded)
    }
}

/// downcasts a forwarded argument by position, panicking with a descriptive message on
/// a type mismatch - which indicates a builder bug (projection/pattern slot disagree
/// with what the handler closure downcasts to), never a bad message (those are already
/// filtered out by `TryMatch` before the handler runs).
pub fn arg<'a, T: 'static>(args: &'a [ProjectedArg], i: usize) -> &'a T {
    args[i].downcast_ref::<T>().unwrap_or_else(|| {
        panic!("match case handler expected slot {i} to downcast to {}", std::any::type_name::<T>())
    })
}

/// the manipulator counterpart to [`arg`]: downcasts a forwarded argument by position to
/// a mutable reference, panicking on a type mismatch for the same reasons as `arg`.
/// Only meaningful for a manipulator case's args - an ordinary case never forwards a
/// `ProjectedArg::BorrowedMut`, so calling this on one always panics.
pub fn arg_mut<'a, T: 'static>(args: &'a mut [ProjectedArg], i: usize) -> &'a mut T {
    args[i].downcast_mut::<T>().unwrap_or_else(|| {
        panic!("match case handler expected slot {i} to downcast_mut to {}", std::any::type_name::<T>())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message;
    use crate::pattern::Pattern;

    fn exact_case<F>(pattern: Pattern, handler: F) -> MatchCase
        where F: Fn(&mut [ProjectedArg]) -> HandlerResult + Send + Sync + 'static
    {
        let identities = (0..pattern.filtered_len()).map(|_| Projection::Identity).collect();
        MatchCase::new(pattern, identities, false, handler).unwrap()
    }

    #[test]
    fn trivial_case_matches_and_forwards_in_order() {
        let pattern = Pattern::builder().slot::<i32>().slot::<&str>().build().unwrap();
        let case = exact_case(pattern, |args| {
            let n = *arg::<i32>(args, 0);
            let s = *arg::<&str>(args, 1);
            HandlerResult::Value(Box::new(format!("{s}:{n}")))
        });
        assert_eq!(case.shape(), CaseShape::Trivial);

        let mut msg = message!(7i32, "pong");
        match case.invoke(&mut msg) {
            Some(Reply::Value(reply)) => assert_eq!(reply.element_ref::<String>(0), Some(&"pong:7".to_string())),
            other => panic!("expected a reply, got {other:?}"),
        }
    }

    #[test]
    fn token_mismatch_short_circuits_before_try_match() {
        let pattern = Pattern::builder().slot::<i32>().build().unwrap();
        let case = exact_case(pattern, |_args| HandlerResult::Unit);
        let mut msg = message!("not an i32");
        assert!(case.invoke(&mut msg).is_none());
    }

    #[test]
    fn guard_rejection_misses_without_running_handler() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let pattern = Pattern::builder().slot::<i32>().build().unwrap();
        let ran = Arc::new(AtomicBool::new(false));
        let ran2 = ran.clone();
        let case = MatchCase::new(
            pattern,
            vec![Projection::guard(|_x| None)],
            false,
            move |_args| { ran2.store(true, Ordering::SeqCst); HandlerResult::Unit },
        ).unwrap();

        let mut msg = message!(5i32);
        assert!(case.invoke(&mut msg).is_none());
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test]
    fn catch_all_always_matches_and_is_nullary() {
        let case = MatchCase::catch_all(|| Reply::Empty);
        assert_eq!(case.shape(), CaseShape::CatchAll);

        let mut empty = Message::empty();
        assert!(matches!(case.invoke(&mut empty), Some(Reply::Empty)));

        let mut non_empty = message!(1i32, "x");
        assert!(matches!(case.invoke(&mut non_empty), Some(Reply::Empty)));
    }

    #[test]
    fn catch_all_can_never_miss_even_with_opt_like_results() {
        // Reply has no "no match" variant, so every shape of it normalizes to Some(..).
        for reply_builder in [
            (|| Reply::Empty) as fn() -> Reply,
            (|| Reply::Skip) as fn() -> Reply,
        ] {
            let case = MatchCase::catch_all(reply_builder);
            let mut msg = message!(1i32);
            assert!(case.invoke(&mut msg).is_some());
        }
    }

    #[test]
    fn manipulator_case_mutates_the_invoked_message_in_place() {
        let pattern = Pattern::builder().slot::<i32>().build().unwrap();
        let case = MatchCase::new(pattern, vec![Projection::Identity], true, |args| {
            *arg_mut::<i32>(args, 0) += 1;
            HandlerResult::Unit
        }).unwrap();
        assert!(case.is_manipulator());

        let mut shared = message!(10i32);
        let sharer = shared.clone();
        case.invoke(&mut shared);

        assert_eq!(shared.element_ref::<i32>(0), Some(&11));
        assert_eq!(sharer.element_ref::<i32>(0), Some(&10));
    }

    #[test]
    fn arity_mismatch_between_projections_and_pattern_is_rejected() {
        let pattern = Pattern::builder().slot::<i32>().slot::<&str>().build().unwrap();
        let err = MatchCase::new(pattern, vec![Projection::Identity], false, |_| HandlerResult::Unit)
            .unwrap_err();
        assert!(matches!(err, DispatchError::ArityMismatch { handler_arity: 1, slot_count: 2 }));
    }
}

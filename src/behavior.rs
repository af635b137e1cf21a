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

//! [`Behavior`]: an ordered list of [`crate::match_case::MatchCase`]s plus an optional
//! timeout, dispatched first-match-wins (§4.5). `or_else` chains two behaviors by
//! flattening their case lists (§4.7); [`Combinator`] is the alternate, non-flattening
//! chaining strategy that keeps the two behaviors as distinct objects instead.

use std::time::Duration;

use crate::config::TimeoutDefinition;
use crate::errors::{DispatchError, Result};
use crate::match_case::MatchCase;
use crate::message::Message;
use crate::reply::{normalize, HandlerResult, Reply};

pub struct Behavior {
    cases: Vec<MatchCase>,
    timeout: TimeoutDefinition,
}

impl Behavior {
    /// a behavior with no timeout. Rejects an empty case list - a behavior with nothing
    /// to match and nothing to time out into can never produce a reply (§4.8's
    /// `EmptyBehavior`).
    pub fn new(cases: Vec<MatchCase>) -> Result<Self> {
        Behavior::with_timeout(cases, TimeoutDefinition::none())
    }

    pub fn with_timeout(cases: Vec<MatchCase>, timeout: TimeoutDefinition) -> Result<Self> {
        if cases.is_empty() && timeout.is_disabled() {
            return Err(DispatchError::EmptyBehavior);
        }
        Ok(Behavior { cases, timeout })
    }

    /// a pure-timeout behavior with no cases at all (§10).
    pub fn after(duration: Duration, on_timeout: impl Fn() -> HandlerResult + Send + Sync + 'static) -> Self {
        Behavior { cases: Vec::new(), timeout: TimeoutDefinition::new(duration, on_timeout) }
    }

    pub fn cases(&self) -> &[MatchCase] { &self.cases }

    pub fn timeout(&self) -> Duration { self.timeout.duration() }

    /// §4.5: walks cases in order, returning the first non-`Miss` outcome. A `Skip`
    /// still stops the walk (§9, `DECISION-1`) - it is a successful outcome, distinct
    /// from `Miss`, not an instruction to keep looking.
    pub fn invoke(&self, msg: &mut Message) -> Option<Reply> {
        for case in &self.cases {
            if let Some(reply) = case.invoke(msg) {
                return Some(reply);
            }
        }
        None
    }

    /// fires the configured timeout handler, or `None` if this behavior has none
    /// (§9, `DECISION-2`: a zero-duration timeout never fires).
    pub fn handle_timeout(&self) -> Option<Reply> {
        if self.timeout.is_disabled() {
            return None;
        }
        normalize(self.timeout.fire())
    }

    /// the flatten strategy (SPEC_FULL §4.7): concatenates `self`'s cases before
    /// `other`'s, preserving first-match-wins order across both; `other`'s timeout wins,
    /// right-biased, exactly like `Behavior::or_else`.
    pub fn or_else(self, other: Behavior) -> Behavior {
        let Behavior { mut cases, timeout: _ } = self;
        let Behavior { cases: other_cases, timeout: other_timeout } = other;
        cases.extend(other_cases);
        Behavior { cases, timeout: other_timeout }
    }

    /// rebinds this behavior's timeout, keeping its cases.
    pub fn copy_with_timeout(self, timeout: TimeoutDefinition) -> Behavior {
        Behavior { cases: self.cases, timeout }
    }

    /// the alternate chaining strategy: wraps `self` and `other` in a [`Combinator`]
    /// instead of flattening their case lists into one `Vec`.
    pub fn chained_with(self, other: Behavior) -> Combinator {
        Combinator::new(self, other)
    }
}

/// keeps two behaviors as distinct objects instead of flattening their cases into one
/// `Vec` (§4.7's alternate Combinator strategy). Dispatch order and the right-biased
/// timeout match `or_else` exactly; the difference is purely representational - useful
/// when the two behaviors are built and owned independently and re-combined often,
/// avoiding the `Vec` copy `or_else` performs on every call.
pub struct Combinator {
    first: Behavior,
    second: Behavior,
}

impl Combinator {
    pub fn new(first: Behavior, second: Behavior) -> Self {
        Combinator { first, second }
    }

    pub fn invoke(&self, msg: &mut Message) -> Option<Reply> {
        self.first.invoke(msg).or_else(|| self.second.invoke(msg))
    }

    /// right-biased, matching `or_else`: the second behavior's timeout wins outright.
    pub fn handle_timeout(&self) -> Option<Reply> {
        if !self.second.timeout.is_disabled() {
            self.second.handle_timeout()
        } else {
            self.first.handle_timeout()
        }
    }

    pub fn timeout(&self) -> Duration {
        if self.second.timeout.is_disabled() { self.first.timeout() } else { self.second.timeout() }
    }

    /// rebinds the timeout, mirroring `Behavior::copy_with_timeout` (§4.7): `first` is
    /// kept as-is and the new timeout is rebound onto `second`, since `second`'s timeout
    /// is the one that wins (right-biased, matching `handle_timeout`/`timeout` above).
    pub fn copy_with_timeout(self, timeout: TimeoutDefinition) -> Combinator {
        Combinator { first: self.first, second: self.second.copy_with_timeout(timeout) }
    }

    /// collapses back into a single flattened [`Behavior`], identical in dispatch
    /// behavior to keeping the two combined.
    pub fn into_behavior(self) -> Behavior {
        self.first.or_else(self.second)
    }
}

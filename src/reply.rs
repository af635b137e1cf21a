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

//! Normalizes the heterogeneous set of values a handler may return into the uniform
//! `Option<Reply>` outcome that [`crate::behavior::Behavior::invoke`] hands back to its
//! caller. This is the "Reply visitor" component (C7) of the dispatch core.

use std::fmt::{self, Debug};

use crate::message::{AnyValue, Message};

/// what a [`crate::match_case::MatchCase`]'s handler returns, before normalization.
pub enum HandlerResult {
    /// handler returned `()` - becomes an empty reply message.
    Unit,
    /// handler returned a single value - becomes a one-element reply message.
    Value(Box<dyn AnyValue>),
    /// handler returned `Option<T>`; `None` behaves as "skip this case" (try the next
    /// one in the behavior, exactly like a type-token or guard miss).
    Opt(Option<Box<dyn AnyValue>>),
    /// handler explicitly declined to consume the message, distinct from a miss: the
    /// behavior's walk still stops here (§9, `DECISION-1`).
    Skip,
    /// handler built the reply message itself; used verbatim.
    Message(Message),
}

impl Debug for HandlerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerResult::Unit => write!(f, "Unit"),
            HandlerResult::Value(v) => write!(f, "Value({v:?})"),
            HandlerResult::Opt(Some(v)) => write!(f, "Opt(Some({v:?}))"),
            HandlerResult::Opt(None) => write!(f, "Opt(None)"),
            HandlerResult::Skip => write!(f, "Skip"),
            HandlerResult::Message(m) => write!(f, "Message({m:?})"),
        }
    }
}

/// the outcome of a successful (non-`Miss`) dispatch.
#[derive(Debug, Clone)]
pub enum Reply {
    Empty,
    Value(Message),
    Skip,
}

/// `Opt(None)` is the one `HandlerResult` variant that does *not* map to a `Reply` - it
/// maps to a miss, which in this crate is represented as the absence of a `Reply`
/// (`None`), not as a `Reply` variant. Everything else always produces a `Reply`.
pub fn normalize(result: HandlerResult) -> Option<Reply> {
    match result {
        HandlerResult::Unit => Some(Reply::Empty),
        HandlerResult::Value(v) => Some(Reply::Value(Message::from_values(vec![v]))),
        HandlerResult::Opt(None) => None,
        HandlerResult::Opt(Some(v)) => Some(Reply::Value(Message::from_values(vec![v]))),
        HandlerResult::Skip => Some(Reply::Skip),
        HandlerResult::Message(m) => Some(Reply::Value(m)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_normalizes_to_empty_reply() {
        assert!(matches!(normalize(HandlerResult::Unit), Some(Reply::Empty)));
    }

    #[test]
    fn value_normalizes_to_one_element_message() {
        match normalize(HandlerResult::Value(Box::new(42i32))) {
            Some(Reply::Value(m)) => {
                assert_eq!(m.arity(), 1);
                assert_eq!(m.element_ref::<i32>(0), Some(&42));
            }
            other => panic!("expected Reply::Value, got {other:?}"),
        }
    }

    #[test]
    fn opt_none_normalizes_to_miss() {
        assert!(normalize(HandlerResult::Opt(None)).is_none());
    }

    #[test]
    fn opt_some_normalizes_like_value() {
        match normalize(HandlerResult::Opt(Some(Box::new("hi")))) {
            Some(Reply::Value(m)) => assert_eq!(m.element_ref::<&str>(0), Some(&"hi")),
            other => panic!("expected Reply::Value, got {other:?}"),
        }
    }

    #[test]
    fn skip_normalizes_to_skip_marker() {
        assert!(matches!(normalize(HandlerResult::Skip), Some(Reply::Skip)));
    }

    #[test]
    fn message_is_used_verbatim() {
        let m = crate::message!(1i32, 2i32);
        match normalize(HandlerResult::Message(m)) {
            Some(Reply::Value(m)) => assert_eq!(m.arity(), 2),
            other => panic!("expected Reply::Value, got {other:?}"),
        }
    }
}

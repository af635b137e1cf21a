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

//! Construction-time errors for behaviors, patterns and timeouts.
//!
//! Invocation itself is infallible (`Behavior::invoke` returns `Option<Reply>`, never a
//! `Result`) - mismatches are expected outcomes, not errors (see the crate-level docs).
//! Everything in this module is raised by *builders*, before a behavior is ever invoked.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("pattern has more than one wildcard slot")]
    MultipleWildcards,

    #[error("wildcard slot must be the last slot in the pattern")]
    WildcardNotTrailing,

    #[error("handler arity {handler_arity} does not match forwarded slot count {slot_count}")]
    ArityMismatch { handler_arity: usize, slot_count: usize },

    #[error("behavior has no cases and no timeout")]
    EmptyBehavior,

    #[error("invalid timeout duration {raw:?}: {cause}")]
    InvalidTimeout { raw: String, cause: String },
}

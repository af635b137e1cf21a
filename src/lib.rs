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

//! Message-dispatch core for an actor framework: a type-erased [`Message`](message::Message)
//! tuple, [`Pattern`](pattern::Pattern)s that describe the slot types a handler expects,
//! [`MatchCase`](match_case::MatchCase)s that pair a pattern with per-slot projections/guards
//! and a handler, and [`Behavior`](behavior::Behavior)s that chain cases first-match-wins
//! with an optional timeout.
//!
//! Dispatch is deliberately *runtime-tagged* rather than resolved through compile-time
//! type-list metaprogramming: patterns carry a folded [`TypeId`](std::any::TypeId) token
//! (`token` module) that is compared against a message's own token before anything else
//! runs, and the message payload itself is type-erased behind the [`AnyValue`](message::AnyValue)
//! trait. This keeps the dispatch surface usable as runtime data - built, combined and
//! passed around like any other value - instead of requiring a case list to be a fixed,
//! named type.
//!
//! Invocation is infallible: a mismatch is an ordinary `None` ("miss"), not an `Err`.
//! [`errors::DispatchError`] is reserved for builders - malformed patterns, empty
//! behaviors, unparsable timeouts - raised before a case or behavior is ever invoked.

pub mod behavior;
pub mod config;
pub mod errors;
pub mod match_case;
pub mod message;
pub mod pattern;
pub mod projection;
pub mod reply;
pub mod token;
pub mod try_match;

pub mod prelude;

use std::time::Duration;

#[inline] pub fn days(n: u64) -> Duration { Duration::from_secs(n * 60 * 60 * 24) }
#[inline] pub fn hours(n: u64) -> Duration { Duration::from_secs(n * 60 * 60) }
#[inline] pub fn minutes(n: u64) -> Duration { Duration::from_secs(n * 60) }
#[inline] pub fn secs(n: u64) -> Duration { Duration::from_secs(n) }
#[inline] pub fn millis(n: u64) -> Duration { Duration::from_millis(n) }
#[inline] pub fn micros(n: u64) -> Duration { Duration::from_micros(n) }
#[inline] pub fn nanos(n: u64) -> Duration { Duration::from_nanos(n) }

/*
 * we intercept logging/tracing macros here to have a central place where we can remove/replace them
 */

#[macro_export]
macro_rules! trace {
    ( $( $id:ident = $e:expr ),* ) => { tracing::trace!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::trace!( $( $e ),* ) }
}

#[macro_export]
macro_rules! debug {
    ( $( $id:ident = $e:expr ),* ) => { tracing::debug!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::debug!( $( $e ),* ) }
}

#[macro_export]
macro_rules! info {
    ( $( $id:ident = $e:expr ),* ) => { tracing::info!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::info!( $( $e ),* ) }
}

#[macro_export]
macro_rules! warn {
    ( $( $id:ident = $e:expr ),* ) => { tracing::warn!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::warn!( $( $e ),* ) }
}

#[macro_export]
macro_rules! error {
    ( $( $id:ident = $e:expr ),* ) => { tracing::error!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::error!( $( $e ),* ) }
}

/// installs a `tracing_subscriber` `EnvFilter`-based subscriber reading `RUST_LOG`,
/// falling back to `info` when unset. Intended for examples and integration tests, not
/// for library code - a library never installs a global subscriber for its caller.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_helpers_convert_to_the_right_units() {
        assert_eq!(secs(2), Duration::from_secs(2));
        assert_eq!(millis(500), Duration::from_millis(500));
        assert_eq!(minutes(1), Duration::from_secs(60));
        assert_eq!(hours(1), Duration::from_secs(3600));
        assert_eq!(days(1), Duration::from_secs(86_400));
    }
}

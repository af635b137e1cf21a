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

//! Human-readable timeout configuration for [`crate::behavior::Behavior`], parsed with
//! `parse_duration` the same way the rest of this crate's ecosystem parses durations
//! from config files and command-line flags rather than hand-rolling a parser.

use std::fmt;
use std::time::Duration;

use crate::errors::{DispatchError, Result};
use crate::reply::HandlerResult;

pub type OnTimeout = Box<dyn Fn() -> HandlerResult + Send + Sync>;

/// a behavior's timeout: how long to wait with no matching case, and what to hand back
/// when that happens (§4.6, §4.8's `after`). A zero duration means "no timeout" (§9,
/// `DECISION-2`) - `Behavior::invoke` never waits, it only ever inspects a single message.
pub struct TimeoutDefinition {
    duration: Duration,
    on_timeout: OnTimeout,
}

impl TimeoutDefinition {
    pub fn new(duration: Duration, on_timeout: impl Fn() -> HandlerResult + Send + Sync + 'static) -> Self {
        TimeoutDefinition { duration, on_timeout: Box::new(on_timeout) }
    }

    /// parses durations the way the rest of the ambient stack does: `"500ms"`, `"2s"`,
    /// `"1min 30s"`, etc. (see `parse_duration::parse`).
    pub fn parse(raw: &str, on_timeout: impl Fn() -> HandlerResult + Send + Sync + 'static) -> Result<Self> {
        let duration = parse_duration::parse(raw).map_err(|cause| DispatchError::InvalidTimeout {
            raw: raw.to_string(),
            cause: cause.to_string(),
        })?;
        Ok(TimeoutDefinition::new(duration, on_timeout))
    }

    /// the "never times out" sentinel (§9, `DECISION-2`): zero duration, handler never run.
    pub fn none() -> Self {
        TimeoutDefinition::new(Duration::ZERO, || HandlerResult::Unit)
    }

    pub fn duration(&self) -> Duration { self.duration }

    pub fn is_disabled(&self) -> bool { self.duration.is_zero() }

    pub fn fire(&self) -> HandlerResult {
        (self.on_timeout)()
    }
}

impl fmt::Debug for TimeoutDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeoutDefinition").field("duration", &self.duration).finish_non_exhaustive()
    }
}

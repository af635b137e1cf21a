/*
 * Copyright (c) 2024, United States Government, as represented by the
 * Administrator of the National Aeronautics and Space Administration.
 * All rights reserved.
 *
 * The ODIN - Open Data Integration Framework is licensed under the
 * Apache License, Version 2.0 (the "License"); you may not use this file
 * except in compliance with the License. You may obtain a copy of the
 * License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

pub use crate::{secs, millis, micros, nanos, minutes, hours, days, init_tracing, trace, debug, info, warn, error};

pub use crate::errors::{DispatchError, Result};
pub use crate::message::{AnyValue, Message};
pub use crate::pattern::{Pattern, PatternBuilder, SlotSpec};
pub use crate::try_match::{try_match, try_match_mut, MatchView, MatchViewMut};
pub use crate::projection::{apply, ProjectedArg, Projection, ProjectionOutcome, RawSlot};
pub use crate::reply::{normalize, HandlerResult, Reply};
pub use crate::match_case::{arg, arg_mut, CaseShape, MatchCase};
pub use crate::config::TimeoutDefinition;
pub use crate::behavior::{Behavior, Combinator};
pub use crate::message;


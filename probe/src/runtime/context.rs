// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! The invocation context seam between the handler and its host.

use chrono::Utc;
use lambda_runtime::Context;
use std::time::Duration;

/// The number of 100-nanosecond ticks in one second.
const TICKS_PER_SECOND: u128 = 10_000_000;

/// Per-invocation metadata the handler reads from its host.
pub trait RemainingTime {
    /// Returns the execution time left before the host terminates the
    /// invocation. Never negative: an elapsed deadline reads as zero.
    fn remaining_time(&self) -> Duration;
}

impl RemainingTime for Context {
    fn remaining_time(&self) -> Duration {
        remaining_until(self.deadline, Utc::now().timestamp_millis())
    }
}

/// A fixed time budget, used by hosts that do not track a deadline.
impl RemainingTime for Duration {
    fn remaining_time(&self) -> Duration {
        *self
    }
}

/// Milliseconds between `now_ms` and `deadline_ms`, both since the Unix epoch.
fn remaining_until(deadline_ms: u64, now_ms: i64) -> Duration {
    let deadline_ms = i64::try_from(deadline_ms).unwrap_or(i64::MAX);
    let left = deadline_ms.saturating_sub(now_ms).max(0);
    Duration::from_millis(left as u64)
}

/// Renders a remaining time as `[d.]hh:mm:ss[.fffffff]`.
///
/// The fraction is given in 100 ns ticks and is left out when it is zero.
/// The day component only shows up once a full day remains.
///
/// # Example
///
/// ```
/// use probe::prelude::format_remaining;
/// use std::time::Duration;
///
/// assert_eq!("00:00:02.9870000", format_remaining(Duration::from_millis(2987)));
/// ```
pub fn format_remaining(remaining: Duration) -> String {
    let ticks = remaining.as_nanos() / 100;
    let total_secs = ticks / TICKS_PER_SECOND;
    let fraction = ticks % TICKS_PER_SECOND;

    let days = total_secs / 86_400;
    let clock = format!(
        "{:02}:{:02}:{:02}",
        total_secs / 3_600 % 24,
        total_secs / 60 % 60,
        total_secs % 60
    );

    let mut text = if days > 0 {
        format!("{}.{}", days, clock)
    } else {
        clock
    };
    if fraction > 0 {
        text.push_str(&format!(".{:07}", fraction));
    }
    text
}

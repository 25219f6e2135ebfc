// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user daily request quota.
//!
//! Counts are held in memory behind a mutex and shared across the process;
//! losing them on restart is acceptable (the quota is best-effort, not a hard
//! guarantee). The window is a shared calendar-day: when the wall-clock date
//! of the window start differs from the current date, every user's count is
//! cleared at once.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::debug;

/// Result of a quota admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request was counted and may proceed.
    Granted,
    /// The user's window is exhausted; retry once the shared window resets.
    Denied { retry_in_hours: u64 },
}

struct WindowState {
    counts: HashMap<String, u32>,
    window_start: DateTime<Utc>,
}

/// Tracks per-user request counts over a shared calendar-day window.
///
/// Injected into the dispatcher; no ambient global. The mutex makes each
/// check-and-increment atomic within this process. Multi-instance deployments
/// would externalize the counter to the store instead.
pub struct QuotaTracker {
    daily_limit: u32,
    state: Mutex<WindowState>,
}

impl QuotaTracker {
    /// Creates a tracker admitting up to `daily_limit` requests per user per day.
    pub fn new(daily_limit: u32) -> Self {
        Self {
            daily_limit,
            state: Mutex::new(WindowState {
                counts: HashMap::new(),
                window_start: Utc::now(),
            }),
        }
    }

    /// Returns the configured daily ceiling.
    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Checks and counts a request for `user_id` against the current window.
    pub fn admit(&self, user_id: &str) -> Admission {
        self.admit_at(user_id, Utc::now())
    }

    /// Clock-injected variant of [`admit`](Self::admit).
    pub fn admit_at(&self, user_id: &str, now: DateTime<Utc>) -> Admission {
        let mut state = self.state.lock().expect("quota mutex poisoned");

        if state.window_start.date_naive() != now.date_naive() {
            debug!("quota window rolled over, clearing all counts");
            state.counts.clear();
            state.window_start = now;
        }

        let count = state.counts.get(user_id).copied().unwrap_or(0);
        if count >= self.daily_limit {
            return Admission::Denied {
                retry_in_hours: hours_until_reset(state.window_start, now),
            };
        }

        state.counts.insert(user_id.to_string(), count + 1);
        Admission::Granted
    }

    /// Pins `user_id` to the ceiling until the next window reset.
    ///
    /// Used when the completion gateway reports its own rate limit: the
    /// downstream limit is authoritative, so further attempts are suppressed
    /// even though the local count had room left.
    pub fn force_exhaust(&self, user_id: &str) {
        let mut state = self.state.lock().expect("quota mutex poisoned");
        state.counts.insert(user_id.to_string(), self.daily_limit);
    }
}

/// Whole hours (rounded up) until the shared window resets.
fn hours_until_reset(window_start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let reset_at = window_start + chrono::Duration::days(1);
    let seconds = (reset_at - now).num_seconds().max(0) as u64;
    seconds.div_ceil(3600)
}

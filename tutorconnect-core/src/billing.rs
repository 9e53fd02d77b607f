//! Pay-per-minute billing projection.
//!
//! cost = elapsed_seconds × rate_per_minute / 60
//!
//! Nothing here debits the wallet. The projection is recomputed from the
//! session start on every tick, so it is monotonic for as long as the clock is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Session;

/// Whole seconds since `started_at`; zero if the clock reads earlier.
pub fn elapsed_seconds(started_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - started_at).num_seconds().max(0) as u64
}

pub fn accrued_cost(elapsed_seconds: u64, rate_per_minute: f64) -> f64 {
    elapsed_seconds as f64 * rate_per_minute / 60.0
}

/// True when less than one more minute is affordable.
pub fn is_low_balance(balance: f64, cost: f64, rate_per_minute: f64) -> bool {
    balance - cost < rate_per_minute
}

/// `MM:SS`; minutes keep counting past 59.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn format_currency(symbol: &str, amount: f64) -> String {
    format!("{}{:.2}", symbol, amount)
}

/// Billing readout for the active session at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingSnapshot {
    pub session_id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub elapsed_seconds: u64,
    pub rate_per_minute: f64,
    pub cost: f64,
    pub balance: f64,
    pub remaining: f64,
    pub low_balance: bool,
}

impl BillingSnapshot {
    pub fn compute(session: &Session, balance: f64, now: DateTime<Utc>) -> Self {
        let rate = session.tutor.rate_per_minute;
        let elapsed = elapsed_seconds(session.started_at, now);
        let cost = accrued_cost(elapsed, rate);
        Self {
            session_id: session.id,
            computed_at: now,
            elapsed_seconds: elapsed,
            rate_per_minute: rate,
            cost,
            balance,
            remaining: balance - cost,
            low_balance: is_low_balance(balance, cost, rate),
        }
    }

    /// Same tick, re-evaluated against a different wallet balance.
    pub fn with_balance(self, balance: f64) -> Self {
        Self {
            balance,
            remaining: balance - self.cost,
            low_balance: is_low_balance(balance, self.cost, self.rate_per_minute),
            ..self
        }
    }

    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }
}

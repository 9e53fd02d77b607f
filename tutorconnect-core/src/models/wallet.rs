use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One top-up in the wallet ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletEntry {
    pub id: Uuid,
    pub amount: f64,
    pub balance_after: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    balance: f64,
    entries: Vec<WalletEntry>,
}

impl Wallet {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            balance: initial_balance.max(0.0),
            entries: Vec::new(),
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn entries(&self) -> &[WalletEntry] {
        &self.entries
    }

    /// Credit the wallet. Non-positive amounts are ignored.
    pub fn top_up(&mut self, amount: f64, at: DateTime<Utc>) -> Option<&WalletEntry> {
        if amount.is_nan() || amount <= 0.0 {
            return None;
        }
        self.balance += amount;
        self.entries.push(WalletEntry {
            id: Uuid::new_v4(),
            amount,
            balance_after: self.balance,
            created_at: at,
        });
        self.entries.last()
    }

    pub fn is_low(&self, threshold: f64) -> bool {
        self.balance < threshold
    }
}

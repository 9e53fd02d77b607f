use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, RwLock};
use tutorconnect_core::{BillingSnapshot, Marketplace, TutorConnectConfig};

pub type SharedMarketplace = Arc<RwLock<Marketplace>>;

/// Everything a request handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub marketplace: SharedMarketplace,
    pub config: TutorConnectConfig,
    pub billing: watch::Receiver<Option<BillingSnapshot>>,
}

impl AppState {
    /// Build state seeded from config. The returned sender feeds the billing
    /// readout and belongs to the billing loop.
    pub fn new(config: TutorConnectConfig) -> (Self, watch::Sender<Option<BillingSnapshot>>) {
        let marketplace = Arc::new(RwLock::new(Marketplace::from_config(&config)));
        let (tx, rx) = watch::channel(None);
        (
            Self {
                marketplace,
                config,
                billing: rx,
            },
            tx,
        )
    }

    /// Elapsed time and cost come from the last tick for the active session
    /// (or a fresh computation before the first one). Balance, remaining and
    /// the low-balance flag always follow the live wallet.
    pub fn billing_for(
        &self,
        marketplace: &Marketplace,
        now: DateTime<Utc>,
    ) -> Option<BillingSnapshot> {
        let session = marketplace.active_session()?;
        let ticked = self.billing.borrow().clone();
        match ticked {
            Some(snapshot) if snapshot.session_id == session.id => {
                Some(snapshot.with_balance(marketplace.wallet().balance()))
            }
            _ => marketplace.billing(now),
        }
    }
}

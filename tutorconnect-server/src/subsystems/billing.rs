//! Billing ticker: recomputes the active session's elapsed time and accrued
//! cost once per tick and publishes it on a watch channel. Read-only; the
//! wallet is never debited.

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tutorconnect_core::config::BillingConfig;
use tutorconnect_core::BillingSnapshot;

use crate::state::SharedMarketplace;

pub async fn run_billing_loop(
    marketplace: SharedMarketplace,
    config: BillingConfig,
    tx: watch::Sender<Option<BillingSnapshot>>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let interval = tokio::time::Duration::from_secs(config.tick_seconds);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::info!("Billing loop started (interval: {}s)", config.tick_seconds);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = run_billing_tick(&marketplace).await;
                publish(&tx, snapshot);
            }
            _ = shutdown.recv() => {
                tracing::info!("Billing loop shutting down");
                break;
            }
        }
    }
}

pub async fn run_billing_tick(marketplace: &SharedMarketplace) -> Option<BillingSnapshot> {
    marketplace.read().await.billing(Utc::now())
}

/// Replace the published snapshot, logging when a session crosses into or
/// out of the low-balance zone.
fn publish(tx: &watch::Sender<Option<BillingSnapshot>>, snapshot: Option<BillingSnapshot>) {
    tx.send_modify(|current| {
        if let Some(next) = &snapshot {
            let was_low = current
                .as_ref()
                .filter(|prev| prev.session_id == next.session_id)
                .map_or(false, |prev| prev.low_balance);
            if next.low_balance && !was_low {
                tracing::warn!(
                    "Session {}: low balance, {:.2} left at {:.2}/min",
                    next.session_id,
                    next.remaining,
                    next.rate_per_minute
                );
            }
        }
        *current = snapshot;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tutorconnect_core::config::{ChatConfig, WalletConfig};
    use tutorconnect_core::directory::seed_tutors;
    use tutorconnect_core::models::ConnectKind;
    use tutorconnect_core::Marketplace;

    fn shared(initial_balance: f64) -> SharedMarketplace {
        let wallet = WalletConfig {
            initial_balance,
            ..WalletConfig::default()
        };
        Arc::new(RwLock::new(Marketplace::new(seed_tutors(), &wallet, &ChatConfig::default())))
    }

    #[tokio::test]
    async fn test_tick_without_session_is_none() {
        let market = shared(127.5);
        assert!(run_billing_tick(&market).await.is_none());
    }

    #[tokio::test]
    async fn test_tick_flags_low_balance() {
        let market = shared(10.0);
        market.write().await.connect("1", ConnectKind::Chat, Utc::now()).unwrap();
        let snap = run_billing_tick(&market).await.unwrap();
        assert!(snap.low_balance, "10.00 cannot cover a 25/min minute");
        assert_eq!(snap.balance, 10.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_publishes_and_clears() {
        let market = shared(127.5);
        let (tx, mut rx) = watch::channel(None);
        let (stop, stop_rx) = broadcast::channel(1);
        let handle = tokio::spawn(run_billing_loop(
            market.clone(),
            BillingConfig::default(),
            tx,
            stop_rx,
        ));

        let session_id = market
            .write()
            .await
            .connect("3", ConnectKind::Chat, Utc::now())
            .unwrap()
            .id;
        rx.wait_for(|s| s.as_ref().map(|b| b.session_id) == Some(session_id))
            .await
            .unwrap();

        market.write().await.end_session(Utc::now()).unwrap();
        rx.wait_for(|s| s.is_none()).await.unwrap();

        stop.send(()).unwrap();
        handle.await.unwrap();
    }
}

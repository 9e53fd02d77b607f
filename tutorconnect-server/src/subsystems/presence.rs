//! Presence simulator loop.
//!
//! Stands in for a heartbeat protocol: every `tick_seconds` each tutor may
//! advance one step along online → busy → offline.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::broadcast;
use tutorconnect_core::config::PresenceConfig;
use tutorconnect_core::PresenceChange;

use crate::state::SharedMarketplace;

pub async fn run_presence_loop(
    marketplace: SharedMarketplace,
    config: PresenceConfig,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut rng = StdRng::from_entropy();
    let interval = tokio::time::Duration::from_secs(config.tick_seconds);
    // Presence holds for one full period before the first flip.
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::info!(
        "Presence loop started (interval: {}s, flip probability: {})",
        config.tick_seconds,
        config.flip_probability
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let changes = run_presence_tick(&marketplace, config.flip_probability, &mut rng).await;
                for change in &changes {
                    tracing::debug!("Tutor {} went {} -> {}", change.tutor_id, change.from, change.to);
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("Presence loop shutting down");
                break;
            }
        }
    }
}

/// One simulator step under the write lock.
pub async fn run_presence_tick(
    marketplace: &SharedMarketplace,
    flip_probability: f64,
    rng: &mut StdRng,
) -> Vec<PresenceChange> {
    let mut market = marketplace.write().await;
    market.tick_presence(flip_probability, rng)
}

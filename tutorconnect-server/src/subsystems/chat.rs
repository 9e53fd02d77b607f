//! Simulated tutor replies.
//!
//! Each accepted student message schedules exactly one canned reply after a
//! uniformly random delay. Replies are fire-and-forget; one whose session has
//! ended by the time it fires is dropped.

use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::task::JoinHandle;
use tutorconnect_core::config::ChatConfig;
use uuid::Uuid;

use crate::state::SharedMarketplace;

pub fn reply_delay<R: Rng + ?Sized>(config: &ChatConfig, rng: &mut R) -> Duration {
    let max = config.reply_max_ms.max(config.reply_min_ms);
    Duration::from_millis(rng.gen_range(config.reply_min_ms..=max))
}

pub fn schedule_reply(
    marketplace: SharedMarketplace,
    config: &ChatConfig,
    session_id: Uuid,
) -> JoinHandle<()> {
    let delay = reply_delay(config, &mut rand::thread_rng());
    let text = config.reply_text.clone();
    tracing::debug!("Reply for session {} scheduled in {}ms", session_id, delay.as_millis());

    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let mut market = marketplace.write().await;
        match market.deliver_reply(session_id, &text, Utc::now()) {
            Some(message) => tracing::debug!("Reply {} delivered to session {}", message.id, session_id),
            None => tracing::debug!("Session {} ended before its reply; dropped", session_id),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tutorconnect_core::models::{ConnectKind, Sender};
    use tutorconnect_core::{Marketplace, TutorConnectConfig};

    fn shared() -> SharedMarketplace {
        Arc::new(RwLock::new(Marketplace::from_config(&TutorConnectConfig::default())))
    }

    #[test]
    fn test_delay_within_window() {
        let config = ChatConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let d = reply_delay(&config, &mut rng);
            assert!(d >= Duration::from_millis(1000) && d <= Duration::from_millis(3000));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_arrives_after_delay() {
        let market = shared();
        let config = ChatConfig::default();
        let session_id = {
            let mut m = market.write().await;
            m.connect("1", ConnectKind::Chat, Utc::now()).unwrap();
            m.send_message("What is the chain rule?", Utc::now()).unwrap().session_id
        };

        let handle = schedule_reply(market.clone(), &config, session_id);
        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(market.read().await.active_session().unwrap().messages.len(), 2);

        handle.await.unwrap();
        let m = market.read().await;
        let last = m.active_session().unwrap().messages.last().unwrap().clone();
        assert_eq!(last.sender, Sender::Teacher);
        assert_eq!(last.content, config.reply_text);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_send_gets_its_own_reply() {
        let market = shared();
        let config = ChatConfig::default();
        let mut handles = Vec::new();
        {
            let mut m = market.write().await;
            m.connect("3", ConnectKind::Chat, Utc::now()).unwrap();
        }
        for text in ["one", "two", "three"] {
            let id = market.write().await.send_message(text, Utc::now()).unwrap().session_id;
            handles.push(schedule_reply(market.clone(), &config, id));
        }
        for h in handles {
            h.await.unwrap();
        }
        let m = market.read().await;
        let replies = m
            .active_session()
            .unwrap()
            .messages
            .iter()
            .filter(|msg| msg.sender == Sender::Teacher)
            .count();
        // greeting + three replies
        assert_eq!(replies, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_dropped_after_end() {
        let market = shared();
        let config = ChatConfig::default();
        let session_id = {
            let mut m = market.write().await;
            m.connect("1", ConnectKind::Chat, Utc::now()).unwrap();
            m.send_message("hello", Utc::now()).unwrap().session_id
        };
        let handle = schedule_reply(market.clone(), &config, session_id);
        market.write().await.end_session(Utc::now()).unwrap();

        handle.await.unwrap();
        let m = market.read().await;
        assert!(m.active_session().is_none());
        assert_eq!(m.history()[0].message_count, 2);
    }
}

use chrono::Utc;
use tutorconnect_core::directory;
use tutorconnect_core::ipc::{TutorConnectRequest, TutorConnectResponse};
use tutorconnect_core::landing::landing_page;
use tutorconnect_core::models::ConnectKind;
use tutorconnect_core::MarketplaceError;

use crate::state::AppState;
use crate::subsystems::chat;
use crate::views;

pub async fn handle_request(request: TutorConnectRequest, state: &AppState) -> TutorConnectResponse {
    let currency = state.config.billing.currency_symbol.as_str();

    match request {
        TutorConnectRequest::Ping => TutorConnectResponse::pong(),
        TutorConnectRequest::Health => {
            let market = state.marketplace.read().await;
            TutorConnectResponse::ok(serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "tutors": market.tutors().len(),
                "online": market.tutors().iter().filter(|t| t.is_available()).count(),
                "active_session": market.active_session().map(|s| s.id),
            }))
        }
        TutorConnectRequest::Landing => match serde_json::to_value(landing_page()) {
            Ok(page) => TutorConnectResponse::ok(page),
            Err(e) => TutorConnectResponse::err(format!("Failed to render landing page: {}", e)),
        },
        TutorConnectRequest::ListTutors { query, subject } => {
            let market = state.marketplace.read().await;
            let query = query.unwrap_or_default();
            let hits = market.search(&query, subject.as_deref());
            let cards: Vec<_> = hits
                .iter()
                .map(|t| views::tutor_card(t, &state.config.directory, currency))
                .collect();
            TutorConnectResponse::ok(serde_json::json!({
                "query": query,
                "subject": subject.filter(|s| !s.is_empty()),
                "count": cards.len(),
                "stats": views::stats_view(&directory::stats(market.tutors()), currency),
                "tutors": cards,
                "empty_hint": hits.is_empty().then_some(views::EMPTY_DIRECTORY_HINT),
            }))
        }
        TutorConnectRequest::Subjects => {
            let market = state.marketplace.read().await;
            TutorConnectResponse::ok(serde_json::json!({
                "subjects": directory::all_subjects(market.tutors()),
                "quick_filters": directory::quick_filters(
                    market.tutors(),
                    state.config.directory.quick_filter_limit,
                ),
            }))
        }
        TutorConnectRequest::Connect { tutor_id, kind } => handle_connect(state, &tutor_id, kind).await,
        TutorConnectRequest::SendMessage { content } => handle_send_message(state, &content).await,
        TutorConnectRequest::EndSession => {
            let mut market = state.marketplace.write().await;
            match market.end_session(Utc::now()) {
                Ok(summary) => TutorConnectResponse::ok(serde_json::json!({
                    "ended": true,
                    "summary": views::summary_view(&summary, currency),
                })),
                Err(e) => TutorConnectResponse::rejected(&e),
            }
        }
        TutorConnectRequest::Session => {
            let market = state.marketplace.read().await;
            match market.active_session() {
                Some(session) => {
                    let billing = state.billing_for(&market, Utc::now());
                    TutorConnectResponse::ok(views::session_view(session, billing.as_ref(), currency))
                }
                None => TutorConnectResponse::rejected(&MarketplaceError::NoActiveSession),
            }
        }
        TutorConnectRequest::StartVideoCall => {
            let market = state.marketplace.read().await;
            match market.active_session() {
                Some(session) => {
                    tracing::info!("Starting video call for session {}...", session.id);
                    TutorConnectResponse::ok(serde_json::json!({
                        "session_id": session.id,
                        "video_call": "unavailable",
                        "placeholder": true,
                    }))
                }
                None => TutorConnectResponse::rejected(&MarketplaceError::NoActiveSession),
            }
        }
        TutorConnectRequest::Wallet => {
            let market = state.marketplace.read().await;
            TutorConnectResponse::ok(views::wallet_view(market.wallet(), &state.config.wallet, currency))
        }
        TutorConnectRequest::TopUp => {
            let mut market = state.marketplace.write().await;
            let entry = match market.top_up(Utc::now()) {
                Some(entry) => views::wallet_entry_view(entry, currency),
                None => return TutorConnectResponse::err("Top-up amount must be positive"),
            };
            TutorConnectResponse::ok(serde_json::json!({
                "entry": entry,
                "wallet": views::wallet_view(market.wallet(), &state.config.wallet, currency),
            }))
        }
        TutorConnectRequest::History => {
            let market = state.marketplace.read().await;
            let top_ups: Vec<_> = market
                .wallet()
                .entries()
                .iter()
                .map(|e| views::wallet_entry_view(e, currency))
                .collect();
            let sessions: Vec<_> = market
                .history()
                .iter()
                .map(|s| views::summary_view(s, currency))
                .collect();
            TutorConnectResponse::ok(serde_json::json!({
                "top_ups": top_ups,
                "sessions": sessions,
            }))
        }
    }
}

async fn handle_connect(state: &AppState, tutor_id: &str, kind: ConnectKind) -> TutorConnectResponse {
    let currency = state.config.billing.currency_symbol.as_str();
    let mut market = state.marketplace.write().await;
    let now = Utc::now();
    if let Err(e) = market.connect(tutor_id, kind, now).map(|session| session.id) {
        tracing::debug!("Connect to {} rejected: {}", tutor_id, e);
        return TutorConnectResponse::rejected(&e);
    }

    let billing = market.billing(now);
    match market.active_session() {
        Some(session) => TutorConnectResponse::ok(views::session_view(session, billing.as_ref(), currency)),
        None => TutorConnectResponse::err("Session vanished after connect"),
    }
}

/// Append the student message, then schedule the simulated reply outside the lock.
async fn handle_send_message(state: &AppState, content: &str) -> TutorConnectResponse {
    let sent = {
        let mut market = state.marketplace.write().await;
        market.send_message(content, Utc::now())
    };

    match sent {
        Ok(sent) => {
            chat::schedule_reply(state.marketplace.clone(), &state.config.chat, sent.session_id);
            TutorConnectResponse::ok(serde_json::json!({
                "session_id": sent.session_id,
                "message": sent.message,
                "reply_pending": true,
            }))
        }
        Err(e) => TutorConnectResponse::rejected(&e),
    }
}

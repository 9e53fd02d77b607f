//! JSON projections of marketplace state, shared by the IPC and HTTP surfaces.
//! Every monetary value gets a `*_display` twin with the currency symbol.

use serde_json::{json, Value};
use tutorconnect_core::billing::{format_currency, format_elapsed};
use tutorconnect_core::config::{DirectoryConfig, WalletConfig};
use tutorconnect_core::directory::DirectoryStats;
use tutorconnect_core::models::{Session, SessionSummary, Tutor, Wallet, WalletEntry};
use tutorconnect_core::BillingSnapshot;

pub const EMPTY_DIRECTORY_HINT: &str = "No teachers found. Try adjusting your search or filters";

pub fn tutor_card(tutor: &Tutor, directory: &DirectoryConfig, currency: &str) -> Value {
    let (badges, more) = tutor.subject_badges(directory.card_subject_badges);
    json!({
        "id": tutor.id,
        "name": tutor.name,
        "avatar": tutor.avatar,
        "initials": tutor.initials(),
        "subjects": tutor.subjects,
        "subject_badges": badges,
        "more_subjects": more,
        "rating": tutor.rating,
        "rate_per_minute": tutor.rate_per_minute,
        "rate_display": format!("{}/min", format_currency(currency, tutor.rate_per_minute)),
        "status": tutor.status,
        "status_label": tutor.status.label(),
        "total_students": tutor.total_students,
        "can_connect": tutor.is_available(),
        "action_label": tutor.action_label(),
    })
}

pub fn stats_view(stats: &DirectoryStats, currency: &str) -> Value {
    json!({
        "total": stats.total,
        "online": stats.online,
        "busy": stats.busy,
        "avg_rate": stats.avg_rate,
        "avg_rate_display": format!("{}{:.0}/min", currency, stats.avg_rate),
    })
}

pub fn billing_view(snapshot: &BillingSnapshot, currency: &str) -> Value {
    json!({
        "elapsed_seconds": snapshot.elapsed_seconds,
        "elapsed_display": snapshot.elapsed_display(),
        "rate_per_minute": snapshot.rate_per_minute,
        "cost": snapshot.cost,
        "cost_display": format_currency(currency, snapshot.cost),
        "balance": snapshot.balance,
        "remaining": snapshot.remaining,
        "remaining_display": format_currency(currency, snapshot.remaining),
        "low_balance": snapshot.low_balance,
        "computed_at": snapshot.computed_at,
    })
}

pub fn session_view(session: &Session, billing: Option<&BillingSnapshot>, currency: &str) -> Value {
    json!({
        "id": session.id,
        "tutor": session.tutor,
        "rate_display": format!("{}/min", format_currency(currency, session.tutor.rate_per_minute)),
        "kind": session.kind,
        "is_active": session.is_active,
        "started_at": session.started_at,
        "messages": session.messages,
        "billing": billing.map(|b| billing_view(b, currency)),
    })
}

pub fn summary_view(summary: &SessionSummary, currency: &str) -> Value {
    json!({
        "session_id": summary.session_id,
        "tutor_id": summary.tutor_id,
        "tutor_name": summary.tutor_name,
        "kind": summary.kind,
        "started_at": summary.started_at,
        "ended_at": summary.ended_at,
        "elapsed_seconds": summary.elapsed_seconds,
        "elapsed_display": format_elapsed(summary.elapsed_seconds),
        "accrued_cost": summary.accrued_cost,
        "accrued_cost_display": format_currency(currency, summary.accrued_cost),
        "message_count": summary.message_count,
    })
}

pub fn wallet_entry_view(entry: &WalletEntry, currency: &str) -> Value {
    json!({
        "id": entry.id,
        "amount": entry.amount,
        "amount_display": format_currency(currency, entry.amount),
        "balance_after": entry.balance_after,
        "created_at": entry.created_at,
    })
}

pub fn wallet_view(wallet: &Wallet, config: &WalletConfig, currency: &str) -> Value {
    json!({
        "balance": wallet.balance(),
        "balance_display": format_currency(currency, wallet.balance()),
        "currency": currency,
        "top_up_amount": config.top_up_amount,
        "low_balance_hint": wallet.is_low(config.low_balance_threshold),
    })
}

//! In-memory marketplace state: directory, wallet, the single active session
//! and the history of ended sessions.
//!
//! Session lifecycle: NONE → ACTIVE (connect to an online tutor) → NONE (end).
//! Every rejected action leaves the state untouched.

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::billing::{self, BillingSnapshot};
use crate::config::{ChatConfig, TutorConnectConfig, WalletConfig};
use crate::directory;
use crate::error::MarketplaceError;
use crate::models::{
    ConnectKind, Message, PresenceStatus, Session, SessionSummary, Tutor, Wallet, WalletEntry,
};
use crate::presence::{self, PresenceChange};

/// A student message that was accepted, plus the session its reply belongs to.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub session_id: Uuid,
    pub message: Message,
}

#[derive(Debug, Clone)]
pub struct Marketplace {
    tutors: Vec<Tutor>,
    wallet: Wallet,
    top_up_amount: f64,
    greeting: Option<String>,
    active: Option<Session>,
    history: Vec<SessionSummary>,
}

impl Marketplace {
    pub fn new(tutors: Vec<Tutor>, wallet: &WalletConfig, chat: &ChatConfig) -> Self {
        Self {
            tutors,
            wallet: Wallet::new(wallet.initial_balance),
            top_up_amount: wallet.top_up_amount,
            greeting: chat.greeting.clone().filter(|g| !g.trim().is_empty()),
            active: None,
            history: Vec::new(),
        }
    }

    /// Marketplace seeded with the static tutor catalogue.
    pub fn from_config(config: &TutorConnectConfig) -> Self {
        Self::new(directory::seed_tutors(), &config.wallet, &config.chat)
    }

    pub fn tutors(&self) -> &[Tutor] {
        &self.tutors
    }

    pub fn tutor(&self, tutor_id: &str) -> Option<&Tutor> {
        self.tutors.iter().find(|t| t.id == tutor_id)
    }

    pub fn search(&self, query: &str, subject: Option<&str>) -> Vec<&Tutor> {
        directory::filter_tutors(&self.tutors, query, subject)
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.active.as_ref()
    }

    pub fn history(&self) -> &[SessionSummary] {
        &self.history
    }

    /// Start a session with an online tutor and mark the tutor busy.
    pub fn connect(
        &mut self,
        tutor_id: &str,
        kind: ConnectKind,
        now: DateTime<Utc>,
    ) -> Result<&Session, MarketplaceError> {
        if let Some(active) = &self.active {
            return Err(MarketplaceError::SessionAlreadyActive(active.id));
        }

        let tutor = self
            .tutors
            .iter_mut()
            .find(|t| t.id == tutor_id)
            .ok_or_else(|| MarketplaceError::TutorNotFound(tutor_id.to_string()))?;

        if !tutor.is_available() {
            return Err(MarketplaceError::TutorUnavailable {
                tutor_id: tutor.id.clone(),
                status: tutor.status,
            });
        }

        tutor.status = PresenceStatus::Busy;
        let mut session = Session::start(tutor, kind, now);
        if let Some(greeting) = &self.greeting {
            session.push(Message::teacher(greeting.clone(), now));
        }

        tracing::info!(
            "Session {} started with {} ({:?}, {}/min)",
            session.id,
            session.tutor.name,
            kind,
            session.tutor.rate_per_minute
        );
        Ok(&*self.active.insert(session))
    }

    /// Append a student message to the active session.
    pub fn send_message(
        &mut self,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<SentMessage, MarketplaceError> {
        if content.trim().is_empty() {
            return Err(MarketplaceError::EmptyMessage);
        }
        let session = self.active.as_mut().ok_or(MarketplaceError::NoActiveSession)?;
        let message = Message::student(content, now);
        session.push(message.clone());
        Ok(SentMessage {
            session_id: session.id,
            message,
        })
    }

    /// Deliver a tutor reply, but only into the session that asked for it.
    pub fn deliver_reply(
        &mut self,
        session_id: Uuid,
        content: &str,
        now: DateTime<Utc>,
    ) -> Option<&Message> {
        match self.active.as_mut() {
            Some(session) if session.id == session_id => {
                session.push(Message::teacher(content, now));
                session.messages.last()
            }
            _ => None,
        }
    }

    /// End the active session, put the tutor back online and record a summary.
    /// The accrued cost is recorded but not debited.
    pub fn end_session(&mut self, now: DateTime<Utc>) -> Result<SessionSummary, MarketplaceError> {
        let mut session = self.active.take().ok_or(MarketplaceError::NoActiveSession)?;
        session.is_active = false;

        if let Some(tutor) = self
            .tutors
            .iter_mut()
            .find(|t| t.id == session.tutor.tutor_id)
        {
            tutor.status = PresenceStatus::Online;
        }

        let elapsed = billing::elapsed_seconds(session.started_at, now);
        let summary = SessionSummary {
            session_id: session.id,
            tutor_id: session.tutor.tutor_id.clone(),
            tutor_name: session.tutor.name.clone(),
            kind: session.kind,
            started_at: session.started_at,
            ended_at: now,
            elapsed_seconds: elapsed,
            accrued_cost: billing::accrued_cost(elapsed, session.tutor.rate_per_minute),
            message_count: session.messages.len(),
        };

        tracing::info!(
            "Session {} with {} ended after {}s",
            summary.session_id,
            summary.tutor_name,
            summary.elapsed_seconds
        );
        self.history.push(summary.clone());
        Ok(summary)
    }

    /// Add the configured top-up amount to the wallet.
    pub fn top_up(&mut self, now: DateTime<Utc>) -> Option<&WalletEntry> {
        let entry = self.wallet.top_up(self.top_up_amount, now);
        if let Some(e) = entry {
            tracing::info!("Wallet topped up by {:.2}, balance {:.2}", e.amount, e.balance_after);
        }
        entry
    }

    pub fn billing(&self, now: DateTime<Utc>) -> Option<BillingSnapshot> {
        self.active
            .as_ref()
            .map(|s| BillingSnapshot::compute(s, self.wallet.balance(), now))
    }

    pub fn tick_presence<R: Rng + ?Sized>(
        &mut self,
        flip_probability: f64,
        rng: &mut R,
    ) -> Vec<PresenceChange> {
        presence::simulate_tick(&mut self.tutors, flip_probability, rng)
    }
}

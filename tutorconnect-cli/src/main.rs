//! tutorconnect-cli — terminal frontend for the TutorConnect server
//!
//! Renders the landing screen, the tutor dashboard and the chat screen as text
//! by talking to the server's HTTP API.
//!
//! # Subcommands
//! - `welcome`                               — landing screen
//! - `tutors [--search <q>] [--subject <s>]` — dashboard directory
//! - `subjects`                              — quick subject filters
//! - `connect <tutor_id> [--video]`          — start a session
//! - `send <text>`                           — message the tutor
//! - `session` / `watch`                     — chat screen, live billing readout
//! - `end`, `video`                          — end session, start video (placeholder)
//! - `wallet`, `top-up`, `history`           — wallet card
//! - `status`                                — server health

use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8787";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "tutorconnect-cli",
    version,
    about = "TutorConnect — find a tutor, chat pay-per-minute, track your wallet"
)]
struct Cli {
    /// TutorConnect HTTP server URL (overrides TUTORCONNECT_HTTP_URL env var)
    #[arg(long, env = "TUTORCONNECT_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the landing screen
    Welcome,

    /// Browse tutors (dashboard)
    Tutors {
        /// Free-text search over names and subjects
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only tutors teaching exactly this subject
        #[arg(long)]
        subject: Option<String>,
    },

    /// List subjects and quick filters
    Subjects,

    /// Start a session with an online tutor
    Connect {
        tutor_id: String,

        /// Connect by video instead of chat
        #[arg(long)]
        video: bool,
    },

    /// Send a message in the active session
    Send {
        /// Message text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show the active session (chat screen)
    Session,

    /// Follow the elapsed time and cost of the active session
    Watch {
        /// Stop after this many seconds (runs until the session ends otherwise)
        #[arg(long)]
        seconds: Option<u64>,
    },

    /// End the active session
    End,

    /// Start a video call in the active session
    Video,

    /// Show the wallet balance
    Wallet,

    /// Add the standard top-up amount to the wallet
    TopUp,

    /// Show top-ups and past sessions
    History,

    /// Show server status
    Status,

    /// Log in (not available yet)
    Login,

    /// Sign up (not available yet)
    Signup,

    /// Apply to teach (not available yet)
    BecomeTeacher,
}

// ============================================================================
// HTTP Client
// ============================================================================

struct Api {
    client: reqwest::blocking::Client,
    server: String,
}

impl Api {
    fn new(server: &str) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            server: server.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server, path)
    }

    fn get(&self, path: &str) -> anyhow::Result<Value> {
        self.finish(path, self.client.get(self.url(path)).send())
    }

    fn get_with(&self, path: &str, query: &[(&str, &str)]) -> anyhow::Result<Value> {
        self.finish(path, self.client.get(self.url(path)).query(query).send())
    }

    fn post(&self, path: &str, body: Value) -> anyhow::Result<Value> {
        self.finish(path, self.client.post(self.url(path)).json(&body).send())
    }

    fn delete(&self, path: &str) -> anyhow::Result<Value> {
        self.finish(path, self.client.delete(self.url(path)).send())
    }

    /// Like `get`, but a 404 becomes `None` instead of an error.
    fn get_optional(&self, path: &str) -> anyhow::Result<Option<Value>> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .map_err(|e| anyhow::anyhow!("cannot reach {} — {}", self.url(path), e))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.finish(path, Ok(resp)).map(Some)
    }

    fn finish(
        &self,
        path: &str,
        resp: reqwest::Result<reqwest::blocking::Response>,
    ) -> anyhow::Result<Value> {
        let resp = resp.map_err(|e| anyhow::anyhow!("cannot reach {} — {}", self.url(path), e))?;
        let status = resp.status();
        let body: Value = resp.json().unwrap_or_default();
        if !status.is_success() {
            let msg = body["error"].as_str().unwrap_or("unknown error");
            anyhow::bail!("server returned {}: {}", status, msg);
        }
        Ok(body)
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn text<'a>(value: &'a Value, key: &str) -> &'a str {
    value[key].as_str().unwrap_or("")
}

pub fn render_landing(page: &Value) -> String {
    let mut out = String::new();
    out.push_str(&format!("🎓 {}\n\n", text(page, "product")));
    out.push_str(&format!("{}\n{}\n\n", text(page, "headline"), text(page, "tagline")));
    if let Some(features) = page["features"].as_array() {
        for f in features {
            out.push_str(&format!("  • {} — {}\n", text(f, "title"), text(f, "description")));
        }
    }
    out.push_str(&format!("\n{}\n", text(page, "closing_call")));
    out.push_str(&format!(
        "\nRun `tutorconnect-cli tutors` to {} / {}.\n",
        text(page, "primary_action"),
        text(page, "secondary_action")
    ));
    out
}

pub fn render_tutor_card(card: &Value) -> String {
    let badges: Vec<&str> = card["subject_badges"]
        .as_array()
        .map(|a| a.iter().filter_map(|b| b.as_str()).collect())
        .unwrap_or_default();
    let more = card["more_subjects"].as_u64().unwrap_or(0);
    let mut subjects = badges.join(", ");
    if more > 0 {
        subjects.push_str(&format!(" +{} more", more));
    }

    let dot = match text(card, "status") {
        "online" => "🟢",
        "busy" => "🟡",
        _ => "⚪",
    };

    format!(
        "[{}] {} ({})  {} {}\n    ⭐ {:.1} ({} students)  {}\n    {}  → {}\n",
        text(card, "id"),
        text(card, "name"),
        text(card, "initials"),
        dot,
        text(card, "status_label"),
        card["rating"].as_f64().unwrap_or(0.0),
        card["total_students"].as_u64().unwrap_or(0),
        text(card, "rate_display"),
        subjects,
        text(card, "action_label"),
    )
}

pub fn render_directory(listing: &Value) -> String {
    let count = listing["count"].as_u64().unwrap_or(0);
    let stats = &listing["stats"];
    let mut out = format!("Available Teachers ({})", count);
    if !stats.is_null() {
        out.push_str(&format!(
            "  🟢 {} Online  🟡 {} Busy",
            stats["online"].as_u64().unwrap_or(0),
            stats["busy"].as_u64().unwrap_or(0)
        ));
    }
    out.push_str("\n\n");
    if let Some(tutors) = listing["tutors"].as_array() {
        for card in tutors {
            out.push_str(&render_tutor_card(card));
            out.push('\n');
        }
    }
    if let Some(hint) = listing["empty_hint"].as_str() {
        out.push_str(hint);
        out.push('\n');
    }
    if !stats.is_null() {
        out.push_str(&format!(
            "\nQuick Stats\n  Total Teachers: {}\n  Online Now: {}\n  Avg. Rate: {}\n",
            stats["total"].as_u64().unwrap_or(0),
            stats["online"].as_u64().unwrap_or(0),
            text(stats, "avg_rate_display")
        ));
    }
    out
}

pub fn render_billing_line(billing: &Value) -> String {
    let mut line = format!(
        "⏱ {}  💰 {}",
        text(billing, "elapsed_display"),
        text(billing, "cost_display")
    );
    if billing["low_balance"].as_bool().unwrap_or(false) {
        line.push_str(&format!(
            "  ⚠️ Low balance: {} remaining",
            text(billing, "remaining_display")
        ));
    }
    line
}

pub fn render_session(session: &Value) -> String {
    let mut out = format!(
        "Session with {} ({}, {})\n",
        text(&session["tutor"], "name"),
        text(session, "kind"),
        text(session, "rate_display"),
    );
    if !session["billing"].is_null() {
        out.push_str(&render_billing_line(&session["billing"]));
        out.push('\n');
    }
    out.push('\n');
    if let Some(messages) = session["messages"].as_array() {
        for m in messages {
            let who = match text(m, "sender") {
                "student" => "You",
                _ => "Tutor",
            };
            out.push_str(&format!("{:>5}: {}\n", who, text(m, "content")));
        }
    }
    out
}

pub fn render_wallet(wallet: &Value) -> String {
    let mut out = format!("Wallet Balance: {}\n", text(wallet, "balance_display"));
    if wallet["low_balance_hint"].as_bool().unwrap_or(false) {
        out.push_str("💡 Low balance! Top up to continue learning.\n");
    }
    out
}

pub fn render_history(history: &Value) -> String {
    let mut out = String::from("Top-ups:\n");
    match history["top_ups"].as_array() {
        Some(entries) if !entries.is_empty() => {
            for e in entries {
                out.push_str(&format!(
                    "  + {}  ({})\n",
                    text(e, "amount_display"),
                    text(e, "created_at")
                ));
            }
        }
        _ => out.push_str("  none\n"),
    }
    out.push_str("Sessions:\n");
    match history["sessions"].as_array() {
        Some(sessions) if !sessions.is_empty() => {
            for s in sessions {
                out.push_str(&format!(
                    "  {} — {} — {} ({} messages)\n",
                    text(s, "tutor_name"),
                    text(s, "elapsed_display"),
                    text(s, "accrued_cost_display"),
                    s["message_count"].as_u64().unwrap_or(0)
                ));
            }
        }
        _ => out.push_str("  none\n"),
    }
    out
}

// ============================================================================
// Commands
// ============================================================================

fn do_watch(api: &Api, seconds: Option<u64>) -> anyhow::Result<()> {
    let mut ticks = 0u64;
    loop {
        match api.get_optional("/sessions/current")? {
            Some(session) => println!("{}", render_billing_line(&session["billing"])),
            None => {
                println!("No active session.");
                return Ok(());
            }
        }
        ticks += 1;
        if seconds.is_some_and(|limit| ticks >= limit) {
            return Ok(());
        }
        std::thread::sleep(Duration::from_secs(1));
    }
}

fn do_status(api: &Api) -> anyhow::Result<()> {
    let body = api.get("/health")?;
    println!("TutorConnect server: {}", text(&body, "status"));
    println!("Version:             {}", text(&body, "version"));
    println!("Tutors:              {}", body["tutors"]);
    println!("Online:              {}", body["online"]);
    match body["active_session"].as_str() {
        Some(id) => println!("Active session:      {}", id),
        None => println!("Active session:      none"),
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let api = Api::new(&cli.server)?;

    match cli.command {
        Commands::Welcome => print!("{}", render_landing(&api.get("/landing")?)),
        Commands::Tutors { search, subject } => {
            let mut query = vec![("query", search.as_str())];
            if let Some(s) = subject.as_deref() {
                query.push(("subject", s));
            }
            print!("{}", render_directory(&api.get_with("/tutors", &query)?));
        }
        Commands::Subjects => {
            let body = api.get("/subjects")?;
            let quick: Vec<&str> = body["quick_filters"]
                .as_array()
                .map(|a| a.iter().filter_map(|s| s.as_str()).collect())
                .unwrap_or_default();
            println!("All Subjects | {}", quick.join(" | "));
        }
        Commands::Connect { tutor_id, video } => {
            let kind = if video { "video" } else { "chat" };
            let session = api.post("/sessions", serde_json::json!({"tutor_id": tutor_id, "kind": kind}))?;
            print!("{}", render_session(&session));
        }
        Commands::Send { text: words } => {
            let content = words.join(" ");
            api.post("/sessions/current/messages", serde_json::json!({"content": content}))?;
            println!("Sent. The tutor is typing...");
        }
        Commands::Session => match api.get_optional("/sessions/current")? {
            Some(session) => print!("{}", render_session(&session)),
            None => println!("No active session."),
        },
        Commands::Watch { seconds } => do_watch(&api, seconds)?,
        Commands::End => {
            let body = api.delete("/sessions/current")?;
            let s = &body["summary"];
            println!(
                "Session with {} ended after {} ({} accrued).",
                text(s, "tutor_name"),
                text(s, "elapsed_display"),
                text(s, "accrued_cost_display")
            );
        }
        Commands::Video => {
            api.post("/sessions/current/video", serde_json::json!({}))?;
            println!("Video calling is not available yet.");
        }
        Commands::Wallet => print!("{}", render_wallet(&api.get("/wallet")?)),
        Commands::TopUp => {
            let body = api.post("/wallet/top-up", serde_json::json!({}))?;
            println!("Added {}.", text(&body["entry"], "amount_display"));
            print!("{}", render_wallet(&body["wallet"]));
        }
        Commands::History => print!("{}", render_history(&api.get("/wallet/history")?)),
        Commands::Status => do_status(&api)?,
        Commands::Login | Commands::Signup | Commands::BecomeTeacher => {
            println!("Accounts are not available yet.");
        }
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("tutorconnect-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

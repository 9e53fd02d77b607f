use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TutorConnectConfig {
    pub service: ServiceConfig,
    pub http: HttpConfig,
    pub directory: DirectoryConfig,
    pub presence: PresenceConfig,
    pub billing: BillingConfig,
    pub wallet: WalletConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub socket_path: String,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            socket_path: "/tmp/tutorconnect.sock".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DirectoryConfig {
    /// How many subjects are offered as quick filters next to "All Subjects".
    pub quick_filter_limit: usize,
    /// Subject badges shown on a tutor card before "+N more".
    pub card_subject_badges: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            quick_filter_limit: 8,
            card_subject_badges: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PresenceConfig {
    pub tick_seconds: u64,
    /// Chance per tutor per tick of advancing to the next status.
    pub flip_probability: f64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 5,
            flip_probability: 0.1,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BillingConfig {
    pub tick_seconds: u64,
    pub currency_symbol: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 1,
            currency_symbol: "₹".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WalletConfig {
    pub initial_balance: f64,
    pub top_up_amount: f64,
    /// Wallet card hint, independent of the per-session low-balance warning.
    pub low_balance_threshold: f64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            initial_balance: 127.50,
            top_up_amount: 100.0,
            low_balance_threshold: 50.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChatConfig {
    pub greeting: Option<String>,
    pub reply_text: String,
    pub reply_min_ms: u64,
    pub reply_max_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: Some(
                "Hello! I'm ready to help you with your questions. What would you like to learn today?"
                    .to_string(),
            ),
            reply_text: "That's a great question! Let me explain that concept...".to_string(),
            reply_min_ms: 1000,
            reply_max_ms: 3000,
        }
    }
}

impl TutorConnectConfig {
    /// Load from a TOML file (optional) and `TUTORCONNECT__SECTION__KEY`
    /// environment overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("TUTORCONNECT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.presence.flip_probability) {
            return Err(ConfigError::Message(format!(
                "presence.flip_probability must be within 0..=1, got {}",
                self.presence.flip_probability
            )));
        }
        if self.presence.tick_seconds == 0 || self.billing.tick_seconds == 0 {
            return Err(ConfigError::Message(
                "tick_seconds must be greater than zero".to_string(),
            ));
        }
        if self.chat.reply_min_ms > self.chat.reply_max_ms {
            return Err(ConfigError::Message(format!(
                "chat.reply_min_ms ({}) exceeds chat.reply_max_ms ({})",
                self.chat.reply_min_ms, self.chat.reply_max_ms
            )));
        }
        let wallet = &self.wallet;
        if !wallet.top_up_amount.is_finite() || !wallet.initial_balance.is_finite() {
            return Err(ConfigError::Message(format!(
                "wallet amounts must be finite, got initial_balance {} and top_up_amount {}",
                wallet.initial_balance, wallet.top_up_amount
            )));
        }
        if wallet.top_up_amount <= 0.0 || wallet.initial_balance < 0.0 {
            return Err(ConfigError::Message(
                "wallet amounts must be non-negative and top_up_amount positive".to_string(),
            ));
        }
        Ok(())
    }
}

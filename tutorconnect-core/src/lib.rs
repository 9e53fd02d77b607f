pub mod billing;
pub mod config;
pub mod directory;
pub mod error;
pub mod ipc;
pub mod landing;
pub mod marketplace;
pub mod models;
pub mod presence;

pub use billing::BillingSnapshot;
pub use config::TutorConnectConfig;
pub use error::{MarketplaceError, TutorConnectError};
pub use marketplace::{Marketplace, SentMessage};
pub use presence::PresenceChange;

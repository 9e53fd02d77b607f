pub mod message;
pub mod session;
pub mod tutor;
pub mod wallet;

pub use message::{Message, Sender};
pub use session::{ConnectKind, Session, SessionSummary, TutorSnapshot};
pub use tutor::{PresenceStatus, Tutor};
pub use wallet::{Wallet, WalletEntry};

//! Event Form - Telegram Mini-App form service
//!
//! Serves a form for requesting content updates to event listings and
//! handles what it sends back:
//! - rule-based improvement of free-text fields
//! - persistence of each submission to its own JSON file
//! - an append-only aggregate log of every submission
//!
//! # Example
//!
//! ```ignore
//! use event_form::{Config, start_server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     start_server(Config::load(None)?).await
//! }
//! ```

pub mod types;
pub mod error;
pub mod config;
pub mod improver;
pub mod store;
pub mod server;
pub mod cli;

pub use config::Config;
pub use error::{AppError, StoreError};
pub use improver::{improve, Improver, RuleBasedImprover};
pub use server::{router, ServerState, start as start_server};
pub use store::SubmissionStore;
pub use types::Submission;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

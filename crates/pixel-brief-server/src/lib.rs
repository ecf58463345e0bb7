//! Local web server for the brief builder.
//!
//! Serves the builder page, the live preview endpoint, saving, document
//! export and a WebSocket feed that tells open pages when an order is saved.

pub mod error;
pub mod feed;
pub mod server;

pub use error::ApiError;
pub use feed::{FeedMessage, HistoryFeed};
pub use server::{router, AppState, BriefServer, ServerConfig, ServerError};

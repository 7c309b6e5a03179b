//! HTTP server module.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                              │
//! │  - Path / multipart parsing and validation               │
//! │  - JSON serialization, CORS, compression, error mapping  │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                               │
//! │  - Prober, aggregator, baseline loader, merger           │
//! └─────────┬───────────────────────────────┬────────────────┘
//!           │                               │
//! ┌─────────▼──────────────┐   ┌────────────▼───────────────┐
//! │  Issue source (jira/)  │   │  Baseline files (on disk)  │
//! └────────────────────────┘   └────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;

//! # Withle - Pet funeral home catalog and memorial proxies
//!
//! Withle loads the national pet funeral home registry from CSV exports
//! (curated sheet or 농림축산식품부 open data), normalizes and enriches the
//! listings, and serves them over HTTP next to two thin proxies: memorial
//! chat (generative-language API) and 3D avatar generation (Tripo API).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│   Catalog   │────▶│  JSON array │
//! │ (UTF8/EUCKR)│     │ (enc+quote) │     │ (map+enrich)│     │  (listings) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use withle::catalog::{load_catalog, LoadOptions};
//! use std::path::Path;
//!
//! fn main() {
//!     let catalog = load_catalog(
//!         Path::new("data/detail_information.csv"),
//!         &LoadOptions::default(),
//!     ).unwrap();
//!     println!("Loaded {} listings", catalog.homes.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (FuneralHome, PriceTiers)
//! - [`parser`] - Encoding resolution and CSV field parsing
//! - [`catalog`] - Profiles, normalization, enrichment, pipeline
//! - [`chat`] - Memorial chat proxy client
//! - [`tripo`] - 3D avatar generation proxy client
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Catalog pipeline
pub mod catalog;

// External proxies
pub mod chat;
pub mod tripo;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CatalogError,
    ChatError,
    CsvError,
    ServerError,
    TripoError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{FuneralHome, Open24h, PriceTiers};

// =============================================================================
// Re-exports - Parser
// =============================================================================

pub use parser::{detect_charset, parse_line, resolve_encoding, split_rows, Decoded};

// =============================================================================
// Re-exports - Catalog
// =============================================================================

pub use catalog::{
    load_catalog,
    load_catalog_bytes,
    Catalog,
    CatalogInfo,
    ColumnMap,
    Enrichment,
    LoadOptions,
    Profile,
};

// =============================================================================
// Re-exports - Proxies
// =============================================================================

pub use chat::{mock_reply, ChatClient};
pub use tripo::{demo_fallback, poll_task, TaskState, TripoClient, DEMO_MODEL_URL};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ChatRequest, ChatResponse, TripoRequest};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}

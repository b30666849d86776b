//! Morel Server - HTTP backend for the morel menu
//!
//! A single-binary backend serving the item catalog over REST, pushing
//! committed changes to subscribers over SSE, and storing uploaded images
//! on disk:
//!
//! - **Routes**: the REST surface, with bearer-token auth on mutations
//! - **Events**: the `/api/events` change stream with keep-alives
//! - **Assets**: upload validation, slugged storage names, serving
//! - **State**: database handle, session table, and change broadcast
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                        Server                        │
//! │  ┌────────┐   commit   ┌────────┐                    │
//! │  │ routes │───────────▶│ ItemDb │                    │
//! │  └────────┘            └────────┘                    │
//! │      │ publish                                       │
//! │      ▼                                               │
//! │  ┌───────────┐   frames   ┌─────────────────────┐    │
//! │  │ broadcast │───────────▶│  /api/events (SSE)  │    │
//! │  └───────────┘            └─────────────────────┘    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use morel_server::{Config, ServerState};
//! use morel_store::ItemDb;
//! use std::sync::Arc;
//!
//! let config = Config::load("storefront.ron")?;
//! let db = ItemDb::open(&config.database_path)?;
//! let state = Arc::new(ServerState::new(db, config));
//! morel_server::run(state).await?;
//! ```

mod assets;
mod config;
mod error;
mod events;
mod routes;
mod server;
mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use server::run;
pub use state::{ServerState, Session};

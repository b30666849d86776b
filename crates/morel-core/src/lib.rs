//! Morel Core - Catalog domain model for a live-updating storefront
//!
//! This crate provides the types every other morel crate builds on:
//! - The `MenuItem` entity with its draft and patch payloads
//! - `Catalog`, the ordered id-keyed collection with idempotent merge
//!   transitions shared by local mutations and inbound change events
//! - `ChangeEvent`, one committed change as seen on the change feed
//! - Pure projections: the public `MenuView` and the admin filter/sort
//! - Draft validation with per-field messages
//! - The snake-cased wire rows and their explicit domain mapping
//!
//! Nothing here performs IO; persistence, transport and serving live in
//! `morel-store`, `morel-sync` and `morel-server`.

mod admin;
mod catalog;
mod error;
mod event;
mod item;
mod menu;
mod validate;
pub mod wire;

pub use admin::{compare, sort, ItemFilter, SortDirection, SortKey, COLOR_OPTIONS, DELETE_PROMPT};
pub use catalog::Catalog;
pub use error::{Error, Result};
pub use event::ChangeEvent;
pub use item::{Category, ItemDraft, ItemId, ItemPatch, MenuItem, Potency, Tier, DEFAULT_COLOR};
pub use menu::MenuView;
pub use validate::{validate_draft, FieldError, ValidationErrors};

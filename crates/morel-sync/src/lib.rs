//! Morel Sync - Client-side menu synchronization
//!
//! This crate keeps a local mirror of the morel item set consistent with a
//! store and with other writers:
//!
//! - **Synchronizer**: store-acknowledged mutations over a local catalog
//! - **ItemStore**: the backend seam, with in-memory and HTTP implementations
//! - **ChangeFeed**: reconnecting change subscription with resync markers
//! - **Upload helpers**: image validation and asset transfer
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                       Client                           │
//! │  ┌──────────────┐   mutations   ┌───────────────────┐  │
//! │  │ Synchronizer │──────────────▶│     ItemStore     │  │
//! │  │  (Catalog)   │               │ (memory | remote) │  │
//! │  └──────────────┘               └───────────────────┘  │
//! │         ▲                                 │            │
//! │         │ apply_event      ┌────────────┐│ committed  │
//! │         └──────────────────│ ChangeFeed │◀ rows       │
//! │                            └────────────┘  as events  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use morel_sync::{ChangeFeed, FeedItem, RemoteStore, Synchronizer};
//!
//! let mut store = RemoteStore::new("http://127.0.0.1:8420");
//! store.sign_in("admin", "secret").await?;
//! let mut sync = Synchronizer::new(store);
//!
//! // Mirror the remote set, then mutate through the synchronizer.
//! sync.load().await?;
//! let id = sync.add(draft).await?;
//! sync.toggle_active(&id).await?;
//!
//! // Merge what other writers do.
//! let mut feed = ChangeFeed::new("http://127.0.0.1:8420");
//! loop {
//!     match feed.next().await {
//!         FeedItem::Resync => sync.load().await?,
//!         FeedItem::Change(event) => sync.apply_event(event),
//!     }
//! }
//! ```

mod error;
mod feed;
mod remote;
mod sse;
mod store;
mod synchronizer;
mod upload;

pub use error::{Result, StoreError, SyncError};
pub use feed::{ChangeFeed, FeedItem};
pub use remote::RemoteStore;
pub use sse::{SseFrame, SseParser};
pub use store::{ItemStore, MemoryStore};
pub use synchronizer::{Notice, NoticeKind, Synchronizer};
pub use upload::{
    delete_image, upload_image, validate_image, UploadError, ALLOWED_IMAGE_TYPES, MAX_IMAGE_BYTES,
};

// Re-export the domain types callers hold
pub use morel_core::{Catalog, ChangeEvent, ItemDraft, ItemId, ItemPatch, MenuItem};

//! Cadence Core
//!
//! Domain types, identifiers and the error taxonomy for the Cadence media
//! catalog.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Album`, `Playlist`, `User` and the hydrated views
//! - **Store Trait**: `CatalogStore`, the operations the HTTP layer relies on
//! - **Error Handling**: `CatalogError` with a stable `ErrorKind`
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{Playlist, PlaylistId, Privacy, UserId};
//!
//! let playlist = Playlist {
//!     id: PlaylistId::new(1),
//!     title: "Drive".to_string(),
//!     creator_id: UserId::new(1),
//!     cover_url: None,
//!     privacy: Privacy::Private,
//!     created_at: cadence_core::timestamp::now(),
//!     updated_at: cadence_core::timestamp::now(),
//! };
//!
//! assert!(playlist.is_visible_to(Some(UserId::new(1))));
//! assert!(!playlist.is_visible_to(Some(UserId::new(2))));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod store;
pub mod timestamp;
pub mod types;

// Re-export commonly used types
pub use error::{CatalogError, ErrorKind, Result};
pub use store::CatalogStore;

pub use types::{
    Album, AlbumId, CreateAlbum, CreatePlaylist, CreateTrack, CreateUser, HydratedAlbum,
    HydratedPlaylist, Playlist, PlaylistId, PlaylistMembership, Privacy, Role, Track, TrackId,
    TrackWithArtist, UpdatePlaylist, User, UserId,
};

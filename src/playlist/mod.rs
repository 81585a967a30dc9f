//! Playlist handling
//!
//! Fetched master playlists are passed through unchanged except for their
//! segment references, which are rewritten to route back through the proxy.

pub mod rewrite;

pub use rewrite::rewrite_segments;

//! Integration testing module
//!
//! End-to-end tests of the proxy router against a mocked upstream:
//! - Segment pass-through
//! - Discovery in page bodies and external scripts
//! - Share link resolution through the download API
//! - Redirect and rewrite response variants

pub mod fixtures;

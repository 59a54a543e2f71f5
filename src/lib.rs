//! Minimal document blob store.
//!
//! Clients upload base64 content over HTTP and get back a short opaque
//! identifier; the same identifier fetches the bytes and their optional
//! filename. Documents live as plain files under a storage root, which the
//! `preload` binary can seed directly.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

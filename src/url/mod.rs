//! URL handling module for seoscope
//!
//! Provides URL normalization, href resolution against a base document,
//! and host extraction for internal/external classification.

mod host;
mod normalize;

pub use host::{extract_host, is_internal};
pub use normalize::{normalize_url, resolve_href};

//! Configuration module for seoscope
//!
//! A crawl run is described by a single [`CrawlConfig`], loadable from a
//! TOML file or assembled from CLI flags; either path goes through the
//! same validation.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::CrawlConfig;
pub use validation::validate;

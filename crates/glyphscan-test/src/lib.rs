//! glyphscan-test - Regression test framework for glyphscan
//!
//! This crate provides the shared pieces of the regression tests:
//!
//! - [`RegParams`] - Named sequence of checks reported together at cleanup
//! - [`render_text`] - Synthetic page images drawn from the bundled font
//! - Asset paths and logger setup
//!
//! # Usage
//!
//! ```ignore
//! use glyphscan_test::{RegParams, RenderOptions, render_text};
//!
//! let mut rp = RegParams::new("digits");
//! let page = render_text("0123456789", &RenderOptions::default()).unwrap();
//! rp.compare_values(47.0, page.height() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display"
//! - `RUST_LOG`: Filter for the test logger installed by [`init_logger`]

mod error;
mod params;
mod render;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
pub use render::{
    FIXTURE_FONT, Font, RenderOptions, blank_page, dump_grid, render_text, render_text_with,
};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // glyphscan-test is at crates/glyphscan-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to a bundled asset
pub fn asset_path(name: &str) -> String {
    format!("{}/assets/{}", workspace_root(), name)
}

/// Path of the bundled template catalog
pub fn templates_path() -> String {
    asset_path("templates.json")
}

/// Path of the bundled correction dictionary
pub fn dictionary_path() -> String {
    asset_path("dictionary.txt")
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// Install `env_logger` for the current test binary
///
/// Safe to call from every test; only the first call installs the logger.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

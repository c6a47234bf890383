//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Sample-record generation prompt
pub const SAMPLE: &str = include_str!("../../prompts/sample.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "sample" => Some(SAMPLE),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

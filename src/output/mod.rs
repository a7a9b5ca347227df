//! Result output
//!
//! Colored step lines while a run streams, then a text or JSON summary.

mod formatter;

pub use formatter::{OutputFormat, ResultFormatter};

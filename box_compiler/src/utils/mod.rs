//! Shared primitive types used by the scanner, the rule walker and logging.

pub mod span;

pub use span::{Position, Span};

// Internal modules
pub mod batch;
pub mod config;
pub mod file_processor;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use lexical::{LexerError, RuneReader, Scanner};
pub use pipeline::{PipelineError, PipelineResult};
pub use syntax::{RuleWalker, SyntaxError};
pub use tokens::{Token, TokenKind};

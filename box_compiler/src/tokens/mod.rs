//! Token model for box lexical analysis
//!
//! The scanner produces [`Token`] values of four kinds: keywords, identifiers,
//! operators and separators. Each token records the line, column and
//! character index of its first rune.
//!
//! ## Components
//!
//! - **[`Token`]** / **[`TokenKind`]** - classified tokens
//! - **[`TokenStream`]** - in-memory sequence with a forward cursor
//! - **[`dump`]** - the `.bo` record format written next to the source file
//!
//! The file pipeline streams tokens straight from the scanner into the dump
//! writer and the rule walker, so a full `TokenStream` is only materialized
//! when scanning strings or decoding dumps.

pub mod dump;
pub mod stream;
pub mod token;

pub use dump::{decode_dump, dump_path_for, DumpError, DumpReader, DumpRecord, DumpWriter};
pub use stream::TokenStream;
pub use token::{Token, TokenKind};

pub use crate::utils::{Position, Span};

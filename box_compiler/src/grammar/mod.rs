//! Grammar definitions for box: classification tables and the rule chain

pub mod keywords;
pub mod rules;

pub use keywords::{is_reserved_keyword, Keyword, Operator, Separator};
pub use rules::{RuleDescriptor, PACKAGE_DECLARATION};

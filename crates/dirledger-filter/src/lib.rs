//! # dirledger-filter
//!
//! Search filter engine for the dirledger directory suite, implementing
//! the RFC 2254 filter grammar over the RFC 2251 filter structure.
//!
//! ## Features
//!
//! - **Text to tree**: hand-written recursive-descent parser from filter
//!   strings to a typed [`Filter`] tree, with LDAPv2 escape upgrade and
//!   bare-expression wrapping
//! - **Tree to text**: renderer back to RFC 2254 form; `Display` on
//!   [`Filter`] round-trips through the parser
//! - **Programmatic construction**: [`FilterBuilder`] assembles a tree
//!   step by step under the grammar's sequencing rules
//! - **Traversal**: [`Filter::walk`] yields a tag-then-fields event
//!   stream suitable for BER serialization
//! - **Octets, not characters**: assertion values are raw octets;
//!   UTF-8 conversion is centralized in the [`escape`] codec
//! - **Sans-I/O**: no transport, no suspension; parsing and building
//!   are bounded by input length
//!
//! ## Quick Start
//!
//! ```
//! use dirledger_filter::{Filter, FilterParser, FilterTag};
//!
//! let filter = FilterParser::parse("(&(objectClass=person)(cn=Babs J*))")?;
//! assert_eq!(filter.tag(), FilterTag::And);
//! assert_eq!(filter.to_string(), "(&(objectClass=person)(cn=Babs J*))");
//!
//! // The same tree, built programmatically.
//! use dirledger_filter::{FilterBuilder, Substring};
//!
//! let mut builder = FilterBuilder::new();
//! builder.start_nested_filter(FilterTag::And)?;
//! builder.add_assertion(FilterTag::EqualityMatch, "objectClass", "person")?;
//! builder.start_substrings("cn")?;
//! builder.add_substring(Substring::Initial("Babs J".into()))?;
//! builder.end_substrings()?;
//! builder.end_nested_filter(FilterTag::And)?;
//! assert_eq!(builder.build()?, filter);
//! # Ok::<(), dirledger_filter::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`parser`]: filter text parser with preprocessing and balance
//!   checks
//! - [`builder`]: stateful filter construction
//! - [`types`]: the filter tree and its validated newtypes
//! - [`walk`]: event-stream traversal
//! - [`render`]: textual rendering
//! - [`escape`]: octet codec for assertion values

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod builder;
mod error;
pub mod escape;
pub mod parser;
pub mod render;
pub mod types;
pub mod walk;

pub use builder::FilterBuilder;
pub use error::{Error, Result, SequencingReason, SyntaxReason};
pub use parser::FilterParser;
pub use types::{
    AssertionValue, AttributeDescription, AttributeValueAssertion, Filter, FilterTag,
    MatchingRuleAssertion, MatchingRuleId, Substring, SubstringFilter, SubstringTag,
};
pub use walk::{FilterEvent, FilterWalk};

/// Filter grammar revision implemented.
pub const FILTER_RFC: &str = "RFC 2254";

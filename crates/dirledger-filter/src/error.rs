//! Error types for the filter library.
//!
//! Errors come in two kinds: syntax errors raised while parsing filter
//! text, and sequencing errors raised when the builder is driven out of
//! order. Both carry an enumerated, human-readable reason.

use thiserror::Error;

use crate::types::FilterTag;

/// Errors that can occur while parsing or building a search filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The filter text violates the RFC 2254 grammar.
    #[error("filter syntax error: {0}")]
    Syntax(#[from] SyntaxReason),

    /// A builder operation was called out of order.
    #[error("filter builder sequencing error: {0}")]
    Sequencing(#[from] SequencingReason),
}

impl Error {
    /// Returns true if this is a syntax error.
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    /// Returns true if this is a builder sequencing error.
    #[must_use]
    pub const fn is_sequencing(&self) -> bool {
        matches!(self, Self::Sequencing(_))
    }
}

/// The specific grammar violation behind a syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxReason {
    /// A `(` was expected or an unmatched `)` was found.
    #[error("missing left paren")]
    MissingLeftParen,

    /// A `)` was expected or a `(` was never closed.
    #[error("missing right paren")]
    MissingRightParen,

    /// The input ended where more filter text was required.
    #[error("unexpected end of filter")]
    UnexpectedEnd,

    /// A filter component has no attribute name.
    #[error("no attribute name")]
    NoAttributeName,

    /// An extensible match names neither an attribute nor a matching rule.
    #[error("no matching rule")]
    NoMatchingRule,

    /// A `::=` or `:::=` form with nothing to match on.
    #[error("no DN nor matching rule")]
    NoDnNorMatchingRule,

    /// An extensible match names more than one matching rule id.
    #[error("multiple matching rule ids")]
    MultipleMatchingRules,

    /// The character after an attribute is not a comparison operator.
    #[error("invalid comparison operator '{0}'")]
    InvalidComparison(char),

    /// A `\` escape was followed by a non-hex character.
    #[error("invalid character '{0}' in escape")]
    InvalidEscape(char),

    /// The value ended in the middle of a `\HH` escape.
    #[error("short escape at end of value")]
    ShortEscape,

    /// A code point not permitted unescaped in a value. The payload is
    /// the escaped rendering of the offending character.
    #[error("invalid character '{0}' in value")]
    InvalidCharacter(String),

    /// A `\` inside an attribute descriptor.
    #[error("invalid escape in attribute descriptor")]
    InvalidEscapeInDescriptor,

    /// A character outside the descriptor character class.
    #[error("invalid character '{0}' in attribute descriptor")]
    InvalidCharInDescriptor(char),

    /// A `;` option separator with no option following it.
    #[error("no option after ';' in attribute descriptor")]
    NoOption,
}

/// The specific ordering violation behind a builder sequencing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequencingReason {
    /// A second child was added to an open `Not` filter.
    #[error("second child for not filter")]
    SecondChildForNot,

    /// `start_nested_filter`/`end_nested_filter` with a non-boolean tag.
    #[error("invalid nested filter tag: {0}")]
    InvalidNested(FilterTag),

    /// `add_assertion` with a tag that is not an attribute-value assertion.
    #[error("invalid assertion tag: {0}")]
    InvalidAssertion(FilterTag),

    /// A nested filter was closed with a different tag than it was opened
    /// with.
    #[error("mismatched end: expected {expected}, found {found}")]
    MismatchedEnd {
        /// The tag passed to the end operation.
        expected: FilterTag,
        /// The tag of the filter actually open.
        found: FilterTag,
    },

    /// An end operation with no open container.
    #[error("no open nested filter")]
    NothingOpen,

    /// A substring piece added out of order, or outside a substring
    /// sequence.
    #[error("substring piece out of sequence")]
    OutOfSequence,

    /// A substring sequence was closed without any pieces.
    #[error("empty substring sequence")]
    EmptySubstrings,

    /// An `And`/`Or`/`Not` filter was closed without any child.
    #[error("empty nested filter")]
    EmptyNested,

    /// A non-piece component was added while a substring sequence was
    /// open.
    #[error("assertion inside substring sequence")]
    AssertionInsideSubstrings,

    /// A component was added after the root filter was already complete.
    #[error("filter already complete")]
    AlreadyComplete,

    /// `build` was called while containers were still open.
    #[error("unclosed nested filter")]
    Unclosed,

    /// `build` was called before any component was added.
    #[error("empty builder")]
    EmptyBuilder,
}

/// Result type alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

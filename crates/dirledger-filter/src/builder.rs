//! Programmatic filter construction.
//!
//! [`FilterBuilder`] assembles a [`Filter`] from pieces, for callers
//! that compose searches rather than parse text. The builder keeps a
//! stack of open containers; each container folds into its parent when
//! closed, and the sequencing rules of the filter grammar (one child
//! per `Not`, ordered substring pieces, matching open/close tags) are
//! enforced at the operation that violates them.

use crate::error::{Error, Result, SequencingReason, SyntaxReason};
use crate::types::{
    AssertionValue, AttributeDescription, AttributeValueAssertion, Filter, FilterTag,
    MatchingRuleAssertion, MatchingRuleId, Substring, SubstringFilter,
};

/// An open container on the composition stack.
enum Frame {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Option<Filter>),
    Substrings {
        attribute: AttributeDescription,
        pieces: Vec<Substring>,
        final_seen: bool,
    },
}

impl Frame {
    const fn tag(&self) -> FilterTag {
        match self {
            Self::And(_) => FilterTag::And,
            Self::Or(_) => FilterTag::Or,
            Self::Not(_) => FilterTag::Not,
            Self::Substrings { .. } => FilterTag::Substrings,
        }
    }
}

/// Stateful constructor for a [`Filter`] tree.
///
/// ```
/// use dirledger_filter::{FilterBuilder, FilterTag};
///
/// let mut builder = FilterBuilder::new();
/// builder.start_nested_filter(FilterTag::And)?;
/// builder.add_present("cn")?;
/// builder.end_nested_filter(FilterTag::And)?;
/// let filter = builder.build()?;
/// assert_eq!(filter.to_string(), "(&(cn=*))");
/// # Ok::<(), dirledger_filter::Error>(())
/// ```
#[derive(Default)]
pub struct FilterBuilder {
    root: Option<Filter>,
    stack: Vec<Frame>,
}

impl FilterBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a nested `And`, `Or`, or `Not` filter. Components added
    /// afterwards nest into it until the matching
    /// [`end_nested_filter`](Self::end_nested_filter).
    ///
    /// # Errors
    ///
    /// Fails with *invalid nested* for any other tag, and with the
    /// placement errors of the current open container.
    pub fn start_nested_filter(&mut self, kind: FilterTag) -> Result<()> {
        let frame = match kind {
            FilterTag::And => Frame::And(Vec::new()),
            FilterTag::Or => Frame::Or(Vec::new()),
            FilterTag::Not => Frame::Not(None),
            other => return Err(Error::Sequencing(SequencingReason::InvalidNested(other))),
        };
        self.check_placement()?;
        self.stack.push(frame);
        Ok(())
    }

    /// Closes the innermost nested filter, which must carry `kind`.
    ///
    /// # Errors
    ///
    /// Fails with *mismatched end* when the open container carries a
    /// different tag, *no open nested filter* when nothing is open, and
    /// *empty nested filter* when the container has no child.
    pub fn end_nested_filter(&mut self, kind: FilterTag) -> Result<()> {
        if !matches!(kind, FilterTag::And | FilterTag::Or | FilterTag::Not) {
            return Err(Error::Sequencing(SequencingReason::InvalidNested(kind)));
        }
        let frame = self
            .stack
            .pop()
            .ok_or(Error::Sequencing(SequencingReason::NothingOpen))?;

        let node = match frame {
            Frame::And(children) if kind == FilterTag::And => {
                if children.is_empty() {
                    return Err(Error::Sequencing(SequencingReason::EmptyNested));
                }
                Filter::And(children)
            }
            Frame::Or(children) if kind == FilterTag::Or => {
                if children.is_empty() {
                    return Err(Error::Sequencing(SequencingReason::EmptyNested));
                }
                Filter::Or(children)
            }
            Frame::Not(child) if kind == FilterTag::Not => match child {
                Some(child) => Filter::Not(Box::new(child)),
                None => return Err(Error::Sequencing(SequencingReason::EmptyNested)),
            },
            other => {
                return Err(Error::Sequencing(SequencingReason::MismatchedEnd {
                    expected: kind,
                    found: other.tag(),
                }))
            }
        };
        self.place(node)
    }

    /// Opens a substring sequence for `attribute`. Only
    /// [`add_substring`](Self::add_substring) may follow until
    /// [`end_substrings`](Self::end_substrings).
    ///
    /// # Errors
    ///
    /// Fails when the attribute descriptor is invalid or the current
    /// container cannot take another component.
    pub fn start_substrings(&mut self, attribute: &str) -> Result<()> {
        let attribute = AttributeDescription::new(attribute)?;
        self.check_placement()?;
        self.stack.push(Frame::Substrings {
            attribute,
            pieces: Vec::new(),
            final_seen: false,
        });
        Ok(())
    }

    /// Appends a piece to the open substring sequence.
    ///
    /// # Errors
    ///
    /// Fails with *out of sequence* when no substring sequence is open,
    /// when an `Initial` follows any other piece, or when any piece
    /// follows a `Final`.
    pub fn add_substring(&mut self, piece: Substring) -> Result<()> {
        let Some(Frame::Substrings {
            pieces, final_seen, ..
        }) = self.stack.last_mut()
        else {
            return Err(Error::Sequencing(SequencingReason::OutOfSequence));
        };
        if *final_seen {
            return Err(Error::Sequencing(SequencingReason::OutOfSequence));
        }
        match piece {
            Substring::Initial(_) if !pieces.is_empty() => {
                return Err(Error::Sequencing(SequencingReason::OutOfSequence));
            }
            Substring::Final(_) => *final_seen = true,
            _ => {}
        }
        pieces.push(piece);
        Ok(())
    }

    /// Closes the open substring sequence.
    ///
    /// # Errors
    ///
    /// Fails with *empty substring sequence* when no piece was added,
    /// and with *mismatched end* when the innermost container is not a
    /// substring sequence.
    pub fn end_substrings(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Substrings {
                attribute, pieces, ..
            }) => {
                if pieces.is_empty() {
                    return Err(Error::Sequencing(SequencingReason::EmptySubstrings));
                }
                self.place(Filter::Substrings(SubstringFilter {
                    attribute,
                    substrings: pieces,
                }))
            }
            Some(other) => Err(Error::Sequencing(SequencingReason::MismatchedEnd {
                expected: FilterTag::Substrings,
                found: other.tag(),
            })),
            None => Err(Error::Sequencing(SequencingReason::NothingOpen)),
        }
    }

    /// Adds an attribute-value assertion of the given kind:
    /// `EqualityMatch`, `GreaterOrEqual`, `LessOrEqual`, or
    /// `ApproxMatch`.
    ///
    /// # Errors
    ///
    /// Fails with *invalid assertion* for any other tag, *assertion
    /// inside substring sequence* while a substring sequence is open,
    /// or when the attribute descriptor is invalid.
    pub fn add_assertion(
        &mut self,
        kind: FilterTag,
        attribute: &str,
        value: impl Into<AssertionValue>,
    ) -> Result<()> {
        let assertion = AttributeValueAssertion::new(
            AttributeDescription::new(attribute)?,
            value.into(),
        );
        let node = match kind {
            FilterTag::EqualityMatch => Filter::EqualityMatch(assertion),
            FilterTag::GreaterOrEqual => Filter::GreaterOrEqual(assertion),
            FilterTag::LessOrEqual => Filter::LessOrEqual(assertion),
            FilterTag::ApproxMatch => Filter::ApproxMatch(assertion),
            other => return Err(Error::Sequencing(SequencingReason::InvalidAssertion(other))),
        };
        self.place(node)
    }

    /// Adds a presence test.
    ///
    /// # Errors
    ///
    /// Fails when the attribute descriptor is invalid or the current
    /// container cannot take another component.
    pub fn add_present(&mut self, attribute: &str) -> Result<()> {
        let node = Filter::Present(AttributeDescription::new(attribute)?);
        self.place(node)
    }

    /// Adds an extensible match. At least one of `matching_rule` and
    /// `attribute` must be given.
    ///
    /// # Errors
    ///
    /// Fails with *no matching rule* when both are absent, or with the
    /// usual placement errors.
    pub fn add_extensible_match(
        &mut self,
        matching_rule: Option<&str>,
        attribute: Option<&str>,
        value: impl Into<AssertionValue>,
        dn_attributes: bool,
    ) -> Result<()> {
        if matching_rule.is_none() && attribute.is_none() {
            return Err(Error::Syntax(SyntaxReason::NoMatchingRule));
        }
        let attribute = attribute.map(AttributeDescription::new).transpose()?;
        self.place(Filter::ExtensibleMatch(MatchingRuleAssertion {
            matching_rule: matching_rule.map(MatchingRuleId::new),
            attribute,
            value: value.into(),
            dn_attributes,
        }))
    }

    /// Consumes the builder and returns the finished filter.
    ///
    /// # Errors
    ///
    /// Fails with *unclosed nested filter* when containers remain open
    /// and *empty builder* when nothing was added.
    pub fn build(self) -> Result<Filter> {
        if !self.stack.is_empty() {
            return Err(Error::Sequencing(SequencingReason::Unclosed));
        }
        self.root
            .ok_or(Error::Sequencing(SequencingReason::EmptyBuilder))
    }

    /// Checks that the current open container can take another
    /// component, without placing one.
    fn check_placement(&self) -> Result<()> {
        match self.stack.last() {
            None if self.root.is_some() => {
                Err(Error::Sequencing(SequencingReason::AlreadyComplete))
            }
            Some(Frame::Not(Some(_))) => {
                Err(Error::Sequencing(SequencingReason::SecondChildForNot))
            }
            Some(Frame::Substrings { .. }) => Err(Error::Sequencing(
                SequencingReason::AssertionInsideSubstrings,
            )),
            _ => Ok(()),
        }
    }

    /// Places a completed component into the current open container,
    /// or makes it the root.
    fn place(&mut self, node: Filter) -> Result<()> {
        match self.stack.last_mut() {
            None => {
                if self.root.is_some() {
                    return Err(Error::Sequencing(SequencingReason::AlreadyComplete));
                }
                self.root = Some(node);
                Ok(())
            }
            Some(Frame::And(children) | Frame::Or(children)) => {
                children.push(node);
                Ok(())
            }
            Some(Frame::Not(slot)) => {
                if slot.is_some() {
                    return Err(Error::Sequencing(SequencingReason::SecondChildForNot));
                }
                *slot = Some(node);
                Ok(())
            }
            Some(Frame::Substrings { .. }) => Err(Error::Sequencing(
                SequencingReason::AssertionInsideSubstrings,
            )),
        }
    }
}

//! The filter tree.

use crate::error::Result;

use super::{AssertionValue, AttributeDescription, MatchingRuleId, Substring};

/// Context-specific BER tag numbers for the RFC 2251 `Filter` CHOICE.
///
/// The numbers are stable: an external BER encoder tags each filter
/// component with `number()` and encodes it as CONSTRUCTED when
/// [`is_constructed`](Self::is_constructed) is true, PRIMITIVE otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FilterTag {
    /// Intersection of nested filters.
    And = 0,
    /// Union of nested filters.
    Or = 1,
    /// Negation of one nested filter.
    Not = 2,
    /// Attribute equals value.
    EqualityMatch = 3,
    /// Wildcard pattern over an attribute's values.
    Substrings = 4,
    /// Attribute ordered at or above value.
    GreaterOrEqual = 5,
    /// Attribute ordered at or below value.
    LessOrEqual = 6,
    /// Attribute has at least one value.
    Present = 7,
    /// Attribute approximately equals value.
    ApproxMatch = 8,
    /// Match under an explicit matching rule.
    ExtensibleMatch = 9,
}

impl FilterTag {
    /// Returns the context-specific tag number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Returns true when the BER encoding of this component is
    /// CONSTRUCTED. `Present` alone encodes as PRIMITIVE.
    #[must_use]
    pub const fn is_constructed(self) -> bool {
        !matches!(self, Self::Present)
    }

    const fn name(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::EqualityMatch => "equalityMatch",
            Self::Substrings => "substrings",
            Self::GreaterOrEqual => "greaterOrEqual",
            Self::LessOrEqual => "lessOrEqual",
            Self::Present => "present",
            Self::ApproxMatch => "approxMatch",
            Self::ExtensibleMatch => "extensibleMatch",
        }
    }
}

impl std::fmt::Display for FilterTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An attribute compared against a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValueAssertion {
    /// The attribute being tested.
    pub attribute: AttributeDescription,
    /// The octets it is compared against.
    pub value: AssertionValue,
}

impl AttributeValueAssertion {
    /// Creates a new assertion.
    #[must_use]
    pub const fn new(attribute: AttributeDescription, value: AssertionValue) -> Self {
        Self { attribute, value }
    }
}

/// A wildcard pattern over an attribute's values.
///
/// The piece sequence is ordered: at most one `Initial` first, any
/// number of `Any` in the middle, at most one `Final` last, and at least
/// one piece overall. The parser and builder both uphold this; code
/// constructing the struct directly is expected to as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringFilter {
    /// The attribute being matched.
    pub attribute: AttributeDescription,
    /// The ordered pattern pieces.
    pub substrings: Vec<Substring>,
}

/// An extensible match assertion.
///
/// At least one of `matching_rule` and `attribute` is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingRuleAssertion {
    /// Matching rule to evaluate under, if named.
    pub matching_rule: Option<MatchingRuleId>,
    /// Attribute to match, if named.
    pub attribute: Option<AttributeDescription>,
    /// The octets to match.
    pub value: AssertionValue,
    /// Whether distinguished-name attributes participate in the match.
    pub dn_attributes: bool,
}

/// A search filter: the RFC 2251 `Filter` CHOICE as a value-owned tree.
///
/// Created by [`FilterParser`](crate::FilterParser) or
/// [`FilterBuilder`](crate::FilterBuilder), immutable thereafter.
/// Equality is structural and cloning is deep; there are no parent
/// pointers and no cycles by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// All nested filters must match.
    And(Vec<Filter>),
    /// At least one nested filter must match.
    Or(Vec<Filter>),
    /// The nested filter must not match.
    Not(Box<Filter>),
    /// The attribute has a value equal to the assertion.
    EqualityMatch(AttributeValueAssertion),
    /// The attribute has a value matching the wildcard pattern.
    Substrings(SubstringFilter),
    /// The attribute has a value ordered at or above the assertion.
    GreaterOrEqual(AttributeValueAssertion),
    /// The attribute has a value ordered at or below the assertion.
    LessOrEqual(AttributeValueAssertion),
    /// The attribute is present on the entry.
    Present(AttributeDescription),
    /// The attribute has a value approximately equal to the assertion.
    ApproxMatch(AttributeValueAssertion),
    /// Match governed by an explicit matching rule.
    ExtensibleMatch(MatchingRuleAssertion),
}

impl Filter {
    /// Returns the component's BER tag.
    #[must_use]
    pub const fn tag(&self) -> FilterTag {
        match self {
            Self::And(_) => FilterTag::And,
            Self::Or(_) => FilterTag::Or,
            Self::Not(_) => FilterTag::Not,
            Self::EqualityMatch(_) => FilterTag::EqualityMatch,
            Self::Substrings(_) => FilterTag::Substrings,
            Self::GreaterOrEqual(_) => FilterTag::GreaterOrEqual,
            Self::LessOrEqual(_) => FilterTag::LessOrEqual,
            Self::Present(_) => FilterTag::Present,
            Self::ApproxMatch(_) => FilterTag::ApproxMatch,
            Self::ExtensibleMatch(_) => FilterTag::ExtensibleMatch,
        }
    }

    /// Intersects a set of filters.
    #[must_use]
    pub fn and(filters: Vec<Self>) -> Self {
        Self::And(filters)
    }

    /// Unions a set of filters.
    #[must_use]
    pub fn or(filters: Vec<Self>) -> Self {
        Self::Or(filters)
    }

    /// Negates a filter.
    #[must_use]
    pub fn negate(filter: Self) -> Self {
        Self::Not(Box::new(filter))
    }

    /// Builds an equality match.
    ///
    /// # Errors
    ///
    /// Fails when the attribute descriptor is invalid.
    pub fn equality(attribute: &str, value: impl Into<AssertionValue>) -> Result<Self> {
        Ok(Self::EqualityMatch(AttributeValueAssertion::new(
            AttributeDescription::new(attribute)?,
            value.into(),
        )))
    }

    /// Builds a greater-or-equal match.
    ///
    /// # Errors
    ///
    /// Fails when the attribute descriptor is invalid.
    pub fn greater_or_equal(attribute: &str, value: impl Into<AssertionValue>) -> Result<Self> {
        Ok(Self::GreaterOrEqual(AttributeValueAssertion::new(
            AttributeDescription::new(attribute)?,
            value.into(),
        )))
    }

    /// Builds a less-or-equal match.
    ///
    /// # Errors
    ///
    /// Fails when the attribute descriptor is invalid.
    pub fn less_or_equal(attribute: &str, value: impl Into<AssertionValue>) -> Result<Self> {
        Ok(Self::LessOrEqual(AttributeValueAssertion::new(
            AttributeDescription::new(attribute)?,
            value.into(),
        )))
    }

    /// Builds an approximate match.
    ///
    /// # Errors
    ///
    /// Fails when the attribute descriptor is invalid.
    pub fn approx(attribute: &str, value: impl Into<AssertionValue>) -> Result<Self> {
        Ok(Self::ApproxMatch(AttributeValueAssertion::new(
            AttributeDescription::new(attribute)?,
            value.into(),
        )))
    }

    /// Builds a presence test.
    ///
    /// # Errors
    ///
    /// Fails when the attribute descriptor is invalid.
    pub fn present(attribute: &str) -> Result<Self> {
        Ok(Self::Present(AttributeDescription::new(attribute)?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod filter_tag_tests {
        use super::*;

        #[test]
        fn numbers_are_stable() {
            let tags = [
                (FilterTag::And, 0),
                (FilterTag::Or, 1),
                (FilterTag::Not, 2),
                (FilterTag::EqualityMatch, 3),
                (FilterTag::Substrings, 4),
                (FilterTag::GreaterOrEqual, 5),
                (FilterTag::LessOrEqual, 6),
                (FilterTag::Present, 7),
                (FilterTag::ApproxMatch, 8),
                (FilterTag::ExtensibleMatch, 9),
            ];
            for (tag, number) in tags {
                assert_eq!(tag.number(), number);
            }
        }

        #[test]
        fn present_is_primitive() {
            assert!(!FilterTag::Present.is_constructed());
            assert!(FilterTag::And.is_constructed());
            assert!(FilterTag::EqualityMatch.is_constructed());
            assert!(FilterTag::ExtensibleMatch.is_constructed());
        }

        #[test]
        fn display_uses_choice_names() {
            assert_eq!(FilterTag::EqualityMatch.to_string(), "equalityMatch");
            assert_eq!(FilterTag::Not.to_string(), "not");
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn constructors_and_tags() {
            let filter = Filter::and(vec![
                Filter::equality("cn", "Jensen").unwrap(),
                Filter::negate(Filter::present("sn").unwrap()),
            ]);
            assert_eq!(filter.tag(), FilterTag::And);
            let Filter::And(children) = &filter else {
                panic!("expected And");
            };
            assert_eq!(children.len(), 2);
            assert_eq!(children[0].tag(), FilterTag::EqualityMatch);
            assert_eq!(children[1].tag(), FilterTag::Not);
        }

        #[test]
        fn structural_equality_and_deep_clone() {
            let filter = Filter::or(vec![
                Filter::greater_or_equal("uidNumber", "1000").unwrap(),
                Filter::less_or_equal("uidNumber", "2000").unwrap(),
            ]);
            let copy = filter.clone();
            assert_eq!(filter, copy);
        }

        #[test]
        fn invalid_attribute_propagates() {
            assert!(Filter::equality("bad attr", "x").is_err());
            assert!(Filter::present("cn;").is_err());
        }

        #[test]
        fn approx_tag() {
            let filter = Filter::approx("sn", "Jensen").unwrap();
            assert_eq!(filter.tag(), FilterTag::ApproxMatch);
        }
    }
}

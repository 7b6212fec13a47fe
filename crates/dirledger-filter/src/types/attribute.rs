//! Attribute descriptions and matching rule identifiers.

use crate::error::{Error, Result, SyntaxReason};

/// Attribute description: an attribute type name, optionally followed by
/// `;`-separated options (RFC 2251 section 4.1.5).
///
/// Construction validates the descriptor character class: every
/// character must be alphanumeric or one of `.`, `-`, `;`, `:`, the
/// descriptor must be non-empty, and a `;` must neither start the
/// descriptor nor end it (an option must follow the separator).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeDescription(String);

impl AttributeDescription {
    /// Creates a validated attribute description.
    ///
    /// # Errors
    ///
    /// Fails with a [`SyntaxReason`] describing the violated descriptor
    /// rule.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Checks a descriptor against the character-class rules without
    /// constructing one.
    pub(crate) fn validate(name: &str) -> Result<()> {
        if name.is_empty() || name.starts_with(';') {
            return Err(Error::Syntax(SyntaxReason::NoAttributeName));
        }
        if name.ends_with(';') {
            return Err(Error::Syntax(SyntaxReason::NoOption));
        }
        for c in name.chars() {
            if c == '\\' {
                return Err(Error::Syntax(SyntaxReason::InvalidEscapeInDescriptor));
            }
            if !c.is_alphanumeric() && !matches!(c, '.' | '-' | ';' | ':') {
                return Err(Error::Syntax(SyntaxReason::InvalidCharInDescriptor(c)));
            }
        }
        Ok(())
    }

    /// Returns the descriptor as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AttributeDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Matching rule identifier for an extensible match, an OID or
/// descriptive name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchingRuleId(String);

impl MatchingRuleId {
    /// Creates a new matching rule identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MatchingRuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod attribute_description_tests {
        use super::*;

        #[test]
        fn plain_name() {
            let attr = AttributeDescription::new("objectClass").unwrap();
            assert_eq!(attr.as_str(), "objectClass");
        }

        #[test]
        fn name_with_options() {
            assert!(AttributeDescription::new("cn;lang-en;phonetic").is_ok());
        }

        #[test]
        fn oid_form() {
            assert!(AttributeDescription::new("2.5.4.3").is_ok());
        }

        #[test]
        fn unicode_letters_allowed() {
            assert!(AttributeDescription::new("наме").is_ok());
        }

        #[test]
        fn empty_fails() {
            assert_eq!(
                AttributeDescription::new("").unwrap_err(),
                Error::Syntax(SyntaxReason::NoAttributeName)
            );
        }

        #[test]
        fn leading_semicolon_fails() {
            assert_eq!(
                AttributeDescription::new(";binary").unwrap_err(),
                Error::Syntax(SyntaxReason::NoAttributeName)
            );
        }

        #[test]
        fn trailing_semicolon_fails() {
            assert_eq!(
                AttributeDescription::new("cn;").unwrap_err(),
                Error::Syntax(SyntaxReason::NoOption)
            );
        }

        #[test]
        fn backslash_fails() {
            assert_eq!(
                AttributeDescription::new("c\\6e").unwrap_err(),
                Error::Syntax(SyntaxReason::InvalidEscapeInDescriptor)
            );
        }

        #[test]
        fn space_fails() {
            assert_eq!(
                AttributeDescription::new("common name").unwrap_err(),
                Error::Syntax(SyntaxReason::InvalidCharInDescriptor(' '))
            );
        }

        #[test]
        fn display() {
            let attr = AttributeDescription::new("sn").unwrap();
            assert_eq!(format!("{attr}"), "sn");
        }
    }

    mod matching_rule_id_tests {
        use super::*;

        #[test]
        fn new_and_display() {
            let rule = MatchingRuleId::new("2.4.6.8.10");
            assert_eq!(rule.as_str(), "2.4.6.8.10");
            assert_eq!(format!("{rule}"), "2.4.6.8.10");
        }

        #[test]
        fn named_rule() {
            let rule = MatchingRuleId::new("caseExactMatch");
            assert_eq!(rule.as_str(), "caseExactMatch");
        }
    }
}

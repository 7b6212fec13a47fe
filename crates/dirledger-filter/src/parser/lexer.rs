//! Filter lexer: a character-level cursor with typed reads.
//!
//! The lexer owns the (preprocessed) filter string and a byte-offset
//! cursor. It does not unescape values and never decodes multi-byte
//! sequences; octet conversion is the codec's job.

use crate::error::{Error, Result, SyntaxReason};
use crate::types::AttributeDescription;

/// Boolean connector read at the start of a filter component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoolOp {
    And,
    Or,
    Not,
}

/// Comparison operator between an attribute and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Comparison {
    Equality,
    GreaterOrEqual,
    LessOrEqual,
    Approx,
    Extensible,
}

/// Filter lexer state.
pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Attribute description captured by the last `op_or_attr` call.
    attr: Option<String>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            attr: None,
        }
    }

    /// Returns true if at end of input.
    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peeks at the current character without consuming it.
    fn peek_opt(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Peeks at the current character, failing past end of input.
    pub(crate) fn peek(&self) -> Result<char> {
        self.peek_opt()
            .ok_or(Error::Syntax(SyntaxReason::UnexpectedEnd))
    }

    /// Consumes and returns the current character.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek_opt()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes the expected `(`.
    pub(crate) fn expect_left_paren(&mut self) -> Result<()> {
        match self.advance() {
            Some('(') => Ok(()),
            _ => Err(Error::Syntax(SyntaxReason::MissingLeftParen)),
        }
    }

    /// Consumes the expected `)`.
    pub(crate) fn expect_right_paren(&mut self) -> Result<()> {
        match self.advance() {
            Some(')') => Ok(()),
            _ => Err(Error::Syntax(SyntaxReason::MissingRightParen)),
        }
    }

    /// At the start of a filter component, reads either a boolean
    /// connector or a bare attribute description.
    ///
    /// A connector is returned directly; an attribute description is
    /// captured into a side slot (see [`attr`](Self::attr)) and `None`
    /// is returned.
    pub(crate) fn op_or_attr(&mut self) -> Result<Option<BoolOp>> {
        let rest = &self.input[self.pos..];
        if rest.starts_with(":::=") || rest.starts_with("::=") {
            return Err(Error::Syntax(SyntaxReason::NoDnNorMatchingRule));
        }
        if rest.starts_with(":=") {
            return Err(Error::Syntax(SyntaxReason::NoMatchingRule));
        }

        match self.peek()? {
            '&' => {
                self.advance();
                Ok(Some(BoolOp::And))
            }
            '|' => {
                self.advance();
                Ok(Some(BoolOp::Or))
            }
            '!' => {
                self.advance();
                Ok(Some(BoolOp::Not))
            }
            _ => {
                self.capture_attr()?;
                Ok(None)
            }
        }
    }

    /// Captures an attribute description up to a comparison operator or
    /// parenthesis, trims surrounding whitespace, and validates it.
    fn capture_attr(&mut self) -> Result<()> {
        let start = self.pos;
        loop {
            let rest = &self.input[self.pos..];
            let Some(c) = rest.chars().next() else { break };
            if matches!(c, '=' | '~' | '<' | '>' | '(' | ')') || rest.starts_with(":=") {
                break;
            }
            self.pos += c.len_utf8();
        }

        let raw = self.input[start..self.pos].trim();
        AttributeDescription::validate(raw)?;
        self.attr = Some(raw.to_string());
        Ok(())
    }

    /// Reads the comparison operator after an attribute description.
    pub(crate) fn comparison(&mut self) -> Result<Comparison> {
        let c = self.peek()?;
        match c {
            '=' => {
                self.advance();
                Ok(Comparison::Equality)
            }
            '>' | '<' | '~' | ':' => {
                self.advance();
                match self.advance() {
                    Some('=') => Ok(match c {
                        '>' => Comparison::GreaterOrEqual,
                        '<' => Comparison::LessOrEqual,
                        '~' => Comparison::Approx,
                        _ => Comparison::Extensible,
                    }),
                    _ => Err(Error::Syntax(SyntaxReason::InvalidComparison(c))),
                }
            }
            other => Err(Error::Syntax(SyntaxReason::InvalidComparison(other))),
        }
    }

    /// Reads the raw value up to the next `)` or end of input, without
    /// unescaping. The cursor lands on the `)`.
    pub(crate) fn value(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek_opt() {
            if c == ')' {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.input[start..self.pos]
    }

    /// Returns the attribute description captured by the last
    /// [`op_or_attr`](Self::op_or_attr) call.
    pub(crate) fn attr(&self) -> Option<&str> {
        self.attr.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reads_connectors() {
        let mut lexer = Lexer::new("&|!");
        assert_eq!(lexer.op_or_attr().unwrap(), Some(BoolOp::And));
        assert_eq!(lexer.op_or_attr().unwrap(), Some(BoolOp::Or));
        assert_eq!(lexer.op_or_attr().unwrap(), Some(BoolOp::Not));
        assert!(lexer.is_eof());
    }

    #[test]
    fn captures_attribute_before_equals() {
        let mut lexer = Lexer::new("cn=Babs Jensen)");
        assert_eq!(lexer.op_or_attr().unwrap(), None);
        assert_eq!(lexer.attr(), Some("cn"));
        assert_eq!(lexer.comparison().unwrap(), Comparison::Equality);
        assert_eq!(lexer.value(), "Babs Jensen");
        assert_eq!(lexer.peek().unwrap(), ')');
    }

    #[test]
    fn trims_attribute_whitespace() {
        let mut lexer = Lexer::new(" sn =x)");
        lexer.op_or_attr().unwrap();
        assert_eq!(lexer.attr(), Some("sn"));
    }

    #[test]
    fn captures_decorated_attribute_before_extensible() {
        let mut lexer = Lexer::new("cn:dn:2.4.6.8.10:=Jensen)");
        assert_eq!(lexer.op_or_attr().unwrap(), None);
        assert_eq!(lexer.attr(), Some("cn:dn:2.4.6.8.10"));
        assert_eq!(lexer.comparison().unwrap(), Comparison::Extensible);
        assert_eq!(lexer.value(), "Jensen");
    }

    #[test]
    fn two_character_comparisons() {
        for (text, op) in [
            (">=5)", Comparison::GreaterOrEqual),
            ("<=5)", Comparison::LessOrEqual),
            ("~=5)", Comparison::Approx),
            (":=5)", Comparison::Extensible),
        ] {
            let mut lexer = Lexer::new(text);
            assert_eq!(lexer.comparison().unwrap(), op);
            assert_eq!(lexer.value(), "5");
        }
    }

    #[test]
    fn invalid_comparison() {
        let mut lexer = Lexer::new(">x");
        assert_eq!(
            lexer.comparison().unwrap_err(),
            Error::Syntax(SyntaxReason::InvalidComparison('>'))
        );
    }

    #[test]
    fn bare_extensible_prefixes_rejected() {
        assert_eq!(
            Lexer::new(":=v").op_or_attr().unwrap_err(),
            Error::Syntax(SyntaxReason::NoMatchingRule)
        );
        assert_eq!(
            Lexer::new("::=v").op_or_attr().unwrap_err(),
            Error::Syntax(SyntaxReason::NoDnNorMatchingRule)
        );
        assert_eq!(
            Lexer::new(":::=v").op_or_attr().unwrap_err(),
            Error::Syntax(SyntaxReason::NoDnNorMatchingRule)
        );
    }

    #[test]
    fn missing_attribute_name() {
        let mut lexer = Lexer::new("=value)");
        assert_eq!(
            lexer.op_or_attr().unwrap_err(),
            Error::Syntax(SyntaxReason::NoAttributeName)
        );
    }

    #[test]
    fn backslash_in_descriptor() {
        let mut lexer = Lexer::new("c\\6e=x)");
        assert_eq!(
            lexer.op_or_attr().unwrap_err(),
            Error::Syntax(SyntaxReason::InvalidEscapeInDescriptor)
        );
    }

    #[test]
    fn descriptor_trailing_semicolon() {
        let mut lexer = Lexer::new("cn;=x)");
        assert_eq!(
            lexer.op_or_attr().unwrap_err(),
            Error::Syntax(SyntaxReason::NoOption)
        );
    }

    #[test]
    fn value_runs_to_end_without_paren() {
        let mut lexer = Lexer::new("abc");
        assert_eq!(lexer.value(), "abc");
        assert!(lexer.is_eof());
        assert_eq!(
            lexer.peek().unwrap_err(),
            Error::Syntax(SyntaxReason::UnexpectedEnd)
        );
    }

    #[test]
    fn expect_parens() {
        let mut lexer = Lexer::new("()");
        lexer.expect_left_paren().unwrap();
        lexer.expect_right_paren().unwrap();
        assert_eq!(
            Lexer::new("x").expect_left_paren().unwrap_err(),
            Error::Syntax(SyntaxReason::MissingLeftParen)
        );
        assert_eq!(
            Lexer::new("x").expect_right_paren().unwrap_err(),
            Error::Syntax(SyntaxReason::MissingRightParen)
        );
    }
}

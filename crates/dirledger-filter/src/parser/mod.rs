//! RFC 2254 filter text parser.
//!
//! Parses filter strings into a [`Filter`] tree by recursive descent
//! over the [`lexer`] cursor. Before lexing, the input is preprocessed:
//! empty input becomes the canonical presence filter, legacy LDAPv2
//! escapes are upgraded to `\HH` form, a bare expression is wrapped in
//! parentheses, and parenthesis balance is checked so paren problems
//! surface as paren errors rather than tokenizer errors.

mod lexer;

use std::borrow::Cow;

use crate::error::{Error, Result, SyntaxReason};
use crate::escape;
use crate::types::{
    AssertionValue, AttributeDescription, AttributeValueAssertion, Filter, MatchingRuleAssertion,
    MatchingRuleId, Substring, SubstringFilter,
};

use lexer::{BoolOp, Comparison, Lexer};

/// The filter an empty input parses to.
const DEFAULT_FILTER: &str = "(objectclass=*)";

/// Filter text parser.
pub struct FilterParser;

impl FilterParser {
    /// Parses an RFC 2254 filter string.
    ///
    /// A bare (unwrapped) expression is accepted and auto-wrapped;
    /// LDAPv2 escapes (`\*`, `\(`, `\)`, `\\`) are accepted and
    /// converted; empty input parses to `(objectclass=*)`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Syntax`] carrying the specific grammar
    /// violation. Parsing is all-or-nothing; no partial tree is
    /// exposed.
    pub fn parse(input: &str) -> Result<Filter> {
        tracing::trace!(len = input.len(), "parsing search filter");
        let text = Self::preprocess(input)?;
        let mut lexer = Lexer::new(&text);
        let filter = Self::parse_filter(&mut lexer)?;
        if !lexer.is_eof() {
            let rendering = lexer.peek()?.escape_default().to_string();
            return Err(Error::Syntax(SyntaxReason::InvalidCharacter(rendering)));
        }
        Ok(filter)
    }

    fn preprocess(input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(DEFAULT_FILTER.to_string());
        }

        let upgraded = escape::upgrade_v2(input);
        if matches!(upgraded, Cow::Owned(_)) {
            tracing::debug!("upgraded legacy v2 escapes");
        }

        let text = if !upgraded.starts_with('(') && !upgraded.ends_with(')') {
            tracing::debug!("wrapping bare filter expression");
            format!("({upgraded})")
        } else {
            upgraded.into_owned()
        };

        Self::check_balance(&text)?;
        Ok(text)
    }

    /// Parenthesis balance check, run before any lexing.
    fn check_balance(text: &str) -> Result<()> {
        if !text.starts_with('(') {
            return Err(Error::Syntax(SyntaxReason::MissingLeftParen));
        }
        if !text.ends_with(')') {
            return Err(Error::Syntax(SyntaxReason::MissingRightParen));
        }
        let mut depth: i64 = 0;
        for c in text.chars() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(Error::Syntax(SyntaxReason::MissingLeftParen));
                    }
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(Error::Syntax(SyntaxReason::MissingRightParen));
        }
        Ok(())
    }

    /// `filter ::= '(' filtercomp ')'`
    fn parse_filter(lexer: &mut Lexer<'_>) -> Result<Filter> {
        lexer.expect_left_paren()?;
        let filter = Self::parse_component(lexer)?;
        lexer.expect_right_paren()?;
        Ok(filter)
    }

    fn parse_component(lexer: &mut Lexer<'_>) -> Result<Filter> {
        match lexer.op_or_attr()? {
            Some(BoolOp::And) => Ok(Filter::And(Self::parse_list(lexer)?)),
            Some(BoolOp::Or) => Ok(Filter::Or(Self::parse_list(lexer)?)),
            Some(BoolOp::Not) => Ok(Filter::Not(Box::new(Self::parse_filter(lexer)?))),
            None => Self::parse_assertion(lexer),
        }
    }

    /// One or more parenthesized filters.
    fn parse_list(lexer: &mut Lexer<'_>) -> Result<Vec<Filter>> {
        let mut filters = vec![Self::parse_filter(lexer)?];
        while lexer.peek()? == '(' {
            filters.push(Self::parse_filter(lexer)?);
        }
        Ok(filters)
    }

    fn parse_assertion(lexer: &mut Lexer<'_>) -> Result<Filter> {
        let op = lexer.comparison()?;
        let raw = lexer.value();
        let attr = lexer
            .attr()
            .ok_or(Error::Syntax(SyntaxReason::NoAttributeName))?;

        match op {
            Comparison::GreaterOrEqual => Ok(Filter::GreaterOrEqual(Self::assertion(attr, raw)?)),
            Comparison::LessOrEqual => Ok(Filter::LessOrEqual(Self::assertion(attr, raw)?)),
            Comparison::Approx => Ok(Filter::ApproxMatch(Self::assertion(attr, raw)?)),
            Comparison::Equality => Self::parse_equality(attr, raw),
            Comparison::Extensible => Self::parse_extensible(attr, raw),
        }
    }

    fn assertion(attr: &str, raw: &str) -> Result<AttributeValueAssertion> {
        Ok(AttributeValueAssertion::new(
            AttributeDescription::new(attr)?,
            AssertionValue::new(escape::unescape(raw)?),
        ))
    }

    /// The `=` form covers presence, substrings, and plain equality,
    /// told apart by the raw (still escaped) value.
    fn parse_equality(attr: &str, raw: &str) -> Result<Filter> {
        if raw == "*" {
            Ok(Filter::Present(AttributeDescription::new(attr)?))
        } else if raw.contains('*') {
            Ok(Filter::Substrings(SubstringFilter {
                attribute: AttributeDescription::new(attr)?,
                substrings: Self::parse_substrings(raw)?,
            }))
        } else {
            Ok(Filter::EqualityMatch(Self::assertion(attr, raw)?))
        }
    }

    /// Splits a wildcard value into pieces at `*` boundaries.
    ///
    /// The split happens on the raw text; each piece is unescaped
    /// independently. A run of adjacent stars contributes a single
    /// empty `Any` piece.
    fn parse_substrings(raw: &str) -> Result<Vec<Substring>> {
        let segments: Vec<&str> = raw.split('*').collect();
        let last = segments.len() - 1;
        let mut pieces = Vec::new();

        if !segments[0].is_empty() {
            pieces.push(Substring::Initial(AssertionValue::new(escape::unescape(
                segments[0],
            )?)));
        }

        let mut in_star_run = false;
        for segment in &segments[1..last] {
            if segment.is_empty() {
                if !in_star_run {
                    pieces.push(Substring::Any(AssertionValue::default()));
                    in_star_run = true;
                }
            } else {
                pieces.push(Substring::Any(AssertionValue::new(escape::unescape(
                    segment,
                )?)));
                in_star_run = false;
            }
        }

        if !segments[last].is_empty() {
            pieces.push(Substring::Final(AssertionValue::new(escape::unescape(
                segments[last],
            )?)));
        }

        Ok(pieces)
    }

    /// The `:=` form. The captured attribute slot may be decorated as
    /// `type[:dn][:rule]`; the pieces are told apart by position and by
    /// the literal `dn`.
    fn parse_extensible(slot: &str, raw: &str) -> Result<Filter> {
        let mut attribute = None;
        let mut matching_rule = None;
        let mut dn_attributes = false;

        for (index, piece) in slot.split(':').enumerate() {
            if piece.is_empty() {
                continue;
            }
            if index == 0 {
                attribute = Some(AttributeDescription::new(piece)?);
            } else if piece == "dn" {
                dn_attributes = true;
            } else if matching_rule.is_none() {
                matching_rule = Some(MatchingRuleId::new(piece));
            } else {
                return Err(Error::Syntax(SyntaxReason::MultipleMatchingRules));
            }
        }

        if attribute.is_none() && matching_rule.is_none() {
            return Err(Error::Syntax(SyntaxReason::NoMatchingRule));
        }

        Ok(Filter::ExtensibleMatch(MatchingRuleAssertion {
            matching_rule,
            attribute,
            value: AssertionValue::new(escape::unescape(raw)?),
            dn_attributes,
        }))
    }
}

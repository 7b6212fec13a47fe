//! Octet codec for RFC 2254 assertion values.
//!
//! Assertion values travel as raw octets, not characters. This module
//! converts between the textual escape form used in filter strings and
//! the octet form held in the AST: [`unescape`] decodes `\HH` escapes and
//! re-encodes permitted code points as UTF-8, [`escape`] renders octets
//! back to filter text, and [`upgrade_v2`] rewrites legacy LDAPv2 escapes
//! (`\*`, `\(`, `\)`, `\\`) into their `\HH` equivalents.

use std::borrow::Cow;

use crate::error::{Error, Result, SyntaxReason};

/// Decodes a raw value slice into octets.
///
/// The input is the text captured between a comparison operator and the
/// closing `)`. Only V3 (`\HH`) escapes are recognized; V2 escapes must
/// have been upgraded beforehand via [`upgrade_v2`]. Code points outside
/// the RFC 2254 `char` production fail, and code points above 0x7F are
/// re-encoded as UTF-8 octets.
///
/// # Errors
///
/// Fails with [`SyntaxReason::InvalidEscape`] on a non-hex digit inside
/// an escape, [`SyntaxReason::ShortEscape`] when the input ends
/// mid-escape, and [`SyntaxReason::InvalidCharacter`] on a disallowed
/// unescaped code point.
pub fn unescape(text: &str) -> Result<Vec<u8>> {
    // A char re-encodes to at most its own UTF-8 length, so the input's
    // byte length bounds the output.
    let mut octets = Vec::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            let high = hex_value(chars.next())?;
            let low = hex_value(chars.next())?;
            octets.push((high << 4) | low);
        } else if is_value_char(c) {
            let mut utf8 = [0u8; 4];
            octets.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
        } else {
            let rendering = c.escape_default().to_string();
            return Err(Error::Syntax(SyntaxReason::InvalidCharacter(rendering)));
        }
    }

    Ok(octets)
}

/// Renders octets as filter text.
///
/// Valid UTF-8 that needs no escaping is emitted verbatim; anything else
/// is emitted as one `\HH` escape per octet, lowercase.
#[must_use]
pub fn escape(octets: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(octets) {
        if text.chars().all(is_value_char) {
            return text.to_string();
        }
    }

    let mut out = String::with_capacity(octets.len() * 3);
    for octet in octets {
        out.push_str(&format!("\\{octet:02x}"));
    }
    out
}

/// Rewrites LDAPv2 escapes to their `\HH` form.
///
/// Wherever a `\` is followed by `*`, `(`, `)`, or `\`, the two-character
/// pair becomes `\` plus the two lowercase hex digits of that character.
/// Every other `\` is left alone, so text already in V3 form passes
/// through unchanged and the rewrite is idempotent.
#[must_use]
pub fn upgrade_v2(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek().copied() {
                Some(escaped @ ('*' | '(' | ')' | '\\')) => {
                    chars.next();
                    out.push_str(&format!("\\{:02x}", u32::from(escaped)));
                }
                _ => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// The RFC 2254 `char` production: any code point except NUL, `(`, `)`,
/// `*`, and `\`.
const fn is_value_char(c: char) -> bool {
    matches!(c, '\u{01}'..='\u{27}' | '\u{2B}'..='\u{5B}') || c >= '\u{5D}'
}

fn hex_value(c: Option<char>) -> Result<u8> {
    let c = c.ok_or(Error::Syntax(SyntaxReason::ShortEscape))?;
    match c.to_digit(16) {
        Some(v) => Ok(u8::try_from(v).unwrap_or_default()),
        None => Err(Error::Syntax(SyntaxReason::InvalidEscape(c))),
    }
}

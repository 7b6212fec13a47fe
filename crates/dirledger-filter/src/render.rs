//! RFC 2254 textual rendering.
//!
//! Renders a filter tree back to filter text as a fold over the AST.
//! Octet values go through the escape codec, so a rendered filter
//! re-parses to an equal tree. `Display` for [`Filter`] delegates here.

use crate::escape;
use crate::types::{AttributeValueAssertion, Filter, Substring};

/// Renders a filter as RFC 2254 text.
#[must_use]
pub fn to_text(filter: &Filter) -> String {
    let mut out = String::new();
    write_filter(&mut out, filter);
    out
}

fn write_filter(out: &mut String, filter: &Filter) {
    out.push('(');
    match filter {
        Filter::And(children) => {
            out.push('&');
            for child in children {
                write_filter(out, child);
            }
        }
        Filter::Or(children) => {
            out.push('|');
            for child in children {
                write_filter(out, child);
            }
        }
        Filter::Not(child) => {
            out.push('!');
            write_filter(out, child);
        }
        Filter::EqualityMatch(ava) => write_assertion(out, ava, "="),
        Filter::GreaterOrEqual(ava) => write_assertion(out, ava, ">="),
        Filter::LessOrEqual(ava) => write_assertion(out, ava, "<="),
        Filter::ApproxMatch(ava) => write_assertion(out, ava, "~="),
        Filter::Present(attribute) => {
            out.push_str(attribute.as_str());
            out.push_str("=*");
        }
        Filter::Substrings(sub) => {
            out.push_str(sub.attribute.as_str());
            out.push('=');
            for piece in &sub.substrings {
                match piece {
                    Substring::Initial(value) => out.push_str(&escape::escape(value.as_bytes())),
                    Substring::Any(value) | Substring::Final(value) => {
                        out.push('*');
                        out.push_str(&escape::escape(value.as_bytes()));
                    }
                }
            }
            // A trailing wildcard unless the pattern is end-anchored.
            if !matches!(sub.substrings.last(), Some(Substring::Final(_))) {
                out.push('*');
            }
        }
        Filter::ExtensibleMatch(ext) => {
            if let Some(attribute) = &ext.attribute {
                out.push_str(attribute.as_str());
            }
            if ext.dn_attributes {
                out.push_str(":dn");
            }
            if let Some(rule) = &ext.matching_rule {
                out.push(':');
                out.push_str(rule.as_str());
            }
            out.push_str(":=");
            out.push_str(&escape::escape(ext.value.as_bytes()));
        }
    }
    out.push(')');
}

fn write_assertion(out: &mut String, ava: &AttributeValueAssertion, operator: &str) {
    out.push_str(ava.attribute.as_str());
    out.push_str(operator);
    out.push_str(&escape::escape(ava.value.as_bytes()));
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_text(self))
    }
}

//! Core filter types.
//!
//! This module defines the value-owned filter tree mirroring the
//! RFC 2251 `Filter` CHOICE, together with the validated newtypes it is
//! built from: attribute descriptions, matching rule identifiers, and
//! raw-octet assertion values.

mod attribute;
mod node;
mod substring;
mod value;

pub use attribute::{AttributeDescription, MatchingRuleId};
pub use node::{
    AttributeValueAssertion, Filter, FilterTag, MatchingRuleAssertion, SubstringFilter,
};
pub use substring::{Substring, SubstringTag};
pub use value::AssertionValue;

//! Event-stream traversal over a filter tree.
//!
//! [`FilterWalk`] is a pull iterator over one filter component. The
//! first event is always the component's tag; the following events are
//! the component's fields in a defined order, with nested filters
//! yielded as first-class sub-iterators. The stream carries enough to
//! reconstruct the tree.

use crate::types::{
    AssertionValue, AttributeDescription, Filter, FilterTag, MatchingRuleId, SubstringTag,
};

/// One event yielded while traversing a filter component.
#[derive(Debug, Clone)]
pub enum FilterEvent<'a> {
    /// The component's tag; always the first event.
    Tag(FilterTag),
    /// A nested traversal over one child of an `And`, `Or`, or `Not`.
    Child(FilterWalk<'a>),
    /// The attribute description of an assertion, presence test, or
    /// substring filter.
    Attribute(&'a AttributeDescription),
    /// An assertion or substring piece value.
    Value(&'a AssertionValue),
    /// The matching rule of an extensible match, when present.
    MatchingRule(Option<&'a MatchingRuleId>),
    /// The attribute of an extensible match, when present.
    ExtensibleAttribute(Option<&'a AttributeDescription>),
    /// The dnAttributes flag of an extensible match.
    DnAttributes(bool),
    /// A substring piece tag; its value follows as the next event.
    Piece(SubstringTag),
}

/// Lazy traversal over one filter component.
///
/// Obtained from [`Filter::walk`]. Yields the component's tag first,
/// then its fields:
///
/// - `And`/`Or`: one [`FilterEvent::Child`] per nested filter, in
///   order.
/// - `Not`: one [`FilterEvent::Child`].
/// - Equality/ordering/approximate assertions: attribute, then value.
/// - `Present`: attribute.
/// - `Substrings`: attribute, then piece tag and piece value per piece.
/// - `ExtensibleMatch`: matching rule, attribute, value, dnAttributes.
#[derive(Debug, Clone)]
pub struct FilterWalk<'a> {
    filter: &'a Filter,
    step: usize,
}

impl<'a> FilterWalk<'a> {
    pub(crate) const fn new(filter: &'a Filter) -> Self {
        Self { filter, step: 0 }
    }
}

impl<'a> Iterator for FilterWalk<'a> {
    type Item = FilterEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.step;
        self.step += 1;
        if step == 0 {
            return Some(FilterEvent::Tag(self.filter.tag()));
        }
        let field = step - 1;

        match self.filter {
            Filter::And(children) | Filter::Or(children) => children
                .get(field)
                .map(|child| FilterEvent::Child(FilterWalk::new(child))),
            Filter::Not(child) => {
                (field == 0).then(|| FilterEvent::Child(FilterWalk::new(child)))
            }
            Filter::EqualityMatch(ava)
            | Filter::GreaterOrEqual(ava)
            | Filter::LessOrEqual(ava)
            | Filter::ApproxMatch(ava) => match field {
                0 => Some(FilterEvent::Attribute(&ava.attribute)),
                1 => Some(FilterEvent::Value(&ava.value)),
                _ => None,
            },
            Filter::Present(attribute) => {
                (field == 0).then_some(FilterEvent::Attribute(attribute))
            }
            Filter::Substrings(sub) => {
                if field == 0 {
                    return Some(FilterEvent::Attribute(&sub.attribute));
                }
                let piece = sub.substrings.get((field - 1) / 2)?;
                if (field - 1) % 2 == 0 {
                    Some(FilterEvent::Piece(piece.tag()))
                } else {
                    Some(FilterEvent::Value(piece.value()))
                }
            }
            Filter::ExtensibleMatch(ext) => match field {
                0 => Some(FilterEvent::MatchingRule(ext.matching_rule.as_ref())),
                1 => Some(FilterEvent::ExtensibleAttribute(ext.attribute.as_ref())),
                2 => Some(FilterEvent::Value(&ext.value)),
                3 => Some(FilterEvent::DnAttributes(ext.dn_attributes)),
                _ => None,
            },
        }
    }
}

impl Filter {
    /// Returns a lazy traversal over this filter component.
    #[must_use]
    pub const fn walk(&self) -> FilterWalk<'_> {
        FilterWalk::new(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::FilterParser;

    #[test]
    fn tag_comes_first() {
        let filter = FilterParser::parse("(cn=Jensen)").unwrap();
        let mut walk = filter.walk();
        assert!(matches!(
            walk.next(),
            Some(FilterEvent::Tag(FilterTag::EqualityMatch))
        ));
    }

    #[test]
    fn assertion_fields_in_order() {
        let filter = FilterParser::parse("(sn>=Jensen)").unwrap();
        let events: Vec<_> = filter.walk().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            FilterEvent::Tag(FilterTag::GreaterOrEqual)
        ));
        let FilterEvent::Attribute(attribute) = &events[1] else {
            panic!("expected attribute");
        };
        assert_eq!(attribute.as_str(), "sn");
        let FilterEvent::Value(value) = &events[2] else {
            panic!("expected value");
        };
        assert_eq!(value.as_bytes(), b"Jensen");
    }

    #[test]
    fn present_yields_tag_and_attribute() {
        let filter = FilterParser::parse("(cn=*)").unwrap();
        let events: Vec<_> = filter.walk().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], FilterEvent::Tag(FilterTag::Present)));
        assert!(matches!(events[1], FilterEvent::Attribute(_)));
    }

    #[test]
    fn boolean_yields_children_in_order() {
        let filter = FilterParser::parse("(&(cn=a)(sn=b))").unwrap();
        let mut walk = filter.walk();
        assert!(matches!(walk.next(), Some(FilterEvent::Tag(FilterTag::And))));

        for expected in [&b"a"[..], &b"b"[..]] {
            let Some(FilterEvent::Child(child)) = walk.next() else {
                panic!("expected child traversal");
            };
            let events: Vec<_> = child.collect();
            let FilterEvent::Value(value) = &events[2] else {
                panic!("expected value");
            };
            assert_eq!(value.as_bytes(), expected);
        }
        assert!(walk.next().is_none());
    }

    #[test]
    fn substrings_interleave_piece_tags_and_values() {
        let filter = FilterParser::parse("(o=univ*of*mich*)").unwrap();
        let events: Vec<_> = filter.walk().collect();
        assert!(matches!(events[0], FilterEvent::Tag(FilterTag::Substrings)));
        assert!(matches!(events[1], FilterEvent::Attribute(_)));

        let tags: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                FilterEvent::Piece(tag) => Some(*tag),
                _ => None,
            })
            .collect();
        assert_eq!(
            tags,
            vec![SubstringTag::Initial, SubstringTag::Any, SubstringTag::Any]
        );

        let values: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                FilterEvent::Value(value) => Some(value.as_bytes()),
                _ => None,
            })
            .collect();
        assert_eq!(values, vec![&b"univ"[..], b"of", b"mich"]);
    }

    #[test]
    fn extensible_field_order() {
        let filter = FilterParser::parse("(cn:dn:2.4.6.8.10:=Jensen)").unwrap();
        let events: Vec<_> = filter.walk().collect();
        assert_eq!(events.len(), 5);
        assert!(matches!(
            events[0],
            FilterEvent::Tag(FilterTag::ExtensibleMatch)
        ));
        let FilterEvent::MatchingRule(Some(rule)) = &events[1] else {
            panic!("expected matching rule");
        };
        assert_eq!(rule.as_str(), "2.4.6.8.10");
        let FilterEvent::ExtensibleAttribute(Some(attribute)) = &events[2] else {
            panic!("expected attribute");
        };
        assert_eq!(attribute.as_str(), "cn");
        assert!(matches!(events[3], FilterEvent::Value(_)));
        assert!(matches!(events[4], FilterEvent::DnAttributes(true)));
    }

    #[test]
    fn extensible_absent_fields_yield_none() {
        let filter = FilterParser::parse("(cn:=Jensen)").unwrap();
        let events: Vec<_> = filter.walk().collect();
        assert!(matches!(events[1], FilterEvent::MatchingRule(None)));
        assert!(matches!(events[4], FilterEvent::DnAttributes(false)));
    }
}

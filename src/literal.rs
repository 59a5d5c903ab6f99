//! Literal accumulation and the property-value decision table (component C8, §4.6). Tag-level
//! XML-literal serialization (start/end tag reconstruction, xmlns fabrication) lives in
//! [`crate::driver`] where the raw `quick_xml` event data is available; this module owns the
//! buffers themselves and the decision of which literal/resource kind a closing `@property`
//! element produces.

use std::collections::VecDeque;

use crate::context::EvalContext;
use crate::list::ListItem;
use crate::model::{RawObject, RawTriple, RdfaVersion, ResolvedAttrs};

pub(crate) const RDF_XML_LITERAL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral";

/// Appends `text` to both the plain-literal and XML-literal buffers (XML-escaped in the latter),
/// the *characters* event action of §4.8.
pub(crate) fn append_text(ctx: &mut EvalContext, text: &str) {
    ctx.plain_literal.push_str(text);
    escape_into(&mut ctx.xml_literal, text);
}

fn escape_into(buffer: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => buffer.push_str("&amp;"),
            '<' => buffer.push_str("&lt;"),
            '>' => buffer.push_str("&gt;"),
            _ => buffer.push(ch),
        }
    }
}

/// §4.6's decision table, evaluated once per closing `@property` element: which kind of object
/// every predicate in `@property` shares.
fn compute_property_object(ctx: &EvalContext, attrs: &ResolvedAttrs) -> RawObject {
    if let Some(dt) = attrs.datatype.as_deref() {
        if !dt.is_empty() && dt != RDF_XML_LITERAL {
            let value = attrs.content.clone().unwrap_or_else(|| ctx.plain_literal.clone());
            return RawObject::TypedLiteral {
                value,
                datatype: dt.to_string(),
            };
        }
        if dt == RDF_XML_LITERAL {
            return RawObject::XmlLiteral {
                value: ctx.xml_literal.clone(),
                language: ctx.language.clone(),
            };
        }
    }

    if let Some(content) = &attrs.content {
        return RawObject::PlainLiteral {
            value: content.clone(),
            language: ctx.language.clone(),
        };
    }

    if ctx.rdfa_version == RdfaVersion::V1_1 && !attrs.has_rel_or_rev() {
        if let Some(resource) = attrs
            .resource
            .clone()
            .or_else(|| attrs.href.clone())
            .or_else(|| attrs.src.clone())
            .or_else(|| ctx.typed_resource.clone())
        {
            return RawObject::Resource(resource);
        }
    }

    if !ctx.has_child_elements {
        RawObject::PlainLiteral {
            value: ctx.plain_literal.clone(),
            language: ctx.language.clone(),
        }
    } else {
        RawObject::XmlLiteral {
            value: ctx.xml_literal.clone(),
            language: ctx.language.clone(),
        }
    }
}

fn to_list_item(object: RawObject) -> ListItem {
    match object {
        RawObject::Resource(iri) => ListItem::Resource(iri),
        RawObject::PlainLiteral { value, language } => ListItem::Literal {
            value,
            datatype: None,
            language,
        },
        RawObject::XmlLiteral { value, language } => ListItem::Literal {
            value,
            datatype: Some(RDF_XML_LITERAL.to_string()),
            language,
        },
        RawObject::TypedLiteral { value, datatype } => ListItem::Literal {
            value,
            datatype: Some(datatype),
            language: None,
        },
    }
}

/// The inverse of [`to_list_item`], used when a flushed list cell's member is turned back into a
/// triple object (§4.7).
pub(crate) fn list_item_to_raw_object(item: ListItem) -> RawObject {
    match item {
        ListItem::Resource(iri) => RawObject::Resource(iri),
        ListItem::Literal {
            value,
            datatype: Some(datatype),
            language: _,
        } if datatype == RDF_XML_LITERAL => RawObject::XmlLiteral {
            value,
            language: None,
        },
        ListItem::Literal {
            value,
            datatype: Some(datatype),
            ..
        } => RawObject::TypedLiteral { value, datatype },
        ListItem::Literal {
            value,
            datatype: None,
            language,
        } => RawObject::PlainLiteral { value, language },
    }
}

/// §4.5 step 4: property-value triples, run only when `@property` was present on the closing
/// element. Appends to the list mapping keyed by `(new_subject, predicate)` instead of emitting
/// directly when `@inlist` was also present.
pub(crate) fn emit_property_value_triples(ctx: &mut EvalContext, attrs: &ResolvedAttrs, out: &mut VecDeque<RawTriple>) {
    if attrs.property.is_empty() {
        return;
    }
    let Some(subject) = ctx.new_subject.clone() else {
        return;
    };
    let object = compute_property_object(ctx, attrs);
    for predicate in &attrs.property {
        if attrs.inlist {
            ctx.local_list_mappings
                .push(&subject, predicate, ctx.depth, to_list_item(object.clone()));
        } else {
            out.push_back(RawTriple::new(subject.clone(), predicate.clone(), object.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HostLanguage;

    fn ctx() -> EvalContext {
        let mut c = EvalContext::root("http://example.org/", HostLanguage::Xml1, RdfaVersion::V1_1);
        c.new_subject = Some("http://example.org/s".to_string());
        c
    }

    #[test]
    fn content_wins_over_plain_buffer() {
        let mut c = ctx();
        c.plain_literal = "ignored".to_string();
        let attrs = ResolvedAttrs {
            property: vec!["http://example.org/p".to_string()],
            content: Some("explicit".to_string()),
            ..Default::default()
        };
        let mut out = VecDeque::new();
        emit_property_value_triples(&mut c, &attrs, &mut out);
        assert_eq!(
            out[0].object,
            RawObject::PlainLiteral {
                value: "explicit".to_string(),
                language: None
            }
        );
    }

    #[test]
    fn typed_datatype_uses_plain_buffer_when_no_content() {
        let mut c = ctx();
        c.plain_literal = "42".to_string();
        let attrs = ResolvedAttrs {
            property: vec!["http://example.org/p".to_string()],
            datatype: Some("http://www.w3.org/2001/XMLSchema#integer".to_string()),
            ..Default::default()
        };
        let mut out = VecDeque::new();
        emit_property_value_triples(&mut c, &attrs, &mut out);
        assert_eq!(
            out[0].object,
            RawObject::TypedLiteral {
                value: "42".to_string(),
                datatype: "http://www.w3.org/2001/XMLSchema#integer".to_string()
            }
        );
    }

    #[test]
    fn child_elements_without_datatype_yield_xml_literal() {
        let mut c = ctx();
        c.has_child_elements = true;
        c.xml_literal = "<b>hi</b>".to_string();
        let attrs = ResolvedAttrs {
            property: vec!["http://example.org/p".to_string()],
            ..Default::default()
        };
        let mut out = VecDeque::new();
        emit_property_value_triples(&mut c, &attrs, &mut out);
        assert!(matches!(out[0].object, RawObject::XmlLiteral { .. }));
    }

    #[test]
    fn resource_bearing_attribute_wins_in_1_1_without_rel() {
        let mut c = ctx();
        let attrs = ResolvedAttrs {
            property: vec!["http://example.org/p".to_string()],
            href: Some("http://example.org/target".to_string()),
            ..Default::default()
        };
        let mut out = VecDeque::new();
        emit_property_value_triples(&mut c, &attrs, &mut out);
        assert_eq!(out[0].object, RawObject::Resource("http://example.org/target".to_string()));
    }

    #[test]
    fn inlist_appends_to_list_mapping_instead_of_emitting() {
        let mut c = ctx();
        c.plain_literal = "a".to_string();
        let attrs = ResolvedAttrs {
            property: vec!["http://example.org/p".to_string()],
            inlist: true,
            ..Default::default()
        };
        let mut out = VecDeque::new();
        emit_property_value_triples(&mut c, &attrs, &mut out);
        assert!(out.is_empty());
    }
}

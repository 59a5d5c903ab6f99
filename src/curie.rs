//! CURIE / safe-CURIE classification and resolution (component C4). This is the single point
//! where a raw attribute string becomes either `None` ("generate no triple from this") or an
//! absolute IRI / blank-node label, per the algorithm in the RDFa Core processing rules.

use crate::context::EvalContext;
use crate::mapping::XHTML_VOCAB;

/// Which attribute a value came from, governing which branch of the resolution algorithm
/// applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// `@about`, `@resource`.
    AboutResource,
    /// `@href`, `@src`.
    HrefSrc,
    /// `@typeof`, `@datatype`.
    TypeOrDatatype,
    /// `@property`.
    Property,
    /// `@rel`, `@rev`.
    RelRev,
}

/// The result of resolving a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolved {
    Iri(String),
    BlankNode(String),
}

impl Resolved {
    pub(crate) fn into_string(self) -> String {
        match self {
            Self::Iri(iri) => iri,
            Self::BlankNode(label) => label,
        }
    }
}

/// Whether `value` is a safe CURIE (`[prefix:reference]`), or an IRI-or-unsafe token.
fn is_safe_curie(value: &str) -> bool {
    value.starts_with('[') && value.ends_with(']') && value.len() >= 2
}

/// Splits a bracket-free CURIE candidate on its first `:`, returning `(prefix, reference)`.
/// A value with no `:` has no split and is not a CURIE at all.
fn split_curie(value: &str) -> Option<(&str, &str)> {
    value.split_once(':')
}

/// Resolves a prefixed name (`prefix:reference`, already stripped of brackets if it was a safe
/// CURIE) against the frame's prefix map, per §4.2 step 3.
fn resolve_prefixed_name(ctx: &EvalContext, prefix: &str, reference: &str, mode: Mode) -> Option<Resolved> {
    if prefix == "_" {
        if matches!(mode, Mode::Property | Mode::RelRev) {
            ctx.error("a blank node cannot be used as a predicate IRI");
            return None;
        }
        return Some(Resolved::BlankNode(format!("_:{reference}")));
    }
    if prefix.is_empty() {
        return Some(Resolved::Iri(format!("{XHTML_VOCAB}{reference}")));
    }
    match ctx.prefix_map.get(prefix) {
        Some(iri) => Some(Resolved::Iri(format!("{iri}{reference}"))),
        None => {
            ctx.warn(format!("unrecognized prefix '{prefix}'"));
            None
        }
    }
}

/// Resolves a raw attribute `value` in the given `mode` against the evaluation context `ctx`.
/// Returns `None` to mean "no triple should be generated from this value" (§4.2).
pub(crate) fn resolve_curie(ctx: &EvalContext, value: Option<&str>, mode: Mode) -> Option<Resolved> {
    let value = value?;

    // Step 1: HrefSrc, or 1.0 AboutResource, with an IRI-or-unsafe value resolves as a relative
    // IRI directly, bypassing CURIE syntax entirely.
    let is_unsafe_iri_mode = matches!(mode, Mode::HrefSrc)
        || (ctx.rdfa_version == crate::model::RdfaVersion::V1_0 && matches!(mode, Mode::AboutResource));
    if is_unsafe_iri_mode && !is_safe_curie(value) {
        return Some(Resolved::Iri(crate::iri::resolve(&ctx.base, value)));
    }

    // Step 2: Property with no ':' is a bare term lookup.
    if matches!(mode, Mode::Property) && !value.contains(':') {
        if let Some(iri) = ctx.term_map.get(value, ctx.host_language == crate::model::HostLanguage::Xhtml1) {
            return Some(Resolved::Iri(iri.to_string()));
        }
        if ctx.default_vocabulary.is_none() {
            ctx.warn(format!("unrecognized term '{value}'"));
        }
        // fall through to step 4's default-vocabulary handling
    }

    // Step 5: XHTML1 reserved words for RelRev, searched before the general CURIE algorithm.
    if matches!(mode, Mode::RelRev)
        && ctx.host_language == crate::model::HostLanguage::Xhtml1
        && ctx.default_vocabulary.is_none()
    {
        if let Some(iri) = ctx.term_map.get(value, true) {
            if crate::mapping::XHTML1_TERMS
                .iter()
                .any(|term| term.eq_ignore_ascii_case(value))
            {
                return Some(Resolved::Iri(iri.to_string()));
            }
        }
    }

    // Step 3: safe CURIEs, and IRI-or-unsafe values for the remaining modes, split on ':'.
    let takes_general_curie_path = is_safe_curie(value)
        || matches!(mode, Mode::TypeOrDatatype | Mode::Property | Mode::RelRev)
        || (matches!(mode, Mode::AboutResource) && ctx.rdfa_version == crate::model::RdfaVersion::V1_1);

    let unbracketed = if is_safe_curie(value) {
        &value[1..value.len() - 1]
    } else {
        value
    };

    if takes_general_curie_path {
        if let Some((prefix, reference)) = split_curie(unbracketed) {
            if let Some(resolved) = resolve_prefixed_name(ctx, prefix, reference, mode) {
                return Some(resolved);
            }
            if is_safe_curie(value) {
                // A safe CURIE with an unresolvable prefix yields null outright (§4.2 step 3).
                return None;
            }
        } else if is_safe_curie(value) && (unbracketed == "_" || unbracketed.is_empty()) {
            // handled in step 4 below
        }
    }

    // Step 4: fallbacks.
    if unbracketed == "_" {
        if matches!(mode, Mode::Property | Mode::RelRev) {
            ctx.error("a blank node cannot be used as a predicate IRI");
            return None;
        }
        return Some(Resolved::BlankNode(ctx.document_blank_node()));
    }

    if matches!(mode, Mode::Property | Mode::RelRev | Mode::TypeOrDatatype)
        && ctx.rdfa_version == crate::model::RdfaVersion::V1_1
    {
        if let Some(vocab) = &ctx.default_vocabulary {
            if !value.contains(':') {
                return Some(Resolved::Iri(format!("{vocab}{value}")));
            }
        }
    }

    if matches!(mode, Mode::AboutResource | Mode::Property | Mode::TypeOrDatatype)
        && ctx.rdfa_version == crate::model::RdfaVersion::V1_1
        && !is_safe_curie(value)
        && !value.contains("_:")
    {
        return Some(Resolved::Iri(crate::iri::resolve(&ctx.base, value)));
    }

    None
}

/// Resolves a whitespace-separated list of tokens (used for `@typeof`, `@property`, `@rel`,
/// `@rev`), dropping tokens that resolve to `None`.
pub(crate) fn resolve_curie_list(ctx: &EvalContext, value: Option<&str>, mode: Mode) -> Vec<Resolved> {
    let Some(value) = value else {
        return Vec::new();
    };
    value
        .split_ascii_whitespace()
        .filter_map(|token| resolve_curie(ctx, Some(token), mode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HostLanguage, RdfaVersion};

    fn ctx_with_prefix(prefix: &str, iri: &str) -> EvalContext {
        let mut ctx = EvalContext::root("http://example.org/", HostLanguage::Xml1, RdfaVersion::V1_1);
        ctx.prefix_map.insert(prefix, iri.to_string());
        ctx
    }

    #[test]
    fn curie_round_trip() {
        let ctx = ctx_with_prefix("foaf", "http://xmlns.com/foaf/0.1/");
        let resolved = resolve_curie(&ctx, Some("foaf:name"), Mode::Property);
        assert_eq!(
            resolved,
            Some(Resolved::Iri("http://xmlns.com/foaf/0.1/name".to_string()))
        );
    }

    #[test]
    fn bare_prefix_yields_bare_expansion() {
        let ctx = ctx_with_prefix("foaf", "http://xmlns.com/foaf/0.1/");
        let resolved = resolve_curie(&ctx, Some("foaf:"), Mode::Property);
        assert_eq!(
            resolved,
            Some(Resolved::Iri("http://xmlns.com/foaf/0.1/".to_string()))
        );
    }

    #[test]
    fn unrecognized_prefix_yields_null_and_warns() {
        let ctx = EvalContext::root("http://example.org/", HostLanguage::Xml1, RdfaVersion::V1_1);
        let resolved = resolve_curie(&ctx, Some("nope:x"), Mode::Property);
        assert_eq!(resolved, None);
    }

    #[test]
    fn href_src_is_resolved_as_relative_iri() {
        let ctx = EvalContext::root("http://example.org/a/", HostLanguage::Xml1, RdfaVersion::V1_1);
        let resolved = resolve_curie(&ctx, Some("b"), Mode::HrefSrc);
        assert_eq!(resolved, Some(Resolved::Iri("http://example.org/a/b".to_string())));
    }

    #[test]
    fn blank_node_prefix() {
        let ctx = EvalContext::root("http://example.org/", HostLanguage::Xml1, RdfaVersion::V1_1);
        let resolved = resolve_curie(&ctx, Some("_:x"), Mode::AboutResource);
        assert_eq!(resolved, Some(Resolved::BlankNode("_:x".to_string())));
    }

    #[test]
    fn blank_node_prefix_is_rejected_for_property_and_relrev() {
        let ctx = EvalContext::root("http://example.org/", HostLanguage::Xml1, RdfaVersion::V1_1);
        assert_eq!(resolve_curie(&ctx, Some("_:x"), Mode::Property), None);
        assert_eq!(resolve_curie(&ctx, Some("_:x"), Mode::RelRev), None);
    }

    #[test]
    fn safe_curie_empty_prefix_expands_against_xhtml_vocab() {
        let ctx = EvalContext::root("http://example.org/", HostLanguage::Xml1, RdfaVersion::V1_1);
        let resolved = resolve_curie(&ctx, Some("[:foo]"), Mode::AboutResource);
        assert_eq!(
            resolved,
            Some(Resolved::Iri(format!("{XHTML_VOCAB}foo")))
        );
    }

    #[test]
    fn default_vocabulary_expands_bare_property_term() {
        let mut ctx = EvalContext::root("http://example.org/", HostLanguage::Xml1, RdfaVersion::V1_1);
        ctx.default_vocabulary = Some("http://example.org/vocab#".to_string());
        let resolved = resolve_curie(&ctx, Some("name"), Mode::Property);
        assert_eq!(
            resolved,
            Some(Resolved::Iri("http://example.org/vocab#name".to_string()))
        );
    }
}

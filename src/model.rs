//! Small shared enums used across the evaluation engine.

/// Which RDFa processing rules apply to the current element. May be upgraded mid-document by a
/// `version` attribute containing "RDFa 1.1" (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RdfaVersion {
    V1_0,
    V1_1,
}

/// The host document type, sniffed once before parsing starts (§4.8) and held constant
/// thereafter. Governs term-map case sensitivity and the XHTML1 reserved-word handling in C4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostLanguage {
    Xml1,
    Xhtml1,
    Html,
}

/// The kind of object a resolved triple carries, mirroring the `object_kind` field of §3's data
/// model. `oxrdf::Term` already distinguishes `NamedNode`/`BlankNode`/`Literal`, but
/// `NamespacePrefix` has no `oxrdf` counterpart, hence [`crate::ProcessorMessage::Prefix`] instead
/// of a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObjectKind {
    Iri,
    PlainLiteral,
    XmlLiteral,
    TypedLiteral,
}

/// The resolved form of an element's RDFa-bearing attributes, already passed through the CURIE
/// resolver (C4). Built by the event driver from the raw attribute list before subject
/// establishment (C6) runs.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResolvedAttrs {
    pub(crate) about: Option<String>,
    pub(crate) src: Option<String>,
    pub(crate) resource: Option<String>,
    pub(crate) href: Option<String>,
    pub(crate) typeof_: Vec<String>,
    pub(crate) property: Vec<String>,
    pub(crate) rel: Vec<String>,
    pub(crate) rev: Vec<String>,
    pub(crate) content: Option<String>,
    pub(crate) datatype: Option<String>,
    pub(crate) inlist: bool,
    /// Whether `@vocab` or `@prefix` appeared on this element, needed by the whole-element-skip
    /// short-circuit (§4.4) which a bare RDFa-free element would otherwise trigger.
    pub(crate) has_vocab_or_prefix: bool,
}

/// An object value produced by the evaluation engine, not yet converted to `oxrdf::Term`. Kept
/// distinct from `oxrdf` so the engine can represent a blank-node label or an un-language-tagged
/// plain literal without going through `oxrdf`'s validating constructors on every intermediate
/// step — conversion happens once, at the point a triple is handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawObject {
    /// An absolute IRI or a `_:label` blank node.
    Resource(String),
    PlainLiteral {
        value: String,
        language: Option<String>,
    },
    XmlLiteral {
        value: String,
        language: Option<String>,
    },
    TypedLiteral {
        value: String,
        datatype: String,
    },
}

/// A triple produced by the evaluation engine before conversion to `oxrdf::Triple`. `subject` and
/// `predicate` are absolute IRIs or `_:label` blank-node strings (§3 invariant 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawTriple {
    pub(crate) subject: String,
    pub(crate) predicate: String,
    pub(crate) object: RawObject,
}

impl RawTriple {
    pub(crate) fn new(subject: impl Into<String>, predicate: impl Into<String>, object: RawObject) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

impl ResolvedAttrs {
    pub(crate) fn has_rel_or_rev(&self) -> bool {
        !self.rel.is_empty() || !self.rev.is_empty()
    }

    /// True when none of the RDFa-bearing attributes (nor `@vocab`/`@prefix`) are present, the
    /// condition for the whole-element skip short-circuit (§4.4 last paragraph).
    pub(crate) fn is_rdfa_free(&self) -> bool {
        self.about.is_none()
            && self.src.is_none()
            && self.resource.is_none()
            && self.href.is_none()
            && self.typeof_.is_empty()
            && self.property.is_empty()
            && self.rel.is_empty()
            && self.rev.is_empty()
            && self.content.is_none()
            && self.datatype.is_none()
            && !self.has_vocab_or_prefix
    }
}

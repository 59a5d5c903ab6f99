//! The per-element evaluation frame (component C5): the state threaded through subject
//! establishment (C6), triple emission (C7) and literal accumulation (C8) for a single open
//! element, plus the bookkeeping needed to restore the parent's view of the world on close.

use std::cell::RefCell;
use std::rc::Rc;

use crate::list::ListMappings;
use crate::mapping::{PrefixMap, TermMap, RDFA11_INITIAL_PREFIXES, RDFA11_TERMS, XHTML1_TERMS, XHTML_VOCAB};
use crate::model::{HostLanguage, RdfaVersion, ResolvedAttrs};
use crate::ProcessorMessage;

/// Direction of a deferred ("incomplete") triple, waiting for a descendant to supply the missing
/// subject/object (§3, `incomplete_triples`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Reverse,
    /// Append the descendant's resolved subject to a list mapping instead of emitting a triple.
    None,
}

/// The fixed label for the single document-scoped anonymous blank node that `_:` and `[_:]`
/// resolve to (§4.2 step 4) — one node shared by every reference in the parse, not a fresh one
/// per occurrence.
const DOCUMENT_BLANK_NODE: &str = "_:rdfa-anonymous";

pub(crate) struct EvalContext {
    pub(crate) base: String,
    pub(crate) host_language: HostLanguage,
    pub(crate) rdfa_version: RdfaVersion,

    pub(crate) parent_subject: Option<String>,
    pub(crate) parent_object: Option<String>,
    pub(crate) new_subject: Option<String>,
    pub(crate) current_object_resource: Option<String>,
    pub(crate) typed_resource: Option<String>,

    pub(crate) language: Option<String>,
    pub(crate) default_vocabulary: Option<String>,

    pub(crate) prefix_map: PrefixMap,
    pub(crate) term_map: TermMap,

    pub(crate) incomplete_triples: Vec<(String, Direction)>,
    pub(crate) local_incomplete_triples: Vec<(String, Direction)>,

    pub(crate) list_mappings: ListMappings,
    pub(crate) local_list_mappings: ListMappings,

    pub(crate) skip_element: bool,
    /// Cleared when `@datatype=rdf:XMLLiteral` suppresses further RDFa extraction within the
    /// subtree (§4.6).
    pub(crate) recurse: bool,

    pub(crate) xml_literal: String,
    pub(crate) plain_literal: String,

    /// Set as soon as any child element is opened; used by the §4.6 property-value table to
    /// distinguish a text-only subtree from one containing markup.
    pub(crate) has_child_elements: bool,

    /// This element's own resolved attributes, stashed at open and consumed again at close for
    /// the property-value step (§4.5 step 4) and the `@inlist` list-flush bookkeeping.
    pub(crate) attrs: ResolvedAttrs,

    pub(crate) depth: u32,
    pub(crate) blank_node_counter: Rc<RefCell<u64>>,

    messages: Rc<RefCell<Vec<ProcessorMessage>>>,
}

impl EvalContext {
    /// Builds the root (depth 1) frame, seeded with the fixed RDFa 1.1 prefix set and, for
    /// XHTML1, the reserved term set (§4.8).
    pub(crate) fn root(base: &str, host_language: HostLanguage, rdfa_version: RdfaVersion) -> Self {
        let mut prefix_map = PrefixMap::default();
        for (prefix, iri) in RDFA11_INITIAL_PREFIXES {
            prefix_map.insert(prefix, (*iri).to_string());
        }

        let mut term_map = TermMap::default();
        if host_language == HostLanguage::Xhtml1 {
            for term in XHTML1_TERMS {
                term_map.insert((*term).to_string(), format!("{XHTML_VOCAB}{term}"));
            }
        }
        for (term, iri) in RDFA11_TERMS {
            term_map.insert((*term).to_string(), (*iri).to_string());
        }

        Self {
            base: base.to_string(),
            host_language,
            rdfa_version,
            parent_subject: None,
            parent_object: None,
            new_subject: None,
            current_object_resource: None,
            typed_resource: None,
            language: None,
            default_vocabulary: None,
            prefix_map,
            term_map,
            incomplete_triples: Vec::new(),
            local_incomplete_triples: Vec::new(),
            list_mappings: ListMappings::default(),
            local_list_mappings: ListMappings::default(),
            skip_element: false,
            recurse: true,
            xml_literal: String::new(),
            plain_literal: String::new(),
            has_child_elements: false,
            attrs: ResolvedAttrs::default(),
            depth: 1,
            blank_node_counter: Rc::new(RefCell::new(0)),
            messages: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Pushes a new child frame, copying the inheritable state per the start-event rule of §4.8:
    /// `base`, `host_language`, `rdfa_version`, `language`, `default_vocabulary`, `prefix_map`,
    /// `term_map`, the blank-node counter (shared, not copied) and `local_list_mappings` rebound
    /// as the child's `list_mappings`.
    pub(crate) fn child(&self) -> Self {
        Self {
            base: self.base.clone(),
            host_language: self.host_language,
            rdfa_version: self.rdfa_version,
            parent_subject: self.new_subject.clone(),
            parent_object: self
                .current_object_resource
                .clone()
                .or_else(|| self.new_subject.clone()),
            new_subject: None,
            current_object_resource: None,
            typed_resource: None,
            language: self.language.clone(),
            default_vocabulary: self.default_vocabulary.clone(),
            prefix_map: self.prefix_map.clone(),
            term_map: self.term_map.clone(),
            incomplete_triples: self.local_incomplete_triples.clone(),
            local_incomplete_triples: Vec::new(),
            list_mappings: self.local_list_mappings.clone(),
            local_list_mappings: ListMappings::default(),
            skip_element: false,
            recurse: true,
            xml_literal: String::new(),
            plain_literal: String::new(),
            has_child_elements: false,
            attrs: ResolvedAttrs::default(),
            depth: self.depth + 1,
            blank_node_counter: Rc::clone(&self.blank_node_counter),
            messages: Rc::clone(&self.messages),
        }
    }

    /// Returns the single document-scoped anonymous blank node that `_:`/`[_:]` resolve to.
    pub(crate) fn document_blank_node(&self) -> String {
        DOCUMENT_BLANK_NODE.to_string()
    }

    /// Mints a fresh, never-reused blank node label.
    pub(crate) fn fresh_blank_node(&self) -> String {
        let mut counter = self.blank_node_counter.borrow_mut();
        *counter += 1;
        format!("_:b{counter}")
    }

    /// Records a recoverable warning (unrecognized prefix/term, etc.) into the shared
    /// processor-graph queue, also emitting a `tracing` event (§4.3, §7 category 4).
    pub(crate) fn warn(&self, description: impl Into<String>) {
        self.messages
            .borrow_mut()
            .push(ProcessorMessage::warning(description));
    }

    /// Records a recoverable error (dropped triple) into the shared processor-graph queue.
    pub(crate) fn error(&self, description: impl Into<String>) {
        self.messages
            .borrow_mut()
            .push(ProcessorMessage::error(description));
    }

    /// Drains every processor-graph message recorded so far across the whole frame stack (the
    /// queue is shared by `Rc` so any frame can drain it).
    pub(crate) fn drain_messages(&self) -> Vec<ProcessorMessage> {
        std::mem::take(&mut self.messages.borrow_mut())
    }
}

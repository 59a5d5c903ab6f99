//! The event driver (component C9): glue between the `quick_xml` event stream and the evaluation
//! engine. On each XML event it pushes/pops frames, runs the per-element algorithm of §4.4–§4.7
//! in the fixed order of §4.5, and accumulates literal buffers (§4.6).
//!
//! Namespace handling deliberately uses a plain [`quick_xml::Reader`] rather than `NsReader`:
//! RDFa's prefix→IRI bindings are its own dynamically-scoped `prefix_map` (§4.3), resolved through
//! [`crate::curie`], not through XML's namespace-URI resolution — `NsReader` would resolve exactly
//! the thing we need to keep raw.

use std::collections::{HashSet, VecDeque};

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Reader;

use crate::context::EvalContext;
use crate::curie::{resolve_curie, resolve_curie_list, Mode, Resolved};
use crate::emit::{complete_parent_incompletes, emit_rel_rev_triples, emit_type_triples};
use crate::error::{ProcessorMessage, RdfaParseError, RdfaSyntaxError};
use crate::literal::{append_text, emit_property_value_triples};
use crate::model::{HostLanguage, RawTriple, RdfaVersion, ResolvedAttrs};
use crate::utils::{is_nc_name, is_utf8};

pub(crate) struct RdfaReader<R> {
    reader: Reader<R>,
    frames: Vec<EvalContext>,
    pub(crate) is_end: bool,
}

impl<R: std::io::BufRead> RdfaReader<R> {
    pub(crate) fn new(reader: R, base: &str, host_language: HostLanguage, rdfa_version: RdfaVersion) -> Self {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);
        xml_reader.config_mut().expand_empty_elements = false;
        Self {
            reader: xml_reader,
            frames: vec![EvalContext::root(base, host_language, rdfa_version)],
            is_end: false,
        }
    }

    pub(crate) fn read_event<'a>(&mut self, buffer: &'a mut Vec<u8>) -> Result<Event<'a>, quick_xml::Error> {
        self.reader.read_event_into(buffer)
    }

    pub(crate) fn parse_event(
        &mut self,
        event: Event<'_>,
        triples: &mut VecDeque<RawTriple>,
        messages: &mut Vec<ProcessorMessage>,
    ) -> Result<(), RdfaParseError> {
        let result = match event {
            Event::Start(e) => self.parse_start_event(&e, triples, messages),
            Event::Empty(e) => self
                .parse_start_event(&e, triples, messages)
                .and_then(|()| self.parse_end_event(&e, triples)),
            Event::End(e) => self.parse_end_event(&e, triples),
            Event::Text(e) => self.parse_text_event(&e),
            Event::CData(e) => {
                let unescaped = e.clone().escape()?;
                self.parse_text_event(&unescaped)
            }
            Event::Comment(_) | Event::PI(_) | Event::DocType(_) => Ok(()),
            Event::Decl(decl) => {
                if let Some(encoding) = decl.encoding() {
                    if !is_utf8(&encoding?) {
                        return Err(RdfaSyntaxError::msg("only UTF-8 input is supported").into());
                    }
                }
                Ok(())
            }
            Event::Eof => {
                self.is_end = true;
                Ok(())
            }
        };
        if let Some(root) = self.frames.first() {
            messages.extend(root.drain_messages());
        }
        result
    }

    fn parse_text_event(&mut self, event: &BytesText<'_>) -> Result<(), RdfaParseError> {
        let text = self.reader.decoder().decode(event.as_ref())?;
        if let Some(top) = self.frames.last_mut() {
            append_text(top, &text);
        }
        Ok(())
    }

    fn parse_start_event(
        &mut self,
        event: &BytesStart<'_>,
        triples: &mut VecDeque<RawTriple>,
        messages: &mut Vec<ProcessorMessage>,
    ) -> Result<(), RdfaParseError> {
        let qname = event.name();
        let tag_name = self.reader.decoder().decode(qname.as_ref())?.into_owned();
        let local_name = String::from_utf8_lossy(qname.local_name().as_ref()).into_owned();
        let is_root = self.frames.len() == 1;

        let mut raw_attrs = Vec::new();
        for attribute in event.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::InvalidAttr)?;
            let key = self.reader.decoder().decode(attribute.key.as_ref())?.into_owned();
            let value = attribute
                .decode_and_unescape_value(self.reader.decoder())?
                .into_owned();
            raw_attrs.push((key, value));
        }

        let mut child = self.frames.last().expect("root frame always present").child();

        let mut declared_xmlns = HashSet::new();
        for (key, value) in &raw_attrs {
            if let Some(prefix) = key.strip_prefix("xmlns:") {
                child.prefix_map.insert(prefix, value.clone());
                declared_xmlns.insert(prefix.to_ascii_lowercase());
            } else if key == "xmlns" {
                child.prefix_map.insert_default(value.clone());
            }
        }

        let mut newly_declared_prefixes: Vec<(String, String)> = declared_xmlns
            .iter()
            .filter_map(|p| child.prefix_map.get(p).map(|iri| (p.clone(), iri.to_string())))
            .collect();

        if let Some((_, value)) = raw_attrs.iter().find(|(k, _)| k == "prefix") {
            let tokens: Vec<&str> = value.split_whitespace().collect();
            for pair in tokens.chunks(2) {
                let [prefix_tok, iri] = pair else { continue };
                let Some(prefix) = prefix_tok.strip_suffix(':') else {
                    continue;
                };
                if prefix == "_" {
                    child.warn("the '_' prefix may not be declared with @prefix");
                    continue;
                }
                if !is_nc_name(prefix) {
                    child.warn(format!("prefix '{prefix}' is not a valid NCName"));
                }
                let prefix = prefix.to_ascii_lowercase();
                child.prefix_map.insert(&prefix, (*iri).to_string());
                newly_declared_prefixes.push((prefix, (*iri).to_string()));
            }
        }

        if is_root {
            for (prefix, iri) in &newly_declared_prefixes {
                messages.push(ProcessorMessage::prefix(prefix.clone(), iri.clone()));
            }
        }

        if let Some((_, value)) = raw_attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("xml:lang") || k == "lang")
        {
            match oxilangtag::LanguageTag::parse(value.to_ascii_lowercase()) {
                Ok(tag) => child.language = Some(tag.into_inner()),
                Err(_) => {
                    child.warn(format!("'{value}' is not a valid BCP-47 language tag"));
                    child.language = Some(value.to_ascii_lowercase());
                }
            }
        }

        if let Some((_, value)) = raw_attrs.iter().find(|(k, _)| k == "xml:base") {
            child.base = crate::iri::resolve(&child.base, value);
        }

        if let Some((_, value)) = raw_attrs.iter().find(|(k, _)| k == "vocab") {
            child.default_vocabulary = Some(crate::iri::resolve(&child.base, value));
        }

        if let Some((_, value)) = raw_attrs.iter().find(|(k, _)| k == "version") {
            if value.contains("RDFa 1.1") {
                child.rdfa_version = RdfaVersion::V1_1;
            } else if value.contains("RDFa 1.0") {
                child.rdfa_version = RdfaVersion::V1_0;
            }
        }

        let attrs = resolve_attrs(&child, &raw_attrs);

        let start_tag = serialize_start_tag(&tag_name, &raw_attrs, &declared_xmlns, &child, self.frames.last());
        if let Some(parent) = self.frames.last_mut() {
            parent.xml_literal.push_str(&start_tag);
            parent.has_child_elements = true;
        }

        crate::subject::establish_subject(&mut child, &attrs, &local_name, is_root);
        emit_type_triples(&child, &attrs, triples);
        emit_rel_rev_triples(&mut child, &attrs, triples);

        child.attrs = attrs;
        self.frames.push(child);
        Ok(())
    }

    fn parse_end_event(&mut self, event: &BytesEnd<'_>, triples: &mut VecDeque<RawTriple>) -> Result<(), RdfaParseError> {
        let tag_name = self.reader.decoder().decode(event.name().as_ref())?.into_owned();
        let mut top = self.frames.pop().expect("start/end events are balanced");

        top.xml_literal.push_str(&format!("</{tag_name}>"));

        if !top.attrs.property.is_empty() {
            let attrs = top.attrs.clone();
            emit_property_value_triples(&mut top, &attrs, triples);
        }

        let closing_depth = top.depth;

        if let Some(parent) = self.frames.last_mut() {
            parent.plain_literal.push_str(&top.plain_literal);
            parent.xml_literal.push_str(&top.xml_literal);
        }

        complete_parent_incompletes(&mut top, triples);

        let counter = std::rc::Rc::clone(&top.blank_node_counter);
        let mut flushed = Vec::new();
        let list_mappings = top.list_mappings.clone();
        top.local_list_mappings.flush(
            closing_depth,
            &list_mappings,
            || {
                let mut c = counter.borrow_mut();
                *c += 1;
                format!("_:b{c}")
            },
            |s, p, item| flushed.push((s.to_string(), p.to_string(), item)),
        );
        for (s, p, item) in flushed {
            triples.push_back(RawTriple::new(s, p, crate::literal::list_item_to_raw_object(item)));
        }

        let survivors = top.local_list_mappings.retain_at_or_below(closing_depth);
        if let Some(parent) = self.frames.last_mut() {
            survivors.merge_into(&mut parent.local_list_mappings);
        }

        Ok(())
    }
}

fn resolve_attrs(ctx: &EvalContext, raw_attrs: &[(String, String)]) -> ResolvedAttrs {
    let get = |name: &str| raw_attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str());

    ResolvedAttrs {
        about: resolve_curie(ctx, get("about"), Mode::AboutResource).map(Resolved::into_string),
        src: resolve_curie(ctx, get("src"), Mode::HrefSrc).map(Resolved::into_string),
        resource: resolve_curie(ctx, get("resource"), Mode::AboutResource).map(Resolved::into_string),
        href: resolve_curie(ctx, get("href"), Mode::HrefSrc).map(Resolved::into_string),
        typeof_: resolve_curie_list(ctx, get("typeof"), Mode::TypeOrDatatype)
            .into_iter()
            .map(Resolved::into_string)
            .collect(),
        property: resolve_curie_list(ctx, get("property"), Mode::Property)
            .into_iter()
            .map(Resolved::into_string)
            .collect(),
        rel: resolve_curie_list(ctx, get("rel"), Mode::RelRev)
            .into_iter()
            .map(Resolved::into_string)
            .collect(),
        rev: resolve_curie_list(ctx, get("rev"), Mode::RelRev)
            .into_iter()
            .map(Resolved::into_string)
            .collect(),
        content: get("content").map(str::to_string),
        datatype: resolve_curie(ctx, get("datatype"), Mode::TypeOrDatatype).map(Resolved::into_string),
        inlist: get("inlist").is_some(),
        has_vocab_or_prefix: get("vocab").is_some() || get("prefix").is_some(),
    }
}

/// Re-serializes a start tag for XML-literal accumulation (§4.6): original name and attribute
/// values verbatim, plus fabricated `xmlns:` declarations for any prefix this element's own tag or
/// attribute names reference but did not itself declare, plus an injected `xml:lang` when the
/// parent context carries a language this element doesn't override.
fn serialize_start_tag(
    tag_name: &str,
    raw_attrs: &[(String, String)],
    declared_xmlns: &HashSet<String>,
    child: &EvalContext,
    parent: Option<&EvalContext>,
) -> String {
    let mut used_prefixes = HashSet::new();
    if let Some((prefix, _)) = tag_name.split_once(':') {
        used_prefixes.insert(prefix.to_ascii_lowercase());
    }
    for (key, _) in raw_attrs {
        if let Some((prefix, _)) = key.split_once(':') {
            if prefix != "xmlns" && prefix != "xml" {
                used_prefixes.insert(prefix.to_ascii_lowercase());
            }
        }
    }

    let mut out = format!("<{tag_name}");
    for prefix in &used_prefixes {
        if declared_xmlns.contains(prefix) {
            continue;
        }
        if let Some(iri) = child.prefix_map.get(prefix) {
            out.push_str(&format!(" xmlns:{prefix}=\"{iri}\""));
        }
    }

    let has_lang_attr = raw_attrs
        .iter()
        .any(|(k, _)| k.eq_ignore_ascii_case("xml:lang") || k == "lang");
    if !has_lang_attr {
        if let Some(lang) = parent.and_then(|p| p.language.as_deref()) {
            out.push_str(&format!(" xml:lang=\"{lang}\""));
        }
    }

    for (key, value) in raw_attrs {
        out.push_str(&format!(" {key}=\"{}\"", escape_attr_value(value)));
    }
    out.push('>');
    out
}

fn escape_attr_value(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}

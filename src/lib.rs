#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod config;
mod context;
mod curie;
mod driver;
mod emit;
mod error;
mod iri;
mod list;
mod literal;
mod mapping;
mod model;
mod sniff;
mod subject;
mod utils;

use std::collections::VecDeque;
use std::io::{BufReader, Cursor, Read};

use oxrdf::{BlankNode, Literal, NamedNode, Subject, Term, Triple};

pub use crate::config::{HostLanguageHint, RdfaParser, RdfaVersionHint};
pub use crate::error::{ProcessorMessage, RdfaConfigError, RdfaParseError, RdfaSyntaxError, TextPosition};

use crate::model::{HostLanguage, RawObject, RawTriple, RdfaVersion};

impl RdfaParser {
    /// Parses an RDFa document from a [`Read`] implementation.
    ///
    /// Sniffs the leading bytes of `read` for a host-language/RDFa-version DOCTYPE and a `<base>`
    /// element (§4.8) before streaming the rest; the version/host-language hints set via
    /// [`with_rdfa_version_hint`](Self::with_rdfa_version_hint) and
    /// [`with_host_language_hint`](Self::with_host_language_hint) override whatever sniffing finds.
    pub fn parse_read<R: Read>(self, read: R) -> FromReadRdfaReader<R> {
        let mut chunk = vec![0u8; sniff::MAX_SNIFF_BYTES];
        let mut read = read;
        let mut filled = 0;
        let mut pending_error = None;
        loop {
            if filled == chunk.len() {
                break;
            }
            match read.read(&mut chunk[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    pending_error = Some(e);
                    break;
                }
            }
        }
        chunk.truncate(filled);

        let sniffed = sniff::sniff(&chunk);
        let host_language = self
            .host_language_hint
            .resolve()
            .or(sniffed.host_language)
            .unwrap_or(HostLanguage::Xml1);
        let rdfa_version = self
            .rdfa_version_hint
            .resolve()
            .or(sniffed.rdfa_version)
            .unwrap_or(RdfaVersion::V1_1);
        let base_str = self.base.into_inner();
        let base = sniffed
            .base_href
            .map(|href| crate::iri::resolve(&base_str, &href))
            .unwrap_or(base_str);

        let chained = Cursor::new(chunk).chain(read);
        FromReadRdfaReader {
            triples: VecDeque::new(),
            messages: Vec::new(),
            reader: driver::RdfaReader::new(BufReader::new(chained), &base, host_language, rdfa_version),
            reader_buffer: Vec::new(),
            pending_error,
        }
    }
}

/// Parses an RDFa document from a [`Read`] implementation. Built with [`RdfaParser::parse_read`].
///
/// Yields default-graph triples (§4.1–§4.7) as they are produced; processor-graph messages
/// (namespace declarations, recoverable warnings and errors, §7) accumulate separately and are
/// retrieved with [`drain_processor_messages`](Self::drain_processor_messages).
#[must_use]
pub struct FromReadRdfaReader<R: Read> {
    triples: VecDeque<RawTriple>,
    messages: Vec<ProcessorMessage>,
    reader: driver::RdfaReader<BufReader<std::io::Chain<Cursor<Vec<u8>>, R>>>,
    reader_buffer: Vec<u8>,
    pending_error: Option<std::io::Error>,
}

impl<R: Read> Iterator for FromReadRdfaReader<R> {
    type Item = Result<Triple, RdfaParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(error) = self.pending_error.take() {
                return Some(Err(error.into()));
            }
            if let Some(raw) = self.triples.pop_front() {
                return Some(Ok(to_triple(raw)));
            } else if self.reader.is_end {
                return None;
            }
            if let Err(e) = self.parse_step() {
                return Some(Err(e));
            }
        }
    }
}

impl<R: Read> FromReadRdfaReader<R> {
    /// Drains every processor-graph message (namespace declarations, warnings, errors) produced
    /// so far. A caller who never calls this simply never observes them — they do not affect the
    /// default-graph triple stream.
    pub fn drain_processor_messages(&mut self) -> Vec<ProcessorMessage> {
        std::mem::take(&mut self.messages)
    }

    fn parse_step(&mut self) -> Result<(), RdfaParseError> {
        self.reader_buffer.clear();
        let event = self.reader.read_event(&mut self.reader_buffer)?;
        self.reader.parse_event(event, &mut self.triples, &mut self.messages)
    }
}

fn to_subject(label: &str) -> Subject {
    match label.strip_prefix("_:") {
        Some(id) => Subject::BlankNode(BlankNode::new_unchecked(id)),
        None => Subject::NamedNode(NamedNode::new_unchecked(label)),
    }
}

fn to_resource_term(label: &str) -> Term {
    match label.strip_prefix("_:") {
        Some(id) => Term::BlankNode(BlankNode::new_unchecked(id)),
        None => Term::NamedNode(NamedNode::new_unchecked(label)),
    }
}

fn to_term(object: RawObject) -> Term {
    match object {
        RawObject::Resource(iri) => to_resource_term(&iri),
        RawObject::PlainLiteral { value, language } => match language {
            Some(language) => Literal::new_language_tagged_literal_unchecked(value, language).into(),
            None => Literal::new_simple_literal(value).into(),
        },
        RawObject::XmlLiteral { value, .. } => {
            Literal::new_typed_literal(value, NamedNode::new_unchecked(literal::RDF_XML_LITERAL)).into()
        }
        RawObject::TypedLiteral { value, datatype } => {
            Literal::new_typed_literal(value, NamedNode::new_unchecked(datatype)).into()
        }
    }
}

fn to_triple(raw: RawTriple) -> Triple {
    Triple::new(
        to_subject(&raw.subject),
        NamedNode::new_unchecked(raw.predicate),
        to_term(raw.object),
    )
}

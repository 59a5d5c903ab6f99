use oxilangtag::LanguageTagParseError;
use oxiri::IriParseError;
use quick_xml::encoding::EncodingError;
use quick_xml::events::attributes::AttrError;
use std::io;
use std::ops::Range;
use std::sync::Arc;

/// Error returned when building an [`RdfaParser`](crate::RdfaParser).
#[derive(Debug, thiserror::Error)]
pub enum RdfaConfigError {
    /// The supplied document base is not an absolute IRI.
    #[error("the RDFa document base must be an absolute IRI: {0}")]
    InvalidBaseIri(#[from] IriParseError),
}

/// Error returned during RDFa parsing.
///
/// Only XML well-formedness errors and I/O errors are fatal here. Unrecognized prefixes,
/// unrecognized terms and the other recoverable conditions of the processor-graph taxonomy
/// never appear as a `RdfaParseError`: they are reported through
/// [`ProcessorMessage`](crate::ProcessorMessage) and parsing continues.
#[derive(Debug, thiserror::Error)]
pub enum RdfaParseError {
    /// I/O error while reading the input.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An error in the document syntax.
    #[error(transparent)]
    Syntax(#[from] RdfaSyntaxError),
}

impl From<RdfaParseError> for io::Error {
    #[inline]
    fn from(error: RdfaParseError) -> Self {
        match error {
            RdfaParseError::Io(error) => error,
            RdfaParseError::Syntax(error) => error.into(),
        }
    }
}

#[doc(hidden)]
impl From<quick_xml::Error> for RdfaParseError {
    #[inline]
    fn from(error: quick_xml::Error) -> Self {
        match error {
            quick_xml::Error::Io(error) => {
                Self::Io(Arc::try_unwrap(error).unwrap_or_else(|e| io::Error::new(e.kind(), e)))
            }
            _ => Self::Syntax(RdfaSyntaxError {
                inner: SyntaxErrorKind::Xml(error),
                position: None,
            }),
        }
    }
}

#[doc(hidden)]
impl From<EncodingError> for RdfaParseError {
    fn from(error: EncodingError) -> Self {
        quick_xml::Error::from(error).into()
    }
}

#[doc(hidden)]
impl From<AttrError> for RdfaParseError {
    fn from(error: AttrError) -> Self {
        quick_xml::Error::from(error).into()
    }
}

/// A position in the input: a `line` number starting from 0, a `column` number starting from 0
/// (in code points) and a global file `offset` starting from 0 (in bytes).
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct TextPosition {
    pub line: u64,
    pub column: u64,
    pub offset: u64,
}

/// An error in the syntax of the parsed document: XML well-formedness, a malformed `xml:base`
/// or `xml:lang`, or an internal contract violation such as an unbalanced tag stack.
#[derive(Debug)]
pub struct RdfaSyntaxError {
    inner: SyntaxErrorKind,
    position: Option<Range<TextPosition>>,
}

impl std::fmt::Display for RdfaSyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(position) = &self.position {
            write!(
                f,
                "{} at line {}, column {}",
                self.inner, position.start.line, position.start.column
            )
        } else {
            write!(f, "{}", self.inner)
        }
    }
}

impl std::error::Error for RdfaSyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

#[derive(Debug, thiserror::Error)]
enum SyntaxErrorKind {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error("error while parsing IRI '{iri}': {error}")]
    InvalidIri {
        iri: String,
        #[source]
        error: IriParseError,
    },
    #[error("error while parsing language tag '{tag}': {error}")]
    InvalidLanguageTag {
        tag: String,
        #[source]
        error: LanguageTagParseError,
    },
    #[error("{0}")]
    Msg(String),
}

impl RdfaSyntaxError {
    /// Builds an error from a printable error message.
    pub(crate) fn msg(msg: impl Into<String>) -> Self {
        Self {
            inner: SyntaxErrorKind::Msg(msg.into()),
            position: None,
        }
    }

    pub(crate) fn invalid_iri(iri: String, error: IriParseError) -> Self {
        Self {
            inner: SyntaxErrorKind::InvalidIri { iri, error },
            position: None,
        }
    }

    pub(crate) fn invalid_language_tag(tag: String, error: LanguageTagParseError) -> Self {
        Self {
            inner: SyntaxErrorKind::InvalidLanguageTag { tag, error },
            position: None,
        }
    }

    /// Returns the location of the error inside of the file, when known.
    pub fn location(&self) -> Option<Range<TextPosition>> {
        self.position.clone()
    }
}

impl From<RdfaSyntaxError> for io::Error {
    #[inline]
    fn from(error: RdfaSyntaxError) -> Self {
        match error.inner {
            SyntaxErrorKind::Xml(error) => match error {
                quick_xml::Error::Io(error) => {
                    Arc::try_unwrap(error).unwrap_or_else(|e| Self::new(e.kind(), e))
                }
                _ => Self::new(io::ErrorKind::InvalidData, error),
            },
            SyntaxErrorKind::Msg(msg) => Self::new(io::ErrorKind::InvalidData, msg),
            other => Self::new(io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}

/// A warning, error or namespace-declaration pseudo-triple about the parse itself, delivered
/// through the processor graph (separately from the default-graph triples).
///
/// Absence of a consumer silently discards these: a caller who never calls
/// [`FromReadRdfaReader::drain_processor_messages`](crate::FromReadRdfaReader::drain_processor_messages)
/// simply never observes them. Every message is additionally emitted as a `tracing` event so it
/// remains visible to normal log aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorMessage {
    /// A namespace prefix was newly established on the root element. Wire form:
    /// `subject="@prefix"`, `predicate=prefix`, `object=iri`.
    Prefix { prefix: String, iri: String },
    /// A recoverable condition that did not prevent a triple from being considered, but that a
    /// careful document author would want to fix (unrecognized term, missing prefix, reserved
    /// prefix declaration, ...).
    Warning {
        description: String,
        line: Option<u64>,
    },
    /// A recoverable condition that caused a triple to be dropped (e.g. an unknown object kind
    /// at emission time, or a blank node used as a predicate).
    Error {
        description: String,
        line: Option<u64>,
    },
}

impl ProcessorMessage {
    pub(crate) fn warning(description: impl Into<String>) -> Self {
        let description = description.into();
        tracing::warn!(%description, "RDFa processor warning");
        Self::Warning {
            description,
            line: None,
        }
    }

    pub(crate) fn error(description: impl Into<String>) -> Self {
        let description = description.into();
        tracing::error!(%description, "RDFa processor error");
        Self::Error {
            description,
            line: None,
        }
    }

    pub(crate) fn prefix(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let iri = iri.into();
        tracing::debug!(%prefix, %iri, "RDFa namespace prefix declared");
        Self::Prefix { prefix, iri }
    }
}

use oxiri::Iri;

use crate::error::RdfaConfigError;
use crate::model::{HostLanguage, RdfaVersion};

/// Recommended bounds from §6.4. Growable collections back every one of these in this
/// implementation, so none of them are enforced: they exist as documentation of the scale the
/// design was sized for, not as a hard limit. Implementations may grow them; this one already has,
/// unconditionally.
pub const DEFAULT_MAX_URI_MAPPINGS: usize = 128;
pub const DEFAULT_MAX_TERM_MAPPINGS: usize = 64;
pub const DEFAULT_MAX_LIST_MAPPINGS: usize = 48;
pub const DEFAULT_MAX_LOCAL_LIST_MAPPINGS: usize = 32;
pub const DEFAULT_MAX_LIST_ITEMS: usize = 16;

/// Overrides the document sniffing of §4.8 when set to anything other than `Auto`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RdfaVersionHint {
    #[default]
    Auto,
    V1_0,
    V1_1,
}

/// Overrides host-language sniffing when set to anything other than `Auto`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostLanguageHint {
    #[default]
    Auto,
    Xml1,
    Xhtml1,
    Html,
}

impl RdfaVersionHint {
    pub(crate) fn resolve(self) -> Option<RdfaVersion> {
        match self {
            Self::Auto => None,
            Self::V1_0 => Some(RdfaVersion::V1_0),
            Self::V1_1 => Some(RdfaVersion::V1_1),
        }
    }
}

impl HostLanguageHint {
    pub(crate) fn resolve(self) -> Option<HostLanguage> {
        match self {
            Self::Auto => None,
            Self::Xml1 => Some(HostLanguage::Xml1),
            Self::Xhtml1 => Some(HostLanguage::Xhtml1),
            Self::Html => Some(HostLanguage::Html),
        }
    }
}

/// Builds an [`RdfaReader`](crate::FromReadRdfaReader), or rather the `parse_read` entry point
/// for one. Unlike [`oxrdfxml::RdfXmlParser`](https://docs.rs/oxrdfxml), the document `base` here
/// is mandatory: §7 category 2 makes a missing base a construction-time failure rather than an
/// `Option` silently left unset.
///
/// ```
/// use oxrdfa::RdfaParser;
///
/// let file = br#"<html xmlns:foaf="http://xmlns.com/foaf/0.1/">
/// <body typeof="foaf:Person" about="http://example.com/bob">
///   <span property="foaf:name">Bob</span>
/// </body></html>"#;
///
/// let mut count = 0;
/// for triple in RdfaParser::new("http://example.com/")?.parse_read(file.as_ref()) {
///     triple?;
///     count += 1;
/// }
/// assert_eq!(2, count);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct RdfaParser {
    pub(crate) base: Iri<String>,
    pub(crate) rdfa_version_hint: RdfaVersionHint,
    pub(crate) host_language_hint: HostLanguageHint,
}

impl RdfaParser {
    /// Builds a new [`RdfaParser`]. Fails if `base` is not an absolute IRI (§7 category 2).
    pub fn new(base: impl Into<String>) -> Result<Self, RdfaConfigError> {
        Ok(Self {
            base: Iri::parse(base.into())?,
            rdfa_version_hint: RdfaVersionHint::default(),
            host_language_hint: HostLanguageHint::default(),
        })
    }

    #[inline]
    pub fn with_rdfa_version_hint(mut self, hint: RdfaVersionHint) -> Self {
        self.rdfa_version_hint = hint;
        self
    }

    #[inline]
    pub fn with_host_language_hint(mut self, hint: HostLanguageHint) -> Self {
        self.host_language_hint = hint;
        self
    }
}

//! Pre-parse sniffing (§4.8, "Base-IRI sniffing"): before the SAX pass starts, the leading bytes
//! of the document are scanned for DOCTYPE signatures identifying the host language and RDFa
//! version, and for a `<base href="…">` inside `<head>`.

use crate::model::{HostLanguage, RdfaVersion};

/// Upper bound on how many leading bytes are scanned, per §4.8.
pub(crate) const MAX_SNIFF_BYTES: usize = 131_072;

const XHTML_RDFA_10_DOCTYPE: &str = "-//W3C//DTD XHTML+RDFa 1.0//EN";
const XHTML_RDFA_11_DOCTYPE: &str = "-//W3C//DTD XHTML+RDFa 1.1//EN";

#[derive(Debug, Clone, Default)]
pub(crate) struct Sniffed {
    pub(crate) host_language: Option<HostLanguage>,
    pub(crate) rdfa_version: Option<RdfaVersion>,
    pub(crate) base_href: Option<String>,
}

/// Scans the first `MAX_SNIFF_BYTES` of `input` for DOCTYPE/`<html>`/`<base>` signatures.
pub(crate) fn sniff(input: &[u8]) -> Sniffed {
    let window = &input[..input.len().min(MAX_SNIFF_BYTES)];
    let text = String::from_utf8_lossy(window);

    let mut sniffed = Sniffed::default();

    if text.contains(XHTML_RDFA_11_DOCTYPE) {
        sniffed.host_language = Some(HostLanguage::Xhtml1);
        sniffed.rdfa_version = Some(RdfaVersion::V1_1);
    } else if text.contains(XHTML_RDFA_10_DOCTYPE) {
        sniffed.host_language = Some(HostLanguage::Xhtml1);
        sniffed.rdfa_version = Some(RdfaVersion::V1_0);
    } else if has_html_opener(&text) {
        sniffed.host_language = Some(HostLanguage::Html);
        sniffed.rdfa_version = Some(RdfaVersion::V1_1);
    }

    sniffed.base_href = sniff_base_href(&text);
    sniffed
}

fn has_html_opener(text: &str) -> bool {
    text.find("<html").is_some_and(|i| {
        text[i + "<html".len()..]
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || c == '>' || c == '/')
    })
}

/// Extracts the `href` value of the first `<base …>` tag found anywhere in the scanned window.
/// Real documents only ever place it inside `<head>`; we don't bother re-validating that since a
/// stray `<base>` elsewhere is the document author's problem, not ours to detect.
fn sniff_base_href(text: &str) -> Option<String> {
    let base_start = text.find("<base")?;
    let tag_end = text[base_start..].find('>')? + base_start;
    let tag = &text[base_start..tag_end];
    let href_start = tag.find("href")?;
    let after_href = &tag[href_start + 4..];
    let eq = after_href.find('=')?;
    let rest = after_href[eq + 1..].trim_start();
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let value_start = 1;
    let value_end = rest[value_start..].find(quote)? + value_start;
    Some(rest[value_start..value_end].to_string())
}

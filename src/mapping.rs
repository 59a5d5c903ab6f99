//! Ordered key→value mappings for prefixes, terms and per-subject list accumulators (component
//! C2). A handful of entries is typical per element, so a linear-scan `Vec` that preserves
//! insertion order is the right container — no hashing dependency, and order is exactly what the
//! list-mapping flush logic (§4.7) needs to tolerate in-flight deletion of the current key.

/// The XHTML vocabulary IRI that an empty-prefix CURIE (`:foo`, `[:foo]`) expands against.
/// Hard-coded as a configuration constant, never looked up at runtime.
pub(crate) const XHTML_VOCAB: &str = "http://www.w3.org/1999/xhtml/vocab#";

/// Reserved key for the empty (default) `xmlns` prefix in [`PrefixMap`].
const DEFAULT_PREFIX_KEY: &str = "";

/// An ordered prefix → IRI map. Prefixes are case-folded to lower case on insertion and lookup,
/// per §3's evaluation-frame field description.
#[derive(Debug, Clone, Default)]
pub(crate) struct PrefixMap(Vec<(String, String)>);

impl PrefixMap {
    pub(crate) fn get(&self, prefix: &str) -> Option<&str> {
        let key = prefix.to_ascii_lowercase();
        self.0
            .iter()
            .rev()
            .find(|(p, _)| *p == key)
            .map(|(_, iri)| iri.as_str())
    }

    /// Establishes (or overrides) a prefix binding on this frame.
    pub(crate) fn insert(&mut self, prefix: &str, iri: String) {
        let key = prefix.to_ascii_lowercase();
        if let Some(entry) = self.0.iter_mut().find(|(p, _)| *p == key) {
            entry.1 = iri;
        } else {
            self.0.push((key, iri));
        }
    }

    pub(crate) fn insert_default(&mut self, iri: String) {
        self.insert(DEFAULT_PREFIX_KEY, iri);
    }
}

/// An ordered term → IRI map. Lookup case-sensitivity depends on the host language (exact-case in
/// XML1/HTML, case-insensitive in XHTML1); insertion always preserves the term's original case.
#[derive(Debug, Clone, Default)]
pub(crate) struct TermMap(Vec<(String, String)>);

impl TermMap {
    pub(crate) fn get(&self, term: &str, case_insensitive: bool) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(t, _)| {
                if case_insensitive {
                    t.eq_ignore_ascii_case(term)
                } else {
                    t == term
                }
            })
            .map(|(_, iri)| iri.as_str())
    }

    pub(crate) fn insert(&mut self, term: String, iri: String) {
        self.0.push((term, iri));
    }
}

/// The fixed RDFa 1.1 default prefix mappings (a representative subset of the published RDFa 1.1
/// initial context, `https://www.w3.org/2011/rdfa-context/rdfa-1.1`), seeded into the root frame
/// before parsing starts.
pub(crate) const RDFA11_INITIAL_PREFIXES: &[(&str, &str)] = &[
    ("dc", "http://purl.org/dc/terms/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("schema", "http://schema.org/"),
    ("vcard", "http://www.w3.org/2006/vcard/ns#"),
    ("og", "http://ogp.me/ns#"),
    ("cc", "http://creativecommons.org/ns#"),
    ("ical", "http://www.w3.org/2002/12/cal/icaltzd#"),
    ("sioc", "http://rdfs.org/sioc/ns#"),
    ("gr", "http://purl.org/goodrelations/v1#"),
    ("grddl", "http://www.w3.org/2003/g/data-view#"),
    ("ma", "http://www.w3.org/ns/ma-ont#"),
    ("rif", "http://www.w3.org/2007/rif#"),
    ("rr", "http://www.w3.org/ns/r2rml#"),
    ("sig", "http://www.w3.org/2009/signature#"),
    ("v", "http://rdf.data-vocabulary.org/#"),
    ("void", "http://rdfs.org/ns/void#"),
    ("wdr", "http://www.w3.org/2007/05/powder#"),
    ("wdrs", "http://www.w3.org/2007/05/powder-s#"),
    ("xhv", XHTML_VOCAB),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
];

/// Reserved XHTML1 `@rel`/`@rev` words, seeded as terms (expanding against [`XHTML_VOCAB`]) in
/// addition to the RDFa 1.1 terms below. See the RDFa-in-XHTML host language rules (§4.2 step 5).
pub(crate) const XHTML1_TERMS: &[&str] = &[
    "alternate",
    "appendix",
    "bookmark",
    "cite",
    "chapter",
    "contents",
    "copyright",
    "first",
    "glossary",
    "help",
    "icon",
    "index",
    "last",
    "license",
    "meta",
    "next",
    "p3pv1",
    "prev",
    "role",
    "section",
    "stylesheet",
    "start",
    "subsection",
    "top",
    "up",
];

/// Additional RDFa 1.1 default terms (not XHTML1-specific).
pub(crate) const RDFA11_TERMS: &[(&str, &str)] = &[
    ("describedby", "http://www.w3.org/2007/05/powder-s#describedby"),
    ("license", "http://www.w3.org/1999/xhtml/vocab#license"),
    ("role", "http://www.w3.org/1999/xhtml/vocab#role"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_map_case_folds() {
        let mut map = PrefixMap::default();
        map.insert("Foaf", "http://xmlns.com/foaf/0.1/".to_string());
        assert_eq!(
            map.get("foaf"),
            Some("http://xmlns.com/foaf/0.1/")
        );
        assert_eq!(
            map.get("FOAF"),
            Some("http://xmlns.com/foaf/0.1/")
        );
    }

    #[test]
    fn prefix_map_override_keeps_insertion_order() {
        let mut map = PrefixMap::default();
        map.insert("ex", "http://first.example/".to_string());
        map.insert("ex", "http://second.example/".to_string());
        assert_eq!(map.get("ex"), Some("http://second.example/"));
    }

    #[test]
    fn term_map_lookup_modes() {
        let mut map = TermMap::default();
        map.insert("Describedby".to_string(), "http://example.org/d".to_string());
        assert_eq!(map.get("Describedby", false), Some("http://example.org/d"));
        assert_eq!(map.get("describedby", false), None);
        assert_eq!(map.get("describedby", true), Some("http://example.org/d"));
    }
}

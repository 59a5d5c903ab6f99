//! IRI utilities used by the RDFa engine (component C3 of the design): stripping a base IRI down
//! to its `ihier-part`, and resolving a relative reference against a base following RFC 3986 §5.
//!
//! This is deliberately narrower than full IRI parsing (scheme/authority validation is the job
//! of [`oxiri`], used at the configuration boundary in [`crate::config`]): these functions are
//! total over `&str` and never fail, matching how the evaluation engine treats a syntactically
//! odd IRI as data to carry forward rather than as an error to raise.

/// Returns the substring of `iri` up to but excluding the first `?`, or failing that the first
/// `#`; if neither is present, returns a copy of `iri`.
pub(crate) fn strip_to_base(iri: &str) -> String {
    if let Some(index) = iri.find('?') {
        iri[..index].to_string()
    } else if let Some(index) = iri.find('#') {
        iri[..index].to_string()
    } else {
        iri.to_string()
    }
}

/// Resolves `reference` against `base` following RFC 3986 §5, applying remove-dot-segments to
/// the path of the result when both `base` and the freshly-built result contain a scheme
/// authority (`://`).
pub(crate) fn resolve(base: &str, reference: &str) -> String {
    if reference.is_empty() {
        return base.to_string();
    }
    if reference.contains(':') {
        // An absolute IRI (or at least something with a `:` early enough to look like one):
        // used as-is, modulo the dot-segment cleanup applied below.
        return finish(base, reference.to_string());
    }
    if reference.starts_with('#') || reference.starts_with('?') {
        return finish(base, format!("{base}{reference}"));
    }
    if let Some(rest) = reference.strip_prefix('/') {
        let prefix = &base[..path_start(base)];
        return finish(base, format!("{prefix}/{rest}"));
    }
    let last_slash = base.rfind('/');
    let prefix = match last_slash {
        Some(index) if index >= path_start(base) => base[..=index].to_string(),
        _ => format!("{base}/"),
    };
    finish(base, format!("{prefix}{reference}"))
}

fn finish(base: &str, raw: String) -> String {
    if base.contains("://") && raw.contains("://") {
        remove_dot_segments_from_iri(&raw)
    } else {
        raw
    }
}

/// Index of the first byte of `s`'s path, i.e. right after its scheme and authority
/// (`scheme://authority`). Returns `s.len()` if `s` has no path component at all.
fn path_start(s: &str) -> usize {
    let Some(scheme_end) = s.find("://") else {
        return 0;
    };
    let authority_start = scheme_end + 3;
    match s[authority_start..].find('/') {
        Some(offset) => authority_start + offset,
        None => s.len(),
    }
}

/// Applies RFC 3986 §5.2.4 dot-segment removal to the path portion of `iri`, leaving its scheme,
/// authority and any trailing query/fragment untouched.
fn remove_dot_segments_from_iri(iri: &str) -> String {
    let path_start = path_start(iri);
    let (prefix, rest) = iri.split_at(path_start);
    let (path, tail) = match rest.find(['?', '#']) {
        Some(index) => rest.split_at(index),
        None => (rest, ""),
    };
    format!("{prefix}{}{tail}", remove_dot_segments(path))
}

/// The five-case dot-segment removal algorithm of RFC 3986 §5.2.4.
fn remove_dot_segments(path: &str) -> String {
    let mut input = path.to_string();
    let mut output = String::new();
    while !input.is_empty() {
        if input.starts_with("../") {
            input.replace_range(..3, "");
        } else if input.starts_with("./") {
            input.replace_range(..2, "");
        } else if input.starts_with("/./") {
            input.replace_range(..3, "/");
        } else if input == "/." {
            input.replace_range(..2, "/");
        } else if input.starts_with("/../") {
            input.replace_range(..4, "/");
            pop_last_segment(&mut output);
        } else if input == "/.." {
            input.replace_range(..3, "/");
            pop_last_segment(&mut output);
        } else if input == "." || input == ".." {
            input.clear();
        } else {
            let first_segment_end = if let Some(rest) = input.strip_prefix('/') {
                rest.find('/').map_or(input.len(), |i| i + 1)
            } else {
                input.find('/').unwrap_or(input.len())
            };
            output.push_str(&input[..first_segment_end]);
            input.replace_range(..first_segment_end, "");
        }
    }
    output
}

fn pop_last_segment(output: &mut String) {
    match output.rfind('/') {
        Some(index) => output.truncate(index),
        None => output.clear(),
    }
}

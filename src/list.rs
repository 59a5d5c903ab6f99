//! List mapping accumulation and flush (component C7, list path; §4.7). A list mapping is keyed
//! by `subject + " " + predicate` (§3 invariant 4) and accumulates list members until the element
//! that first instantiated it closes, at which point it is turned into an `rdf:List` structure.

const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";

/// A single member of a list mapping. Most list members are resources (from `@rel`/`@inlist`),
/// but `@property`/`@inlist` can also contribute literals (§4.5 step 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ListItem {
    Resource(String),
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

#[derive(Debug, Clone)]
struct ListEntry {
    subject: String,
    predicate: String,
    items: Vec<ListItem>,
    /// Depth at which this key was first instantiated, compared against the closing element's
    /// depth to decide whether to flush here or propagate further up (§4.7).
    instantiated_at: u32,
    deleted: bool,
}

/// An ordered collection of in-flight list mappings. Cloning performs the deep copy the frame
/// lifecycle relies on (§4.7's "propagated to the parent's `local_list_mappings` via a deep
/// copy").
#[derive(Debug, Clone, Default)]
pub(crate) struct ListMappings(Vec<ListEntry>);

impl ListMappings {
    fn find_mut(&mut self, subject: &str, predicate: &str) -> Option<&mut ListEntry> {
        self.0
            .iter_mut()
            .find(|e| e.subject == subject && e.predicate == predicate && !e.deleted)
    }

    /// Appends `item` to the mapping keyed by `(subject, predicate)`, instantiating it at
    /// `depth` if this is the first time the key has been seen on this path.
    pub(crate) fn push(&mut self, subject: &str, predicate: &str, depth: u32, item: ListItem) {
        if let Some(entry) = self.find_mut(subject, predicate) {
            entry.items.push(item);
            return;
        }
        self.0.push(ListEntry {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            items: vec![item],
            instantiated_at: depth,
            deleted: false,
        });
    }

    /// Ensures a (possibly empty) list mapping exists for `(subject, predicate)`, instantiated at
    /// `depth` if not already present. Used when `@inlist` is present but contributes no item on
    /// this element (still must flush to `rdf:nil` if nothing else ever fills it).
    pub(crate) fn ensure(&mut self, subject: &str, predicate: &str, depth: u32) {
        if self.find_mut(subject, predicate).is_none() {
            self.0.push(ListEntry {
                subject: subject.to_string(),
                predicate: predicate.to_string(),
                items: Vec::new(),
                instantiated_at: depth,
                deleted: false,
            });
        }
    }

    /// Flushes every local key whose `instantiated_at` is strictly greater than `closing_depth`,
    /// emitting `(subject, predicate, list-head)` plus the `rdf:first`/`rdf:rest` chain, or a bare
    /// `rdf:nil` triple for an empty list (§4.7). Returns the generated triples as
    /// `(subject, predicate, object_iri)` tuples for the head triple, interleaved with the
    /// blank-node chain triples as `(subject, predicate, object)` in emission order.
    ///
    /// `fresh_blank_node` mints list-cell blank nodes.
    pub(crate) fn flush(
        &mut self,
        closing_depth: u32,
        parent: &ListMappings,
        mut fresh_blank_node: impl FnMut() -> String,
        mut emit: impl FnMut(&str, &str, ListItem),
    ) {
        for entry in &mut self.0 {
            if entry.deleted {
                continue;
            }
            if entry.instantiated_at <= closing_depth {
                continue;
            }
            if parent.find_in_place(&entry.subject, &entry.predicate) {
                continue;
            }
            if entry.items.is_empty() {
                emit(
                    &entry.subject,
                    &entry.predicate,
                    ListItem::Resource(RDF_NIL.to_string()),
                );
            } else {
                let cells: Vec<String> = entry.items.iter().map(|_| fresh_blank_node()).collect();
                emit(
                    &entry.subject,
                    &entry.predicate,
                    ListItem::Resource(cells[0].clone()),
                );
                for (i, item) in entry.items.drain(..).enumerate() {
                    emit(&cells[i], RDF_FIRST, item);
                    let rest = cells
                        .get(i + 1)
                        .cloned()
                        .unwrap_or_else(|| RDF_NIL.to_string());
                    emit(&cells[i], RDF_REST, ListItem::Resource(rest));
                }
            }
            entry.deleted = true;
        }
    }

    fn find_in_place(&self, subject: &str, predicate: &str) -> bool {
        self.0
            .iter()
            .any(|e| e.subject == subject && e.predicate == predicate && !e.deleted)
    }

    /// Keys whose `instantiated_at` is `<= closing_depth` (and not deleted) survive to be copied
    /// into the parent's `local_list_mappings` (§4.7's last paragraph).
    pub(crate) fn retain_at_or_below(&self, closing_depth: u32) -> ListMappings {
        ListMappings(
            self.0
                .iter()
                .filter(|e| !e.deleted && e.instantiated_at <= closing_depth)
                .cloned()
                .collect(),
        )
    }

    /// Appends every (non-deleted) entry of `self` onto `into`, preserving each entry's original
    /// `instantiated_at` depth. Used to graft surviving list mappings onto the parent frame at
    /// close (§4.7's deep-copy propagation).
    pub(crate) fn merge_into(&self, into: &mut ListMappings) {
        for entry in &self.0 {
            if entry.deleted {
                continue;
            }
            match into.find_mut(&entry.subject, &entry.predicate) {
                Some(existing) => existing.items.extend(entry.items.iter().cloned()),
                None => into.0.push(entry.clone()),
            }
        }
    }
}

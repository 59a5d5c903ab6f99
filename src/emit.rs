//! Triple emission (component C7): steps 1–3 of §4.5 run at element open (type triples, rel/rev
//! triples, incomplete-triple deferral); steps 4–6 (property-value, parent-incomplete completion,
//! list flush) run at element close from [`crate::driver`].

use std::collections::VecDeque;

use crate::context::{Direction, EvalContext};
use crate::list::ListItem;
use crate::model::{RawObject, RawTriple, RdfaVersion, ResolvedAttrs};

/// §4.5 step 1: type triples. Subject is `new_subject` under 1.0, `typed_resource` under 1.1.
pub(crate) fn emit_type_triples(ctx: &EvalContext, attrs: &ResolvedAttrs, out: &mut VecDeque<RawTriple>) {
    if attrs.typeof_.is_empty() {
        return;
    }
    let subject = match ctx.rdfa_version {
        RdfaVersion::V1_0 => ctx.new_subject.as_ref(),
        RdfaVersion::V1_1 => ctx.typed_resource.as_ref(),
    };
    let Some(subject) = subject else { return };
    for t in &attrs.typeof_ {
        out.push_back(RawTriple::new(
            subject.clone(),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
            RawObject::Resource(t.clone()),
        ));
    }
}

/// §4.5 steps 2–3: rel/rev triples when the object is already known, or deferral into
/// `local_incomplete_triples` / a list mapping otherwise.
pub(crate) fn emit_rel_rev_triples(ctx: &mut EvalContext, attrs: &ResolvedAttrs, out: &mut VecDeque<RawTriple>) {
    let Some(new_subject) = ctx.new_subject.clone() else {
        return;
    };

    if let Some(object) = ctx.current_object_resource.clone() {
        for p in &attrs.rel {
            if ctx.rdfa_version == RdfaVersion::V1_1 && attrs.inlist {
                ctx.local_list_mappings
                    .push(&new_subject, p, ctx.depth, ListItem::Resource(object.clone()));
            } else {
                out.push_back(RawTriple::new(
                    new_subject.clone(),
                    p.clone(),
                    RawObject::Resource(object.clone()),
                ));
            }
        }
        for p in &attrs.rev {
            out.push_back(RawTriple::new(
                object.clone(),
                p.clone(),
                RawObject::Resource(new_subject.clone()),
            ));
        }
        return;
    }

    if attrs.rel.is_empty() && attrs.rev.is_empty() {
        return;
    }

    if ctx.rdfa_version == RdfaVersion::V1_0 {
        ctx.current_object_resource = Some(ctx.fresh_blank_node());
    }

    if ctx.rdfa_version == RdfaVersion::V1_1 && attrs.inlist {
        for p in &attrs.rel {
            ctx.local_incomplete_triples.push((p.clone(), Direction::None));
        }
    } else {
        for p in &attrs.rel {
            ctx.local_incomplete_triples.push((p.clone(), Direction::Forward));
        }
    }
    for p in &attrs.rev {
        ctx.local_incomplete_triples.push((p.clone(), Direction::Reverse));
    }
}

/// §4.5 step 5: complete the *inherited* `incomplete_triples` against this element's
/// `new_subject`, run on close after the property-value step.
pub(crate) fn complete_parent_incompletes(ctx: &mut EvalContext, out: &mut VecDeque<RawTriple>) {
    if ctx.skip_element {
        return;
    }
    let Some(new_subject) = ctx.new_subject.clone() else {
        return;
    };
    let Some(parent_subject) = ctx.parent_subject.clone() else {
        return;
    };
    let incompletes = ctx.incomplete_triples.clone();
    for (predicate, direction) in incompletes {
        match direction {
            Direction::Forward => out.push_back(RawTriple::new(
                parent_subject.clone(),
                predicate,
                RawObject::Resource(new_subject.clone()),
            )),
            Direction::Reverse => out.push_back(RawTriple::new(
                new_subject.clone(),
                predicate,
                RawObject::Resource(parent_subject.clone()),
            )),
            Direction::None => {
                ctx.local_list_mappings.push(
                    &parent_subject,
                    &predicate,
                    ctx.depth,
                    ListItem::Resource(new_subject.clone()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HostLanguage;

    #[test]
    fn type_triples_use_new_subject_in_1_0() {
        let mut ctx = EvalContext::root("http://example.org/", HostLanguage::Xml1, RdfaVersion::V1_0);
        ctx.new_subject = Some("http://example.org/s".to_string());
        let attrs = ResolvedAttrs {
            typeof_: vec!["http://example.org/T".to_string()],
            ..Default::default()
        };
        let mut out = VecDeque::new();
        emit_type_triples(&ctx, &attrs, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].subject, "http://example.org/s");
    }

    #[test]
    fn rel_with_known_object_emits_immediately() {
        let mut ctx = EvalContext::root("http://example.org/", HostLanguage::Xml1, RdfaVersion::V1_1);
        ctx.new_subject = Some("http://example.org/s".to_string());
        ctx.current_object_resource = Some("http://example.org/o".to_string());
        let attrs = ResolvedAttrs {
            rel: vec!["http://example.org/p".to_string()],
            ..Default::default()
        };
        let mut out = VecDeque::new();
        emit_rel_rev_triples(&mut ctx, &attrs, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].object, RawObject::Resource("http://example.org/o".to_string()));
    }

    #[test]
    fn rel_without_object_defers_in_1_1() {
        let mut ctx = EvalContext::root("http://example.org/", HostLanguage::Xml1, RdfaVersion::V1_1);
        ctx.new_subject = Some("http://example.org/s".to_string());
        let attrs = ResolvedAttrs {
            rel: vec!["http://example.org/p".to_string()],
            ..Default::default()
        };
        let mut out = VecDeque::new();
        emit_rel_rev_triples(&mut ctx, &attrs, &mut out);
        assert!(out.is_empty());
        assert!(ctx.current_object_resource.is_none());
        assert_eq!(ctx.local_incomplete_triples.len(), 1);
    }

    #[test]
    fn rel_without_object_mints_blank_in_1_0() {
        let mut ctx = EvalContext::root("http://example.org/", HostLanguage::Xml1, RdfaVersion::V1_0);
        ctx.new_subject = Some("http://example.org/s".to_string());
        let attrs = ResolvedAttrs {
            rel: vec!["http://example.org/p".to_string()],
            ..Default::default()
        };
        let mut out = VecDeque::new();
        emit_rel_rev_triples(&mut ctx, &attrs, &mut out);
        assert!(ctx.current_object_resource.is_some());
    }

    #[test]
    fn complete_parent_incompletes_forward_and_reverse() {
        let mut ctx = EvalContext::root("http://example.org/", HostLanguage::Xml1, RdfaVersion::V1_1);
        ctx.parent_subject = Some("http://example.org/parent".to_string());
        ctx.new_subject = Some("http://example.org/child".to_string());
        ctx.incomplete_triples = vec![
            ("http://example.org/fwd".to_string(), Direction::Forward),
            ("http://example.org/rev".to_string(), Direction::Reverse),
        ];
        let mut out = VecDeque::new();
        complete_parent_incompletes(&mut ctx, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].subject, "http://example.org/parent");
        assert_eq!(out[1].subject, "http://example.org/child");
    }
}

//! Subject establishment (component C6): the four rule sets of §4.4, selected by
//! `(rdfa_version, has_rel_or_rev)`, plus the root-element and HEAD/BODY implicit-`@about`
//! corrections and the whole-element skip short-circuit.

use crate::context::EvalContext;
use crate::model::{HostLanguage, RdfaVersion, ResolvedAttrs};

/// Runs subject establishment for the current element, setting `new_subject`,
/// `current_object_resource`, `typed_resource` and `skip_element` on `ctx`.
///
/// `local_name` is needed only to recognize the XHTML1/HTML `head`/`body` implicit-about rule;
/// `is_root` signals depth 1 (the document element).
pub(crate) fn establish_subject(ctx: &mut EvalContext, attrs: &ResolvedAttrs, local_name: &str, is_root: bool) {
    let has_rel_or_rev = attrs.has_rel_or_rev();

    match (ctx.rdfa_version, has_rel_or_rev) {
        (RdfaVersion::V1_0, false) => establish_v10_no_rel(ctx, attrs),
        (RdfaVersion::V1_0, true) => establish_v10_rel(ctx, attrs),
        (RdfaVersion::V1_1, false) => establish_v11_no_rel(ctx, attrs),
        (RdfaVersion::V1_1, true) => establish_v11_rel(ctx, attrs),
    }

    apply_implicit_about(ctx, attrs, local_name, is_root);

    if attrs.is_rdfa_free() {
        ctx.skip_element = true;
    }
}

fn establish_v10_no_rel(ctx: &mut EvalContext, attrs: &ResolvedAttrs) {
    ctx.new_subject = attrs
        .about
        .clone()
        .or_else(|| attrs.src.clone())
        .or_else(|| attrs.resource.clone())
        .or_else(|| attrs.href.clone())
        .or_else(|| {
            if !attrs.typeof_.is_empty() {
                Some(ctx.fresh_blank_node())
            } else {
                None
            }
        });
    if ctx.new_subject.is_none() {
        ctx.new_subject = ctx.parent_object.clone();
        ctx.skip_element = true;
    }
}

fn establish_v10_rel(ctx: &mut EvalContext, attrs: &ResolvedAttrs) {
    ctx.new_subject = attrs
        .about
        .clone()
        .or_else(|| attrs.src.clone())
        .or_else(|| {
            if !attrs.typeof_.is_empty() {
                Some(ctx.fresh_blank_node())
            } else {
                None
            }
        })
        .or_else(|| ctx.parent_object.clone());
    ctx.current_object_resource = attrs.resource.clone().or_else(|| attrs.href.clone());
}

fn establish_v11_no_rel(ctx: &mut EvalContext, attrs: &ResolvedAttrs) {
    let property_only = !attrs.property.is_empty() && attrs.content.is_none() && attrs.datatype.is_none();

    if property_only {
        ctx.new_subject = attrs.about.clone().or_else(|| ctx.parent_object.clone());
        if !attrs.typeof_.is_empty() {
            ctx.typed_resource = attrs.about.clone().or_else(|| {
                attrs
                    .resource
                    .clone()
                    .or_else(|| attrs.href.clone())
                    .or_else(|| attrs.src.clone())
                    .or_else(|| Some(ctx.fresh_blank_node()))
            });
            if attrs.about.is_none() {
                ctx.current_object_resource = ctx.typed_resource.clone();
            }
            // The RDFa Core new-subject algorithm folds `new_subject` into `typed_resource` here,
            // so a `@typeof`-without-`@about` element's own `@property` lands on the same node as
            // its type triple rather than on the inherited parent object.
            ctx.new_subject = ctx.typed_resource.clone();
        }
        return;
    }

    if attrs.about.is_some() || attrs.resource.is_some() || attrs.href.is_some() || attrs.src.is_some() {
        ctx.new_subject = attrs
            .about
            .clone()
            .or_else(|| attrs.resource.clone())
            .or_else(|| attrs.href.clone())
            .or_else(|| attrs.src.clone());
    } else if !attrs.typeof_.is_empty() {
        ctx.new_subject = Some(ctx.fresh_blank_node());
    } else {
        ctx.new_subject = ctx.parent_object.clone();
        if attrs.property.is_empty() {
            ctx.skip_element = true;
        }
    }
    if !attrs.typeof_.is_empty() {
        ctx.typed_resource = ctx.new_subject.clone();
    }
}

fn establish_v11_rel(ctx: &mut EvalContext, attrs: &ResolvedAttrs) {
    ctx.new_subject = attrs.about.clone().or_else(|| ctx.parent_object.clone());
    if !attrs.typeof_.is_empty() {
        ctx.typed_resource = ctx.new_subject.clone();
    }
    ctx.current_object_resource = attrs
        .resource
        .clone()
        .or_else(|| attrs.href.clone())
        .or_else(|| attrs.src.clone());
    if ctx.current_object_resource.is_none() && !attrs.typeof_.is_empty() && attrs.about.is_none() {
        let blank = ctx.fresh_blank_node();
        ctx.current_object_resource = Some(blank.clone());
        ctx.typed_resource = Some(blank);
    }
}

/// Implicit `@about=""` for the document element, and for `head`/`body` in XHTML1/HTML when no
/// subject attribute is present and either the parent has no subject or `@typeof` is present
/// (§4.4 "Root-element implicit about").
fn apply_implicit_about(ctx: &mut EvalContext, attrs: &ResolvedAttrs, local_name: &str, is_root: bool) {
    let no_subject_attr =
        attrs.about.is_none() && attrs.resource.is_none() && attrs.href.is_none() && attrs.src.is_none();
    if !no_subject_attr {
        return;
    }

    if is_root {
        ctx.new_subject = Some(ctx.base.clone());
        ctx.skip_element = false;
        return;
    }

    let is_head_or_body = matches!(ctx.host_language, HostLanguage::Xhtml1 | HostLanguage::Html)
        && (local_name.eq_ignore_ascii_case("head") || local_name.eq_ignore_ascii_case("body"));
    if is_head_or_body && (ctx.parent_subject.is_none() || !attrs.typeof_.is_empty()) {
        ctx.new_subject = Some(ctx.base.clone());
        ctx.skip_element = false;
    }
}

/*
 * transform.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Per-slide template expansion.
//!
//! The template engine is synchronous, but icon resolution and citation
//! formatting are not. The two meet through a two-phase placeholder
//! protocol:
//!
//! 1. **Record.** The helpers exposed to the template (`icons.render`,
//!    `refs.cite`, `refs.expand`) are pure token generators: each call
//!    records its request in a per-slide [`PendingOps`] and immediately
//!    returns an opaque placeholder embedding a counter id. The engine
//!    never blocks.
//! 2. **Resolve.** After the rendering pass, every recorded request is
//!    resolved through the async collaborator traits, and each placeholder
//!    occurrence is substituted with its own call's result.
//!
//! The three request namespaces carry distinct placeholder prefixes, so
//! their per-namespace counters cannot collide. `PendingOps` lives on the
//! stack of one slide's transform invocation; nothing is shared across
//! slides, which keeps slides independently transformable.

use crate::collaborators::{CitationFormatter, IconOptions, IconResolver};
use crate::error::{TransformError, TransformResult};
use futures::future::try_join_all;
use serde_json::Value;
use slidecraft_parse::{Meta, Presentation, Slide};
use slidecraft_template::{TemplateContext, TemplateRegistry, TemplateValue};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Requests recorded during one slide's rendering pass. The index within
/// each list is the id embedded in the placeholder token.
#[derive(Debug, Default)]
struct PendingOps {
    icons: Vec<IconRequest>,
    cites: Vec<String>,
    expands: Vec<String>,
}

#[derive(Debug)]
struct IconRequest {
    name: String,
    options: IconOptions,
}

fn icon_placeholder(id: usize) -> String {
    format!("%%ICON_{id}%%")
}

fn cite_placeholder(id: usize) -> String {
    format!("%%CITE_{id}%%")
}

fn expand_placeholder(id: usize) -> String {
    format!("%%EXPAND_{id}%%")
}

/// Transform every slide of a presentation, in order.
///
/// Slides are processed sequentially; each gets fresh per-slide state, so
/// nothing here prevents a caller from transforming slides in parallel.
pub async fn transform_presentation(
    presentation: &Presentation,
    registry: &TemplateRegistry,
    icons: &dyn IconResolver,
    refs: &dyn CitationFormatter,
) -> TransformResult<Vec<String>> {
    let total = presentation.slides.len();
    let mut bodies = Vec::with_capacity(total);
    for (index, slide) in presentation.slides.iter().enumerate() {
        bodies
            .push(transform_slide(slide, index, total, &presentation.meta, registry, icons, refs).await?);
    }
    Ok(bodies)
}

/// Transform one slide into its rendered body.
///
/// # Errors
///
/// [`TransformError::TemplateNotFound`] for an unknown template name,
/// [`TransformError::ContentValidation`] when content fails the template's
/// schema, and [`TransformError::Collaborator`] when a resolution call
/// fails. All are fatal to the enclosing document.
pub async fn transform_slide(
    slide: &Slide,
    index: usize,
    total: usize,
    meta: &Meta,
    registry: &TemplateRegistry,
    icons: &dyn IconResolver,
    refs: &dyn CitationFormatter,
) -> TransformResult<String> {
    // Raw slides bypass the pipeline entirely; the body passes through
    // untrimmed, without a class directive.
    if slide.is_raw() {
        return Ok(slide.raw.clone().unwrap_or_default());
    }

    let definition = registry
        .get(&slide.template)
        .ok_or_else(|| TransformError::TemplateNotFound {
            name: slide.template.clone(),
        })?;

    let outcome = definition
        .schema
        .validate(&Value::Object(slide.content.clone()));
    if !outcome.valid {
        return Err(TransformError::ContentValidation {
            template: slide.template.clone(),
            errors: outcome.errors,
        });
    }

    tracing::debug!(template = %slide.template, index, "Expanding slide");

    // Phase one: synchronous rendering. The context (and the helper
    // closures holding the pending-ops handle) must be dropped before any
    // await, so the ops are moved out of the cell first.
    let (rendered, ops) = {
        let pending = Rc::new(RefCell::new(PendingOps::default()));
        let context = build_context(slide, index, total, meta, &pending);
        let rendered = definition.output.render(&context)?;
        let ops = pending.take();
        (rendered, ops)
    };

    // Phase two: resolution, then textual substitution.
    let resolved = resolve_pending(ops, icons, refs).await?;
    let body = substitute(rendered, &resolved);

    let body = match &slide.class {
        Some(class) => format!("<!-- _class: {class} -->\n{body}"),
        None => body,
    };
    Ok(body.trim().to_string())
}

/// The resolved value for each recorded request, index-aligned with the
/// pending lists. Every recorded request has a resolution; an absence here
/// would be an implementation bug, not a user-facing error.
struct ResolvedOps {
    icons: Vec<String>,
    cites: Vec<String>,
    expands: Vec<String>,
}

async fn resolve_pending(
    ops: PendingOps,
    icons: &dyn IconResolver,
    refs: &dyn CitationFormatter,
) -> TransformResult<ResolvedOps> {
    // Requests within one namespace have no required order and resolve
    // concurrently; each namespace completes before substitution.
    let icon_results = try_join_all(
        ops.icons
            .iter()
            .map(|request| icons.render(&request.name, &request.options)),
    )
    .await?;
    let cite_results = try_join_all(ops.cites.iter().map(|id| refs.format_inline(id))).await?;
    let expand_results =
        try_join_all(ops.expands.iter().map(|text| refs.expand_citations(text))).await?;

    Ok(ResolvedOps {
        icons: icon_results,
        cites: cite_results,
        expands: expand_results,
    })
}

fn substitute(mut text: String, resolved: &ResolvedOps) -> String {
    // Placeholder tokens are unique within the text, so order is
    // immaterial.
    for (id, value) in resolved.icons.iter().enumerate() {
        text = text.replace(&icon_placeholder(id), value);
    }
    for (id, value) in resolved.cites.iter().enumerate() {
        text = text.replace(&cite_placeholder(id), value);
    }
    for (id, value) in resolved.expands.iter().enumerate() {
        text = text.replace(&expand_placeholder(id), value);
    }
    text
}

fn build_context(
    slide: &Slide,
    index: usize,
    total: usize,
    meta: &Meta,
    pending: &Rc<RefCell<PendingOps>>,
) -> TemplateContext {
    let mut context = TemplateContext::new();

    context.insert(
        "content",
        TemplateValue::from_json(&Value::Object(slide.content.clone())),
    );

    // Templates see a restricted view of the metadata.
    let mut meta_view = HashMap::new();
    meta_view.insert(
        "title".to_string(),
        TemplateValue::String(meta.title.clone()),
    );
    if let Some(author) = &meta.author {
        meta_view.insert("author".to_string(), TemplateValue::String(author.clone()));
    }
    meta_view.insert(
        "theme".to_string(),
        TemplateValue::String(meta.theme.clone()),
    );
    context.insert("meta", TemplateValue::Map(meta_view));

    context.insert("index", TemplateValue::Number(index as f64));
    context.insert("total", TemplateValue::Number(total as f64));

    // icons.render(name, options?): records the request, returns a token.
    let mut icons_helper = HashMap::new();
    let icon_pending = Rc::clone(pending);
    icons_helper.insert(
        "render".to_string(),
        TemplateValue::Function(Rc::new(move |args: &[TemplateValue]| {
            let name = args.first().map(TemplateValue::render).unwrap_or_default();
            let options = match args.get(1) {
                Some(TemplateValue::Map(map)) => IconOptions::from_template_map(map),
                _ => IconOptions::default(),
            };
            let mut ops = icon_pending.borrow_mut();
            let id = ops.icons.len();
            ops.icons.push(IconRequest { name, options });
            icon_placeholder(id)
        })),
    );
    context.insert("icons", TemplateValue::Map(icons_helper));

    // refs.cite(id) / refs.expand(text): same protocol, own counters.
    let mut refs_helper = HashMap::new();
    let cite_pending = Rc::clone(pending);
    refs_helper.insert(
        "cite".to_string(),
        TemplateValue::Function(Rc::new(move |args: &[TemplateValue]| {
            let id_arg = args.first().map(TemplateValue::render).unwrap_or_default();
            let mut ops = cite_pending.borrow_mut();
            let id = ops.cites.len();
            ops.cites.push(id_arg);
            cite_placeholder(id)
        })),
    );
    let expand_pending = Rc::clone(pending);
    refs_helper.insert(
        "expand".to_string(),
        TemplateValue::Function(Rc::new(move |args: &[TemplateValue]| {
            let text = args.first().map(TemplateValue::render).unwrap_or_default();
            let mut ops = expand_pending.borrow_mut();
            let id = ops.expands.len();
            ops.expands.push(text);
            expand_placeholder(id)
        })),
    );
    context.insert("refs", TemplateValue::Map(refs_helper));

    context
}

//! Template-literal type expansion.
//!
//! A template type like `` `user-${K}` `` expands to the union of every
//! concrete string it can produce. Only finitely enumerable placeholders
//! participate: literals and unions of literals. A placeholder that resolves
//! to an open primitive (`string`, `number`, ...) aborts the whole expansion
//! and the template degrades to an opaque generic placeholder carrying its
//! original text — not an error. Exceeding the combination limit, by
//! contrast, **is** an error: a truncated union would misrepresent the type.

use std::rc::Rc;

use tsb_host::{TemplateSpanSite, TypeHandle};
use tsb_model::TypeNode;

use crate::context::GenericContext;
use crate::error::{ResolveError, ResolveResult};
use crate::resolve::{ResolveState, TypeResolver};

/// A template span after placeholder resolution.
enum ResolvedSpan {
    Text(String),
    Values(Vec<String>),
}

impl TypeResolver<'_> {
    /// Expand a template-literal type into a literal, a union of literals,
    /// an opaque placeholder (non-enumerable placeholder), or an error
    /// (combination limit).
    pub(crate) fn resolve_template(
        &self,
        handle: &dyn TypeHandle,
        depth: u32,
        ctx: &Rc<GenericContext>,
        state: &mut ResolveState,
    ) -> ResolveResult<TypeNode> {
        let spans = handle.template_spans();
        tracing::trace!(span_count = spans.len(), "resolve_template");

        let all_text = spans
            .iter()
            .all(|span| matches!(span, TemplateSpanSite::Text(_)));
        if all_text {
            let mut text = String::new();
            for span in &spans {
                if let TemplateSpanSite::Text(t) = span {
                    text.push_str(t);
                }
            }
            return Ok(TypeNode::string_literal(text));
        }

        // Resolve every placeholder first and pre-compute the combination
        // count, so the limit check happens before any expansion work.
        let mut resolved: Vec<ResolvedSpan> = Vec::with_capacity(spans.len());
        let mut combinations: usize = 1;
        for span in &spans {
            match span {
                TemplateSpanSite::Text(t) => resolved.push(ResolvedSpan::Text(t.clone())),
                TemplateSpanSite::Placeholder(inner) => {
                    let scope = ctx.child();
                    let node = self.resolve_node(inner.as_ref(), depth + 1, &scope, state)?;
                    // Open parameters found inside the placeholder must
                    // outlive its scope, whichever way the expansion goes.
                    self.propagate_open_params(&scope, ctx)?;
                    match node.literal_string_set() {
                        Some(values) if !values.is_empty() => {
                            combinations = combinations.saturating_mul(values.len());
                            resolved.push(ResolvedSpan::Values(values));
                        }
                        _ => {
                            // Non-enumerable placeholder: degrade, don't error.
                            tracing::trace!(
                                text = %handle.text(),
                                "template placeholder is not finitely enumerable; \
                                 degrading to opaque generic"
                            );
                            return Ok(TypeNode::generic(handle.text()));
                        }
                    }
                }
            }
        }

        let limit = self.options().max_template_combinations;
        if combinations > limit {
            return Err(ResolveError::TemplateCombinationLimit {
                text: handle.text(),
                combinations,
                limit,
            });
        }

        let mut strings = vec![String::new()];
        for span in &resolved {
            match span {
                ResolvedSpan::Text(t) => {
                    for s in &mut strings {
                        s.push_str(t);
                    }
                }
                ResolvedSpan::Values(values) => {
                    let mut next = Vec::with_capacity(strings.len() * values.len());
                    for prefix in &strings {
                        for value in values {
                            next.push(format!("{}{}", prefix, value));
                        }
                    }
                    strings = next;
                }
            }
        }

        tracing::trace!(count = strings.len(), "resolve_template: expanded");
        Ok(TypeNode::union_of(
            strings.into_iter().map(TypeNode::string_literal).collect(),
        ))
    }
}

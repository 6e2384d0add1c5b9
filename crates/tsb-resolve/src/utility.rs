//! Expansion of utility-type operations the host left unresolved.
//!
//! The host type system collapses most utility operations (`Pick`, `Omit`,
//! `Partial`, ...) to concrete structural types before this engine sees them.
//! This module activates only when that collapse did not happen because an
//! operation input still contains an open generic parameter. Such a type is
//! recognizable by its textual form (a known utility name applied with
//! arguments) combined with the absence of any concrete structural members.
//!
//! The resolution policy is deliberately modest: when the operation's subject
//! is bound in the active generic context, the operation is applied
//! structurally to the binding; otherwise the whole expression is re-expressed
//! as an opaque `Generic` node carrying its original text, and the text is
//! scanned for capitalized identifier tokens to discover and register
//! previously unseen generic parameter names. The scan is a best-effort
//! heuristic, not a semantic extraction — once the host type system has given
//! up there is no exact alternative, and an over-approximated parameter list
//! only makes the generated builder more generic than strictly needed.

use std::rc::Rc;

use tsb_host::{TypeHandle, TypeTag};
use tsb_model::{GenericParam, IndexKeyKind, IndexSignature, PropertyInfo, TypeNode};

use crate::context::GenericContext;
use crate::error::ResolveResult;
use crate::resolve::{ResolveState, TypeResolver};

/// Utility-operation names this engine recognizes.
pub const UTILITY_NAMES: &[&str] = &[
    "Pick",
    "Omit",
    "Partial",
    "Required",
    "Readonly",
    "Record",
    "Exclude",
    "Extract",
    "NonNullable",
    "Parameters",
    "ReturnType",
    "ConstructorParameters",
    "InstanceType",
    "Awaited",
];

/// If `text` is a utility application like `Omit<T, "x">`, return the
/// operation name.
pub fn utility_name(text: &str) -> Option<&'static str> {
    let text = text.trim();
    UTILITY_NAMES.iter().copied().find(|name| {
        text.strip_prefix(name)
            .is_some_and(|rest| rest.trim_start().starts_with('<'))
    })
}

/// Unresolved-utility detection heuristic: a known utility-name pattern in
/// the textual form, and no concrete structural members (for `Record`,
/// additionally no concrete index signature).
pub fn is_unresolved_utility(handle: &dyn TypeHandle) -> bool {
    if !matches!(handle.tag(), TypeTag::Object | TypeTag::Opaque) {
        return false;
    }
    let Some(name) = utility_name(&handle.text()) else {
        return false;
    };
    if !handle.properties().is_empty() {
        return false;
    }
    if name == "Record" && !handle.index_signatures().is_empty() {
        return false;
    }
    true
}

/// Capitalized identifier tokens in `text`, excluding known utility names,
/// deduplicated in first-seen order. This is the parameter-discovery scan.
pub fn scan_generic_candidates(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if !(c.is_ascii_alphabetic() || c == '_') {
            continue;
        }
        let mut end = start + c.len_utf8();
        while let Some(&(i, n)) = chars.peek() {
            if n.is_ascii_alphanumeric() || n == '_' {
                end = i + n.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        let token = &text[start..end];
        if token.starts_with(|c: char| c.is_ascii_uppercase())
            && !UTILITY_NAMES.contains(&token)
            && !out.iter().any(|seen| seen == token)
        {
            out.push(token.to_string());
        }
    }
    out
}

impl TypeResolver<'_> {
    /// Expand an unresolved utility operation.
    ///
    /// Structural application happens when enough is concrete; everything
    /// else degrades to `Generic(text)` with parameter discovery.
    pub(crate) fn expand_utility(
        &self,
        handle: &dyn TypeHandle,
        depth: u32,
        ctx: &Rc<GenericContext>,
        state: &mut ResolveState,
    ) -> ResolveResult<TypeNode> {
        let text = handle.text();
        let name = utility_name(&text).unwrap_or("");
        tracing::debug!(utility = name, text = %text, "expand_utility");

        // Type arguments are resolved against the active context so that a
        // bound subject parameter collapses to its binding here.
        let mut args: Vec<TypeNode> = Vec::new();
        for arg in handle.type_arguments() {
            args.push(self.resolve_node(arg.as_ref(), depth + 1, ctx, state)?);
        }

        let expanded = match name {
            "Pick" | "Omit" | "Partial" | "Required" | "Readonly" => {
                self.apply_mapped(name, &args)
            }
            "Record" => Self::apply_record(&args),
            "Exclude" | "Extract" => self.apply_filter(name, &args),
            "NonNullable" => Self::apply_non_nullable(&args),
            // Signature-level operations (Parameters, ReturnType, ...) are
            // never reconstructed; they carry their text.
            _ => None,
        };
        if let Some(node) = expanded {
            return Ok(node);
        }

        // Give up: carry the text, and let every capitalized token that is
        // not a known utility name propagate outward as an open parameter.
        for candidate in scan_generic_candidates(&text) {
            if !ctx.is_registered(&candidate) {
                tracing::trace!(param = %candidate, "registering discovered generic parameter");
                ctx.register_param(GenericParam::new(candidate))?;
            }
        }
        Ok(TypeNode::generic(text))
    }

    /// Apply a property-mapping utility to a concrete object subject.
    fn apply_mapped(&self, name: &str, args: &[TypeNode]) -> Option<TypeNode> {
        let TypeNode::Object {
            properties,
            index_signature,
            ..
        } = args.first()?
        else {
            return None;
        };

        let keys: Option<Vec<String>> = match name {
            "Pick" | "Omit" => Some(args.get(1)?.literal_string_set()?),
            _ => None,
        };

        let mut out: Vec<PropertyInfo> = Vec::new();
        for prop in properties {
            let selected = match (name, &keys) {
                ("Pick", Some(keys)) => keys.contains(&prop.name),
                ("Omit", Some(keys)) => !keys.contains(&prop.name),
                _ => true,
            };
            if !selected {
                continue;
            }
            let mut prop = prop.clone();
            match name {
                "Partial" => prop.optional = true,
                "Required" => prop.optional = false,
                "Readonly" => prop.readonly = true,
                _ => {}
            }
            out.push(prop);
        }

        Some(TypeNode::Object {
            name: None,
            properties: out,
            generic_params: None,
            index_signature: index_signature.clone(),
        })
    }

    /// `Record<K, V>` with a finitely enumerable key set becomes an object
    /// with one property per key; a `string`/`number` key becomes an index
    /// signature.
    fn apply_record(args: &[TypeNode]) -> Option<TypeNode> {
        let key = args.first()?;
        let value = args.get(1)?;
        if let Some(keys) = key.literal_string_set() {
            let properties = keys
                .into_iter()
                .map(|k| PropertyInfo::new(k, value.clone()))
                .collect();
            return Some(TypeNode::Object {
                name: None,
                properties,
                generic_params: None,
                index_signature: None,
            });
        }
        let key_kind = match key {
            TypeNode::Primitive { name } if name == "string" => IndexKeyKind::String,
            TypeNode::Primitive { name } if name == "number" => IndexKeyKind::Number,
            _ => return None,
        };
        Some(TypeNode::Object {
            name: None,
            properties: Vec::new(),
            generic_params: None,
            index_signature: Some(Box::new(IndexSignature {
                key: key_kind,
                value: value.clone(),
                readonly: false,
            })),
        })
    }

    /// `Exclude`/`Extract` over fully concrete arguments, filtered through
    /// the structural assignability oracle. Open generics anywhere in the
    /// arguments force the textual fallback.
    fn apply_filter(&self, name: &str, args: &[TypeNode]) -> Option<TypeNode> {
        let oracle = self.oracle()?;
        let source = args.first()?;
        let target = args.get(1)?;
        if contains_open_generic(source) || contains_open_generic(target) {
            return None;
        }
        let members: Vec<TypeNode> = match source {
            TypeNode::Union { members } => members.clone(),
            other => vec![other.clone()],
        };
        let keep_assignable = name == "Extract";
        let kept: Vec<TypeNode> = members
            .into_iter()
            .filter(|m| oracle.is_assignable(m, target) == keep_assignable)
            .collect();
        Some(TypeNode::union_of(kept))
    }

    fn apply_non_nullable(args: &[TypeNode]) -> Option<TypeNode> {
        let subject = args.first()?;
        if contains_open_generic(subject) {
            return None;
        }
        let members: Vec<TypeNode> = match subject {
            TypeNode::Union { members } => members.clone(),
            other => vec![other.clone()],
        };
        let kept: Vec<TypeNode> = members
            .into_iter()
            .filter(|m| {
                !matches!(
                    m,
                    TypeNode::Primitive { name } if name == "null" || name == "undefined"
                )
            })
            .collect();
        Some(TypeNode::union_of(kept))
    }
}

/// Does this node still contain an open generic anywhere?
pub fn contains_open_generic(node: &TypeNode) -> bool {
    match node {
        TypeNode::Generic { .. } => true,
        TypeNode::Array { element } => contains_open_generic(element),
        TypeNode::Tuple { elements } => elements.iter().any(contains_open_generic),
        TypeNode::Union { members } | TypeNode::Intersection { members } => {
            members.iter().any(contains_open_generic)
        }
        TypeNode::Object { properties, .. } => {
            properties.iter().any(|p| contains_open_generic(&p.ty))
        }
        TypeNode::Reference {
            type_arguments: Some(args),
            ..
        } => args.iter().any(contains_open_generic),
        _ => false,
    }
}

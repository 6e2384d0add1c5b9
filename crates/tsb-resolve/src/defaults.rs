//! Default-value expressions for resolved types.
//!
//! Renders a literal source-level default per [`TypeNode`], used by the
//! generator to pre-populate builder state. Only required object members
//! participate — an optional member has a perfectly good default already:
//! absence.
//!
//! Note the merge policy: [`merge_defaults`] composes intersection members
//! **last-wins**, which is deliberately the opposite of the
//! first-occurrence-wins property flattening in `tsb_model::merge`. Default
//! composition mirrors object-spread semantics (`{ ...a, ...b }`), where the
//! right-most spread wins. Do not unify the two policies.

use indexmap::IndexMap;
use tsb_model::{LiteralValue, TypeNode};

/// A literal default expression for `node`, when one can be derived.
pub fn default_expression(node: &TypeNode) -> Option<String> {
    match node {
        TypeNode::Literal { value } => Some(render_literal(value)),
        TypeNode::Primitive { name } => match name.as_str() {
            "string" => Some("\"\"".to_string()),
            "number" => Some("0".to_string()),
            "boolean" => Some("false".to_string()),
            "bigint" => Some("0n".to_string()),
            "null" => Some("null".to_string()),
            "undefined" | "void" => Some("undefined".to_string()),
            _ => None,
        },
        TypeNode::Array { .. } => Some("[]".to_string()),
        TypeNode::Tuple { elements } => {
            let rendered: Option<Vec<String>> = elements.iter().map(default_expression).collect();
            rendered.map(|parts| format!("[{}]", parts.join(", ")))
        }
        TypeNode::Object { properties, .. } => {
            Some(render_object(properties.iter().filter_map(|prop| {
                if prop.optional {
                    return None;
                }
                default_expression(&prop.ty).map(|expr| (prop.name.clone(), expr))
            })))
        }
        TypeNode::Union { members } => members.iter().find_map(default_expression),
        TypeNode::Intersection { members } => Some(render_object(merge_defaults(members))),
        TypeNode::Enum { values, .. } => values
            .as_ref()
            .and_then(|vs| vs.first())
            .map(render_literal),
        _ => None,
    }
}

/// Compose the default fields of intersection members. **Last wins** on a
/// duplicate name, mirroring object-spread composition.
pub fn merge_defaults(members: &[TypeNode]) -> IndexMap<String, String> {
    let mut merged: IndexMap<String, String> = IndexMap::new();
    for member in members {
        match member {
            TypeNode::Object { properties, .. } => {
                for prop in properties {
                    if prop.optional {
                        continue;
                    }
                    if let Some(expr) = default_expression(&prop.ty) {
                        merged.insert(prop.name.clone(), expr);
                    }
                }
            }
            TypeNode::Intersection { members: inner } => {
                for (name, expr) in merge_defaults(inner) {
                    merged.insert(name, expr);
                }
            }
            _ => {}
        }
    }
    merged
}

fn render_literal(value: &LiteralValue) -> String {
    match value {
        // serde_json escaping matches JavaScript string literal rules.
        LiteralValue::String(s) => serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string()),
        other => other.to_js_string(),
    }
}

fn render_object(fields: impl IntoIterator<Item = (String, String)>) -> String {
    let parts: Vec<String> = fields
        .into_iter()
        .map(|(name, expr)| format!("{}: {}", name, expr))
        .collect();
    if parts.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsb_model::PropertyInfo;

    fn obj(props: Vec<PropertyInfo>) -> TypeNode {
        TypeNode::Object {
            name: None,
            properties: props,
            generic_params: None,
            index_signature: None,
        }
    }

    #[test]
    fn required_members_only() {
        let node = obj(vec![
            PropertyInfo::new("id", TypeNode::primitive("string")),
            PropertyInfo::new("age", TypeNode::primitive("number")).optional(),
        ]);
        assert_eq!(default_expression(&node), Some("{ id: \"\" }".to_string()));
    }

    #[test]
    fn intersection_defaults_are_last_wins() {
        let a = obj(vec![PropertyInfo::new("x", TypeNode::string_literal("left"))]);
        let b = obj(vec![
            PropertyInfo::new("x", TypeNode::string_literal("right")),
            PropertyInfo::new("y", TypeNode::primitive("number")),
        ]);
        let merged = merge_defaults(&[a, b]);
        assert_eq!(merged["x"], "\"right\"");
        assert_eq!(merged["y"], "0");
    }

    #[test]
    fn unions_take_the_first_defaultable_member() {
        let node = TypeNode::Union {
            members: vec![TypeNode::generic("T"), TypeNode::primitive("boolean")],
        };
        assert_eq!(default_expression(&node), Some("false".to_string()));
    }

    #[test]
    fn open_shapes_have_no_default() {
        assert_eq!(default_expression(&TypeNode::generic("T")), None);
        assert_eq!(default_expression(&TypeNode::Unknown), None);
        assert_eq!(
            default_expression(&TypeNode::Function {
                signature: "() => void".to_string()
            }),
            None
        );
    }
}

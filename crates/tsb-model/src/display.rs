//! One-line TypeScript-ish rendering of a [`TypeNode`].
//!
//! Used by logs and by canonical signature rendering. This is a presentation
//! format, not a parseable one: object bodies are elided past the property
//! names' types, and opaque placeholders print their carried text.

use std::fmt;

use crate::node::{LiteralValue, TypeNode};

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Primitive { name } => f.write_str(name),
            TypeNode::Literal { value } => match value {
                LiteralValue::String(s) => write!(f, "{:?}", s),
                other => f.write_str(&other.to_js_string()),
            },
            TypeNode::Array { element } => {
                if element.is_compound() {
                    write!(f, "({})[]", element)
                } else {
                    write!(f, "{}[]", element)
                }
            }
            TypeNode::Tuple { elements } => {
                f.write_str("[")?;
                write_joined(f, elements, ", ")?;
                f.write_str("]")
            }
            TypeNode::Object {
                name: Some(name), ..
            } => f.write_str(name),
            TypeNode::Object {
                name: None,
                properties,
                ..
            } => {
                f.write_str("{ ")?;
                for (i, prop) in properties.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    let opt = if prop.optional { "?" } else { "" };
                    write!(f, "{}{}: {}", prop.name, opt, prop.ty)?;
                }
                f.write_str(" }")
            }
            TypeNode::Union { members } => write_joined(f, members, " | "),
            TypeNode::Intersection { members } => write_joined(f, members, " & "),
            TypeNode::Reference {
                name,
                type_arguments,
            } => {
                f.write_str(name)?;
                if let Some(args) = type_arguments {
                    f.write_str("<")?;
                    write_joined(f, args, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeNode::Generic { name } => f.write_str(name),
            TypeNode::Function { signature } => f.write_str(signature),
            TypeNode::Enum { name, .. } => f.write_str(name),
            TypeNode::Never => f.write_str("never"),
            TypeNode::Unknown => f.write_str("unknown"),
            TypeNode::Keyof { text }
            | TypeNode::Typeof { text }
            | TypeNode::IndexAccess { text }
            | TypeNode::Conditional { text } => f.write_str(text),
        }
    }
}

impl TypeNode {
    /// Compound shapes need parentheses inside an array suffix.
    fn is_compound(&self) -> bool {
        matches!(
            self,
            TypeNode::Union { .. } | TypeNode::Intersection { .. } | TypeNode::Function { .. }
        )
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, nodes: &[TypeNode], sep: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::PropertyInfo;

    #[test]
    fn renders_containers() {
        let union = TypeNode::Union {
            members: vec![
                TypeNode::string_literal("a"),
                TypeNode::primitive("number"),
            ],
        };
        assert_eq!(union.to_string(), "\"a\" | number");

        let arr = TypeNode::Array {
            element: Box::new(union),
        };
        assert_eq!(arr.to_string(), "(\"a\" | number)[]");
    }

    #[test]
    fn renders_anonymous_objects() {
        let obj = TypeNode::Object {
            name: None,
            properties: vec![
                PropertyInfo::new("id", TypeNode::primitive("string")),
                PropertyInfo::new("age", TypeNode::primitive("number")).optional(),
            ],
            generic_params: None,
            index_signature: None,
        };
        assert_eq!(obj.to_string(), "{ id: string; age?: number }");
    }
}

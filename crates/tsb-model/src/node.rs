//! The [`TypeNode`] tagged union and its leaf types.

use serde::{Deserialize, Serialize};

/// A literal value carried by a [`TypeNode::Literal`] or an enum member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl LiteralValue {
    /// Render this literal the way JavaScript's `String()` would.
    ///
    /// Numbers follow the ECMAScript `Number::toString(10)` rules: scientific
    /// notation below `1e-6` and at or above `1e21`, integer form for whole
    /// numbers below `1e15`, fixed-point otherwise.
    pub fn to_js_string(&self) -> String {
        match self {
            LiteralValue::String(s) => s.clone(),
            LiteralValue::Boolean(b) => {
                if *b {
                    "true".to_string()
                } else {
                    "false".to_string()
                }
            }
            LiteralValue::Number(n) => {
                let abs = n.abs();
                if *n == 0.0 {
                    "0".to_string()
                } else if abs < 1e-6 || abs >= 1e21 {
                    // Rust prints "1e21" where JavaScript prints "1e+21".
                    let mut s = format!("{:e}", n);
                    if s.contains('e') && !s.contains("e-") && !s.contains("e+") {
                        let parts: Vec<&str> = s.split('e').collect();
                        if parts.len() == 2 {
                            s = format!("{}e+{}", parts[0], parts[1]);
                        }
                    }
                    s
                } else if n.fract() == 0.0 && abs < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }

    /// Render this literal as a source-level expression (strings quoted).
    pub fn to_expression(&self) -> String {
        match self {
            LiteralValue::String(s) => format!("{:?}", s),
            _ => self.to_js_string(),
        }
    }
}

/// One member of an object-like type after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    pub ty: TypeNode,
    pub optional: bool,
    pub readonly: bool,
    /// First doc-comment or doc-tag found on the declaration, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, ty: TypeNode) -> Self {
        PropertyInfo {
            name: name.into(),
            ty,
            optional: false,
            readonly: false,
            doc: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }
}

/// A declared type parameter, possibly constrained or defaulted.
///
/// The declared default is carried for the generator's benefit; the resolution
/// engine itself never substitutes it for an unbound parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericParam {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<TypeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<TypeNode>,
}

impl GenericParam {
    pub fn new(name: impl Into<String>) -> Self {
        GenericParam {
            name: name.into(),
            constraint: None,
            default: None,
        }
    }
}

/// Key kind of an index signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKeyKind {
    String,
    Number,
    Symbol,
}

/// A catch-all index signature on an object-like type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSignature {
    pub key: IndexKeyKind,
    pub value: TypeNode,
    pub readonly: bool,
}

/// The normalized shape of a resolved type.
///
/// Every variant is plain data. Shapes the engine cannot (or deliberately
/// does not) model further are carried as placeholders: [`TypeNode::Generic`]
/// keeps the original source text of an expression that must stay open, and
/// the `Keyof`/`Typeof`/`IndexAccess`/`Conditional` variants are opaque
/// passthroughs holding only their text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeNode {
    /// `string`, `number`, `boolean`, `bigint`, `symbol`, `null`,
    /// `undefined`, `void`, `any`, `object`.
    Primitive { name: String },
    Literal { value: LiteralValue },
    Array { element: Box<TypeNode> },
    Tuple { elements: Vec<TypeNode> },
    Object {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        properties: Vec<PropertyInfo>,
        #[serde(skip_serializing_if = "Option::is_none")]
        generic_params: Option<Vec<GenericParam>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        index_signature: Option<Box<IndexSignature>>,
    },
    Union { members: Vec<TypeNode> },
    Intersection { members: Vec<TypeNode> },
    /// A by-name reference to another declaration, emitted instead of
    /// re-expanding a type that is already being resolved higher up the
    /// current path (cycle cut) or that lives in the dependency closure.
    Reference {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        type_arguments: Option<Vec<TypeNode>>,
    },
    /// An open type parameter, or an unresolvable generic expression carried
    /// by its original text.
    Generic { name: String },
    /// A callable, carried as a canonical rendered signature.
    Function { signature: String },
    Enum {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        values: Option<Vec<LiteralValue>>,
    },
    Never,
    Unknown,
    Keyof { text: String },
    Typeof { text: String },
    IndexAccess { text: String },
    Conditional { text: String },
}

impl TypeNode {
    pub fn primitive(name: impl Into<String>) -> Self {
        TypeNode::Primitive { name: name.into() }
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        TypeNode::Literal {
            value: LiteralValue::String(value.into()),
        }
    }

    pub fn number_literal(value: f64) -> Self {
        TypeNode::Literal {
            value: LiteralValue::Number(value),
        }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeNode::Reference {
            name: name.into(),
            type_arguments: None,
        }
    }

    pub fn generic(name: impl Into<String>) -> Self {
        TypeNode::Generic { name: name.into() }
    }

    pub fn empty_object(name: Option<String>) -> Self {
        TypeNode::Object {
            name,
            properties: Vec::new(),
            generic_params: None,
            index_signature: None,
        }
    }

    /// Build a union, collapsing the degenerate cases: zero members is
    /// `Never`, one member is the member itself.
    pub fn union_of(mut members: Vec<TypeNode>) -> Self {
        match members.len() {
            0 => TypeNode::Never,
            1 => members.remove(0),
            _ => TypeNode::Union { members },
        }
    }

    /// True for shapes that carry a property set.
    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            TypeNode::Object { .. } | TypeNode::Intersection { .. }
        )
    }

    /// The string values this node contributes to a template-literal
    /// expansion: a literal yields one value, a union of literals yields all
    /// of them, everything else yields `None` (not finitely enumerable).
    pub fn literal_string_set(&self) -> Option<Vec<String>> {
        match self {
            TypeNode::Literal { value } => Some(vec![value.to_js_string()]),
            TypeNode::Union { members } => {
                let mut out = Vec::with_capacity(members.len());
                for member in members {
                    out.extend(member.literal_string_set()?);
                }
                Some(out)
            }
            _ => None,
        }
    }
}

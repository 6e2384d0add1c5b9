//! The [`TypeHandle`] capability trait and its declaration-site views.

use bitflags::bitflags;
use tsb_model::{IndexKeyKind, LiteralValue, TypeIdentity};

/// Explicit classification of a host type.
///
/// Every handle reports exactly one tag and the engine dispatches on it.
/// `Opaque` covers anything the host can only render textually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Literal,
    Primitive,
    Array,
    Tuple,
    Callable,
    Union,
    Intersection,
    TemplateLiteral,
    Enum,
    TypeParameter,
    Object,
    Keyof,
    Typeof,
    IndexAccess,
    Conditional,
    Opaque,
}

bitflags! {
    /// Declaration-site modifier flags on one object member.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MemberModifiers: u8 {
        const OPTIONAL = 1 << 0;
        const READONLY = 1 << 1;
    }
}

/// One parameter of a call signature, in its textual host rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSite {
    pub name: String,
    pub optional: bool,
    pub type_text: String,
}

/// A call signature as rendered by the host. Callable-typed properties are
/// normalized from this textual view rather than by recursing per parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSignatureSite {
    pub params: Vec<ParamSite>,
    pub return_type_text: String,
}

impl CallSignatureSite {
    /// Render the canonical `(p1: T1, p2?: T2) => R` form.
    pub fn render(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|p| {
                let opt = if p.optional { "?" } else { "" };
                format!("{}{}: {}", p.name, opt, p.type_text)
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("({}) => {}", params, self.return_type_text)
    }
}

/// The declaration-site view of one object member, before normalization.
pub struct PropertySite {
    pub name: String,
    pub modifiers: MemberModifiers,
    /// First doc-comment or doc-tag text, if the host found one.
    pub doc: Option<String>,
    /// The member's declared type. `None` means the host could not derive
    /// any type for this member — a hard failure for that member's subtree.
    pub ty: Option<Box<dyn TypeHandle>>,
    /// Present when the member is callable; used for canonical signature
    /// rendering instead of recursing into `ty`.
    pub callable: Option<CallSignatureSite>,
}

/// One declared type parameter at a declaration site.
pub struct GenericParamSite {
    pub name: String,
    pub constraint: Option<Box<dyn TypeHandle>>,
    pub default: Option<Box<dyn TypeHandle>>,
}

/// An index signature at a declaration site.
pub struct IndexSignatureSite {
    pub key: IndexKeyKind,
    pub value: Box<dyn TypeHandle>,
    pub readonly: bool,
}

/// One span of a template-literal type: fixed text or a typed placeholder.
pub enum TemplateSpanSite {
    Text(String),
    Placeholder(Box<dyn TypeHandle>),
}

/// One enum member.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMemberSite {
    pub name: String,
    pub value: Option<LiteralValue>,
}

/// A handle to one type in the host's semantic model.
///
/// Capability getters default to "nothing": an adapter implements only the
/// getters meaningful for the tags it can report. The engine consults a
/// getter only after the tag says it applies, so a defaulted getter is never
/// load-bearing.
pub trait TypeHandle {
    /// Explicit classification; drives all engine dispatch.
    fn tag(&self) -> TypeTag;

    /// Raw textual rendering of the type, as the host would print it.
    fn text(&self) -> String;

    /// Identity of the backing declaration, when the type has one.
    /// Anonymous shapes (inline object literals, unions) return `None`.
    fn identity(&self) -> Option<TypeIdentity> {
        None
    }

    fn literal_value(&self) -> Option<LiteralValue> {
        None
    }

    /// Primitive name (`string`, `number`, ...) for `Primitive` tags.
    fn primitive_name(&self) -> Option<String> {
        None
    }

    /// Element type for `Array` tags.
    fn element_type(&self) -> Option<Box<dyn TypeHandle>> {
        None
    }

    fn tuple_elements(&self) -> Vec<Box<dyn TypeHandle>> {
        Vec::new()
    }

    fn union_members(&self) -> Vec<Box<dyn TypeHandle>> {
        Vec::new()
    }

    fn intersection_members(&self) -> Vec<Box<dyn TypeHandle>> {
        Vec::new()
    }

    /// Bound type arguments on a reference to a generic declaration.
    fn type_arguments(&self) -> Vec<Box<dyn TypeHandle>> {
        Vec::new()
    }

    /// Type parameters declared by this type's declaration.
    fn generic_params(&self) -> Vec<GenericParamSite> {
        Vec::new()
    }

    /// Base types from heritage ("extends") clauses.
    fn heritage_types(&self) -> Vec<Box<dyn TypeHandle>> {
        Vec::new()
    }

    /// Directly/structurally visible members. For an unresolved utility
    /// operation over an open generic this is empty — the signal the
    /// engine's utility expander keys on.
    fn properties(&self) -> Vec<PropertySite> {
        Vec::new()
    }

    fn index_signatures(&self) -> Vec<IndexSignatureSite> {
        Vec::new()
    }

    fn call_signatures(&self) -> Vec<CallSignatureSite> {
        Vec::new()
    }

    /// Spans for `TemplateLiteral` tags, in source order.
    fn template_spans(&self) -> Vec<TemplateSpanSite> {
        Vec::new()
    }

    fn enum_name(&self) -> Option<String> {
        None
    }

    fn enum_members(&self) -> Vec<EnumMemberSite> {
        Vec::new()
    }

    /// Parameter name for `TypeParameter` tags.
    fn type_parameter_name(&self) -> Option<String> {
        None
    }

    /// Doc-comment text attached to the declaration itself.
    fn doc(&self) -> Option<String> {
        None
    }
}

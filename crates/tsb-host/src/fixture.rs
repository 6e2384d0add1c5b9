//! In-memory fixture backend.
//!
//! [`FixtureType`] implements [`TypeHandle`] over hand-built shapes, giving
//! tests the same observable surface a real checker adapter would have.
//! Handles are cheaply cloneable (`Arc` inside), and object property lists
//! sit behind a lock so a test can tie a self-referential knot:
//!
//! ```ignore
//! let node = FixtureType::object("Node").at("tree.ts");
//! node.add_property("value", FixtureType::string());
//! node.add_property("next", node.clone());
//! ```

use std::sync::{Arc, RwLock};

use tsb_model::{IndexKeyKind, LiteralValue, TypeIdentity, TypeNode};

use crate::handle::{
    CallSignatureSite, EnumMemberSite, GenericParamSite, IndexSignatureSite, MemberModifiers,
    ParamSite, PropertySite, TemplateSpanSite, TypeHandle, TypeTag,
};
use crate::oracle::AssignabilityOracle;

/// One fixture property, pre-boxing.
#[derive(Clone)]
struct FixtureProperty {
    name: String,
    modifiers: MemberModifiers,
    doc: Option<String>,
    ty: Option<FixtureType>,
    callable: Option<CallSignatureSite>,
}

#[derive(Clone)]
struct FixtureGenericParam {
    name: String,
    constraint: Option<FixtureType>,
    default: Option<FixtureType>,
}

#[derive(Clone)]
struct FixtureIndexSignature {
    key: IndexKeyKind,
    value: FixtureType,
    readonly: bool,
}

/// One span of a fixture template-literal type.
#[derive(Clone)]
pub enum FixtureSpan {
    Text(String),
    Hole(FixtureType),
}

struct FixtureData {
    tag: TypeTag,
    text_override: Option<String>,
    name: Option<String>,
    source_location: String,
    literal: Option<LiteralValue>,
    primitive: Option<String>,
    element: Option<FixtureType>,
    elements: Vec<FixtureType>,
    members: Vec<FixtureType>,
    type_args: Vec<FixtureType>,
    generic_params: Vec<FixtureGenericParam>,
    heritage: RwLock<Vec<FixtureType>>,
    properties: RwLock<Vec<FixtureProperty>>,
    index_signatures: Vec<FixtureIndexSignature>,
    call_signatures: Vec<CallSignatureSite>,
    spans: Vec<FixtureSpan>,
    enum_members: Vec<EnumMemberSite>,
    doc: Option<String>,
}

impl Clone for FixtureData {
    fn clone(&self) -> Self {
        FixtureData {
            tag: self.tag,
            text_override: self.text_override.clone(),
            name: self.name.clone(),
            source_location: self.source_location.clone(),
            literal: self.literal.clone(),
            primitive: self.primitive.clone(),
            element: self.element.clone(),
            elements: self.elements.clone(),
            members: self.members.clone(),
            type_args: self.type_args.clone(),
            generic_params: self.generic_params.clone(),
            heritage: RwLock::new(self.heritage.read().unwrap().clone()),
            properties: RwLock::new(self.properties.read().unwrap().clone()),
            index_signatures: self.index_signatures.clone(),
            call_signatures: self.call_signatures.clone(),
            spans: self.spans.clone(),
            enum_members: self.enum_members.clone(),
            doc: self.doc.clone(),
        }
    }
}

/// A hand-built host type. Cloning shares the underlying data.
#[derive(Clone)]
pub struct FixtureType(Arc<FixtureData>);

impl FixtureType {
    fn with_tag(tag: TypeTag) -> Self {
        FixtureType(Arc::new(FixtureData {
            tag,
            text_override: None,
            name: None,
            source_location: "<fixture>".to_string(),
            literal: None,
            primitive: None,
            element: None,
            elements: Vec::new(),
            members: Vec::new(),
            type_args: Vec::new(),
            generic_params: Vec::new(),
            heritage: RwLock::new(Vec::new()),
            properties: RwLock::new(Vec::new()),
            index_signatures: Vec::new(),
            call_signatures: Vec::new(),
            spans: Vec::new(),
            enum_members: Vec::new(),
            doc: None,
        }))
    }

    fn data_mut(&mut self) -> &mut FixtureData {
        Arc::make_mut(&mut self.0)
    }

    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    pub fn primitive(name: &str) -> Self {
        let mut t = Self::with_tag(TypeTag::Primitive);
        t.data_mut().primitive = Some(name.to_string());
        t
    }

    pub fn string() -> Self {
        Self::primitive("string")
    }

    pub fn number() -> Self {
        Self::primitive("number")
    }

    pub fn boolean() -> Self {
        Self::primitive("boolean")
    }

    pub fn literal(value: LiteralValue) -> Self {
        let mut t = Self::with_tag(TypeTag::Literal);
        t.data_mut().literal = Some(value);
        t
    }

    pub fn string_literal(value: &str) -> Self {
        Self::literal(LiteralValue::String(value.to_string()))
    }

    pub fn number_literal(value: f64) -> Self {
        Self::literal(LiteralValue::Number(value))
    }

    pub fn array(element: FixtureType) -> Self {
        let mut t = Self::with_tag(TypeTag::Array);
        t.data_mut().element = Some(element);
        t
    }

    pub fn tuple(elements: impl IntoIterator<Item = FixtureType>) -> Self {
        let mut t = Self::with_tag(TypeTag::Tuple);
        t.data_mut().elements = elements.into_iter().collect();
        t
    }

    pub fn union(members: impl IntoIterator<Item = FixtureType>) -> Self {
        let mut t = Self::with_tag(TypeTag::Union);
        t.data_mut().members = members.into_iter().collect();
        t
    }

    pub fn intersection(members: impl IntoIterator<Item = FixtureType>) -> Self {
        let mut t = Self::with_tag(TypeTag::Intersection);
        t.data_mut().members = members.into_iter().collect();
        t
    }

    /// A named object-like declaration (interface/class/type-literal alias).
    pub fn object(name: &str) -> Self {
        let mut t = Self::with_tag(TypeTag::Object);
        t.data_mut().name = Some(name.to_string());
        t
    }

    /// An anonymous inline object shape.
    pub fn anonymous_object() -> Self {
        Self::with_tag(TypeTag::Object)
    }

    pub fn callable(signature: CallSignatureSite) -> Self {
        let mut t = Self::with_tag(TypeTag::Callable);
        t.data_mut().call_signatures = vec![signature];
        t
    }

    pub fn template(spans: impl IntoIterator<Item = FixtureSpan>) -> Self {
        let mut t = Self::with_tag(TypeTag::TemplateLiteral);
        t.data_mut().spans = spans.into_iter().collect();
        t
    }

    pub fn type_param(name: &str) -> Self {
        let mut t = Self::with_tag(TypeTag::TypeParameter);
        t.data_mut().name = Some(name.to_string());
        t
    }

    pub fn enumeration(
        name: &str,
        members: impl IntoIterator<Item = (String, Option<LiteralValue>)>,
    ) -> Self {
        let mut t = Self::with_tag(TypeTag::Enum);
        t.data_mut().name = Some(name.to_string());
        t.data_mut().enum_members = members
            .into_iter()
            .map(|(name, value)| EnumMemberSite { name, value })
            .collect();
        t
    }

    /// A type the host can only render textually: keyof/typeof/index-access/
    /// conditional placeholders, or anything else opaque.
    pub fn opaque(tag: TypeTag, text: &str) -> Self {
        let mut t = Self::with_tag(tag);
        t.data_mut().text_override = Some(text.to_string());
        t
    }

    /// An unresolved expression the checker gave up on: structurally an empty
    /// object whose only information is its text. This is exactly what an
    /// uncollapsed `Omit<T, "x">` over an open `T` looks like.
    pub fn unresolved(text: &str) -> Self {
        Self::opaque(TypeTag::Object, text)
    }

    // -----------------------------------------------------------------------
    // Builder methods (pre-cloning)
    // -----------------------------------------------------------------------

    /// Set the source location of the backing declaration.
    pub fn at(mut self, source_location: &str) -> Self {
        self.data_mut().source_location = source_location.to_string();
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.data_mut().text_override = Some(text.to_string());
        self
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.data_mut().doc = Some(doc.to_string());
        self
    }

    pub fn with_type_args(mut self, args: impl IntoIterator<Item = FixtureType>) -> Self {
        self.data_mut().type_args = args.into_iter().collect();
        self
    }

    pub fn with_generic_param(
        mut self,
        name: &str,
        constraint: Option<FixtureType>,
        default: Option<FixtureType>,
    ) -> Self {
        self.data_mut().generic_params.push(FixtureGenericParam {
            name: name.to_string(),
            constraint,
            default,
        });
        self
    }

    pub fn with_index_signature(
        mut self,
        key: IndexKeyKind,
        value: FixtureType,
        readonly: bool,
    ) -> Self {
        self.data_mut().index_signatures.push(FixtureIndexSignature {
            key,
            value,
            readonly,
        });
        self
    }

    pub fn with_call_signature(mut self, signature: CallSignatureSite) -> Self {
        self.data_mut().call_signatures.push(signature);
        self
    }

    pub fn with_property(self, name: &str, ty: FixtureType) -> Self {
        self.add_property(name, ty);
        self
    }

    pub fn with_modified_property(
        self,
        name: &str,
        ty: FixtureType,
        modifiers: MemberModifiers,
    ) -> Self {
        self.push_property(FixtureProperty {
            name: name.to_string(),
            modifiers,
            doc: None,
            ty: Some(ty),
            callable: None,
        });
        self
    }

    pub fn with_documented_property(self, name: &str, ty: FixtureType, doc: &str) -> Self {
        self.push_property(FixtureProperty {
            name: name.to_string(),
            modifiers: MemberModifiers::empty(),
            doc: Some(doc.to_string()),
            ty: Some(ty),
            callable: None,
        });
        self
    }

    pub fn with_callable_property(
        self,
        name: &str,
        ty: FixtureType,
        signature: CallSignatureSite,
    ) -> Self {
        self.push_property(FixtureProperty {
            name: name.to_string(),
            modifiers: MemberModifiers::empty(),
            doc: None,
            ty: Some(ty),
            callable: Some(signature),
        });
        self
    }

    /// A member the host could not type at all.
    pub fn with_untyped_property(self, name: &str) -> Self {
        self.push_property(FixtureProperty {
            name: name.to_string(),
            modifiers: MemberModifiers::empty(),
            doc: None,
            ty: None,
            callable: None,
        });
        self
    }

    pub fn extending(self, base: FixtureType) -> Self {
        self.0.heritage.write().unwrap().push(base);
        self
    }

    // -----------------------------------------------------------------------
    // Post-construction mutation (for cyclic shapes)
    // -----------------------------------------------------------------------

    /// Append a property through the shared data, so clones taken earlier
    /// observe it. This is how tests build self-referential objects.
    pub fn add_property(&self, name: &str, ty: FixtureType) {
        self.push_property(FixtureProperty {
            name: name.to_string(),
            modifiers: MemberModifiers::empty(),
            doc: None,
            ty: Some(ty),
            callable: None,
        });
    }

    fn push_property(&self, prop: FixtureProperty) {
        self.0.properties.write().unwrap().push(prop);
    }

    fn derived_text(&self) -> String {
        let d = &self.0;
        match d.tag {
            TypeTag::Literal => d
                .literal
                .as_ref()
                .map(|v| v.to_expression())
                .unwrap_or_default(),
            TypeTag::Primitive => d.primitive.clone().unwrap_or_default(),
            TypeTag::Array => format!("{}[]", d.element.as_ref().map(|e| e.text()).unwrap_or_default()),
            TypeTag::Tuple => format!(
                "[{}]",
                d.elements.iter().map(|e| e.text()).collect::<Vec<_>>().join(", ")
            ),
            TypeTag::Union => d
                .members
                .iter()
                .map(|m| m.text())
                .collect::<Vec<_>>()
                .join(" | "),
            TypeTag::Intersection => d
                .members
                .iter()
                .map(|m| m.text())
                .collect::<Vec<_>>()
                .join(" & "),
            TypeTag::TemplateLiteral => {
                let mut out = String::from("`");
                for span in &d.spans {
                    match span {
                        FixtureSpan::Text(text) => out.push_str(text),
                        FixtureSpan::Hole(ty) => {
                            out.push_str("${");
                            out.push_str(&ty.text());
                            out.push('}');
                        }
                    }
                }
                out.push('`');
                out
            }
            TypeTag::Callable => d
                .call_signatures
                .first()
                .map(|s| s.render())
                .unwrap_or_else(|| "Function".to_string()),
            _ => d.name.clone().unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

impl TypeHandle for FixtureType {
    fn tag(&self) -> TypeTag {
        self.0.tag
    }

    fn text(&self) -> String {
        self.0
            .text_override
            .clone()
            .unwrap_or_else(|| self.derived_text())
    }

    fn identity(&self) -> Option<TypeIdentity> {
        self.0
            .name
            .as_ref()
            .map(|name| TypeIdentity::new(self.0.source_location.clone(), name.clone()))
    }

    fn literal_value(&self) -> Option<LiteralValue> {
        self.0.literal.clone()
    }

    fn primitive_name(&self) -> Option<String> {
        self.0.primitive.clone()
    }

    fn element_type(&self) -> Option<Box<dyn TypeHandle>> {
        self.0
            .element
            .as_ref()
            .map(|e| Box::new(e.clone()) as Box<dyn TypeHandle>)
    }

    fn tuple_elements(&self) -> Vec<Box<dyn TypeHandle>> {
        boxed(&self.0.elements)
    }

    fn union_members(&self) -> Vec<Box<dyn TypeHandle>> {
        boxed(&self.0.members)
    }

    fn intersection_members(&self) -> Vec<Box<dyn TypeHandle>> {
        boxed(&self.0.members)
    }

    fn type_arguments(&self) -> Vec<Box<dyn TypeHandle>> {
        boxed(&self.0.type_args)
    }

    fn generic_params(&self) -> Vec<GenericParamSite> {
        self.0
            .generic_params
            .iter()
            .map(|p| GenericParamSite {
                name: p.name.clone(),
                constraint: p
                    .constraint
                    .as_ref()
                    .map(|c| Box::new(c.clone()) as Box<dyn TypeHandle>),
                default: p
                    .default
                    .as_ref()
                    .map(|d| Box::new(d.clone()) as Box<dyn TypeHandle>),
            })
            .collect()
    }

    fn heritage_types(&self) -> Vec<Box<dyn TypeHandle>> {
        boxed(&self.0.heritage.read().unwrap())
    }

    fn properties(&self) -> Vec<PropertySite> {
        self.0
            .properties
            .read()
            .unwrap()
            .iter()
            .map(|p| PropertySite {
                name: p.name.clone(),
                modifiers: p.modifiers,
                doc: p.doc.clone(),
                ty: p
                    .ty
                    .as_ref()
                    .map(|t| Box::new(t.clone()) as Box<dyn TypeHandle>),
                callable: p.callable.clone(),
            })
            .collect()
    }

    fn index_signatures(&self) -> Vec<IndexSignatureSite> {
        self.0
            .index_signatures
            .iter()
            .map(|s| IndexSignatureSite {
                key: s.key,
                value: Box::new(s.value.clone()) as Box<dyn TypeHandle>,
                readonly: s.readonly,
            })
            .collect()
    }

    fn call_signatures(&self) -> Vec<CallSignatureSite> {
        self.0.call_signatures.clone()
    }

    fn template_spans(&self) -> Vec<TemplateSpanSite> {
        self.0
            .spans
            .iter()
            .map(|span| match span {
                FixtureSpan::Text(text) => TemplateSpanSite::Text(text.clone()),
                FixtureSpan::Hole(ty) => {
                    TemplateSpanSite::Placeholder(Box::new(ty.clone()) as Box<dyn TypeHandle>)
                }
            })
            .collect()
    }

    fn enum_name(&self) -> Option<String> {
        if self.0.tag == TypeTag::Enum {
            self.0.name.clone()
        } else {
            None
        }
    }

    fn enum_members(&self) -> Vec<EnumMemberSite> {
        self.0.enum_members.clone()
    }

    fn type_parameter_name(&self) -> Option<String> {
        if self.0.tag == TypeTag::TypeParameter {
            self.0.name.clone()
        } else {
            None
        }
    }

    fn doc(&self) -> Option<String> {
        self.0.doc.clone()
    }
}

fn boxed(handles: &[FixtureType]) -> Vec<Box<dyn TypeHandle>> {
    handles
        .iter()
        .map(|h| Box::new(h.clone()) as Box<dyn TypeHandle>)
        .collect()
}

/// Convenience constructor for call signature sites.
pub fn call_signature(
    params: impl IntoIterator<Item = (&'static str, &'static str, bool)>,
    return_type_text: &str,
) -> CallSignatureSite {
    CallSignatureSite {
        params: params
            .into_iter()
            .map(|(name, type_text, optional)| ParamSite {
                name: name.to_string(),
                optional,
                type_text: type_text.to_string(),
            })
            .collect(),
        return_type_text: return_type_text.to_string(),
    }
}

/// Structural assignability over normalized nodes, sufficient for literal
/// unions and primitives. A real backend would delegate to the host checker.
#[derive(Debug, Default)]
pub struct FixtureOracle;

impl AssignabilityOracle for FixtureOracle {
    fn is_assignable(&self, source: &TypeNode, target: &TypeNode) -> bool {
        if source == target {
            return true;
        }
        match (source, target) {
            (TypeNode::Never, _) => true,
            (_, TypeNode::Unknown) => true,
            (_, TypeNode::Primitive { name }) if name == "any" => true,
            (TypeNode::Literal { value }, TypeNode::Primitive { name }) => matches!(
                (value, name.as_str()),
                (LiteralValue::String(_), "string")
                    | (LiteralValue::Number(_), "number")
                    | (LiteralValue::Boolean(_), "boolean")
            ),
            (TypeNode::Union { members }, target) => {
                members.iter().all(|m| self.is_assignable(m, target))
            }
            (source, TypeNode::Union { members }) => {
                members.iter().any(|m| self.is_assignable(source, m))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_text_derivation() {
        let t = FixtureType::union([
            FixtureType::string_literal("a"),
            FixtureType::number(),
        ]);
        assert_eq!(t.text(), "\"a\" | number");

        let tpl = FixtureType::template([
            FixtureSpan::Text("user-".to_string()),
            FixtureSpan::Hole(FixtureType::type_param("K")),
        ]);
        assert_eq!(tpl.text(), "`user-${K}`");
    }

    #[test]
    fn cyclic_properties_are_shared_through_clones() {
        let node = FixtureType::object("Node").at("tree.ts");
        node.add_property("next", node.clone());
        let props = node.properties();
        assert_eq!(props.len(), 1);
        let next = props[0].ty.as_ref().unwrap();
        assert_eq!(next.identity(), node.identity());
    }

    #[test]
    fn oracle_handles_literal_unions() {
        let oracle = FixtureOracle;
        let a = TypeNode::string_literal("a");
        let ab = TypeNode::Union {
            members: vec![TypeNode::string_literal("a"), TypeNode::string_literal("b")],
        };
        assert!(oracle.is_assignable(&a, &ab));
        assert!(!oracle.is_assignable(&TypeNode::string_literal("c"), &ab));
        assert!(oracle.is_assignable(&a, &TypeNode::primitive("string")));
    }
}

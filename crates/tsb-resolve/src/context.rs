//! Scoped registry of open type parameters and their bindings.
//!
//! A [`GenericContext`] is created at each independent resolution entry point
//! and at each nested-scope boundary (a property's type, an array element, a
//! type argument), and discarded when that subtree returns. Child contexts
//! chain to their parent: bindings set in a child never leak upward, so
//! sibling subtrees can be explored without cross-contamination.
//!
//! `resolve()` deliberately does **not** fall back to a parameter's declared
//! default — callers decide whether an unbound parameter surfaces as an open
//! generic or uses its default.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tsb_model::{GenericParam, TypeNode};

use crate::error::ContextError;

/// Conflict policy for [`GenericContext::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Keep the parameter/binding already present in `self`.
    KeepExisting,
    /// Take the incoming parameter/binding.
    Overwrite,
    /// Fail on the first same-named parameter.
    ErrorOnConflict,
}

#[derive(Default)]
struct ContextInner {
    params: IndexMap<String, GenericParam>,
    bindings: FxHashMap<String, TypeNode>,
}

/// A scoped registry of open type parameters and their bound arguments.
pub struct GenericContext {
    parent: Option<Rc<GenericContext>>,
    inner: RefCell<ContextInner>,
}

impl GenericContext {
    /// A fresh root context for one resolution entry point.
    pub fn root() -> Rc<Self> {
        Rc::new(GenericContext {
            parent: None,
            inner: RefCell::new(ContextInner::default()),
        })
    }

    /// A new context chained to `self`. Registrations and bindings made in
    /// the child are invisible to the parent and to sibling children.
    pub fn child(self: &Rc<Self>) -> Rc<Self> {
        Rc::new(GenericContext {
            parent: Some(Rc::clone(self)),
            inner: RefCell::new(ContextInner::default()),
        })
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register one parameter in this context.
    ///
    /// Rejects empty names, a name already registered in this exact context
    /// (shadowing a parent is allowed), and a constraint that directly or
    /// transitively refers back to the parameter.
    pub fn register_param(&self, param: GenericParam) -> Result<(), ContextError> {
        self.validate_param(&param, &[])?;
        self.inner
            .borrow_mut()
            .params
            .insert(param.name.clone(), param);
        Ok(())
    }

    /// Register a batch of parameters, all-or-nothing: if any parameter is
    /// invalid, none are registered.
    pub fn register_params(&self, params: Vec<GenericParam>) -> Result<(), ContextError> {
        for (i, param) in params.iter().enumerate() {
            // Earlier batch members count as registered for validation, and
            // the rest of the batch participates in cycle detection.
            if params[..i].iter().any(|p| p.name == param.name) {
                return Err(ContextError::DuplicateParam {
                    name: param.name.clone(),
                });
            }
            self.validate_param(param, &params)?;
        }
        let mut inner = self.inner.borrow_mut();
        for param in params {
            inner.params.insert(param.name.clone(), param);
        }
        Ok(())
    }

    fn validate_param(&self, param: &GenericParam, batch: &[GenericParam]) -> Result<(), ContextError> {
        if param.name.is_empty() {
            return Err(ContextError::EmptyParamName);
        }
        if self.inner.borrow().params.contains_key(&param.name) {
            return Err(ContextError::DuplicateParam {
                name: param.name.clone(),
            });
        }
        if let Some(constraint) = &param.constraint {
            if self.constraint_reaches(constraint, &param.name, batch) {
                return Err(ContextError::SelfReferentialConstraint {
                    name: param.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Walk the constraint chain: does `constraint` mention `target`,
    /// directly or through other parameters' constraints?
    fn constraint_reaches(&self, constraint: &TypeNode, target: &str, batch: &[GenericParam]) -> bool {
        let mut queue: SmallVec<[String; 8]> = SmallVec::new();
        referenced_names(constraint, &mut queue);
        let mut seen: FxHashSet<String> = FxHashSet::default();

        while let Some(name) = queue.pop() {
            if name == target {
                return true;
            }
            if !seen.insert(name.clone()) {
                continue;
            }
            let next_constraint = batch
                .iter()
                .find(|p| p.name == name)
                .and_then(|p| p.constraint.clone())
                .or_else(|| self.lookup_param(&name).and_then(|p| p.constraint));
            if let Some(c) = next_constraint {
                referenced_names(&c, &mut queue);
            }
        }
        false
    }

    /// Find a parameter by name, consulting this context first and then the
    /// parent chain.
    pub fn lookup_param(&self, name: &str) -> Option<GenericParam> {
        if let Some(param) = self.inner.borrow().params.get(name) {
            return Some(param.clone());
        }
        self.parent.as_ref().and_then(|p| p.lookup_param(name))
    }

    /// Whether `name` is registered anywhere on the chain.
    pub fn is_registered(&self, name: &str) -> bool {
        self.lookup_param(name).is_some()
    }

    // -----------------------------------------------------------------------
    // Binding and resolution
    // -----------------------------------------------------------------------

    /// Attach a concrete resolved type to an already-registered parameter.
    /// The binding is stored locally even when the parameter was registered
    /// on an ancestor, so it never leaks to siblings.
    pub fn bind(&self, name: &str, ty: TypeNode) -> Result<(), ContextError> {
        if !self.is_registered(name) {
            return Err(ContextError::UnboundParam {
                name: name.to_string(),
            });
        }
        self.inner
            .borrow_mut()
            .bindings
            .insert(name.to_string(), ty);
        Ok(())
    }

    /// The bound type for `name`, consulting this context first and then the
    /// parent chain. Never falls back to the parameter's declared default.
    pub fn resolve(&self, name: &str) -> Option<TypeNode> {
        if let Some(ty) = self.inner.borrow().bindings.get(name) {
            return Some(ty.clone());
        }
        self.parent.as_ref().and_then(|p| p.resolve(name))
    }

    /// Parameters visible from this context that have no binding anywhere on
    /// the chain — the ones a generated builder must stay generic over.
    pub fn unresolved_params(&self) -> Vec<GenericParam> {
        self.all_params()
            .into_iter()
            .filter(|p| self.resolve(&p.name).is_none())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Merging and enumeration
    // -----------------------------------------------------------------------

    /// Combine another context's locally-registered parameters and bindings
    /// into this one.
    ///
    /// The engine's own recursion never calls this: intersection members and
    /// other nested scopes compose through `propagate_open_params`, which
    /// copies open parameters only and leaves bindings behind. `merge` is the
    /// surface for callers outside the engine that compose whole contexts,
    /// bindings included, under an explicit conflict policy.
    pub fn merge(&self, other: &GenericContext, policy: MergePolicy) -> Result<(), ContextError> {
        let other_inner = other.inner.borrow();
        {
            let mut inner = self.inner.borrow_mut();
            for (name, param) in &other_inner.params {
                match (inner.params.contains_key(name), policy) {
                    (false, _) => {
                        inner.params.insert(name.clone(), param.clone());
                    }
                    (true, MergePolicy::KeepExisting) => {}
                    (true, MergePolicy::Overwrite) => {
                        inner.params.insert(name.clone(), param.clone());
                    }
                    (true, MergePolicy::ErrorOnConflict) => {
                        return Err(ContextError::MergeConflict { name: name.clone() });
                    }
                }
            }
            for (name, ty) in &other_inner.bindings {
                match (inner.bindings.contains_key(name), policy) {
                    (false, _) => {
                        inner.bindings.insert(name.clone(), ty.clone());
                    }
                    (true, MergePolicy::KeepExisting) => {}
                    (true, MergePolicy::Overwrite) => {
                        inner.bindings.insert(name.clone(), ty.clone());
                    }
                    (true, MergePolicy::ErrorOnConflict) => {
                        return Err(ContextError::MergeConflict { name: name.clone() });
                    }
                }
            }
        }
        Ok(())
    }

    /// All parameters visible from this context: parent chain first, then
    /// this context, with this context shadowing the parent on name
    /// collisions. Recomputed on every call, so mutations anywhere on the
    /// chain are always visible.
    pub fn all_params(&self) -> Vec<GenericParam> {
        let mut merged: IndexMap<String, GenericParam> = IndexMap::new();
        if let Some(parent) = &self.parent {
            for param in parent.all_params() {
                merged.insert(param.name.clone(), param);
            }
        }
        for (name, param) in &self.inner.borrow().params {
            merged.insert(name.clone(), param.clone());
        }
        merged.into_values().collect()
    }
}

/// Collect the generic-looking names a node refers to (open generics and
/// by-name references), recursively.
fn referenced_names(node: &TypeNode, out: &mut SmallVec<[String; 8]>) {
    match node {
        TypeNode::Generic { name } => out.push(name.clone()),
        TypeNode::Reference {
            name,
            type_arguments,
        } => {
            out.push(name.clone());
            if let Some(args) = type_arguments {
                for arg in args {
                    referenced_names(arg, out);
                }
            }
        }
        TypeNode::Array { element } => referenced_names(element, out),
        TypeNode::Tuple { elements } => {
            for e in elements {
                referenced_names(e, out);
            }
        }
        TypeNode::Union { members } | TypeNode::Intersection { members } => {
            for m in members {
                referenced_names(m, out);
            }
        }
        TypeNode::Object { properties, .. } => {
            for p in properties {
                referenced_names(&p.ty, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_names_and_duplicates() {
        let ctx = GenericContext::root();
        assert_eq!(
            ctx.register_param(GenericParam::new("")),
            Err(ContextError::EmptyParamName)
        );
        ctx.register_param(GenericParam::new("T")).unwrap();
        assert!(matches!(
            ctx.register_param(GenericParam::new("T")),
            Err(ContextError::DuplicateParam { .. })
        ));
    }

    #[test]
    fn rejects_self_referential_constraints() {
        let ctx = GenericContext::root();
        let mut t = GenericParam::new("T");
        t.constraint = Some(TypeNode::generic("T"));
        assert!(matches!(
            ctx.register_param(t),
            Err(ContextError::SelfReferentialConstraint { .. })
        ));
    }

    #[test]
    fn rejects_transitively_cyclic_constraints_in_a_batch() {
        let ctx = GenericContext::root();
        let mut t = GenericParam::new("T");
        t.constraint = Some(TypeNode::generic("U"));
        let mut u = GenericParam::new("U");
        u.constraint = Some(TypeNode::generic("T"));
        let err = ctx.register_params(vec![t, u]);
        assert!(matches!(
            err,
            Err(ContextError::SelfReferentialConstraint { .. })
        ));
        // All-or-nothing: neither parameter landed.
        assert!(!ctx.is_registered("T"));
        assert!(!ctx.is_registered("U"));
    }

    #[test]
    fn bind_requires_registration_on_the_chain() {
        let ctx = GenericContext::root();
        assert!(matches!(
            ctx.bind("T", TypeNode::primitive("string")),
            Err(ContextError::UnboundParam { .. })
        ));
        ctx.register_param(GenericParam::new("T")).unwrap();
        ctx.bind("T", TypeNode::primitive("string")).unwrap();
        assert_eq!(ctx.resolve("T"), Some(TypeNode::primitive("string")));
    }

    #[test]
    fn resolve_never_uses_the_declared_default() {
        let ctx = GenericContext::root();
        let mut t = GenericParam::new("T");
        t.default = Some(TypeNode::primitive("string"));
        ctx.register_param(t).unwrap();
        assert_eq!(ctx.resolve("T"), None);
        assert_eq!(ctx.unresolved_params().len(), 1);
    }

    #[test]
    fn sibling_children_do_not_share_bindings() {
        let parent = GenericContext::root();
        parent.register_param(GenericParam::new("T")).unwrap();

        let left = parent.child();
        let right = parent.child();
        left.bind("T", TypeNode::primitive("number")).unwrap();

        assert_eq!(left.resolve("T"), Some(TypeNode::primitive("number")));
        assert_eq!(right.resolve("T"), None);
        assert_eq!(parent.resolve("T"), None);
    }

    #[test]
    fn child_shadows_parent_in_all_params() {
        let parent = GenericContext::root();
        let mut t = GenericParam::new("T");
        t.constraint = Some(TypeNode::primitive("string"));
        parent.register_param(t).unwrap();

        let child = parent.child();
        child.register_param(GenericParam::new("T")).unwrap();
        child.register_param(GenericParam::new("U")).unwrap();

        let all = child.all_params();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "T");
        assert_eq!(all[0].constraint, None); // child's T, not parent's
        assert_eq!(all[1].name, "U");
    }

    #[test]
    fn all_params_sees_later_parent_registrations() {
        let parent = GenericContext::root();
        let child = parent.child();
        assert!(child.all_params().is_empty());

        // A parameter registered on the parent after the child already
        // enumerated must show up on the next enumeration.
        parent.register_param(GenericParam::new("T")).unwrap();
        let all = child.all_params();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "T");
        assert!(child.unresolved_params().iter().any(|p| p.name == "T"));
    }

    #[test]
    fn merge_policies() {
        let a = GenericContext::root();
        a.register_param(GenericParam::new("T")).unwrap();
        a.bind("T", TypeNode::primitive("string")).unwrap();

        let b = GenericContext::root();
        b.register_param(GenericParam::new("T")).unwrap();
        b.register_param(GenericParam::new("U")).unwrap();
        b.bind("T", TypeNode::primitive("number")).unwrap();

        a.merge(&b, MergePolicy::KeepExisting).unwrap();
        assert_eq!(a.resolve("T"), Some(TypeNode::primitive("string")));
        assert!(a.is_registered("U"));

        a.merge(&b, MergePolicy::Overwrite).unwrap();
        assert_eq!(a.resolve("T"), Some(TypeNode::primitive("number")));

        assert!(matches!(
            a.merge(&b, MergePolicy::ErrorOnConflict),
            Err(ContextError::MergeConflict { .. })
        ));
    }
}

//! The resolution orchestrator.
//!
//! Entry point for turning a host [`TypeHandle`] into a [`TypeNode`] tree.
//! Dispatch is a single match on the handle's [`TypeTag`]; within the
//! object-like arm the unresolved-utility check runs before any property
//! resolution, because an unexpanded utility operation structurally resembles
//! an empty object and would otherwise normalize to one.
//!
//! Termination is guaranteed twice over: a path-scoped visit guard cuts
//! self-referential declarations with a `Reference` placeholder, and a depth
//! bound degrades anything deeper to terminal placeholders. Neither is an
//! error — partial fidelity beats total failure. The only hard errors are a
//! member with no derivable type (aborts that member's subtree only) and the
//! template combination guard.

use std::rc::Rc;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use tsb_host::{AssignabilityOracle, TypeHandle, TypeTag};
use tsb_model::{GenericParam, LiteralValue, ResolvedType, TypeIdentity, TypeNode};

use crate::cache::ResolutionCache;
use crate::context::GenericContext;
use crate::error::ResolveResult;
use crate::hooks::PropertyTransformHook;
use crate::limits::{MAX_DEPENDENCY_WALK, ResolverOptions};
use crate::recursion::{VisitGuard, VisitOutcome};
use crate::utility::is_unresolved_utility;

/// Named declarations encountered during one resolution call tree, collected
/// into the entry point's `imports` and `dependencies`.
pub(crate) struct DependencyTracker {
    root_name: String,
    visited: FxHashSet<String>,
    import_seen: FxHashSet<String>,
    imports: Vec<String>,
    resolved: Vec<ResolvedType>,
}

impl DependencyTracker {
    fn new(root_name: String) -> Self {
        let mut visited = FxHashSet::default();
        visited.insert(root_name.clone());
        DependencyTracker {
            root_name,
            visited,
            import_seen: FxHashSet::default(),
            imports: Vec::new(),
            resolved: Vec::new(),
        }
    }

    pub(crate) fn record_import(&mut self, name: &str) {
        if name == self.root_name {
            return;
        }
        if self.import_seen.insert(name.to_string()) {
            self.imports.push(name.to_string());
        }
    }

    /// Record a named declaration resolved somewhere below the entry point.
    /// Deduplicated by name across the whole walk.
    pub(crate) fn record(&mut self, identity: &TypeIdentity, node: &TypeNode) {
        self.record_import(&identity.name);
        if self.resolved.len() >= MAX_DEPENDENCY_WALK {
            return;
        }
        if self.visited.insert(identity.name.clone()) {
            self.resolved.push(ResolvedType {
                source_location: identity.source_location.clone(),
                name: identity.name.clone(),
                type_model: node.clone(),
                imports: Vec::new(),
                dependencies: Vec::new(),
            });
        }
    }
}

/// Per-call-tree mutable state threaded through the recursion.
pub struct ResolveState {
    pub(crate) guard: VisitGuard<TypeIdentity>,
    pub(crate) deps: DependencyTracker,
}

impl ResolveState {
    fn new(max_depth: u32, root_name: String) -> Self {
        ResolveState {
            guard: VisitGuard::new(max_depth),
            deps: DependencyTracker::new(root_name),
        }
    }
}

/// The type resolution engine.
pub struct TypeResolver<'a> {
    options: ResolverOptions,
    cache: &'a ResolutionCache,
    oracle: Option<&'a dyn AssignabilityOracle>,
    hooks: Vec<Box<dyn PropertyTransformHook>>,
}

impl<'a> TypeResolver<'a> {
    /// A resolver with default options against the process-wide cache.
    pub fn new() -> Self {
        TypeResolver {
            options: ResolverOptions::default(),
            cache: ResolutionCache::global(),
            oracle: None,
            hooks: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cache(mut self, cache: &'a ResolutionCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_oracle(mut self, oracle: &'a dyn AssignabilityOracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_hook(mut self, hook: Box<dyn PropertyTransformHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub(crate) fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub(crate) fn oracle(&self) -> Option<&dyn AssignabilityOracle> {
        self.oracle
    }

    pub(crate) fn hooks(&self) -> &[Box<dyn PropertyTransformHook>] {
        &self.hooks
    }

    // -----------------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------------

    /// Resolve a named declaration into a [`ResolvedType`], consulting and
    /// populating the shared cache.
    pub fn resolve(&self, handle: &dyn TypeHandle) -> ResolveResult<Arc<ResolvedType>> {
        let identity = handle
            .identity()
            .unwrap_or_else(|| TypeIdentity::new("<anonymous>", handle.text()));
        if let Some(hit) = self.cache.get(&identity) {
            tracing::trace!(name = %identity.name, "resolve: cache hit");
            return Ok(hit);
        }

        tracing::debug!(name = %identity.name, location = %identity.source_location, "resolve");
        let ctx = GenericContext::root();
        let mut state = ResolveState::new(self.options.max_depth, identity.name.clone());
        let type_model = self.resolve_node(handle, 0, &ctx, &mut state)?;

        let resolved = Arc::new(ResolvedType {
            source_location: identity.source_location,
            name: identity.name,
            type_model,
            imports: state.deps.imports,
            dependencies: state.deps.resolved.into_iter().map(Arc::new).collect(),
        });
        self.cache.insert(Arc::clone(&resolved));
        Ok(resolved)
    }

    /// Resolve one type into a node tree without touching the cache.
    /// This is the recursive entry used by callers that manage their own
    /// [`GenericContext`] (and by tests).
    pub fn resolve_type(
        &self,
        handle: &dyn TypeHandle,
        depth: u32,
        ctx: &Rc<GenericContext>,
    ) -> ResolveResult<TypeNode> {
        let root_name = handle
            .identity()
            .map(|i| i.name)
            .unwrap_or_else(|| handle.text());
        let mut state = ResolveState::new(self.options.max_depth, root_name);
        self.resolve_node(handle, depth, ctx, &mut state)
    }

    // -----------------------------------------------------------------------
    // Recursive dispatch
    // -----------------------------------------------------------------------

    pub(crate) fn resolve_node(
        &self,
        handle: &dyn TypeHandle,
        depth: u32,
        ctx: &Rc<GenericContext>,
        state: &mut ResolveState,
    ) -> ResolveResult<TypeNode> {
        let tag = handle.tag();
        tracing::trace!(?tag, depth, "resolve_node");

        match tag {
            TypeTag::Literal => Ok(match handle.literal_value() {
                Some(value) => TypeNode::Literal { value },
                None => TypeNode::Unknown,
            }),

            TypeTag::Primitive => Ok(match handle.primitive_name() {
                Some(name) if name == "never" => TypeNode::Never,
                Some(name) if name == "unknown" => TypeNode::Unknown,
                Some(name) => TypeNode::Primitive { name },
                None => TypeNode::Unknown,
            }),

            TypeTag::Array => {
                let element = match handle.element_type() {
                    Some(el) => {
                        let scope = ctx.child();
                        let node = self.resolve_node(el.as_ref(), depth + 1, &scope, state)?;
                        self.propagate_open_params(&scope, ctx)?;
                        node
                    }
                    None => TypeNode::Unknown,
                };
                Ok(TypeNode::Array {
                    element: Box::new(element),
                })
            }

            TypeTag::Tuple => {
                let mut elements = Vec::new();
                for el in handle.tuple_elements() {
                    let scope = ctx.child();
                    elements.push(self.resolve_node(el.as_ref(), depth + 1, &scope, state)?);
                    self.propagate_open_params(&scope, ctx)?;
                }
                Ok(TypeNode::Tuple { elements })
            }

            TypeTag::Callable => {
                let signature = handle
                    .call_signatures()
                    .first()
                    .map(|s| s.render())
                    .unwrap_or_else(|| handle.text());
                Ok(TypeNode::Function { signature })
            }

            TypeTag::Union => {
                let mut members = Vec::new();
                for member in handle.union_members() {
                    members.push(self.resolve_node(member.as_ref(), depth + 1, ctx, state)?);
                }
                Ok(TypeNode::union_of(members))
            }

            TypeTag::Intersection => {
                let mut members = Vec::new();
                for member in handle.intersection_members() {
                    // Each member explores in its own scope; open parameters
                    // the members carry are composed back into the active
                    // context afterwards.
                    let scope = ctx.child();
                    members.push(self.resolve_node(member.as_ref(), depth + 1, &scope, state)?);
                    self.propagate_open_params(&scope, ctx)?;
                }
                Ok(TypeNode::Intersection { members })
            }

            TypeTag::TemplateLiteral => self.resolve_template(handle, depth, ctx, state),

            TypeTag::Enum => {
                let name = handle.enum_name().unwrap_or_else(|| handle.text());
                let members = handle.enum_members();
                let values: Vec<LiteralValue> =
                    members.into_iter().filter_map(|m| m.value).collect();
                let node = TypeNode::Enum {
                    name: name.clone(),
                    values: if values.is_empty() {
                        None
                    } else {
                        Some(values)
                    },
                };
                if depth > 0 {
                    if let Some(id) = handle.identity() {
                        state.deps.record(&id, &node);
                    }
                }
                Ok(node)
            }

            TypeTag::TypeParameter => {
                let name = handle
                    .type_parameter_name()
                    .unwrap_or_else(|| handle.text());
                if let Some(bound) = ctx.resolve(&name) {
                    return Ok(bound);
                }
                // Surface as an open generic; make sure the context knows
                // about it so the builder stays generic over it.
                if !ctx.is_registered(&name) {
                    ctx.register_param(GenericParam::new(name.clone()))?;
                }
                Ok(TypeNode::generic(name))
            }

            TypeTag::Keyof => Ok(TypeNode::Keyof {
                text: handle.text(),
            }),
            TypeTag::Typeof => Ok(TypeNode::Typeof {
                text: handle.text(),
            }),
            TypeTag::IndexAccess => Ok(TypeNode::IndexAccess {
                text: handle.text(),
            }),
            TypeTag::Conditional => Ok(TypeNode::Conditional {
                text: handle.text(),
            }),

            TypeTag::Object => self.resolve_object_like(handle, depth, ctx, state),

            TypeTag::Opaque => {
                // An opaque shape may still turn out to be an uncollapsed
                // utility operation or a textual template literal.
                if is_unresolved_utility(handle) {
                    return self.expand_utility(handle, depth, ctx, state);
                }
                if !handle.template_spans().is_empty() {
                    return self.resolve_template(handle, depth, ctx, state);
                }
                let text = handle.text();
                if text.is_empty() {
                    Ok(TypeNode::Unknown)
                } else {
                    Ok(TypeNode::generic(text))
                }
            }
        }
    }

    /// Object-like resolution: utility check first, then cycle/depth
    /// bookkeeping, then the property walk.
    fn resolve_object_like(
        &self,
        handle: &dyn TypeHandle,
        depth: u32,
        ctx: &Rc<GenericContext>,
        state: &mut ResolveState,
    ) -> ResolveResult<TypeNode> {
        if is_unresolved_utility(handle) {
            return self.expand_utility(handle, depth, ctx, state);
        }

        let identity = handle.identity();
        match &identity {
            Some(id) => match state.guard.enter(id.clone(), depth) {
                VisitOutcome::Cycle => {
                    tracing::trace!(name = %id.name, "cycle cut with reference");
                    state.deps.record_import(&id.name);
                    return Ok(TypeNode::reference(id.name.clone()));
                }
                VisitOutcome::DepthExceeded => {
                    tracing::trace!(name = %id.name, depth, "depth bound reached");
                    return Ok(TypeNode::empty_object(Some(id.name.clone())));
                }
                VisitOutcome::Entered => {}
            },
            None => {
                if depth >= self.options.max_depth {
                    return Ok(TypeNode::empty_object(None));
                }
            }
        }

        let result = self.resolve_object_body(handle, &identity, depth, ctx, state);
        if let Some(id) = &identity {
            state.guard.leave(id);
        }
        let node = result?;

        if depth > 0 {
            if let Some(id) = &identity {
                state.deps.record(id, &node);
            }
        }
        Ok(node)
    }

    fn resolve_object_body(
        &self,
        handle: &dyn TypeHandle,
        identity: &Option<TypeIdentity>,
        depth: u32,
        ctx: &Rc<GenericContext>,
        state: &mut ResolveState,
    ) -> ResolveResult<TypeNode> {
        let scope = ctx.child();

        // Declared type parameters, registered all-or-nothing. Constraints
        // and defaults resolve in a probe scope so that incidental
        // registrations there (a constraint naming a sibling parameter) do
        // not collide with the batch registration below.
        let param_sites = handle.generic_params();
        let mut declared: Vec<GenericParam> = Vec::new();
        if !param_sites.is_empty() {
            let probe = ctx.child();
            for site in param_sites {
                let constraint = match &site.constraint {
                    Some(c) => Some(self.resolve_node(c.as_ref(), depth + 1, &probe, state)?),
                    None => None,
                };
                let default = match &site.default {
                    Some(d) => Some(self.resolve_node(d.as_ref(), depth + 1, &probe, state)?),
                    None => None,
                };
                declared.push(GenericParam {
                    name: site.name,
                    constraint,
                    default,
                });
            }
            scope.register_params(declared.clone())?;

            // Bind supplied type arguments by position.
            for (param, arg) in declared.iter().zip(handle.type_arguments()) {
                let arg_scope = ctx.child();
                let node = self.resolve_node(arg.as_ref(), depth + 1, &arg_scope, state)?;
                self.propagate_open_params(&arg_scope, ctx)?;
                scope.bind(&param.name, node)?;
            }
        }

        let properties = self.resolve_properties(handle, depth, &scope, state)?;
        let index_signature = self.resolve_index_signature(handle, depth, &scope, state)?;
        self.propagate_open_params(&scope, ctx)?;

        Ok(TypeNode::Object {
            name: identity.as_ref().map(|id| id.name.clone()),
            properties,
            generic_params: if declared.is_empty() {
                None
            } else {
                Some(declared)
            },
            index_signature: index_signature.map(Box::new),
        })
    }
}

impl Default for TypeResolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

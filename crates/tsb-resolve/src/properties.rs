//! Property and index-signature resolution for object-like types.
//!
//! The property set of a declaration is assembled in two passes: the
//! directly/structurally visible members first, then heritage ("extends")
//! members. Directly declared members always win on a name conflict, and
//! among heritage members the first-seen one wins. A heritage member whose
//! visible property set is empty is a strong signal of an unresolved utility
//! operation over an open generic; those are offered to the utility expander
//! for a best-effort structural reconstruction.
//!
//! A member the host could not type at all is a hard failure for that member
//! only — it is dropped with a warning and its siblings continue.

use std::rc::Rc;

use indexmap::IndexMap;
use tsb_host::{IndexSignatureSite, PropertySite, TypeHandle};
use tsb_model::merge::collect_properties;
use tsb_model::{IndexKeyKind, IndexSignature, PropertyInfo, TypeNode};

use crate::context::GenericContext;
use crate::error::{ResolveError, ResolveResult};
use crate::hooks::apply_hooks;
use crate::resolve::{ResolveState, TypeResolver};
use crate::utility::is_unresolved_utility;

impl TypeResolver<'_> {
    /// Resolve the full property set of `handle`, heritage included.
    pub(crate) fn resolve_properties(
        &self,
        handle: &dyn TypeHandle,
        depth: u32,
        ctx: &Rc<GenericContext>,
        state: &mut ResolveState,
    ) -> ResolveResult<Vec<PropertyInfo>> {
        let owner = handle.identity().map(|i| i.name);
        let owner_ref = owner.as_deref();

        // Direct members: incremental collection, last write wins.
        let mut direct: IndexMap<String, PropertyInfo> = IndexMap::new();
        for site in handle.properties() {
            match self.resolve_property_site(site, owner_ref, depth, ctx, state) {
                Ok(Some(prop)) => collect_properties(&mut direct, [prop]),
                Ok(None) => {} // hook veto
                Err(err) => {
                    // Hard failure aborts only this member.
                    tracing::warn!(owner = ?owner_ref, error = %err, "skipping property");
                }
            }
        }

        // Heritage members never displace anything already present:
        // direct-over-inherited, first-seen-over-later.
        let mut merged = direct;
        for base in handle.heritage_types() {
            let base_props = self.heritage_properties(base.as_ref(), depth, ctx, state)?;
            for prop in base_props {
                if !merged.contains_key(&prop.name) {
                    merged.insert(prop.name.clone(), prop);
                }
            }
        }

        Ok(merged.into_values().collect())
    }

    /// The members contributed by one heritage clause.
    fn heritage_properties(
        &self,
        base: &dyn TypeHandle,
        depth: u32,
        ctx: &Rc<GenericContext>,
        state: &mut ResolveState,
    ) -> ResolveResult<Vec<PropertyInfo>> {
        let sites = base.properties();
        if !sites.is_empty() {
            let mut out = Vec::with_capacity(sites.len());
            for site in sites {
                match self.resolve_property_site(site, None, depth, ctx, state) {
                    Ok(Some(prop)) => out.push(prop),
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(base = %base.text(), error = %err, "skipping inherited property");
                    }
                }
            }
            return Ok(out);
        }

        // Empty visible set: most likely an uncollapsed utility operation
        // over an open generic. Reconstruct what we can; at minimum the
        // expander registers the open parameters it discovers.
        if is_unresolved_utility(base) {
            tracing::debug!(base = %base.text(), "reconstructing heritage via utility expander");
            let node = self.expand_utility(base, depth, ctx, state)?;
            if let TypeNode::Object { properties, .. } = node {
                let mut out = Vec::with_capacity(properties.len());
                for prop in properties {
                    if let Some(prop) = apply_hooks(self.hooks(), None, prop) {
                        out.push(prop);
                    }
                }
                return Ok(out);
            }
        }
        Ok(Vec::new())
    }

    /// Normalize one declaration-site member.
    ///
    /// Callable members short-circuit to a canonical rendered signature
    /// instead of recursing per parameter — cheaper, and stable for
    /// presentation. Everything else resolves its value type through the
    /// orchestrator in a child scope.
    fn resolve_property_site(
        &self,
        site: PropertySite,
        owner: Option<&str>,
        depth: u32,
        ctx: &Rc<GenericContext>,
        state: &mut ResolveState,
    ) -> ResolveResult<Option<PropertyInfo>> {
        let ty = if let Some(signature) = &site.callable {
            TypeNode::Function {
                signature: signature.render(),
            }
        } else {
            let handle = site.ty.as_ref().ok_or_else(|| ResolveError::UntypedProperty {
                name: site.name.clone(),
            })?;
            let scope = ctx.child();
            let node = self.resolve_node(handle.as_ref(), depth + 1, &scope, state)?;
            self.propagate_open_params(&scope, ctx)?;
            node
        };

        let prop = PropertyInfo {
            name: site.name,
            ty,
            optional: site.modifiers.contains(tsb_host::MemberModifiers::OPTIONAL),
            readonly: site.modifiers.contains(tsb_host::MemberModifiers::READONLY),
            doc: site.doc,
        };
        Ok(apply_hooks(self.hooks(), owner, prop))
    }

    /// Resolve at most one catch-all index signature, preferring a
    /// string-keyed one when the host exposes both.
    pub(crate) fn resolve_index_signature(
        &self,
        handle: &dyn TypeHandle,
        depth: u32,
        ctx: &Rc<GenericContext>,
        state: &mut ResolveState,
    ) -> ResolveResult<Option<IndexSignature>> {
        let sites = handle.index_signatures();
        let chosen: Option<&IndexSignatureSite> = sites
            .iter()
            .find(|s| s.key == IndexKeyKind::String)
            .or_else(|| sites.iter().find(|s| s.key == IndexKeyKind::Number))
            .or_else(|| sites.first());
        let Some(site) = chosen else {
            return Ok(None);
        };

        let scope = ctx.child();
        let value = self.resolve_node(site.value.as_ref(), depth + 1, &scope, state)?;
        self.propagate_open_params(&scope, ctx)?;
        Ok(Some(IndexSignature {
            key: site.key,
            value,
            readonly: site.readonly,
        }))
    }

    /// Copy open (registered, unbound) parameters discovered in a nested
    /// scope outward, so a residual generic deep in a property type keeps the
    /// whole builder generic. Bindings never propagate.
    pub(crate) fn propagate_open_params(
        &self,
        from: &GenericContext,
        to: &GenericContext,
    ) -> ResolveResult<()> {
        for param in from.unresolved_params() {
            if !to.is_registered(&param.name) {
                to.register_param(param)?;
            }
        }
        Ok(())
    }
}

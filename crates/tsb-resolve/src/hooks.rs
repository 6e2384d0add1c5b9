//! Extensibility hooks for property normalization.
//!
//! Every resolved property passes through the registered hooks before it is
//! kept. A hook may rewrite the property or veto it entirely. A failing hook
//! is a veto, never a fatal error: plugin misbehavior must not abort the
//! resolution of the surrounding type.

use thiserror::Error;
use tsb_model::PropertyInfo;

/// What the property resolver should do with a property after a hook ran.
#[derive(Debug, Clone, PartialEq)]
pub enum HookAction {
    /// Keep this (possibly rewritten) property.
    Keep(PropertyInfo),
    /// Drop the property from the resolved set.
    Veto,
}

/// A hook implementation failure. Treated as a veto by the caller.
#[derive(Debug, Clone, Error)]
#[error("property hook failed: {0}")]
pub struct HookError(pub String);

/// Context handed to a hook for one property.
pub struct PropertyHookContext<'a> {
    /// Name of the object-like type that owns the property, when known.
    pub owner: Option<&'a str>,
    pub property: &'a PropertyInfo,
}

/// A property-level transformation hook.
pub trait PropertyTransformHook {
    fn transform(&self, cx: PropertyHookContext<'_>) -> Result<HookAction, HookError>;
}

/// Run `property` through `hooks` in registration order.
///
/// Each hook sees the previous hook's output. The first veto (or failure,
/// logged at `warn`) drops the property.
pub fn apply_hooks(
    hooks: &[Box<dyn PropertyTransformHook>],
    owner: Option<&str>,
    mut property: PropertyInfo,
) -> Option<PropertyInfo> {
    for hook in hooks {
        let cx = PropertyHookContext {
            owner,
            property: &property,
        };
        match hook.transform(cx) {
            Ok(HookAction::Keep(next)) => property = next,
            Ok(HookAction::Veto) => return None,
            Err(err) => {
                tracing::warn!(
                    property = %property.name,
                    error = %err,
                    "property hook failed; treating as veto"
                );
                return None;
            }
        }
    }
    Some(property)
}

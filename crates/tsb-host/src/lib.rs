//! Host type-analysis interface for the tsb resolution engine.
//!
//! The engine never talks to a type checker directly. It consumes the
//! capability interface defined here: a [`TypeHandle`] is an opaque view of
//! one type in the host's semantic model, classified by an explicit
//! [`TypeTag`] and offering introspection capabilities (property enumeration,
//! union/intersection members, generic parameters and arguments, heritage
//! clauses, call signatures, template spans, and a raw textual rendering).
//! All engine dispatch switches on the tag — never on structural presence
//! checks — so each host backend needs exactly one adapter implementing this
//! trait.
//!
//! The [`fixture`] module provides the in-memory backend used by the engine's
//! tests: hand-built type shapes with the same observable surface a real
//! checker adapter would have.

pub mod fixture;
mod handle;
mod oracle;

pub use handle::{
    CallSignatureSite, EnumMemberSite, GenericParamSite, IndexSignatureSite, MemberModifiers,
    ParamSite, PropertySite, TemplateSpanSite, TypeHandle, TypeTag,
};
pub use oracle::AssignabilityOracle;

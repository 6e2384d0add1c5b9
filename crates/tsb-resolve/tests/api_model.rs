//! End-to-end resolution of a small API surface, the way a code generator
//! would drive the engine: resolve named declarations, serialize the models,
//! and derive builder defaults.

use serde_json::json;
use tsb_host::fixture::{call_signature, FixtureSpan, FixtureType};
use tsb_host::MemberModifiers;
use tsb_model::{LiteralValue, TypeNode};
use tsb_resolve::defaults::default_expression;
use tsb_resolve::{GenericContext, ResolutionCache, TypeResolver};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A `User` interface with a nested declaration, an enum member, an optional
/// member and a method, roughly:
///
/// ```ts
/// interface Address { street: string; city: string }
/// enum Role { Admin = "admin", Viewer = "viewer" }
/// interface User {
///   id: string;
///   role: Role;
///   address: Address;
///   nickname?: string;
///   greet(name: string): string;
/// }
/// ```
fn user_fixture() -> FixtureType {
    let address = FixtureType::object("Address")
        .at("models/address.ts")
        .with_property("street", FixtureType::string())
        .with_property("city", FixtureType::string());
    let role = FixtureType::enumeration(
        "Role",
        [
            ("Admin".to_string(), Some(LiteralValue::String("admin".into()))),
            ("Viewer".to_string(), Some(LiteralValue::String("viewer".into()))),
        ],
    )
    .at("models/role.ts");
    let greet = call_signature([("name", "string", false)], "string");

    FixtureType::object("User")
        .at("models/user.ts")
        .with_documented_property("id", FixtureType::string(), "Stable identifier.")
        .with_property("role", role)
        .with_property("address", address)
        .with_modified_property("nickname", FixtureType::string(), MemberModifiers::OPTIONAL)
        .with_callable_property("greet", FixtureType::callable(greet.clone()), greet)
}

#[test]
fn a_full_declaration_round_trips_through_json() {
    init_tracing();
    let cache = ResolutionCache::new();
    let resolver = TypeResolver::new().with_cache(&cache);
    let resolved = resolver.resolve(&user_fixture()).unwrap();

    assert_eq!(resolved.name, "User");
    assert_eq!(resolved.source_location, "models/user.ts");
    assert_eq!(resolved.imports, vec!["Role".to_string(), "Address".to_string()]);

    let value = serde_json::to_value(&resolved.type_model).unwrap();
    assert_eq!(value["kind"], json!("Object"));
    assert_eq!(value["name"], json!("User"));
    let props = value["properties"].as_array().unwrap();
    assert_eq!(props.len(), 5);
    assert_eq!(props[0]["name"], json!("id"));
    assert_eq!(props[0]["doc"], json!("Stable identifier."));
    assert_eq!(props[1]["ty"]["kind"], json!("Enum"));
    assert_eq!(props[3]["optional"], json!(true));
    assert_eq!(
        props[4]["ty"]["signature"],
        json!("(name: string) => string")
    );

    // And back.
    let back: TypeNode = serde_json::from_value(value).unwrap();
    assert_eq!(back, resolved.type_model);
}

#[test]
fn builder_defaults_cover_required_members_only() {
    init_tracing();
    let cache = ResolutionCache::new();
    let resolver = TypeResolver::new().with_cache(&cache);
    let resolved = resolver.resolve(&user_fixture()).unwrap();

    let expr = default_expression(&resolved.type_model).unwrap();
    // `nickname` is optional and `greet`/`role`/`address` contribute their
    // own nested defaults.
    assert!(expr.starts_with("{ id: \"\""));
    assert!(expr.contains("role: \"admin\""));
    assert!(expr.contains("address: { street: \"\", city: \"\" }"));
    assert!(!expr.contains("nickname"));
}

#[test]
fn a_generic_form_stays_generic_over_its_subject() {
    init_tracing();
    // interface Form<T> extends Omit<T, "internal"> { dirty: boolean }
    let form = FixtureType::object("Form")
        .at("forms.ts")
        .with_generic_param("T", None, None)
        .with_property("dirty", FixtureType::boolean())
        .extending(FixtureType::unresolved("Omit<T, \"internal\">"));

    let cache = ResolutionCache::new();
    let resolver = TypeResolver::new().with_cache(&cache);
    let ctx = GenericContext::root();
    let node = resolver.resolve_type(&form, 0, &ctx).unwrap();

    match node {
        TypeNode::Object {
            generic_params: Some(params),
            properties,
            ..
        } => {
            assert_eq!(params.len(), 1);
            assert_eq!(params[0].name, "T");
            assert_eq!(properties.len(), 1);
            assert_eq!(properties[0].name, "dirty");
        }
        other => panic!("expected a generic object, got {:?}", other),
    }
}

#[test]
fn template_driven_event_names_expand_deterministically() {
    init_tracing();
    // type EventName = `on${"Click" | "Focus"}`
    let event_name = FixtureType::template([
        FixtureSpan::Text("on".to_string()),
        FixtureSpan::Hole(FixtureType::union([
            FixtureType::string_literal("Click"),
            FixtureType::string_literal("Focus"),
        ])),
    ]);

    let cache = ResolutionCache::new();
    let resolver = TypeResolver::new().with_cache(&cache);
    let first = resolver
        .resolve_type(&event_name, 0, &GenericContext::root())
        .unwrap();
    let second = resolver
        .resolve_type(&event_name, 0, &GenericContext::root())
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.literal_string_set(),
        Some(vec!["onClick".to_string(), "onFocus".to_string()])
    );
}

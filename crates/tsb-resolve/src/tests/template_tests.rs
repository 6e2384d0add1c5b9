//! Template-literal expansion through the public resolution entry points.

use tsb_host::fixture::{FixtureSpan, FixtureType};
use tsb_model::TypeNode;

use crate::limits::ResolverOptions;
use crate::{GenericContext, ResolutionCache, ResolveError, TypeResolver};

fn text(s: &str) -> FixtureSpan {
    FixtureSpan::Text(s.to_string())
}

fn hole(ty: FixtureType) -> FixtureSpan {
    FixtureSpan::Hole(ty)
}

fn literals(node: &TypeNode) -> Vec<String> {
    node.literal_string_set().expect("expected literal members")
}

fn resolve_template(handle: &FixtureType) -> Result<TypeNode, ResolveError> {
    let cache = ResolutionCache::new();
    TypeResolver::new()
        .with_cache(&cache)
        .resolve_type(handle, 0, &GenericContext::root())
}

#[test]
fn text_only_templates_collapse_to_a_single_literal() {
    let tpl = FixtureType::template([text("app-"), text("config")]);
    assert_eq!(
        resolve_template(&tpl).unwrap(),
        TypeNode::string_literal("app-config")
    );
}

#[test]
fn enumerable_placeholders_expand_to_a_union() {
    let tpl = FixtureType::template([
        text("user-"),
        hole(FixtureType::union([
            FixtureType::string_literal("a"),
            FixtureType::string_literal("b"),
        ])),
    ]);
    assert_eq!(
        literals(&resolve_template(&tpl).unwrap()),
        vec!["user-a".to_string(), "user-b".to_string()]
    );
}

#[test]
fn interleaved_placeholders_take_the_cartesian_product() {
    let tpl = FixtureType::template([
        hole(FixtureType::union([
            FixtureType::string_literal("get"),
            FixtureType::string_literal("set"),
        ])),
        text("-"),
        hole(FixtureType::union([
            FixtureType::string_literal("x"),
            FixtureType::string_literal("y"),
        ])),
    ]);
    assert_eq!(
        literals(&resolve_template(&tpl).unwrap()),
        vec!["get-x", "get-y", "set-x", "set-y"]
    );
}

#[test]
fn numeric_placeholders_render_like_javascript() {
    let tpl = FixtureType::template([text("v"), hole(FixtureType::number_literal(2.0))]);
    assert_eq!(
        resolve_template(&tpl).unwrap(),
        TypeNode::string_literal("v2")
    );
}

#[test]
fn an_open_placeholder_degrades_to_the_original_text() {
    let tpl = FixtureType::template([text("user-"), hole(FixtureType::string())]);
    assert_eq!(
        resolve_template(&tpl).unwrap(),
        TypeNode::generic("`user-${string}`")
    );

    let tpl = FixtureType::template([text("user-"), hole(FixtureType::type_param("K"))]);
    assert_eq!(
        resolve_template(&tpl).unwrap(),
        TypeNode::generic("`user-${K}`")
    );
}

#[test]
fn a_degraded_template_still_registers_its_open_parameter() {
    let tpl = FixtureType::template([text("user-"), hole(FixtureType::type_param("K"))]);

    let cache = ResolutionCache::new();
    let resolver = TypeResolver::new().with_cache(&cache);
    let ctx = GenericContext::root();
    let node = resolver.resolve_type(&tpl, 0, &ctx).unwrap();

    assert_eq!(node, TypeNode::generic("`user-${K}`"));
    // The parameter found inside the placeholder survives the degradation,
    // so a builder over this type stays generic over `K`.
    assert!(ctx.is_registered("K"));
    assert!(ctx.unresolved_params().iter().any(|p| p.name == "K"));
}

#[test]
fn the_combination_limit_is_a_hard_error() {
    let abc = || {
        FixtureType::union([
            FixtureType::string_literal("a"),
            FixtureType::string_literal("b"),
            FixtureType::string_literal("c"),
        ])
    };
    let tpl = FixtureType::template([hole(abc()), text("-"), hole(abc())]);

    let cache = ResolutionCache::new();
    let resolver = TypeResolver::new()
        .with_cache(&cache)
        .with_options(ResolverOptions {
            max_template_combinations: 4,
            ..ResolverOptions::default()
        });
    let err = resolver
        .resolve_type(&tpl, 0, &GenericContext::root())
        .unwrap_err();
    match err {
        ResolveError::TemplateCombinationLimit {
            combinations,
            limit,
            ..
        } => {
            assert_eq!(combinations, 9);
            assert_eq!(limit, 4);
        }
        other => panic!("expected the combination limit error, got {:?}", other),
    }
}

#[test]
fn the_limit_is_checked_before_any_expansion() {
    // Within the limit: expands fully.
    let ab = || {
        FixtureType::union([
            FixtureType::string_literal("a"),
            FixtureType::string_literal("b"),
        ])
    };
    let tpl = FixtureType::template([hole(ab()), hole(ab())]);

    let cache = ResolutionCache::new();
    let resolver = TypeResolver::new()
        .with_cache(&cache)
        .with_options(ResolverOptions {
            max_template_combinations: 4,
            ..ResolverOptions::default()
        });
    let node = resolver
        .resolve_type(&tpl, 0, &GenericContext::root())
        .unwrap();
    assert_eq!(literals(&node), vec!["aa", "ab", "ba", "bb"]);
}

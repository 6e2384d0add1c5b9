//! Property-set merge utilities.
//!
//! Two merge policies coexist here and they are **not** interchangeable:
//!
//! - [`collect_properties`] is last-write-wins: it models incremental
//!   collection into one object, where a later declaration of `x` replaces an
//!   earlier one.
//! - [`flatten_intersection`] is first-occurrence-wins: when `A & B` both
//!   declare `x`, the left-most member's `x` shadows the later one.
//!
//! The asymmetry mirrors the behavior the generator depends on; see
//! `merge_defaults` in the resolver crate for the third policy (last-wins
//! default composition). Do not unify these without auditing every caller.

use indexmap::IndexMap;

use crate::node::{PropertyInfo, TypeNode};

/// Fold `incoming` into `map`, replacing same-named entries (last write wins)
/// while preserving first-insertion order.
pub fn collect_properties(
    map: &mut IndexMap<String, PropertyInfo>,
    incoming: impl IntoIterator<Item = PropertyInfo>,
) {
    for prop in incoming {
        map.insert(prop.name.clone(), prop);
    }
}

/// Flatten the property sets of intersection members into one list.
///
/// Nested intersections are flattened recursively; non-object members
/// contribute nothing. On a duplicate name the **first** occurrence wins:
/// `{x: string} & {x: number, y: string}` flattens to `{x: string, y: string}`.
pub fn flatten_intersection(members: &[TypeNode]) -> Vec<PropertyInfo> {
    let mut map: IndexMap<String, PropertyInfo> = IndexMap::new();
    flatten_into(&mut map, members);
    map.into_values().collect()
}

fn flatten_into(map: &mut IndexMap<String, PropertyInfo>, members: &[TypeNode]) {
    for member in members {
        match member {
            TypeNode::Object { properties, .. } => {
                for prop in properties {
                    if !map.contains_key(&prop.name) {
                        map.insert(prop.name.clone(), prop.clone());
                    }
                }
            }
            TypeNode::Intersection { members: inner } => flatten_into(map, inner),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(props: Vec<PropertyInfo>) -> TypeNode {
        TypeNode::Object {
            name: None,
            properties: props,
            generic_params: None,
            index_signature: None,
        }
    }

    #[test]
    fn collection_is_last_write_wins() {
        let mut map = IndexMap::new();
        collect_properties(
            &mut map,
            vec![
                PropertyInfo::new("x", TypeNode::primitive("string")),
                PropertyInfo::new("x", TypeNode::primitive("number")),
            ],
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map["x"].ty, TypeNode::primitive("number"));
    }

    #[test]
    fn intersection_flattening_is_first_occurrence_wins() {
        let a = obj(vec![PropertyInfo::new("x", TypeNode::primitive("string"))]);
        let b = obj(vec![
            PropertyInfo::new("x", TypeNode::primitive("number")),
            PropertyInfo::new("y", TypeNode::primitive("string")),
        ]);
        let flat = flatten_intersection(&[a, b]);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].name, "x");
        assert_eq!(flat[0].ty, TypeNode::primitive("string"));
        assert_eq!(flat[1].name, "y");
    }

    #[test]
    fn nested_intersections_flatten_recursively() {
        let inner = TypeNode::Intersection {
            members: vec![obj(vec![PropertyInfo::new(
                "z",
                TypeNode::primitive("boolean"),
            )])],
        };
        let flat = flatten_intersection(&[
            obj(vec![PropertyInfo::new("x", TypeNode::primitive("string"))]),
            inner,
        ]);
        assert_eq!(flat.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), [
            "x", "z"
        ]);
    }
}

//! Property tests for the schema merge algebra
//!
//! Merge must converge to the same schema for any observation order; these
//! tests pin commutativity, associativity, and fold order-independence over
//! arbitrary JSON payload shapes.

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use docplane::{infer, merge, Schema};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e6f64..1.0e6f64).prop_map(|n| json!(n)),
        "[a-z]{0,8}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|entries| Value::Object(Map::from_iter(entries))),
        ]
    })
}

fn fold_schemas(values: &[Value]) -> Option<Schema> {
    values.iter().map(infer).reduce(merge)
}

proptest! {
    #[test]
    fn merge_is_commutative(a in arb_json(), b in arb_json()) {
        prop_assert_eq!(merge(infer(&a), infer(&b)), merge(infer(&b), infer(&a)));
    }

    #[test]
    fn merge_is_associative(a in arb_json(), b in arb_json(), c in arb_json()) {
        let left = merge(merge(infer(&a), infer(&b)), infer(&c));
        let right = merge(infer(&a), merge(infer(&b), infer(&c)));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn merge_is_idempotent(a in arb_json()) {
        let schema = infer(&a);
        prop_assert_eq!(merge(schema.clone(), schema.clone()), schema);
    }

    #[test]
    fn fold_is_order_independent(values in prop::collection::vec(arb_json(), 1..6)) {
        let forward = fold_schemas(&values);

        let mut reversed = values.clone();
        reversed.reverse();
        prop_assert_eq!(fold_schemas(&reversed), forward.clone());

        let mut rotated = values.clone();
        rotated.rotate_left(values.len() / 2);
        prop_assert_eq!(fold_schemas(&rotated), forward);
    }

    #[test]
    fn merged_schema_round_trips_through_json(a in arb_json(), b in arb_json()) {
        let schema = merge(infer(&a), infer(&b));
        let reparsed = Schema::from_value(&schema.to_value()).unwrap();
        prop_assert_eq!(reparsed, schema);
    }
}

#[test]
fn required_fields_narrow_across_observations() {
    let observations =
        [json!({"id": 1, "name": "a"}), json!({"id": 2}), json!({"id": 3, "name": "b"})];

    let schema = fold_schemas(&observations).unwrap();
    match schema {
        Schema::Object { properties, required } => {
            assert_eq!(properties.len(), 2);
            assert!(required.contains("id"));
            assert!(!required.contains("name"));
        }
        other => panic!("expected object schema, got {:?}", other),
    }
}

#[test]
fn union_growth_is_bounded_by_distinct_shapes() {
    // Re-observing the same alternating shapes must not widen the union.
    let observations: Vec<Value> =
        (0..10).map(|i| if i % 2 == 0 { json!(1) } else { json!("x") }).collect();

    let schema = fold_schemas(&observations).unwrap();
    match schema {
        Schema::Union { variants } => assert_eq!(variants.len(), 2),
        other => panic!("expected union, got {:?}", other),
    }
}

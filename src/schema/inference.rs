//! Schema inference engine for JSON payloads
//!
//! This module processes JSON payloads and infers their schema structure,
//! then merges schemas inferred from repeated observations of the same
//! endpoint into one unified description. Inference and merge are total
//! functions: any payload is representable, and irreconcilable observations
//! degrade to a `oneOf` union instead of failing.

use std::collections::{BTreeMap, BTreeSet};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::errors::{Error, Result};

/// Scalar type of a JSON leaf value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarKind {
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl ScalarKind {
    /// JSON Schema type name for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Number => "number",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Null => "null",
        }
    }

    fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ScalarKind::String),
            "integer" => Some(ScalarKind::Integer),
            "number" => Some(ScalarKind::Number),
            "boolean" => Some(ScalarKind::Boolean),
            "null" => Some(ScalarKind::Null),
            _ => None,
        }
    }
}

/// Inferred schema for a JSON value
///
/// `Union` is produced only when merge cannot reconcile two shapes. A union
/// is kept canonical: it never nests another union, it holds at most one
/// array and at most one object variant (same-kind composites merge
/// structurally instead of accumulating), and a one-variant union collapses
/// to that variant. Canonical form is what makes merge order-independent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Schema {
    Scalar(ScalarKind),
    Array {
        items: Box<Schema>,
    },
    Object {
        properties: BTreeMap<String, Schema>,
        required: BTreeSet<String>,
    },
    Union {
        variants: BTreeSet<Schema>,
    },
}

/// Infer a schema from a single observed JSON value
///
/// Pure function of one value; no payload data is retained in the result
/// beyond field names. Numeric strings stay strings; the kind follows the
/// value's runtime representation, never its content.
pub fn infer(value: &Value) -> Schema {
    match value {
        Value::Null => Schema::Scalar(ScalarKind::Null),

        Value::Bool(_) => Schema::Scalar(ScalarKind::Boolean),

        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Schema::Scalar(ScalarKind::Integer)
            } else {
                Schema::Scalar(ScalarKind::Number)
            }
        }

        Value::String(_) => Schema::Scalar(ScalarKind::String),

        Value::Array(items) => {
            // Empty arrays carry no item information yet; the null placeholder
            // widens to a nullable item type once real elements show up.
            let items = items
                .iter()
                .map(infer)
                .reduce(merge)
                .unwrap_or(Schema::Scalar(ScalarKind::Null));

            Schema::Array { items: Box::new(items) }
        }

        Value::Object(map) => {
            let properties: BTreeMap<String, Schema> =
                map.iter().map(|(key, val)| (key.clone(), infer(val))).collect();

            // Every key of a single observation starts out required; merge
            // narrows this to the intersection across observations.
            let required = properties.keys().cloned().collect();

            Schema::Object { properties, required }
        }
    }
}

/// Merge two schemas describing the same field across observations
///
/// Commutative and associative: folding any sequence of observations
/// converges to the same schema regardless of order. Never fails; the worst
/// case is a wider union, a loss of precision rather than an error.
pub fn merge(a: Schema, b: Schema) -> Schema {
    match (a, b) {
        (a, b) if a == b => a,

        (Schema::Array { items: items_a }, Schema::Array { items: items_b }) => {
            Schema::Array { items: Box::new(merge(*items_a, *items_b)) }
        }

        (
            Schema::Object { properties: props_a, required: required_a },
            Schema::Object { properties: props_b, required: required_b },
        ) => {
            let mut properties = props_a;
            for (key, schema_b) in props_b {
                let merged = match properties.remove(&key) {
                    Some(schema_a) => merge(schema_a, schema_b),
                    None => schema_b,
                };
                properties.insert(key, merged);
            }

            // A key required in one observation but absent in another is, by
            // observation, actually optional.
            let required = required_a.intersection(&required_b).cloned().collect();

            Schema::Object { properties, required }
        }

        (Schema::Union { variants }, other) | (other, Schema::Union { variants }) => {
            let mut variants = variants;
            absorb(&mut variants, other);
            collapse(variants)
        }

        // Scalar kind mismatch, or array/object cross: no structural
        // unification is attempted, the shapes coexist as union variants.
        (a, b) => {
            let mut variants = BTreeSet::new();
            absorb(&mut variants, a);
            absorb(&mut variants, b);
            collapse(variants)
        }
    }
}

/// Insert a schema into a union's variant set, keeping the set canonical
fn absorb(variants: &mut BTreeSet<Schema>, schema: Schema) {
    match schema {
        Schema::Union { variants: inner } => {
            for variant in inner {
                absorb(variants, variant);
            }
        }
        Schema::Array { .. } => absorb_composite(variants, schema, |v| {
            matches!(v, Schema::Array { .. })
        }),
        Schema::Object { .. } => absorb_composite(variants, schema, |v| {
            matches!(v, Schema::Object { .. })
        }),
        scalar => {
            variants.insert(scalar);
        }
    }
}

/// Merge an incoming array/object into the union's existing variant of the
/// same kind, if any. Keeping one variant per composite kind is what makes
/// the union algebra associative.
fn absorb_composite(
    variants: &mut BTreeSet<Schema>,
    schema: Schema,
    same_kind: impl Fn(&Schema) -> bool,
) {
    match variants.iter().find(|v| same_kind(v)).cloned() {
        Some(existing) => {
            variants.remove(&existing);
            variants.insert(merge(existing, schema));
        }
        None => {
            variants.insert(schema);
        }
    }
}

/// A one-variant union is just that variant
fn collapse(variants: BTreeSet<Schema>) -> Schema {
    if variants.len() == 1 {
        variants.into_iter().next().unwrap()
    } else {
        Schema::Union { variants }
    }
}

impl Schema {
    /// Render this schema as an OpenAPI-style JSON node
    /// (`{"type": ...}` / `{"oneOf": [...]}`)
    pub fn to_value(&self) -> Value {
        match self {
            Schema::Scalar(kind) => json!({ "type": kind.as_str() }),

            Schema::Array { items } => json!({
                "type": "array",
                "items": items.to_value(),
            }),

            Schema::Object { properties, required } => {
                let props: Map<String, Value> =
                    properties.iter().map(|(key, schema)| (key.clone(), schema.to_value())).collect();

                let mut node = Map::new();
                node.insert("type".to_string(), Value::String("object".to_string()));
                node.insert("properties".to_string(), Value::Object(props));
                if !required.is_empty() {
                    let names: Vec<Value> =
                        required.iter().map(|name| Value::String(name.clone())).collect();
                    node.insert("required".to_string(), Value::Array(names));
                }

                Value::Object(node)
            }

            Schema::Union { variants } => {
                let nodes: Vec<Value> = variants.iter().map(Schema::to_value).collect();
                json!({ "oneOf": nodes })
            }
        }
    }

    /// Parse a schema back from its OpenAPI-style JSON node
    pub fn from_value(value: &Value) -> Result<Schema> {
        let node = value
            .as_object()
            .ok_or_else(|| Error::validation(format!("Schema node is not an object: {}", value)))?;

        if let Some(one_of) = node.get("oneOf") {
            let nodes = one_of.as_array().ok_or_else(|| {
                Error::validation(format!("Schema 'oneOf' is not an array: {}", one_of))
            })?;

            let mut variants = BTreeSet::new();
            for variant_node in nodes {
                absorb(&mut variants, Schema::from_value(variant_node)?);
            }
            if variants.is_empty() {
                return Err(Error::validation("Schema 'oneOf' has no variants".to_string()));
            }
            return Ok(collapse(variants));
        }

        let type_name = node
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::validation(format!("Schema node has no 'type': {}", value)))?;

        match type_name {
            "array" => {
                let items = match node.get("items") {
                    Some(items_node) => Schema::from_value(items_node)?,
                    None => Schema::Scalar(ScalarKind::Null),
                };
                Ok(Schema::Array { items: Box::new(items) })
            }
            "object" => {
                let mut properties = BTreeMap::new();
                if let Some(props) = node.get("properties").and_then(Value::as_object) {
                    for (key, prop_node) in props {
                        properties.insert(key.clone(), Schema::from_value(prop_node)?);
                    }
                }

                let required: BTreeSet<String> = node
                    .get("required")
                    .and_then(Value::as_array)
                    .map(|names| {
                        names
                            .iter()
                            .filter_map(Value::as_str)
                            // required is always a subset of properties
                            .filter(|name| properties.contains_key(*name))
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();

                Ok(Schema::Object { properties, required })
            }
            scalar => ScalarKind::from_type_name(scalar)
                .map(Schema::Scalar)
                .ok_or_else(|| Error::validation(format!("Unknown schema type '{}'", scalar))),
        }
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Schema::from_value(&value).map_err(D::Error::custom)
    }
}

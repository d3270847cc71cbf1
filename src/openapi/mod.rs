//! OpenAPI-style document model
//!
//! The accumulated specification document: paths keyed by template, one
//! operation per HTTP method, responses keyed by status code. The model
//! round-trips through serde as plain JSON in the OpenAPI object-model shape
//! (`paths` / operations / `parameters` / `responses` / `securityDefinitions`),
//! which is exactly what the storage drivers persist and the viewer serves.

use std::collections::BTreeMap;

use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{merge, Schema};

pub mod parameters;
pub mod security;

pub use parameters::{extract_parameters, method_has_body, ExtractedParameters};
pub use security::{resolve_security, ResolvedSecurity, SecurityDefinition, SecurityMode, SecurityRequirement};

/// Where a parameter lives in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Body => "body",
        };
        write!(f, "{}", name)
    }
}

/// One request parameter of an operation
///
/// Identity within an operation is the `(location, name)` pair; two
/// parameters may share a name as long as their locations differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Schema,
}

/// Accumulated knowledge about one response status of an operation
///
/// `schema` is present only for structured (JSON-like) content types; for
/// binary or plain-text responses only raw examples are kept. `example_count`
/// counts every observation of this status node, while `examples` retains at
/// most the configured cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSpec {
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,
    #[serde(default)]
    pub example_count: u64,
}

impl ResponseSpec {
    /// Create an empty response node for a freshly observed status
    pub fn new<S: Into<String>>(content_type: S) -> Self {
        Self { content_type: content_type.into(), schema: None, examples: Vec::new(), example_count: 0 }
    }

    /// Merge a newly inferred schema into this response
    pub fn merge_schema(&mut self, schema: Schema) {
        self.schema = Some(match self.schema.take() {
            Some(existing) => merge(existing, schema),
            None => schema,
        });
    }
}

/// One HTTP method on one path template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Schema>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<u16, ResponseSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
}

impl Operation {
    /// Add a parameter, or fold its schema into the already-known parameter
    /// with the same `(location, name)` identity
    pub fn upsert_parameter(&mut self, parameter: Parameter) {
        match self
            .parameters
            .iter_mut()
            .find(|p| p.location == parameter.location && p.name == parameter.name)
        {
            Some(existing) => {
                existing.schema = merge(existing.schema.clone(), parameter.schema);
            }
            None => self.parameters.push(parameter),
        }
    }

    /// Merge a request-body schema observed for this operation
    pub fn merge_request_body(&mut self, schema: Schema) {
        self.request_body = Some(match self.request_body.take() {
            Some(existing) => merge(existing, schema),
            None => schema,
        });
    }

    /// Response node for a status code, created lazily on first observation
    pub fn response_mut<S: Into<String>>(&mut self, status: u16, content_type: S) -> &mut ResponseSpec {
        self.responses.entry(status).or_insert_with(|| ResponseSpec::new(content_type))
    }

    /// Attach a security requirement unless it is already present
    pub fn attach_security(&mut self, requirement: &SecurityRequirement) {
        if !self.security.contains(requirement) {
            self.security.push(requirement.clone());
        }
    }
}

/// All operations observed on one path template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathItem {
    pub operations: BTreeMap<String, Operation>,
}

impl PathItem {
    /// Operation node for a method, created lazily on first observation
    pub fn operation_mut(&mut self, method: &Method) -> &mut Operation {
        self.operations.entry(method.as_str().to_lowercase()).or_default()
    }
}

/// Metadata block of the published document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub title: String,
    pub description: String,
    pub version: String,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            title: "API Documentation".to_string(),
            description: "Automatically generated API documentation".to_string(),
            version: "0.0.0".to_string(),
        }
    }
}

/// The full accumulated / compiled API specification
///
/// Paths are keyed by template (e.g. `/users/{id}`), never by concrete
/// values; normalization is the caller's responsibility. Nodes are created
/// lazily on first observation and only ever mutated afterwards; the engine
/// never deletes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<DocumentInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub paths: BTreeMap<String, PathItem>,
    #[serde(
        default,
        rename = "securityDefinitions",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub security_definitions: BTreeMap<String, SecurityDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, Schema>,
}

impl Document {
    /// Operation node for a path template and method, created lazily
    pub fn operation_mut(&mut self, path_template: &str, method: &Method) -> &mut Operation {
        self.paths.entry(path_template.to_string()).or_default().operation_mut(method)
    }

    /// Register a named security definition unless already present
    pub fn attach_security_definition(&mut self, name: &str, definition: &SecurityDefinition) {
        self.security_definitions
            .entry(name.to_string())
            .or_insert_with(|| definition.clone());
    }
}

/// The mutable working copy of [`Document`] held by the storage driver
/// between exchanges. Same shape, distinguished only by lifecycle.
pub type AccumulatedDocument = Document;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{infer, ScalarKind};
    use serde_json::json;

    #[test]
    fn test_operation_nodes_created_lazily() {
        let mut doc = Document::default();
        doc.operation_mut("/users/{id}", &Method::GET);
        doc.operation_mut("/users/{id}", &Method::DELETE);

        let item = &doc.paths["/users/{id}"];
        assert_eq!(item.operations.len(), 2);
        assert!(item.operations.contains_key("get"));
        assert!(item.operations.contains_key("delete"));
    }

    #[test]
    fn test_upsert_parameter_merges_on_identity() {
        let mut op = Operation::default();
        op.upsert_parameter(Parameter {
            name: "id".to_string(),
            location: ParameterLocation::Path,
            required: true,
            schema: infer(&json!(1)),
        });
        op.upsert_parameter(Parameter {
            name: "id".to_string(),
            location: ParameterLocation::Path,
            required: true,
            schema: infer(&json!("abc")),
        });

        assert_eq!(op.parameters.len(), 1);
        assert!(matches!(op.parameters[0].schema, Schema::Union { .. }));
    }

    #[test]
    fn test_upsert_parameter_keeps_cross_location_pair() {
        let mut op = Operation::default();
        op.upsert_parameter(Parameter {
            name: "id".to_string(),
            location: ParameterLocation::Path,
            required: true,
            schema: Schema::Scalar(ScalarKind::Integer),
        });
        op.upsert_parameter(Parameter {
            name: "id".to_string(),
            location: ParameterLocation::Query,
            required: false,
            schema: Schema::Scalar(ScalarKind::Integer),
        });

        assert_eq!(op.parameters.len(), 2);
    }

    #[test]
    fn test_attach_security_is_idempotent() {
        let mut op = Operation::default();
        let requirement = SecurityRequirement::new("bearerAuth");
        op.attach_security(&requirement);
        op.attach_security(&requirement);
        assert_eq!(op.security.len(), 1);
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let mut doc = Document::default();
        let op = doc.operation_mut("/users/{id}", &Method::GET);
        op.upsert_parameter(Parameter {
            name: "id".to_string(),
            location: ParameterLocation::Path,
            required: true,
            schema: Schema::Scalar(ScalarKind::Integer),
        });
        let response = op.response_mut(200, "application/json");
        response.merge_schema(infer(&json!({"id": 1, "name": "a"})));
        response.examples.push(json!({"id": 1, "name": "a"}));
        response.example_count = 1;

        let serialized = serde_json::to_value(&doc).unwrap();
        assert_eq!(serialized["paths"]["/users/{id}"]["get"]["parameters"][0]["in"], "path");
        assert!(serialized["paths"]["/users/{id}"]["get"]["responses"]["200"].is_object());

        let reparsed: Document = serde_json::from_value(serialized).unwrap();
        assert_eq!(doc, reparsed);
    }

    #[test]
    fn test_empty_document_serializes_bare() {
        let value = serde_json::to_value(Document::default()).unwrap();
        assert_eq!(value, json!({}));
    }
}

//! Parameter extraction and validation for observed exchanges
//!
//! Derives the path/query parameter list of one exchange from the normalized
//! path template and the resolved values the middleware hands over, and
//! rejects exchanges carrying duplicate parameters. Request bodies are never
//! flattened into parameters; for methods with a semantic body the whole body
//! is inferred into the operation's request-body schema instead.

use std::collections::BTreeSet;

use http::Method;
use serde_json::Value;

use crate::errors::{Error, Result};
use crate::openapi::{Parameter, ParameterLocation};
use crate::schema::{infer, ScalarKind, Schema};

/// Everything the extractor derives from one exchange's request side
#[derive(Debug, Clone)]
pub struct ExtractedParameters {
    /// Ordered parameter list: path placeholders first, then query pairs
    pub parameters: Vec<Parameter>,
    /// Request-body schema for methods with a semantic body
    pub request_schema: Option<Schema>,
}

/// Whether a method carries a semantic request body
pub fn method_has_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD)
}

/// Extract the parameters of one observed exchange
///
/// Path placeholders become required `path` parameters typed from their
/// resolved values; query pairs become optional `query` parameters. Query
/// values arrive as an ordered pair list so repeated keys stay observable.
/// Fails closed with [`Error::DuplicatedParameter`] when two entries share
/// the same `(location, name)` identity; a path and a query parameter may
/// share a name.
pub fn extract_parameters(
    path_template: &str,
    method: &Method,
    path_values: &[(String, Value)],
    query_values: &[(String, Value)],
    request_body: Option<&Value>,
) -> Result<ExtractedParameters> {
    let mut parameters = Vec::new();

    for name in template_placeholders(path_template) {
        let schema = path_values
            .iter()
            .find(|(value_name, _)| *value_name == name)
            .map(|(_, value)| infer(value))
            // Path segments are textual; a placeholder the caller resolved no
            // value for still documents as a string.
            .unwrap_or(Schema::Scalar(ScalarKind::String));

        parameters.push(Parameter {
            name,
            location: ParameterLocation::Path,
            required: true,
            schema,
        });
    }

    for (name, value) in query_values {
        parameters.push(Parameter {
            name: name.clone(),
            location: ParameterLocation::Query,
            required: false,
            schema: infer(value),
        });
    }

    validate_uniqueness(&parameters)?;

    let request_schema = if method_has_body(method) { request_body.map(infer) } else { None };

    Ok(ExtractedParameters { parameters, request_schema })
}

/// Placeholder names of a path template, in order of appearance
fn template_placeholders(template: &str) -> Vec<String> {
    template
        .split('/')
        .filter_map(|segment| segment.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')))
        .map(str::to_string)
        .collect()
}

fn validate_uniqueness(parameters: &[Parameter]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for parameter in parameters {
        if !seen.insert((parameter.location, parameter.name.as_str())) {
            return Err(Error::duplicated_parameter(parameter.location, &parameter.name));
        }
    }
    Ok(())
}

//! Document accumulation service
//!
//! Orchestrates the engine once per observed exchange: load the accumulated
//! document through the storage driver, extract and validate parameters,
//! attach the resolved security scheme, infer and merge payload schemas into
//! the matching path/method/status node, enforce the example-retention cap,
//! and store the updated document back.
//!
//! The load→mutate→store cycle is an explicit unit, not a transaction:
//! concurrent callers racing on the same document can lose updates (last
//! store wins), which is accepted: documentation accumulation is a
//! best-effort side channel, not a system of record. Every failure mode is
//! detected before the store step, so a rejected exchange never corrupts a
//! previously stored document.

use std::sync::Arc;

use http::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::DocumentationSettings;
use crate::errors::Result;
use crate::openapi::{
    extract_parameters, resolve_security, AccumulatedDocument, DocumentInfo, ResolvedSecurity,
    ResponseSpec,
};
use crate::schema::infer;
use crate::storage::{driver_from_settings, DocumentationDriver};

/// One observed HTTP request/response pair, as handed over by the hosting
/// framework's middleware hook
///
/// The path template arrives pre-normalized (`/users/{id}`, never
/// `/users/42`); query values are an ordered pair list so repeated keys stay
/// observable; bodies are the raw payloads as received on the wire.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub path_template: String,
    pub method: Method,
    pub path_values: Vec<(String, Value)>,
    pub query_values: Vec<(String, Value)>,
    pub request_body: Option<Value>,
    pub status: StatusCode,
    pub content_type: String,
    pub response_body: Option<String>,
}

/// The documentation accumulation engine
///
/// Constructed once per service lifetime. All configuration checks (config
/// version, driver identifier, security mode) run eagerly here. A failed
/// construction yields no instance, so an engine in a bad configuration
/// state cannot be used at all.
pub struct DocumentAccumulator {
    driver: Arc<dyn DocumentationDriver>,
    security: ResolvedSecurity,
    example_limit: u64,
    noise_fields: Vec<String>,
    info: DocumentInfo,
}

impl DocumentAccumulator {
    /// Create an accumulator using the driver named in the settings
    pub fn from_settings(settings: &DocumentationSettings) -> Result<Self> {
        settings.validate()?;
        let driver = driver_from_settings(settings)?;
        Self::new(settings, driver)
    }

    /// Create an accumulator with an explicitly provided driver
    pub fn new(
        settings: &DocumentationSettings,
        driver: Arc<dyn DocumentationDriver>,
    ) -> Result<Self> {
        settings.validate()?;
        let security = resolve_security(settings.security);

        info!(
            security = %settings.security,
            driver = %settings.driver,
            example_limit = settings.response_example_limit_count,
            "Constructed documentation accumulator"
        );

        Ok(Self {
            driver,
            security,
            example_limit: settings.response_example_limit_count,
            noise_fields: settings.error_noise_fields.clone(),
            info: settings.info.clone(),
        })
    }

    /// Record one observed exchange into the accumulated document
    ///
    /// On a duplicate parameter the exchange is rejected as a whole and the
    /// stored document is left exactly as before the call; driver I/O errors
    /// propagate unmodified. The API call being documented is unaffected
    /// either way; the caller decides whether to log or ignore.
    #[instrument(
        skip(self, exchange),
        fields(
            method = %exchange.method,
            path = %exchange.path_template,
            status = %exchange.status,
        )
    )]
    pub async fn add_data(&self, exchange: &Exchange) -> Result<()> {
        let mut document = self.driver.load().await?;

        let extracted = extract_parameters(
            &exchange.path_template,
            &exchange.method,
            &exchange.path_values,
            &exchange.query_values,
            exchange.request_body.as_ref(),
        )?;

        if let Some((name, definition)) = &self.security.definition {
            document.attach_security_definition(name, definition);
        }

        let operation = document.operation_mut(&exchange.path_template, &exchange.method);

        for parameter in extracted.parameters {
            operation.upsert_parameter(parameter);
        }

        if let Some(schema) = extracted.request_schema {
            operation.merge_request_body(schema);
        }

        if let Some(requirement) = &self.security.requirement {
            operation.attach_security(requirement);
        }

        let response = operation.response_mut(exchange.status.as_u16(), &exchange.content_type);

        if is_structured_content_type(&exchange.content_type) {
            match parse_structured_body(exchange.response_body.as_deref()) {
                Some(mut body) => {
                    if exchange.status.is_client_error() || exchange.status.is_server_error() {
                        elide_noise_fields(&mut body, &self.noise_fields);
                    }

                    // The cap bounds stored examples, not structural
                    // fidelity: the schema merge runs for every observation.
                    if response.example_count < self.example_limit {
                        response.examples.push(body.clone());
                    }
                    response.merge_schema(infer(&body));
                }
                None => {
                    // Declared JSON but unparseable: degrade to example-only
                    // retention, the same treatment as unstructured payloads.
                    debug!("Response body is not valid JSON despite content type, keeping raw example");
                    retain_raw_example(response, exchange, self.example_limit);
                }
            }
        } else {
            retain_raw_example(response, exchange, self.example_limit);
        }

        response.example_count += 1;

        self.driver.store(&document).await?;

        debug!("Recorded exchange into accumulated documentation");

        Ok(())
    }

    /// Compile the accumulated document and publish it to the
    /// production-read location
    pub async fn publish(&self) -> Result<AccumulatedDocument> {
        let mut document = self.driver.load().await?;
        document.info = Some(self.info.clone());

        self.driver.publish(&document).await?;

        info!(paths = document.paths.len(), "Published documentation");

        Ok(document)
    }
}

/// Whether a content type carries a JSON-shaped payload worth inferring
fn is_structured_content_type(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|media_type| {
            (media_type.type_() == mime::APPLICATION && media_type.subtype() == mime::JSON)
                || media_type.suffix() == Some(mime::JSON)
        })
        .unwrap_or(false)
}

/// Parse a structured response body; an absent or empty body documents as
/// JSON `null`
fn parse_structured_body(raw: Option<&str>) -> Option<Value> {
    match raw {
        None => Some(Value::Null),
        Some(raw) if raw.trim().is_empty() => Some(Value::Null),
        Some(raw) => serde_json::from_str(raw).ok(),
    }
}

fn retain_raw_example(response: &mut ResponseSpec, exchange: &Exchange, limit: u64) {
    if response.example_count < limit {
        if let Some(raw) = &exchange.response_body {
            response.examples.push(Value::String(raw.clone()));
        }
    }
}

/// Strip configured framework-noise fields (tracebacks, file/line
/// references) from an error payload before inference, at any nesting depth
fn elide_noise_fields(value: &mut Value, noise_fields: &[String]) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !noise_fields.iter().any(|field| field == key));
            for child in map.values_mut() {
                elide_noise_fields(child, noise_fields);
            }
        }
        Value::Array(items) => {
            for item in items {
                elide_noise_fields(item, noise_fields);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_content_types() {
        assert!(is_structured_content_type("application/json"));
        assert!(is_structured_content_type("application/json; charset=utf-8"));
        assert!(is_structured_content_type("application/problem+json"));
        assert!(!is_structured_content_type("text/plain"));
        assert!(!is_structured_content_type("application/pdf"));
        assert!(!is_structured_content_type("not a mime type"));
    }

    #[test]
    fn test_empty_body_parses_as_null() {
        assert_eq!(parse_structured_body(None), Some(Value::Null));
        assert_eq!(parse_structured_body(Some("")), Some(Value::Null));
        assert_eq!(parse_structured_body(Some("  ")), Some(Value::Null));
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        assert_eq!(parse_structured_body(Some("{\"id\": 1")), None);
    }

    #[test]
    fn test_elide_noise_fields_recurses() {
        let mut body = json!({
            "message": "Forbidden",
            "exception": "AccessDeniedHttpException",
            "trace": [{"file": "Handler.php", "line": 42}],
            "context": {"file": "routes.php", "detail": "kept"}
        });

        let noise: Vec<String> =
            ["exception", "trace", "file", "line"].map(String::from).to_vec();
        elide_noise_fields(&mut body, &noise);

        assert_eq!(
            body,
            json!({
                "message": "Forbidden",
                "context": {"detail": "kept"}
            })
        );
    }
}

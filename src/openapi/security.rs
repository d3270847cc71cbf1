//! Security scheme resolution
//!
//! Maps the statically configured security mode to the security requirement
//! attached to every operation and the scheme definition registered in the
//! document. Resolution happens once per service lifetime at construction;
//! an unrecognized mode fails construction before any exchange is processed.

use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::Error;

/// Configured security mode of the documented API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityMode {
    #[default]
    None,
    Jwt,
    Laravel,
}

impl FromStr for SecurityMode {
    type Err = Error;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "none" | "" => Ok(SecurityMode::None),
            "jwt" => Ok(SecurityMode::Jwt),
            "laravel" => Ok(SecurityMode::Laravel),
            other => Err(Error::invalid_security_mode(other)),
        }
    }
}

impl std::fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SecurityMode::None => "none",
            SecurityMode::Jwt => "jwt",
            SecurityMode::Laravel => "laravel",
        };
        write!(f, "{}", name)
    }
}

/// A named security scheme definition in the document's
/// `securityDefinitions` map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SecurityDefinition {
    /// HTTP authentication scheme (e.g. bearer tokens)
    #[serde(rename = "http")]
    Http { scheme: String },
    /// API key carried in a header, cookie or query parameter
    #[serde(rename = "apiKey")]
    ApiKey {
        name: String,
        #[serde(rename = "in")]
        location: String,
    },
}

/// Reference from an operation to a named security scheme
///
/// Serializes as the OpenAPI requirement object `{"<scheme>": []}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityRequirement {
    pub scheme: String,
}

impl SecurityRequirement {
    pub fn new<S: Into<String>>(scheme: S) -> Self {
        Self { scheme: scheme.into() }
    }
}

impl Serialize for SecurityRequirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut node = Map::new();
        node.insert(self.scheme.clone(), Value::Array(Vec::new()));
        Value::Object(node).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecurityRequirement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let node = Map::deserialize(deserializer)?;
        let scheme = node
            .keys()
            .next()
            .cloned()
            .ok_or_else(|| D::Error::custom("security requirement object is empty"))?;
        Ok(SecurityRequirement { scheme })
    }
}

/// Outcome of resolving the configured security mode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSecurity {
    /// Requirement attached to every documented operation
    pub requirement: Option<SecurityRequirement>,
    /// Named definition registered in the document
    pub definition: Option<(String, SecurityDefinition)>,
}

/// Resolve the configured mode into a requirement and a scheme definition
///
/// Deterministic: repeated calls for the same mode yield identical output.
pub fn resolve_security(mode: SecurityMode) -> ResolvedSecurity {
    match mode {
        SecurityMode::None => ResolvedSecurity::default(),
        SecurityMode::Jwt => ResolvedSecurity {
            requirement: Some(SecurityRequirement::new("bearerAuth")),
            definition: Some((
                "bearerAuth".to_string(),
                SecurityDefinition::Http { scheme: "bearer".to_string() },
            )),
        },
        SecurityMode::Laravel => ResolvedSecurity {
            requirement: Some(SecurityRequirement::new("laravelSession")),
            definition: Some((
                "laravelSession".to_string(),
                SecurityDefinition::ApiKey {
                    name: "laravel_session".to_string(),
                    location: "cookie".to_string(),
                },
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("none".parse::<SecurityMode>().unwrap(), SecurityMode::None);
        assert_eq!("jwt".parse::<SecurityMode>().unwrap(), SecurityMode::Jwt);
        assert_eq!("laravel".parse::<SecurityMode>().unwrap(), SecurityMode::Laravel);
        assert!(matches!(
            "invalid".parse::<SecurityMode>(),
            Err(Error::InvalidSecurityMode(mode)) if mode == "invalid"
        ));
    }

    #[test]
    fn test_none_resolves_to_nothing() {
        let resolved = resolve_security(SecurityMode::None);
        assert!(resolved.requirement.is_none());
        assert!(resolved.definition.is_none());
    }

    #[test]
    fn test_jwt_resolves_to_bearer_scheme() {
        let resolved = resolve_security(SecurityMode::Jwt);
        assert_eq!(resolved.requirement.unwrap().scheme, "bearerAuth");

        let (name, definition) = resolved.definition.unwrap();
        assert_eq!(name, "bearerAuth");
        assert_eq!(definition, SecurityDefinition::Http { scheme: "bearer".to_string() });
    }

    #[test]
    fn test_laravel_resolves_to_cookie_api_key() {
        let resolved = resolve_security(SecurityMode::Laravel);
        assert_eq!(resolved.requirement.unwrap().scheme, "laravelSession");

        let (name, definition) = resolved.definition.unwrap();
        assert_eq!(name, "laravelSession");
        match definition {
            SecurityDefinition::ApiKey { name, location } => {
                assert_eq!(name, "laravel_session");
                assert_eq!(location, "cookie");
            }
            other => panic!("expected api key definition, got {:?}", other),
        }
    }

    #[test]
    fn test_resolution_is_deterministic() {
        assert_eq!(resolve_security(SecurityMode::Jwt), resolve_security(SecurityMode::Jwt));
    }

    #[test]
    fn test_requirement_serializes_as_openapi_object() {
        let requirement = SecurityRequirement::new("bearerAuth");
        assert_eq!(serde_json::to_value(&requirement).unwrap(), json!({"bearerAuth": []}));

        let reparsed: SecurityRequirement =
            serde_json::from_value(json!({"bearerAuth": []})).unwrap();
        assert_eq!(reparsed, requirement);
    }

    #[test]
    fn test_definition_serializes_tagged() {
        let definition = SecurityDefinition::ApiKey {
            name: "laravel_session".to_string(),
            location: "cookie".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&definition).unwrap(),
            json!({"type": "apiKey", "name": "laravel_session", "in": "cookie"})
        );
    }
}

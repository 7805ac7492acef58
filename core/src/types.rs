//! Domain DTOs for the Petfinder API.
//!
//! # Design
//! These types mirror the subset of the Petfinder v2 schema the client reads.
//! Unknown fields are ignored by serde, so the full production payloads decode
//! into the same structs as the trimmed mock-server ones.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Application credentials for the client-credentials grant. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// One adoptable animal as listed at fetch time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Animal {
    pub id: u64,
    pub name: String,
    pub species: String,
    pub age: String,
}

/// Query parameters for the listings endpoint.
///
/// The default asks for large animals only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalQuery {
    pub size: Option<String>,
    pub animal_type: Option<String>,
}

impl Default for AnimalQuery {
    fn default() -> Self {
        Self {
            size: Some("large".to_string()),
            animal_type: None,
        }
    }
}

impl AnimalQuery {
    /// A query with no filters at all.
    pub fn any() -> Self {
        Self {
            size: None,
            animal_type: None,
        }
    }

    /// Query pairs in the order they are appended to the URL.
    pub(crate) fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(size) = &self.size {
            pairs.push(("size", size.as_str()));
        }
        if let Some(animal_type) = &self.animal_type {
            pairs.push(("type", animal_type.as_str()));
        }
        pairs
    }
}

/// Body of a successful `POST /oauth2/token`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

/// Body of `GET /animals`. Pagination metadata is ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnimalsResponse {
    pub animals: Vec<Animal>,
}

/// Body of `GET /types`. Entries are kept loose so ones without a string
/// `name` can be skipped instead of failing the whole decode.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TypesResponse {
    pub types: Vec<serde_json::Value>,
}

impl TypesResponse {
    pub fn into_names(self) -> Vec<String> {
        self.types
            .into_iter()
            .filter_map(|entry| entry.get("name")?.as_str().map(str::to_string))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_secret() {
        let creds = Credentials::new("id", "hunter2");
        let shown = format!("{creds:?}");
        assert!(shown.contains("id"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn animal_ignores_extra_fields() {
        let animal: Animal = serde_json::from_str(
            r#"{"id":7,"name":"Rex","species":"Dog","age":"Young","gender":"Male","photos":[]}"#,
        )
        .unwrap();
        assert_eq!(animal.id, 7);
        assert_eq!(animal.species, "Dog");
    }

    #[test]
    fn animal_rejects_missing_name() {
        let result: Result<Animal, _> =
            serde_json::from_str(r#"{"id":7,"species":"Dog","age":"Young"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn types_skip_entries_without_string_name() {
        let resp: TypesResponse = serde_json::from_str(
            r#"{"types":[{"name":"Dog"},{"coats":[]},{"name":3},{"name":"Cat"}]}"#,
        )
        .unwrap();
        assert_eq!(resp.into_names(), vec!["Dog", "Cat"]);
    }

    #[test]
    fn default_query_asks_for_large() {
        assert_eq!(AnimalQuery::default().pairs(), vec![("size", "large")]);
        assert!(AnimalQuery::any().pairs().is_empty());
    }
}

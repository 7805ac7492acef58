//! Stateless HTTP request builder and response parser for the Petfinder API.
//!
//! # Design
//! `PetfinderClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Token caching lives one layer up (`PetfinderApi`, or the
//! FFI handle), so this type stays deterministic and free of I/O.

use url::form_urlencoded;
use url::Url;

use crate::error::{ApiError, UNKNOWN_ERROR};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Animal, AnimalQuery, AnimalsResponse, Credentials, TokenResponse, TypesResponse};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.petfinder.com/v2";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Synchronous, stateless client for the Petfinder API.
#[derive(Debug, Clone)]
pub struct PetfinderClient {
    base_url: String,
}

impl Default for PetfinderClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PetfinderClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!("{}/{path}", self.base_url))?)
    }

    /// `POST /oauth2/token` with a form-encoded client-credentials body.
    pub fn build_token_request(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint("oauth2/token")?;
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "client_credentials")
            .append_pair("client_id", &credentials.client_id)
            .append_pair("client_secret", &credentials.client_secret)
            .finish();
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: Some(body),
        })
    }

    /// `GET /animals` with the query appended after a `?`.
    pub fn build_list_animals(&self, token: &str, query: &AnimalQuery) -> Result<HttpRequest, ApiError> {
        let mut url = self.endpoint("animals")?;
        let pairs = query.pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(authorized_get(url, token))
    }

    /// `GET /types`.
    pub fn build_list_types(&self, token: &str) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint("types")?;
        Ok(authorized_get(url, token))
    }

    /// Extract `access_token` from a token response.
    ///
    /// Rejected credentials come back as `Unauthorized` (401) or `Http` (any
    /// other non-2xx) rather than as a decode failure of the error body.
    pub fn parse_token(&self, response: HttpResponse) -> Result<String, ApiError> {
        let body = successful_body(response)?;
        let parsed: TokenResponse = serde_json::from_str(&body)?;
        Ok(parsed.access_token)
    }

    pub fn parse_list_animals(&self, response: HttpResponse) -> Result<Vec<Animal>, ApiError> {
        let body = successful_body(response)?;
        let parsed: AnimalsResponse = serde_json::from_str(&body)?;
        Ok(parsed.animals)
    }

    /// Type names in response order.
    pub fn parse_list_types(&self, response: HttpResponse) -> Result<Vec<String>, ApiError> {
        let body = successful_body(response)?;
        let parsed: TypesResponse = serde_json::from_str(&body)?;
        Ok(parsed.into_names())
    }
}

fn authorized_get(url: Url, token: &str) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url: url.into(),
        headers: vec![("authorization".to_string(), format!("Bearer {token}"))],
        body: None,
    }
}

/// Map the status to an error, or hand back a non-empty body.
fn successful_body(response: HttpResponse) -> Result<String, ApiError> {
    match response.status {
        200..=299 => {}
        401 => return Err(ApiError::Unauthorized(response.body)),
        status => {
            return Err(ApiError::Http {
                status,
                body: response.body,
            })
        }
    }
    if response.body.trim().is_empty() {
        return Err(ApiError::Network(UNKNOWN_ERROR.to_string()));
    }
    Ok(response.body)
}

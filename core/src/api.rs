//! Async one-shot operations over a store and a transport.
//!
//! # Design
//! `PetfinderApi` is the stateful half: it owns the `KeyValueStore` holding the
//! cached token and a `Transport` that performs the round-trip that
//! `PetfinderClient` leaves to its caller. Every call is one request at most,
//! with no retry and no locking around the token (two concurrent first calls
//! both fetch; the later write wins).
//!
//! A 401 on a listing call drops the cached token so the next `get_token`
//! goes back to the network. The failing call itself still returns the error.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::client::PetfinderClient;
use crate::error::{ApiError, UNKNOWN_ERROR};
use crate::http::{HttpRequest, HttpResponse};
use crate::store::{self, KeyValueStore};
use crate::transport::Transport;
use crate::types::{Animal, AnimalQuery, Credentials};

pub struct PetfinderApi<T> {
    client: PetfinderClient,
    store: Arc<dyn KeyValueStore>,
    transport: T,
    query: AnimalQuery,
}

impl<T: Transport> PetfinderApi<T> {
    pub fn new(client: PetfinderClient, store: Arc<dyn KeyValueStore>, transport: T) -> Self {
        Self {
            client,
            store,
            transport,
            query: AnimalQuery::default(),
        }
    }

    /// Replace the query used by `get_animals`.
    pub fn with_query(mut self, query: AnimalQuery) -> Self {
        self.query = query;
        self
    }

    pub fn load_token(&self) -> Option<String> {
        store::load_token(self.store.as_ref())
    }

    pub fn save_token(&self, token: &str) -> Result<(), ApiError> {
        store::save_token(self.store.as_ref(), token)
    }

    pub fn clear_token(&self) -> Result<(), ApiError> {
        store::clear_token(self.store.as_ref())
    }

    /// Return the cached token, or acquire and cache a new one.
    ///
    /// A cached token is returned as-is, without checking the server still
    /// accepts it.
    pub async fn get_token(&self, credentials: &Credentials) -> Result<String, ApiError> {
        if let Some(token) = self.load_token() {
            debug!("using cached token");
            return Ok(token);
        }

        let request = self.client.build_token_request(credentials)?;
        let response = self.send(request).await?;
        let token = self.client.parse_token(response).inspect_err(|e| {
            warn!(error = %e, "token request failed");
        })?;
        self.save_token(&token)?;
        info!(client_id = %credentials.client_id, "acquired new access token");
        Ok(token)
    }

    /// List animals with the configured query.
    pub async fn get_animals(&self) -> Result<Vec<Animal>, ApiError> {
        self.get_animals_matching(&self.query).await
    }

    pub async fn get_animals_matching(&self, query: &AnimalQuery) -> Result<Vec<Animal>, ApiError> {
        let token = self.require_token()?;
        let request = self.client.build_list_animals(&token, query)?;
        let response = self.send(request).await?;
        let result = self.client.parse_list_animals(response);
        self.after_listing(result, "animals")
    }

    pub async fn get_animal_types(&self) -> Result<Vec<String>, ApiError> {
        let token = self.require_token()?;
        let request = self.client.build_list_types(&token)?;
        let response = self.send(request).await?;
        let result = self.client.parse_list_types(response);
        self.after_listing(result, "types")
    }

    fn require_token(&self) -> Result<String, ApiError> {
        self.load_token().ok_or_else(|| {
            warn!("listing requested before a token was acquired");
            ApiError::TokenUnavailable
        })
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.execute(request).await.map_err(|e| {
            warn!(error = %e, "transport failure");
            let description = if e.0.is_empty() { UNKNOWN_ERROR.to_string() } else { e.0 };
            ApiError::Network(description)
        })
    }

    fn after_listing<R>(&self, result: Result<Vec<R>, ApiError>, what: &str) -> Result<Vec<R>, ApiError> {
        match &result {
            Ok(items) => debug!(count = items.len(), "fetched {what}"),
            Err(ApiError::Unauthorized(_)) => {
                warn!("token rejected, clearing cached token");
                if let Err(e) = self.clear_token() {
                    warn!(error = %e, "failed to clear rejected token");
                }
            }
            Err(e) => warn!(error = %e, "fetching {what} failed"),
        }
        result
    }
}

#[cfg(feature = "transport")]
impl PetfinderApi<crate::transport::ReqwestTransport> {
    /// Production wiring: reqwest transport and a file-backed token store.
    pub fn from_config(config: &crate::config::Config) -> Result<Self, ApiError> {
        let transport = crate::transport::ReqwestTransport::new(config.timeout())
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let store = Arc::new(store::FileStore::new(&config.token_path));
        Ok(Self::new(PetfinderClient::new(&config.base_url), store, transport)
            .with_query(config.animal_query()))
    }
}

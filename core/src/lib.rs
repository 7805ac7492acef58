//! API client core for the Petfinder adoption API.
//!
//! # Overview
//! Acquires an OAuth2 client-credentials token, caches it in a durable
//! key-value store, and lists adoptable animals and animal types.
//!
//! # Design
//! - `PetfinderClient` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network (host-does-IO). This
//!   is the half the C ABI exposes.
//! - `PetfinderApi` adds the token cache (`KeyValueStore`) and a `Transport`
//!   and exposes one-shot async calls: `get_token`, `get_animals`,
//!   `get_animal_types`.
//! - Listing calls never fetch a token on their own; without a cached token
//!   they fail with `ApiError::TokenUnavailable`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod transport;
pub mod types;

pub use api::PetfinderApi;
pub use client::{PetfinderClient, DEFAULT_BASE_URL};
pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{clear_token, load_token, save_token, FileStore, KeyValueStore, MemoryStore, TOKEN_KEY};
#[cfg(feature = "transport")]
pub use transport::ReqwestTransport;
pub use transport::{Transport, TransportError};
pub use types::{Animal, AnimalQuery, Credentials};

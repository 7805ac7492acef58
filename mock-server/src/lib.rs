use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_CLIENT_ID: &str = "test-client";
pub const DEFAULT_CLIENT_SECRET: &str = "test-secret";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Animal {
    pub id: u64,
    pub name: String,
    pub species: String,
    pub age: String,
    pub size: String,
    #[serde(rename = "type")]
    pub animal_type: String,
}

#[derive(Deserialize)]
pub struct TokenForm {
    pub grant_type: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Serialize, Deserialize)]
pub struct TokenBody {
    pub token_type: String,
    pub expires_in: u64,
    pub access_token: String,
}

#[derive(Deserialize, Default)]
pub struct AnimalFilter {
    pub size: Option<String>,
    #[serde(rename = "type")]
    pub animal_type: Option<String>,
}

/// Shared server state: the accepted credentials, issued tokens and the
/// listing catalog.
pub struct MockState {
    pub client_id: String,
    pub client_secret: String,
    pub tokens: RwLock<HashSet<String>>,
    pub animals: Vec<Animal>,
    pub types: Vec<String>,
    pub token_requests: AtomicUsize,
}

impl MockState {
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            tokens: RwLock::new(HashSet::new()),
            animals: seed_animals(),
            types: vec!["Dog".to_string(), "Cat".to_string(), "Rabbit".to_string()],
            token_requests: AtomicUsize::new(0),
        }
    }

    /// Number of `POST /oauth2/token` calls received so far.
    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT_ID, DEFAULT_CLIENT_SECRET)
    }
}

pub type Shared = Arc<MockState>;

fn seed_animals() -> Vec<Animal> {
    let animal = |id, name: &str, species: &str, age: &str, size: &str, animal_type: &str| Animal {
        id,
        name: name.to_string(),
        species: species.to_string(),
        age: age.to_string(),
        size: size.to_string(),
        animal_type: animal_type.to_string(),
    };
    vec![
        animal(1, "Rex", "Dog", "Young", "large", "Dog"),
        animal(2, "Mittens", "Cat", "Adult", "small", "Cat"),
        animal(3, "Bruno", "Dog", "Senior", "large", "Dog"),
        animal(4, "Clover", "Rabbit", "Baby", "small", "Rabbit"),
        animal(5, "Shadow", "Cat", "Young", "large", "Cat"),
    ]
}

pub fn app() -> Router {
    app_with_state(Arc::new(MockState::default()))
}

pub fn app_with_state(state: Shared) -> Router {
    let v2 = Router::new()
        .route("/oauth2/token", post(issue_token))
        .route("/animals", get(list_animals))
        .route("/types", get(list_types))
        .route("/admin/revoke", post(revoke_tokens))
        .with_state(state);
    Router::new().nest("/v2", v2)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, Arc::new(MockState::default())).await
}

pub async fn run_with_state(listener: TcpListener, state: Shared) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

/// Petfinder-style problem body.
fn problem(status: StatusCode, detail: &str) -> Response {
    let body = json!({
        "type": "https://www.petfinder.com/developers/v2/docs/errors/",
        "status": status.as_u16(),
        "title": status.canonical_reason().unwrap_or("Error"),
        "detail": detail,
    });
    (status, Json(body)).into_response()
}

async fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token {
        Some(token) if state.tokens.read().await.contains(token) => Ok(()),
        Some(_) => Err(problem(StatusCode::UNAUTHORIZED, "Access token invalid or expired")),
        None => Err(problem(StatusCode::UNAUTHORIZED, "Missing bearer token")),
    }
}

async fn issue_token(State(state): State<Shared>, Form(form): Form<TokenForm>) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);
    if form.grant_type != "client_credentials" {
        return problem(StatusCode::BAD_REQUEST, "unsupported grant type");
    }
    if form.client_id != state.client_id || form.client_secret != state.client_secret {
        return problem(StatusCode::UNAUTHORIZED, "Client authentication failed");
    }
    let access_token = Uuid::new_v4().simple().to_string();
    state.tokens.write().await.insert(access_token.clone());
    info!(client_id = %form.client_id, "issued access token");
    Json(TokenBody {
        token_type: "Bearer".to_string(),
        expires_in: 3600,
        access_token,
    })
    .into_response()
}

async fn list_animals(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(filter): Query<AnimalFilter>,
) -> Response {
    if let Err(resp) = authorize(&state, &headers).await {
        return resp;
    }
    let animals: Vec<&Animal> = state
        .animals
        .iter()
        .filter(|a| filter.size.as_ref().is_none_or(|s| a.size.eq_ignore_ascii_case(s)))
        .filter(|a| {
            filter
                .animal_type
                .as_ref()
                .is_none_or(|t| a.animal_type.eq_ignore_ascii_case(t))
        })
        .collect();
    debug!(count = animals.len(), "listing animals");
    Json(json!({
        "animals": animals,
        "pagination": {
            "count_per_page": 20,
            "total_count": animals.len(),
            "current_page": 1,
            "total_pages": 1,
        },
    }))
    .into_response()
}

async fn list_types(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(resp) = authorize(&state, &headers).await {
        return resp;
    }
    let types: Vec<_> = state
        .types
        .iter()
        .map(|name| json!({ "name": name, "coats": [], "colors": [], "genders": ["Male", "Female"] }))
        .collect();
    Json(json!({ "types": types })).into_response()
}

async fn revoke_tokens(State(state): State<Shared>) -> StatusCode {
    state.tokens.write().await.clear();
    StatusCode::NO_CONTENT
}

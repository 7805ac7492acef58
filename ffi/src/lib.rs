//! C-ABI wrapper around `petfinder-core`.
//!
//! # Overview
//! Exposes token acquisition and the two listing calls through `extern "C"`
//! functions so a mobile host can build requests, run them on its
//! own networking stack, and hand the responses back for parsing.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - The client handle keeps the current token in memory. The host persists
//!   it in its own durable store and restores it with `petfinder_save_token`
//!   at startup.
//! - A single `FfiPetfinderResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `petfinder_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use petfinder_core::error::ApiError;
use petfinder_core::http::HttpResponse;
use petfinder_core::store::{self, MemoryStore};
use petfinder_core::types::{AnimalQuery, Credentials};

use types::*;

/// Borrow a C string as UTF-8. Invalid UTF-8 yields `None`.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string.
unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Like `str_arg`, but null maps to `Ok(None)` and invalid UTF-8 to `Err`.
unsafe fn opt_str_arg(ptr: *const c_char) -> Result<Option<String>, ()> {
    if ptr.is_null() {
        return Ok(None);
    }
    unsafe { str_arg(ptr) }.map(|s| Some(s.to_string())).ok_or(())
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client bound to `base_url` (e.g. `https://api.petfinder.com/v2`).
///
/// Returns null if `base_url` is null or not UTF-8, or if an internal panic
/// occurs.
/// The caller must free the returned pointer with `petfinder_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_client_new(base_url: *const c_char) -> *mut FfiPetfinderClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let Some(url) = (unsafe { str_arg(base_url) }) else {
            return std::ptr::null_mut();
        };
        let client = FfiPetfinderClient {
            inner: petfinder_core::PetfinderClient::new(url),
            store: MemoryStore::new(),
        };
        Box::into_raw(Box::new(client))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `petfinder_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_client_free(client: *mut FfiPetfinderClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Token cache
// ---------------------------------------------------------------------------

/// Return a copy of the cached token, or null if there is none.
/// The caller must free a non-null result with `petfinder_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_load_token(client: *const FfiPetfinderClient) -> *mut c_char {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match store::load_token(&client.store) {
            Some(token) => into_c_string(token),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Cache `token` in the client, e.g. one restored from host storage.
/// Returns false if an argument is null or the token is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_save_token(client: *const FfiPetfinderClient, token: *const c_char) -> bool {
    catch_unwind(|| {
        if client.is_null() || token.is_null() {
            return false;
        }
        let client = unsafe { &*client };
        match unsafe { str_arg(token) } {
            Some(token) => store::save_token(&client.store, token).is_ok(),
            None => false,
        }
    })
    .unwrap_or(false)
}

/// Drop the cached token. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_clear_token(client: *const FfiPetfinderClient) {
    if client.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let client = unsafe { &*client };
        let _ = store::clear_token(&client.store);
    });
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the client-credentials token request.
///
/// Does not consult the cache: call `petfinder_load_token` first and skip the
/// round-trip when it returns a token.
/// Returns null if any argument is null or not UTF-8, or the base URL is
/// invalid.
/// The caller must free the returned pointer with `petfinder_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_build_token_request(
    client: *const FfiPetfinderClient,
    client_id: *const c_char,
    client_secret: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || client_id.is_null() || client_secret.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(id), Some(secret)) = (unsafe { str_arg(client_id) }, unsafe { str_arg(client_secret) }) else {
            return std::ptr::null_mut();
        };
        let credentials = Credentials::new(id, secret);
        match client.inner.build_token_request(&credentials) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the listings request with the default query (`size=large`).
///
/// Returns null if `client` is null, no token is cached, or the base URL is
/// invalid.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_build_list_animals(client: *const FfiPetfinderClient) -> *mut FfiHttpRequest {
    build_list_animals(client, AnimalQuery::default())
}

/// Build the listings request with explicit filters. Either filter may be
/// null to leave it out. Returns null if a filter is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_build_list_animals_filtered(
    client: *const FfiPetfinderClient,
    size: *const c_char,
    animal_type: *const c_char,
) -> *mut FfiHttpRequest {
    let (Ok(size), Ok(animal_type)) = (unsafe { opt_str_arg(size) }, unsafe { opt_str_arg(animal_type) }) else {
        return std::ptr::null_mut();
    };
    build_list_animals(client, AnimalQuery { size, animal_type })
}

fn build_list_animals(client: *const FfiPetfinderClient, query: AnimalQuery) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(token) = store::load_token(&client.store) else {
            return std::ptr::null_mut();
        };
        match client.inner.build_list_animals(&token, &query) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the animal types request.
///
/// Returns null if `client` is null, no token is cached, or the base URL is
/// invalid.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_build_list_types(client: *const FfiPetfinderClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(token) = store::load_token(&client.store) else {
            return std::ptr::null_mut();
        };
        match client.inner.build_list_types(&token) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body reads
/// as empty; a body that is not UTF-8 is a decode error.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> Result<HttpResponse, ApiError> {
    if resp.body.is_null() {
        return Ok(HttpResponse::new(resp.status, String::new()));
    }
    let bytes = unsafe { CStr::from_ptr(resp.body) }.to_bytes().to_vec();
    let body = String::from_utf8(bytes).map_err(|e| ApiError::Decode(format!("response body is not UTF-8: {e}")))?;
    Ok(HttpResponse::new(resp.status, body))
}

/// Drop the cached token when the server rejected it.
fn forget_rejected_token(client: &FfiPetfinderClient, err: &ApiError) {
    if matches!(err, ApiError::Unauthorized(_)) {
        let _ = store::clear_token(&client.store);
    }
}

/// Parse a token response and cache the token in the client.
///
/// Returns a result with `data_tag = Token` on success. The host should also
/// persist the token in its durable store.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_parse_token(
    client: *const FfiPetfinderClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPetfinderResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiPetfinderResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPetfinderResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let token = ffi_response_to_core(resp)
            .and_then(|resp| client.inner.parse_token(resp))
            .and_then(|token| store::save_token(&client.store, &token).map(|()| token));
        match token {
            Ok(token) => FfiPetfinderResult::ok_token(token),
            Err(e) => FfiPetfinderResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPetfinderResult::panic("panic in petfinder_parse_token"))
}

/// Parse a listings response.
///
/// Returns a result with `data_tag = AnimalList` on success. A 401 also
/// clears the cached token.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_parse_list_animals(
    client: *const FfiPetfinderClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPetfinderResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiPetfinderResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPetfinderResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match ffi_response_to_core(resp).and_then(|resp| client.inner.parse_list_animals(resp)) {
            Ok(animals) => FfiPetfinderResult::ok_animal_list(animals),
            Err(e) => {
                forget_rejected_token(client, &e);
                FfiPetfinderResult::from_error(e)
            }
        }
    })
    .unwrap_or_else(|_| FfiPetfinderResult::panic("panic in petfinder_parse_list_animals"))
}

/// Parse an animal types response.
///
/// Returns a result with `data_tag = StringList` on success. A 401 also
/// clears the cached token.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_parse_list_types(
    client: *const FfiPetfinderClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPetfinderResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiPetfinderResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPetfinderResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match ffi_response_to_core(resp).and_then(|resp| client.inner.parse_list_types(resp)) {
            Ok(types) => FfiPetfinderResult::ok_string_list(types),
            Err(e) => {
                forget_rejected_token(client, &e);
                FfiPetfinderResult::from_error(e)
            }
        }
    })
    .unwrap_or_else(|_| FfiPetfinderResult::panic("panic in petfinder_parse_list_types"))
}

/// Wrap a host transport failure in the common result envelope, so hosts can
/// route every outcome through one code path. `message` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_network_error(message: *const c_char) -> *mut FfiPetfinderResult {
    catch_unwind(|| {
        let message = unsafe { opt_str_arg(message) }
            .ok()
            .flatten()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| petfinder_core::error::UNKNOWN_ERROR.to_string());
        FfiPetfinderResult::from_error(ApiError::Network(message))
    })
    .unwrap_or_else(|_| FfiPetfinderResult::panic("panic in petfinder_network_error"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `petfinder_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Vec::from_raw_parts(req.headers, req.headers_len as usize, req.headers_len as usize)
            };
            for h in headers {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiPetfinderResult` returned by any `petfinder_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_free_result(result: *mut FfiPetfinderResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Token => free_c_string(result.data as *mut c_char),
            FfiDataTag::AnimalList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiAnimalList) };
                if !list.items.is_null() && list.len > 0 {
                    let items =
                        unsafe { Vec::from_raw_parts(list.items, list.len as usize, list.len as usize) };
                    for item in &items {
                        free_c_string(item.name);
                        free_c_string(item.species);
                        free_c_string(item.age);
                    }
                }
            }
            FfiDataTag::StringList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiStringList) };
                if !list.items.is_null() && list.len > 0 {
                    let items =
                        unsafe { Vec::from_raw_parts(list.items, list.len as usize, list.len as usize) };
                    for s in items {
                        free_c_string(s);
                    }
                }
            }
            FfiDataTag::None => {}
        }
    });
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn new_client() -> *mut FfiPetfinderClient {
        let url = CString::new("http://localhost:3000/v2").unwrap();
        petfinder_client_new(url.as_ptr())
    }

    fn with_token(token: &str) -> *mut FfiPetfinderClient {
        let client = new_client();
        let token = CString::new(token).unwrap();
        assert!(petfinder_save_token(client, token.as_ptr()));
        client
    }

    fn c_str<'a>(ptr: *const c_char) -> &'a str {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
    }

    fn parse_with(
        f: extern "C" fn(*const FfiPetfinderClient, *const FfiHttpResponse) -> *mut FfiPetfinderResult,
        client: *const FfiPetfinderClient,
        status: u16,
        body: &str,
    ) -> *mut FfiPetfinderResult {
        let body = CString::new(body).unwrap();
        let resp = FfiHttpResponse {
            status,
            body: body.as_ptr(),
        };
        f(client, &resp)
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        assert!(!client.is_null());
        petfinder_client_free(client);
    }

    #[test]
    fn client_new_null_returns_null() {
        assert!(petfinder_client_new(std::ptr::null()).is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        petfinder_client_free(std::ptr::null_mut());
    }

    #[test]
    fn token_cache_roundtrip() {
        let client = new_client();
        assert!(petfinder_load_token(client).is_null());

        let token = CString::new("abc").unwrap();
        assert!(petfinder_save_token(client, token.as_ptr()));
        let loaded = petfinder_load_token(client);
        assert_eq!(c_str(loaded), "abc");
        petfinder_free_string(loaded);

        petfinder_clear_token(client);
        assert!(petfinder_load_token(client).is_null());
        petfinder_client_free(client);
    }

    #[test]
    fn save_token_rejects_null() {
        let client = new_client();
        assert!(!petfinder_save_token(client, std::ptr::null()));
        assert!(!petfinder_save_token(std::ptr::null(), std::ptr::null()));
        petfinder_client_free(client);
    }

    #[test]
    fn build_token_request_produces_form_post() {
        let client = new_client();
        let id = CString::new("my-id").unwrap();
        let secret = CString::new("my-secret").unwrap();
        let req = petfinder_build_token_request(client, id.as_ptr(), secret.as_ptr());
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Post));
        assert_eq!(c_str(req_ref.url), "http://localhost:3000/v2/oauth2/token");
        assert_eq!(req_ref.headers_len, 1);
        let header = unsafe { &*req_ref.headers };
        assert_eq!(c_str(header.key), "content-type");
        assert_eq!(c_str(header.value), "application/x-www-form-urlencoded");
        assert_eq!(
            c_str(req_ref.body),
            "grant_type=client_credentials&client_id=my-id&client_secret=my-secret"
        );

        petfinder_free_request(req);
        petfinder_client_free(client);
    }

    /// Bytes that can never start a UTF-8 sequence.
    const NOT_UTF8: &[u8] = &[0xff, 0xfe];

    #[test]
    fn save_token_rejects_invalid_utf8() {
        let client = new_client();
        let token = CString::new(NOT_UTF8).unwrap();
        assert!(!petfinder_save_token(client, token.as_ptr()));
        assert!(petfinder_load_token(client).is_null());
        assert!(petfinder_build_list_types(client).is_null());
        petfinder_client_free(client);
    }

    #[test]
    fn build_token_request_rejects_invalid_utf8() {
        let client = new_client();
        let id = CString::new("my-id").unwrap();
        let secret = CString::new(NOT_UTF8).unwrap();
        assert!(petfinder_build_token_request(client, id.as_ptr(), secret.as_ptr()).is_null());
        assert!(petfinder_build_token_request(client, secret.as_ptr(), id.as_ptr()).is_null());
        petfinder_client_free(client);
    }

    #[test]
    fn build_list_animals_filtered_rejects_invalid_utf8() {
        let client = with_token("tok");
        let size = CString::new(NOT_UTF8).unwrap();
        assert!(petfinder_build_list_animals_filtered(client, size.as_ptr(), std::ptr::null()).is_null());
        petfinder_client_free(client);
    }

    #[test]
    fn parse_invalid_utf8_body_is_decode_error() {
        let client = with_token("tok");
        let body = CString::new(NOT_UTF8).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };

        let result = petfinder_parse_token(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Decode);
        petfinder_free_result(result);

        let result = petfinder_parse_list_animals(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Decode);
        petfinder_free_result(result);

        let loaded = petfinder_load_token(client);
        assert_eq!(c_str(loaded), "tok");
        petfinder_free_string(loaded);
        petfinder_client_free(client);
    }

    #[test]
    fn build_token_request_null_secret_returns_null() {
        let client = new_client();
        let id = CString::new("my-id").unwrap();
        assert!(petfinder_build_token_request(client, id.as_ptr(), std::ptr::null()).is_null());
        petfinder_client_free(client);
    }

    #[test]
    fn build_listings_without_token_returns_null() {
        let client = new_client();
        assert!(petfinder_build_list_animals(client).is_null());
        assert!(petfinder_build_list_types(client).is_null());
        petfinder_client_free(client);
    }

    #[test]
    fn build_list_animals_carries_bearer_and_query() {
        let client = with_token("tok");
        let req = petfinder_build_list_animals(client);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Get));
        assert_eq!(c_str(req_ref.url), "http://localhost:3000/v2/animals?size=large");
        assert!(req_ref.body.is_null());
        let header = unsafe { &*req_ref.headers };
        assert_eq!(c_str(header.key), "authorization");
        assert_eq!(c_str(header.value), "Bearer tok");

        petfinder_free_request(req);
        petfinder_client_free(client);
    }

    #[test]
    fn build_list_animals_filtered() {
        let client = with_token("tok");
        let animal_type = CString::new("Cat").unwrap();
        let req = petfinder_build_list_animals_filtered(client, std::ptr::null(), animal_type.as_ptr());
        let req_ref = unsafe { &*req };
        assert_eq!(c_str(req_ref.url), "http://localhost:3000/v2/animals?type=Cat");
        petfinder_free_request(req);
        petfinder_client_free(client);
    }

    #[test]
    fn build_list_types_with_token() {
        let client = with_token("tok");
        let req = petfinder_build_list_types(client);
        let req_ref = unsafe { &*req };
        assert_eq!(c_str(req_ref.url), "http://localhost:3000/v2/types");
        petfinder_free_request(req);
        petfinder_client_free(client);
    }

    #[test]
    fn parse_token_caches_token() {
        let client = new_client();
        let result = parse_with(petfinder_parse_token, client, 200, r#"{"access_token":"fresh"}"#);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.data_tag, FfiDataTag::Token);
        assert_eq!(c_str(r.data as *const c_char), "fresh");
        petfinder_free_result(result);

        let loaded = petfinder_load_token(client);
        assert_eq!(c_str(loaded), "fresh");
        petfinder_free_string(loaded);
        petfinder_client_free(client);
    }

    #[test]
    fn parse_token_missing_field_leaves_cache_empty() {
        let client = new_client();
        let result = parse_with(petfinder_parse_token, client, 200, r#"{"token_type":"Bearer"}"#);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Decode);
        assert!(!r.error_message.is_null());
        assert!(r.data.is_null());
        petfinder_free_result(result);

        assert!(petfinder_load_token(client).is_null());
        petfinder_client_free(client);
    }

    #[test]
    fn parse_list_animals_one_item() {
        let client = with_token("tok");
        let result = parse_with(
            petfinder_parse_list_animals,
            client,
            200,
            r#"{"animals":[{"id":1,"name":"Rex","species":"Dog","age":"Young"}]}"#,
        );
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.data_tag, FfiDataTag::AnimalList);

        let list = unsafe { &*(r.data as *const FfiAnimalList) };
        assert_eq!(list.len, 1);
        let items = unsafe { std::slice::from_raw_parts(list.items, list.len as usize) };
        assert_eq!(items[0].id, 1);
        assert_eq!(c_str(items[0].name), "Rex");
        assert_eq!(c_str(items[0].species), "Dog");
        assert_eq!(c_str(items[0].age), "Young");

        petfinder_free_result(result);
        petfinder_client_free(client);
    }

    #[test]
    fn parse_list_animals_empty() {
        let client = with_token("tok");
        let result = parse_with(petfinder_parse_list_animals, client, 200, r#"{"animals":[]}"#);
        let r = unsafe { &*result };
        assert_eq!(r.data_tag, FfiDataTag::AnimalList);
        let list = unsafe { &*(r.data as *const FfiAnimalList) };
        assert_eq!(list.len, 0);
        assert!(list.items.is_null());
        petfinder_free_result(result);
        petfinder_client_free(client);
    }

    #[test]
    fn parse_list_animals_unauthorized_clears_token() {
        let client = with_token("stale");
        let result = parse_with(petfinder_parse_list_animals, client, 401, r#"{"title":"Unauthorized"}"#);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Unauthorized);
        assert_eq!(r.http_status, 401);
        petfinder_free_result(result);

        assert!(petfinder_load_token(client).is_null());
        petfinder_client_free(client);
    }

    #[test]
    fn parse_list_types_in_order() {
        let client = with_token("tok");
        let result = parse_with(
            petfinder_parse_list_types,
            client,
            200,
            r#"{"types":[{"name":"Dog"},{"name":"Cat"}]}"#,
        );
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.data_tag, FfiDataTag::StringList);

        let list = unsafe { &*(r.data as *const FfiStringList) };
        let items = unsafe { std::slice::from_raw_parts(list.items, list.len as usize) };
        let names: Vec<&str> = items.iter().map(|p| c_str(*p)).collect();
        assert_eq!(names, vec!["Dog", "Cat"]);

        petfinder_free_result(result);
        petfinder_client_free(client);
    }

    #[test]
    fn parse_list_types_server_error_keeps_token() {
        let client = with_token("tok");
        let result = parse_with(petfinder_parse_list_types, client, 500, "boom");
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Http);
        assert_eq!(r.http_status, 500);
        petfinder_free_result(result);

        let loaded = petfinder_load_token(client);
        assert!(!loaded.is_null());
        petfinder_free_string(loaded);
        petfinder_client_free(client);
    }

    #[test]
    fn parse_null_body_is_network_error() {
        let client = with_token("tok");
        let resp = FfiHttpResponse {
            status: 200,
            body: std::ptr::null(),
        };
        let result = petfinder_parse_list_types(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Network);
        petfinder_free_result(result);
        petfinder_client_free(client);
    }

    #[test]
    fn parse_null_client_returns_null_arg() {
        let result = parse_with(petfinder_parse_list_animals, std::ptr::null(), 200, "{}");
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);
        petfinder_free_result(result);
    }

    #[test]
    fn parse_null_response_returns_null_arg() {
        let client = new_client();
        let result = petfinder_parse_token(client, std::ptr::null());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);
        petfinder_free_result(result);
        petfinder_client_free(client);
    }

    #[test]
    fn network_error_uses_message_or_fallback() {
        let msg = CString::new("offline").unwrap();
        let result = petfinder_network_error(msg.as_ptr());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Network);
        assert_eq!(c_str(r.error_message), "network error: offline");
        petfinder_free_result(result);

        let result = petfinder_network_error(std::ptr::null());
        let r = unsafe { &*result };
        assert_eq!(c_str(r.error_message), "network error: unknown error");
        petfinder_free_result(result);
    }

    #[test]
    fn free_request_null_is_safe() {
        petfinder_free_request(std::ptr::null_mut());
    }

    #[test]
    fn free_result_null_is_safe() {
        petfinder_free_result(std::ptr::null_mut());
    }

    #[test]
    fn free_string_null_is_safe() {
        petfinder_free_string(std::ptr::null_mut());
    }
}

//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use petfinder_core::error::ApiError;
use petfinder_core::http::HttpMethod;
use petfinder_core::store::MemoryStore;
use petfinder_core::types::Animal;

/// Opaque handle to a `PetfinderClient` plus the token it has cached. C
/// callers receive a pointer to this and pass it back into every FFI function.
pub struct FfiPetfinderClient {
    pub(crate) inner: petfinder_core::PetfinderClient,
    pub(crate) store: MemoryStore,
}

/// Copy a Rust string into a heap-allocated C string. Interior NUL bytes
/// cannot be represented and are dropped.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let bytes: Vec<u8> = s.into_bytes().into_iter().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

/// Hand a `Vec` to C as a raw pointer; empty vectors become null.
fn into_raw_parts<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let mut items = items.into_boxed_slice();
    let len = items.len() as u32;
    let ptr = items.as_mut_ptr();
    std::mem::forget(items);
    (ptr, len)
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `petfinder_build_*` functions. The C caller executes the request
/// and passes the response back through `petfinder_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: petfinder_core::HttpRequest) -> *mut Self {
        let url = into_c_string(req.url);
        let body = match req.body {
            Some(b) => into_c_string(b),
            None => std::ptr::null_mut(),
        };
        let ffi_headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: into_c_string(k),
                value: into_c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_parts(ffi_headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `petfinder_parse_*` function. The FFI layer
/// reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiPetfinderResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidUrl = 1,
    Network = 2,
    Decode = 3,
    TokenUnavailable = 4,
    Unauthorized = 5,
    Http = 6,
    Storage = 7,
    Panic = 8,
    NullArg = 9,
}

/// Tag that tells `petfinder_free_result` what `FfiPetfinderResult::data`
/// points to.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    /// `data` is a `char*` bearer token.
    Token = 1,
    /// `data` is an `FfiAnimalList*`.
    AnimalList = 2,
    /// `data` is an `FfiStringList*`.
    StringList = 3,
}

/// A single animal listing exposed to C.
#[repr(C)]
pub struct FfiAnimal {
    pub id: u64,
    pub name: *mut c_char,
    pub species: *mut c_char,
    pub age: *mut c_char,
}

#[repr(C)]
pub struct FfiAnimalList {
    pub items: *mut FfiAnimal,
    pub len: u32,
}

#[repr(C)]
pub struct FfiStringList {
    pub items: *mut *mut c_char,
    pub len: u32,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiPetfinderResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiPetfinderResult {
    fn ok(data_tag: FfiDataTag, data: *mut std::ffi::c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiPetfinderResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn error(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiPetfinderResult {
            error_code,
            error_message: into_c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// Build a success result carrying a bearer token.
    pub(crate) fn ok_token(token: String) -> *mut Self {
        Self::ok(FfiDataTag::Token, into_c_string(token) as *mut std::ffi::c_void)
    }

    /// Build a success result carrying an `FfiAnimalList`.
    pub(crate) fn ok_animal_list(animals: Vec<Animal>) -> *mut Self {
        let ffi_animals: Vec<FfiAnimal> = animals
            .into_iter()
            .map(|a| FfiAnimal {
                id: a.id,
                name: into_c_string(a.name),
                species: into_c_string(a.species),
                age: into_c_string(a.age),
            })
            .collect();
        let (items, len) = into_raw_parts(ffi_animals);
        let list = Box::new(FfiAnimalList { items, len });
        Self::ok(FfiDataTag::AnimalList, Box::into_raw(list) as *mut std::ffi::c_void)
    }

    /// Build a success result carrying an `FfiStringList`.
    pub(crate) fn ok_string_list(strings: Vec<String>) -> *mut Self {
        let c_strings: Vec<*mut c_char> = strings.into_iter().map(into_c_string).collect();
        let (items, len) = into_raw_parts(c_strings);
        let list = Box::new(FfiStringList { items, len });
        Self::ok(FfiDataTag::StringList, Box::into_raw(list) as *mut std::ffi::c_void)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status) = match &err {
            ApiError::InvalidUrl(_) => (FfiErrorCode::InvalidUrl, 0),
            ApiError::Network(_) => (FfiErrorCode::Network, 0),
            ApiError::Decode(_) => (FfiErrorCode::Decode, 0),
            ApiError::TokenUnavailable => (FfiErrorCode::TokenUnavailable, 0),
            ApiError::Unauthorized(_) => (FfiErrorCode::Unauthorized, 401u16),
            ApiError::Http { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::Storage(_) => (FfiErrorCode::Storage, 0),
        };
        Self::error(error_code, http_status, err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg.to_string())
    }
}

//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible fields: `*mut c_char`
//! instead of `String`, pointer + length instead of `Vec`, and enums with
//! explicit discriminants. Conversions live here so `lib.rs` stays focused
//! on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use character_core::{Character, CharacterClient, ErrorKind, HttpMethod, HttpRequest};

/// Opaque handle to a `CharacterClient`.
pub struct FfiCharacterClient {
    pub(crate) inner: CharacterClient,
}

/// Copy `s` into a heap C string owned by the caller. Interior NUL bytes
/// are dropped.
pub(crate) fn to_c_string(s: impl Into<String>) -> *mut c_char {
    let mut s = s.into();
    s.retain(|c| c != '\0');
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// Request the host must execute. Character requests never carry a body.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: to_c_string(req.url),
            headers,
            headers_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-owned)
// ---------------------------------------------------------------------------

/// Completed HTTP exchange supplied by the host. The FFI layer reads but
/// never frees these fields. `body` may be null when `body_len` is 0.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const u8,
    pub body_len: usize,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Timeout = 1,
    InvalidPayload = 2,
    ServerError = 3,
    NotFound = 4,
    NullArg = 5,
    Panic = 6,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Timeout => FfiErrorCode::Timeout,
            ErrorKind::InvalidPayload => FfiErrorCode::InvalidPayload,
            ErrorKind::ServerError => FfiErrorCode::ServerError,
            ErrorKind::NotFound => FfiErrorCode::NotFound,
        }
    }
}

#[repr(C)]
pub struct FfiCharacter {
    pub id: i64,
    pub name: *mut c_char,
    pub status: *mut c_char,
    pub species: *mut c_char,
    pub gender: *mut c_char,
}

/// Result envelope for classification.
///
/// On success `error_code` is `Ok`, `error_message` is null and
/// `character` points to the decoded character. On failure `character` is
/// null and `error_message` describes the category.
#[repr(C)]
pub struct FfiCharacterResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub character: *mut FfiCharacter,
}

impl FfiCharacterResult {
    pub(crate) fn ok(character: Character) -> *mut Self {
        let ffi_character = Box::new(FfiCharacter {
            id: character.id,
            name: to_c_string(character.name),
            status: to_c_string(character.status),
            species: to_c_string(character.species),
            gender: to_c_string(character.gender),
        });
        Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), Box::into_raw(ffi_character))
    }

    pub(crate) fn from_error(kind: ErrorKind) -> *mut Self {
        Self::boxed(kind.into(), to_c_string(kind.to_string()), std::ptr::null_mut())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            to_c_string(format!("null argument: {name}")),
            std::ptr::null_mut(),
        )
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, to_c_string(msg), std::ptr::null_mut())
    }

    fn boxed(error_code: FfiErrorCode, error_message: *mut c_char, character: *mut FfiCharacter) -> *mut Self {
        Box::into_raw(Box::new(FfiCharacterResult {
            error_code,
            error_message,
            character,
        }))
    }
}

//! C-ABI wrapper around `character-core`.
//!
//! # Overview
//! Lets a host application that owns its own HTTP stack reuse the
//! character request builder and response classifier. The host builds a
//! request, executes it, and hands the status and body back for
//! classification. If no response arrives at all, the host calls
//! `character_transport_failure` to obtain the matching `Timeout` result.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - The C caller owns every returned pointer and releases it with the
//!   matching `character_*_free` / `character_free_*` function.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use character_core::{EndpointConfig, ErrorKind, HttpResponse};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `base_url`.
///
/// Returns null if `base_url` is null, not UTF-8, or if an internal panic
/// occurs. Free with `character_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn character_client_new(base_url: *const c_char) -> *mut FfiCharacterClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let Ok(url) = unsafe { CStr::from_ptr(base_url) }.to_str() else {
            return std::ptr::null_mut();
        };
        let client = character_core::CharacterClient::new(&EndpointConfig::new(url));
        Box::into_raw(Box::new(FfiCharacterClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `character_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn character_client_free(client: *mut FfiCharacterClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build / parse
// ---------------------------------------------------------------------------

/// Build the request for one character. `id` is forwarded verbatim.
///
/// Returns null if `client` is null. Free with `character_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn character_build_get_character(
    client: *const FfiCharacterClient,
    id: i64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_get_character(id))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Copy a host response into a core `HttpResponse`.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() || resp.body_len == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(resp.body, resp.body_len) }.to_vec()
    };
    HttpResponse::new(resp.status, body)
}

/// Classify a completed exchange for a character request.
///
/// Always returns a result; free it with `character_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn character_parse_character(
    client: *const FfiCharacterClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCharacterResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiCharacterResult::null_arg("client");
        }
        if response.is_null() {
            return FfiCharacterResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_character(ffi_response_to_core(resp)) {
            Ok(character) => FfiCharacterResult::ok(character),
            Err(kind) => FfiCharacterResult::from_error(kind),
        }
    })
    .unwrap_or_else(|_| FfiCharacterResult::panic("panic in character_parse_character"))
}

/// Result for a request that produced no HTTP response at all.
#[unsafe(no_mangle)]
pub extern "C" fn character_transport_failure() -> *mut FfiCharacterResult {
    catch_unwind(|| FfiCharacterResult::from_error(ErrorKind::Timeout))
        .unwrap_or_else(|_| FfiCharacterResult::panic("panic in character_transport_failure"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free a request returned by `character_build_get_character`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn character_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free a result returned by `character_parse_character` or
/// `character_transport_failure`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn character_free_result(result: *mut FfiCharacterResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if !result.character.is_null() {
            let character = unsafe { Box::from_raw(result.character) };
            free_c_string(character.name);
            free_c_string(character.status);
            free_c_string(character.species);
            free_c_string(character.gender);
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

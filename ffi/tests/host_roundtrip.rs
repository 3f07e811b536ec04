//! Plays the role of a C host: builds requests through the FFI surface,
//! executes them with ureq against the mock server, and classifies the
//! responses through the FFI surface again.

use std::ffi::{CStr, CString};

use character_ffi::types::{FfiErrorCode, FfiHttpRequest, FfiHttpResponse};
use character_ffi::{
    character_build_get_character, character_client_free, character_client_new, character_free_request,
    character_free_result, character_parse_character,
};

fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Execute an FFI request the way a host would, returning status and body.
fn execute(req: &FfiHttpRequest) -> (u16, Vec<u8>) {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let url = unsafe { CStr::from_ptr(req.url) }.to_str().unwrap();
    let mut response = agent.get(url).call().expect("HTTP transport error");
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_vec().unwrap_or_default();
    (status, body)
}

fn fetch(base_url: &str, id: i64) -> (FfiErrorCode, Option<String>) {
    let url = CString::new(base_url).unwrap();
    let client = character_client_new(url.as_ptr());
    let req = character_build_get_character(client, id);
    let (status, body) = execute(unsafe { &*req });
    character_free_request(req);

    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
        body_len: body.len(),
    };
    let result = character_parse_character(client, &resp);
    let r = unsafe { &*result };
    let name = if r.character.is_null() {
        None
    } else {
        let character = unsafe { &*r.character };
        Some(unsafe { CStr::from_ptr(character.name) }.to_str().unwrap().to_string())
    };
    let code = r.error_code;

    character_free_result(result);
    character_client_free(client);
    (code, name)
}

#[test]
fn host_roundtrip() {
    let base_url = start_mock_server();

    assert_eq!(fetch(&base_url, 1), (FfiErrorCode::Ok, Some("Rick Sanchez".to_string())));
    assert_eq!(fetch(&base_url, 2), (FfiErrorCode::Ok, Some("Morty Smith".to_string())));
    assert_eq!(fetch(&base_url, 9_999), (FfiErrorCode::NotFound, None));
}

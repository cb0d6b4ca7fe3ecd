use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use http_adapter::HttpFetcher;
use relay_core::config::SourceConfig;
use relay_core::error::FetchError;
use relay_core::ports::Fetcher;
use serde_json::json;

/// Serves exactly one canned response on an ephemeral port and returns its URL
fn serve_once(status: u16, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
    });

    format!("http://{}/api/data", addr)
}

fn fetcher_for(url: String) -> HttpFetcher {
    HttpFetcher::new(&SourceConfig { url })
}

#[test]
fn fetch_decodes_ok_body() {
    let url = serve_once(200, r#"{"title":"x","items":[1,2],"meta":{"ok":true}}"#);
    let record = fetcher_for(url).fetch().unwrap();

    let expected = json!({"title": "x", "items": [1, 2], "meta": {"ok": true}});
    assert_eq!(record.fields(), expected.as_object().unwrap());
}

#[test]
fn fetch_keeps_field_order() {
    let url = serve_once(200, r#"{"z":1,"a":2}"#);
    let record = fetcher_for(url).fetch().unwrap();

    let keys: Vec<&str> = record.fields().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["z", "a"]);
}

#[test]
fn fetch_rejects_non_200_statuses() {
    for status in [201u16, 404, 500, 503] {
        let url = serve_once(status, r#"{"title":"x"}"#);
        match fetcher_for(url).fetch() {
            Err(FetchError::UnexpectedStatus { code }) => assert_eq!(code, status),
            other => panic!("status {}: expected unexpected-status, got {:?}", status, other),
        }
    }
}

#[test]
fn fetch_reports_malformed_json_as_decode_error() {
    let url = serve_once(200, r#"{"title": "x""#);
    assert!(matches!(
        fetcher_for(url).fetch(),
        Err(FetchError::Decode(_))
    ));
}

#[test]
fn fetch_reports_non_object_body_as_decode_error() {
    let url = serve_once(200, r#"["title","x"]"#);
    assert!(matches!(
        fetcher_for(url).fetch(),
        Err(FetchError::Decode(_))
    ));
}

#[test]
fn fetch_reports_refused_connection_as_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = fetcher_for(format!("http://{}/api/data", addr));
    assert!(matches!(fetcher.fetch(), Err(FetchError::Transport(_))));
}

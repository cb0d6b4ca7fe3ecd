use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::{Command, Output};
use std::thread;

const SUCCESS_LINE: &str = "Operation completed successfully!";

const RELAY_ENV: [&str; 11] = [
    "RELAY_SOURCE_URL",
    "RELAY_TABLE",
    "RELAY_REGION",
    "RELAY_SMTP_HOST",
    "RELAY_SMTP_PORT",
    "RELAY_SMTP_USERNAME",
    "RELAY_SMTP_PASSWORD",
    "RELAY_MAIL_FROM",
    "RELAY_MAIL_TO",
    "RELAY_SUBJECT",
    "RUST_LOG",
];

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
    });

    format!("http://{}/api/data", addr)
}

fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn run_relay(source_url: &str, smtp_port: u16) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_relay"));
    for var in RELAY_ENV {
        command.env_remove(var);
    }

    command
        .args([
            "--source-url",
            source_url,
            "--smtp-host",
            "127.0.0.1",
            "--smtp-port",
            &smtp_port.to_string(),
            "--smtp-username",
            "sender@example.com",
            "--smtp-password",
            "secret",
            "--mail-to",
            "recipient@example.com",
        ])
        .output()
        .unwrap()
}

#[test]
fn unavailable_source_exits_non_zero() {
    let url = serve_once(503, "");
    let output = run_relay(&url, closed_port());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(!stdout.contains(SUCCESS_LINE));
    assert!(stderr.contains("run failed"));
    assert!(stderr.contains("503"));
}

#[test]
fn smtp_dial_failure_exits_non_zero() {
    let url = serve_once(200, r#"{"title":"x"}"#);
    let output = run_relay(&url, closed_port());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(!stdout.contains(SUCCESS_LINE));
    assert!(stderr.contains("run failed"));
    assert!(stderr.contains("failed to send email"));
}

#[test]
fn invalid_configuration_exits_before_any_stage() {
    let output = run_relay("ftp://example.com/data", closed_port());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.is_empty());
    assert!(stderr.contains("invalid configuration"));
    assert!(!stderr.contains("run failed"));
}

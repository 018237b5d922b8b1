//! End-to-end login flow tests against a local stub backend.
//!
//! These tests stand up a minimal HTTP server on a loopback port and drive
//! the real `HttpClient` through the full login sequence, exercising the
//! wire contract rather than the in-process fake.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use camwatch::config::ApiConfig;
use camwatch::{
    Authenticator, GuardDecision, GuardState, HttpClient, RouteGuard, Scope, SessionStore,
};

/// A parsed stub request: method, path, body.
struct StubRequest {
    method: String,
    path: String,
    #[allow(dead_code)]
    body: String,
}

/// Start a stub backend that answers each request via `respond`.
///
/// The responder returns a status code and a JSON body. The server runs
/// until the test's runtime shuts down.
async fn spawn_stub<F>(respond: F) -> SocketAddr
where
    F: Fn(&StubRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };

            // Read until the end of the headers, then the announced body
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let header_end = loop {
                let n = socket.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    break None;
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = find_header_end(&buf) {
                    break Some(pos);
                }
            };
            let Some(header_end) = header_end else {
                continue;
            };

            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);

            let body_start = header_end + 4;
            while buf.len() < body_start + content_length {
                let n = socket.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            let mut request_line = head.lines().next().unwrap_or("").split_whitespace();
            let request = StubRequest {
                method: request_line.next().unwrap_or("").to_string(),
                path: request_line.next().unwrap_or("").to_string(),
                body: String::from_utf8_lossy(&buf[body_start..]).to_string(),
            };

            let (status, json) = respond(&request);
            let reason = match status {
                200 => "OK",
                401 => "Unauthorized",
                404 => "Not Found",
                _ => "Error",
            };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{json}",
                json.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    addr
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn client_for(addr: SocketAddr) -> HttpClient {
    let config = ApiConfig {
        base_url: format!("http://{addr}"),
        timeout_secs: 5,
        login_path: "/login".to_string(),
    };
    HttpClient::new(&config).unwrap()
}

fn login_body() -> String {
    serde_json::json!({
        "token": "tok-wire-123",
        "user": {
            "id": 7,
            "name": "Alice",
            "email": "alice@example.com",
            "role": "user",
            "devices": ["dev1"],
            "rtps": [],
            "password": "$2b$10$leaked-hash"
        }
    })
    .to_string()
}

fn device_body() -> String {
    serde_json::json!({
        "status": "success",
        "data": {
            "device": {
                "ip_address": "10.0.0.5",
                "rtsp_url1": "rtsp://10.0.0.5/main",
                "rtsp_url2": ""
            }
        }
    })
    .to_string()
}

#[tokio::test]
async fn full_login_flow_against_stub_backend() {
    let addr = spawn_stub(|req| match (req.method.as_str(), req.path.as_str()) {
        ("POST", "/api/auth/login") => (200, login_body()),
        ("GET", "/api/DeviceRegister/dev1") => (200, device_body()),
        _ => (404, r#"{"message":"not found"}"#.to_string()),
    })
    .await;

    let auth = Authenticator::new(client_for(addr));
    let store = SessionStore::open_in_memory().unwrap();

    let outcome = auth
        .login(&store, "alice@example.com", "secret1", true)
        .await
        .unwrap();

    assert_eq!(outcome.session.token, "tok-wire-123");
    assert_eq!(outcome.session.scope, Scope::Persistent);
    assert_eq!(outcome.session.user.role, "user");
    assert_eq!(outcome.device.device_id, "dev1");
    assert_eq!(outcome.device.ip, "10.0.0.5");

    // The server's password hash never reaches storage
    let session = store.read().unwrap().unwrap();
    assert!(session.user.password.is_none());

    let binding = store.device().unwrap().unwrap();
    assert_eq!(binding.ip, "10.0.0.5");
    assert_eq!(binding.rtsp_url1, "rtsp://10.0.0.5/main");

    let mut guard = RouteGuard::new("/login");
    assert_eq!(guard.check(&store).unwrap(), GuardDecision::Render);
    assert_eq!(guard.state(), GuardState::Authorized);
}

#[tokio::test]
async fn device_lookup_failure_rolls_back_the_session() {
    let addr = spawn_stub(|req| match (req.method.as_str(), req.path.as_str()) {
        ("POST", "/api/auth/login") => (200, login_body()),
        ("GET", "/api/DeviceRegister/dev1") => {
            (404, r#"{"message":"Device not found"}"#.to_string())
        }
        _ => (404, r#"{"message":"not found"}"#.to_string()),
    })
    .await;

    let auth = Authenticator::new(client_for(addr));
    let store = SessionStore::open_in_memory().unwrap();

    let err = auth
        .login(&store, "alice@example.com", "secret1", true)
        .await
        .unwrap_err();

    assert!(err.is_device_not_registered());
    assert!(err.to_string().contains("Device not found"));

    // The credential check succeeded, but nothing survives
    assert!(store.is_scope_empty(Scope::Persistent).unwrap());
    assert!(store.is_scope_empty(Scope::Ephemeral).unwrap());
    assert!(store.device().unwrap().is_none());

    let mut guard = RouteGuard::new("/login");
    assert!(matches!(
        guard.check(&store).unwrap(),
        GuardDecision::Redirect(_)
    ));
    assert_eq!(guard.state(), GuardState::Unauthorized);
}

#[tokio::test]
async fn rejected_credentials_surface_the_server_message() {
    let addr = spawn_stub(|req| match (req.method.as_str(), req.path.as_str()) {
        ("POST", "/api/auth/login") => {
            (401, r#"{"message":"Invalid email or password"}"#.to_string())
        }
        _ => (404, r#"{"message":"not found"}"#.to_string()),
    })
    .await;

    let auth = Authenticator::new(client_for(addr));
    let store = SessionStore::open_in_memory().unwrap();

    let err = auth
        .login(&store, "alice@example.com", "wrong", false)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Invalid email or password"));
    assert!(store.read_token().unwrap().is_none());
}

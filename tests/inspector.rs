use std::net::SocketAddr;

use request_inspector::config::Config;
use request_inspector::infrastructure::InspectorServer;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

struct RawResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RawResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

async fn spawn_server() -> (SocketAddr, oneshot::Sender<()>) {
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let server = InspectorServer::bind(&config).await.unwrap();
    let addr = server.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    tokio::spawn(server.run_until(async {
        let _ = rx.await;
    }));

    (addr, tx)
}

async fn send(addr: SocketAddr, raw: &[u8]) -> RawResponse {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();

    let mut headers = [httparse::EMPTY_HEADER; 32];
    let mut response = httparse::Response::new(&mut headers);
    let head_len = match response.parse(&buf).unwrap() {
        httparse::Status::Complete(len) => len,
        httparse::Status::Partial => panic!("incomplete response"),
    };

    RawResponse {
        status: response.code.unwrap(),
        headers: response
            .headers
            .iter()
            .map(|h| {
                (
                    h.name.to_string(),
                    String::from_utf8_lossy(h.value).into_owned(),
                )
            })
            .collect(),
        body: buf[head_len..].to_vec(),
    }
}

#[tokio::test]
async fn methods_return_success_envelope() {
    let (addr, _shutdown) = spawn_server().await;

    for (method, status) in [
        ("GET", 200),
        ("PUT", 200),
        ("DELETE", 200),
        ("PATCH", 200),
        ("POST", 201),
    ] {
        let raw = format!("{method} /api/test HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let response = send(addr, raw.as_bytes()).await;
        let body = response.json();

        assert_eq!(response.status, status, "{method}");
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], format!("{method} リクエストを受信しました"));
        assert!(body["timestamp"].is_string());
        assert_eq!(
            response.header("Content-Type"),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    }
}

#[tokio::test]
async fn content_length_matches_body_bytes() {
    let (addr, _shutdown) = spawn_server().await;

    let response = send(addr, b"GET /search?x=1&x=2&y=3 HTTP/1.1\r\n\r\n").await;
    let declared: usize = response.header("Content-Length").unwrap().parse().unwrap();

    assert_eq!(declared, response.body.len());
    // two-space indentation with non-ASCII left as is
    let text = std::str::from_utf8(&response.body).unwrap();
    assert!(text.starts_with("{\n  \"status\": \"success\",\n  \"message\": \"GET リクエストを受信しました\""));
}

#[tokio::test]
async fn auth_simulation() {
    let (addr, _shutdown) = spawn_server().await;

    let ok = send(
        addr,
        b"POST /auth HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 21\r\n\r\n{\"password\":\"secret\"}",
    )
    .await;
    assert_eq!(ok.status, 200);
    assert_eq!(ok.json(), json!({"message": "Authenticated"}));

    let wrong = send(
        addr,
        b"POST /auth HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 20\r\n\r\n{\"password\":\"wrong\"}",
    )
    .await;
    assert_eq!(wrong.status, 401);
    assert_eq!(wrong.json(), json!({"message": "Invalid password"}));

    let garbage = send(
        addr,
        b"POST /auth HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 8\r\n\r\nnot-json",
    )
    .await;
    assert_eq!(garbage.status, 400);
    assert_eq!(garbage.json(), json!({"message": "Bad Request"}));

    let missing_length = send(addr, b"POST /auth HTTP/1.1\r\n\r\n").await;
    assert_eq!(missing_length.status, 400);
}

#[tokio::test]
async fn invalid_json_on_other_routes_still_succeeds() {
    let (addr, _shutdown) = spawn_server().await;

    let response = send(
        addr,
        b"PUT /items/1 HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 9\r\n\r\n{broken:]",
    )
    .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.json()["status"], "success");
}

#[tokio::test]
async fn options_preflight() {
    let (addr, _shutdown) = spawn_server().await;

    let response = send(addr, b"OPTIONS /anything HTTP/1.1\r\nOrigin: http://example.com\r\n\r\n").await;

    assert_eq!(response.status, 204);
    assert!(response.body.is_empty());
    assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    assert_eq!(
        response.header("Access-Control-Allow-Methods"),
        Some("GET, POST, PUT, DELETE, PATCH, OPTIONS")
    );
    assert_eq!(response.header("Access-Control-Allow-Headers"), Some("*"));
}

#[tokio::test]
async fn protocol_errors_only_affect_their_connection() {
    let (addr, _shutdown) = spawn_server().await;

    let unsupported = send(addr, b"HEAD / HTTP/1.1\r\n\r\n").await;
    assert_eq!(unsupported.status, 501);
    assert_eq!(
        unsupported.json(),
        json!({"message": "Unsupported method ('HEAD')"})
    );

    let malformed = send(addr, b"GET / HTTP/1.1\r\nBad Header\r\n\r\n").await;
    assert_eq!(malformed.status, 400);

    let bad_length = send(addr, b"POST / HTTP/1.1\r\nContent-Length: -1\r\n\r\n").await;
    assert_eq!(bad_length.status, 400);

    let after = send(addr, b"GET / HTTP/1.1\r\n\r\n").await;
    assert_eq!(after.status, 200);
}

#[tokio::test]
async fn stops_accepting_after_shutdown() {
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let server = InspectorServer::bind(&config).await.unwrap();
    let addr = server.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.run_until(async {
        let _ = rx.await;
    }));

    assert_eq!(send(addr, b"GET / HTTP/1.1\r\n\r\n").await.status, 200);

    tx.send(()).unwrap();
    handle.await.unwrap().unwrap();

    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn bind_failure_is_an_error() {
    let (addr, _shutdown) = spawn_server().await;
    let config = Config {
        host: addr.ip().to_string(),
        port: addr.port(),
    };

    assert!(InspectorServer::bind(&config).await.is_err());
}

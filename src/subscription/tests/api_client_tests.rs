use super::*;
use serde_json::json;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

/// Serves a single HTTP response on a local port.
///
/// Returns the base URL and a handle yielding the raw request that was received.
fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
            head.push_str(&line);
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }

        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let mut stream = stream;
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        head + &String::from_utf8(request_body).unwrap()
    });

    (url, handle)
}

#[tokio::test]
async fn test_post_json_sends_json_body() {
    let (base, server) = serve_once("200 OK", r#"{"plan":{"type":"professional"}}"#);
    let api = HttpSubscriptionApi::new();

    let response = api
        .post_json(
            &format!("{}/subscription/connect", base),
            &json!({"email": "ada@x.com", "oid": "owner-1"}),
        )
        .await
        .unwrap();

    assert_eq!(response, json!({"plan": {"type": "professional"}}));

    let request = server.join().unwrap();
    let lowered = request.to_lowercase();
    assert!(lowered.starts_with("post /subscription/connect http/1.1"));
    assert!(lowered.contains("content-type: application/json"));
    assert!(lowered.contains("user-agent: peerdraft-settings/"));
    assert!(request.contains(r#""email":"ada@x.com""#));
    assert!(request.contains(r#""oid":"owner-1""#));
}

#[tokio::test]
async fn test_post_json_error_status() {
    let (base, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#);
    let api = HttpSubscriptionApi::new();

    let err = api.post_json(&base, &json!({"oid": "owner-1"})).await.unwrap_err();

    assert_eq!(err, ReconcileError::Status { code: 500 });
    server.join().unwrap();
}

#[tokio::test]
async fn test_post_json_non_json_body() {
    let (base, server) = serve_once("200 OK", "<html>maintenance</html>");
    let api = HttpSubscriptionApi::new();

    let err = api.post_json(&base, &json!({"oid": "owner-1"})).await.unwrap_err();

    assert!(matches!(err, ReconcileError::InvalidResponse { .. }));
    server.join().unwrap();
}

#[tokio::test]
async fn test_post_json_connection_refused() {
    let url = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };
    let api = HttpSubscriptionApi::with_timeout(Duration::from_secs(2));

    let err = api.post_json(&url, &json!({"oid": "owner-1"})).await.unwrap_err();

    assert!(matches!(err, ReconcileError::Transport { .. }));
}

#[test]
fn test_user_agent_mentions_version() {
    let agent = user_agent();
    assert!(agent.starts_with(&format!("peerdraft-settings/{}", env!("CARGO_PKG_VERSION"))));
}

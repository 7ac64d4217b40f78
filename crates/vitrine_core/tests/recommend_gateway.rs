use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;
use uuid::Uuid;
use vitrine_core::{GatewayError, HttpRecommendationGateway, RecommendationGateway};

const CLIENT_TIMEOUT: Duration = Duration::from_millis(500);

#[test]
fn count_bounds_are_checked_before_any_network_activity() {
    // Port 9 is discard; nothing listens there in the test environment,
    // so reaching the network would surface as a transport error instead.
    let gateway =
        HttpRecommendationGateway::new("http://127.0.0.1:9", CLIENT_TIMEOUT).unwrap();

    let too_small = gateway.recommend(&[0.5], 0).unwrap_err();
    assert!(matches!(too_small, GatewayError::CountOutOfRange(0)));

    let too_large = gateway.recommend(&[0.5], 101).unwrap_err();
    assert!(matches!(too_large, GatewayError::CountOutOfRange(101)));
}

#[test]
fn returns_identifiers_in_upstream_order() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let body = format!(r#"{{"product_ids":["{first}","{second}"]}}"#);
    let base_url = spawn_stub("HTTP/1.1 200 OK", body);

    let gateway = HttpRecommendationGateway::new(base_url, CLIENT_TIMEOUT).unwrap();
    let ids = gateway.recommend(&[0.1, 0.2, 0.3], 5).unwrap();

    assert_eq!(ids, vec![first, second]);
}

#[test]
fn more_identifiers_than_requested_is_malformed() {
    let ids: Vec<String> = (0..3).map(|_| format!(r#""{}""#, Uuid::new_v4())).collect();
    let body = format!(r#"{{"product_ids":[{}]}}"#, ids.join(","));
    let base_url = spawn_stub("HTTP/1.1 200 OK", body);

    let gateway = HttpRecommendationGateway::new(base_url, CLIENT_TIMEOUT).unwrap();
    let err = gateway.recommend(&[0.1], 2).unwrap_err();

    assert!(matches!(err, GatewayError::MalformedResponse(_)));
}

#[test]
fn unparseable_identifier_is_malformed() {
    let base_url = spawn_stub(
        "HTTP/1.1 200 OK",
        r#"{"product_ids":["not-a-uuid"]}"#.to_string(),
    );

    let gateway = HttpRecommendationGateway::new(base_url, CLIENT_TIMEOUT).unwrap();
    let err = gateway.recommend(&[0.1], 1).unwrap_err();

    assert!(matches!(err, GatewayError::MalformedResponse(_)));
}

#[test]
fn non_json_body_is_malformed() {
    let base_url = spawn_stub("HTTP/1.1 200 OK", "<html>ranker down</html>".to_string());

    let gateway = HttpRecommendationGateway::new(base_url, CLIENT_TIMEOUT).unwrap();
    let err = gateway.recommend(&[0.1], 1).unwrap_err();

    assert!(matches!(err, GatewayError::MalformedResponse(_)));
}

#[test]
fn upstream_error_status_is_surfaced() {
    let base_url = spawn_stub(
        "HTTP/1.1 503 Service Unavailable",
        r#"{"error":"overloaded"}"#.to_string(),
    );

    let gateway = HttpRecommendationGateway::new(base_url, CLIENT_TIMEOUT).unwrap();
    let err = gateway.recommend(&[0.1], 1).unwrap_err();

    assert!(matches!(err, GatewayError::UpstreamStatus(503)));
}

#[test]
fn calls_never_outlive_the_configured_timeout() {
    let base_url = spawn_sleepy_stub(Duration::from_secs(5));

    let gateway =
        HttpRecommendationGateway::new(base_url, Duration::from_millis(150)).unwrap();
    let err = gateway.recommend(&[0.1], 1).unwrap_err();

    match err {
        GatewayError::Transport(inner) => assert!(inner.is_timeout()),
        other => panic!("expected transport timeout, got {other}"),
    }
}

/// Binds a loopback listener that answers exactly one request with the
/// given status line and JSON body.
fn spawn_stub(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            respond(&stream, status_line, &body);
        }
    });

    format!("http://{addr}")
}

/// Binds a loopback listener that reads the request, then stalls well past
/// any client timeout used in these tests.
fn spawn_sleepy_stub(delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            read_request(&stream);
            thread::sleep(delay);
        }
    });

    format!("http://{addr}")
}

fn respond(mut stream: &TcpStream, status_line: &str, body: &str) {
    read_request(stream);
    let response = format!(
        "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
}

fn read_request(stream: &TcpStream) {
    let mut reader = BufReader::new(stream);
    let mut content_length = 0usize;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            return;
        }
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
        if line == "\r\n" {
            break;
        }
    }

    let mut body = vec![0_u8; content_length];
    let _ = reader.read_exact(&mut body);
}

//! End-to-end tests of the identification workflow against a canned
//! classifier endpoint.

use mycoscan::session::{Classifier, IdentificationSession, Phase, SelectImageError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const RESULT_BODY: &str = r#"{
  "confidence": 0.92,
  "name": "Amanita muscaria",
  "desc": "Iconic red cap with white spots.",
  "region": "Temperate forests",
  "edibility": "Toxic"
}"#;

fn image_fixture(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("specimen.jpg");
    std::fs::write(&path, b"\xff\xd8\xff fake jpeg payload").unwrap();
    path
}

/// Serve canned HTTP responses, counting accepted connections.
async fn spawn_classifier(
    status_line: &'static str,
    body: &'static str,
    response_delay: Duration,
) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let connections = Arc::new(AtomicUsize::new(0));

    let served = Arc::clone(&connections);
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            served.fetch_add(1, Ordering::SeqCst);

            let mut request = Vec::new();
            let mut buf = [0u8; 16384];
            while !request_complete(&request) {
                let Ok(n) = socket.read(&mut buf).await else {
                    break;
                };
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            tokio::time::sleep(response_delay).await;

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{}", addr), connections)
}

fn request_complete(data: &[u8]) -> bool {
    let Some(header_end) = data
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
    else {
        return false;
    };

    let headers = String::from_utf8_lossy(&data[..header_end]);
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    data.len() >= header_end + 4 + content_length
}

/// An endpoint that refuses connections.
async fn refused_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn scenario_successful_identification() {
    let dir = tempfile::tempdir().unwrap();
    let image = image_fixture(&dir);
    let (endpoint, connections) = spawn_classifier("200 OK", RESULT_BODY, Duration::ZERO).await;

    let session = IdentificationSession::new(Classifier::new(endpoint));
    session.select_image(&image).unwrap();
    session.analyze().await;

    assert_eq!(session.phase(), Phase::Resolved);
    let result = session.result().expect("resolved session has a result");
    assert_eq!(result.name, "Amanita muscaria");
    assert_eq!(result.desc, "Iconic red cap with white spots.");
    assert_eq!(result.region, "Temperate forests");
    assert_eq!(result.edibility, "Toxic");
    assert!((result.confidence - 0.92).abs() < f64::EPSILON);

    // Result and error are mutually exclusive.
    assert!(session.error().is_none());
    assert_eq!(connections.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn scenario_connection_refused_then_reset() {
    let dir = tempfile::tempdir().unwrap();
    let image = image_fixture(&dir);
    let endpoint = refused_endpoint().await;

    let session = IdentificationSession::new(Classifier::new(endpoint));
    session.select_image(&image).unwrap();
    session.analyze().await;

    assert_eq!(session.phase(), Phase::Failed);
    let message = session.error().expect("failed session has a message");
    assert!(!message.is_empty());
    assert!(session.result().is_none());

    session.reset();
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.error().is_none());
    assert!(session.selected_image().is_none());
}

#[tokio::test]
async fn server_error_status_fails_the_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let image = image_fixture(&dir);
    let (endpoint, _) = spawn_classifier(
        "500 Internal Server Error",
        r#"{"error": "Model not loaded"}"#,
        Duration::ZERO,
    )
    .await;

    let session = IdentificationSession::new(Classifier::new(endpoint));
    session.select_image(&image).unwrap();
    session.analyze().await;

    assert_eq!(session.phase(), Phase::Failed);
    assert!(session.error().unwrap().contains("500"));
}

#[tokio::test]
async fn malformed_success_body_fails_the_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let image = image_fixture(&dir);
    let (endpoint, _) = spawn_classifier("200 OK", "surprise, not json", Duration::ZERO).await;

    let session = IdentificationSession::new(Classifier::new(endpoint));
    session.select_image(&image).unwrap();
    session.analyze().await;

    assert_eq!(session.phase(), Phase::Failed);
    assert!(session.result().is_none());
    assert!(session.error().is_some());
}

#[tokio::test]
async fn second_analyze_while_in_flight_issues_no_request() {
    let dir = tempfile::tempdir().unwrap();
    let image = image_fixture(&dir);
    let (endpoint, connections) =
        spawn_classifier("200 OK", RESULT_BODY, Duration::from_millis(300)).await;

    let session = Arc::new(IdentificationSession::new(Classifier::new(endpoint)));
    session.select_image(&image).unwrap();

    let in_flight = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.analyze().await })
    };

    while session.phase() != Phase::Analyzing {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // Re-entrant call: returns immediately, no second submission.
    session.analyze().await;
    assert_eq!(session.phase(), Phase::Analyzing);

    // Selecting a new image is also rejected while in flight.
    assert!(matches!(
        session.select_image(&image),
        Err(SelectImageError::AnalysisInFlight)
    ));

    in_flight.await.unwrap();
    assert_eq!(session.phase(), Phase::Resolved);
    assert_eq!(connections.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn reset_during_analysis_drops_the_stale_completion() {
    let dir = tempfile::tempdir().unwrap();
    let image = image_fixture(&dir);
    let (endpoint, _) =
        spawn_classifier("200 OK", RESULT_BODY, Duration::from_millis(300)).await;

    let session = Arc::new(IdentificationSession::new(Classifier::new(endpoint)));
    session.select_image(&image).unwrap();

    let in_flight = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.analyze().await })
    };

    while session.phase() != Phase::Analyzing {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    session.reset();
    assert_eq!(session.phase(), Phase::Idle);

    in_flight.await.unwrap();

    // The response arrived after the reset; it must not resurrect the attempt.
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.result().is_none());
    assert!(session.error().is_none());
}

#[tokio::test]
async fn reset_is_idempotent_from_every_reachable_state() {
    let dir = tempfile::tempdir().unwrap();
    let image = image_fixture(&dir);
    let (endpoint, _) = spawn_classifier("200 OK", RESULT_BODY, Duration::ZERO).await;

    let session = IdentificationSession::new(Classifier::new(endpoint));

    // From Idle.
    session.reset();
    assert_eq!(session.phase(), Phase::Idle);

    // From Selected.
    session.select_image(&image).unwrap();
    session.reset();
    assert_eq!(session.phase(), Phase::Idle);

    // From Resolved.
    session.select_image(&image).unwrap();
    session.analyze().await;
    assert_eq!(session.phase(), Phase::Resolved);
    session.reset();
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.result().is_none());
    assert!(session.error().is_none());
    assert!(session.selected_image().is_none());
}

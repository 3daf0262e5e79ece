// End-to-end pipeline test: probe -> alert decision -> composed report
//
// Uses local listeners only; the timestamp line is the one
// non-deterministic part and is matched structurally.

use chrono::Utc;
use pulsecheck::{AlertDecisionEngine, HealthRunner, ReportComposer, TargetHealthChecker};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

async fn spawn_http_server(response: &'static str) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    addr
}

#[tokio::test]
async fn test_mixed_batch_renders_ping_and_per_target_lines() {
    let healthy = spawn_http_server(
        "HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
    )
    .await;
    let failing = spawn_http_server(
        "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
    )
    .await;

    let healthy_url = format!("http://{}/", healthy);
    let failing_url = format!("http://{}/", failing);
    let targets = vec![healthy_url.clone(), failing_url.clone()];

    let checker =
        TargetHealthChecker::new(2, Duration::from_millis(10), Duration::from_secs(2)).unwrap();
    let runner = HealthRunner::new(checker, 2);
    let checks = runner.run(&targets).await;

    let engine = AlertDecisionEngine::new(7);
    let now = Utc::now();
    let should_ping = engine.should_ping(&checks, now);
    assert!(should_ping, "a 500 target must trigger the ping");

    let composer = ReportComposer::new(vec!["U1".to_string()], 1);
    let report = composer.compose(&checks, should_ping, &engine, now);

    let lines: Vec<&str> = report.split('\n').collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "<@U1>");
    assert!(lines[1].starts_with("> "));
    assert_eq!(lines[1].len(), "> 2026-03-14 09:26:53".len());
    assert_eq!(lines[2], format!("{} 200", healthy_url));
    assert_eq!(
        lines[3],
        format!(
            "{} __500, 500__ (interval between each attempt was 1 second)",
            failing_url
        )
    );
}

#[tokio::test]
async fn test_all_healthy_batch_renders_empty_ping_line() {
    let healthy = spawn_http_server(
        "HTTP/1.1 204 No Content\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
    )
    .await;
    let url = format!("http://{}/", healthy);

    let checker =
        TargetHealthChecker::new(1, Duration::from_millis(10), Duration::from_secs(2)).unwrap();
    let runner = HealthRunner::new(checker, 1);
    let checks = runner.run(std::slice::from_ref(&url)).await;

    let engine = AlertDecisionEngine::new(7);
    let now = Utc::now();
    let should_ping = engine.should_ping(&checks, now);
    assert!(!should_ping);

    let composer = ReportComposer::new(vec!["U1".to_string()], 1);
    let report = composer.compose(&checks, should_ping, &engine, now);

    let lines: Vec<&str> = report.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "");
    assert_eq!(lines[2], format!("{} 204", url));
}

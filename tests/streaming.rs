//! End-to-end tests for the event-stream routes.

use std::time::{Duration, Instant};

use axum::http::{header, StatusCode};
use futures_util::StreamExt;

mod common;

const ALL_EVENTS: &str = "data: event 0\n\ndata: event 1\n\ndata: event 2\n\n";

#[tokio::test]
async fn kitchen_events_arrive_as_they_are_emitted() {
    let backend = common::start_mock_backend().await;
    let (proxy, _shutdown) = common::start_proxy(&backend.base_url()).await;

    let res = common::client()
        .get(format!("http://{}/kitchen/stream", proxy))
        .header(header::AUTHORIZATION, "Bearer kitchen")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/event-stream");
    assert_eq!(res.headers()[header::CACHE_CONTROL], "no-cache");

    let mut chunks = Vec::new();
    let mut body = res.bytes_stream();
    while let Some(chunk) = body.next().await {
        chunks.push((Instant::now(), chunk.unwrap()));
    }

    assert!(chunks.len() >= 3, "events were coalesced: {:?}", chunks);
    assert!(String::from_utf8_lossy(&chunks[0].1).starts_with("data: event 0"));
    assert!(!String::from_utf8_lossy(&chunks[0].1).contains("event 2"));

    let spread = chunks[chunks.len() - 1].0 - chunks[0].0;
    assert!(spread >= common::EVENT_INTERVAL, "stream was buffered: {:?}", spread);

    let received: Vec<u8> = chunks.iter().flat_map(|(_, c)| c.iter().copied()).collect();
    assert_eq!(received, ALL_EVENTS.as_bytes());

    assert_eq!(backend.last().headers[header::AUTHORIZATION], "Bearer kitchen");
}

#[tokio::test]
async fn first_order_event_precedes_end_of_stream() {
    let backend = common::start_mock_backend().await;
    let (proxy, _shutdown) = common::start_proxy(&backend.base_url()).await;

    let res = common::client()
        .get(format!("http://{}/orders/42/stream", proxy))
        .header(header::AUTHORIZATION, "Bearer customer")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let mut body = res.bytes_stream();
    let first = tokio::time::timeout(Duration::from_secs(2), body.next())
        .await
        .expect("no event received")
        .unwrap()
        .unwrap();
    assert_eq!(&first[..], b"data: event 0\n\n");

    let seen = backend.last();
    assert_eq!(seen.uri.path(), "/orders/42/stream");
    assert!(seen.headers.get(header::AUTHORIZATION).is_none());
}

#[tokio::test]
async fn client_disconnect_mid_stream_leaves_proxy_serving() {
    let backend = common::start_mock_backend().await;
    let (proxy, _shutdown) = common::start_proxy(&backend.base_url()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/kitchen/stream", proxy))
        .send()
        .await
        .unwrap();
    let mut body = res.bytes_stream();
    body.next().await.unwrap().unwrap();
    drop(body);

    let res = tokio::time::timeout(
        Duration::from_secs(2),
        client.get(format!("http://{}/menu", proxy)).send(),
    )
    .await
    .expect("proxy stopped answering")
    .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "ok");
}

//! End-to-end tests for the relay over loopback TCP.
//!
//! Each test starts the proxy accept loop on an ephemeral port and one or
//! more throwaway origin servers.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{routing::get, Router};
use caching_proxy::cache::CacheStore;
use caching_proxy::{serve, SharedCache, TcpConnector};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::time::timeout;

// == Helper Functions ==

struct Proxy {
    addr: SocketAddr,
    cache: SharedCache,
    _stop: oneshot::Sender<()>,
}

async fn start_proxy(max_cache_size: usize, max_object_size: usize) -> Proxy {
    let cache = SharedCache::new(CacheStore::new(max_cache_size, max_object_size));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    tokio::spawn(serve(listener, cache.clone(), Arc::new(TcpConnector), async move {
        let _ = stopped.await;
    }));

    Proxy {
        addr,
        cache,
        _stop: stop,
    }
}

/// Origin that answers every connection with the same bytes.
struct Origin {
    port: u16,
    connections: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

async fn start_origin(response: Vec<u8>) -> Origin {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let connections = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let (conn_count, log) = (Arc::clone(&connections), Arc::clone(&requests));
    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            conn_count.fetch_add(1, Ordering::SeqCst);
            let response = response.clone();
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                let mut reader = BufReader::new(socket);
                let mut request = String::new();
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                        break;
                    }
                    request.push_str(&line);
                    if line == "\r\n" {
                        break;
                    }
                }
                log.lock().unwrap().push(request);

                let mut socket = reader.into_inner();
                let _ = socket.write_all(&response).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    Origin {
        port,
        connections,
        requests,
    }
}

/// Origin that accepts connections and never answers.
async fn start_silent_origin() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    port
}

async fn fetch(proxy: SocketAddr, request: &str) -> Vec<u8> {
    let mut stream = TcpStream::connect(proxy).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    timeout(Duration::from_secs(10), stream.read_to_end(&mut response))
        .await
        .expect("proxy did not close the connection")
        .unwrap();
    response
}

fn http_response(body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.0 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    )
    .into_bytes()
}

fn large_body(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("line {:05} of a response that will not fit the object limit\n", i))
        .collect()
}

// == Relay Tests ==

#[tokio::test]
async fn test_miss_then_hit_contacts_origin_once() {
    let proxy = start_proxy(1_049_000, 102_400).await;
    let response = http_response("<html>hello</html>");
    let origin = start_origin(response.clone()).await;
    let request = format!("GET http://127.0.0.1:{}/a.html HTTP/1.0\r\n\r\n", origin.port);

    let first = fetch(proxy.addr, &request).await;
    let second = fetch(proxy.addr, &request).await;

    assert_eq!(first, response);
    assert_eq!(second, response);
    assert_eq!(origin.connections.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cached_bytes_equal_delivered_bytes() {
    let proxy = start_proxy(1_049_000, 102_400).await;
    let origin = start_origin(http_response("pass-through fidelity")).await;
    let request = format!("GET http://127.0.0.1:{}/f HTTP/1.0\r\n\r\n", origin.port);

    let delivered = fetch(proxy.addr, &request).await;
    let cached = proxy
        .cache
        .lookup(&format!("http://127.0.0.1:{}/f", origin.port))
        .await;

    assert_eq!(cached, Some(delivered));
}

#[tokio::test]
async fn test_host_header_is_synthesized() {
    let proxy = start_proxy(1_049_000, 102_400).await;
    let origin = start_origin(http_response("ok")).await;

    fetch(
        proxy.addr,
        &format!(
            "GET http://127.0.0.1:{}/a.html HTTP/1.0\r\nUser-Agent: test-client\r\n\r\n",
            origin.port
        ),
    )
    .await;

    let requests = origin.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET /a.html HTTP/1.0\r\nHost: 127.0.0.1\r\n"));
    assert!(requests[0].contains("Proxy-Connection: close\r\n"));
    assert!(!requests[0].contains("test-client"));
}

#[tokio::test]
async fn test_equivalent_request_forms_share_entry() {
    let proxy = start_proxy(1_049_000, 102_400).await;
    let origin = start_origin(http_response("same object")).await;

    let a = fetch(
        proxy.addr,
        &format!("GET http://127.0.0.1:{}/x HTTP/1.0\r\n\r\n", origin.port),
    )
    .await;
    let b = fetch(
        proxy.addr,
        &format!("GET 127.0.0.1:{}/x HTTP/1.0\r\nHost: 127.0.0.1\r\n\r\n", origin.port),
    )
    .await;

    assert_eq!(a, b);
    assert_eq!(origin.connections.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_oversized_response_is_streamed_not_cached() {
    let proxy = start_proxy(1000, 400).await;
    let response = http_response(&large_body(200));
    let origin = start_origin(response.clone()).await;
    let request = format!("GET http://127.0.0.1:{}/big HTTP/1.0\r\n\r\n", origin.port);

    let first = fetch(proxy.addr, &request).await;
    let second = fetch(proxy.addr, &request).await;

    assert_eq!(first, response);
    assert_eq!(second, response);
    assert_eq!(origin.connections.load(Ordering::SeqCst), 2);
    assert_eq!(proxy.cache.stats().await.total_entries, 0);
}

#[tokio::test]
async fn test_lru_eviction_across_requests() {
    // Each response is 300 bytes; three fit in 1000, a fourth evicts the oldest.
    let proxy = start_proxy(1000, 400).await;
    let mut response = http_response("");
    response.resize(300, b'.');
    let origin = start_origin(response).await;

    for path in ["a", "b", "c", "d"] {
        fetch(
            proxy.addr,
            &format!("GET http://127.0.0.1:{}/{} HTTP/1.0\r\n\r\n", origin.port, path),
        )
        .await;
    }

    let cached: Vec<String> = proxy
        .cache
        .snapshot()
        .await
        .into_iter()
        .map(|e| e.uri)
        .collect();
    let key = |p: &str| format!("http://127.0.0.1:{}/{}", origin.port, p);
    assert_eq!(cached, vec![key("d"), key("c"), key("b")]);
    assert_eq!(proxy.cache.stats().await.total_bytes, 900);
}

#[tokio::test]
async fn test_non_get_method_gets_no_response() {
    let proxy = start_proxy(1_049_000, 102_400).await;
    let origin = start_origin(http_response("never")).await;

    let response = fetch(
        proxy.addr,
        &format!("POST http://127.0.0.1:{}/form HTTP/1.0\r\n\r\n", origin.port),
    )
    .await;

    assert!(response.is_empty());
    assert_eq!(origin.connections.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unreachable_origin_gets_no_response() {
    let proxy = start_proxy(1_049_000, 102_400).await;
    let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = closed.local_addr().unwrap().port();
    drop(closed);

    let response = fetch(
        proxy.addr,
        &format!("GET http://127.0.0.1:{}/ HTTP/1.0\r\n\r\n", port),
    )
    .await;

    assert!(response.is_empty());
}

#[tokio::test]
async fn test_stalled_origin_does_not_block_other_connections() {
    let proxy = start_proxy(1_049_000, 102_400).await;
    let silent_port = start_silent_origin().await;
    let origin = start_origin(http_response("still serving")).await;

    let mut stalled = TcpStream::connect(proxy.addr).await.unwrap();
    stalled
        .write_all(format!("GET http://127.0.0.1:{}/ HTTP/1.0\r\n\r\n", silent_port).as_bytes())
        .await
        .unwrap();

    let response = timeout(
        Duration::from_secs(5),
        fetch(
            proxy.addr,
            &format!("GET http://127.0.0.1:{}/ok HTTP/1.0\r\n\r\n", origin.port),
        ),
    )
    .await
    .expect("second connection was blocked by the stalled one");

    assert_eq!(response, http_response("still serving"));
    drop(stalled);
}

// == Real HTTP client through the proxy ==

#[tokio::test]
async fn test_reqwest_through_proxy_with_axum_origin() {
    let proxy = start_proxy(1_049_000, 102_400).await;

    let app = Router::new().route("/hello", get(|| async { "hello world" }));
    let origin = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let origin_port = origin.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(origin, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .proxy(reqwest::Proxy::http(format!("http://{}", proxy.addr)).unwrap())
        .pool_max_idle_per_host(0)
        .build()
        .unwrap();
    let url = format!("http://127.0.0.1:{}/hello", origin_port);

    let body = client.get(&url).send().await.unwrap().text().await.unwrap();
    assert_eq!(body, "hello world");

    let entry = proxy
        .cache
        .snapshot()
        .await
        .into_iter()
        .find(|e| e.uri == url);
    assert!(entry.is_some(), "response should have been cached under {}", url);

    let again = client.get(&url).send().await.unwrap().text().await.unwrap();
    assert_eq!(again, "hello world");
    assert_eq!(proxy.cache.stats().await.hits, 1);
}

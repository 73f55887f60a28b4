//! End-to-end tests over real TCP sockets.

use std::net::SocketAddr;

use kastle::http::request::Request;
use kastle::http::response::Response;
use kastle::router::Router;
use kastle::server::Server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn about(_req: Request) -> anyhow::Result<Response> {
    Ok(Response::ok("OK"))
}

async fn users(_req: Request) -> anyhow::Result<Response> {
    Ok(Response::ok("users"))
}

async fn start() -> SocketAddr {
    let mut router = Router::new();
    router.get("/about", about).unwrap();

    let mut api = Router::new();
    api.get("/users", users).unwrap();

    let mut server = Server::new(router);
    server.add_router("/api", &api).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.run(listener));
    addr
}

async fn send_request(addr: SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_serves_registered_route() {
    let addr = start().await;

    let response = send_request(addr, b"GET /about HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert_eq!(response, "HTTP/1.1 200 OK\r\nContent-Length:2\r\n\r\nOK");
}

#[tokio::test]
async fn test_serves_mounted_route() {
    let addr = start().await;

    let response = send_request(addr, b"GET /api/users HTTP/1.1\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.ends_with("\r\n\r\nusers"));
}

#[tokio::test]
async fn test_unknown_route() {
    let addr = start().await;

    let response = send_request(addr, b"GET / HTTP/1.1\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

#[tokio::test]
async fn test_wrong_version() {
    let addr = start().await;

    let response = send_request(addr, b"GET /about HTTP/2.0\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 505 HTTP Version Not Supported\r\n"));
}

#[tokio::test]
async fn test_failed_connection_does_not_stop_server() {
    let addr = start().await;

    let response = send_request(addr, b"GARBAGE\r\n").await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));

    // A connection that goes away without a request.
    drop(TcpStream::connect(addr).await.unwrap());

    let response = send_request(addr, b"GET /about HTTP/1.1\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
}

#[tokio::test]
async fn test_concurrent_connections() {
    let addr = start().await;

    // Hold one connection open mid-request while others complete.
    let mut stalled = TcpStream::connect(addr).await.unwrap();
    stalled.write_all(b"GET /about HTTP/1.1\r\n").await.unwrap();

    let requests: Vec<_> = (0..8)
        .map(|_| {
            tokio::spawn(async move { send_request(addr, b"GET /about HTTP/1.1\r\n\r\n").await })
        })
        .collect();

    for handle in requests {
        let response = handle.await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    }

    stalled.write_all(b"\r\n").await.unwrap();
    let mut response = Vec::new();
    stalled.read_to_end(&mut response).await.unwrap();
    assert!(response.starts_with(b"HTTP/1.1 200 OK\r\n"));
}

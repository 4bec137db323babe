//! Tests de integración para el servidor de archivos
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor sobre un directorio temporal y un
//! puerto efímero, así que se pueden correr en paralelo.

use static_server::config::ServerConfig;
use static_server::server::{Server, ServerState};
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Respuesta cruda separada en cabecera y body
struct RawResponse {
    head: String,
    body: Vec<u8>,
}

impl RawResponse {
    fn status_line(&self) -> &str {
        self.head.lines().next().unwrap_or("")
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }
}

fn start_server(files: &[(&str, &[u8])]) -> (TempDir, Server, SocketAddr) {
    let dir = tempfile::tempdir().expect("tempdir");
    for (name, contents) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    let config = ServerConfig::with_ephemeral_port(dir.path()).expect("config");
    let mut server = Server::new(config);
    let addr = server.start().expect("start");
    (dir, server, addr)
}

/// Helper: envía un request HTTP y retorna la response completa
fn send_raw(addr: SocketAddr, raw: &[u8]) -> Result<RawResponse, Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(addr)?;
    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    stream.set_write_timeout(Some(Duration::from_secs(5)))?;

    stream.write_all(raw)?;
    stream.flush()?;

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf)?;

    let split = buf
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or("response without blank line")?;

    Ok(RawResponse {
        head: String::from_utf8_lossy(&buf[..split]).into_owned(),
        body: buf[split + 4..].to_vec(),
    })
}

fn get(addr: SocketAddr, path: &str) -> RawResponse {
    let request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", path);
    send_raw(addr, request.as_bytes()).expect("Failed to send request")
}

#[test]
fn test_index_html_served_at_root() {
    let (_dir, mut server, addr) = start_server(&[("index.html", &b"hello world!"[..])]);

    let response = get(addr, "/");
    assert_eq!(response.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(response.header("Content-Type"), Some("text/html"));
    assert_eq!(response.header("Content-Length"), Some("12"));
    assert!(response.header("Date").is_some());
    assert!(response.header("Last-Modified").is_some());
    assert_eq!(response.body, b"hello world!");

    server.stop();
}

#[test]
fn test_index_fallback_order() {
    let (dir, mut server, addr) = start_server(&[
        ("index.html", &b"index.html"[..]),
        ("index.htm", &b"index.htm"[..]),
        ("default.html", &b"default.html"[..]),
        ("default.htm", &b"default.htm"[..]),
    ]);

    for name in ["index.html", "index.htm", "default.html", "default.htm"] {
        assert_eq!(get(addr, "/").body, name.as_bytes());
        fs::remove_file(dir.path().join(name)).unwrap();
    }

    let response = get(addr, "/");
    assert!(response.status_line().contains("404"));
    assert!(response.body.is_empty());

    server.stop();
}

#[test]
fn test_missing_file_is_404() {
    let (_dir, mut server, addr) = start_server(&[("a.png", &b"\x89PNG"[..])]);

    let response = get(addr, "/missing.png");
    assert_eq!(response.status_line(), "HTTP/1.1 404 Not Found");
    assert_eq!(response.header("Content-Length"), Some("0"));
    assert!(response.body.is_empty());

    server.stop();
}

#[test]
fn test_binary_file_is_byte_identical() {
    let data: Vec<u8> = (0..100_000u32).map(|i| (i * 7 % 256) as u8).collect();
    let (_dir, mut server, addr) = start_server(&[("assets/blob.bin", &data[..])]);

    let response = get(addr, "/assets/blob.bin");
    assert_eq!(response.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(response.header("Content-Type"), Some("application/octet-stream"));
    assert_eq!(response.header("Content-Length"), Some("100000"));
    assert_eq!(response.body, data);

    server.stop();
}

#[test]
fn test_uppercase_extension_mime() {
    let (_dir, mut server, addr) = start_server(&[("LOGO.PNG", &b"\x89PNG"[..])]);

    let response = get(addr, "/LOGO.PNG");
    assert_eq!(response.header("Content-Type"), Some("image/png"));

    server.stop();
}

#[test]
fn test_percent_encoded_path() {
    let (_dir, mut server, addr) = start_server(&[("mi archivo.txt", &b"espacios"[..])]);

    let response = get(addr, "/mi%20archivo.txt?x=1");
    assert_eq!(response.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(response.header("Content-Type"), Some("text/plain"));
    assert_eq!(response.body, b"espacios");

    server.stop();
}

#[test]
fn test_path_traversal_is_404() {
    let outer = tempfile::tempdir().unwrap();
    fs::write(outer.path().join("secret.txt"), b"secret").unwrap();
    let www = outer.path().join("www");
    fs::create_dir(&www).unwrap();

    let mut server = Server::new(ServerConfig::with_ephemeral_port(&www).unwrap());
    let addr = server.start().unwrap();

    for path in ["/../secret.txt", "/%2e%2e/secret.txt", "/./../secret.txt"] {
        let response = get(addr, path);
        assert!(response.status_line().contains("404"), "{} → {}", path, response.status_line());
        assert!(response.body.is_empty());
    }

    server.stop();
}

#[test]
fn test_post_behaves_like_get() {
    let (_dir, mut server, addr) = start_server(&[("index.html", &b"hello world!"[..])]);

    let response = send_raw(addr, b"POST / HTTP/1.1\r\nContent-Length: 0\r\n\r\n").unwrap();
    assert_eq!(response.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(response.body, b"hello world!");

    server.stop();
}

#[test]
fn test_post_with_binary_body() {
    let (_dir, mut server, addr) = start_server(&[("index.html", &b"hello world!"[..])]);

    let response = send_raw(addr, b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\n\xff\xfe").unwrap();
    assert_eq!(response.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(response.body, b"hello world!");

    server.stop();
}

#[test]
fn test_restart_on_same_port() {
    let (dir, mut server, addr) = start_server(&[("index.html", &b"hi"[..])]);
    assert_eq!(get(addr, "/").body, b"hi");
    server.stop();

    let config = ServerConfig::new(dir.path(), addr.port()).unwrap();
    let mut again = Server::new(config);
    let addr = again.start().expect("port should be free after stop()");
    assert_eq!(get(addr, "/").body, b"hi");

    again.stop();
}

#[test]
fn test_malformed_request_keeps_server_alive() {
    let (_dir, mut server, addr) = start_server(&[("index.html", &b"ok"[..])]);

    let response = send_raw(addr, b"GARBAGE\r\n\r\n").unwrap();
    assert!(response.status_line().contains("400"));

    let response = get(addr, "/");
    assert_eq!(response.body, b"ok");

    server.stop();
}

#[test]
fn test_concurrent_clients() {
    let data = vec![b'x'; 256 * 1024];
    let (_dir, mut server, addr) = start_server(&[("big.txt", &data[..])]);

    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(move || get(addr, "/big.txt")))
        .collect();

    for handle in handles {
        let response = handle.join().unwrap();
        assert_eq!(response.status_line(), "HTTP/1.1 200 OK");
        assert_eq!(response.body.len(), 256 * 1024);
    }

    server.stop();
}

#[test]
fn test_stop_refuses_new_connections() {
    let (_dir, mut server, addr) = start_server(&[("index.html", &b"hi"[..])]);
    assert_eq!(server.state(), ServerState::Listening);

    let started = Instant::now();
    server.stop();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(server.state(), ServerState::Stopped);

    assert!(TcpStream::connect(addr).is_err());

    server.dispose();
}

//! Loopback HTTP stub for exercising the Google adapters.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use url::Url;

/// Canned reply produced for each request.
pub struct StubReply {
    pub status: u16,
    pub body: String,
}

impl StubReply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

type Handler = dyn Fn(&Url) -> StubReply + Send + Sync;

/// Single-threaded HTTP/1.1 server answering every request via a handler.
///
/// The accept loop runs on a detached thread for the life of the test binary.
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Url>>>,
}

impl StubServer {
    pub fn spawn(handler: impl Fn(&Url) -> StubReply + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let handler: Box<Handler> = Box::new(handler);

        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                serve(stream, handler.as_ref(), &seen);
            }
        });

        Self { addr, requests }
    }

    /// Base URL to configure the adapters with.
    pub fn base_url(&self) -> String {
        format!("http://{}/maps/api", self.addr)
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().expect("request log").clone()
    }
}

/// Value of `name` in the query string of `url`.
pub fn query_value(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Address of a port nothing is listening on.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{addr}/maps/api")
}

fn serve(stream: TcpStream, handler: &Handler, seen: &Mutex<Vec<Url>>) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) | Err(_) => break,
            Ok(_) if header == "\r\n" => break,
            Ok(_) => {}
        }
    }

    let target = request_line.split_whitespace().nth(1).unwrap_or("/");
    let Ok(url) = Url::parse(&format!("http://stub{target}")) else {
        return;
    };
    seen.lock().expect("request log").push(url.clone());

    let reply = handler(&url);
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reason(reply.status),
        reply.body.len(),
        reply.body
    );
    let mut stream = reader.into_inner();
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Scripted mock webhook endpoint for integration tests.
//!
//! mockito covers the simple request/response cases; this server exists for
//! scenarios mockito cannot script: a fixed sequence of status codes across
//! requests, slow responses, and tracking how many requests are in flight at
//! once.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct ScriptedWebhook {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl ScriptedWebhook {
    /// Starts a webhook endpoint that answers the n-th request with the n-th
    /// scripted status (the last entry repeats), holding each response for
    /// `delay` before answering.
    pub async fn start(statuses: Vec<u16>, delay: Duration) -> Self {
        assert!(!statuses.is_empty(), "need at least one scripted status");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind scripted webhook");
        let addr = listener.local_addr().expect("failed to get local addr");

        let hits = Arc::new(AtomicUsize::new(0));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));

        {
            let hits = Arc::clone(&hits);
            let in_flight = Arc::clone(&in_flight);
            let max_in_flight = Arc::clone(&max_in_flight);
            tokio::spawn(async move {
                loop {
                    let (stream, _) = match listener.accept().await {
                        Ok(conn) => conn,
                        Err(_) => break,
                    };
                    let statuses = statuses.clone();
                    let hits = Arc::clone(&hits);
                    let in_flight = Arc::clone(&in_flight);
                    let max_in_flight = Arc::clone(&max_in_flight);
                    tokio::spawn(async move {
                        handle_connection(
                            stream,
                            statuses,
                            hits,
                            in_flight,
                            max_in_flight,
                            delay,
                        )
                        .await;
                    });
                }
            });
        }

        ScriptedWebhook {
            addr,
            hits,
            max_in_flight,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Total requests answered so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Highest number of requests that were ever being served concurrently.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

async fn handle_connection(
    mut stream: tokio::net::TcpStream,
    statuses: Vec<u16>,
    hits: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    delay: Duration,
) {
    let sequence = hits.fetch_add(1, Ordering::SeqCst);
    let now_in_flight = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

    if read_request(&mut stream).await {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let status = statuses[sequence.min(statuses.len() - 1)];
        let response = format!(
            "HTTP/1.1 {status} {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
            reason(status)
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    }

    in_flight.fetch_sub(1, Ordering::SeqCst);
}

/// Reads one HTTP request (headers plus a content-length body). Returns false
/// if the connection died first.
async fn read_request(stream: &mut tokio::net::TcpStream) -> bool {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        match stream.read(&mut chunk).await {
            Ok(0) => return false,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(_) => return false,
        }
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
    };

    let content_length = parse_content_length(&buf[..header_end]);
    while buf.len() < header_end + content_length {
        match stream.read(&mut chunk).await {
            Ok(0) => return false,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(_) => return false,
        }
    }
    true
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos + 4)
}

fn parse_content_length(headers: &[u8]) -> usize {
    String::from_utf8_lossy(headers)
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().ok())?
        })
        .unwrap_or(0)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

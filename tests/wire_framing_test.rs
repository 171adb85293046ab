//! Socket-level tests: chunk framing on the wire and the menu-to-stream flow
//! over a real HTTP client.

mod common;

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use common::{iso_sector, TestHarness, ALPHA_ID, BRAVO_ID, CUE_DATA_SECTORS, ISO_SECTORS};
use ode_disc::SECTOR_SIZE;

async fn raw_get(addr: std::net::SocketAddr, path: &str, range: &str) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {path} HTTP/1.1\r\nHost: drive\r\nRange: {range}\r\nConnection: close\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    tokio::time::timeout(Duration::from_secs(10), stream.read_to_end(&mut raw))
        .await
        .expect("response timed out")
        .unwrap();
    raw
}

fn split_head(raw: &[u8]) -> (String, &[u8]) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("no header terminator");
    let head = String::from_utf8_lossy(&raw[..end]).to_ascii_lowercase();
    (head, &raw[end + 4..])
}

/// Decode a chunked body into its chunks, including the terminator.
fn decode_chunks(mut body: &[u8]) -> Vec<Vec<u8>> {
    let mut chunks = Vec::new();
    loop {
        let line_end = body
            .windows(2)
            .position(|w| w == b"\r\n")
            .expect("truncated chunk size line");
        let size_str = std::str::from_utf8(&body[..line_end]).unwrap();
        let size = usize::from_str_radix(size_str.trim(), 16).unwrap();
        body = &body[line_end + 2..];

        if size == 0 {
            assert_eq!(body, b"\r\n", "terminator must end the body");
            chunks.push(Vec::new());
            return chunks;
        }

        chunks.push(body[..size].to_vec());
        assert_eq!(&body[size..size + 2], b"\r\n");
        body = &body[size + 2..];
    }
}

#[tokio::test]
async fn every_chunk_is_one_sector_then_terminator() {
    let (h, addr, cancel) = TestHarness::new().with_server().await;
    {
        let mut session = h.ctx.session.lock();
        session.select_image(h.game_path("alpha.iso"));
        session.load_toc().unwrap();
    }

    let raw = raw_get(addr, "/data/track", "bytes=4096-").await;
    let (head, body) = split_head(&raw);

    assert!(head.starts_with("http/1.1 206"), "{head}");
    assert!(head.contains("transfer-encoding: chunked"));
    assert!(head.contains("cache-control: no-cache"));

    let chunks = decode_chunks(body);
    let (terminator, sectors) = chunks.split_last().unwrap();
    assert!(terminator.is_empty());
    assert_eq!(sectors.len(), ISO_SECTORS - 2);
    for (i, sector) in sectors.iter().enumerate() {
        assert_eq!(sector.len(), SECTOR_SIZE);
        assert_eq!(sector, &iso_sector(i + 2));
    }

    cancel.cancel();
}

#[tokio::test]
async fn connection_closes_after_terminator() {
    let (h, addr, cancel) = TestHarness::new().with_server().await;
    {
        let mut session = h.ctx.session.lock();
        session.select_image(h.game_path("alpha.iso"));
        session.load_toc().unwrap();
    }

    // Keep-alive request: only the server can end the connection.
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let start = (ISO_SECTORS - 4) * SECTOR_SIZE;
    let request = format!("GET /data/x HTTP/1.1\r\nHost: drive\r\nRange: bytes={start}-\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut raw))
        .await
        .expect("connection stayed open after the terminator")
        .unwrap();

    let (head, body) = split_head(&raw);
    assert!(head.contains("connection: close"), "{head}");
    assert!(body.ends_with(b"0\r\n\r\n"));
    let chunks = decode_chunks(body);
    assert_eq!(chunks.len(), 4 + 1);

    cancel.cancel();
}

#[tokio::test]
async fn error_responses_over_the_wire() {
    let (_h, addr, cancel) = TestHarness::new().with_server().await;

    let raw = raw_get(addr, "/data/track", "bytes=0-").await;
    let (head, _) = split_head(&raw);
    assert!(head.starts_with("http/1.1 404"), "{head}");

    cancel.cancel();
}

#[tokio::test]
async fn menu_selection_then_stream() {
    let (h, addr, cancel) = TestHarness::new().with_server().await;
    let client = reqwest::Client::new();

    let toc = client
        .get(format!("http://{addr}/toc_bin/{BRAVO_ID}"))
        .send()
        .await
        .unwrap();
    assert_eq!(toc.status(), 200);
    assert_eq!(toc.bytes().await.unwrap().len(), 16 * (2 + 3));

    let data = client
        .get(format!("http://{addr}/data/bravo"))
        .header("Range", "bytes=0-")
        .send()
        .await
        .unwrap();
    assert_eq!(data.status(), 206);
    assert_eq!(data.bytes().await.unwrap().len(), CUE_DATA_SECTORS * SECTOR_SIZE);

    // Switching media between streams is allowed.
    let toc = client
        .get(format!("http://{addr}/toc_bin/{ALPHA_ID}"))
        .send()
        .await
        .unwrap();
    assert_eq!(toc.status(), 200);
    let data = client
        .get(format!("http://{addr}/data/alpha"))
        .header("Range", "bytes=0-")
        .send()
        .await
        .unwrap();
    assert_eq!(data.bytes().await.unwrap().len(), ISO_SECTORS * SECTOR_SIZE);

    assert!(!h.ctx.session.lock().is_streaming());
    cancel.cancel();
}

#[tokio::test]
async fn disconnect_stops_reading_and_returns_slot() {
    const BIG_SECTORS: usize = 4096;

    let (h, addr, cancel) = TestHarness::new().with_server().await;
    // Larger than the socket buffers, so the drop lands mid-stream.
    let big = h.dir.path().join("big.iso");
    std::fs::write(&big, vec![0x5A; BIG_SECTORS * SECTOR_SIZE]).unwrap();
    {
        let mut session = h.ctx.session.lock();
        session.select_image(big);
        session.load_toc().unwrap();
    }

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /data/x HTTP/1.1\r\nHost: drive\r\nRange: bytes=0-\r\n\r\n")
        .await
        .unwrap();
    let mut buf = [0u8; 64];
    let n = stream.read(&mut buf).await.unwrap();
    assert!(n > 0);
    drop(stream);

    let released = async {
        while h.ctx.session.lock().is_streaming() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(5), released)
        .await
        .expect("stream slot was not returned");

    let cursor = h.ctx.session.lock().stream_cursor().unwrap();
    assert!((cursor as usize) < BIG_SECTORS, "stream ran to the end");

    tokio::time::sleep(Duration::from_millis(200)).await;
    let session = h.ctx.session.lock();
    assert!(!session.is_streaming());
    assert_eq!(session.stream_cursor(), Some(cursor));
    drop(session);

    cancel.cancel();
}

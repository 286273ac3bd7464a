//! One-shot local HTTP server for exercising the reqwest paths.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// How the server answers one connection.
pub enum Reply {
    /// Status line plus a body, then close.
    Status(u16, String),
    /// Read the request and never answer.
    Hang,
}

/// Raw requests received, in arrival order.
pub type RequestLog = Arc<Mutex<Vec<String>>>;

/// Serve `replies` to successive connections, one request per connection.
///
/// Returns the base URL (`http://127.0.0.1:<port>`) and the request log.
pub async fn serve(replies: Vec<Reply>) -> (String, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let requests = log.clone();

    tokio::spawn(async move {
        for reply in replies {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let request = read_request(&mut socket).await;
            requests.lock().unwrap().push(request);

            match reply {
                Reply::Status(status, body) => {
                    let response = format!(
                        "HTTP/1.1 {} {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status,
                        if status < 400 { "OK" } else { "Error" },
                        if body.starts_with('{') { "application/json" } else { "text/html" },
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
            }
        }
    });

    (base, log)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

use crate::common::SOCKET_PATH;
use crate::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

const GREETING: &str = "OK QPOWERHAL IPC";

pub struct IpcClient {
    socket_path: String,
}

impl IpcClient {
    pub fn new() -> Self {
        Self::with_path(SOCKET_PATH)
    }

    pub fn with_path(socket_path: impl Into<String>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    /// Send one command and return the reply without the greeting and
    /// the closing `BYE`.
    pub async fn send(&self, command: &str) -> Result<String> {
        let mut stream = UnixStream::connect(&self.socket_path)
            .await
            .context("Failed to connect to daemon. Is it running?")?;

        stream.write_all(command.as_bytes()).await?;
        stream.write_all(b"\nQUIT\n").await?;

        let mut response = String::new();
        stream.read_to_string(&mut response).await?;

        Ok(strip_framing(&response))
    }

    pub async fn is_alive(&self) -> bool {
        UnixStream::connect(&self.socket_path).await.is_ok()
    }

    pub async fn ping(&self) -> Result<bool> {
        match self.send("PING").await {
            Ok(resp) => Ok(resp.contains("PONG")),
            Err(_) => Ok(false),
        }
    }
}

impl Default for IpcClient {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_framing(raw: &str) -> String {
    raw.lines()
        .filter(|l| *l != GREETING && *l != "BYE")
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_greeting_and_bye() {
        assert_eq!(strip_framing("OK QPOWERHAL IPC\nOK HANDLED\nBYE\n"), "OK HANDLED");
        assert_eq!(strip_framing("OK QPOWERHAL IPC\nBYE\n"), "");
    }

    #[tokio::test]
    async fn talks_to_a_listener() {
        use tokio::io::{AsyncBufReadExt, BufReader};
        use tokio::net::UnixListener;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctl.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (r, mut w) = stream.into_split();
            let mut lines = BufReader::new(r).lines();
            w.write_all(b"OK QPOWERHAL IPC\n").await.unwrap();
            while let Some(line) = lines.next_line().await.unwrap() {
                if line == "QUIT" {
                    w.write_all(b"BYE\n").await.unwrap();
                    break;
                }
                w.write_all(b"PONG\n").await.unwrap();
            }
        });

        let client = IpcClient::with_path(path.to_string_lossy());
        assert!(client.ping().await.unwrap());
        server.await.unwrap();
    }
}

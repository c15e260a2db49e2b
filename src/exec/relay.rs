// src/exec/relay.rs

//! Forwarding a managed process's output streams to the log.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::types::StreamKind;

/// Spawn a background task that logs every line read from `reader`, tagged
/// with the child's pid and the stream label.
///
/// The task ends on its own at end-of-stream or on the first read error
/// (e.g. the pipe was torn down while the process was killed). It holds no
/// handle to the process itself.
pub fn spawn_relay<R>(reader: R, pid: u32, stream: StreamKind) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => info!(pid, stream = %stream, "{}", line),
                Ok(None) => break,
                Err(err) => {
                    debug!(pid, stream = %stream, error = %err, "relay read failed");
                    break;
                }
            }
        }
        debug!(pid, stream = %stream, "stream relay ended");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn relay_finishes_at_end_of_stream() {
        let input: &[u8] = b"first line\nsecond line\nno newline at end";
        let handle = spawn_relay(input, 42, StreamKind::Stdout);

        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("relay should end at EOF")
            .expect("relay task should not panic");
    }

    #[tokio::test]
    async fn relay_finishes_when_writer_is_dropped() {
        let (writer, reader) = tokio::io::duplex(64);
        let handle = spawn_relay(reader, 7, StreamKind::Stderr);
        drop(writer);

        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("relay should end when the pipe closes")
            .expect("relay task should not panic");
    }
}

//! Websocket-to-process bridge for one terminal session.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

use crate::config::TermConfig;

/// Run one terminal session: spawn the configured command and pump bytes
/// between the websocket and the child's stdio until either side closes
/// or the consecutive-error limit is hit.
pub(crate) async fn run(mut socket: WebSocket, config: Arc<TermConfig>) {
    let mut child = match Command::new(&config.command)
        .args(&config.arguments)
        .current_dir(&config.working_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(command = %config.command, error = %e, "terminal spawn failed");
            let _ = socket
                .send(Message::Text(format!("failed to start terminal: {e}").into()))
                .await;
            return;
        }
    };

    let (Some(mut stdin), Some(mut stdout), Some(mut stderr)) =
        (child.stdin.take(), child.stdout.take(), child.stderr.take())
    else {
        tracing::warn!("terminal child missing stdio pipes");
        return;
    };

    tracing::debug!(command = %config.command, "terminal session started");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut errors: u32 = 0;
    let mut out_buf = [0u8; 4096];
    let mut err_buf = [0u8; 4096];
    let mut keepalive =
        tokio::time::interval(Duration::from_secs(config.keepalive_ping_timeout_secs.max(1)));

    loop {
        if errors >= config.connection_error_limit {
            tracing::warn!(errors, "terminal session exceeded error limit");
            break;
        }

        tokio::select! {
            read = stdout.read(&mut out_buf) => match read {
                Ok(0) | Err(_) => break,
                Ok(n) => errors = forward_output(&mut ws_tx, &out_buf[..n], errors).await,
            },
            read = stderr.read(&mut err_buf) => match read {
                Ok(0) | Err(_) => break,
                Ok(n) => errors = forward_output(&mut ws_tx, &err_buf[..n], errors).await,
            },
            received = ws_rx.next() => match received {
                Some(Ok(Message::Text(text))) => {
                    errors += write_input(&mut stdin, text.as_bytes(), &config).await;
                }
                Some(Ok(Message::Binary(data))) => {
                    errors += write_input(&mut stdin, &data, &config).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {} // ping/pong handled by the protocol layer
                Some(Err(_)) => errors += 1,
            },
            _ = keepalive.tick() => {
                if ws_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    let _ = child.kill().await;
    tracing::debug!("terminal session closed");
}

type WsSink = SplitSink<WebSocket, Message>;

/// Send one chunk of child output to the client. Returns the updated
/// consecutive-error count: reset on success, bumped on failure.
async fn forward_output(ws_tx: &mut WsSink, data: &[u8], errors: u32) -> u32 {
    match ws_tx.send(Message::Binary(Bytes::copy_from_slice(data))).await {
        Ok(()) => 0,
        Err(_) => errors + 1,
    }
}

/// Forward one input chunk to the child. Returns the number of errors to
/// add to the session's consecutive-error count.
async fn write_input(
    stdin: &mut tokio::process::ChildStdin,
    data: &[u8],
    config: &TermConfig,
) -> u32 {
    if data.len() > config.max_buffer_size_bytes {
        tracing::warn!(
            len = data.len(),
            limit = config.max_buffer_size_bytes,
            "dropping oversized terminal input chunk"
        );
        return 1;
    }
    match stdin.write_all(data).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!(error = %e, "terminal stdin write failed");
            1
        }
    }
}

//! Unix control socket feeding interaction commands to the carousel.
//!
//! Each connection may carry one or more JSON objects, back to back or newline
//! separated, e.g. `{"command":"click","index":14}`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::select;
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::Interaction;

/// Upper bound on the bytes read from one connection; anything past it is ignored.
pub const MAX_PAYLOAD_BYTES: u64 = 64 * 1024;

/// Splits a payload into interactions, stopping at the first malformed one.
pub fn parse_commands(payload: &[u8]) -> Vec<Interaction> {
    let mut parsed = Vec::new();
    for item in serde_json::Deserializer::from_slice(payload).into_iter::<Interaction>() {
        match item {
            Ok(interaction) => parsed.push(interaction),
            Err(err) => {
                warn!(error = %err, "dropping malformed control command");
                break;
            }
        }
    }
    parsed
}

fn bind(path: &Path) -> Result<UnixListener> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create control socket directory {}", parent.display())
            })?;
        }
    }
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed stale control socket"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| {
                format!("failed to remove stale control socket {}", path.display())
            });
        }
    }
    UnixListener::bind(path)
        .with_context(|| format!("failed to bind control socket at {}", path.display()))
}

/// Reads at most [`MAX_PAYLOAD_BYTES`] from `reader` and parses the commands in it.
pub async fn read_commands<R: AsyncRead + Unpin>(reader: R) -> Result<Vec<Interaction>> {
    let mut payload = Vec::new();
    reader
        .take(MAX_PAYLOAD_BYTES)
        .read_to_end(&mut payload)
        .await
        .context("failed to read control command")?;
    Ok(parse_commands(&payload))
}

async fn serve_connection(stream: UnixStream, to_carousel: Sender<Interaction>) -> Result<()> {
    for interaction in read_commands(stream).await? {
        debug!(?interaction, "control command received");
        to_carousel
            .send(interaction)
            .await
            .context("carousel stopped accepting commands")?;
    }
    Ok(())
}

pub async fn run(
    socket_path: PathBuf,
    to_carousel: Sender<Interaction>,
    cancel: CancellationToken,
) -> Result<()> {
    let listener = bind(&socket_path)?;
    info!(path = %socket_path.display(), "control socket listening");

    loop {
        select! {
            _ = cancel.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, _)) => {
                    let tx = to_carousel.clone();
                    tokio::spawn(async move {
                        if let Err(err) = serve_connection(stream, tx).await {
                            warn!("control connection failed: {err:#}");
                        }
                    });
                }
                Err(err) => warn!(error = %err, "control socket accept failed"),
            },
        }
    }

    if let Err(err) = std::fs::remove_file(&socket_path) {
        debug!(error = %err, "control socket already gone");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Direction, Key};

    #[test]
    fn parses_concatenated_and_newline_separated_commands() {
        let payload = br#"{"command":"pointer-enter"}{"command":"click","index":14}
{"command":"key","key":"arrow-left"}
{"command":"navigate","direction":"next"}"#;
        assert_eq!(
            parse_commands(payload),
            vec![
                Interaction::PointerEnter,
                Interaction::Click { index: 14 },
                Interaction::Key {
                    key: Key::ArrowLeft
                },
                Interaction::Navigate {
                    direction: Direction::Next
                },
            ]
        );
    }

    #[test]
    fn stops_at_first_malformed_command() {
        let payload = br#"{"command":"close"}{"command":"jump"}{"command":"inquire"}"#;
        assert_eq!(parse_commands(payload), vec![Interaction::Close]);
    }

    #[test]
    fn empty_payload_yields_nothing() {
        assert!(parse_commands(b"").is_empty());
        assert!(parse_commands(b"  \n").is_empty());
    }

    #[tokio::test]
    async fn oversized_payload_is_cut_at_the_cap() {
        let mut payload = br#"{"command":"touch-start"}"#.to_vec();
        payload.resize(MAX_PAYLOAD_BYTES as usize + 1024, b' ');
        payload.extend_from_slice(br#"{"command":"close"}"#);
        let commands = read_commands(payload.as_slice()).await.unwrap();
        assert_eq!(commands, vec![Interaction::TouchStart]);
    }
}

//! Line-delimited JSON console transport.
//!
//! Each input line is one [`Inbound`] event. Every transport call is written
//! as one JSON object per line, tagged by `method`.

use crate::dispatch::Dispatcher;
use crate::error::BotError;
use async_trait::async_trait;
use futures::{StreamExt, future};
use hero_guide_content::SnapshotStore;
use hero_guide_conversation::{Inbound, Keyboard, OutboundMessage, Transport, TransportError};
use hero_guide_core::ChatId;
use rootcause::prelude::Report;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Stdout};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Events handled at the same time, across users.
const MAX_IN_FLIGHT: usize = 32;

#[derive(Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
enum ConsoleCall<'a> {
    SendMessage {
        chat: ChatId,
        text: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        keyboard: Option<&'a Keyboard>,
    },
    CopyMessage {
        chat: ChatId,
        from_chat: ChatId,
        message_id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<&'a str>,
    },
    ForwardMessage {
        chat: ChatId,
        from_chat: ChatId,
        message_id: i64,
    },
    SendDocument {
        chat: ChatId,
        path: &'a Path,
        file_name: &'a str,
        caption: &'a str,
    },
}

/// Transport writing provider calls as JSON lines.
#[derive(Debug)]
pub struct ConsoleTransport<W> {
    out: Mutex<W>,
}

impl ConsoleTransport<Stdout> {
    /// Writes to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> ConsoleTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    async fn emit(
        &self,
        call: &ConsoleCall<'_>,
        failed: impl Fn(String) -> TransportError,
    ) -> Result<(), Report<TransportError>> {
        let mut line = serde_json::to_vec(call).map_err(|e| failed(e.to_string()))?;
        line.push(b'\n');

        let mut out = self.out.lock().await;
        out.write_all(&line)
            .await
            .map_err(|e| failed(e.to_string()))?;
        out.flush().await.map_err(|e| failed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl<W> Transport for ConsoleTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&self, message: &OutboundMessage) -> Result<(), Report<TransportError>> {
        let call = ConsoleCall::SendMessage {
            chat: message.chat,
            text: &message.text,
            keyboard: message.keyboard.as_ref(),
        };
        self.emit(&call, |reason| TransportError::SendFailed { reason })
            .await
    }

    async fn copy_media(
        &self,
        chat: ChatId,
        source: ChatId,
        message_id: i64,
        caption: Option<&str>,
    ) -> Result<(), Report<TransportError>> {
        let call = ConsoleCall::CopyMessage {
            chat,
            from_chat: source,
            message_id,
            caption,
        };
        self.emit(&call, |reason| TransportError::MediaFailed { message_id, reason })
            .await
    }

    async fn forward_media(
        &self,
        chat: ChatId,
        source: ChatId,
        message_id: i64,
    ) -> Result<(), Report<TransportError>> {
        let call = ConsoleCall::ForwardMessage {
            chat,
            from_chat: source,
            message_id,
        };
        self.emit(&call, |reason| TransportError::MediaFailed { message_id, reason })
            .await
    }

    async fn send_document(
        &self,
        chat: ChatId,
        path: &Path,
        file_name: &str,
        caption: &str,
    ) -> Result<(), Report<TransportError>> {
        let call = ConsoleCall::SendDocument {
            chat,
            path,
            file_name,
            caption,
        };
        self.emit(&call, |reason| TransportError::DocumentFailed { reason })
            .await
    }
}

/// Reads inbound events line by line until the input ends.
///
/// Malformed lines are logged and skipped.
///
/// # Errors
///
/// Returns an error if the input cannot be read.
pub async fn run<S, R>(dispatcher: Arc<Dispatcher<S>>, input: R) -> hero_guide_core::Result<(), BotError>
where
    S: SnapshotStore,
    R: AsyncBufRead + Unpin + Send,
{
    let mut failure = None;
    let events = futures::stream::unfold(input.lines(), |mut lines| async move {
        let next = lines.next_line().await.transpose()?;
        Some((next, lines))
    })
    .scan(&mut failure, |failure, line| {
        let line = match line {
            Ok(line) => Some(line),
            Err(e) => {
                **failure = Some(e);
                None
            }
        };
        future::ready(line)
    })
    .filter_map(|line| future::ready(parse_line(&line)));

    events
        .for_each_concurrent(MAX_IN_FLIGHT, |inbound| {
            let dispatcher = Arc::clone(&dispatcher);
            async move { dispatcher.dispatch(inbound).await }
        })
        .await;

    if let Some(e) = failure {
        return Err(BotError::Console {
            reason: e.to_string(),
        }
        .into());
    }
    info!("console input closed");
    Ok(())
}

fn parse_line(line: &str) -> Option<Inbound> {
    if line.trim().is_empty() {
        return None;
    }
    serde_json::from_str(line)
        .inspect_err(|e| warn!(error = %e, "skipping malformed input line"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_guide_access::AccessPolicy;
    use hero_guide_audit::{AuditLog, JsonExporter};
    use hero_guide_content::{MemoryStore, Repository};
    use hero_guide_conversation::{Engine, MediaRelay, text};

    async fn written(transport: &ConsoleTransport<Vec<u8>>) -> Vec<serde_json::Value> {
        let out = transport.out.lock().await;
        String::from_utf8_lossy(&out)
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect()
    }

    #[tokio::test]
    async fn messages_are_tagged_json_lines() {
        let transport = ConsoleTransport::new(Vec::new());
        let message = OutboundMessage::new(ChatId::new(7), "hi")
            .with_keyboard(Keyboard::reply([[text::BACK]]));

        transport.send(&message).await.expect("send");
        transport
            .copy_media(ChatId::new(7), ChatId::new(-100), 55, None)
            .await
            .expect("copy");

        let lines = written(&transport).await;
        assert_eq!(lines[0]["method"], "send_message");
        assert_eq!(lines[0]["keyboard"]["rows"][0][0], text::BACK);
        assert_eq!(lines[1]["method"], "copy_message");
        assert_eq!(lines[1]["from_chat"], -100);
        assert!(lines[1].get("caption").is_none());
    }

    #[tokio::test]
    async fn run_skips_malformed_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let transport = Arc::new(ConsoleTransport::new(Vec::new()));
        let engine = Engine::new(
            Arc::new(Repository::new(MemoryStore::new())),
            AccessPolicy::new("boss"),
            Arc::new(AuditLog::new()),
        );
        let dispatcher = Arc::new(Dispatcher::new(
            engine,
            transport.clone(),
            MediaRelay::new(ChatId::new(-100)),
            Arc::new(JsonExporter::new(dir.path())),
        ));

        let input = concat!(
            "not json\n",
            "\n",
            r#"{"chat": 7, "sender": {"id": 7, "username": "alice"}, "event": {"type": "command", "name": "start"}}"#,
            "\n",
        );
        run(dispatcher, input.as_bytes()).await.expect("run");

        let lines = written(&transport).await;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["text"], text::GREETING);
    }
}

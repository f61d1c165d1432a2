//! Outbound transport and media relay.

use crate::error::TransportError;
use crate::outbound::{OutboundMessage, RelayRequest};
use crate::text;
use async_trait::async_trait;
use hero_guide_content::MediaRef;
use hero_guide_core::ChatId;
use rootcause::prelude::Report;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Trait for messaging-provider clients.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a text message with its keyboard.
    async fn send(&self, message: &OutboundMessage) -> Result<(), Report<TransportError>>;

    /// Copies a message from the source channel into a chat.
    async fn copy_media(
        &self,
        chat: ChatId,
        source: ChatId,
        message_id: i64,
        caption: Option<&str>,
    ) -> Result<(), Report<TransportError>>;

    /// Forwards a message from the source channel into a chat.
    async fn forward_media(
        &self,
        chat: ChatId,
        source: ChatId,
        message_id: i64,
    ) -> Result<(), Report<TransportError>>;

    /// Uploads a local file as a document.
    async fn send_document(
        &self,
        chat: ChatId,
        path: &Path,
        file_name: &str,
        caption: &str,
    ) -> Result<(), Report<TransportError>>;
}

/// What happened to the media of one relay request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayReport {
    /// Items copied with [`Transport::copy_media`].
    pub copied: usize,
    /// Items that fell back to [`Transport::forward_media`].
    pub forwarded: usize,
    /// Items that could not be delivered at all.
    pub failed: Vec<MediaRef>,
}

impl RelayReport {
    /// Number of items that reached the chat.
    #[must_use]
    pub fn delivered(&self) -> usize {
        self.copied + self.forwarded
    }
}

/// Delivers entry media from the source channel.
#[derive(Debug, Clone, Copy)]
pub struct MediaRelay {
    source: ChatId,
}

impl MediaRelay {
    /// Creates a relay reading from `source`.
    #[must_use]
    pub fn new(source: ChatId) -> Self {
        Self { source }
    }

    /// Delivers every media item in order.
    ///
    /// The caption rides on the first item. A failed copy is retried as a
    /// forward; if that fails too the user is told and the sequence continues.
    /// Forwards carry no caption, so when the first copy fails the caption is
    /// sent as text instead.
    #[instrument(skip_all, fields(chat = %request.chat, title = %request.caption.title))]
    pub async fn deliver(&self, transport: &dyn Transport, request: &RelayRequest) -> RelayReport {
        let caption = request.caption.render();
        let mut report = RelayReport::default();

        if request.media.is_empty() {
            let notice = text::no_media(request.caption.kind, &caption);
            notify(transport, OutboundMessage::new(request.chat, notice)).await;
            return report;
        }

        for (index, media) in request.media.iter().enumerate() {
            let first = index == 0;
            let Some(message_id) = media.message_id() else {
                warn!(media = %media, "media reference is not a message id");
                if first {
                    notify(transport, OutboundMessage::new(request.chat, caption.clone())).await;
                }
                self.fail(transport, request.chat, media, &mut report).await;
                continue;
            };

            match transport
                .copy_media(
                    request.chat,
                    self.source,
                    message_id,
                    first.then_some(caption.as_str()),
                )
                .await
            {
                Ok(()) => report.copied += 1,
                Err(copy_error) => {
                    debug!(message_id, error = %copy_error, "copy failed, forwarding");
                    if first {
                        notify(transport, OutboundMessage::new(request.chat, caption.clone())).await;
                    }
                    match transport
                        .forward_media(request.chat, self.source, message_id)
                        .await
                    {
                        Ok(()) => report.forwarded += 1,
                        Err(forward_error) => {
                            warn!(message_id, error = %forward_error, "failed to relay media");
                            self.fail(transport, request.chat, media, &mut report).await;
                        }
                    }
                }
            }
        }

        report
    }

    async fn fail(
        &self,
        transport: &dyn Transport,
        chat: ChatId,
        media: &MediaRef,
        report: &mut RelayReport,
    ) {
        report.failed.push(media.clone());
        let notice = OutboundMessage::new(chat, text::media_failed(media.as_str()));
        notify(transport, notice).await;
    }
}

async fn notify(transport: &dyn Transport, message: OutboundMessage) {
    if let Err(error) = transport.send(&message).await {
        warn!(chat = %message.chat, error = %error, "failed to send notice");
    }
}

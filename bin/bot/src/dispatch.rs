//! Routes inbound events through the engine and delivers the results.

use crate::config::BotConfig;
use hero_guide_access::AccessPolicy;
use hero_guide_audit::{ActionExporter, AuditLog, DailyFileSink, JsonExporter};
use hero_guide_content::{JsonFileStore, Repository, SnapshotStore};
use hero_guide_conversation::text;
use hero_guide_conversation::{
    Engine, ExportRequest, Inbound, MediaRelay, Outbound, OutboundMessage, SessionStore, Transport,
};
use hero_guide_core::ChatId;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Process-wide bot state, built once at startup.
pub struct Dispatcher<S> {
    sessions: SessionStore,
    engine: Engine<S>,
    transport: Arc<dyn Transport>,
    relay: MediaRelay,
    exporter: Arc<dyn ActionExporter>,
}

impl Dispatcher<JsonFileStore> {
    /// Builds the dispatcher described by `config`.
    #[must_use]
    pub fn from_config(config: &BotConfig, transport: Arc<dyn Transport>) -> Self {
        let repository = Repository::new(JsonFileStore::new(&config.storage.data_file));
        let audit = AuditLog::with_sink(DailyFileSink::new(&config.audit.logs_dir));
        let engine = Engine::new(
            Arc::new(repository),
            AccessPolicy::new(&config.super_admin),
            Arc::new(audit),
        );
        Self::new(
            engine,
            transport,
            MediaRelay::new(ChatId::new(config.source_channel)),
            Arc::new(JsonExporter::new(&config.audit.logs_dir)),
        )
    }
}

impl<S: SnapshotStore> Dispatcher<S> {
    /// Creates a dispatcher from its parts.
    #[must_use]
    pub fn new(
        engine: Engine<S>,
        transport: Arc<dyn Transport>,
        relay: MediaRelay,
        exporter: Arc<dyn ActionExporter>,
    ) -> Self {
        Self {
            sessions: SessionStore::new(),
            engine,
            transport,
            relay,
            exporter,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &Engine<S> {
        &self.engine
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handles one inbound event end to end.
    ///
    /// The sender's session stays locked until every outbound item has been
    /// delivered, so a user's events are answered in arrival order while
    /// other users proceed concurrently.
    #[instrument(skip_all, fields(user = %inbound.sender.id, chat = %inbound.chat))]
    pub async fn dispatch(&self, inbound: Inbound) {
        let mut session = self.sessions.acquire(inbound.sender.id).await;
        let outbound = self.engine.handle(&mut session, &inbound).await;
        debug!(items = outbound.len(), "delivering");
        for item in outbound {
            self.deliver(item).await;
        }
    }

    async fn deliver(&self, item: Outbound) {
        match item {
            Outbound::Message(message) => self.send(&message).await,
            Outbound::Relay(request) => {
                let report = self.relay.deliver(self.transport.as_ref(), &request).await;
                debug!(
                    copied = report.copied,
                    forwarded = report.forwarded,
                    failed = report.failed.len(),
                    "relay finished"
                );
            }
            Outbound::Export(request) => self.export(request).await,
        }
    }

    async fn send(&self, message: &OutboundMessage) {
        if let Err(report) = self.transport.send(message).await {
            warn!(chat = %message.chat, error = %report, "failed to send message");
        }
    }

    /// Writes the report, uploads it and removes the local file.
    async fn export(&self, request: ExportRequest) {
        let file = match self.exporter.export(&request.records).await {
            Ok(file) => file,
            Err(report) => {
                error!(error = %report, "failed to export actions");
                self.send(&OutboundMessage::new(request.chat, text::REPORT_FAILED))
                    .await;
                return;
            }
        };

        if let Err(report) = self
            .transport
            .send_document(request.chat, &file.path, &file.file_name, text::REPORT_CAPTION)
            .await
        {
            warn!(error = %report, "failed to upload report");
            self.send(&OutboundMessage::new(request.chat, text::REPORT_FAILED))
                .await;
        }

        if let Err(e) = tokio::fs::remove_file(&file.path).await {
            warn!(path = %file.path.display(), error = %e, "failed to remove report file");
        }
    }
}

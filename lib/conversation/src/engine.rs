//! Executes transitions against the repository and the audit log.

use crate::event::{Inbound, InboundEvent};
use crate::mutation::Mutation;
use crate::outbound::{ExportRequest, Outbound, OutboundMessage};
use crate::state::Session;
use crate::text;
use crate::transition::{Context, Step, Transition, transition};
use hero_guide_access::{AccessPolicy, Privilege};
use hero_guide_audit::{ActionRecord, AuditLog, Statistics};
use hero_guide_content::{Repository, Snapshot, SnapshotStore, WriteStatus};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Conversation engine shared by every user.
///
/// The engine holds no per-user state. Callers pass the session they hold
/// exclusively, see [`SessionStore`](crate::store::SessionStore).
#[derive(Debug)]
pub struct Engine<S> {
    repository: Arc<Repository<S>>,
    policy: AccessPolicy,
    audit: Arc<AuditLog>,
}

impl<S: SnapshotStore> Engine<S> {
    /// Creates an engine.
    #[must_use]
    pub fn new(repository: Arc<Repository<S>>, policy: AccessPolicy, audit: Arc<AuditLog>) -> Self {
        Self {
            repository,
            policy,
            audit,
        }
    }

    #[must_use]
    pub fn repository(&self) -> &Repository<S> {
        &self.repository
    }

    #[must_use]
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    #[must_use]
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Handles one inbound event and returns what to deliver, in order.
    ///
    /// `session` is updated in place.
    #[instrument(skip_all, fields(user = %inbound.sender.id, username = %inbound.sender.username))]
    pub async fn handle(&self, session: &mut Session, inbound: &Inbound) -> Vec<Outbound> {
        if let InboundEvent::Button { payload } = &inbound.event {
            info!("Callback: {payload}");
        }

        let snapshot = self.repository.load_all().await;
        let privilege = self
            .policy
            .privilege(&inbound.sender.username, &snapshot.admins);
        let ctx = Context {
            snapshot: &snapshot,
            policy: &self.policy,
            privilege,
        };

        let Transition {
            session: next,
            steps,
        } = transition(session, inbound, &ctx);
        debug!(state = ?next.state, steps = steps.len(), "transition computed");
        *session = next;

        let mut outbound = Vec::new();
        for step in steps {
            match step {
                Step::Send(item) => outbound.push(item),
                Step::Audit { action, details } => {
                    self.audit
                        .record(ActionRecord::new(&inbound.sender, action, details))
                        .await;
                }
                Step::Mutate(mutation) => {
                    self.commit(&mutation, inbound, privilege, &mut outbound)
                        .await;
                }
                Step::ShowStatistics => {
                    let records = self.audit.records().await;
                    let stats = Statistics::compute(&records, &snapshot);
                    outbound.push(text::statistics(inbound.chat, &stats).into());
                }
                Step::ExportActions => {
                    outbound.push(Outbound::Export(ExportRequest {
                        chat: inbound.chat,
                        records: self.audit.records().await,
                    }));
                }
            }
        }
        outbound
    }

    async fn commit(
        &self,
        mutation: &Mutation,
        inbound: &Inbound,
        privilege: Privilege,
        outbound: &mut Vec<Outbound>,
    ) {
        let committed = self
            .repository
            .mutate(|snapshot| mutation.apply(snapshot))
            .await;
        let outcome = committed.value;

        if committed.write == WriteStatus::Failed {
            error!(?mutation, "mutation applied but not persisted");
        }
        if outcome.is_applied() {
            let (action, details) = mutation.audit();
            self.audit
                .record(ActionRecord::new(&inbound.sender, action, details))
                .await;
        }

        let reply = mutation.reply(outcome);
        if mutation.is_admin_edit() {
            outbound.push(OutboundMessage::new(inbound.chat, reply).into());
            let snapshot: Snapshot = self.repository.load_all().await;
            outbound.push(
                text::admin_list(inbound.chat, self.policy.super_admin(), &snapshot.admins).into(),
            );
        } else {
            let message = OutboundMessage::new(inbound.chat, reply)
                .with_keyboard(text::menu_keyboard(privilege));
            outbound.push(message.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SessionState;
    use hero_guide_audit::ActionKind;
    use hero_guide_content::{EntryKind, MediaRef, MemoryStore, Role};
    use hero_guide_core::{ChatId, Sender, UserId};

    fn engine() -> Engine<MemoryStore> {
        Engine::new(
            Arc::new(Repository::new(MemoryStore::new())),
            AccessPolicy::new("boss"),
            Arc::new(AuditLog::new()),
        )
    }

    fn inbound(username: &str, event: InboundEvent) -> Inbound {
        Inbound {
            chat: ChatId::new(7),
            sender: Sender::new(UserId::new(7), username),
            event,
        }
    }

    fn text_event(input: &str) -> InboundEvent {
        InboundEvent::Text {
            text: input.to_string(),
        }
    }

    fn texts(outbound: &[Outbound]) -> Vec<&str> {
        outbound
            .iter()
            .filter_map(Outbound::as_message)
            .map(|m| m.text.as_str())
            .collect()
    }

    #[tokio::test]
    async fn create_persists_and_audits() {
        let engine = engine();
        let mut session = Session::new(UserId::new(7));
        session.state = SessionState::AwaitingVideoId {
            kind: EntryKind::Tutorial,
            title: "Night Fighter".to_string(),
            bio: "A brief tale".to_string(),
            role: Role::Fighter,
        };

        let out = engine
            .handle(&mut session, &inbound("boss", text_event("55")))
            .await;

        assert_eq!(
            texts(&out),
            vec!["The tutorial 'Night Fighter' was created with its first video!"]
        );
        let snapshot = engine.repository().load_all().await;
        assert_eq!(
            snapshot.tutorials["Night Fighter"].videos,
            vec![MediaRef::new("55")]
        );
        let records = engine.audit().records().await;
        assert_eq!(records.last().map(|r| r.action), Some(ActionKind::EntrySaved));
        assert!(session.is_clear());
    }

    #[tokio::test]
    async fn admin_edits_show_the_refreshed_list() {
        let engine = engine();
        let mut session = Session::new(UserId::new(7));
        session.state = SessionState::AwaitingNewAdminName;

        let out = engine
            .handle(&mut session, &inbound("boss", text_event("@newop")))
            .await;

        let texts = texts(&out);
        assert_eq!(texts[0], "✅ @newop added to admins.");
        assert!(texts[1].contains("@newop (added by @boss"));
    }

    #[tokio::test]
    async fn statistics_reflect_the_log() {
        let engine = engine();
        let mut session = Session::new(UserId::new(7));

        engine
            .handle(
                &mut session,
                &inbound(
                    "boss",
                    InboundEvent::Command {
                        name: "start".to_string(),
                        args: String::new(),
                    },
                ),
            )
            .await;
        let out = engine
            .handle(&mut session, &inbound("boss", text_event(text::STATISTICS)))
            .await;

        let stats = texts(&out)[0];
        assert!(stats.contains("• Users: 1"));
        assert!(stats.contains("• Actions: 2"));
    }

    #[tokio::test]
    async fn export_carries_every_record() {
        let engine = engine();
        let mut session = Session::new(UserId::new(7));

        let out = engine
            .handle(
                &mut session,
                &inbound(
                    "boss",
                    InboundEvent::Button {
                        payload: "download_logs".to_string(),
                    },
                ),
            )
            .await;

        let Some(Outbound::Export(request)) = out.last() else {
            panic!("expected an export request, got {out:?}");
        };
        // The button press and the download itself.
        assert_eq!(request.records.len(), 2);
    }
}

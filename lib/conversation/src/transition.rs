//! The conversation state machine.
//!
//! [`transition`] is pure: given a session, an inbound event and a snapshot
//! of the repository it returns the next session and the ordered steps the
//! engine must carry out. It performs no I/O, so every workflow can be
//! tested without a transport or a store.
//!
//! Text is matched in priority order: navigation labels, menu labels, the
//! input a workflow is waiting for, role labels, entry titles.

use crate::event::{Button, ButtonAction, Inbound, InboundEvent};
use crate::mutation::Mutation;
use crate::outbound::{Caption, Outbound, OutboundMessage, RelayRequest};
use crate::state::{Browsing, Session, SessionState};
use crate::text;
use hero_guide_access::{AccessError, AccessPolicy, Privilege};
use hero_guide_audit::ActionKind;
use hero_guide_content::{EntryKind, MediaRef, Role, Snapshot, selector};
use hero_guide_core::ChatId;

/// What a transition sees besides the session and the event.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Snapshot loaded for this event.
    pub snapshot: &'a Snapshot,
    pub policy: &'a AccessPolicy,
    /// Privilege of the sender against `snapshot`.
    pub privilege: Privilege,
}

/// One thing the engine must do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Deliver an outbound descriptor.
    Send(Outbound),
    /// Append an action record for the sender.
    Audit { action: ActionKind, details: String },
    /// Apply a repository mutation and report its outcome.
    Mutate(Mutation),
    /// Compute and send usage statistics.
    ShowStatistics,
    /// Export the action log.
    ExportActions,
}

/// Next session plus the steps to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: Session,
    pub steps: Vec<Step>,
}

impl Transition {
    /// Text of every message step, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Send(Outbound::Message(message)) => Some(message.text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Mutations requested, in order.
    #[must_use]
    pub fn mutations(&self) -> Vec<&Mutation> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Mutate(mutation) => Some(mutation),
                _ => None,
            })
            .collect()
    }
}

/// Computes the next session and steps for an inbound event.
#[must_use]
pub fn transition(session: &Session, inbound: &Inbound, ctx: &Context<'_>) -> Transition {
    let mut machine = Machine {
        session: session.clone(),
        steps: Vec::new(),
        inbound,
        ctx,
    };

    match &inbound.event {
        InboundEvent::Command { name, args } => machine.command(name, args),
        InboundEvent::Text { text } => machine.text(text),
        InboundEvent::Button { payload } => machine.button(payload),
    }

    Transition {
        session: machine.session,
        steps: machine.steps,
    }
}

/// Reply-keyboard labels of the main and admin menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuLabel {
    Browse(EntryKind),
    Create(EntryKind),
    Manage(EntryKind),
    Statistics,
    Admins,
}

impl MenuLabel {
    fn parse(input: &str) -> Option<Self> {
        let label = match input {
            text::TUTORIALS => Self::Browse(EntryKind::Tutorial),
            text::STORIES => Self::Browse(EntryKind::Story),
            text::NEW_TUTORIAL => Self::Create(EntryKind::Tutorial),
            text::NEW_STORY => Self::Create(EntryKind::Story),
            text::MANAGE_TUTORIALS => Self::Manage(EntryKind::Tutorial),
            text::MANAGE_STORIES => Self::Manage(EntryKind::Story),
            text::STATISTICS => Self::Statistics,
            text::ADMINS => Self::Admins,
            _ => return None,
        };
        Some(label)
    }
}

struct Machine<'a, 'b> {
    session: Session,
    steps: Vec<Step>,
    inbound: &'a Inbound,
    ctx: &'a Context<'b>,
}

impl Machine<'_, '_> {
    fn chat(&self) -> ChatId {
        self.inbound.chat
    }

    fn is_admin(&self) -> bool {
        self.ctx.privilege.is_admin()
    }

    fn send(&mut self, message: OutboundMessage) {
        self.steps.push(Step::Send(Outbound::Message(message)));
    }

    fn say(&mut self, text: impl Into<String>) {
        let message = OutboundMessage::new(self.chat(), text);
        self.send(message);
    }

    fn say_with_menu(&mut self, text: impl Into<String>) {
        let message = OutboundMessage::new(self.chat(), text)
            .with_keyboard(text::menu_keyboard(self.ctx.privilege));
        self.send(message);
    }

    fn audit(&mut self, action: ActionKind, details: impl Into<String>) {
        self.steps.push(Step::Audit {
            action,
            details: details.into(),
        });
    }

    fn mutate(&mut self, mutation: Mutation) {
        self.steps.push(Step::Mutate(mutation));
    }

    fn deny(&mut self) {
        self.say(text::DENIED);
    }

    fn command(&mut self, name: &str, args: &str) {
        match name {
            "start" => {
                self.audit(ActionKind::Started, "/start");
                self.session.reset();
                let menu = text::menu(self.chat(), self.ctx.privilege);
                self.send(menu);
            }
            "create" => {
                if !self.is_admin() {
                    self.deny();
                    return;
                }
                let kind = if args.trim().eq_ignore_ascii_case("story") {
                    EntryKind::Story
                } else {
                    EntryKind::Tutorial
                };
                self.audit(ActionKind::CreateStarted, format!("/create {kind}"));
                self.session.reset();
                self.session.state = SessionState::AwaitingTitle {
                    kind,
                    preset_role: None,
                };
                self.say(text::title_prompt(kind));
            }
            _ => self.say(text::UNKNOWN_COMMAND),
        }
    }

    fn text(&mut self, input: &str) {
        if self.navigation(input) || self.menu_label(input) {
            return;
        }
        if self.session.state.awaits_input() {
            self.workflow_input(input);
            return;
        }
        if !self.browse(input) {
            self.say(text::NOT_UNDERSTOOD);
        }
    }

    fn navigation(&mut self, input: &str) -> bool {
        match input {
            text::BACK_TO_ROLES => {
                self.audit(ActionKind::ReturnedToRoles, "");
                let kind = self.session.browsing_kind();
                self.session.reset();
                self.show_roles(kind);
                true
            }
            text::BACK => {
                self.audit(ActionKind::WentBack, "");
                let selected = match &self.session.state {
                    SessionState::EntrySelected { kind, title } => Some((*kind, title.clone())),
                    _ => None,
                };
                self.session.reset();
                match selected {
                    Some((kind, title)) => {
                        let role = self.ctx.snapshot.entry(kind, &title).and_then(|e| e.role);
                        match role {
                            Some(role) => self.show_role_entries(kind, role),
                            None => self.show_roles(kind),
                        }
                    }
                    None => {
                        let menu = text::menu(self.chat(), self.ctx.privilege);
                        self.send(menu);
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn menu_label(&mut self, input: &str) -> bool {
        let Some(label) = MenuLabel::parse(input) else {
            return false;
        };

        if let MenuLabel::Browse(kind) = label {
            let action = match kind {
                EntryKind::Tutorial => ActionKind::BrowsedTutorials,
                EntryKind::Story => ActionKind::BrowsedStories,
            };
            self.audit(action, "");
            self.session.abandon_workflow();
            self.show_roles(kind);
            return true;
        }

        if !self.is_admin() {
            self.deny();
            return true;
        }

        match label {
            MenuLabel::Browse(_) => {}
            MenuLabel::Create(kind) => {
                let preset_role = self.session.preset_role(kind);
                self.audit(ActionKind::CreateStarted, kind.noun());
                self.session.state = SessionState::AwaitingTitle { kind, preset_role };
                self.say(text::title_prompt(kind));
            }
            MenuLabel::Manage(kind) => {
                self.audit(ActionKind::ManageOpened, kind.plural());
                self.session.abandon_workflow();
                self.show_manage(kind);
            }
            MenuLabel::Statistics => {
                self.audit(ActionKind::StatisticsRequested, "");
                self.session.abandon_workflow();
                self.steps.push(Step::ShowStatistics);
            }
            MenuLabel::Admins => {
                self.audit(ActionKind::AdminsListed, "");
                self.session.abandon_workflow();
                let list = text::admin_list(
                    self.chat(),
                    self.ctx.policy.super_admin(),
                    &self.ctx.snapshot.admins,
                );
                self.send(list);
            }
        }
        true
    }

    fn workflow_input(&mut self, input: &str) {
        if !self.is_admin() {
            self.deny();
            return;
        }

        match self.session.state.clone() {
            SessionState::AwaitingTitle { kind, preset_role } => {
                let title = input.trim();
                if title.is_empty() {
                    self.say(text::EMPTY_TITLE);
                    return;
                }
                self.audit(ActionKind::TitleEntered, title);
                self.say(text::bio_prompt(kind, title));
                self.session.state = SessionState::AwaitingBio {
                    kind,
                    title: title.to_string(),
                    preset_role,
                };
            }
            SessionState::AwaitingBio {
                kind,
                title,
                preset_role,
            } => {
                let bio = input.trim().to_string();
                self.audit(ActionKind::BioEntered, title.as_str());
                match preset_role {
                    Some(role) => {
                        self.audit(ActionKind::RolePreset, format!("{title} -> {role}"));
                        self.say(text::preset_role_prompt(role));
                        self.session.state = SessionState::AwaitingVideoId {
                            kind,
                            title,
                            bio,
                            role,
                        };
                    }
                    None => {
                        let prompt = OutboundMessage::new(self.chat(), text::role_prompt(kind, &title))
                            .with_keyboard(text::role_choice_keyboard());
                        self.send(prompt);
                        self.session.state = SessionState::AwaitingRole { kind, title, bio };
                    }
                }
            }
            SessionState::AwaitingRole { kind, title, bio } => {
                let Some(role) = self.expect_role(input) else {
                    return;
                };
                self.audit(ActionKind::RoleChosen, format!("{title} -> {role}"));
                self.say(text::VIDEO_PROMPT);
                self.session.state = SessionState::AwaitingVideoId {
                    kind,
                    title,
                    bio,
                    role,
                };
            }
            SessionState::AwaitingVideoId {
                kind,
                title,
                bio,
                role,
            } => {
                let Some(video) = self.expect_video(input) else {
                    return;
                };
                self.session.reset();
                self.mutate(Mutation::CreateOrAppend {
                    kind,
                    title,
                    bio,
                    role,
                    video,
                });
            }
            SessionState::AwaitingNewBio { kind, title } => {
                self.session.reset();
                self.mutate(Mutation::ReplaceBio {
                    kind,
                    title,
                    bio: input.trim().to_string(),
                });
            }
            SessionState::AwaitingNewRole { kind, title } => {
                let Some(role) = self.expect_role(input) else {
                    return;
                };
                self.session.reset();
                self.mutate(Mutation::ReplaceRole { kind, title, role });
            }
            SessionState::AwaitingNewVideo { kind, title } => {
                let Some(video) = self.expect_video(input) else {
                    return;
                };
                self.session.reset();
                self.mutate(Mutation::AddVideo { kind, title, video });
            }
            SessionState::AwaitingNewAdminName => self.admin_name(input),
            SessionState::Idle
            | SessionState::EntrySelected { .. }
            | SessionState::ConfirmDelete { .. } => {
                self.say(text::NOT_UNDERSTOOD);
            }
        }
    }

    /// Parses a role label or re-prompts, keeping the state.
    fn expect_role(&mut self, input: &str) -> Option<Role> {
        let role = Role::from_label(input.trim());
        if role.is_none() {
            let prompt = OutboundMessage::new(self.chat(), text::INVALID_ROLE)
                .with_keyboard(text::role_choice_keyboard());
            self.send(prompt);
        }
        role
    }

    /// Parses a video reference or re-prompts, keeping the state.
    fn expect_video(&mut self, input: &str) -> Option<MediaRef> {
        let video = MediaRef::parse(input);
        if video.is_none() {
            self.say(text::INVALID_VIDEO);
        }
        video
    }

    fn admin_name(&mut self, input: &str) {
        let actor = self.inbound.sender.username.as_str();
        let checked = self
            .ctx
            .policy
            .check_addition(actor, input, &self.ctx.snapshot.admins);

        match checked {
            Ok(username) => {
                self.session.reset();
                self.mutate(Mutation::AddAdmin {
                    username: username.to_string(),
                    added_by: actor.to_string(),
                });
            }
            Err(AccessError::EmptyUsername) => self.say(text::EMPTY_USERNAME),
            Err(AccessError::InvalidUsername { .. }) => self.say(text::INVALID_USERNAME),
            Err(rejection) => {
                self.session.reset();
                let message = match rejection {
                    AccessError::SelfTarget => text::ALREADY_ADMIN_SELF.to_string(),
                    AccessError::SuperAdminTarget => text::SUPER_ADMIN_TARGET.to_string(),
                    AccessError::AlreadyAdmin { username } => text::already_admin(&username),
                    _ => text::NOT_UNDERSTOOD.to_string(),
                };
                self.say(message);
            }
        }
    }

    /// Role filters and title selection.
    fn browse(&mut self, input: &str) -> bool {
        let kind = self.session.browsing_kind();

        if let Some(role) = Role::from_label(input) {
            self.audit(ActionKind::RoleFiltered, format!("{kind}: {role}"));
            self.show_role_entries(kind, role);
            return true;
        }

        let Some(found) = selector::resolve_any(self.ctx.snapshot, kind, input) else {
            return false;
        };

        self.audit(ActionKind::EntryViewed, format!("{}: {}", found.kind, found.title));
        self.session.state = SessionState::EntrySelected {
            kind: found.kind,
            title: found.title.to_string(),
        };
        self.session.browsing = Some(Browsing {
            kind: found.kind,
            role: found.entry.role,
        });
        self.steps.push(Step::Send(Outbound::Relay(RelayRequest {
            chat: self.chat(),
            caption: Caption {
                kind: found.kind,
                title: found.title.to_string(),
                role: found.entry.role,
                bio: found.entry.bio.clone(),
            },
            media: selector::media_sequence(found.entry).to_vec(),
        })));
        let back = text::press_back(self.chat());
        self.send(back);
        true
    }

    fn button(&mut self, payload: &str) {
        let Ok(Button { action, argument }) = payload.parse::<Button>() else {
            self.say(text::NOT_UNDERSTOOD);
            return;
        };
        self.audit(ActionKind::ButtonPressed, action.name());

        if !self.is_admin() {
            self.deny();
            return;
        }

        match action {
            ButtonAction::Delete(kind) => {
                if self.ctx.snapshot.entry(kind, &argument).is_none() {
                    self.session.reset();
                    self.say_with_menu(text::not_found(kind));
                    return;
                }
                let confirmation = text::delete_confirmation(self.chat(), kind, &argument);
                self.session.state = SessionState::ConfirmDelete {
                    kind,
                    title: argument,
                };
                self.send(confirmation);
            }
            ButtonAction::ConfirmDelete(kind) => {
                let pending = matches!(
                    &self.session.state,
                    SessionState::ConfirmDelete { kind: k, title } if *k == kind && *title == argument
                );
                self.session.reset();
                if pending {
                    self.mutate(Mutation::DeleteEntry {
                        kind,
                        title: argument,
                    });
                } else {
                    self.say_with_menu(text::DELETE_EXPIRED);
                }
            }
            ButtonAction::CancelDelete(_) => {
                self.session.reset();
                self.say_with_menu(text::DELETE_CANCELLED);
            }
            ButtonAction::UpdateBio(kind) => {
                self.say(text::new_bio_prompt(kind, &argument));
                self.session.state = SessionState::AwaitingNewBio {
                    kind,
                    title: argument,
                };
            }
            ButtonAction::UpdateRole(kind) => {
                let prompt = OutboundMessage::new(self.chat(), text::new_role_prompt(kind, &argument))
                    .with_keyboard(text::role_choice_keyboard());
                self.send(prompt);
                self.session.state = SessionState::AwaitingNewRole {
                    kind,
                    title: argument,
                };
            }
            ButtonAction::AddVideo(kind) => {
                self.say(text::new_video_prompt(kind, &argument));
                self.session.state = SessionState::AwaitingNewVideo {
                    kind,
                    title: argument,
                };
            }
            ButtonAction::AddAdmin => {
                self.say(text::ADMIN_PROMPT);
                self.session.state = SessionState::AwaitingNewAdminName;
            }
            ButtonAction::RemoveAdmin => {
                if self.ctx.snapshot.admins.is_empty() {
                    self.say(text::NO_EXTRA_ADMINS);
                } else {
                    let picker = text::removal_picker(self.chat(), &self.ctx.snapshot.admins);
                    self.send(picker);
                }
            }
            ButtonAction::ConfirmRemoveAdmin => {
                self.session.reset();
                match self
                    .ctx
                    .policy
                    .check_removal(&argument, &self.ctx.snapshot.admins)
                {
                    Ok(username) => self.mutate(Mutation::RemoveAdmin {
                        username: username.to_string(),
                    }),
                    Err(rejection) => {
                        let message = match rejection {
                            AccessError::SuperAdminTarget => text::SUPER_ADMIN_REMOVAL,
                            _ => text::NOT_IN_ADMIN_LIST,
                        };
                        self.say(message);
                        let list = text::admin_list(
                            self.chat(),
                            self.ctx.policy.super_admin(),
                            &self.ctx.snapshot.admins,
                        );
                        self.send(list);
                    }
                }
            }
            ButtonAction::DownloadLogs => {
                self.audit(ActionKind::ReportDownloaded, "");
                self.steps.push(Step::ExportActions);
            }
        }
    }

    fn show_roles(&mut self, kind: EntryKind) {
        self.session.browsing = Some(Browsing::roles(kind));
        let has_entries = !self.ctx.snapshot.collection(kind).is_empty();
        let list = text::role_list(self.chat(), kind, has_entries);
        self.send(list);
    }

    fn show_role_entries(&mut self, kind: EntryKind, role: Role) {
        self.session.browsing = Some(Browsing::role(kind, role));
        let titles = selector::filter_by_role(self.ctx.snapshot, kind, role);
        let list = text::role_entries(self.chat(), kind, role, &titles, self.ctx.privilege);
        self.send(list);
    }

    fn show_manage(&mut self, kind: EntryKind) {
        let chat = self.chat();
        let snapshot = self.ctx.snapshot;
        if snapshot.collection(kind).is_empty() {
            self.say_with_menu(text::nothing_to_manage(kind));
            return;
        }
        self.say(text::manage_intro(kind));
        for entry in selector::entries(snapshot, kind) {
            self.send(text::manage_entry(chat, kind, entry.title, entry.entry));
        }
        self.send(text::press_back(chat));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_guide_content::{AdminRecord, ContentEntry};
    use hero_guide_core::{Sender, UserId};

    const BOSS: &str = "boss";

    fn policy() -> AccessPolicy {
        AccessPolicy::new(BOSS)
    }

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.tutorials.insert(
            "Night Fighter".to_string(),
            ContentEntry::new("A brief tale", Some(Role::Fighter), MediaRef::new("55")),
        );
        snapshot
            .admins
            .insert("helper".to_string(), AdminRecord::new("helper", BOSS));
        snapshot
    }

    fn text(input: &str) -> InboundEvent {
        InboundEvent::Text {
            text: input.to_string(),
        }
    }

    fn button(payload: &str) -> InboundEvent {
        InboundEvent::Button {
            payload: payload.to_string(),
        }
    }

    fn command(name: &str, args: &str) -> InboundEvent {
        InboundEvent::Command {
            name: name.to_string(),
            args: args.to_string(),
        }
    }

    fn run(session: &Session, username: &str, event: InboundEvent, snapshot: &Snapshot) -> Transition {
        let policy = policy();
        let inbound = Inbound {
            chat: ChatId::new(7),
            sender: Sender::new(UserId::new(7), username),
            event,
        };
        let privilege = policy.privilege(username, &snapshot.admins);
        let ctx = Context {
            snapshot,
            policy: &policy,
            privilege,
        };
        transition(session, &inbound, &ctx)
    }

    #[test]
    fn create_workflow_collects_every_field() {
        let snapshot = Snapshot::default();
        let session = Session::new(UserId::new(7));

        let t = run(&session, BOSS, command("create", ""), &snapshot);
        assert_eq!(
            t.session.state,
            SessionState::AwaitingTitle {
                kind: EntryKind::Tutorial,
                preset_role: None
            }
        );

        let t = run(&t.session, BOSS, text("Night Fighter"), &snapshot);
        assert!(matches!(t.session.state, SessionState::AwaitingBio { .. }));

        let t = run(&t.session, BOSS, text("A brief tale"), &snapshot);
        assert!(matches!(t.session.state, SessionState::AwaitingRole { .. }));

        let t = run(&t.session, BOSS, text("Fighter"), &snapshot);
        assert_eq!(t.texts(), vec![text::VIDEO_PROMPT]);

        let t = run(&t.session, BOSS, text("55"), &snapshot);
        assert!(t.session.is_clear());
        assert_eq!(
            t.mutations(),
            vec![&Mutation::CreateOrAppend {
                kind: EntryKind::Tutorial,
                title: "Night Fighter".to_string(),
                bio: "A brief tale".to_string(),
                role: Role::Fighter,
                video: MediaRef::new("55"),
            }]
        );
    }

    #[test]
    fn create_story_command_takes_argument() {
        let t = run(
            &Session::new(UserId::new(7)),
            BOSS,
            command("create", "story"),
            &Snapshot::default(),
        );
        assert_eq!(
            t.session.state,
            SessionState::AwaitingTitle {
                kind: EntryKind::Story,
                preset_role: None
            }
        );
    }

    #[test]
    fn members_cannot_delete() {
        let snapshot = snapshot();
        let session = Session::new(UserId::new(7));
        let t = run(&session, "alice", button("delete_tutorial:Night Fighter"), &snapshot);

        assert_eq!(t.texts(), vec![text::DENIED]);
        assert_eq!(t.session, session);
        assert!(t.mutations().is_empty());
    }

    #[test]
    fn denied_workflow_input_keeps_state() {
        let mut session = Session::new(UserId::new(7));
        session.state = SessionState::AwaitingNewBio {
            kind: EntryKind::Tutorial,
            title: "Night Fighter".to_string(),
        };
        // "alice" lost admin rights between two messages.
        let t = run(&session, "alice", text("new bio"), &snapshot());

        assert_eq!(t.texts(), vec![text::DENIED]);
        assert_eq!(t.session, session);
    }

    #[test]
    fn browsed_role_is_preset_on_create() {
        let snapshot = snapshot();
        let t = run(&Session::new(UserId::new(7)), "helper", text(text::TUTORIALS), &snapshot);
        let t = run(&t.session, "helper", text("Fighter"), &snapshot);
        assert_eq!(t.session.browsing, Some(Browsing::role(EntryKind::Tutorial, Role::Fighter)));

        let t = run(&t.session, "helper", text(text::NEW_TUTORIAL), &snapshot);
        assert_eq!(
            t.session.state,
            SessionState::AwaitingTitle {
                kind: EntryKind::Tutorial,
                preset_role: Some(Role::Fighter)
            }
        );

        let t = run(&t.session, "helper", text("Dawn Fighter"), &snapshot);
        let t = run(&t.session, "helper", text("bio"), &snapshot);
        assert_eq!(
            t.session.state,
            SessionState::AwaitingVideoId {
                kind: EntryKind::Tutorial,
                title: "Dawn Fighter".to_string(),
                bio: "bio".to_string(),
                role: Role::Fighter
            }
        );
    }

    #[test]
    fn invalid_input_reprompts_in_place() {
        let mut session = Session::new(UserId::new(7));
        session.state = SessionState::AwaitingNewVideo {
            kind: EntryKind::Story,
            title: "Saga".to_string(),
        };
        let t = run(&session, BOSS, text("abc"), &snapshot());
        assert_eq!(t.texts(), vec![text::INVALID_VIDEO]);
        assert_eq!(t.session, session);

        session.state = SessionState::AwaitingNewRole {
            kind: EntryKind::Story,
            title: "Saga".to_string(),
        };
        let t = run(&session, BOSS, text("Healer"), &snapshot());
        assert_eq!(t.texts(), vec![text::INVALID_ROLE]);
        assert_eq!(t.session, session);
    }

    #[test]
    fn selecting_a_title_relays_media() {
        let snapshot = snapshot();
        let t = run(&Session::new(UserId::new(7)), "alice", text("Night Fighter"), &snapshot);

        let relay = t
            .steps
            .iter()
            .find_map(|step| match step {
                Step::Send(Outbound::Relay(relay)) => Some(relay),
                _ => None,
            })
            .expect("relay step");
        assert_eq!(relay.media, vec![MediaRef::new("55")]);
        assert_eq!(relay.caption.role, Some(Role::Fighter));
        assert_eq!(t.texts(), vec![text::PRESS_BACK]);
        assert!(t.steps.contains(&Step::Audit {
            action: ActionKind::EntryViewed,
            details: "tutorial: Night Fighter".to_string()
        }));

        let back = run(&t.session, "alice", text(text::BACK), &snapshot);
        assert_eq!(back.texts(), vec!["Tutorials for Fighter:"]);
        assert_eq!(
            back.session.browsing,
            Some(Browsing::role(EntryKind::Tutorial, Role::Fighter))
        );
    }

    #[test]
    fn back_outside_an_entry_shows_the_menu() {
        let t = run(&Session::new(UserId::new(7)), "alice", text(text::BACK), &snapshot());
        assert_eq!(t.texts(), vec![text::GREETING]);
    }

    #[test]
    fn confirm_delete_requires_a_pending_confirmation() {
        let snapshot = snapshot();
        let session = Session::new(UserId::new(7));

        let stale = run(&session, BOSS, button("confirm_delete:Night Fighter"), &snapshot);
        assert_eq!(stale.texts(), vec![text::DELETE_EXPIRED]);
        assert!(stale.mutations().is_empty());

        let asked = run(&session, BOSS, button("delete_tutorial:Night Fighter"), &snapshot);
        assert_eq!(
            asked.session.state,
            SessionState::ConfirmDelete {
                kind: EntryKind::Tutorial,
                title: "Night Fighter".to_string()
            }
        );
        let confirmed = run(&asked.session, BOSS, button("confirm_delete:Night Fighter"), &snapshot);
        assert_eq!(
            confirmed.mutations(),
            vec![&Mutation::DeleteEntry {
                kind: EntryKind::Tutorial,
                title: "Night Fighter".to_string()
            }]
        );
    }

    #[test]
    fn cancel_resets_a_pending_delete() {
        let mut session = Session::new(UserId::new(7));
        session.state = SessionState::ConfirmDelete {
            kind: EntryKind::Story,
            title: "Saga".to_string(),
        };
        let t = run(&session, BOSS, button("cancel_delete_story"), &snapshot());
        assert_eq!(t.texts(), vec![text::DELETE_CANCELLED]);
        assert!(t.session.is_clear());
    }

    #[test]
    fn admin_name_checks() {
        let snapshot = snapshot();
        let mut session = Session::new(UserId::new(7));
        session.state = SessionState::AwaitingNewAdminName;

        let empty = run(&session, BOSS, text("  @ "), &snapshot);
        assert_eq!(empty.texts(), vec![text::EMPTY_USERNAME]);
        assert_eq!(empty.session.state, SessionState::AwaitingNewAdminName);

        let this = run(&session, BOSS, text("@boss"), &snapshot);
        assert_eq!(this.texts(), vec![text::ALREADY_ADMIN_SELF]);
        assert!(this.session.is_clear());

        let existing = run(&session, BOSS, text("@helper"), &snapshot);
        assert_eq!(existing.texts(), vec!["@helper is already an admin."]);

        let spaced = run(&session, BOSS, text("hello there"), &snapshot);
        assert_eq!(spaced.texts(), vec![text::INVALID_USERNAME]);
        assert!(spaced.mutations().is_empty());
        assert_eq!(spaced.session.state, SessionState::AwaitingNewAdminName);

        let added = run(&session, BOSS, text("@newop"), &snapshot);
        assert_eq!(
            added.mutations(),
            vec![&Mutation::AddAdmin {
                username: "newop".to_string(),
                added_by: BOSS.to_string()
            }]
        );
    }

    #[test]
    fn super_admin_cannot_be_removed() {
        let t = run(
            &Session::new(UserId::new(7)),
            "helper",
            button("confirm_remove_admin:boss"),
            &snapshot(),
        );
        assert_eq!(t.texts()[0], text::SUPER_ADMIN_REMOVAL);
        assert!(t.mutations().is_empty());
    }

    #[test]
    fn removing_an_admin_ends_a_pending_addition() {
        let snapshot = snapshot();
        let mut session = Session::new(UserId::new(7));
        session.state = SessionState::AwaitingNewAdminName;

        let removed = run(&session, BOSS, button("confirm_remove_admin:helper"), &snapshot);
        assert_eq!(
            removed.mutations(),
            vec![&Mutation::RemoveAdmin {
                username: "helper".to_string()
            }]
        );
        assert!(removed.session.is_clear());

        let next = run(&removed.session, BOSS, text("hello there"), &snapshot);
        assert!(next.mutations().is_empty());
        assert_eq!(next.texts(), vec![text::NOT_UNDERSTOOD]);

        let refused = run(&session, BOSS, button("confirm_remove_admin:ghost"), &snapshot);
        assert!(refused.mutations().is_empty());
        assert!(refused.session.is_clear());
    }

    #[test]
    fn unmatched_input_is_not_understood() {
        let session = Session::new(UserId::new(7));
        let snapshot = snapshot();

        assert_eq!(
            run(&session, "alice", text("hello?"), &snapshot).texts(),
            vec![text::NOT_UNDERSTOOD]
        );
        assert_eq!(
            run(&session, "alice", command("frobnicate", ""), &snapshot).texts(),
            vec![text::UNKNOWN_COMMAND]
        );
        assert_eq!(
            run(&session, BOSS, button("bogus:1"), &snapshot).texts(),
            vec![text::NOT_UNDERSTOOD]
        );
    }

    #[test]
    fn statistics_and_export_are_engine_steps() {
        let snapshot = snapshot();
        let session = Session::new(UserId::new(7));

        let stats = run(&session, BOSS, text(text::STATISTICS), &snapshot);
        assert!(stats.steps.contains(&Step::ShowStatistics));

        let export = run(&session, BOSS, button("download_logs"), &snapshot);
        assert_eq!(export.steps.last(), Some(&Step::ExportActions));
    }
}

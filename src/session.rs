use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};

use crate::responder::{Action, AnalysisRequest, RequestKind};

/// File extensions the intake prompt accepts, matched case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["txt", "pdf"];

/// Metadata of the file a session is analyzing. Only the name, size and
/// extension are ever read; the content stays on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub size_bytes: u64,
    pub extension: String,
}

impl Document {
    /// Build a document from a path. The extension is checked against the
    /// allow-list before the filesystem is touched, so an unsupported file
    /// is rejected even if it does not exist.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("not a file path: {}", path.display()))?
            .to_string();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(anyhow!("unsupported file type: please choose a .txt or .pdf file"));
        }

        let metadata = std::fs::metadata(path)
            .with_context(|| format!("could not read {}", path.display()))?;

        Ok(Self {
            name,
            size_bytes: metadata.len(),
            extension,
        })
    }

    pub fn size_display(&self) -> String {
        format!("{:.1} KB", self.size_bytes as f64 / 1024.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in the append-only conversation log.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: u64,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    ActionMenu,
    FreeForm,
}

/// Single owner of all conversation state. Every mutation goes through a
/// transition method; the menu and free-form flags are never both set.
pub struct ChatSession {
    pub document: Option<Document>,
    pub awaiting_response: bool,
    pub menu_visible: bool,
    pub free_form: bool,
    pub draft: String,
    messages: Vec<Message>,
    keep_menu_open: bool,
    next_message_id: u64,
    epoch: u64,
}

impl ChatSession {
    pub fn new(keep_menu_open: bool) -> Self {
        Self {
            document: None,
            awaiting_response: false,
            menu_visible: false,
            free_form: false,
            draft: String::new(),
            messages: Vec::new(),
            keep_menu_open,
            next_message_id: 0,
            epoch: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.document.is_none() {
            Phase::Empty
        } else if self.free_form {
            Phase::FreeForm
        } else {
            Phase::ActionMenu
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn keep_menu_open(&self) -> bool {
        self.keep_menu_open
    }

    pub fn set_keep_menu_open(&mut self, keep: bool) {
        self.keep_menu_open = keep;
    }

    /// Install an accepted document and record the upload in the log.
    /// Ignored if a document is already loaded; reset first.
    pub fn accept_document(&mut self, document: Document) {
        if self.document.is_some() {
            return;
        }
        self.push_message(ChatRole::User, format!("Uploaded: {}", document.name));
        self.document = Some(document);
        self.menu_visible = true;
        self.free_form = false;
    }

    /// Run a predefined menu action. Returns the request to hand to the
    /// responder, or None when the trigger is disabled (no document, menu
    /// left behind, or a response already pending).
    pub fn trigger_action(&mut self, action: Action) -> Option<AnalysisRequest> {
        if self.awaiting_response || self.free_form {
            return None;
        }
        let document = self.document.clone()?;

        self.push_message(ChatRole::User, action.request_text().to_string());
        self.menu_visible = self.keep_menu_open;
        self.awaiting_response = true;

        Some(AnalysisRequest {
            epoch: self.epoch,
            document,
            kind: RequestKind::Action(action),
        })
    }

    /// Switch from the action menu to free-form questions. One-way until
    /// the next reset.
    pub fn enter_free_form(&mut self) -> bool {
        if self.document.is_none() || self.free_form || self.awaiting_response {
            return false;
        }
        self.menu_visible = false;
        self.free_form = true;
        true
    }

    /// Submit the current draft as a free-form question. Disabled while a
    /// response is pending or the draft is blank.
    pub fn submit_draft(&mut self) -> Option<AnalysisRequest> {
        if !self.free_form || self.awaiting_response {
            return None;
        }
        let text = self.draft.trim().to_string();
        if text.is_empty() {
            return None;
        }
        let document = self.document.clone()?;

        self.push_message(ChatRole::User, text.clone());
        self.draft.clear();
        self.awaiting_response = true;

        Some(AnalysisRequest {
            epoch: self.epoch,
            document,
            kind: RequestKind::Query(text),
        })
    }

    /// Append the responder's reply and clear the pending flag in one step.
    /// Results tagged with a stale epoch (the session was reset after
    /// dispatch) are discarded. Returns whether the reply was applied.
    pub fn complete_response(&mut self, epoch: u64, text: String) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.push_message(ChatRole::Assistant, text);
        self.awaiting_response = false;
        if !self.free_form {
            // With menu chaining off the menu hides while a response is
            // pending and comes back with the reply.
            self.menu_visible = true;
        }
        true
    }

    /// Clear the pending flag without appending anything, for a responder
    /// task that died. Stale epochs are ignored here too.
    pub fn abandon_response(&mut self, epoch: u64) {
        if epoch == self.epoch {
            self.awaiting_response = false;
            if !self.free_form {
                self.menu_visible = true;
            }
        }
    }

    /// Back to a blank session. Bumps the epoch so in-flight responder
    /// results are orphaned. Idempotent.
    pub fn reset(&mut self) {
        self.document = None;
        self.messages.clear();
        self.awaiting_response = false;
        self.menu_visible = false;
        self.free_form = false;
        self.draft.clear();
        self.epoch += 1;
    }

    fn push_message(&mut self, role: ChatRole, content: String) {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(Message {
            id,
            role,
            content,
            timestamp: Local::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes_txt() -> Document {
        Document {
            name: "notes.txt".to_string(),
            size_bytes: 2048,
            extension: "txt".to_string(),
        }
    }

    fn loaded_session() -> ChatSession {
        let mut session = ChatSession::new(true);
        session.accept_document(notes_txt());
        session
    }

    #[test]
    fn upload_moves_empty_session_to_action_menu() {
        let mut session = ChatSession::new(true);
        assert_eq!(session.phase(), Phase::Empty);

        session.accept_document(notes_txt());

        assert_eq!(session.phase(), Phase::ActionMenu);
        assert!(session.menu_visible);
        assert!(!session.free_form);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, ChatRole::User);
        assert_eq!(session.messages()[0].content, "Uploaded: notes.txt");
    }

    #[test]
    fn second_upload_is_ignored_until_reset() {
        let mut session = loaded_session();
        session.accept_document(Document {
            name: "other.pdf".to_string(),
            size_bytes: 10,
            extension: "pdf".to_string(),
        });

        assert_eq!(session.document.as_ref().unwrap().name, "notes.txt");
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn action_appends_user_message_and_blocks_until_reply() {
        let mut session = loaded_session();

        let request = session.trigger_action(Action::Summarize).expect("dispatch");
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].content, "Summarize");
        assert!(session.awaiting_response);
        assert!(session.menu_visible);

        // Triggers are disabled while the reply is pending.
        assert!(session.trigger_action(Action::CheckSafety).is_none());
        assert_eq!(session.messages().len(), 2);

        let applied = session.complete_response(request.epoch, "Summary of notes.txt".to_string());
        assert!(applied);
        assert!(!session.awaiting_response);
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[2].role, ChatRole::Assistant);
        assert_eq!(session.messages()[2].content, "Summary of notes.txt");
    }

    #[test]
    fn menu_hides_while_pending_when_chaining_is_off() {
        let mut session = ChatSession::new(false);
        session.accept_document(notes_txt());

        let request = session.trigger_action(Action::Summarize).expect("dispatch");
        assert!(!session.menu_visible);

        session.complete_response(request.epoch, "done".to_string());
        assert!(session.menu_visible);
    }

    #[test]
    fn other_switches_to_free_form_and_retires_the_menu() {
        let mut session = loaded_session();

        assert!(session.enter_free_form());
        assert_eq!(session.phase(), Phase::FreeForm);
        assert!(!session.menu_visible);
        assert!(session.free_form);

        // Predefined actions are no longer invocable until a reset.
        assert!(session.trigger_action(Action::Summarize).is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn submit_while_awaiting_is_a_no_op() {
        let mut session = loaded_session();
        session.enter_free_form();

        session.draft = "first question".to_string();
        assert!(session.submit_draft().is_some());

        session.draft = "What was decided?".to_string();
        assert!(session.submit_draft().is_none());
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.draft, "What was decided?");
    }

    #[test]
    fn blank_draft_is_not_submittable() {
        let mut session = loaded_session();
        session.enter_free_form();

        session.draft = "   ".to_string();
        assert!(session.submit_draft().is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn reset_clears_everything_and_is_idempotent() {
        let mut session = loaded_session();
        session.enter_free_form();
        session.draft = "pending text".to_string();

        session.reset();
        assert_eq!(session.phase(), Phase::Empty);
        assert!(session.document.is_none());
        assert!(session.messages().is_empty());
        assert!(!session.awaiting_response);
        assert!(!session.menu_visible);
        assert!(!session.free_form);
        assert!(session.draft.is_empty());

        session.reset();
        assert_eq!(session.phase(), Phase::Empty);
        assert!(session.messages().is_empty());
    }

    #[test]
    fn reply_dispatched_before_reset_is_discarded() {
        let mut session = loaded_session();
        let request = session.trigger_action(Action::Summarize).expect("dispatch");

        session.reset();

        assert!(!session.complete_response(request.epoch, "late reply".to_string()));
        assert!(session.messages().is_empty());
        assert!(!session.awaiting_response);
    }

    #[test]
    fn message_ids_increase_across_the_whole_session() {
        let mut session = loaded_session();
        let request = session.trigger_action(Action::Summarize).unwrap();
        session.complete_response(request.epoch, "reply".to_string());
        session.enter_free_form();
        session.draft = "and then?".to_string();
        session.submit_draft();

        let ids: Vec<u64> = session.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn intake_reads_size_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, vec![b'x'; 2048]).unwrap();

        let document = Document::from_path(&path).unwrap();
        assert_eq!(document.name, "notes.txt");
        assert_eq!(document.size_bytes, 2048);
        assert_eq!(document.extension, "txt");
        assert_eq!(document.size_display(), "2.0 KB");
    }

    #[test]
    fn intake_extension_check_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("REPORT.PDF");
        std::fs::write(&path, b"%PDF").unwrap();

        let document = Document::from_path(&path).unwrap();
        assert_eq!(document.extension, "pdf");
    }

    #[test]
    fn unsupported_extension_is_rejected_before_touching_disk() {
        // image.png does not exist; the allow-list check fires first.
        let err = Document::from_path(Path::new("image.png")).unwrap_err();
        assert!(err.to_string().contains("unsupported file type"));
    }
}

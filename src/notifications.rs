use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AdvanceError;

/// a toast or alert the app should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Notice {
    Success { title: String, message: String },
    Error { title: String, message: String },
    Info { title: String, message: String },
    Warning { title: String, message: String },
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice::Success {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice::Error {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice::Info {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice::Warning {
            title: title.into(),
            message: message.into(),
        }
    }

    /// an error notice carrying the failure's user-visible message
    pub fn from_error(title: impl Into<String>, err: &AdvanceError, fallback: &str) -> Self {
        Notice::error(title, err.user_message(fallback))
    }

    pub fn title(&self) -> &str {
        match self {
            Notice::Success { title, .. }
            | Notice::Error { title, .. }
            | Notice::Info { title, .. }
            | Notice::Warning { title, .. } => title,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success { message, .. }
            | Notice::Error { message, .. }
            | Notice::Info { message, .. }
            | Notice::Warning { message, .. } => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error { .. })
    }
}

/// the one place notices are rendered
pub trait NoticeSink {
    fn show(&mut self, notice: Notice);
}

/// in-memory sink; the app drains it on each frame
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: Vec<Notice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[Notice] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}

impl NoticeSink for NoticeQueue {
    fn show(&mut self, notice: Notice) {
        debug!(title = notice.title(), "notice queued");
        self.pending.push(notice);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InboxKind {
    Loan,
    General,
    Promo,
}

impl InboxKind {
    /// badge text
    pub fn label(&self) -> &'static str {
        match self {
            InboxKind::Loan => "LOAN",
            InboxKind::General => "GENERAL",
            InboxKind::Promo => "PROMO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: InboxKind,
    pub title: String,
    pub message: String,
    pub received_at: DateTime<Utc>,
    pub read: bool,
}

/// notifications received on this device, newest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inbox {
    items: Vec<InboxItem>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receive(
        &mut self,
        kind: InboxKind,
        title: impl Into<String>,
        message: impl Into<String>,
        received_at: DateTime<Utc>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(
            0,
            InboxItem {
                id,
                kind,
                title: title.into(),
                message: message.into(),
                received_at,
                read: false,
            },
        );
        id
    }

    pub fn items(&self) -> &[InboxItem] {
        &self.items
    }

    /// the count on the bell badge
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|item| !item.read).count()
    }

    /// `false` when no item has this id
    pub fn mark_read(&mut self, id: Uuid) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for item in &mut self.items {
            item.read = true;
        }
    }

    pub fn dismiss(&mut self, id: Uuid) -> Option<InboxItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }
}

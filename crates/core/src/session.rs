use crate::models::{Answer, RetrievedChunk};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sources shown per exchange when rendering the log.
pub const DISPLAY_SOURCE_LIMIT: usize = 5;

/// One question/answer exchange. Never mutated after it is logged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
    pub sources: Vec<RetrievedChunk>,
    pub asked_at: DateTime<Utc>,
}

impl QaRecord {
    pub fn new(question: impl Into<String>, answer: Answer) -> Self {
        Self {
            question: question.into(),
            answer: answer.text,
            sources: answer.sources,
            asked_at: Utc::now(),
        }
    }

    pub fn display_sources(&self) -> &[RetrievedChunk] {
        &self.sources[..self.sources.len().min(DISPLAY_SOURCE_LIMIT)]
    }
}

/// Append-only exchange history, oldest first. No cap and no deduplication.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    records: Vec<QaRecord>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: QaRecord) {
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &QaRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&QaRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// State owned by one interactive session. Created when the session starts,
/// dropped when it ends; nothing here is persisted.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub log: ConversationLog,
}

impl Session {
    pub fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            log: ConversationLog::new(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::start()
    }
}

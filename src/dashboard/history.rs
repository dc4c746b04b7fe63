use super::models::DashboardState;
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

/// One current slot plus ten prior snapshots.
pub const MAX_HISTORY: usize = 11;

pub const INITIAL_LABEL: &str = "Initial version";

/// An immutable snapshot of the dashboard at one point in time.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    id: String,
    timestamp: DateTime<Local>,
    label: String,
    snapshot: DashboardState,
}

impl HistoryEntry {
    fn new(label: String, state: &DashboardState) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Local::now(),
            label,
            snapshot: state.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn snapshot(&self) -> &DashboardState {
        &self.snapshot
    }
}

/// Bounded log of dashboard snapshots, most recent first.
///
/// Index 0 is the current version and index 1 the one `undo` returns to.
/// There is no redo: `undo` discards the current entry.
#[derive(Debug)]
pub struct HistoryManager {
    log: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            log: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, label: impl Into<String>, state: &DashboardState) -> &HistoryEntry {
        let entry = HistoryEntry::new(label.into(), state);
        log::debug!("history push '{}' ({})", entry.label, entry.id);
        self.log.push_front(entry);
        self.log.truncate(self.capacity);
        &self.log[0]
    }

    /// Drops the current entry and returns a copy of the one before it.
    /// Does nothing while only one entry remains.
    pub fn undo(&mut self) -> Option<DashboardState> {
        if !self.can_undo() {
            return None;
        }

        if let Some(undone) = self.log.pop_front() {
            log::debug!("history undo '{}'", undone.label);
        }
        self.current().map(|entry| entry.snapshot().clone())
    }

    /// Looks up any entry by id and returns a copy of its snapshot.
    /// The log itself is left untouched.
    pub fn restore_to(&self, id: &str) -> Result<DashboardState, HistoryError> {
        self.get(id)
            .map(|entry| entry.snapshot.clone())
            .ok_or_else(|| HistoryError::NotFound(id.to_string()))
    }

    pub fn initialize(&mut self, default_state: &DashboardState) {
        if self.is_empty() {
            self.push(INITIAL_LABEL, default_state);
        }
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.log.iter().find(|entry| entry.id == id)
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.log.front()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.log.iter()
    }

    pub fn can_undo(&self) -> bool {
        self.log.len() > 1
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, PartialEq)]
pub enum HistoryError {
    NotFound(String),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::NotFound(id) => write!(f, "History entry not found: {}", id),
        }
    }
}

impl std::error::Error for HistoryError {}

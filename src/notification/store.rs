use log::{debug, trace, warn};
use tokio::sync::watch;

use super::entry::{CurrentMessage, Entry};
use super::operation::OperationId;

/// Active notification entries, at most one per operation.
///
/// Every mutation republishes the [`CurrentMessage`] before returning, so a
/// subscriber never observes a projection that is out of date with respect
/// to the entries.
pub struct EntryStore {
    entries: Vec<Entry>,
    current: watch::Sender<CurrentMessage>,
    generation: u64,
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            current: watch::Sender::new(CurrentMessage::none()),
            generation: 0,
        }
    }

    pub fn add(&mut self, entry: Entry) {
        self.insert(entry);
        self.update_current();
    }

    /// Remove the entry tracked by `operation`, does nothing when it is
    /// already gone.
    pub fn remove(&mut self, operation: OperationId) -> Option<Entry> {
        let entry = self.take(operation)?;
        self.update_current();
        Some(entry)
    }

    /// Remove the entry tracked by `operation` together with the entry it
    /// supersedes, then add `replacement`. The current message is published
    /// once, after all of it.
    pub fn retire(&mut self, operation: OperationId, replacement: Option<Entry>) -> Option<Entry> {
        let retired = self.take(operation);
        if let Some(superseded) = retired.as_ref().and_then(|e| e.supersedes) {
            self.take(superseded);
        }
        if let Some(entry) = replacement {
            self.insert(entry);
        }
        self.update_current();
        retired
    }

    pub fn current(&self) -> CurrentMessage {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CurrentMessage> {
        self.current.subscribe()
    }

    /// Bumped every time the current message changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, operation: OperationId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.operation == operation)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, operation: OperationId) -> Option<usize> {
        self.entries.iter().position(|e| e.operation == operation)
    }

    fn insert(&mut self, entry: Entry) {
        if let Some(offset) = self.position(entry.operation) {
            warn!(
                "operation {} already has a notification, replacing it",
                entry.operation
            );
            self.entries.remove(offset);
        }
        debug!(
            "notification {} added: {} severity={} {:?}",
            entry.operation, entry.phase, entry.severity, entry.text
        );
        self.entries.push(entry);
    }

    fn take(&mut self, operation: OperationId) -> Option<Entry> {
        let offset = self.position(operation)?;
        debug!("notification {} removed", operation);
        Some(self.entries.remove(offset))
    }

    fn update_current(&mut self) {
        // max_by keeps the last of equal elements, so an exact tie goes to
        // the entry added most recently
        let current = self
            .entries
            .iter()
            .max_by(|a, b| {
                a.severity
                    .cmp(&b.severity)
                    .then(a.created_at.cmp(&b.created_at))
            })
            .map(CurrentMessage::from)
            .unwrap_or_default();

        let changed = self.current.send_if_modified(|previous| {
            if *previous == current {
                return false;
            }
            trace!("current notification: {:?}", current);
            *previous = current;
            true
        });
        if changed {
            self.generation += 1;
        }
    }
}

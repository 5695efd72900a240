use std::time::Duration;

use log::debug;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

use super::entry::{CurrentMessage, Entry, Phase};
use super::error::NotifierError;
use super::operation::{Operation, OperationId, Settlement};
use super::policy::Policy;
use super::store::EntryStore;
use crate::config::Config;

pub const DEFAULT_SEVERITY: u32 = 1;

/// Texts shown for each phase of a tracked operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages {
    pub start: Option<String>,
    pub success: Option<String>,
    pub fail: Option<String>,
    /// how long the success or fail message stays visible
    pub delay: Option<Duration>,
}

impl Messages {
    pub fn with_start(mut self, text: impl Into<String>) -> Self {
        self.start = Some(text.into());
        self
    }

    pub fn with_success(mut self, text: impl Into<String>) -> Self {
        self.success = Some(text.into());
        self
    }

    pub fn with_fail(mut self, text: impl Into<String>) -> Self {
        self.fail = Some(text.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Notification to show once an operation has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    pub text: Option<String>,
    pub severity: u32,
    pub phase: Phase,
    pub delay: Duration,
}

#[derive(Debug)]
pub enum NotifierEvent {
    /// Sent by a watcher task when its operation settles.
    Settled {
        operation: OperationId,
        follow_up: Option<FollowUp>,
    },
}

/// Tracks operations and keeps the store of their notifications.
///
/// Watching an operation happens on a spawned task, but the task only
/// reports back through a channel. The store is changed exclusively by
/// [`Notifier::handle`] which the owner calls from its event loop, either
/// directly with the result of [`Notifier::next_event`] or through
/// [`Notifier::process`].
///
/// Watcher and display-window tasks belong to the notifier: dropping it
/// aborts them, together with the operations they are still waiting on.
///
/// # Panics
///
/// Tracking an operation ([`Notifier::track`], [`Notifier::track_with`],
/// [`Notifier::on_success`], [`Notifier::on_fail`] and [`Notifier::notify`]
/// with an operation) and [`Notifier::handle`] for a settlement with a follow
/// up spawn tasks, and panic when called outside of a tokio runtime.
pub struct Notifier {
    store: EntryStore,
    tasks: JoinSet<()>,
    sender: mpsc::UnboundedSender<NotifierEvent>,
    receiver: mpsc::UnboundedReceiver<NotifierEvent>,
    next_id: u64,
    message_timeout: Duration,
    fail_message: String,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Notifier {
    pub fn new(config: &Config) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            store: EntryStore::new(),
            tasks: JoinSet::new(),
            sender,
            receiver,
            next_id: 0,
            message_timeout: config.message_timeout,
            fail_message: config.fail_message.clone(),
        }
    }

    pub fn current(&self) -> CurrentMessage {
        self.store.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<CurrentMessage> {
        self.store.subscribe()
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// Track `operation` using the policy called `policy`.
    ///
    /// The policy name is validated before anything is registered.
    pub fn track(
        &mut self,
        operation: Operation,
        messages: Messages,
        policy: &str,
        severity: Option<u32>,
    ) -> Result<OperationId, NotifierError> {
        let policy: Policy = policy.parse()?;
        Ok(self.track_with(operation, messages, policy, severity))
    }

    pub fn track_with(
        &mut self,
        operation: Operation,
        messages: Messages,
        policy: Policy,
        severity: Option<u32>,
    ) -> OperationId {
        let severity = severity.unwrap_or(DEFAULT_SEVERITY);
        let delay = messages.delay.unwrap_or(self.message_timeout);
        let phases = policy.phases();
        let id = self.next_operation_id();
        debug!("tracking operation {} ({})", id, policy);

        if phases.start {
            self.store
                .add(Entry::new(id, messages.start, severity, Phase::Start, None));
        }

        let on_success = phases.success.then(|| FollowUp {
            text: messages.success,
            severity,
            phase: Phase::Success,
            delay,
        });
        let on_fail = phases.fail.then(|| FollowUp {
            text: Some(messages.fail.unwrap_or_else(|| self.fail_message.clone())),
            severity,
            phase: Phase::Fail,
            delay,
        });
        self.watch(id, operation, on_success, on_fail);

        id
    }

    /// Show `text` until `operation` settles. Without an operation the
    /// message stays until it is dismissed.
    pub fn notify(
        &mut self,
        operation: Option<Operation>,
        text: impl Into<String>,
        severity: Option<u32>,
    ) -> OperationId {
        let messages = Messages::default().with_start(text);
        match operation {
            Some(operation) => self.track_with(operation, messages, Policy::StartOnly, severity),
            None => {
                let id = self.next_operation_id();
                self.store.add(Entry::new(
                    id,
                    messages.start,
                    severity.unwrap_or(DEFAULT_SEVERITY),
                    Phase::Start,
                    None,
                ));
                id
            }
        }
    }

    pub fn on_success(
        &mut self,
        operation: Operation,
        text: impl Into<String>,
        severity: Option<u32>,
    ) -> OperationId {
        let messages = Messages::default().with_success(text);
        self.track_with(operation, messages, Policy::SuccessOnly, severity)
    }

    pub fn on_fail(
        &mut self,
        operation: Operation,
        text: impl Into<String>,
        severity: Option<u32>,
    ) -> OperationId {
        let messages = Messages::default().with_fail(text);
        self.track_with(operation, messages, Policy::FailOnly, severity)
    }

    /// Remove the notification for `operation` along with the one it
    /// supersedes.
    pub fn dismiss(&mut self, operation: OperationId) {
        self.store.retire(operation, None);
    }

    pub async fn next_event(&mut self) -> Option<NotifierEvent> {
        self.receiver.recv().await
    }

    /// Wait for the next settlement and apply it.
    pub async fn process(&mut self) {
        if let Some(event) = self.receiver.recv().await {
            self.handle(event);
        }
    }

    /// Apply every settlement that has already arrived without waiting.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    pub fn handle(&mut self, event: NotifierEvent) {
        while self.tasks.try_join_next().is_some() {}

        match event {
            NotifierEvent::Settled {
                operation,
                follow_up: None,
            } => self.dismiss(operation),
            NotifierEvent::Settled {
                operation,
                follow_up: Some(follow_up),
            } => {
                // the settled operation's own entry goes, the follow up
                // has its own timer
                let synthetic = self.next_operation_id();
                let entry = Entry::new(
                    synthetic,
                    follow_up.text,
                    follow_up.severity,
                    follow_up.phase,
                    Some(operation),
                );
                self.store.retire(operation, Some(entry));
                self.watch(synthetic, Operation::timer(follow_up.delay), None, None);
            }
        }
    }

    pub fn running_tasks(&self) -> usize {
        self.tasks.len()
    }

    fn watch(
        &mut self,
        id: OperationId,
        operation: Operation,
        on_success: Option<FollowUp>,
        on_fail: Option<FollowUp>,
    ) {
        let sender = self.sender.clone();
        self.tasks.spawn(async move {
            let follow_up = match operation.await {
                Settlement::Succeeded => on_success,
                Settlement::Failed(reason) => {
                    debug!("operation {} failed: {}", id, reason);
                    on_fail
                }
            };
            // fails only when the notifier is gone
            let _ = sender.send(NotifierEvent::Settled {
                operation: id,
                follow_up,
            });
        });
    }

    fn next_operation_id(&mut self) -> OperationId {
        self.next_id += 1;
        OperationId(self.next_id)
    }
}

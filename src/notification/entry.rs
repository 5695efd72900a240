use std::fmt::Display;

use tokio::time::Instant;

use super::operation::OperationId;

pub const SUCCESS_SEVERITY_OFFSET: u32 = 100;
pub const FAIL_SEVERITY_OFFSET: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Success,
    Fail,
}

impl Phase {
    /// Added to the caller supplied severity so that, for the same base
    /// severity, fail > success > start.
    pub fn severity_offset(&self) -> u32 {
        match self {
            Phase::Start => 0,
            Phase::Success => SUCCESS_SEVERITY_OFFSET,
            Phase::Fail => FAIL_SEVERITY_OFFSET,
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Phase::Start => "start",
            Phase::Success => "success",
            Phase::Fail => "fail",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub created_at: Instant,
    pub text: Option<String>,
    pub operation: OperationId,
    pub severity: u32,
    pub phase: Phase,
    /// removed together with this entry
    pub supersedes: Option<OperationId>,
}

impl Entry {
    pub fn new(
        operation: OperationId,
        text: Option<String>,
        base_severity: u32,
        phase: Phase,
        supersedes: Option<OperationId>,
    ) -> Self {
        Entry {
            created_at: Instant::now(),
            text,
            operation,
            severity: base_severity.saturating_add(phase.severity_offset()),
            phase,
            supersedes,
        }
    }
}

/// The message to show the user right now.
///
/// The default value (everything `None`) means there is nothing to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentMessage {
    pub severity: Option<u32>,
    pub text: Option<String>,
    pub phase: Option<Phase>,
}

impl CurrentMessage {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.severity.is_none()
    }
}

impl From<&Entry> for CurrentMessage {
    fn from(entry: &Entry) -> Self {
        CurrentMessage {
            severity: Some(entry.severity),
            text: entry.text.clone(),
            phase: Some(entry.phase),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_entry_severity_includes_phase_offset() {
        let start = Entry::new(OperationId(1), None, 5, Phase::Start, None);
        let success = Entry::new(OperationId(2), None, 5, Phase::Success, None);
        let fail = Entry::new(OperationId(3), None, 5, Phase::Fail, None);

        assert_eq!(5, start.severity);
        assert_eq!(105, success.severity);
        assert_eq!(1005, fail.severity);
    }

    #[tokio::test]
    async fn test_severity_saturates() {
        let fail = Entry::new(OperationId(1), None, u32::MAX, Phase::Fail, None);
        assert_eq!(u32::MAX, fail.severity);
    }

    #[tokio::test]
    async fn test_current_message_from_entry() {
        let entry = Entry::new(
            OperationId(1),
            Some("saving".to_string()),
            1,
            Phase::Start,
            None,
        );
        assert_eq!(
            CurrentMessage {
                severity: Some(1),
                text: Some("saving".to_string()),
                phase: Some(Phase::Start),
            },
            CurrentMessage::from(&entry)
        );
        assert!(CurrentMessage::none().is_none());
    }
}

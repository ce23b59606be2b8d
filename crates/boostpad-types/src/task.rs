//! Task state machine enums
//!
//! Status transitions only move forward: `ACTIVE -> COMPLETED` and
//! `ACTIVE -> DELETED` are terminal. The single sanctioned reverse edge is a
//! "not working" report forcing a task back to `ACTIVE`, which exists to
//! counteract an unwarranted availability report.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Paused,
    Completed,
    Deleted,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Paused => "paused",
            TaskStatus::Completed => "completed",
            TaskStatus::Deleted => "deleted",
        }
    }

    /// Whether the task can still be deleted by its owner
    pub fn is_deletable(&self) -> bool {
        !matches!(self, TaskStatus::Completed | TaskStatus::Deleted)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownTaskValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(TaskStatus::Active),
            "paused" => Ok(TaskStatus::Paused),
            "completed" => Ok(TaskStatus::Completed),
            "deleted" => Ok(TaskStatus::Deleted),
            other => Err(UnknownTaskValue::status(other)),
        }
    }
}

/// Engagement action a task asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Like,
    Comment,
    Follow,
    Subscribe,
    View,
    Repost,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Like => "like",
            ActionType::Comment => "comment",
            ActionType::Follow => "follow",
            ActionType::Subscribe => "subscribe",
            ActionType::View => "view",
            ActionType::Repost => "repost",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = UnknownTaskValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "like" => Ok(ActionType::Like),
            "comment" => Ok(ActionType::Comment),
            "follow" => Ok(ActionType::Follow),
            "subscribe" => Ok(ActionType::Subscribe),
            "view" => Ok(ActionType::View),
            "repost" => Ok(ActionType::Repost),
            other => Err(UnknownTaskValue::action(other)),
        }
    }
}

/// Why a task left the ACTIVE state without completing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionReason {
    OwnerRequest,
    LinkUnavailable,
}

impl DeletionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionReason::OwnerRequest => "owner_request",
            DeletionReason::LinkUnavailable => "link_unavailable",
        }
    }
}

impl FromStr for DeletionReason {
    type Err = UnknownTaskValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner_request" => Ok(DeletionReason::OwnerRequest),
            "link_unavailable" => Ok(DeletionReason::LinkUnavailable),
            other => Err(UnknownTaskValue::deletion_reason(other)),
        }
    }
}

/// Reason code attached to a user's report on a task
///
/// `NotAvailable` and `NotWorking` carry lifecycle side effects; the rest are
/// recorded for moderation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    NotAvailable,
    NotWorking,
    Inappropriate,
    Other,
}

impl ReportReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportReason::NotAvailable => "not_available",
            ReportReason::NotWorking => "not_working",
            ReportReason::Inappropriate => "inappropriate",
            ReportReason::Other => "other",
        }
    }
}

impl FromStr for ReportReason {
    type Err = UnknownTaskValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_available" => Ok(ReportReason::NotAvailable),
            "not_working" => Ok(ReportReason::NotWorking),
            "inappropriate" => Ok(ReportReason::Inappropriate),
            "other" => Ok(ReportReason::Other),
            other => Err(UnknownTaskValue::report_reason(other)),
        }
    }
}

/// A task field held a string the domain enums do not recognize
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown {field}: {value}")]
pub struct UnknownTaskValue {
    pub field: &'static str,
    pub value: String,
}

impl UnknownTaskValue {
    fn status(v: &str) -> Self {
        Self { field: "task status", value: v.to_string() }
    }

    fn action(v: &str) -> Self {
        Self { field: "action type", value: v.to_string() }
    }

    fn deletion_reason(v: &str) -> Self {
        Self { field: "deletion reason", value: v.to_string() }
    }

    fn report_reason(v: &str) -> Self {
        Self { field: "report reason", value: v.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_not_deletable() {
        assert!(TaskStatus::Active.is_deletable());
        assert!(TaskStatus::Paused.is_deletable());
        assert!(!TaskStatus::Completed.is_deletable());
        assert!(!TaskStatus::Deleted.is_deletable());
    }

    #[test]
    fn action_parse_is_case_insensitive() {
        assert_eq!("LIKE".parse::<ActionType>().unwrap(), ActionType::Like);
        assert_eq!("Follow".parse::<ActionType>().unwrap(), ActionType::Follow);
        assert!("poke".parse::<ActionType>().is_err());
    }

    #[test]
    fn report_reason_round_trips() {
        for reason in [
            ReportReason::NotAvailable,
            ReportReason::NotWorking,
            ReportReason::Inappropriate,
            ReportReason::Other,
        ] {
            assert_eq!(reason.as_str().parse::<ReportReason>().unwrap(), reason);
        }
    }
}

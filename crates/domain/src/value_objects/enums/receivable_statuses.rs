use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReceivableStatus {
    Pending,
    Paid,
    Overdue,
    Canceled,
}

impl ReceivableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceivableStatus::Pending => "pending",
            ReceivableStatus::Paid => "paid",
            ReceivableStatus::Overdue => "overdue",
            ReceivableStatus::Canceled => "canceled",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReceivableStatus::Pending),
            "paid" => Some(ReceivableStatus::Paid),
            "overdue" => Some(ReceivableStatus::Overdue),
            "canceled" => Some(ReceivableStatus::Canceled),
            _ => None,
        }
    }

    /// Legal moves only. Paid and canceled are terminal; reversions are not
    /// allowed.
    pub fn can_transition_to(&self, next: ReceivableStatus) -> bool {
        match self {
            ReceivableStatus::Pending => matches!(
                next,
                ReceivableStatus::Paid | ReceivableStatus::Overdue | ReceivableStatus::Canceled
            ),
            ReceivableStatus::Overdue => {
                matches!(next, ReceivableStatus::Paid | ReceivableStatus::Canceled)
            }
            ReceivableStatus::Paid | ReceivableStatus::Canceled => false,
        }
    }
}

impl Display for ReceivableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_accept_no_moves() {
        assert!(!ReceivableStatus::Paid.can_transition_to(ReceivableStatus::Pending));
        assert!(!ReceivableStatus::Paid.can_transition_to(ReceivableStatus::Overdue));
        assert!(!ReceivableStatus::Canceled.can_transition_to(ReceivableStatus::Paid));
    }

    #[test]
    fn open_statuses_can_settle() {
        assert!(ReceivableStatus::Pending.can_transition_to(ReceivableStatus::Paid));
        assert!(ReceivableStatus::Pending.can_transition_to(ReceivableStatus::Overdue));
        assert!(ReceivableStatus::Overdue.can_transition_to(ReceivableStatus::Paid));
        assert!(ReceivableStatus::Overdue.can_transition_to(ReceivableStatus::Canceled));
        assert!(!ReceivableStatus::Overdue.can_transition_to(ReceivableStatus::Pending));
    }
}

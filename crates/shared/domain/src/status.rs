//! Service request status vocabulary shared by providers and clients.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{STATUS_CANCELLED, STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_PENDING};
use crate::error::{DomainError, DomainResult};

/// Lifecycle status of a service request.
///
/// `Completed` and `Cancelled` are terminal: once reached, the request
/// accepts no further status updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl RequestStatus {
    /// Statuses that accept no further updates
    pub const TERMINAL: [RequestStatus; 2] = [RequestStatus::Completed, RequestStatus::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => STATUS_PENDING,
            RequestStatus::InProgress => STATUS_IN_PROGRESS,
            RequestStatus::Completed => STATUS_COMPLETED,
            RequestStatus::Cancelled => STATUS_CANCELLED,
        }
    }

    /// Check if no further transitions are allowed
    pub fn is_terminal(&self) -> bool {
        Self::TERMINAL.contains(self)
    }

    /// Validate a move from `self` to `next`.
    pub fn transition_to(self, next: RequestStatus) -> DomainResult<RequestStatus> {
        if self.is_terminal() {
            return Err(DomainError::InvalidTransition(self.as_str().to_string()));
        }
        Ok(next)
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(RequestStatus::Pending),
            STATUS_IN_PROGRESS => Ok(RequestStatus::InProgress),
            STATUS_COMPLETED => Ok(RequestStatus::Completed),
            STATUS_CANCELLED => Ok(RequestStatus::Cancelled),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-status request tally used by provider and client stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub total_requests: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub cancelled: u64,
}

impl StatusBreakdown {
    /// Tally an iterator of statuses
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = RequestStatus>,
    {
        statuses.into_iter().fold(Self::default(), |mut acc, status| {
            acc.total_requests += 1;
            match status {
                RequestStatus::Pending => acc.pending += 1,
                RequestStatus::InProgress => acc.in_progress += 1,
                RequestStatus::Completed => acc.completed += 1,
                RequestStatus::Cancelled => acc.cancelled += 1,
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses() {
        assert_eq!("pending".parse::<RequestStatus>().unwrap(), RequestStatus::Pending);
        assert_eq!("in-progress".parse::<RequestStatus>().unwrap(), RequestStatus::InProgress);
        assert_eq!("completed".parse::<RequestStatus>().unwrap(), RequestStatus::Completed);
        assert_eq!("cancelled".parse::<RequestStatus>().unwrap(), RequestStatus::Cancelled);
    }

    #[test]
    fn rejects_unknown_status() {
        let err = "bogus".parse::<RequestStatus>().unwrap_err();
        assert_eq!(err, DomainError::InvalidStatus("bogus".to_string()));
    }

    #[test]
    fn terminal_statuses_are_locked() {
        assert!(RequestStatus::Completed
            .transition_to(RequestStatus::Pending)
            .is_err());
        assert!(RequestStatus::Cancelled
            .transition_to(RequestStatus::Cancelled)
            .is_err());
    }

    #[test]
    fn open_statuses_move_freely() {
        assert_eq!(
            RequestStatus::Pending.transition_to(RequestStatus::Completed),
            Ok(RequestStatus::Completed)
        );
        assert_eq!(
            RequestStatus::InProgress.transition_to(RequestStatus::Pending),
            Ok(RequestStatus::Pending)
        );
    }

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&RequestStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn tally_counts_each_status() {
        let breakdown = StatusBreakdown::tally([
            RequestStatus::Pending,
            RequestStatus::Completed,
            RequestStatus::Completed,
            RequestStatus::Cancelled,
        ]);
        assert_eq!(breakdown.total_requests, 4);
        assert_eq!(breakdown.pending, 1);
        assert_eq!(breakdown.in_progress, 0);
        assert_eq!(breakdown.completed, 2);
        assert_eq!(breakdown.cancelled, 1);
    }
}

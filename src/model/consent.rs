//! Per-user bidirectional consent
//!
//! Flags are advisory booleans. Nothing here enforces mutual exclusion, and
//! categorization only ever reads them.

use super::contacts::{ContactDirectory, UserKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Consent between the local user and one remote user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentRecord {
    pub local_grants_access_to_remote: bool,
    pub local_requests_access_from_remote: bool,
    pub remote_requests_access_from_local: bool,
    /// Derived from the roster: the remote user offers at least one instance
    pub remote_grants_access_to_local: bool,
    pub ignoring_remote_user_request: bool,
    pub ignoring_remote_user_offer: bool,
}

/// One consent mutation requested by the local user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsentAction {
    GrantAccess,
    CancelGrant,
    RequestAccess,
    CancelRequest,
    IgnoreOffer,
    UnignoreOffer,
    IgnoreRequest,
    UnignoreRequest,
}

impl ConsentAction {
    pub const ALL: [ConsentAction; 8] = [
        ConsentAction::GrantAccess,
        ConsentAction::CancelGrant,
        ConsentAction::RequestAccess,
        ConsentAction::CancelRequest,
        ConsentAction::IgnoreOffer,
        ConsentAction::UnignoreOffer,
        ConsentAction::IgnoreRequest,
        ConsentAction::UnignoreRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GrantAccess => "grant-access",
            Self::CancelGrant => "cancel-grant",
            Self::RequestAccess => "request-access",
            Self::CancelRequest => "cancel-request",
            Self::IgnoreOffer => "ignore-offer",
            Self::UnignoreOffer => "unignore-offer",
            Self::IgnoreRequest => "ignore-request",
            Self::UnignoreRequest => "unignore-request",
        }
    }

    /// Set the single flag this action controls
    pub fn apply(&self, record: &mut ConsentRecord) {
        match self {
            Self::GrantAccess => record.local_grants_access_to_remote = true,
            Self::CancelGrant => record.local_grants_access_to_remote = false,
            Self::RequestAccess => record.local_requests_access_from_remote = true,
            Self::CancelRequest => record.local_requests_access_from_remote = false,
            Self::IgnoreOffer => record.ignoring_remote_user_offer = true,
            Self::UnignoreOffer => record.ignoring_remote_user_offer = false,
            Self::IgnoreRequest => record.ignoring_remote_user_request = true,
            Self::UnignoreRequest => record.ignoring_remote_user_request = false,
        }
    }
}

impl fmt::Display for ConsentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsentAction {
    type Err = ConsentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ConsentError::InvalidAction(s.to_string()))
    }
}

/// Result of a successful consent mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsentChange {
    pub previous: ConsentRecord,
    pub current: ConsentRecord,
}

impl ConsentChange {
    /// Local grant went from true to false; active giving must stop
    pub fn revoked_grant(&self) -> bool {
        self.previous.local_grants_access_to_remote && !self.current.local_grants_access_to_remote
    }
}

/// Consent ledger errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsentError {
    #[error("Invalid consent action: {0}")]
    InvalidAction(String),

    #[error("User not found: {0}")]
    UserNotFound(UserKey),
}

/// Mutate the consent record of `key`
pub fn modify_consent(
    directory: &mut ContactDirectory,
    key: &UserKey,
    action: ConsentAction,
) -> Result<ConsentChange, ConsentError> {
    let user = directory
        .get_user_mut(key)
        .ok_or_else(|| ConsentError::UserNotFound(key.clone()))?;

    let previous = user.consent;
    action.apply(&mut user.consent);

    Ok(ConsentChange {
        previous,
        current: user.consent,
    })
}

/// Put a record back, e.g. after the backend rejected the change
pub fn restore_consent(
    directory: &mut ContactDirectory,
    key: &UserKey,
    record: ConsentRecord,
) -> Result<(), ConsentError> {
    let user = directory
        .get_user_mut(key)
        .ok_or_else(|| ConsentError::UserNotFound(key.clone()))?;
    user.consent = record;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_actions() {
        for action in ConsentAction::ALL {
            assert_eq!(action.as_str().parse::<ConsentAction>(), Ok(action));
        }
    }

    #[test]
    fn test_parse_malformed_action() {
        assert_eq!(
            "grant-everything".parse::<ConsentAction>(),
            Err(ConsentError::InvalidAction("grant-everything".to_string()))
        );
    }

    #[test]
    fn test_each_action_sets_one_flag() {
        for action in ConsentAction::ALL {
            let mut record = ConsentRecord::default();
            action.apply(&mut record);
            let flags = [
                record.local_grants_access_to_remote,
                record.local_requests_access_from_remote,
                record.ignoring_remote_user_offer,
                record.ignoring_remote_user_request,
            ];
            let expected = match action {
                ConsentAction::GrantAccess
                | ConsentAction::RequestAccess
                | ConsentAction::IgnoreOffer
                | ConsentAction::IgnoreRequest => 1,
                _ => 0,
            };
            assert_eq!(flags.iter().filter(|f| **f).count(), expected, "{}", action);
            assert!(!record.remote_requests_access_from_local);
            assert!(!record.remote_grants_access_to_local);
        }
    }

    #[test]
    fn test_cancel_grant_reports_revocation() {
        let mut record = ConsentRecord {
            local_grants_access_to_remote: true,
            ..Default::default()
        };
        let previous = record;
        ConsentAction::CancelGrant.apply(&mut record);

        let change = ConsentChange {
            previous,
            current: record,
        };
        assert!(change.revoked_grant());
    }

    #[test]
    fn test_cancel_grant_without_grant_is_not_revocation() {
        let record = ConsentRecord::default();
        let change = ConsentChange {
            previous: record,
            current: record,
        };
        assert!(!change.revoked_grant());
    }
}

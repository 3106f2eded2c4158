//! Backend update wire types
//!
//! Every update kind has its own fixed payload schema. Updates travel as
//! `{"type": "USER_FRIEND", "data": {...}}` with camelCase payload fields.

use crate::model::instances::InstanceId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// NETWORK payload: a network came online, changed, or went offline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMessage {
    pub name: String,
    pub user_id: String,
    pub online: bool,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub image_data: Option<String>,
}

/// Profile fields shared by USER_SELF and USER_FRIEND
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_data: Option<String>,
}

/// USER_SELF payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfMessage {
    pub network: String,
    pub user: UserProfile,
}

/// Consent flags as the backend reports them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentPayload {
    pub local_grants_access_to_remote: bool,
    pub local_requests_access_from_remote: bool,
    pub remote_requests_access_from_local: bool,
    pub ignoring_remote_user_request: bool,
    pub ignoring_remote_user_offer: bool,
}

/// USER_FRIEND payload: one roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub network: String,
    pub user: UserProfile,
    #[serde(default)]
    pub all_instance_ids: Vec<InstanceId>,
    #[serde(default)]
    pub offering_instances: Vec<InstanceId>,
    #[serde(default)]
    pub instances_sharing_with_local: Vec<InstanceId>,
    #[serde(default)]
    pub consent: Option<ConsentPayload>,
    #[serde(default)]
    pub is_online: bool,
}

/// STOP_GETTING_FROM_FRIEND payload
///
/// `instance_id: None` means "whatever we are getting from".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoppedGettingMessage {
    #[serde(default)]
    pub instance_id: Option<InstanceId>,
    #[serde(default)]
    pub error: bool,
}

/// One backend update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Update {
    Network(NetworkMessage),
    UserSelf(SelfMessage),
    UserFriend(UserData),
    StartGivingToFriend(InstanceId),
    StopGivingToFriend(InstanceId),
    StartGettingFromFriend(InstanceId),
    StopGettingFromFriend(StoppedGettingMessage),
}

impl Update {
    pub fn kind(&self) -> UpdateKind {
        match self {
            Self::Network(_) => UpdateKind::Network,
            Self::UserSelf(_) => UpdateKind::UserSelf,
            Self::UserFriend(_) => UpdateKind::UserFriend,
            Self::StartGivingToFriend(_) => UpdateKind::StartGivingToFriend,
            Self::StopGivingToFriend(_) => UpdateKind::StopGivingToFriend,
            Self::StartGettingFromFriend(_) => UpdateKind::StartGettingFromFriend,
            Self::StopGettingFromFriend(_) => UpdateKind::StopGettingFromFriend,
        }
    }

    /// Decode a payload for an update kind given by name
    pub fn decode(kind: &str, payload: serde_json::Value) -> Result<Self, UpdateError> {
        let kind: UpdateKind = kind.parse()?;
        let malformed = |e: serde_json::Error| UpdateError::Malformed {
            kind,
            reason: e.to_string(),
        };

        Ok(match kind {
            UpdateKind::Network => {
                Self::Network(serde_json::from_value(payload).map_err(malformed)?)
            }
            UpdateKind::UserSelf => {
                Self::UserSelf(serde_json::from_value(payload).map_err(malformed)?)
            }
            UpdateKind::UserFriend => {
                Self::UserFriend(serde_json::from_value(payload).map_err(malformed)?)
            }
            UpdateKind::StartGivingToFriend => {
                Self::StartGivingToFriend(serde_json::from_value(payload).map_err(malformed)?)
            }
            UpdateKind::StopGivingToFriend => {
                Self::StopGivingToFriend(serde_json::from_value(payload).map_err(malformed)?)
            }
            UpdateKind::StartGettingFromFriend => {
                Self::StartGettingFromFriend(serde_json::from_value(payload).map_err(malformed)?)
            }
            UpdateKind::StopGettingFromFriend => {
                Self::StopGettingFromFriend(serde_json::from_value(payload).map_err(malformed)?)
            }
        })
    }
}

/// Update kind names as the backend sends them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    Network,
    UserSelf,
    UserFriend,
    StartGivingToFriend,
    StopGivingToFriend,
    StartGettingFromFriend,
    StopGettingFromFriend,
}

impl UpdateKind {
    pub const ALL: [UpdateKind; 7] = [
        UpdateKind::Network,
        UpdateKind::UserSelf,
        UpdateKind::UserFriend,
        UpdateKind::StartGivingToFriend,
        UpdateKind::StopGivingToFriend,
        UpdateKind::StartGettingFromFriend,
        UpdateKind::StopGettingFromFriend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "NETWORK",
            Self::UserSelf => "USER_SELF",
            Self::UserFriend => "USER_FRIEND",
            Self::StartGivingToFriend => "START_GIVING_TO_FRIEND",
            Self::StopGivingToFriend => "STOP_GIVING_TO_FRIEND",
            Self::StartGettingFromFriend => "START_GETTING_FROM_FRIEND",
            Self::StopGettingFromFriend => "STOP_GETTING_FROM_FRIEND",
        }
    }
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateKind {
    type Err = UpdateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UpdateError::UnknownKind(s.to_string()))
    }
}

/// Update decoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    #[error("Unknown update type: {0}")]
    UnknownKind(String),

    #[error("Malformed {kind} payload: {reason}")]
    Malformed { kind: UpdateKind, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_network() {
        let update = Update::decode(
            "NETWORK",
            json!({"name": "testNetwork", "userId": "fakeUser", "online": true}),
        )
        .unwrap();

        assert_eq!(
            update,
            Update::Network(NetworkMessage {
                name: "testNetwork".to_string(),
                user_id: "fakeUser".to_string(),
                online: true,
                user_name: None,
                image_data: None,
            })
        );
    }

    #[test]
    fn test_decode_friend_with_partial_consent() {
        let update = Update::decode(
            "USER_FRIEND",
            json!({
                "network": "testNetwork",
                "user": {"userId": "testUser"},
                "allInstanceIds": ["testInstance"],
                "consent": {"localGrantsAccessToRemote": true},
                "isOnline": true
            }),
        )
        .unwrap();

        let Update::UserFriend(data) = update else {
            panic!("expected USER_FRIEND");
        };
        assert_eq!(data.all_instance_ids, vec![InstanceId::from("testInstance")]);
        let consent = data.consent.unwrap();
        assert!(consent.local_grants_access_to_remote);
        assert!(!consent.remote_requests_access_from_local);
        assert!(data.offering_instances.is_empty());
    }

    #[test]
    fn test_decode_bare_instance_id() {
        let update = Update::decode("START_GIVING_TO_FRIEND", json!("testInstance")).unwrap();
        assert_eq!(
            update,
            Update::StartGivingToFriend(InstanceId::from("testInstance"))
        );
        assert_eq!(update.kind(), UpdateKind::StartGivingToFriend);
    }

    #[test]
    fn test_decode_unknown_kind() {
        assert_eq!(
            Update::decode("SEND_FEEDBACK", json!(null)),
            Err(UpdateError::UnknownKind("SEND_FEEDBACK".to_string()))
        );
    }

    #[test]
    fn test_decode_malformed_payload() {
        let err = Update::decode("NETWORK", json!({"name": 3})).unwrap_err();
        assert!(matches!(
            err,
            UpdateError::Malformed {
                kind: UpdateKind::Network,
                ..
            }
        ));
    }

    #[test]
    fn test_tagged_json_form() {
        let line = r#"{"type":"STOP_GETTING_FROM_FRIEND","data":{"instanceId":null,"error":true}}"#;
        let update: Update = serde_json::from_str(line).unwrap();
        assert_eq!(
            update,
            Update::StopGettingFromFriend(StoppedGettingMessage {
                instance_id: None,
                error: true,
            })
        );
    }
}

//! Contact directory and access categorization
//!
//! Users are keyed by (network, userId). They are created on first sighting,
//! updated in place on every roster sync, and only ever removed when their
//! network tears down.

use super::consent::ConsentRecord;
use super::instances::InstanceId;
use crate::update::types::UserData;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identity of a remote user
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserKey {
    pub network: String,
    pub user_id: String,
}

impl UserKey {
    pub fn new(network: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            user_id: user_id.into(),
        }
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.user_id)
    }
}

/// A remote user on one network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub key: UserKey,
    pub name: Option<String>,
    pub image_data: Option<String>,
    pub is_online: bool,
    /// Instance ids from the most recent roster sync
    pub instance_ids: BTreeSet<InstanceId>,
    pub offering_instances: BTreeSet<InstanceId>,
    pub instances_sharing_with_local: BTreeSet<InstanceId>,
    pub consent: ConsentRecord,
}

impl User {
    fn new(key: UserKey) -> Self {
        Self {
            key,
            name: None,
            image_data: None,
            is_online: false,
            instance_ids: BTreeSet::new(),
            offering_instances: BTreeSet::new(),
            instances_sharing_with_local: BTreeSet::new(),
            consent: ConsentRecord::default(),
        }
    }

    /// Name shown in status text and notifications
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key.user_id)
    }

    /// Remote has agreed to give the local user access
    pub fn trusted_to_get_from(&self) -> bool {
        let c = &self.consent;
        c.local_requests_access_from_remote
            && c.remote_grants_access_to_local
            && !c.ignoring_remote_user_offer
    }

    /// Local has agreed to give this remote user access
    pub fn trusted_to_share_with(&self) -> bool {
        let c = &self.consent;
        c.remote_requests_access_from_local
            && c.local_grants_access_to_remote
            && !c.ignoring_remote_user_request
    }
}

/// Trusted/untrusted split for one access direction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustBuckets {
    pub trusted_uproxy: Vec<UserKey>,
    pub untrusted_uproxy: Vec<UserKey>,
}

/// Contacts grouped by what the UI can offer for them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCategories {
    pub get_access_contacts: TrustBuckets,
    pub share_access_contacts: TrustBuckets,
}

/// Result of a roster sync for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSync {
    pub key: UserKey,
    pub created: bool,
}

/// All known remote users across online networks
#[derive(Debug, Default)]
pub struct ContactDirectory {
    users: BTreeMap<UserKey, User>,
}

impl ContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a user from a USER_FRIEND payload
    ///
    /// Instance sets are replaced by the payload's lists so that a resend of
    /// the same roster entry is a no-op.
    pub fn sync_user(&mut self, data: &UserData) -> UserSync {
        let key = UserKey::new(&data.network, &data.user.user_id);
        let created = !self.users.contains_key(&key);
        let user = self
            .users
            .entry(key.clone())
            .or_insert_with(|| User::new(key.clone()));

        if data.user.name.is_some() {
            user.name = data.user.name.clone();
        }
        if data.user.image_data.is_some() {
            user.image_data = data.user.image_data.clone();
        }
        user.is_online = data.is_online;
        user.instance_ids = data.all_instance_ids.iter().cloned().collect();
        user.offering_instances = data.offering_instances.iter().cloned().collect();
        user.instances_sharing_with_local =
            data.instances_sharing_with_local.iter().cloned().collect();

        if let Some(consent) = &data.consent {
            user.consent.local_grants_access_to_remote = consent.local_grants_access_to_remote;
            user.consent.local_requests_access_from_remote =
                consent.local_requests_access_from_remote;
            user.consent.remote_requests_access_from_local =
                consent.remote_requests_access_from_local;
            user.consent.ignoring_remote_user_request = consent.ignoring_remote_user_request;
            user.consent.ignoring_remote_user_offer = consent.ignoring_remote_user_offer;
        }
        user.consent.remote_grants_access_to_local = !user.offering_instances.is_empty();

        UserSync { key, created }
    }

    pub fn get_user(&self, key: &UserKey) -> Option<&User> {
        self.users.get(key)
    }

    pub(crate) fn get_user_mut(&mut self, key: &UserKey) -> Option<&mut User> {
        self.users.get_mut(key)
    }

    /// Users on one network
    pub fn users_on<'a>(&'a self, network: &'a str) -> impl Iterator<Item = &'a User> + 'a {
        self.users.values().filter(move |u| u.key.network == network)
    }

    /// Drop every user of `network`, returning their keys
    pub fn remove_network(&mut self, network: &str) -> Vec<UserKey> {
        let keys: Vec<UserKey> = self.users_on(network).map(|u| u.key.clone()).collect();
        for key in &keys {
            self.users.remove(key);
        }
        keys
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Split all known users into get/share trust buckets
    ///
    /// Every user lands exactly once on each side. A contact with no consent
    /// signal is untrusted, never excluded.
    pub fn categorize(&self) -> ContactCategories {
        let mut users: Vec<&User> = self.users.values().collect();
        users.sort_by(|a, b| {
            a.display_name()
                .cmp(b.display_name())
                .then_with(|| a.key.cmp(&b.key))
        });

        let mut categories = ContactCategories::default();
        for user in users {
            let get = &mut categories.get_access_contacts;
            if user.trusted_to_get_from() {
                get.trusted_uproxy.push(user.key.clone());
            } else {
                get.untrusted_uproxy.push(user.key.clone());
            }

            let share = &mut categories.share_access_contacts;
            if user.trusted_to_share_with() {
                share.trusted_uproxy.push(user.key.clone());
            } else {
                share.untrusted_uproxy.push(user.key.clone());
            }
        }
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::types::{ConsentPayload, UserProfile};
    use proptest::prelude::*;

    fn user_data(user_id: &str, name: &str, instance: &str) -> UserData {
        UserData {
            network: "testNetwork".to_string(),
            user: UserProfile {
                user_id: user_id.to_string(),
                name: Some(name.to_string()),
                image_data: Some("testImageData".to_string()),
            },
            all_instance_ids: vec![InstanceId::from(instance)],
            offering_instances: vec![],
            instances_sharing_with_local: vec![],
            consent: Some(ConsentPayload::default()),
            is_online: true,
        }
    }

    #[test]
    fn test_user_without_consent_is_untrusted_both_ways() {
        let mut directory = ContactDirectory::new();
        directory.sync_user(&user_data("testUserId", "Alice", "instance1"));

        let contacts = directory.categorize();
        assert_eq!(contacts.get_access_contacts.trusted_uproxy.len(), 0);
        assert_eq!(contacts.get_access_contacts.untrusted_uproxy.len(), 1);
        assert_eq!(contacts.share_access_contacts.trusted_uproxy.len(), 0);
        assert_eq!(contacts.share_access_contacts.untrusted_uproxy.len(), 1);
    }

    #[test]
    fn test_mutual_share_consent_is_trusted_for_sharing() {
        let mut directory = ContactDirectory::new();
        let mut data = user_data("testUser", "Bob", "testInstance");
        data.consent = Some(ConsentPayload {
            local_grants_access_to_remote: true,
            local_requests_access_from_remote: true,
            remote_requests_access_from_local: true,
            ..Default::default()
        });
        directory.sync_user(&data);

        let contacts = directory.categorize();
        assert_eq!(contacts.share_access_contacts.trusted_uproxy.len(), 1);
        // Requesting alone doesn't make an offer
        assert_eq!(contacts.get_access_contacts.untrusted_uproxy.len(), 1);
    }

    #[test]
    fn test_offer_with_request_is_trusted_for_getting() {
        let mut directory = ContactDirectory::new();
        let mut data = user_data("u", "Carol", "i1");
        data.offering_instances = vec![InstanceId::from("i1")];
        data.consent = Some(ConsentPayload {
            local_requests_access_from_remote: true,
            ..Default::default()
        });
        directory.sync_user(&data);

        let contacts = directory.categorize();
        assert_eq!(contacts.get_access_contacts.trusted_uproxy.len(), 1);

        // Ignoring the offer demotes it
        data.consent = Some(ConsentPayload {
            local_requests_access_from_remote: true,
            ignoring_remote_user_offer: true,
            ..Default::default()
        });
        directory.sync_user(&data);
        let contacts = directory.categorize();
        assert_eq!(contacts.get_access_contacts.trusted_uproxy.len(), 0);
        assert_eq!(contacts.get_access_contacts.untrusted_uproxy.len(), 1);
    }

    #[test]
    fn test_resend_is_idempotent() {
        let mut directory = ContactDirectory::new();
        let data = user_data("u", "Alice", "i1");

        let first = directory.sync_user(&data);
        let before = directory.categorize();
        let second = directory.sync_user(&data);

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.categorize(), before);
        let user = directory.get_user(&first.key).unwrap();
        assert_eq!(user.instance_ids.len(), 1);
    }

    #[test]
    fn test_sync_without_consent_keeps_local_flags() {
        let mut directory = ContactDirectory::new();
        let mut data = user_data("u", "Alice", "i1");
        data.consent = Some(ConsentPayload {
            local_grants_access_to_remote: true,
            ..Default::default()
        });
        let key = directory.sync_user(&data).key;

        data.consent = None;
        directory.sync_user(&data);
        assert!(
            directory
                .get_user(&key)
                .unwrap()
                .consent
                .local_grants_access_to_remote
        );
    }

    #[test]
    fn test_remove_network_drops_only_that_network() {
        let mut directory = ContactDirectory::new();
        directory.sync_user(&user_data("a", "A", "i1"));
        let mut other = user_data("b", "B", "i2");
        other.network = "other".to_string();
        directory.sync_user(&other);

        let removed = directory.remove_network("testNetwork");
        assert_eq!(removed, vec![UserKey::new("testNetwork", "a")]);
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.users_on("other").count(), 1);
    }

    proptest! {
        #[test]
        fn prop_categorize_is_order_independent(
            flags in proptest::collection::vec(any::<(bool, bool, bool, bool)>(), 1..8),
            seed in any::<u64>(),
        ) {
            let payloads: Vec<UserData> = flags
                .iter()
                .enumerate()
                .map(|(i, (grant, request, remote_request, offers))| {
                    let mut data = user_data(&format!("u{}", i), "Same", &format!("i{}", i));
                    if *offers {
                        data.offering_instances = data.all_instance_ids.clone();
                    }
                    data.consent = Some(ConsentPayload {
                        local_grants_access_to_remote: *grant,
                        local_requests_access_from_remote: *request,
                        remote_requests_access_from_local: *remote_request,
                        ..Default::default()
                    });
                    data
                })
                .collect();

            let mut forward = ContactDirectory::new();
            for data in &payloads {
                forward.sync_user(data);
            }

            let mut shuffled = payloads.clone();
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();
            let mut backward = ContactDirectory::new();
            for data in &shuffled {
                backward.sync_user(data);
            }

            prop_assert_eq!(forward.categorize(), backward.categorize());
        }
    }
}

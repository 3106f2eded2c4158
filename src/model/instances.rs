//! Per-instance bookkeeping
//!
//! Instance ids are unique across every network. Records are never deleted
//! explicitly: an instance dropped from a user's roster stays resolvable until
//! its id is overwritten or its network goes offline.

use super::contacts::UserKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One install/device of a remote user
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub String);

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: InstanceId,
    pub owner: UserKey,
    /// Local is giving access to this instance
    pub is_getting_from_me: bool,
    /// This instance currently proxies for the local user
    pub is_sharing_with_local: bool,
    pub is_offering: bool,
}

#[derive(Debug, Default)]
pub struct InstanceTable {
    instances: BTreeMap<InstanceId, Instance>,
}

impl InstanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or re-own an instance record
    pub fn upsert(&mut self, id: &InstanceId, owner: &UserKey) -> &mut Instance {
        let instance = self.instances.entry(id.clone()).or_insert_with(|| Instance {
            id: id.clone(),
            owner: owner.clone(),
            is_getting_from_me: false,
            is_sharing_with_local: false,
            is_offering: false,
        });
        if &instance.owner != owner {
            instance.owner = owner.clone();
        }
        instance
    }

    /// Update the sharing-with-local flag, returning the previous value
    pub fn set_sharing_with_local(&mut self, id: &InstanceId, sharing: bool) -> Option<bool> {
        let instance = self.instances.get_mut(id)?;
        let previous = instance.is_sharing_with_local;
        instance.is_sharing_with_local = sharing;
        Some(previous)
    }

    /// Mark `id` as being given access. Returns false for unknown instances.
    pub fn start_giving(&mut self, id: &InstanceId) -> bool {
        match self.instances.get_mut(id) {
            Some(instance) => {
                instance.is_getting_from_me = true;
                true
            }
            None => false,
        }
    }

    /// Clear the giving flag. Returns whether it was set.
    pub fn stop_giving(&mut self, id: &InstanceId) -> bool {
        match self.instances.get_mut(id) {
            Some(instance) => std::mem::replace(&mut instance.is_getting_from_me, false),
            None => false,
        }
    }

    pub fn instances_given_to(&self) -> BTreeSet<InstanceId> {
        self.instances
            .values()
            .filter(|i| i.is_getting_from_me)
            .map(|i| i.id.clone())
            .collect()
    }

    pub fn get(&self, id: &InstanceId) -> Option<&Instance> {
        self.instances.get(id)
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        self.instances.contains_key(id)
    }

    /// Owner of `id`, if known
    pub fn user_for_instance(&self, id: &InstanceId) -> Option<&UserKey> {
        self.instances.get(id).map(|i| &i.owner)
    }

    pub fn instances_owned_by<'a>(
        &'a self,
        owner: &'a UserKey,
    ) -> impl Iterator<Item = &'a Instance> + 'a {
        self.instances.values().filter(move |i| &i.owner == owner)
    }

    pub fn owned_by_network(&self, network: &str) -> Vec<InstanceId> {
        self.instances
            .values()
            .filter(|i| i.owner.network == network)
            .map(|i| i.id.clone())
            .collect()
    }

    /// Drop every instance owned by a user of `network`
    pub fn remove_owned_by_network(&mut self, network: &str) -> Vec<InstanceId> {
        let ids = self.owned_by_network(network);
        for id in &ids {
            self.instances.remove(id);
        }
        ids
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

//! Online social networks and the local identity on each
//!
//! A network exists here only while the backend reports it online. Going
//! offline (or logging out) removes the entry; the owning aggregate cascades
//! the removal into contacts, instances and session state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A social network the local user is logged into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub name: String,

    /// Local user's id on this network
    pub user_id: String,

    /// Local display name (set by USER_SELF)
    pub user_name: Option<String>,

    /// Local avatar (set by USER_SELF)
    pub image_data: Option<String>,

    pub online: bool,
}

/// Outcome of a network sync, used by the aggregate to decide on cascades
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkChange {
    Created,
    Updated,
    /// Network went offline and was removed
    Removed,
    /// Offline update for a network we never had
    Ignored,
}

/// Registry of currently online networks
#[derive(Debug, Default)]
pub struct NetworkRegistry {
    networks: BTreeMap<String, Network>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a NETWORK update
    pub fn sync_network(
        &mut self,
        name: &str,
        user_id: &str,
        online: bool,
        display_name: Option<String>,
        image_data: Option<String>,
    ) -> NetworkChange {
        if !online {
            return match self.networks.remove(name) {
                Some(_) => NetworkChange::Removed,
                None => NetworkChange::Ignored,
            };
        }

        match self.networks.get_mut(name) {
            Some(network) => {
                network.user_id = user_id.to_string();
                if display_name.is_some() {
                    network.user_name = display_name;
                }
                if image_data.is_some() {
                    network.image_data = image_data;
                }
                NetworkChange::Updated
            }
            None => {
                self.networks.insert(
                    name.to_string(),
                    Network {
                        name: name.to_string(),
                        user_id: user_id.to_string(),
                        user_name: display_name,
                        image_data,
                        online: true,
                    },
                );
                NetworkChange::Created
            }
        }
    }

    /// Apply a USER_SELF profile to the local identity on `name`
    ///
    /// Returns false if the network is not online.
    pub fn sync_self(
        &mut self,
        name: &str,
        user_name: Option<String>,
        image_data: Option<String>,
    ) -> bool {
        let Some(network) = self.networks.get_mut(name) else {
            return false;
        };
        if user_name.is_some() {
            network.user_name = user_name;
        }
        if image_data.is_some() {
            network.image_data = image_data;
        }
        true
    }

    pub fn get_network(&self, name: &str) -> Option<&Network> {
        self.networks.get(name)
    }

    pub fn is_online(&self, name: &str) -> bool {
        self.networks.contains_key(name)
    }

    /// Online networks, ordered by name
    pub fn online_networks(&self) -> Vec<&Network> {
        self.networks.values().collect()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_creates_network() {
        let mut registry = NetworkRegistry::new();
        let change = registry.sync_network("testNetwork", "fakeUser", true, None, None);

        assert_eq!(change, NetworkChange::Created);
        assert_eq!(registry.len(), 1);
        let network = registry.get_network("testNetwork").unwrap();
        assert_eq!(network.name, "testNetwork");
        assert_eq!(network.user_id, "fakeUser");
        assert!(network.online);
    }

    #[test]
    fn test_repeat_login_updates_in_place() {
        let mut registry = NetworkRegistry::new();
        registry.sync_network("n", "u1", true, Some("Me".to_string()), None);
        let change = registry.sync_network("n", "u2", true, None, None);

        assert_eq!(change, NetworkChange::Updated);
        assert_eq!(registry.len(), 1);
        let network = registry.get_network("n").unwrap();
        assert_eq!(network.user_id, "u2");
        // Absent fields don't clobber known ones
        assert_eq!(network.user_name.as_deref(), Some("Me"));
    }

    #[test]
    fn test_offline_removes_network() {
        let mut registry = NetworkRegistry::new();
        registry.sync_network("n", "u", true, None, None);

        assert_eq!(
            registry.sync_network("n", "u", false, None, None),
            NetworkChange::Removed
        );
        assert!(registry.is_empty());
        assert!(registry.get_network("n").is_none());
    }

    #[test]
    fn test_offline_for_unknown_network_is_ignored() {
        let mut registry = NetworkRegistry::new();
        assert_eq!(
            registry.sync_network("n", "u", false, None, None),
            NetworkChange::Ignored
        );
    }

    #[test]
    fn test_sync_self_sets_profile() {
        let mut registry = NetworkRegistry::new();
        registry.sync_network("n", "u", true, None, None);

        assert!(registry.sync_self(
            "n",
            Some("testName".to_string()),
            Some("imageData".to_string())
        ));
        let network = registry.get_network("n").unwrap();
        assert_eq!(network.user_name.as_deref(), Some("testName"));
        assert_eq!(network.image_data.as_deref(), Some("imageData"));

        assert!(!registry.sync_self("other", None, None));
    }
}

//! Client-side model of networks, contacts, consent and instances
//!
//! `ProxyModel` is the single owned aggregate. The dispatcher is its only
//! writer; UI readers get shared references through the accessors.

pub mod consent;
pub mod contacts;
pub mod instances;
pub mod network;

pub use consent::{ConsentAction, ConsentChange, ConsentError, ConsentRecord};
pub use contacts::{ContactCategories, ContactDirectory, TrustBuckets, User, UserKey};
pub use instances::{Instance, InstanceId, InstanceTable};
pub use network::{Network, NetworkChange, NetworkRegistry};

use crate::session::coordinator::SessionCoordinator;
use crate::update::types::{NetworkMessage, SelfMessage, UserData};
use tracing::{debug, info};

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Model lookup errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("Network not found: {0}")]
    NetworkNotFound(String),

    #[error("Instance not found: {0}")]
    InstanceNotFound(InstanceId),
}

/// Networks, contacts, instances and session state
#[derive(Debug, Default)]
pub struct ProxyModel {
    pub(crate) networks: NetworkRegistry,
    pub(crate) contacts: ContactDirectory,
    pub(crate) instances: InstanceTable,
    pub(crate) session: SessionCoordinator,
}

impl ProxyModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn networks(&self) -> &NetworkRegistry {
        &self.networks
    }

    pub fn contacts(&self) -> &ContactDirectory {
        &self.contacts
    }

    pub fn instances(&self) -> &InstanceTable {
        &self.instances
    }

    pub fn session(&self) -> &SessionCoordinator {
        &self.session
    }

    pub fn get_network(&self, name: &str) -> Option<&Network> {
        self.networks.get_network(name)
    }

    pub fn get_user(&self, network: &str, user_id: &str) -> Option<&User> {
        self.contacts.get_user(&UserKey::new(network, user_id))
    }

    pub fn user_for_instance(&self, id: &InstanceId) -> Option<&User> {
        self.instances
            .user_for_instance(id)
            .and_then(|key| self.contacts.get_user(key))
    }

    pub fn categorize(&self) -> ContactCategories {
        self.contacts.categorize()
    }

    /// NETWORK update, cascading teardown when the network goes offline
    pub(crate) fn sync_network(&mut self, msg: &NetworkMessage) -> NetworkChange {
        if !msg.online {
            self.teardown_network(&msg.name);
        }
        let change = self.networks.sync_network(
            &msg.name,
            &msg.user_id,
            msg.online,
            msg.user_name.clone(),
            msg.image_data.clone(),
        );
        info!(network = %msg.name, ?change, "network synced");
        change
    }

    /// USER_SELF update
    pub(crate) fn sync_self(&mut self, msg: &SelfMessage) -> ModelResult<()> {
        if self.networks.sync_self(
            &msg.network,
            msg.user.name.clone(),
            msg.user.image_data.clone(),
        ) {
            Ok(())
        } else {
            Err(ModelError::NetworkNotFound(msg.network.clone()))
        }
    }

    /// USER_FRIEND update
    ///
    /// If the instance we are getting from was sharing with us and the new
    /// roster entry no longer lists it, the getting session has ended.
    pub(crate) fn sync_friend(&mut self, data: &UserData) -> ModelResult<()> {
        if !self.networks.is_online(&data.network) {
            return Err(ModelError::NetworkNotFound(data.network.clone()));
        }

        let sync = self.contacts.sync_user(data);
        if sync.created {
            debug!(user = %sync.key, "new contact");
        }
        let key = sync.key;
        for id in &data.all_instance_ids {
            let instance = self.instances.upsert(id, &key);
            instance.is_offering = data.offering_instances.contains(id);
        }

        let mut sharing_ended = Vec::new();
        let ids: Vec<InstanceId> = self
            .instances
            .instances_owned_by(&key)
            .map(|i| i.id.clone())
            .collect();
        for id in ids {
            let sharing = data.instances_sharing_with_local.contains(&id);
            if self.instances.set_sharing_with_local(&id, sharing) == Some(true) && !sharing {
                sharing_ended.push(id);
            }
        }

        for id in sharing_ended {
            if self.session.getting_from() == Some(&id) {
                debug!(instance = %id, "instance stopped sharing with us");
                self.session
                    .stopped_getting(&self.instances, &self.contacts, Some(&id), false);
            }
        }
        Ok(())
    }

    pub(crate) fn start_giving(&mut self, id: &InstanceId) -> ModelResult<()> {
        if self.session.start_giving(&mut self.instances, id) || self.instances.contains(id) {
            Ok(())
        } else {
            Err(ModelError::InstanceNotFound(id.clone()))
        }
    }

    pub(crate) fn stop_giving(&mut self, id: &InstanceId) -> bool {
        self.session
            .stop_giving(&mut self.instances, &self.contacts, id)
    }

    /// Start getting from `id`, returning the value it replaced
    pub(crate) fn start_getting(&mut self, id: &InstanceId) -> ModelResult<Option<InstanceId>> {
        self.session
            .start_getting(&self.instances, id)
            .ok_or_else(|| ModelError::InstanceNotFound(id.clone()))
    }

    pub(crate) fn restore_getting(&mut self, prior: Option<InstanceId>) {
        self.session.restore_getting(prior);
    }

    pub(crate) fn stopped_getting(&mut self, id: Option<&InstanceId>, error: bool) -> bool {
        self.session
            .stopped_getting(&self.instances, &self.contacts, id, error)
    }

    /// Apply a consent action; revoking a grant ends giving to that user
    pub(crate) fn modify_consent(
        &mut self,
        key: &UserKey,
        action: ConsentAction,
    ) -> Result<ConsentChange, ConsentError> {
        let change = consent::modify_consent(&mut self.contacts, key, action)?;
        if change.revoked_grant() {
            let active: Vec<InstanceId> = self
                .instances
                .instances_owned_by(key)
                .filter(|i| self.session.giving_to().contains(&i.id))
                .map(|i| i.id.clone())
                .collect();
            for id in active {
                info!(instance = %id, user = %key, "grant revoked, stopping giving");
                self.stop_giving(&id);
            }
        }
        Ok(change)
    }

    pub(crate) fn restore_consent(
        &mut self,
        key: &UserKey,
        record: ConsentRecord,
    ) -> Result<(), ConsentError> {
        consent::restore_consent(&mut self.contacts, key, record)
    }

    /// Recompute derived UI state after a transition
    pub(crate) fn refresh(&mut self) {
        self.session.refresh(&self.instances, &self.contacts);
    }

    /// End every session touching `network`, then drop its users and instances
    fn teardown_network(&mut self, network: &str) {
        let owned = self.instances.owned_by_network(network);
        for id in &owned {
            self.stop_giving(id);
        }
        if let Some(current) = self.session.getting_from().cloned() {
            if owned.contains(&current) {
                self.stopped_getting(Some(&current), false);
            }
        }

        let instances = self.instances.remove_owned_by_network(network);
        let users = self.contacts.remove_network(network);
        debug!(
            network,
            users = users.len(),
            instances = instances.len(),
            "network torn down"
        );
    }
}

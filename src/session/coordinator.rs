//! Giving/getting session state machine
//!
//! Two independent axes:
//! - giving: any number of instances at once
//! - getting: at most one instance (`Option`), a new start replaces the old
//!
//! Every stop is idempotent. The derived UI state (icon, status text) is a
//! pure function of the axes plus the directory, recomputed by `refresh` after
//! each transition. Effects are queued only when a derived value changes.

use super::effects::*;
use crate::model::contacts::{ContactDirectory, UserKey};
use crate::model::instances::{InstanceId, InstanceTable};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Last derived UI state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSnapshot {
    pub icon: Icon,
    pub sharing_status: Option<Message>,
    pub getting_status: Option<Message>,
}

#[derive(Debug, Default)]
pub struct SessionCoordinator {
    giving_to: BTreeSet<InstanceId>,
    getting_from: Option<InstanceId>,
    snapshot: UiSnapshot,
    pending: Vec<Effect>,
}

impl SessionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_giving_access(&self) -> bool {
        !self.giving_to.is_empty()
    }

    pub fn is_getting_access(&self) -> bool {
        self.getting_from.is_some()
    }

    pub fn giving_to(&self) -> &BTreeSet<InstanceId> {
        &self.giving_to
    }

    pub fn getting_from(&self) -> Option<&InstanceId> {
        self.getting_from.as_ref()
    }

    pub fn snapshot(&self) -> &UiSnapshot {
        &self.snapshot
    }

    /// Begin giving to `id`. Unknown instances are ignored.
    pub fn start_giving(&mut self, instances: &mut InstanceTable, id: &InstanceId) -> bool {
        if !instances.start_giving(id) {
            warn!(instance = %id, "start giving for unknown instance, ignoring");
            return false;
        }
        self.giving_to.insert(id.clone())
    }

    /// Stop giving to `id`
    ///
    /// Notifies only when `id` was actually being given to.
    pub fn stop_giving(
        &mut self,
        instances: &mut InstanceTable,
        contacts: &ContactDirectory,
        id: &InstanceId,
    ) -> bool {
        instances.stop_giving(id);
        if !self.giving_to.remove(id) {
            debug!(instance = %id, "stop giving for inactive instance");
            return false;
        }

        let message =
            Message::new(STOPPED_ACCESS_TO).arg("name", name_for(instances, contacts, id));
        let data = instances.user_for_instance(id).map(|user| NotificationData {
            mode: Mode::Share,
            user: user.clone(),
        });
        self.pending.push(Effect::Notify { message, data });
        true
    }

    /// Begin getting from `id`, replacing any current getting session
    ///
    /// Returns the replaced value, or `None` without changes if `id` is unknown.
    pub fn start_getting(
        &mut self,
        instances: &InstanceTable,
        id: &InstanceId,
    ) -> Option<Option<InstanceId>> {
        if !instances.contains(id) {
            warn!(instance = %id, "start getting from unknown instance, ignoring");
            return None;
        }
        Some(self.getting_from.replace(id.clone()))
    }

    /// Put the getting axis back to `prior` after a failed start
    pub fn restore_getting(&mut self, prior: Option<InstanceId>) {
        self.getting_from = prior;
    }

    /// The getting session ended
    ///
    /// `instance_id` of `None` ends whatever session is active; a mismatching
    /// id is stale and ignored. `error` marks an unexpected disconnect.
    pub fn stopped_getting(
        &mut self,
        instances: &InstanceTable,
        contacts: &ContactDirectory,
        instance_id: Option<&InstanceId>,
        error: bool,
    ) -> bool {
        let Some(current) = self.getting_from.clone() else {
            return false;
        };
        if let Some(id) = instance_id {
            if id != &current {
                debug!(instance = %id, current = %current, "stale stop getting, ignoring");
                return false;
            }
        }

        self.getting_from = None;
        self.pending.push(Effect::StopUsingProxy);
        if error {
            let message = Message::new(GETTING_STOPPED_UNEXPECTEDLY)
                .arg("name", name_for(instances, contacts, &current));
            let data = instances.user_for_instance(&current).map(|user| NotificationData {
                mode: Mode::Get,
                user: user.clone(),
            });
            self.pending.push(Effect::Notify { message, data });
        }
        true
    }

    /// Queue an effect produced outside a transition (e.g. proxy start)
    pub fn push_effect(&mut self, effect: Effect) {
        self.pending.push(effect);
    }

    /// Recompute derived UI state and queue effects for whatever changed
    pub fn refresh(&mut self, instances: &InstanceTable, contacts: &ContactDirectory) {
        let next = UiSnapshot {
            icon: self.icon(),
            sharing_status: self.sharing_status(instances, contacts),
            getting_status: self.getting_from.as_ref().map(|id| {
                Message::new(GETTING_ACCESS_FROM).arg("name", name_for(instances, contacts, id))
            }),
        };

        if next.icon != self.snapshot.icon {
            self.pending.push(Effect::SetIcon(next.icon));
        }
        if next.sharing_status != self.snapshot.sharing_status {
            self.pending.push(Effect::FireSignal {
                channel: Channel::SharingStatus,
                message: next.sharing_status.clone(),
            });
        }
        if next.getting_status != self.snapshot.getting_status {
            self.pending.push(Effect::FireSignal {
                channel: Channel::GettingStatus,
                message: next.getting_status.clone(),
            });
        }
        self.snapshot = next;
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.pending)
    }

    fn icon(&self) -> Icon {
        if self.is_giving_access() {
            Icon::Sharing
        } else if self.is_getting_access() {
            Icon::Getting
        } else {
            Icon::Default
        }
    }

    /// One message per distinct recipient user, singular vs plural variant
    fn sharing_status(
        &self,
        instances: &InstanceTable,
        contacts: &ContactDirectory,
    ) -> Option<Message> {
        let mut recipients = BTreeMap::new();
        for id in &self.giving_to {
            let who = match instances.user_for_instance(id) {
                Some(user) => Recipient::User(user.clone()),
                None => Recipient::Unresolved(id.clone()),
            };
            recipients.insert(who, name_for(instances, contacts, id));
        }

        let mut names: Vec<String> = recipients.into_values().collect();
        names.sort();
        match names.len() {
            0 => None,
            1 => Some(Message::new(SHARING_ACCESS_WITH_ONE).arg("name", names.remove(0))),
            n => Some(
                Message::new(SHARING_ACCESS_WITH_MANY)
                    .arg("name", names.remove(0))
                    .arg("numOthers", (n - 1).to_string()),
            ),
        }
    }
}

/// Who an active giving session counts toward
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Recipient {
    User(UserKey),
    Unresolved(InstanceId),
}

/// Display name for the owner of `id`, falling back to the ids themselves
fn name_for(instances: &InstanceTable, contacts: &ContactDirectory, id: &InstanceId) -> String {
    match instances.user_for_instance(id) {
        Some(key) => contacts
            .get_user(key)
            .map(|user| user.display_name().to_string())
            .unwrap_or_else(|| key.user_id.clone()),
        None => id.to_string(),
    }
}

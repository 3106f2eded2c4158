//! Update dispatcher
//!
//! Sole mutation entry point for the model. Each update is routed to exactly
//! one handler, the handler runs to completion, and the resulting UI effects
//! are flushed to the sink before the next update is looked at. Nothing a
//! single update does (unknown kind, bad payload, unknown id) can stop the
//! loop.

use super::stream::UpdateStream;
use super::types::Update;
use crate::model::{
    ConsentAction, ConsentChange, ConsentError, ConsentRecord, ContactCategories, InstanceId,
    ModelResult, Network, ProxyModel, UserKey,
};
use crate::session::coordinator::UiSnapshot;
use crate::session::effects::Effect;
use crate::ui::traits::EffectSink;
use futures::StreamExt;
use tracing::{debug, warn};

pub struct UpdateDispatcher<S: EffectSink> {
    model: ProxyModel,
    sink: S,
}

impl<S: EffectSink> UpdateDispatcher<S> {
    pub fn new(sink: S) -> Self {
        Self {
            model: ProxyModel::new(),
            sink,
        }
    }

    /// Apply one decoded update
    pub fn apply(&mut self, update: Update) {
        let kind = update.kind();
        debug!(%kind, "applying update");

        let result = match update {
            Update::Network(msg) => {
                self.model.sync_network(&msg);
                Ok(())
            }
            Update::UserSelf(msg) => self.model.sync_self(&msg),
            Update::UserFriend(data) => self.model.sync_friend(&data),
            Update::StartGivingToFriend(id) => self.model.start_giving(&id),
            Update::StopGivingToFriend(id) => {
                self.model.stop_giving(&id);
                Ok(())
            }
            Update::StartGettingFromFriend(id) => self.model.start_getting(&id).map(|_| ()),
            Update::StopGettingFromFriend(msg) => {
                self.model.stopped_getting(msg.instance_id.as_ref(), msg.error);
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!(%kind, error = %e, "update ignored");
        }
        self.flush();
    }

    /// Decode and apply an update given by kind name
    ///
    /// Returns false when the update was dropped.
    pub fn apply_raw(&mut self, kind: &str, payload: serde_json::Value) -> bool {
        match Update::decode(kind, payload) {
            Ok(update) => {
                self.apply(update);
                true
            }
            Err(e) => {
                warn!(error = %e, "dropping update");
                false
            }
        }
    }

    /// Drain `stream` in order until every sender is gone
    pub async fn run(&mut self, mut stream: UpdateStream) -> usize {
        let mut applied = 0;
        while let Some(update) = stream.next().await {
            self.apply(update);
            applied += 1;
        }
        debug!(applied, "update stream closed");
        applied
    }

    pub fn model(&self) -> &ProxyModel {
        &self.model
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn get_network(&self, name: &str) -> Option<&Network> {
        self.model.get_network(name)
    }

    pub fn categorize(&self) -> ContactCategories {
        self.model.categorize()
    }

    pub fn is_giving_access(&self) -> bool {
        self.model.session().is_giving_access()
    }

    pub fn is_getting_access(&self) -> bool {
        self.model.session().is_getting_access()
    }

    pub fn snapshot(&self) -> &UiSnapshot {
        self.model.session().snapshot()
    }

    // Local transitions driven by UI commands. They go through the
    // dispatcher so effects flush the same way as for backend updates.

    pub(crate) fn begin_getting(&mut self, id: &InstanceId) -> ModelResult<Option<InstanceId>> {
        let prior = self.model.start_getting(id);
        self.flush();
        prior
    }

    pub(crate) fn restore_getting(&mut self, prior: Option<InstanceId>) {
        self.model.restore_getting(prior);
        self.flush();
    }

    pub(crate) fn stopped_getting(&mut self, id: Option<&InstanceId>, error: bool) -> bool {
        let stopped = self.model.stopped_getting(id, error);
        self.flush();
        stopped
    }

    pub(crate) fn modify_consent(
        &mut self,
        key: &UserKey,
        action: ConsentAction,
    ) -> Result<ConsentChange, ConsentError> {
        let change = self.model.modify_consent(key, action);
        self.flush();
        change
    }

    pub(crate) fn restore_consent(
        &mut self,
        key: &UserKey,
        record: ConsentRecord,
    ) -> Result<(), ConsentError> {
        let restored = self.model.restore_consent(key, record);
        self.flush();
        restored
    }

    pub(crate) fn emit(&mut self, effect: Effect) {
        self.model.session.push_effect(effect);
        self.flush();
    }

    fn flush(&mut self) {
        self.model.refresh();
        for effect in self.model.session.drain_effects() {
            self.sink.apply(effect);
        }
    }
}

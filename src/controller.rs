//! UI command surface
//!
//! Commands make their local transition eagerly, then await the backend.
//! A backend failure puts the local state back to what it was and returns
//! the error to the caller.

use crate::backend::traits::{CoreClient, CoreError, Endpoint};
use crate::model::{ConsentAction, ConsentChange, ConsentError, InstanceId, ModelError, UserKey};
use crate::session::effects::Effect;
use crate::ui::traits::EffectSink;
use crate::update::dispatcher::UpdateDispatcher;
use crate::update::stream::UpdateStream;
use crate::update::types::{NetworkMessage, Update};
use tracing::{info, warn};

/// Command errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Backend error: {0}")]
    Backend(#[from] CoreError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Consent(#[from] ConsentError),
}

pub struct ProxyController<C: CoreClient, S: EffectSink> {
    core: C,
    dispatcher: UpdateDispatcher<S>,
}

impl<C: CoreClient, S: EffectSink> ProxyController<C, S> {
    pub fn new(core: C, sink: S) -> Self {
        Self {
            core,
            dispatcher: UpdateDispatcher::new(sink),
        }
    }

    pub fn dispatcher(&self) -> &UpdateDispatcher<S> {
        &self.dispatcher
    }

    /// Backend updates go through here
    pub fn apply(&mut self, update: Update) {
        self.dispatcher.apply(update);
    }

    pub async fn run(&mut self, stream: UpdateStream) -> usize {
        self.dispatcher.run(stream).await
    }

    pub async fn login(&mut self, network: &str) -> Result<(), CommandError> {
        self.core.login(network).await?;
        info!(network, "login requested");
        Ok(())
    }

    /// Log out and tear the network down locally once the backend agrees
    ///
    /// A backend that no longer has a session for `network` counts as agreeing.
    pub async fn logout(&mut self, network: &str) -> Result<(), CommandError> {
        let user_id = self
            .dispatcher
            .get_network(network)
            .map(|n| n.user_id.clone())
            .ok_or_else(|| ModelError::NetworkNotFound(network.to_string()))?;

        match self.core.logout(network).await {
            Ok(()) => {}
            Err(CoreError::NotLoggedIn(_)) => {
                warn!(network, "backend already logged out, tearing down locally");
            }
            Err(e) => return Err(e.into()),
        }
        self.dispatcher.apply(Update::Network(NetworkMessage {
            name: network.to_string(),
            user_id,
            online: false,
            user_name: None,
            image_data: None,
        }));
        Ok(())
    }

    /// Change consent locally, then tell the backend
    ///
    /// Giving sessions stopped by a revoked grant stay stopped even if the
    /// backend rejects the change; only the flags are restored.
    pub async fn modify_consent(
        &mut self,
        key: &UserKey,
        action: ConsentAction,
    ) -> Result<ConsentChange, CommandError> {
        let change = self.dispatcher.modify_consent(key, action)?;

        if let Err(e) = self
            .core
            .modify_consent(&key.network, &key.user_id, action)
            .await
        {
            warn!(user = %key, %action, error = %e, "consent change rejected, restoring");
            self.dispatcher.restore_consent(key, change.previous)?;
            return Err(e.into());
        }
        Ok(change)
    }

    /// Start getting access through `instance_id`
    ///
    /// The getting axis (and icon) switch immediately; the browser only starts
    /// using the proxy once the backend hands back an endpoint.
    pub async fn start_getting(
        &mut self,
        instance_id: &InstanceId,
    ) -> Result<Endpoint, CommandError> {
        let prior = self.dispatcher.begin_getting(instance_id)?;

        match self.core.start_proxying(&instance_id.0).await {
            Ok(endpoint) => {
                info!(instance = %instance_id, %endpoint, "getting access");
                self.dispatcher.emit(Effect::StartUsingProxy(endpoint.clone()));
                Ok(endpoint)
            }
            Err(e) => {
                warn!(instance = %instance_id, error = %e, "start proxying failed, reverting");
                self.dispatcher.restore_getting(prior);
                Err(e.into())
            }
        }
    }

    /// Stop getting access. Safe to call when not getting.
    pub async fn stop_getting(&mut self) -> Result<(), CommandError> {
        self.dispatcher.stopped_getting(None, false);
        self.core.stop_proxying().await?;
        Ok(())
    }
}

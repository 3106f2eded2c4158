//! Mock backend for testing
//!
//! Records every command and can be told to reject the next ones.

use super::traits::*;
use crate::model::consent::ConsentAction;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A command the mock received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentCommand {
    Login(String),
    Logout(String),
    ModifyConsent {
        network: String,
        user_id: String,
        action: ConsentAction,
    },
    StartProxying(String),
    StopProxying,
}

#[derive(Default)]
struct MockState {
    commands: Vec<SentCommand>,
    failures: VecDeque<CoreError>,
}

/// Mock backend client
#[derive(Clone)]
pub struct MockCoreClient {
    state: Arc<Mutex<MockState>>,
    endpoint: Endpoint,
}

impl MockCoreClient {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            endpoint: Endpoint {
                address: "127.0.0.1".to_string(),
                port: 9999,
            },
        }
    }

    /// Make the next command fail with `error`
    pub fn fail_next(&self, error: CoreError) {
        self.state.lock().unwrap().failures.push_back(error);
    }

    pub fn commands(&self) -> Vec<SentCommand> {
        self.state.lock().unwrap().commands.clone()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn record(&self, command: SentCommand) -> CoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(command);
        match state.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for MockCoreClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoreClient for MockCoreClient {
    async fn login(&self, network: &str) -> CoreResult<()> {
        self.record(SentCommand::Login(network.to_string()))
    }

    async fn logout(&self, network: &str) -> CoreResult<()> {
        self.record(SentCommand::Logout(network.to_string()))
    }

    async fn modify_consent(
        &self,
        network: &str,
        user_id: &str,
        action: ConsentAction,
    ) -> CoreResult<()> {
        self.record(SentCommand::ModifyConsent {
            network: network.to_string(),
            user_id: user_id.to_string(),
            action,
        })
    }

    async fn start_proxying(&self, instance_id: &str) -> CoreResult<Endpoint> {
        self.record(SentCommand::StartProxying(instance_id.to_string()))?;
        Ok(self.endpoint.clone())
    }

    async fn stop_proxying(&self) -> CoreResult<()> {
        self.record(SentCommand::StopProxying)
    }
}

//! Mock UI collaborators for testing
//!
//! Every call is recorded so tests can assert on icon changes, status-bar
//! signals and notifications.

use super::traits::*;
use crate::backend::traits::Endpoint;
use crate::session::effects::{Channel, Icon, NotificationData};
use std::sync::{Arc, Mutex};

/// A recorded notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownNotification {
    pub text: String,
    pub data: Option<NotificationData>,
}

#[derive(Default)]
struct BrowserState {
    icons: Vec<Icon>,
    notifications: Vec<ShownNotification>,
    proxy: Option<Endpoint>,
    proxy_starts: usize,
    proxy_stops: usize,
}

/// Mock browser host
#[derive(Clone, Default)]
pub struct MockBrowser {
    state: Arc<Mutex<BrowserState>>,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every icon set, in order
    pub fn icons(&self) -> Vec<Icon> {
        self.state.lock().unwrap().icons.clone()
    }

    pub fn last_icon(&self) -> Option<Icon> {
        self.state.lock().unwrap().icons.last().copied()
    }

    pub fn notifications(&self) -> Vec<ShownNotification> {
        self.state.lock().unwrap().notifications.clone()
    }

    /// Endpoint the browser is currently proxying through
    pub fn proxy(&self) -> Option<Endpoint> {
        self.state.lock().unwrap().proxy.clone()
    }

    pub fn proxy_stops(&self) -> usize {
        self.state.lock().unwrap().proxy_stops
    }

    pub fn proxy_starts(&self) -> usize {
        self.state.lock().unwrap().proxy_starts
    }
}

impl BrowserApi for MockBrowser {
    fn set_icon(&self, icon: Icon) {
        self.state.lock().unwrap().icons.push(icon);
    }

    fn show_notification(&self, text: &str, data: Option<&NotificationData>) {
        self.state
            .lock()
            .unwrap()
            .notifications
            .push(ShownNotification {
                text: text.to_string(),
                data: data.cloned(),
            });
    }

    fn start_using_proxy(&self, endpoint: &Endpoint) {
        let mut state = self.state.lock().unwrap();
        state.proxy = Some(endpoint.clone());
        state.proxy_starts += 1;
    }

    fn stop_using_proxy(&self) {
        let mut state = self.state.lock().unwrap();
        state.proxy = None;
        state.proxy_stops += 1;
    }
}

/// Mock background page
#[derive(Clone, Default)]
pub struct MockBackgroundUi {
    signals: Arc<Mutex<Vec<(Channel, Option<String>)>>>,
}

impl MockBackgroundUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<(Channel, Option<String>)> {
        self.signals.lock().unwrap().clone()
    }

    /// Payloads fired on one channel, in order
    pub fn signals_on(&self, channel: Channel) -> Vec<Option<String>> {
        self.signals
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub fn was_fired(&self, channel: Channel, payload: Option<&str>) -> bool {
        self.signals_on(channel)
            .iter()
            .any(|p| p.as_deref() == payload)
    }
}

impl BackgroundUi for MockBackgroundUi {
    fn fire_signal(&self, channel: Channel, payload: Option<&str>) {
        self.signals
            .lock()
            .unwrap()
            .push((channel, payload.map(str::to_string)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::effects::{Effect, Message, GETTING_ACCESS_FROM};
    use crate::ui::i18n::TemplateLocalizer;

    #[test]
    fn test_connector_routes_effects() {
        let browser = MockBrowser::new();
        let background = MockBackgroundUi::new();
        let mut ui = UiConnector::new(
            browser.clone(),
            background.clone(),
            TemplateLocalizer::new(),
        );

        ui.apply(Effect::SetIcon(Icon::Getting));
        ui.apply(Effect::FireSignal {
            channel: Channel::GettingStatus,
            message: Some(Message::new(GETTING_ACCESS_FROM).arg("name", "Alice")),
        });
        ui.apply(Effect::FireSignal {
            channel: Channel::GettingStatus,
            message: None,
        });

        assert_eq!(browser.icons(), vec![Icon::Getting]);
        assert_eq!(
            background.signals_on(Channel::GettingStatus),
            vec![Some("Getting access from Alice".to_string()), None]
        );
    }

    #[test]
    fn test_disabled_notifications_are_dropped() {
        let browser = MockBrowser::new();
        let mut ui = UiConnector::new(
            browser.clone(),
            MockBackgroundUi::new(),
            TemplateLocalizer::new(),
        )
        .with_notifications(false);

        ui.apply(Effect::Notify {
            message: Message::new("ANY"),
            data: None,
        });
        assert!(browser.notifications().is_empty());
    }
}

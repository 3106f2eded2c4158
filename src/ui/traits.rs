//! UI collaborator abstractions
//!
//! The browser extension host, background page and string tables live
//! outside this crate. These traits are the seams; `MockBrowser` and
//! `MockBackgroundUi` replace them in tests.

use crate::backend::traits::Endpoint;
use crate::session::effects::{Channel, Effect, Icon, Message, NotificationData};
use tracing::debug;

/// Browser host calls
pub trait BrowserApi {
    fn set_icon(&self, icon: Icon);

    fn show_notification(&self, text: &str, data: Option<&NotificationData>);

    /// Route browser traffic through the local proxy endpoint
    fn start_using_proxy(&self, endpoint: &Endpoint);

    fn stop_using_proxy(&self);
}

/// Background page signal bus
pub trait BackgroundUi {
    /// `None` clears the channel
    fn fire_signal(&self, channel: Channel, payload: Option<&str>);
}

/// Resolves message keys to user-facing text
pub trait Localizer {
    fn translate(&self, message: &Message) -> String;
}

/// Anything that can carry out coordinator effects
pub trait EffectSink {
    fn apply(&mut self, effect: Effect);
}

impl EffectSink for Vec<Effect> {
    fn apply(&mut self, effect: Effect) {
        self.push(effect);
    }
}

/// Connects coordinator effects to the three UI collaborators
pub struct UiConnector<B: BrowserApi, G: BackgroundUi, L: Localizer> {
    browser: B,
    background: G,
    i18n: L,
    notifications: bool,
}

impl<B: BrowserApi, G: BackgroundUi, L: Localizer> UiConnector<B, G, L> {
    pub fn new(browser: B, background: G, i18n: L) -> Self {
        Self {
            browser,
            background,
            i18n,
            notifications: true,
        }
    }

    /// Suppress desktop notifications (icon and status still update)
    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications = enabled;
        self
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub fn background(&self) -> &G {
        &self.background
    }
}

impl<B: BrowserApi, G: BackgroundUi, L: Localizer> EffectSink for UiConnector<B, G, L> {
    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::SetIcon(icon) => self.browser.set_icon(icon),
            Effect::FireSignal { channel, message } => {
                let text = message.map(|m| self.i18n.translate(&m));
                self.background.fire_signal(channel, text.as_deref());
            }
            Effect::Notify { message, data } => {
                if !self.notifications {
                    debug!(key = message.key, "notifications disabled, skipping");
                    return;
                }
                let text = self.i18n.translate(&message);
                self.browser.show_notification(&text, data.as_ref());
            }
            Effect::StartUsingProxy(endpoint) => self.browser.start_using_proxy(&endpoint),
            Effect::StopUsingProxy => self.browser.stop_using_proxy(),
        }
    }
}

//! Side effects the coordinator asks the UI collaborators to perform

use crate::backend::traits::Endpoint;
use crate::model::contacts::UserKey;
use serde::Serialize;
use std::fmt;

/// Browser toolbar icon
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Icon {
    #[default]
    Default,
    Sharing,
    Getting,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT_ICON",
            Self::Sharing => "SHARING_ICON",
            Self::Getting => "GETTING_ICON",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status-bar signal channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    SharingStatus,
    GettingStatus,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SharingStatus => "update-sharing-status",
            Self::GettingStatus => "update-getting-status",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const SHARING_ACCESS_WITH_ONE: &str = "SHARING_ACCESS_WITH_ONE";
pub const SHARING_ACCESS_WITH_MANY: &str = "SHARING_ACCESS_WITH_MANY";
pub const GETTING_ACCESS_FROM: &str = "GETTING_ACCESS_FROM";
pub const STOPPED_ACCESS_TO: &str = "STOPPED_ACCESS_TO";
pub const GETTING_STOPPED_UNEXPECTEDLY: &str = "GETTING_STOPPED_UNEXPECTEDLY";

/// A message key plus its arguments, resolved later by a `Localizer`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Message {
    pub key: &'static str,
    pub args: Vec<(&'static str, String)>,
}

impl Message {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.args.push((name, value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Which side of a session a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Share,
    Get,
}

/// Context attached to a notification so a click can open the right contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationData {
    pub mode: Mode,
    pub user: UserKey,
}

/// One UI side effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetIcon(Icon),
    FireSignal {
        channel: Channel,
        message: Option<Message>,
    },
    Notify {
        message: Message,
        data: Option<NotificationData>,
    },
    StartUsingProxy(Endpoint),
    StopUsingProxy,
}

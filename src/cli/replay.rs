//! Replay a recorded update log
//!
//! The log is JSON lines, one `{"type": KIND, "data": PAYLOAD}` object per
//! line. Updates go through the same stream and dispatcher the extension
//! uses; UI effects are printed as they happen, and the final read model is
//! printed as JSON at the end.

use super::config::TesseraConfig;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tessera::backend::Endpoint;
use tessera::model::{ContactCategories, Network};
use tessera::session::{Channel, Icon, NotificationData, UiSnapshot};
use tessera::ui::{BackgroundUi, BrowserApi, TemplateLocalizer, UiConnector};
use tessera::update::{Update, UpdateDispatcher, UpdateStream};
use tracing::{info, warn};

/// Prints browser calls to stdout
pub struct ConsoleBrowser;

impl BrowserApi for ConsoleBrowser {
    fn set_icon(&self, icon: Icon) {
        println!("icon         {}", icon.as_str());
    }

    fn show_notification(&self, text: &str, data: Option<&NotificationData>) {
        match data {
            Some(data) => println!("notify       {} ({})", text, data.user),
            None => println!("notify       {}", text),
        }
    }

    fn start_using_proxy(&self, endpoint: &Endpoint) {
        println!("proxy start  {}", endpoint);
    }

    fn stop_using_proxy(&self) {
        println!("proxy stop");
    }
}

/// Prints background signals to stdout
pub struct ConsoleBackground;

impl BackgroundUi for ConsoleBackground {
    fn fire_signal(&self, channel: Channel, payload: Option<&str>) {
        match payload {
            Some(text) => println!("signal       {} {:?}", channel.as_str(), text),
            None => println!("signal       {} (cleared)", channel.as_str()),
        }
    }
}

/// Final state printed after the replay
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplaySummary<'a> {
    applied: usize,
    dropped: usize,
    ui: &'a UiSnapshot,
    networks: Vec<&'a Network>,
    contacts: ContactCategories,
}

/// Decode one log line
///
/// Unknown kinds and malformed payloads are errors for this line only.
pub fn parse_line(line: &str) -> Result<Update, String> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| format!("invalid JSON: {}", e))?;

    let kind = value
        .get("type")
        .and_then(|k| k.as_str())
        .ok_or_else(|| "missing \"type\"".to_string())?;
    let data = value.get("data").cloned().unwrap_or(serde_json::Value::Null);

    Update::decode(kind, data).map_err(|e| e.to_string())
}

pub async fn execute(
    events: String,
    config: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = TesseraConfig::load_or_default(config.as_deref().map(Path::new))?;

    let contents = fs::read_to_string(&events)
        .map_err(|e| format!("Failed to read update log '{}': {}", events, e))?;

    let (stream, sender) = UpdateStream::new();
    let mut dropped = 0;
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Ok(update) => sender.send(update)?,
            Err(reason) => {
                warn!(line = index + 1, %reason, "skipping update");
                dropped += 1;
            }
        }
    }
    drop(sender);

    let sink = UiConnector::new(
        ConsoleBrowser,
        ConsoleBackground,
        TemplateLocalizer::with_overrides(&config.ui.messages),
    )
    .with_notifications(config.ui.notifications);
    let mut dispatcher = UpdateDispatcher::new(sink);

    let applied = dispatcher.run(stream).await;
    info!(applied, dropped, "replay finished");

    let summary = ReplaySummary {
        applied,
        dropped,
        ui: dispatcher.snapshot(),
        networks: dispatcher.model().networks().online_networks(),
        contacts: dispatcher.categorize(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

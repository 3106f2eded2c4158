//! UI-facing collaborators
//!
//! Icon, status-bar and notification effects leave the crate through these
//! traits. Rendering and real string tables are out of scope.

pub mod i18n;
pub mod mock;
pub mod traits;

pub use i18n::TemplateLocalizer;
pub use mock::{MockBackgroundUi, MockBrowser};
pub use traits::{BackgroundUi, BrowserApi, EffectSink, Localizer, UiConnector};

//! Proxying session state and derived UI effects

pub mod coordinator;
pub mod effects;

pub use coordinator::{SessionCoordinator, UiSnapshot};
pub use effects::{Channel, Effect, Icon, Message, Mode, NotificationData};

//! Tessera - client-side state engine for a peer-to-peer proxy-sharing extension
//!
//! Keeps the UI's picture of networks, contacts, consent and proxying
//! sessions in sync with backend updates, and derives the toolbar icon,
//! status text and notifications from it.
//!
//! Key principles:
//! - One owned model, mutated only by the update dispatcher
//! - Updates applied strictly in arrival order
//! - UI effects emitted only when something visible changed

pub mod backend;
pub mod controller;
pub mod model;
pub mod session;
pub mod ui;
pub mod update;

pub use controller::{CommandError, ProxyController};
pub use model::ProxyModel;
pub use update::{Update, UpdateDispatcher, UpdateStream};

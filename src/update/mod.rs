//! Backend updates: wire types, the inbound queue and the dispatcher

pub mod dispatcher;
pub mod stream;
pub mod types;

pub use dispatcher::UpdateDispatcher;
pub use stream::{UpdateSender, UpdateStream};
pub use types::{Update, UpdateError, UpdateKind, UserData};

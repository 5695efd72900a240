//! Transient status notifications for in-flight operations.
//!
//! A [`Notifier`] tracks asynchronous operations and keeps a single
//! [`CurrentMessage`]: the most severe (then most recent) entry of all the
//! notifications that are active right now.

pub mod entry;
pub mod error;
pub mod operation;
pub mod policy;
pub mod store;
pub mod tracker;

pub use entry::{CurrentMessage, Entry, Phase};
pub use error::NotifierError;
pub use operation::{Deferred, Operation, OperationId, Settlement};
pub use policy::{Phases, Policy};
pub use store::EntryStore;
pub use tracker::{FollowUp, Messages, Notifier, NotifierEvent};

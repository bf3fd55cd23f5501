//! Ports for observability collaborators

pub mod outbound;

pub use outbound::{CompositeObserver, LedgerObserver, NoopObserver};

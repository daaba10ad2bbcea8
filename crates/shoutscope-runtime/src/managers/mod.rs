//! Stateful managers used by the watch task

pub mod subscription;

pub use subscription::{SubscriptionManager, SubscriptionReport};

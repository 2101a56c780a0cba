//! Configuration change notification system.
//!
//! Lets collaborators such as a settings screen react to remote updates.

pub mod subscriber;

pub use subscriber::{SubscriberRegistry, SubscriptionHandle, SubscriptionId};

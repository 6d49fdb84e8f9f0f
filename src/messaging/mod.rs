/// Messaging module
///
/// Pub/sub event fan-out from the core to its collaborators. The core only
/// publishes; rendering and notice display happen on the subscriber side.
pub mod bus;
pub mod events;

// Re-export commonly used types
pub use bus::{EventBus, SubscriberId};
pub use events::Event;

//! Event source implementations
//!
//! - [`bus`]: in-process channels fed by a decoder or relay
//! - [`replay`]: recorded relay logs

pub mod bus;
pub mod replay;

pub use bus::{EventBus, EventPublisher, EventSubscriber};
pub use replay::ReplaySource;

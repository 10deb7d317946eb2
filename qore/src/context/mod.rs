//! Run inputs shared by every stage.

mod inputs;

pub use inputs::InputContext;

//! Session schedulers for the study modes.
//!
//! Both modes share one shape: a shuffled work queue with a side channel
//! for cards that must come back. Write mode uses a two-pool retry queue,
//! learn mode a three-pool mastery queue.

pub mod learn;
pub mod write;

pub use learn::{LearnSession, SelfReport};
pub use write::WriteSession;

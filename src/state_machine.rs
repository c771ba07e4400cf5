//! Conversation state machine
//!
//! States are a closed enum, guards a closed registry of pure predicates and
//! the transitions a declarative table. `advance` applies the table to one
//! session at a time and holds no state of its own.

pub mod graph;
pub mod guard;
pub mod state;
pub mod table;
mod transition;

#[cfg(test)]
mod proptests;

pub use graph::to_dot;
pub use guard::Guard;
pub use state::StatState;
pub use table::{LoopBack, TransitionTable};
pub use transition::{advance, Applied, TransitionError, TransitionResult};

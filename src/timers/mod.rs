//! Nested wall clock timers for the solver phases.

mod timers;
pub(crate) use timers::*;

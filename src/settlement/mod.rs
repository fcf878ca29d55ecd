//! Balance calculation and settlement planning.

pub mod balance;
pub mod planner;

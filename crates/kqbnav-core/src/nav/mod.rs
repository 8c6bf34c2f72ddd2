//! Navigation - screen-state machine over the classifier and keyboard
//!
//! # Components
//! - `NavigationBudget`: wall-clock countdown charged by back-off sleeps
//! - `plan`: the transition table
//! - `Navigator`: the classify → maneuver loop

mod budget;
mod navigator;
mod plan;

pub use budget::NavigationBudget;
pub use navigator::{NavOutcome, Navigator};
pub use plan::{plan, Step};

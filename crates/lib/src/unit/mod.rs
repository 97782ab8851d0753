//! Build units.
//!
//! A build unit is a named, mutable configuration scope: one per module plus
//! one root per package. Units own their configurations, archive tasks,
//! attached capabilities, and the queue of actions that run once the unit
//! settles.
//!
//! # Lifecycle
//!
//! ```text
//! Created -> Evaluating -> Evaluated -> Settled
//! ```
//!
//! User configuration code runs while a unit is `Evaluating`. A unit is
//! `Settled` once every configuration action for it has run; from then on its
//! task inputs and user-facing properties are final.

mod types;

pub use types::*;

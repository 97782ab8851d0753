//! End-to-end configuration passes over war modules and an ear package.

mod common;
mod ordering_tests;
mod property_tests;
mod scenario_tests;

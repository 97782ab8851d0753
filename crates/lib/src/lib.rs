//! earwire-lib: configuration-time wiring of web modules into an enterprise
//! archive.
//!
//! This crate provides:
//! - `BuildGraph`: the units of one build and their evaluation order
//! - `Configuration`: named dependency sets with a minimal resolver
//! - `ArchiveTask`: archive tasks with lazy classpaths and lazy file names
//! - Capability probes and post-settle actions, the ordering primitives
//! - `WarPlugin` and `EarPlugin`, which wire modules into a package
//! - `ConfigurationPass`: evaluates then settles every unit

pub mod capability;
pub mod configuration;
pub mod consts;
pub mod descriptor;
pub mod error;
pub mod graph;
pub mod lifecycle;
pub mod pass;
pub mod plugin;
pub mod settings;
pub mod task;
pub mod unit;

pub use capability::{CapabilityHandle, CapabilityId, on_capability_attached};
pub use configuration::{
  Artifact, Configuration, Dependency, ModuleCoordinate, add_module_as_library_dependency, declared_content,
  resolve_configuration,
};
pub use descriptor::DeploymentDescriptor;
pub use error::WiringError;
pub use graph::BuildGraph;
pub use lifecycle::{after_unit_settles, evaluate_unit, settle_unit};
pub use pass::ConfigurationPass;
pub use plugin::{EarPlugin, Plugin, WarPlugin, WiringState, apply_plugin};
pub use settings::PluginSettings;
pub use task::{ArchiveTask, FileCollection, FileSource, remove_configuration_from_classpath};
pub use unit::{BuildUnit, Phase, UnitId, UnitPath};

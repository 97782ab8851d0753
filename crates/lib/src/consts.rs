//! Well-known names shared by the war and ear plugins.

/// Capability attached to a unit once the war plugin has been applied.
pub const WAR_CAPABILITY: &str = "war";

/// Capability attached to the package unit once the ear plugin has been applied.
pub const EAR_CAPABILITY: &str = "ear";

/// Configuration holding a module's compile-time dependencies.
pub const COMPILE_CONFIGURATION: &str = "compile";

/// Configuration holding a module's runtime dependencies. Extends `compile`.
pub const RUNTIME_CONFIGURATION: &str = "runtime";

/// Package configuration whose content lands in the ear's library directory.
pub const EARLIB_CONFIGURATION: &str = "earlib";

/// Package configuration whose content is deployed as ear modules.
pub const DEPLOY_CONFIGURATION: &str = "deploy";

pub const WAR_TASK: &str = "war";
pub const EAR_TASK: &str = "ear";

pub const WAR_EXTENSION: &str = "war";
pub const EAR_EXTENSION: &str = "ear";

/// Default library directory inside the ear.
pub const DEFAULT_LIBRARY_DIRECTORY: &str = "lib";

/// Default `application.xml` schema version.
pub const DEFAULT_DESCRIPTOR_VERSION: &str = "6";

/// Path of the root unit.
pub const ROOT_PATH: &str = ":";

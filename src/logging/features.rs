//! Feature-specific logging macros and targets
//!
//! Each feature logs under its own target so that schema builds, access
//! checks and field resolution can be filtered independently.

/// Feature categories for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFeature {
    Schema,
    Relationships,
    Access,
    Resolve,
    Store,
}

impl LogFeature {
    pub const ALL: [LogFeature; 5] = [
        LogFeature::Schema,
        LogFeature::Relationships,
        LogFeature::Access,
        LogFeature::Resolve,
        LogFeature::Store,
    ];

    /// Get the target string for this feature
    pub fn target(&self) -> &'static str {
        match self {
            LogFeature::Schema => "list_schema::schema",
            LogFeature::Relationships => "list_schema::relationships",
            LogFeature::Access => "list_schema::access",
            LogFeature::Resolve => "list_schema::resolve",
            LogFeature::Store => "list_schema::store",
        }
    }

    /// Short name used as the key in `[logging.features]`.
    pub fn name(&self) -> &'static str {
        match self {
            LogFeature::Schema => "schema",
            LogFeature::Relationships => "relationships",
            LogFeature::Access => "access",
            LogFeature::Resolve => "resolve",
            LogFeature::Store => "store",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|feature| feature.name() == name)
    }
}

// Schema-specific logging macros
#[macro_export]
macro_rules! log_schema_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "list_schema::schema", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_schema_info {
    ($($arg:tt)*) => {
        log::info!(target: "list_schema::schema", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_schema_error {
    ($($arg:tt)*) => {
        log::error!(target: "list_schema::schema", $($arg)*)
    };
}

// Relationship resolution logging macros
#[macro_export]
macro_rules! log_relationships_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "list_schema::relationships", $($arg)*)
    };
}

// Access control logging macros
#[macro_export]
macro_rules! log_access_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "list_schema::access", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_access_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "list_schema::access", $($arg)*)
    };
}

// Field resolution logging macros
#[macro_export]
macro_rules! log_resolve_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "list_schema::resolve", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_resolve_trace {
    ($($arg:tt)*) => {
        log::trace!(target: "list_schema::resolve", $($arg)*)
    };
}

// Store logging macros
#[macro_export]
macro_rules! log_store_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "list_schema::store", $($arg)*)
    };
}

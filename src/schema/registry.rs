use crate::config::CompileConfig;
use crate::error::SchemaError;
use crate::schema::initializer::{initialise_lists, CompiledSchema, ListConfig};
use crate::{log_schema_error, log_schema_info};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Publishes the current compiled schema.
///
/// Readers take an `Arc` snapshot and keep using it for the rest of their
/// request. A reload builds the replacement off to the side and swaps it in
/// only once it is complete; a failed build leaves the current schema in
/// place.
#[derive(Debug)]
pub struct SchemaRegistry {
    current: RwLock<Arc<CompiledSchema>>,
    config: CompileConfig,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new(schema: CompiledSchema, config: CompileConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(schema)),
            config,
        }
    }

    /// Builds the initial schema and publishes it.
    pub fn initialise(
        lists: BTreeMap<String, ListConfig>,
        config: CompileConfig,
    ) -> Result<Self, SchemaError> {
        let schema = initialise_lists(lists, &config)?;
        Ok(Self::new(schema, config))
    }

    #[must_use]
    pub fn current(&self) -> Arc<CompiledSchema> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Rebuilds from `lists` and publishes the result.
    pub fn reload(&self, lists: BTreeMap<String, ListConfig>) -> Result<Arc<CompiledSchema>, SchemaError> {
        let schema = match initialise_lists(lists, &self.config) {
            Ok(schema) => Arc::new(schema),
            Err(e) => {
                log_schema_error!("Schema reload failed, keeping current schema: {}", e);
                return Err(e);
            }
        };

        *self.current.write().unwrap_or_else(|e| e.into_inner()) = schema.clone();
        log_schema_info!("Published schema with {} lists", schema.len());
        Ok(schema)
    }
}

//! Tree service
//!
//! Loads flat record lists and turns them into tree indexes configured by `Settings`.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{FlatRecord, IdGenerator, Tree, TreeIndex};
use crate::infrastructure::traits::FileSystem;

/// Index type produced by the service; the id strategy is chosen at runtime.
pub type ConfiguredIndex = TreeIndex<Box<dyn IdGenerator>>;

/// Service for building trees from flat record lists.
pub struct TreeService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl TreeService {
    /// Create a new tree service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Read a JSON array of flat records.
    #[instrument(level = "debug", skip(self))]
    pub fn load_records(&self, path: &Path) -> ApplicationResult<Vec<Value>> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read records", path)?;
        let records: Vec<Value> =
            serde_json::from_str(&content).map_err(|source| ApplicationError::Records {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("load_records: {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Convert records using the configured field names, id strategy and duplicate policy.
    pub fn build<R: FlatRecord>(&self, records: &[R]) -> ApplicationResult<ConfiguredIndex> {
        let mut index = self.settings.index();
        index.load_flat(records, &self.settings.flat)?;
        Ok(index)
    }

    /// Read and convert a record file in one step.
    pub fn load(&self, path: &Path) -> ApplicationResult<ConfiguredIndex> {
        let records = self.load_records(path)?;
        self.build(&records)
    }

    /// Nested JSON representation of `tree`.
    pub fn to_json(&self, tree: &Tree, pretty: bool) -> ApplicationResult<String> {
        let rendered = if pretty {
            serde_json::to_string_pretty(tree)
        } else {
            serde_json::to_string(tree)
        };
        rendered.map_err(ApplicationError::Serialize)
    }
}

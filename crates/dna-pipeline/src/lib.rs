//! # dna-pipeline
//!
//! Runs transformation steps against an object's data.
//!
//! - [`Pipeline::preview_step`] synthesizes (or reuses the pass-through for)
//!   one step's command, executes it on a copy of the raw dataset and records
//!   the outcome on the step
//! - [`Pipeline::preview_object`] pages through an object's raw data
//! - [`Pipeline::publish`] replays every stored command in `(order, id)`
//!   order over the raw dataset and writes the result to the silver tier
//! - [`ObjectLock`] serializes both operations per object across processes

mod browse;
mod error;
pub mod lock;
mod preview;
mod publish;

pub use browse::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
pub use error::PipelineError;
pub use lock::{LockError, ObjectLock};

use std::path::PathBuf;

use dna_config::DnaConfig;
use dna_core::entities::DataObject;
use dna_db::error::DatabaseError;
use dna_db::service::DnaService;
use dna_lake::TabularStore;
use dna_synth::{CommandSynthesizer, DefaultGenerator, TextGenerator};

/// Step store, lake, and synthesizer wired together.
pub struct Pipeline<G> {
    service: DnaService,
    store: TabularStore,
    synthesizer: CommandSynthesizer<G>,
    preview_limit: usize,
}

impl<G: TextGenerator> Pipeline<G> {
    pub const fn new(
        service: DnaService,
        store: TabularStore,
        synthesizer: CommandSynthesizer<G>,
        preview_limit: usize,
    ) -> Self {
        Self {
            service,
            store,
            synthesizer,
            preview_limit,
        }
    }

    pub const fn service(&self) -> &DnaService {
        &self.service
    }

    pub const fn store(&self) -> &TabularStore {
        &self.store
    }

    pub const fn synthesizer(&self) -> &CommandSynthesizer<G> {
        &self.synthesizer
    }

    /// The object's raw file if it exists: the recorded path, or the
    /// `<upload>/<id>.parquet|csv` convention when none is recorded.
    fn raw_path(&self, object: &DataObject) -> Option<PathBuf> {
        match object.data_path.as_deref() {
            Some(path) => Some(PathBuf::from(path)).filter(|p| p.is_file()),
            None => self.store.resolve_format(object.id).ok(),
        }
    }

    async fn object(&self, object_id: i64) -> Result<DataObject, PipelineError> {
        match self.service.get_object(object_id).await {
            Ok(object) => Ok(object),
            Err(DatabaseError::NoResult) => Err(PipelineError::NotFound(format!(
                "Object {object_id} not found"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn data_file(&self, object: &DataObject) -> Result<PathBuf, PipelineError> {
        self.raw_path(object).ok_or_else(|| {
            PipelineError::NotFound(format!(
                "Data file not found for object {}: {}",
                object.id,
                object.data_path.as_deref().unwrap_or("<unset>")
            ))
        })
    }
}

impl Pipeline<DefaultGenerator> {
    /// Open the configured step store and lake with the HTTP-backed synthesizer.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Storage`] if the database cannot be opened
    /// - [`PipelineError::Upstream`] if the HTTP client cannot be built
    pub async fn from_config(config: &DnaConfig) -> Result<Self, PipelineError> {
        let service = DnaService::new_local(&config.database.path).await?;
        let synthesizer = dna_synth::synthesizer_from_config(&config.llm)
            .map_err(|e| PipelineError::Upstream(e.to_string()))?;
        Ok(Self::new(
            service,
            TabularStore::from_config(&config.lake),
            synthesizer,
            config.lake.preview_limit,
        ))
    }
}

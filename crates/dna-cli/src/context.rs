use std::path::Path;

use anyhow::Context;

use dna_config::DnaConfig;
use dna_db::service::DnaService;
use dna_lake::TabularStore;
use dna_pipeline::{ObjectLock, Pipeline};
use dna_synth::DefaultGenerator;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: DnaConfig,
    pub pipeline: Pipeline<DefaultGenerator>,
}

impl AppContext {
    pub async fn init(config: DnaConfig) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(&config.database.path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let pipeline = Pipeline::from_config(&config)
            .await
            .with_context(|| format!("failed to open step store at {}", config.database.path))?;

        if !config.llm.is_configured() && !config.llm.is_local() {
            tracing::debug!(base_url = %config.llm.base_url, "llm.api_key is not set");
        }

        Ok(Self { config, pipeline })
    }

    pub const fn service(&self) -> &DnaService {
        self.pipeline.service()
    }

    pub const fn store(&self) -> &TabularStore {
        self.pipeline.store()
    }

    /// Take the per-object lock used around preview and publish.
    pub async fn lock_object(&self, object_id: i64) -> anyhow::Result<ObjectLock> {
        Ok(ObjectLock::acquire(self.store().root(), object_id).await?)
    }
}

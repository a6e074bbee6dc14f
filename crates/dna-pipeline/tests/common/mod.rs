//! Shared fixtures: a scripted generator and a lake-backed pipeline.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use dna_config::LlmConfig;
use dna_core::entities::{NewObject, TransformationStep};
use dna_db::service::DnaService;
use dna_lake::TabularStore;
use dna_pipeline::Pipeline;
use dna_synth::{CommandSynthesizer, CompletionRequest, TextGenerator, UpstreamError};
use tempfile::TempDir;

pub const SALES_CSV: &str = "id,name,amt\n1,alice,50\n2,bob,150\n3,carol,100\n4,dave,250\n5,erin,75\n";

type Reply = Box<dyn Fn(&CompletionRequest) -> Result<String, UpstreamError> + Send + Sync>;

/// Answers every request through a closure and records the prompts.
pub struct Scripted {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl Scripted {
    pub fn new(
        reply: impl Fn(&CompletionRequest) -> Result<String, UpstreamError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            reply: Box::new(reply),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answers `text`.
    pub fn always(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Answers `replies` in turn, then keeps repeating the last one.
    pub fn sequence(replies: &[&str]) -> Self {
        let replies: Vec<String> = replies.iter().map(ToString::to_string).collect();
        let next = AtomicUsize::new(0);
        Self::new(move |_| {
            let i = next.fetch_add(1, Ordering::SeqCst).min(replies.len() - 1);
            Ok(replies[i].clone())
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextGenerator for Scripted {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, UpstreamError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        (self.reply)(request)
    }
}

pub struct Harness {
    pub dir: TempDir,
    pub pipeline: Pipeline<Scripted>,
}

impl Harness {
    pub async fn new(generator: Scripted) -> Self {
        Self::with_limit(generator, 100).await
    }

    pub async fn with_limit(generator: Scripted, preview_limit: usize) -> Self {
        let dir = TempDir::new().unwrap();
        let service = DnaService::new_local(":memory:").await.unwrap();
        let store = TabularStore::new(dir.path().join("delta-lake"), "bronze", "silver");
        let synthesizer = CommandSynthesizer::new(generator, &LlmConfig::default());
        let pipeline = Pipeline::new(service, store, synthesizer, preview_limit);
        Self { dir, pipeline }
    }

    pub fn service(&self) -> &DnaService {
        self.pipeline.service()
    }

    pub fn generator(&self) -> &Scripted {
        self.pipeline.synthesizer().generator()
    }

    /// `<lake>/bronze/upload/2024-05-01/sales.csv`.
    pub fn bronze_csv(&self) -> PathBuf {
        self.pipeline
            .store()
            .upload_dir()
            .join("2024-05-01")
            .join("sales.csv")
    }

    pub fn silver_parquet(&self) -> PathBuf {
        self.dir
            .path()
            .join("delta-lake/silver/upload/2024-05-01/sales.parquet")
    }

    /// Write `body` at `path` and register an object pointing at it.
    pub async fn object_with_file(&self, path: &Path, body: &str) -> i64 {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
        self.object_at(path.to_str().unwrap()).await
    }

    /// Sales data in the bronze tier.
    pub async fn sales_object(&self) -> i64 {
        let path = self.bronze_csv();
        self.object_with_file(&path, SALES_CSV).await
    }

    /// Register an object without creating its file.
    pub async fn object_at(&self, data_path: &str) -> i64 {
        self.service()
            .create_object(&NewObject::uploaded_file("sales.csv", data_path))
            .await
            .unwrap()
            .id
    }

    pub async fn step(&self, object_id: i64, description: &str) -> TransformationStep {
        self.service()
            .append_step(object_id, "step", description)
            .await
            .unwrap()
    }

    pub async fn reload(&self, step_id: i64) -> TransformationStep {
        self.service().get_step(step_id).await.unwrap()
    }
}

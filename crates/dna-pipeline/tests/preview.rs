//! Step preview: status persistence, command caching, failure classes.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use common::{Harness, Scripted};
use dna_core::dataset::{Column, DataType, Dataset, Value};
use dna_core::enums::StepStatus;
use dna_pipeline::PipelineError;
use dna_synth::UpstreamError;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn pass_through_succeeds_without_command() {
    let h = Harness::new(Scripted::always("df = df.head(1)")).await;
    let object = h.sales_object().await;
    let step = h.step(object, "  Show all rows ").await;

    let preview = h.pipeline.preview_step(step.id).await.unwrap();
    assert_eq!(preview.columns, vec!["id", "name", "amt"]);
    assert_eq!(preview.total_rows, 5);
    assert_eq!(preview.rows.len(), 5);
    assert_eq!(preview.command, None);
    assert_eq!(preview.message, "Step previewed successfully.");

    let stored = h.reload(step.id).await;
    assert_eq!(stored.status, StepStatus::Success);
    assert_eq!(stored.command, None);
    assert_eq!(h.generator().calls(), 0);
}

#[tokio::test]
async fn accepted_command_is_cached_and_applied() {
    let h = Harness::new(Scripted::always("df = df.filter(amt > 100)")).await;
    let object = h.sales_object().await;
    let step = h.step(object, "keep rows where amt exceeds 100").await;

    let preview = h.pipeline.preview_step(step.id).await.unwrap();
    assert_eq!(preview.total_rows, 2);
    assert_eq!(
        preview.rows.iter().map(|r| r[0].clone()).collect::<Vec<_>>(),
        vec![Value::Int(2), Value::Int(4)]
    );
    assert_eq!(preview.command.as_deref(), Some("df = df.filter(amt > 100)"));

    let stored = h.reload(step.id).await;
    assert_eq!(stored.status, StepStatus::Success);
    assert_eq!(stored.command.as_deref(), Some("df = df.filter(amt > 100)"));

    let prompt = &h.generator().prompts()[0];
    assert!(prompt.contains("keep rows where amt exceeds 100"));
    assert!(prompt.contains("id, name, amt"));
}

#[tokio::test]
async fn re_preview_is_idempotent() {
    let h = Harness::new(Scripted::always("df = df.sort(amt, desc=true).head(2)")).await;
    let object = h.sales_object().await;
    let step = h.step(object, "two largest amounts").await;

    let first = h.pipeline.preview_step(step.id).await.unwrap();
    let after_first = h.reload(step.id).await;
    let second = h.pipeline.preview_step(step.id).await.unwrap();
    let after_second = h.reload(step.id).await;

    assert_eq!(first, second);
    assert_eq!(after_first.status, after_second.status);
    assert_eq!(after_first.command, after_second.command);
    assert_eq!(h.generator().calls(), 2);
}

#[tokio::test]
async fn preview_runs_on_raw_data_only() {
    let h = Harness::new(Scripted::new(|req| {
        if req.prompt.contains("big") {
            Ok("df = df.filter(amt > 100)".into())
        } else {
            Ok("df = df.select(id)".into())
        }
    }))
    .await;
    let object = h.sales_object().await;
    let big = h.step(object, "big amounts").await;
    let ids = h.step(object, "only ids").await;

    h.pipeline.preview_step(big.id).await.unwrap();
    let preview = h.pipeline.preview_step(ids.id).await.unwrap();
    assert_eq!(preview.columns, vec!["id"]);
    assert_eq!(preview.total_rows, 5);
}

#[tokio::test]
async fn preview_rows_are_capped() {
    let h = Harness::with_limit(Scripted::always("df = df"), 2).await;
    let object = h.sales_object().await;
    let step = h.step(object, "everything").await;

    let preview = h.pipeline.preview_step(step.id).await.unwrap();
    assert_eq!(preview.rows.len(), 2);
    assert_eq!(preview.total_rows, 5);
}

#[tokio::test]
async fn missing_step_persists_nothing() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let err = h.pipeline.preview_step(404).await.unwrap_err();
    assert!(matches!(err, PipelineError::NotFound(_)));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn missing_object_marks_failed() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let step = h.step(999, "anything").await;

    let err = h.pipeline.preview_step(step.id).await.unwrap_err();
    assert!(matches!(err, PipelineError::NotFound(_)));
    assert_eq!(h.reload(step.id).await.status, StepStatus::Failed);
}

#[tokio::test]
async fn missing_data_file_fails_before_synthesis() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let object = h.object_at("/nonexistent/bronze/upload/sales.csv").await;
    let step = h.step(object, "filter rows").await;

    let err = h.pipeline.preview_step(step.id).await.unwrap_err();
    assert!(matches!(err, PipelineError::NotFound(_)));
    assert_eq!(h.reload(step.id).await.status, StepStatus::Failed);
    assert_eq!(h.generator().calls(), 0);

    let events = h.service().list_step_events(step.id).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].to_status, StepStatus::Failed);
    assert!(events[0].detail.as_deref().unwrap().contains("Data file not found"));
}

#[tokio::test]
async fn empty_description_is_invalid_input() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let object = h.sales_object().await;
    let step = h.step(object, "   ").await;

    let err = h.pipeline.preview_step(step.id).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));
    assert_eq!(err.status_code(), 400);
    assert_eq!(h.reload(step.id).await.status, StepStatus::Failed);
    assert_eq!(h.generator().calls(), 0);
}

#[tokio::test]
async fn unreadable_file_is_upstream_failure() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let path = h.bronze_csv().with_extension("parquet");
    let object = h.object_with_file(&path, "definitely not parquet").await;
    let step = h.step(object, "anything").await;

    let err = h.pipeline.preview_step(step.id).await.unwrap_err();
    assert!(matches!(err, PipelineError::Upstream(_)));
    assert!(err.to_string().starts_with("Failed to load data"));
    assert_eq!(h.reload(step.id).await.status, StepStatus::Failed);
}

#[tokio::test]
async fn rejected_reply_is_not_persisted() {
    let h = Harness::new(Scripted::always("print('hello')")).await;
    let object = h.sales_object().await;
    let step = h.step(object, "say hello").await;

    let err = h.pipeline.preview_step(step.id).await.unwrap_err();
    assert!(matches!(err, PipelineError::Upstream(_)));
    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().contains("Synthesis rejected"));

    let stored = h.reload(step.id).await;
    assert_eq!(stored.status, StepStatus::Failed);
    assert_eq!(stored.command, None);
}

#[tokio::test]
async fn generator_failure_marks_failed() {
    let h = Harness::new(Scripted::new(|_| Err(UpstreamError::AuthFailed))).await;
    let object = h.sales_object().await;
    let step = h.step(object, "filter rows").await;

    let err = h.pipeline.preview_step(step.id).await.unwrap_err();
    assert!(matches!(err, PipelineError::Upstream(_)));
    assert!(err.to_string().contains("authentication failed"));
    assert_eq!(h.reload(step.id).await.status, StepStatus::Failed);
}

#[tokio::test]
async fn execution_failure_keeps_command() {
    let h = Harness::new(Scripted::always("df = df.filter(amnt > 100)")).await;
    let object = h.sales_object().await;
    let step = h.step(object, "filter on amnt").await;

    let err = h.pipeline.preview_step(step.id).await.unwrap_err();
    assert!(matches!(err, PipelineError::Upstream(_)));
    assert!(err.to_string().contains("unknown column 'amnt'"));

    let stored = h.reload(step.id).await;
    assert_eq!(stored.status, StepStatus::Failed);
    assert_eq!(stored.command.as_deref(), Some("df = df.filter(amnt > 100)"));
}

#[tokio::test]
async fn failed_step_recovers_on_re_preview() {
    let h = Harness::new(Scripted::sequence(&["nope", "df = df.head(1)"])).await;
    let object = h.sales_object().await;
    let step = h.step(object, "first row only").await;

    h.pipeline.preview_step(step.id).await.unwrap_err();
    assert_eq!(h.reload(step.id).await.status, StepStatus::Failed);

    let preview = h.pipeline.preview_step(step.id).await.unwrap();
    assert_eq!(preview.total_rows, 1);

    let stored = h.reload(step.id).await;
    assert_eq!(stored.status, StepStatus::Success);
    assert_eq!(stored.command.as_deref(), Some("df = df.head(1)"));

    let events = h.service().list_step_events(step.id).await.unwrap();
    assert_eq!(
        events.iter().map(|e| e.to_status).collect::<Vec<_>>(),
        vec![StepStatus::Failed, StepStatus::Success]
    );
    assert_eq!(events[1].from_status, StepStatus::Failed);
}

#[tokio::test]
async fn rejected_re_preview_clears_cached_command() {
    let h = Harness::new(Scripted::sequence(&["df = df.head(2)", "SELECT 1"])).await;
    let object = h.sales_object().await;
    let step = h.step(object, "two rows").await;

    h.pipeline.preview_step(step.id).await.unwrap();
    assert_eq!(h.reload(step.id).await.command.as_deref(), Some("df = df.head(2)"));

    h.pipeline.preview_step(step.id).await.unwrap_err();
    let stored = h.reload(step.id).await;
    assert_eq!(stored.status, StepStatus::Failed);
    assert_eq!(stored.command, None);

    let result = h.pipeline.publish(object).await;
    assert!(result.is_success(), "{}", result.message);
    assert_eq!(result.steps_applied, 0);
}

#[tokio::test]
async fn upstream_failure_on_re_preview_clears_cached_command() {
    let calls = AtomicUsize::new(0);
    let h = Harness::new(Scripted::new(move |_| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok("df = df.head(2)".into())
        } else {
            Err(UpstreamError::AuthFailed)
        }
    }))
    .await;
    let object = h.sales_object().await;
    let step = h.step(object, "two rows").await;

    h.pipeline.preview_step(step.id).await.unwrap();
    h.pipeline.preview_step(step.id).await.unwrap_err();

    let stored = h.reload(step.id).await;
    assert_eq!(stored.status, StepStatus::Failed);
    assert_eq!(stored.command, None);
}

#[tokio::test]
async fn header_promotion_preset_needs_no_generator() {
    let h = Harness::new(Scripted::new(|_| Err(UpstreamError::AuthFailed))).await;
    let path = h.pipeline.store().upload_dir().join("2024-05-01/report.parquet");
    let raw = Dataset::new(
        ["column0", "column1", "column2"]
            .into_iter()
            .map(|name| Column::new(name, DataType::Text))
            .collect(),
        [["id", "name", "amt"], ["1", "alice", "50"], ["2", "bob", "150.5"]]
            .iter()
            .map(|row| row.iter().map(|cell| Value::Text((*cell).into())).collect())
            .collect(),
    )
    .unwrap();
    h.pipeline.store().write(&raw, &path).unwrap();
    let object = h.object_at(path.to_str().unwrap()).await;
    let step = h.service().append_header_promotion(object).await.unwrap();

    let preview = h.pipeline.preview_step(step.id).await.unwrap();
    assert_eq!(preview.columns, vec!["id", "name", "amt"]);
    assert_eq!(preview.total_rows, 2);
    assert_eq!(
        preview.rows[1],
        vec![Value::Int(2), Value::Text("bob".into()), Value::Float(150.5)]
    );
    assert_eq!(preview.command.as_deref(), Some("df = df.promote_header()"));
    assert_eq!(h.generator().calls(), 0);
    assert_eq!(h.reload(step.id).await.status, StepStatus::Success);
}

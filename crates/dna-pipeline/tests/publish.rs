//! Publish: replay order, failure results, silver output.

mod common;

use chrono::NaiveDate;
use common::{Harness, SALES_CSV, Scripted};
use dna_core::dataset::{DataType, Value};
use dna_core::entities::NewObject;
use dna_core::enums::PublishStatus;
use pretty_assertions::assert_eq;

fn ids(rows: &[Vec<Value>]) -> Vec<Value> {
    rows.iter().map(|r| r[0].clone()).collect()
}

#[tokio::test]
async fn zero_steps_writes_nothing() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let object = h.sales_object().await;

    let result = h.pipeline.publish(object).await;
    assert_eq!(result.status, PublishStatus::Failed);
    assert_eq!(result.message, "No transformation steps found for this object.");
    assert_eq!(result.output_path, None);
    assert!(!h.silver_parquet().exists());
}

#[tokio::test]
async fn unknown_object() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let result = h.pipeline.publish(42).await;
    assert_eq!(result.status, PublishStatus::Failed);
    assert_eq!(result.message, "Object not found.");
}

#[tokio::test]
async fn missing_original_file() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let object = h.object_at("/nowhere/bronze/upload/sales.csv").await;
    h.step(object, "Show all rows").await;

    let result = h.pipeline.publish(object).await;
    assert_eq!(result.message, "Original file not found.");
    assert!(!result.is_success());
}

#[tokio::test]
async fn unreadable_original_file() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let path = h.bronze_csv().with_extension("parquet");
    let object = h.object_with_file(&path, "garbage").await;
    h.step(object, "Show all rows").await;

    let result = h.pipeline.publish(object).await;
    assert!(result.message.starts_with("Failed to load data: "), "{}", result.message);
}

#[tokio::test]
async fn pass_through_then_filter_publishes_matching_rows() {
    let h = Harness::new(Scripted::always("df = df.filter(amt > 100)")).await;
    let object = h.sales_object().await;
    let show = h.step(object, "Show all rows").await;
    let filter = h.step(object, "only amounts over 100").await;
    h.pipeline.preview_step(show.id).await.unwrap();
    h.pipeline.preview_step(filter.id).await.unwrap();
    let calls = h.generator().calls();

    let result = h.pipeline.publish(object).await;
    assert_eq!(result.status, PublishStatus::Success, "{}", result.message);
    let output = h.silver_parquet();
    assert_eq!(result.output_path.as_deref(), output.to_str());
    assert_eq!(
        result.message,
        format!("Published to Silver Layer: {}", output.display())
    );
    assert_eq!(result.steps_applied, 1);
    assert_eq!(result.failed_step, None);
    assert_eq!(h.generator().calls(), calls, "publish never synthesizes");

    let silver = h.pipeline.store().load(&output).unwrap();
    assert_eq!(silver.column_names(), vec!["id", "name", "amt"]);
    assert_eq!(ids(silver.rows()), vec![Value::Int(2), Value::Int(4)]);
    assert!(h.bronze_csv().exists(), "raw file is left in place");
}

#[tokio::test]
async fn replay_is_deterministic() {
    let h = Harness::new(Scripted::always(
        "df = df.derive(band = amt / 50).sort(band, desc=true)",
    ))
    .await;
    let object = h.sales_object().await;
    let step = h.step(object, "band the amounts").await;
    h.pipeline.preview_step(step.id).await.unwrap();

    let first = h.pipeline.publish(object).await;
    let first_data = h.pipeline.store().load(&h.silver_parquet()).unwrap();
    let second = h.pipeline.publish(object).await;
    let second_data = h.pipeline.store().load(&h.silver_parquet()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_data, second_data);
    assert_eq!(first_data.columns()[3].dtype, DataType::Float);
}

#[tokio::test]
async fn steps_without_command_are_skipped() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let object = h.sales_object().await;
    h.step(object, "never previewed").await;

    let result = h.pipeline.publish(object).await;
    assert!(result.is_success(), "{}", result.message);
    assert_eq!(result.steps_applied, 0);

    let silver = h.pipeline.store().load(&h.silver_parquet()).unwrap();
    let raw = h.pipeline.store().load(&h.bronze_csv()).unwrap();
    assert_eq!(silver, raw);
}

#[tokio::test]
async fn replay_follows_order_then_id() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let object = h.sales_object().await;
    let svc = h.service();

    let first = h.step(object, "a").await;
    let dropped = h.step(object, "b").await;
    let derive = h.step(object, "c").await;
    svc.remove_step(dropped.id).await.unwrap();
    // Count is now 2, so this one shares order 3 with `derive`.
    let filter = h.step(object, "d").await;
    assert_eq!(derive.order, filter.order);

    svc.set_step_command(first.id, Some("df = df.filter(amt >= 75)"))
        .await
        .unwrap();
    svc.set_step_command(derive.id, Some("df = df.derive(double = amt * 2)"))
        .await
        .unwrap();
    svc.set_step_command(filter.id, Some("df = df.filter(double > 250).select(id, double)"))
        .await
        .unwrap();

    let result = h.pipeline.publish(object).await;
    assert!(result.is_success(), "{}", result.message);
    assert_eq!(result.steps_applied, 3);

    let silver = h.pipeline.store().load(&h.silver_parquet()).unwrap();
    assert_eq!(silver.column_names(), vec!["id", "double"]);
    assert_eq!(
        silver.rows(),
        &[
            vec![Value::Int(2), Value::Int(300)],
            vec![Value::Int(4), Value::Int(500)],
        ]
    );
}

#[tokio::test]
async fn failing_command_reports_step_and_writes_nothing() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let object = h.sales_object().await;
    let ok = h.step(object, "a").await;
    let bad = h.step(object, "b").await;
    h.service()
        .set_step_command(ok.id, Some("df = df.head(3)"))
        .await
        .unwrap();
    h.service()
        .set_step_command(bad.id, Some("df = df.filter(missing > 1)"))
        .await
        .unwrap();

    let result = h.pipeline.publish(object).await;
    assert_eq!(result.status, PublishStatus::Failed);
    assert_eq!(result.failed_step, Some(bad.id));
    assert_eq!(result.steps_applied, 1);
    assert!(
        result
            .message
            .starts_with(&format!("Failed to apply step {}: ", bad.id)),
        "{}",
        result.message
    );
    assert!(!h.silver_parquet().exists());
}

#[tokio::test]
async fn file_outside_bronze_tier_cannot_be_published() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let path = h.dir.path().join("loose/sales.csv");
    let object = h.object_with_file(&path, SALES_CSV).await;
    h.step(object, "Show all rows").await;

    let result = h.pipeline.publish(object).await;
    assert!(
        result.message.starts_with("Failed to write to silver layer: "),
        "{}",
        result.message
    );
}

#[tokio::test]
async fn publishes_ingested_parquet() {
    let h = Harness::new(Scripted::always("df = df.select(name)")).await;
    let source = h.dir.path().join("incoming/customers.csv");
    std::fs::create_dir_all(source.parent().unwrap()).unwrap();
    std::fs::write(&source, SALES_CSV).unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let ingested = h.pipeline.store().ingest_on(&source, date).unwrap();
    let object = h.object_at(ingested.path.to_str().unwrap()).await;
    let step = h.step(object, "names only").await;
    h.pipeline.preview_step(step.id).await.unwrap();

    let result = h.pipeline.publish(object).await;
    assert!(result.is_success(), "{}", result.message);
    let output = h
        .dir
        .path()
        .join("delta-lake/silver/upload/2024-05-01/customers.parquet");
    assert_eq!(result.output_path.as_deref(), output.to_str());
    assert_eq!(
        h.pipeline.store().load(&output).unwrap().column_names(),
        vec!["name"]
    );
}

#[tokio::test]
async fn object_without_recorded_path_uses_upload_convention() {
    let h = Harness::new(Scripted::always("df = df")).await;
    let mut new = NewObject::uploaded_file("legacy", "");
    new.data_path = None;
    let object = h.service().create_object(&new).await.unwrap().id;
    h.step(object, "Show all rows").await;

    let missing = h.pipeline.publish(object).await;
    assert_eq!(missing.message, "Original file not found.");

    let upload = h.pipeline.store().upload_dir();
    std::fs::create_dir_all(&upload).unwrap();
    std::fs::write(upload.join(format!("{object}.csv")), SALES_CSV).unwrap();

    let result = h.pipeline.publish(object).await;
    assert!(result.is_success(), "{}", result.message);
    let output = h
        .dir
        .path()
        .join(format!("delta-lake/silver/upload/{object}.parquet"));
    assert_eq!(result.output_path.as_deref(), output.to_str());
}

//! Synthesizer behaviour against a scripted generator.

use std::sync::Mutex;

use dna_config::LlmConfig;
use dna_synth::{
    CommandSynthesizer, CompletionRequest, HEADER_PROMOTION_COMMAND, SynthError, Synthesis,
    TextGenerator, UpstreamError,
};
use pretty_assertions::assert_eq;

/// Replies with a fixed result and records every request.
struct Scripted {
    reply: Result<String, u16>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl Scripted {
    fn ok(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl TextGenerator for Scripted {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, UpstreamError> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(UpstreamError::Api {
                status: *status,
                message: "boom".into(),
            }),
        }
    }
}

fn columns() -> Vec<String> {
    vec!["id".into(), "name".into(), "amt".into()]
}

fn synth(generator: Scripted) -> CommandSynthesizer<Scripted> {
    CommandSynthesizer::new(generator, &LlmConfig::default())
}

#[tokio::test]
async fn pass_through_skips_the_generator() {
    for description in ["Show all rows", "  Show all rows\n"] {
        let s = synth(Scripted::ok("df = df.head(1)"));
        assert_eq!(
            s.synthesize(description, &columns()).await.unwrap(),
            Synthesis::PassThrough
        );
        assert_eq!(s.generator().calls(), 0);
    }
}

#[tokio::test]
async fn header_promotion_preset_is_resolved_locally() {
    let s = synth(Scripted::failing(500));
    let synthesis = s
        .synthesize(dna_core::HEADER_PROMOTION_DESCRIPTION, &columns())
        .await
        .unwrap();
    assert_eq!(synthesis, Synthesis::Command(HEADER_PROMOTION_COMMAND.into()));
    assert_eq!(s.generator().calls(), 0);
    assert!(dna_transform::parse(HEADER_PROMOTION_COMMAND).is_ok());
}

#[tokio::test]
async fn pass_through_is_case_sensitive() {
    let s = synth(Scripted::ok("df = df"));
    assert_eq!(
        s.synthesize("show all rows", &columns()).await.unwrap(),
        Synthesis::Command("df = df".into())
    );
    assert_eq!(s.generator().calls(), 1);
}

#[tokio::test]
async fn accepted_command_and_request_shape() {
    let s = synth(Scripted::ok("```python\ndf = df.filter(amt > 100)\n```"));
    let out = s
        .synthesize("filter rows where amt is greater than 100", &columns())
        .await
        .unwrap();
    assert_eq!(out, Synthesis::Command("df = df.filter(amt > 100)".into()));

    let seen = s.generator().seen.lock().unwrap();
    let request = &seen[0];
    assert_eq!(request.model, "gpt-3.5-turbo");
    assert_eq!(request.max_tokens, 100);
    assert!(request.temperature.abs() < f32::EPSILON);
    assert!(request.prompt.contains("id, name, amt"));
}

#[tokio::test]
async fn reply_without_prefix_is_rejected() {
    let s = synth(Scripted::ok("Sure! Here is the code: df.head()"));
    match s.synthesize("first rows", &columns()).await {
        Err(SynthError::Rejected { command }) => {
            assert_eq!(command, "Sure! Here is the code: df.head()");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn upstream_failure_surfaces() {
    let s = synth(Scripted::failing(500));
    assert!(matches!(
        s.synthesize("first rows", &columns()).await,
        Err(SynthError::Upstream(UpstreamError::Api { status: 500, .. }))
    ));
    assert_eq!(s.generator().calls(), 1);
}

//! Description → command synthesis.

use dna_config::LlmConfig;
use dna_core::{is_header_promotion, is_pass_through};
use dna_transform::{COMMAND_PREFIX, GRAMMAR};

use crate::error::SynthError;
use crate::generator::{CompletionRequest, TextGenerator};

/// Command for the header promotion preset.
pub const HEADER_PROMOTION_COMMAND: &str = "df = df.promote_header()";

const SYSTEM_PROMPT: &str = "You are a data engineer. You answer with a single dataset \
     transformation command and nothing else.";

/// Outcome of a synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synthesis {
    /// The description asks for the data unchanged; no command is needed.
    PassThrough,
    /// A command starting with `df =`, not yet parsed.
    Command(String),
}

/// Builds prompts, calls the generator, and validates the reply.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer<G> {
    generator: G,
    model: String,
    max_tokens: u32,
}

impl<G: TextGenerator> CommandSynthesizer<G> {
    pub fn new(generator: G, config: &LlmConfig) -> Self {
        Self {
            generator,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    pub const fn generator(&self) -> &G {
        &self.generator
    }

    /// The request that would be sent for `description` over `columns`.
    #[must_use]
    pub fn build_request(&self, description: &str, columns: &[String]) -> CompletionRequest {
        CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: build_prompt(description, columns),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: 0.0,
        }
    }

    /// Turn a step description into a command.
    ///
    /// The pass-through and header promotion presets short-circuit without
    /// calling the generator.
    ///
    /// # Errors
    ///
    /// - [`SynthError::Upstream`] if the generator fails
    /// - [`SynthError::Rejected`] if the reply does not start with `df =`
    pub async fn synthesize(
        &self,
        description: &str,
        columns: &[String],
    ) -> Result<Synthesis, SynthError> {
        if is_pass_through(description) {
            return Ok(Synthesis::PassThrough);
        }
        if is_header_promotion(description) {
            return Ok(Synthesis::Command(HEADER_PROMOTION_COMMAND.to_string()));
        }

        let request = self.build_request(description, columns);
        let raw = self.generator.generate(&request).await?;
        let command = clean_response(&raw);

        if !command.starts_with(COMMAND_PREFIX) {
            tracing::warn!(response = %command, "generated text rejected");
            return Err(SynthError::Rejected { command });
        }

        tracing::debug!(%command, "synthesized command");
        Ok(Synthesis::Command(command))
    }
}

fn build_prompt(description: &str, columns: &[String]) -> String {
    format!(
        "Write a single data-transformation command that performs: {description}\n\
         \n\
         The available columns are: {columns}.\n\
         If the request misspells a column name, use the closest matching column name \
         from this list.\n\
         \n\
         {GRAMMAR}\n\
         \n\
         Reply with exactly one command on one line, starting with `{COMMAND_PREFIX}`.\n\
         Example: df = df.filter(column == 'value')",
        description = description.trim(),
        columns = columns.join(", "),
    )
}

/// Trim the reply and strip a surrounding markdown code fence or backticks.
fn clean_response(raw: &str) -> String {
    let trimmed = raw.trim();
    let unfenced = match trimmed.strip_prefix("```") {
        Some(rest) => {
            // drop the info string (```python, ```text, ...)
            let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
            body.trim_end().strip_suffix("```").unwrap_or(body)
        }
        None => trimmed
            .strip_prefix('`')
            .and_then(|s| s.strip_suffix('`'))
            .unwrap_or(trimmed),
    };
    unfenced.trim().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("df = df.head(1)", "df = df.head(1)")]
    #[case("  df = df.head(1)\n", "df = df.head(1)")]
    #[case("```python\ndf = df.head(1)\n```", "df = df.head(1)")]
    #[case("```\ndf = df.head(1)\n```\n", "df = df.head(1)")]
    #[case("`df = df.head(1)`", "df = df.head(1)")]
    #[case("```df = df.head(1)```", "df = df.head(1)")]
    #[case("```", "")]
    fn strips_fences(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(clean_response(raw), expected);
    }

    #[test]
    fn prompt_mentions_description_columns_and_prefix() {
        let prompt = build_prompt(
            " filter rows where amt is greater than 100 ",
            &["id".into(), "name".into(), "amt".into()],
        );
        assert!(prompt.contains("performs: filter rows where amt is greater than 100\n"));
        assert!(prompt.contains("The available columns are: id, name, amt."));
        assert!(prompt.contains("closest matching column name"));
        assert!(prompt.contains("starting with `df =`"));
        assert!(prompt.contains("filter(<predicate>)"));
    }
}

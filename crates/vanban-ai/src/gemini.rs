//! Gemini-backed classifier client.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vanban_core::Category;

use crate::{Classify, ClassifyError, ClassifyResponse};

/// Connection settings for the Gemini generateContent endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            timeout_secs: 30,
        }
    }
}

/// HTTP classifier backed by Gemini with temperature 0 for
/// deterministic output.
pub struct GeminiClassifier {
    client: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClassifier {
    pub fn new(config: GeminiConfig) -> Result<Self, ClassifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn prompt(excerpt: &str, categories: &[Category]) -> String {
        let taxonomy = categories
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Bạn là bộ phân loại văn bản hành chính Việt Nam.\n\
             Gán CHÍNH XÁC MỘT nhãn từ danh sách sau cho toàn bộ văn bản:\n\
             [{taxonomy}]\n\n\
             Chỉ trả về tên nhãn, không giải thích.\n\n\
             Văn bản:\n{excerpt}\n\nNhãn:"
        )
    }

    async fn call(&self, prompt: String) -> Result<String, ClassifyError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            self.config.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 64,
            },
        };

        debug!(model = %self.config.model, "calling classification model");
        let resp = self.client.post(&url).json(&request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClassifyError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ClassifyError::EmptyResponse);
        }
        info!(label = %text.trim(), "model returned label");
        Ok(text)
    }
}

impl Classify for GeminiClassifier {
    fn classify(
        &self,
        excerpt: &str,
        categories: &[Category],
    ) -> impl Future<Output = Result<ClassifyResponse, ClassifyError>> + Send {
        let prompt = Self::prompt(excerpt, categories);
        async move {
            let label = self.call(prompt).await?;
            Ok(ClassifyResponse {
                label: label.trim().to_string(),
                // The endpoint returns no calibrated score; a fixed
                // value distinguishes model output from coercion.
                raw_confidence: 0.7,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_full_taxonomy() {
        let prompt = GeminiClassifier::prompt("nội dung", &Category::ALL);
        for c in Category::ALL {
            assert!(prompt.contains(c.as_str()), "missing {c}");
        }
        assert!(prompt.contains("nội dung"));
    }

    #[test]
    fn response_text_extraction() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "admissions\n"}]}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        let text = &parsed.candidates[0].content.parts[0].text;
        assert_eq!(text.trim(), "admissions");
    }

    #[test]
    fn tolerates_missing_candidates() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}

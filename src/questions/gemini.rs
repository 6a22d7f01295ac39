// src/questions/gemini.rs

use std::{sync::LazyLock, time::Duration};

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use url::Url;
use validator::Validate;

use crate::{error::AppError, models::question::NewQuestion, questions::QuestionGenerator};

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json|JSON)?").expect("static regex"));

/// Question generator backed by the Gemini `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GeminiGenerator {
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Result<Self, AppError> {
        let mut endpoint = Url::parse(base_url)
            .and_then(|base| base.join(&format!("models/{}:generateContent", model)))
            .map_err(|e| AppError::InternalServerError(format!("Invalid Gemini base URL: {}", e)))?;
        endpoint.query_pairs_mut().append_pair("key", api_key);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    async fn request(&self, prompt: String) -> Result<String, reqwest::Error> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response: GenerateResponse = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[async_trait]
impl QuestionGenerator for GeminiGenerator {
    async fn generate(&self, subject_name: &str, count: usize, remedial: bool) -> Vec<NewQuestion> {
        let prompt = build_prompt(subject_name, count, remedial);

        match self.request(prompt).await {
            Ok(text) => {
                let questions = parse_generated(&text, remedial);
                tracing::info!(
                    "Generated {} questions for '{}' (remedial: {})",
                    questions.len(),
                    subject_name,
                    remedial
                );
                questions
            }
            Err(e) => {
                tracing::warn!("Question generation failed for '{}': {}", subject_name, e);
                Vec::new()
            }
        }
    }
}

fn build_prompt(subject_name: &str, count: usize, remedial: bool) -> String {
    let intro = if remedial {
        format!(
            "Generate {count} simple, remedial multiple-choice questions for the subject \"{subject_name}\" to help a student who is struggling."
        )
    } else {
        format!(
            "Generate {count} multiple-choice questions for the subject \"{subject_name}\" suitable for a beginner level student."
        )
    };

    format!(
        "{intro}\n\
         Return ONLY a raw JSON array of objects. Do not use Markdown code blocks. Each object should have:\n\
         - \"questionText\": string\n\
         - \"options\": array of 4 strings\n\
         - \"correctAnswer\": integer (0-3, index of the correct option)\n\
         - \"isRemedial\": boolean ({remedial})"
    )
}

/// Extracts valid questions from a model reply. Tolerates Markdown fences
/// and skips malformed entries; a reply that is not a JSON array yields none.
pub fn parse_generated(text: &str, remedial: bool) -> Vec<NewQuestion> {
    let cleaned = CODE_FENCE.replace_all(text, "");

    let entries: Vec<serde_json::Value> = match serde_json::from_str(cleaned.trim()) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Generator reply is not a JSON array: {}", e);
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<NewQuestion>(entry).ok())
        .filter(|q| q.validate().is_ok())
        .map(|q| NewQuestion {
            is_remedial: remedial,
            ..q
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_array() {
        let reply = r#"[{"questionText":"What is 2+2?","options":["3","4","5","6"],"correctAnswer":1,"isRemedial":false}]"#;
        let parsed = parse_generated(reply, false);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].correct_answer, 1);
        assert_eq!(parsed[0].options[1], "4");
    }

    #[test]
    fn test_parse_strips_code_fences() {
        let reply = "```json\n[{\"questionText\":\"Q\",\"options\":[\"a\",\"b\",\"c\",\"d\"],\"correctAnswer\":3}]\n```";
        let parsed = parse_generated(reply, true);
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].is_remedial);
    }

    #[test]
    fn test_parse_drops_invalid_entries() {
        let reply = r#"[
            {"questionText":"ok","options":["a","b","c","d"],"correctAnswer":0},
            {"questionText":"too few","options":["a","b"],"correctAnswer":0},
            {"questionText":"bad index","options":["a","b","c","d"],"correctAnswer":7},
            {"nonsense": true}
        ]"#;
        let parsed = parse_generated(reply, false);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].question_text, "ok");
    }

    #[test]
    fn test_parse_garbage_yields_nothing() {
        assert!(parse_generated("Sorry, I can't help with that.", false).is_empty());
    }

    #[test]
    fn test_endpoint_carries_model_and_key() {
        let generator = GeminiGenerator::new(
            "secret",
            "gemini-2.5-flash",
            "https://generativelanguage.googleapis.com/v1beta/",
        )
        .unwrap();
        assert_eq!(
            generator.endpoint.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=secret"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(GeminiGenerator::new("k", "m", "not a url").is_err());
    }
}

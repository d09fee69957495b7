//! Optional keyword refinement through a local Ollama model.
//!
//! Only the ranked candidate table is sent, never document text. Every
//! failure degrades to [`RefineOutcome::Unavailable`]; the table itself is
//! never affected.

use std::collections::BTreeMap;
use std::time::Duration;

use frequently_types::KeywordRow;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:8b";

const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);
const CHAT_TIMEOUT: Duration = Duration::from_secs(180);
const TEMPERATURE: f64 = 0.2;

/// System prompt for keyword refinement.
pub const SYSTEM_PROMPT: &str = "You help refine keyword lists for literature reviews.

Rules:
- Prefer domain-specific terms/phrases.
- Remove generic academic filler terms.
- Merge obvious duplicates/variants (plural, hyphenation).
- Provide grouped keyword buckets suitable for building database searches.
- Do NOT invent terms unrelated to the given candidate list unless marked as \"suggested_expansions\".
Return strictly valid JSON only.
";

#[derive(Debug, thiserror::Error)]
pub enum RefineError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ollama chat HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("model did not return a JSON object: {0}")]
    MalformedJson(String),
}

#[derive(Serialize)]
struct KeywordPrompt<'a> {
    task: &'static str,
    topic: &'a str,
    candidates: &'a [KeywordRow],
    required_output: RequiredOutput,
    constraints: [&'static str; 4],
}

#[derive(Serialize)]
struct RequiredOutput {
    cleaned_keywords: &'static str,
    grouped_buckets: &'static str,
    suggested_expansions: &'static str,
    stopword_suggestions: &'static str,
    notes: &'static str,
}

/// Builds the user prompt: topic, the first `max_terms` candidates and the
/// expected output shape, as pretty-printed JSON.
pub fn build_keyword_prompt(
    topic: &str,
    candidates: &[KeywordRow],
    max_terms: usize,
) -> serde_json::Result<String> {
    let prompt = KeywordPrompt {
        task: "Refine keyword candidates for literature review searching",
        topic,
        candidates: &candidates[..candidates.len().min(max_terms)],
        required_output: RequiredOutput {
            cleaned_keywords: "List of cleaned/merged terms derived from candidates",
            grouped_buckets: "Dict of bucket_name -> list of terms",
            suggested_expansions:
                "Dict seed_term -> list of suggested synonyms/variants (may be new)",
            stopword_suggestions: "List of generic terms to consider excluding",
            notes: "Any brief notes about decisions",
        },
        constraints: [
            "cleaned_keywords must come from candidates (merging/normalizing allowed)",
            "suggested_expansions may include new synonyms/variants not in candidates",
            "limit grouped_buckets to 4-8 buckets",
            "output must be valid JSON and nothing else",
        ],
    };
    serde_json::to_string_pretty(&prompt)
}

/// Parses the model's reply into a JSON object.
///
/// Falls back to the span between the first `{` and the last `}` when the
/// reply carries extra prose around the object.
pub fn parse_refinement(content: &str) -> Result<Value, RefineError> {
    let value = match serde_json::from_str::<Value>(content) {
        Ok(v) => v,
        Err(first) => {
            let span = match (content.find('{'), content.rfind('}')) {
                (Some(start), Some(end)) if end > start => &content[start..=end],
                _ => return Err(RefineError::MalformedJson(first.to_string())),
            };
            serde_json::from_str(span).map_err(|e| RefineError::MalformedJson(e.to_string()))?
        }
    };

    if value.is_object() {
        Ok(value)
    } else {
        Err(RefineError::MalformedJson(format!(
            "expected an object, got `{value}`"
        )))
    }
}

/// Display view of a refinement reply.
///
/// Missing or oddly-typed fields become empty rather than failing the whole
/// reply; the raw object is kept for export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Refinement {
    pub cleaned_keywords: Vec<String>,
    pub grouped_buckets: BTreeMap<String, Vec<String>>,
    pub suggested_expansions: BTreeMap<String, Vec<String>>,
    pub stopword_suggestions: Vec<String>,
    pub notes: String,
    pub raw: Value,
}

impl Refinement {
    pub fn from_value(raw: Value) -> Self {
        Self {
            cleaned_keywords: strings(&raw["cleaned_keywords"]),
            grouped_buckets: string_lists(&raw["grouped_buckets"]),
            suggested_expansions: string_lists(&raw["suggested_expansions"]),
            stopword_suggestions: strings(&raw["stopword_suggestions"]),
            notes: strings(&raw["notes"]).join(" "),
            raw,
        }
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn strings(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(text).collect(),
        other => text(other).into_iter().collect(),
    }
}

fn string_lists(value: &Value) -> BTreeMap<String, Vec<String>> {
    value
        .as_object()
        .map(|map| map.iter().map(|(k, v)| (k.clone(), strings(v))).collect())
        .unwrap_or_default()
}

/// Result of a refinement attempt.
#[derive(Debug)]
pub enum RefineOutcome {
    /// The model replied with usable JSON.
    Refined {
        refinement: Refinement,
        /// The user prompt that was sent.
        prompt: String,
    },
    /// Refinement was skipped or failed; the reason is for display.
    Unavailable(String),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    format: &'static str,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

/// Client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// Returns `true` if the server answers `GET /api/tags` with 200.
    pub async fn is_alive(&self) -> bool {
        match self
            .client
            .get(self.endpoint("/api/tags"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => resp.status() == reqwest::StatusCode::OK,
            Err(_) => false,
        }
    }

    /// Sends `prompt` in JSON mode and parses the reply.
    pub async fn chat_json(&self, prompt: &str) -> Result<Value, RefineError> {
        let req = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            stream: false,
            format: "json",
            options: ChatOptions {
                temperature: TEMPERATURE,
            },
        };

        let resp = self
            .client
            .post(self.endpoint("/api/chat"))
            .timeout(CHAT_TIMEOUT)
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RefineError::Status(status));
        }

        let reply: ChatResponse = resp.json().await?;
        parse_refinement(&reply.message.content)
    }

    /// Runs one refinement round over the ranked table.
    pub async fn refine(&self, topic: &str, rows: &[KeywordRow], max_terms: usize) -> RefineOutcome {
        if rows.is_empty() {
            return RefineOutcome::Unavailable("no keywords to refine".to_owned());
        }

        if !self.is_alive().await {
            warn!(url = %self.base_url, "ollama not reachable, skipping refinement");
            return RefineOutcome::Unavailable(format!(
                "Ollama not reachable at `{}`. Keyword extraction succeeded, but LLM refinement was skipped.",
                self.base_url
            ));
        }

        let prompt = match build_keyword_prompt(topic, rows, max_terms) {
            Ok(p) => p,
            Err(e) => return RefineOutcome::Unavailable(format!("could not build prompt: {e}")),
        };

        info!(model = %self.model, prompt_chars = prompt.len(), "running refinement");
        match self.chat_json(&prompt).await {
            Ok(value) => RefineOutcome::Refined {
                refinement: Refinement::from_value(value),
                prompt,
            },
            Err(e) => {
                warn!(error = %e, "refinement failed");
                RefineOutcome::Unavailable(format!(
                    "LLM refinement failed (keywords still available): {e}"
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, routing::post, Json, Router};
    use frequently_types::Term;
    use std::net::SocketAddr;

    fn row(term: &str) -> KeywordRow {
        KeywordRow {
            term: Term::from(term),
            docs_with_term: 2,
            coverage_pct: 100.0,
            total_count: 4,
            tfidf_sum: 1.25,
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn prompt_shape_and_truncation() {
        let rows: Vec<KeywordRow> = ["poultry", "welfare", "sensors"].map(row).to_vec();
        let prompt = build_keyword_prompt("poultry welfare", &rows, 2).unwrap();
        let v: Value = serde_json::from_str(&prompt).unwrap();

        assert_eq!(v["topic"], "poultry welfare");
        assert_eq!(v["candidates"].as_array().unwrap().len(), 2);
        assert_eq!(v["candidates"][0]["term"], "poultry");
        assert_eq!(v["candidates"][0]["coverage_%"], 100.0);
        assert_eq!(v["constraints"].as_array().unwrap().len(), 4);
        assert!(v["required_output"]["grouped_buckets"].is_string());

        // Keys keep their declaration order.
        let keys = ["\"task\"", "\"topic\"", "\"candidates\"", "\"required_output\"", "\"constraints\""];
        let positions: Vec<usize> = keys.iter().map(|k| prompt.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(prompt.contains("\n  \"task\""));
    }

    #[test]
    fn parses_clean_json() {
        let v = parse_refinement(r#"{"cleaned_keywords": ["iot"]}"#).unwrap();
        assert_eq!(v["cleaned_keywords"][0], "iot");
    }

    #[test]
    fn parses_json_wrapped_in_prose() {
        let v = parse_refinement("Sure! Here you go:\n{\"notes\": \"ok\"}\nThanks.").unwrap();
        assert_eq!(v["notes"], "ok");
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            parse_refinement("no json here"),
            Err(RefineError::MalformedJson(_))
        ));
        assert!(parse_refinement("} backwards {").is_err());
        assert!(parse_refinement("[1, 2]").is_err());
    }

    #[test]
    fn refinement_tolerates_odd_shapes() {
        let raw = serde_json::json!({
            "cleaned_keywords": ["poultry welfare", "iot"],
            "grouped_buckets": {"sensing": ["iot", "sensors"], "odd": "single"},
            "suggested_expansions": [],
            "stopword_suggestions": "study",
            "notes": null
        });
        let r = Refinement::from_value(raw.clone());
        assert_eq!(r.cleaned_keywords, ["poultry welfare", "iot"]);
        assert_eq!(r.grouped_buckets["sensing"], ["iot", "sensors"]);
        assert_eq!(r.grouped_buckets["odd"], ["single"]);
        assert!(r.suggested_expansions.is_empty());
        assert_eq!(r.stopword_suggestions, ["study"]);
        assert_eq!(r.notes, "");
        assert_eq!(r.raw, raw);
    }

    #[tokio::test]
    async fn refine_against_mock_server() {
        let app = Router::new()
            .route("/api/tags", get(|| async { Json(serde_json::json!({"models": []})) }))
            .route(
                "/api/chat",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["model"], "test-model");
                    assert_eq!(body["format"], "json");
                    assert_eq!(body["stream"], false);
                    assert_eq!(body["messages"][0]["role"], "system");
                    let content = r#"{"cleaned_keywords":["poultry welfare"],"grouped_buckets":{"welfare":["poultry welfare"]}}"#;
                    Json(serde_json::json!({"message": {"role": "assistant", "content": content}}))
                }),
            );
        let base = serve(app).await;

        let client = OllamaClient::new(format!("{base}/"), "test-model");
        assert!(client.is_alive().await);

        match client.refine("topic", &[row("poultry welfare")], 200).await {
            RefineOutcome::Refined { refinement, prompt } => {
                assert_eq!(refinement.cleaned_keywords, ["poultry welfare"]);
                assert_eq!(refinement.grouped_buckets.len(), 1);
                assert!(prompt.contains("\"poultry welfare\""));
            }
            RefineOutcome::Unavailable(reason) => panic!("unexpected: {reason}"),
        }
    }

    #[tokio::test]
    async fn http_error_is_soft() {
        let app = Router::new()
            .route("/api/tags", get(|| async { "ok" }))
            .route(
                "/api/chat",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            );
        let base = serve(app).await;

        let client = OllamaClient::new(base, "m");
        let outcome = client.refine("topic", &[row("iot")], 10).await;
        assert!(matches!(outcome, RefineOutcome::Unavailable(ref r) if r.contains("500")));
    }

    #[tokio::test]
    async fn unreachable_server_is_soft() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = OllamaClient::new(format!("http://{addr}"), "m");
        assert!(!client.is_alive().await);
        let outcome = client.refine("topic", &[row("iot")], 10).await;
        assert!(matches!(outcome, RefineOutcome::Unavailable(ref r) if r.contains("not reachable")));
    }

    #[tokio::test]
    async fn empty_table_skips_refinement() {
        let client = OllamaClient::new("http://127.0.0.1:9", "m");
        assert!(matches!(
            client.refine("topic", &[], 10).await,
            RefineOutcome::Unavailable(_)
        ));
    }
}

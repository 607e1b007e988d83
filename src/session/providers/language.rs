// Copyright 2025 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Hosted language service backend (custom question answering REST API)

use super::{Candidate, QaBackend, QueryRequest, ServiceError};
use crate::config::{ConfigError, ServiceSettings};
use crate::session::chat::formatting::format_duration;
use crate::{log_debug, log_info};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

// Constants
const QUERY_PATH: &str = "language/:query-knowledgebases";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
// Raw bodies end up in the chat as error lines; longer ones are cut
const MAX_BODY_IN_MESSAGE: usize = 200;

/// Request body for the knowledge base query endpoint
#[derive(Debug, Serialize)]
struct AnswersOptions<'a> {
	question: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnswersResponse {
	#[serde(default)]
	answers: Vec<KnowledgeBaseAnswer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KnowledgeBaseAnswer {
	#[serde(default)]
	answer: Option<String>,
	#[serde(default)]
	confidence_score: Option<f64>,
	#[serde(default)]
	source: Option<String>,
}

impl From<KnowledgeBaseAnswer> for Candidate {
	fn from(answer: KnowledgeBaseAnswer) -> Self {
		Self {
			answer: answer.answer.unwrap_or_default(),
			confidence: answer.confidence_score,
			source: answer.source.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
	error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
	#[serde(default)]
	code: Option<String>,
	#[serde(default)]
	message: Option<String>,
}

/// Backend talking to the hosted language service over HTTPS
pub struct LanguageServiceBackend {
	client: Client,
	settings: ServiceSettings,
}

impl LanguageServiceBackend {
	pub fn new(settings: &ServiceSettings) -> Self {
		Self {
			client: Client::new(),
			settings: settings.clone(),
		}
	}

	/// Full query URL including project, deployment and API version
	fn query_url(&self, request: &QueryRequest) -> Result<Url, ServiceError> {
		let base = self.settings.endpoint.as_str().trim_end_matches('/');
		let mut url = Url::parse(&format!("{}/{}", base, QUERY_PATH)).map_err(|e| {
			ConfigError::InvalidEndpoint {
				endpoint: self.settings.endpoint.to_string(),
				reason: e.to_string(),
			}
		})?;

		url.query_pairs_mut()
			.append_pair("projectName", &request.project_name)
			.append_pair("deploymentName", &request.deployment_name)
			.append_pair("api-version", &self.settings.api_version);

		Ok(url)
	}
}

#[async_trait::async_trait]
impl QaBackend for LanguageServiceBackend {
	fn name(&self) -> &str {
		"language"
	}

	async fn query(&self, request: &QueryRequest) -> Result<Vec<Candidate>, ServiceError> {
		let url = self.query_url(request)?;
		log_debug!("POST {}", url);

		// Track API request time
		let api_start = std::time::Instant::now();

		let response = self
			.client
			.post(url)
			.header(SUBSCRIPTION_KEY_HEADER, &self.settings.api_key)
			.json(&AnswersOptions {
				question: &request.question,
			})
			.send()
			.await?;

		let status = response.status();
		let retry_after = response
			.headers()
			.get(reqwest::header::RETRY_AFTER)
			.and_then(|v| v.to_str().ok())
			.and_then(|v| v.trim().parse::<u64>().ok());

		// Get response body as text first so error bodies can be reported
		let response_text = response.text().await?;
		let api_time_ms = api_start.elapsed().as_millis() as u64;

		if !status.is_success() {
			log_debug!("HTTP {} response body: {}", status, response_text);
			return Err(classify_failure(status, retry_after, &response_text));
		}

		let parsed: AnswersResponse = serde_json::from_str(&response_text).map_err(|e| {
			log_debug!("Undecodable response body: {}", response_text);
			ServiceError::Decode(e.to_string())
		})?;

		log_info!(
			"Knowledge base answered in {} with {} candidate(s)",
			format_duration(api_time_ms),
			parsed.answers.len()
		);

		Ok(parsed.answers.into_iter().map(Candidate::from).collect())
	}
}

/// Turn a non-success response into a typed error with a readable message
fn classify_failure(status: StatusCode, retry_after: Option<u64>, body: &str) -> ServiceError {
	let message = error_message(status, body);

	match status {
		StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
			ServiceError::Authentication { status, message }
		}
		StatusCode::TOO_MANY_REQUESTS => ServiceError::Throttled {
			retry_after,
			message,
		},
		_ => ServiceError::Service { status, message },
	}
}

fn error_message(status: StatusCode, body: &str) -> String {
	if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
		match (parsed.error.code, parsed.error.message) {
			(Some(code), Some(message)) => return format!("({}) {}", code, message),
			(None, Some(message)) => return message,
			(Some(code), None) => return format!("({})", code),
			(None, None) => {}
		}
	}

	let body = body.trim();
	if body.is_empty() {
		status
			.canonical_reason()
			.unwrap_or("unknown error")
			.to_string()
	} else {
		truncate_body(body)
	}
}

fn truncate_body(body: &str) -> String {
	match body.char_indices().nth(MAX_BODY_IN_MESSAGE) {
		Some((cut, _)) => format!("{}...", &body[..cut]),
		None => body.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::{Config, ServiceConfig};
	use wiremock::matchers::{body_json, header, method, path, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn settings_for(endpoint: &str) -> ServiceSettings {
		let config = Config {
			service: ServiceConfig {
				endpoint: Some(endpoint.to_string()),
				api_key: Some("test-key".to_string()),
				project_name: Some("finance-faq".to_string()),
				deployment_name: Some("production".to_string()),
				..Default::default()
			},
			..Default::default()
		};
		ServiceSettings::from_config(&config).unwrap()
	}

	fn request(question: &str) -> QueryRequest {
		QueryRequest {
			question: question.to_string(),
			project_name: "finance-faq".to_string(),
			deployment_name: "production".to_string(),
		}
	}

	#[test]
	fn test_query_url() {
		let backend = LanguageServiceBackend::new(&settings_for(
			"https://finance-qa.cognitiveservices.azure.com/",
		));
		let url = backend.query_url(&request("q")).unwrap();
		assert_eq!(
			url.as_str(),
			"https://finance-qa.cognitiveservices.azure.com/language/:query-knowledgebases?projectName=finance-faq&deploymentName=production&api-version=2021-10-01"
		);
	}

	#[test]
	fn test_error_message_formats() {
		let body = r#"{"error":{"code":"401","message":"Access denied due to invalid subscription key."}}"#;
		assert_eq!(
			error_message(StatusCode::UNAUTHORIZED, body),
			"(401) Access denied due to invalid subscription key."
		);
		assert_eq!(
			error_message(StatusCode::BAD_GATEWAY, "upstream down"),
			"upstream down"
		);
		assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
	}

	#[test]
	fn test_long_error_bodies_are_cut() {
		let page = format!("<html>{}</html>", "ñ".repeat(500));
		let message = error_message(StatusCode::BAD_GATEWAY, &page);
		assert_eq!(message.chars().count(), MAX_BODY_IN_MESSAGE + 3);
		assert!(message.starts_with("<html>ñ"));
		assert!(message.ends_with("..."));
	}

	#[tokio::test]
	async fn test_query_returns_candidates_in_service_order() {
		let server = MockServer::start().await;
		let body = serde_json::json!({
			"answers": [
				{
					"questions": ["What is compound interest?"],
					"answer": "Interest calculated on principal plus accumulated interest.",
					"confidenceScore": 0.92,
					"id": 1,
					"source": "faq.md",
					"metadata": {}
				},
				{
					"answer": "Simple interest is calculated on principal only.",
					"confidenceScore": 0.95,
					"id": 2,
					"source": "glossary.md"
				}
			]
		});

		Mock::given(method("POST"))
			.and(path("/language/:query-knowledgebases"))
			.and(query_param("projectName", "finance-faq"))
			.and(query_param("deploymentName", "production"))
			.and(query_param("api-version", "2021-10-01"))
			.and(header("Ocp-Apim-Subscription-Key", "test-key"))
			.and(body_json(serde_json::json!({"question": "What is compound interest?"})))
			.respond_with(ResponseTemplate::new(200).set_body_json(&body))
			.expect(1)
			.mount(&server)
			.await;

		let backend = LanguageServiceBackend::new(&settings_for(&server.uri()));
		let candidates = backend
			.query(&request("What is compound interest?"))
			.await
			.unwrap();

		assert_eq!(candidates.len(), 2);
		// No re-ranking, even though the second one scored higher
		assert_eq!(candidates[0].source, "faq.md");
		assert_eq!(candidates[0].confidence, Some(0.92));
		assert_eq!(candidates[1].source, "glossary.md");
	}

	#[tokio::test]
	async fn test_query_with_no_answers() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/language/:query-knowledgebases"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"answers": []})))
			.mount(&server)
			.await;

		let backend = LanguageServiceBackend::new(&settings_for(&server.uri()));
		let candidates = backend.query(&request("asdkjasd")).await.unwrap();
		assert!(candidates.is_empty());
	}

	#[tokio::test]
	async fn test_missing_source_decodes_as_empty() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/language/:query-knowledgebases"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"answers": [{"answer": "Editorial answer", "confidenceScore": 0.5}]
			})))
			.mount(&server)
			.await;

		let backend = LanguageServiceBackend::new(&settings_for(&server.uri()));
		let candidates = backend.query(&request("hello")).await.unwrap();
		assert_eq!(candidates[0].answer, "Editorial answer");
		assert_eq!(candidates[0].source, "");
	}

	#[tokio::test]
	async fn test_missing_confidence_stays_absent() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/language/:query-knowledgebases"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"answers": [{"answer": "Some answer", "source": "faq.md"}]
			})))
			.mount(&server)
			.await;

		let backend = LanguageServiceBackend::new(&settings_for(&server.uri()));
		let candidates = backend.query(&request("q")).await.unwrap();
		assert_eq!(candidates[0].answer, "Some answer");
		assert_eq!(candidates[0].confidence, None);
		assert_eq!(candidates[0].source, "faq.md");
	}

	#[tokio::test]
	async fn test_unauthorized_maps_to_authentication_error() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/language/:query-knowledgebases"))
			.respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
				"error": {"code": "401", "message": "Access denied due to invalid subscription key."}
			})))
			.mount(&server)
			.await;

		let backend = LanguageServiceBackend::new(&settings_for(&server.uri()));
		let err = backend.query(&request("q")).await.unwrap_err();
		assert!(matches!(err, ServiceError::Authentication { .. }));
		assert!(!err.is_transient());
		assert!(err.to_string().contains("invalid subscription key"));
	}

	#[tokio::test]
	async fn test_throttling_keeps_retry_after() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/language/:query-knowledgebases"))
			.respond_with(
				ResponseTemplate::new(429)
					.insert_header("Retry-After", "7")
					.set_body_string("Rate limit is exceeded."),
			)
			.mount(&server)
			.await;

		let backend = LanguageServiceBackend::new(&settings_for(&server.uri()));
		let err = backend.query(&request("q")).await.unwrap_err();
		match err {
			ServiceError::Throttled {
				retry_after,
				message,
			} => {
				assert_eq!(retry_after, Some(7));
				assert_eq!(message, "Rate limit is exceeded.");
			}
			other => panic!("expected throttled error, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_server_error_is_not_retried() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/language/:query-knowledgebases"))
			.respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
			.expect(1)
			.mount(&server)
			.await;

		let backend = LanguageServiceBackend::new(&settings_for(&server.uri()));
		let err = backend.query(&request("q")).await.unwrap_err();
		assert!(matches!(err, ServiceError::Service { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));
		assert!(err.is_transient());
	}

	#[tokio::test]
	async fn test_malformed_body_is_decode_error() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/language/:query-knowledgebases"))
			.respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
			.mount(&server)
			.await;

		let backend = LanguageServiceBackend::new(&settings_for(&server.uri()));
		let err = backend.query(&request("q")).await.unwrap_err();
		assert!(matches!(err, ServiceError::Decode(_)));
		// The body itself only goes to the debug log
		assert!(!err.to_string().contains("gateway"));
		assert!(err.to_string().starts_with("invalid response from service: "));
	}

	#[tokio::test]
	async fn test_unreachable_host_is_transport_error() {
		// Nothing listens on the discard port locally
		let backend = LanguageServiceBackend::new(&settings_for("http://127.0.0.1:9"));
		let err = backend.query(&request("q")).await.unwrap_err();
		assert!(matches!(err, ServiceError::Transport(_)));
		assert!(err.is_transient());
	}
}

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

// Answer client: one question in, one normalized result out

use super::providers::{Candidate, LanguageServiceBackend, QaBackend, QueryRequest, ServiceError};
use crate::config::{ConfigError, ServiceSettings};
use crate::log_debug;

/// Shown when the service finds nothing for the question
pub const NO_ANSWER_MESSAGE: &str = "No se encontraron respuestas. ¿Podrías reformular la pregunta?";

/// Prefix of the answer text when the call failed
pub const ERROR_PREFIX: &str = "Error al obtener respuesta";

/// What happened to a single question
#[derive(Debug)]
pub enum AnswerOutcome {
	Found(Candidate),
	NotFound,
	Failed(ServiceError),
}

/// Normalized result handed to the session.
///
/// Either the answer fields are set (`confidence` and `source` only when a
/// candidate was found, and `confidence` only if the service scored it) or
/// `error_message` is; `answer_text` is always displayable.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerResult {
	pub answer_text: String,
	pub confidence: Option<f64>,
	pub source: Option<String>,
	pub error_message: Option<String>,
}

impl AnswerResult {
	pub fn is_error(&self) -> bool {
		self.error_message.is_some()
	}
}

impl From<AnswerOutcome> for AnswerResult {
	fn from(outcome: AnswerOutcome) -> Self {
		match outcome {
			AnswerOutcome::Found(candidate) => Self {
				answer_text: candidate.answer,
				confidence: candidate.confidence,
				source: Some(candidate.source),
				error_message: None,
			},
			AnswerOutcome::NotFound => Self {
				answer_text: NO_ANSWER_MESSAGE.to_string(),
				confidence: None,
				source: None,
				error_message: None,
			},
			AnswerOutcome::Failed(error) => {
				let message = error.to_string();
				Self {
					answer_text: format!("{}: {}", ERROR_PREFIX, message),
					confidence: None,
					source: None,
					error_message: Some(message),
				}
			}
		}
	}
}

enum Connection {
	Ready {
		backend: Box<dyn QaBackend>,
		project_name: String,
		deployment_name: String,
	},
	Misconfigured(ConfigError),
}

/// Client for the question answering service.
///
/// Holds the process-wide connection settings; constructing it never fails so
/// a bad configuration shows up as an error answer on the first question.
pub struct AnswerClient {
	connection: Connection,
}

impl AnswerClient {
	pub fn new(settings: Result<&ServiceSettings, &ConfigError>) -> Self {
		match settings {
			Ok(settings) => Self::with_backend(
				Box::new(LanguageServiceBackend::new(settings)),
				&settings.project_name,
				&settings.deployment_name,
			),
			Err(error) => Self {
				connection: Connection::Misconfigured(error.clone()),
			},
		}
	}

	/// Use a specific backend, e.g. a fake in tests
	pub fn with_backend(
		backend: Box<dyn QaBackend>,
		project_name: &str,
		deployment_name: &str,
	) -> Self {
		Self {
			connection: Connection::Ready {
				backend,
				project_name: project_name.to_string(),
				deployment_name: deployment_name.to_string(),
			},
		}
	}

	pub fn is_configured(&self) -> bool {
		matches!(self.connection, Connection::Ready { .. })
	}

	/// Ask the service and keep only the top-ranked candidate
	pub async fn outcome(&self, question: &str) -> AnswerOutcome {
		let (backend, project_name, deployment_name) = match &self.connection {
			Connection::Ready {
				backend,
				project_name,
				deployment_name,
			} => (backend, project_name, deployment_name),
			Connection::Misconfigured(error) => {
				return AnswerOutcome::Failed(ServiceError::Configuration(error.clone()))
			}
		};

		let request = QueryRequest {
			question: question.to_string(),
			project_name: project_name.clone(),
			deployment_name: deployment_name.clone(),
		};

		match backend.query(&request).await {
			Ok(candidates) => match candidates.into_iter().next() {
				Some(top) => AnswerOutcome::Found(top),
				None => AnswerOutcome::NotFound,
			},
			Err(error) => {
				log_debug!(
					"{} backend failed ({}, transient: {}): {}",
					backend.name(),
					error.kind(),
					error.is_transient(),
					error
				);
				AnswerOutcome::Failed(error)
			}
		}
	}

	/// Same as `outcome`, flattened into the display-ready result
	pub async fn get_answer(&self, question: &str) -> AnswerResult {
		self.outcome(question).await.into()
	}
}

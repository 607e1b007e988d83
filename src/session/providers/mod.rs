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

// Backend abstraction for hosted question answering services

use crate::config::ConfigError;
use reqwest::StatusCode;

pub mod language;

pub use language::LanguageServiceBackend;

/// One question addressed to a knowledge base
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
	pub question: String,
	pub project_name: String,
	pub deployment_name: String,
}

/// A ranked answer candidate as returned by the service.
/// `confidence` is `None` when the service sent no score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
	pub answer: String,
	pub confidence: Option<f64>,
	pub source: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
	#[error("{0}")]
	Configuration(#[from] ConfigError),

	#[error("HTTP {status}: {message}")]
	Authentication { status: StatusCode, message: String },

	#[error("HTTP 429 Too Many Requests: {message}")]
	Throttled {
		retry_after: Option<u64>,
		message: String,
	},

	#[error("HTTP {status}: {message}")]
	Service { status: StatusCode, message: String },

	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("invalid response from service: {0}")]
	Decode(String),
}

impl ServiceError {
	/// Whether the same request could plausibly succeed later.
	/// Only used for diagnostics; failures are never retried.
	pub fn is_transient(&self) -> bool {
		match self {
			ServiceError::Throttled { .. } => true,
			ServiceError::Service { status, .. } => status.is_server_error(),
			ServiceError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
			ServiceError::Configuration(_)
			| ServiceError::Authentication { .. }
			| ServiceError::Decode(_) => false,
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			ServiceError::Configuration(_) => "configuration",
			ServiceError::Authentication { .. } => "authentication",
			ServiceError::Throttled { .. } => "throttled",
			ServiceError::Service { .. } => "service",
			ServiceError::Transport(_) => "transport",
			ServiceError::Decode(_) => "decode",
		}
	}
}

/// Trait that all question answering backends must implement
#[async_trait::async_trait]
pub trait QaBackend: Send + Sync {
	/// Get the backend name (used in diagnostics)
	fn name(&self) -> &str;

	/// Ask the knowledge base; candidates come back in the service's own order
	async fn query(&self, request: &QueryRequest) -> Result<Vec<Candidate>, ServiceError>;
}

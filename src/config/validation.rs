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

use std::fmt;
use url::Url;

use super::{Config, API_KEY_ENV, DEPLOYMENT_NAME_ENV, ENDPOINT_ENV, PROJECT_NAME_ENV};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
	#[error("{setting} is required but not set (use {env_var} or the [service] section of the config file)")]
	Missing {
		setting: &'static str,
		env_var: &'static str,
	},

	#[error("invalid service endpoint '{endpoint}': {reason}")]
	InvalidEndpoint { endpoint: String, reason: String },

	#[error("api_version must not be empty (remove it from the [service] section to use the default)")]
	EmptyApiVersion,
}

/// Validated, immutable connection settings for the question answering
/// service. Built once at startup and handed to the answer client.
#[derive(Clone, PartialEq)]
pub struct ServiceSettings {
	pub endpoint: Url,
	pub api_key: String,
	pub project_name: String,
	pub deployment_name: String,
	pub api_version: String,
}

// Keep the access key out of debug output
impl fmt::Debug for ServiceSettings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServiceSettings")
			.field("endpoint", &self.endpoint.as_str())
			.field("api_key", &"***")
			.field("project_name", &self.project_name)
			.field("deployment_name", &self.deployment_name)
			.field("api_version", &self.api_version)
			.finish()
	}
}

impl ServiceSettings {
	/// Validate the service section of the configuration
	pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
		let service = &config.service;

		let endpoint = required(&service.endpoint, "endpoint", ENDPOINT_ENV)?;
		let api_key = required(&service.api_key, "api_key", API_KEY_ENV)?;
		let project_name = required(&service.project_name, "project_name", PROJECT_NAME_ENV)?;
		let deployment_name = required(
			&service.deployment_name,
			"deployment_name",
			DEPLOYMENT_NAME_ENV,
		)?;

		let api_version = service.api_version.trim();
		if api_version.is_empty() {
			return Err(ConfigError::EmptyApiVersion);
		}

		Ok(Self {
			endpoint: parse_endpoint(&endpoint)?,
			api_key,
			project_name,
			deployment_name,
			api_version: api_version.to_string(),
		})
	}
}

fn required(
	value: &Option<String>,
	setting: &'static str,
	env_var: &'static str,
) -> Result<String, ConfigError> {
	value
		.as_deref()
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.map(str::to_string)
		.ok_or(ConfigError::Missing { setting, env_var })
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
	let invalid = |reason: String| ConfigError::InvalidEndpoint {
		endpoint: endpoint.to_string(),
		reason,
	};

	let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;

	match url.scheme() {
		"http" | "https" => {}
		other => return Err(invalid(format!("unsupported scheme '{}'", other))),
	}
	if url.host_str().is_none() {
		return Err(invalid("missing host".to_string()));
	}
	if url.query().is_some() {
		return Err(invalid("query parameters are not allowed".to_string()));
	}

	Ok(url)
}

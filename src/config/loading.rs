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

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::{Config, API_KEY_ENV, DEPLOYMENT_NAME_ENV, ENDPOINT_ENV, PROJECT_NAME_ENV};

impl Config {
	/// Load configuration once at process start.
	///
	/// Order of precedence (later wins): built-in defaults, the optional TOML
	/// file, a `.env` file in the working directory, the process environment.
	pub fn load(config_path: Option<&Path>) -> Result<Self> {
		let mut config = match config_path {
			Some(path) => Self::from_file(path)?,
			None => Self::default(),
		};

		// Best-effort .env load; a missing file is not an error
		if let Err(e) = dotenvy::dotenv() {
			if !e.not_found() {
				crate::log_error!("Failed to read .env file: {}", e);
			}
		}

		config.apply_env_overrides(|key| std::env::var(key).ok());

		Ok(config)
	}

	/// Read and parse a TOML configuration file
	pub fn from_file(path: &Path) -> Result<Self> {
		let config_str = fs::read_to_string(path)
			.context(format!("Failed to read config from {}", path.display()))?;
		let mut config = Self::from_toml_str(&config_str)?;
		config.config_path = Some(path.to_path_buf());
		Ok(config)
	}

	pub fn from_toml_str(config_str: &str) -> Result<Self> {
		toml::from_str(config_str).context("Failed to parse TOML configuration")
	}

	/// Environment variables take precedence over config file values.
	/// Empty values are ignored so an exported-but-blank variable does not
	/// wipe a value from the file.
	pub fn apply_env_overrides<F>(&mut self, lookup: F)
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

		if let Some(endpoint) = read(ENDPOINT_ENV) {
			self.service.endpoint = Some(endpoint);
		}
		if let Some(api_key) = read(API_KEY_ENV) {
			self.service.api_key = Some(api_key);
		}
		if let Some(project_name) = read(PROJECT_NAME_ENV) {
			self.service.project_name = Some(project_name);
		}
		if let Some(deployment_name) = read(DEPLOYMENT_NAME_ENV) {
			self.service.deployment_name = Some(deployment_name);
		}
	}
}

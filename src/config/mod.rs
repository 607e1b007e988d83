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

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::path::PathBuf;
use std::str::FromStr;

// Re-export all modules
pub mod loading;
pub mod validation;

pub use validation::{ConfigError, ServiceSettings};

/// Environment variables read on top of the config file
pub const ENDPOINT_ENV: &str = "AI_SERVICE_ENDPOINT";
pub const API_KEY_ENV: &str = "AI_SERVICE_KEY";
pub const PROJECT_NAME_ENV: &str = "QA_PROJECT_NAME";
pub const DEPLOYMENT_NAME_ENV: &str = "QA_DEPLOYMENT_NAME";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum LogLevel {
	#[serde(rename = "none")]
	None,
	#[serde(rename = "info")]
	Info,
	#[serde(rename = "debug")]
	Debug,
}

impl Default for LogLevel {
	fn default() -> Self {
		Self::None
	}
}

impl LogLevel {
	/// Check if info logging is enabled
	pub fn is_info_enabled(&self) -> bool {
		matches!(self, LogLevel::Info | LogLevel::Debug)
	}

	/// Check if debug logging is enabled
	pub fn is_debug_enabled(&self) -> bool {
		matches!(self, LogLevel::Debug)
	}
}

impl FromStr for LogLevel {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"none" | "off" => Ok(LogLevel::None),
			"info" => Ok(LogLevel::Info),
			"debug" => Ok(LogLevel::Debug),
			other => Err(format!(
				"unknown log level '{}', expected none, info or debug",
				other
			)),
		}
	}
}

fn default_api_version() -> String {
	"2021-10-01".to_string()
}

/// Connection settings for the question answering service.
/// Every value is optional here; `ServiceSettings::from_config` decides
/// whether the combination is usable.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServiceConfig {
	#[serde(default)]
	pub endpoint: Option<String>,
	#[serde(default, skip_serializing)]
	pub api_key: Option<String>,
	#[serde(default)]
	pub project_name: Option<String>,
	#[serde(default)]
	pub deployment_name: Option<String>,
	#[serde(default = "default_api_version")]
	pub api_version: String,
}

impl Default for ServiceConfig {
	fn default() -> Self {
		Self {
			endpoint: None,
			api_key: None,
			project_name: None,
			deployment_name: None,
			api_version: default_api_version(),
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
	#[serde(default)]
	pub log_level: LogLevel,

	#[serde(default)]
	pub service: ServiceConfig,

	// File the configuration was read from, if any
	#[serde(skip)]
	pub config_path: Option<PathBuf>,
}

impl Config {
	/// Get the global log level
	pub fn get_log_level(&self) -> LogLevel {
		self.log_level
	}
}

// Logging macros for different log levels
// These macros automatically check the current log level and only print if appropriate

thread_local! {
	static CURRENT_LOG_LEVEL: Cell<Option<LogLevel>> = const { Cell::new(None) };
}

/// Set the log level for the thread (to be used by logging macros)
pub fn set_thread_log_level(level: LogLevel) {
	CURRENT_LOG_LEVEL.with(|c| c.set(Some(level)));
}

/// Get the log level for the thread, if one was set
pub fn thread_log_level() -> Option<LogLevel> {
	CURRENT_LOG_LEVEL.with(|c| c.get())
}

/// Info logging macro with automatic cyan coloring
/// Shows info messages when log level is Info OR Debug
#[macro_export]
macro_rules! log_info {
	($fmt:expr) => {
		if let Some(level) = $crate::config::thread_log_level() {
			if level.is_info_enabled() {
				use colored::Colorize;
				println!("{}", $fmt.cyan());
			}
		}
	};
	($fmt:expr, $($arg:expr),*) => {
		if let Some(level) = $crate::config::thread_log_level() {
			if level.is_info_enabled() {
				use colored::Colorize;
				println!("{}", format!($fmt, $($arg),*).cyan());
			}
		}
	};
}

/// Debug logging macro with automatic bright blue coloring
#[macro_export]
macro_rules! log_debug {
	($fmt:expr) => {
		if let Some(level) = $crate::config::thread_log_level() {
			if level.is_debug_enabled() {
				use colored::Colorize;
				println!("{}", $fmt.bright_blue());
			}
		}
	};
	($fmt:expr, $($arg:expr),*) => {
		if let Some(level) = $crate::config::thread_log_level() {
			if level.is_debug_enabled() {
				use colored::Colorize;
				println!("{}", format!($fmt, $($arg),*).bright_blue());
			}
		}
	};
}

/// Error logging macro with automatic bright red coloring
/// Always visible regardless of log level (errors should always be shown)
#[macro_export]
macro_rules! log_error {
	($fmt:expr) => {{
		use colored::Colorize;
		eprintln!("{}", $fmt.bright_red());
	}};
	($fmt:expr, $($arg:expr),*) => {{
		use colored::Colorize;
		eprintln!("{}", format!($fmt, $($arg),*).bright_red());
	}};
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_log_level_parsing() {
		assert_eq!("none".parse::<LogLevel>().unwrap(), LogLevel::None);
		assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
		assert_eq!(" debug ".parse::<LogLevel>().unwrap(), LogLevel::Debug);
		assert!("verbose".parse::<LogLevel>().is_err());
	}

	#[test]
	fn test_log_level_gates() {
		assert!(!LogLevel::None.is_info_enabled());
		assert!(LogLevel::Info.is_info_enabled());
		assert!(!LogLevel::Info.is_debug_enabled());
		assert!(LogLevel::Debug.is_info_enabled());
		assert!(LogLevel::Debug.is_debug_enabled());
	}

	#[test]
	fn test_thread_log_level() {
		std::thread::spawn(|| {
			assert_eq!(thread_log_level(), None);
			set_thread_log_level(LogLevel::Debug);
			assert_eq!(thread_log_level(), Some(LogLevel::Debug));
		})
		.join()
		.unwrap();
	}

	#[test]
	fn test_api_key_is_not_serialized() {
		let config = Config {
			log_level: LogLevel::Info,
			service: ServiceConfig {
				endpoint: Some("https://example.cognitiveservices.azure.com".to_string()),
				api_key: Some("secret".to_string()),
				..Default::default()
			},
			..Default::default()
		};

		let toml_str = toml::to_string(&config).unwrap();
		assert!(toml_str.contains("log_level = \"info\""));
		assert!(toml_str.contains("[service]"));
		assert!(
			!toml_str.contains("secret"),
			"API key must not be written out, but TOML contains: {}",
			toml_str
		);
	}

	#[test]
	fn test_default_api_version() {
		let config = Config::default();
		assert_eq!(config.service.api_version, "2021-10-01");
		assert_eq!(config.get_log_level(), LogLevel::None);
	}
}

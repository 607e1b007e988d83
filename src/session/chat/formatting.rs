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

// Utility functions for formatting log lines and timings

use crate::session::log::{ASSISTANT_MARKER, USER_MARKER};

pub fn question_line(question: &str) -> String {
	format!("{}: {}", USER_MARKER, question)
}

pub fn answer_line(answer: &str) -> String {
	format!("{}: {}", ASSISTANT_MARKER, answer)
}

/// Confidence in [0,1] shown as a percentage with one decimal
pub fn confidence_line(confidence: f64) -> String {
	format!("Confianza: {:.1}%", confidence * 100.0)
}

pub fn source_line(source: &str) -> String {
	format!("Fuente: {}", source)
}

// Utility function to format time in a human-readable format
pub fn format_duration(milliseconds: u64) -> String {
	if milliseconds == 0 {
		return "0ms".to_string();
	}

	let ms = milliseconds % 1000;
	let seconds = (milliseconds / 1000) % 60;
	let minutes = milliseconds / 60000;

	let mut parts = Vec::new();

	if minutes > 0 {
		parts.push(format!("{}m", minutes));
	}
	if seconds > 0 {
		parts.push(format!("{}s", seconds));
	}
	// Only show milliseconds if >= 100ms when other units are present
	if parts.is_empty() || ms >= 100 {
		parts.push(format!("{}ms", ms));
	}

	parts.join(" ")
}

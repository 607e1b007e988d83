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

// Append-only conversation log for one session

/// Leading marker of lines typed by the user
pub const USER_MARKER: &str = "👤";

/// Leading marker of answer lines
pub const ASSISTANT_MARKER: &str = "🤖";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
	User,
	System,
}

impl Role {
	/// Classify a display line by its leading marker
	pub fn of(line: &str) -> Self {
		if line.starts_with(USER_MARKER) {
			Role::User
		} else {
			Role::System
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLine<'a> {
	pub text: &'a str,
	pub role: Role,
}

/// Ordered display lines of one session. Lines are only ever appended.
#[derive(Debug, Default)]
pub struct SessionLog {
	lines: Vec<String>,
}

impl SessionLog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn append(&mut self, line: impl Into<String>) {
		self.lines.push(line.into());
	}

	/// Every line in insertion order with its role
	pub fn render_all(&self) -> Vec<RenderedLine<'_>> {
		self.lines
			.iter()
			.map(|line| RenderedLine {
				text: line,
				role: Role::of(line),
			})
			.collect()
	}

	pub fn lines(&self) -> &[String] {
		&self.lines
	}

	/// The trailing `n` lines (fewer if the log is shorter)
	pub fn last(&self, n: usize) -> &[String] {
		let start = self.lines.len().saturating_sub(n);
		&self.lines[start..]
	}

	pub fn len(&self) -> usize {
		self.lines.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_roles_from_markers() {
		assert_eq!(Role::of("👤: What is APR?"), Role::User);
		assert_eq!(Role::of("🤖: Annual percentage rate."), Role::System);
		assert_eq!(Role::of("Confianza: 92.0%"), Role::System);
		assert_eq!(Role::of("Fuente: faq.md"), Role::System);
		// Marker must lead the line
		assert_eq!(Role::of("Fuente: 👤.md"), Role::System);
	}

	#[test]
	fn test_append_keeps_order() {
		let mut log = SessionLog::new();
		assert!(log.is_empty());

		log.append("👤: one");
		log.append("🤖: two".to_string());
		log.append("Fuente: three");

		assert_eq!(log.len(), 3);
		assert_eq!(log.lines(), ["👤: one", "🤖: two", "Fuente: three"]);
		assert_eq!(log.last(2), ["🤖: two", "Fuente: three"]);
		assert_eq!(log.last(10).len(), 3);
	}

	#[test]
	fn test_render_all_is_repeatable() {
		let mut log = SessionLog::new();
		log.append("👤: What is APR?");
		log.append("🤖: Annual percentage rate.");

		let first: Vec<(String, Role)> = log
			.render_all()
			.into_iter()
			.map(|l| (l.text.to_string(), l.role))
			.collect();
		let second: Vec<(String, Role)> = log
			.render_all()
			.into_iter()
			.map(|l| (l.text.to_string(), l.role))
			.collect();

		assert_eq!(first, second);
		assert_eq!(first[0].1, Role::User);
		assert_eq!(first[1].1, Role::System);
	}

	#[test]
	fn test_duplicate_lines_are_kept() {
		let mut log = SessionLog::new();
		log.append("👤: hola");
		log.append("👤: hola");
		assert_eq!(log.len(), 2);
	}
}

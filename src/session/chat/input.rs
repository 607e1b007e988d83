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

// User input handling module

use anyhow::Result;
use colored::*;
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config as RustylineConfig, EditMode, Editor, Helper};
use std::borrow::Cow::{self, Owned};

pub const INPUT_LABEL: &str = "Tu pregunta sobre finanzas:";
pub const PLACEHOLDER: &str = "Escribe tu pregunta aquí...";
pub const EXIT_COMMAND: &str = "/exit";

const PROMPT: &str = "❯ ";

#[derive(Debug, PartialEq)]
pub enum InputEvent {
	Question(String),
	/// Ctrl+C on the prompt
	Cleared,
	/// Ctrl+D or /exit
	Exit,
}

/// Shows the placeholder while the line is empty
#[derive(Default)]
pub struct QuestionHelper;

impl Completer for QuestionHelper {
	type Candidate = String;
}

impl Hinter for QuestionHelper {
	type Hint = String;

	fn hint(&self, line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
		if line.is_empty() {
			Some(PLACEHOLDER.to_string())
		} else {
			None
		}
	}
}

impl Highlighter for QuestionHelper {
	fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
		Owned(hint.dimmed().to_string())
	}
}

impl Validator for QuestionHelper {}

impl Helper for QuestionHelper {}

/// Line editor kept for the whole session so ↑/↓ recall earlier questions
pub struct QuestionInput {
	editor: Editor<QuestionHelper, DefaultHistory>,
}

impl QuestionInput {
	pub fn new() -> Result<Self> {
		let config = RustylineConfig::builder()
			.completion_type(CompletionType::List)
			.edit_mode(EditMode::Emacs)
			.auto_add_history(true) // Automatically add lines to history
			.bell_style(rustyline::config::BellStyle::None) // No bell
			.build();

		let mut editor = Editor::with_config(config)?;
		editor.set_helper(Some(QuestionHelper));

		Ok(Self { editor })
	}

	/// Read one submission from the terminal
	pub fn read_question(&mut self) -> Result<InputEvent> {
		println!("{}", INPUT_LABEL.bright_blue());

		match self.editor.readline(PROMPT) {
			Ok(line) => Ok(classify_line(line)),
			Err(ReadlineError::Interrupted) => Ok(InputEvent::Cleared),
			Err(ReadlineError::Eof) => Ok(InputEvent::Exit),
			Err(err) => Err(anyhow::anyhow!("Error reading input: {}", err)),
		}
	}
}

fn classify_line(line: String) -> InputEvent {
	if line.trim() == EXIT_COMMAND {
		InputEvent::Exit
	} else {
		InputEvent::Question(line)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_exit_command() {
		assert_eq!(classify_line("/exit".to_string()), InputEvent::Exit);
		assert_eq!(classify_line("  /exit  ".to_string()), InputEvent::Exit);
	}

	#[test]
	fn test_questions_pass_through_untrimmed() {
		assert_eq!(
			classify_line("  What is APR? ".to_string()),
			InputEvent::Question("  What is APR? ".to_string())
		);
		// Empty input is left for the session to ignore
		assert_eq!(
			classify_line(String::new()),
			InputEvent::Question(String::new())
		);
	}
}

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

// Interactive session runner

use super::animation::LoadingIndicator;
use super::display::{print_header, render_session, render_tail};
use super::input::{InputEvent, QuestionInput, EXIT_COMMAND};
use super::session::{ChatSession, SubmitOutcome};
use crate::session::answer::AnswerClient;
use crate::log_debug;
use anyhow::Result;
use colored::*;
use std::sync::Arc;

const LOADING_MESSAGE: &str = "Buscando respuesta...";

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
	/// Clear the screen and redraw the whole conversation after each answer
	pub clear_screen: bool,
}

impl Default for RunOptions {
	fn default() -> Self {
		Self { clear_screen: true }
	}
}

// Run an interactive session until the user leaves
pub async fn run_interactive_session(client: Arc<AnswerClient>, options: RunOptions) -> Result<()> {
	let mut session = ChatSession::new(client);
	let mut input = QuestionInput::new()?;

	// Startup warnings stay visible until the first answer redraws the screen
	print_header();
	println!(
		"{}",
		format!("Ctrl+D o {} para salir.", EXIT_COMMAND).dimmed()
	);

	loop {
		// Input is only read while idle, so answers never interleave
		let question = match input.read_question()? {
			InputEvent::Question(question) => question,
			InputEvent::Cleared => continue,
			InputEvent::Exit => break,
		};

		if question.trim().is_empty() {
			continue;
		}

		let indicator = LoadingIndicator::start(LOADING_MESSAGE);
		let outcome = session.submit(&question).await;
		indicator.stop().await;

		match outcome {
			SubmitOutcome::Answered { lines_added } => {
				log_debug!("Appended {} line(s), log now has {}", lines_added, session.log().len());
				if options.clear_screen {
					render_session(session.log())?;
				} else {
					render_tail(session.log(), lines_added)?;
				}
			}
			SubmitOutcome::Ignored => {}
		}
	}

	println!("{}", "¡Hasta luego!".bright_green());
	Ok(())
}

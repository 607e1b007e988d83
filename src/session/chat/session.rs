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

// Chat session: per-user state and the submission handler

use super::formatting::{answer_line, confidence_line, question_line, source_line};
use crate::session::answer::{AnswerClient, AnswerResult};
use crate::session::log::SessionLog;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
	Idle,
	Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// Empty or whitespace-only input; nothing was sent or logged
	Ignored,
	Answered { lines_added: usize },
}

// Marks the session as processing for as long as it is alive. Dropping it,
// including when the submit future itself is dropped, goes back to Idle.
struct InFlight<'a> {
	state: &'a mut SessionState,
}

impl<'a> InFlight<'a> {
	fn enter(state: &'a mut SessionState) -> Self {
		*state = SessionState::Processing;
		Self { state }
	}
}

impl Drop for InFlight<'_> {
	fn drop(&mut self) {
		*self.state = SessionState::Idle;
	}
}

/// One user's conversation. Sessions share the client but never their log.
pub struct ChatSession {
	client: Arc<AnswerClient>,
	log: SessionLog,
	state: SessionState,
}

impl ChatSession {
	pub fn new(client: Arc<AnswerClient>) -> Self {
		Self {
			client,
			log: SessionLog::new(),
			state: SessionState::Idle,
		}
	}

	pub fn log(&self) -> &SessionLog {
		&self.log
	}

	pub fn state(&self) -> SessionState {
		self.state
	}

	/// Send one question and append its lines once the answer is back.
	///
	/// `&mut self` keeps a second submission out while one is in flight. A
	/// cancelled submission leaves the session idle with nothing appended.
	pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
		let question = input.trim();
		if question.is_empty() {
			return SubmitOutcome::Ignored;
		}

		let result = {
			let _in_flight = InFlight::enter(&mut self.state);
			self.client.get_answer(question).await
		};

		let lines_added = self.record(question, &result);
		SubmitOutcome::Answered { lines_added }
	}

	// Question, answer, then confidence and source when present
	fn record(&mut self, question: &str, result: &AnswerResult) -> usize {
		let before = self.log.len();

		self.log.append(question_line(question));
		self.log.append(answer_line(&result.answer_text));
		if let Some(confidence) = result.confidence {
			self.log.append(confidence_line(confidence));
		}
		if let Some(source) = result.source.as_deref().filter(|s| !s.is_empty()) {
			self.log.append(source_line(source));
		}

		self.log.len() - before
	}
}

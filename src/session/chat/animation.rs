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

// Animation module for the in-flight indicator

use anyhow::Result;
use colored::*;
use crossterm::{cursor, execute, terminal};
use std::io::{stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

// Animation frames for loading indicator
const LOADING_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

const FRAME_DELAY_MS: u64 = 100;

/// Spinner shown while a question is being answered
pub struct LoadingIndicator {
	done: Arc<AtomicBool>,
	handle: JoinHandle<Result<()>>,
}

impl LoadingIndicator {
	pub fn start(message: &'static str) -> Self {
		let done = Arc::new(AtomicBool::new(false));
		let handle = tokio::spawn(animate(message, done.clone()));
		Self { done, handle }
	}

	/// Stop the spinner and wipe its line
	pub async fn stop(self) {
		self.done.store(true, Ordering::SeqCst);
		match self.handle.await {
			Ok(Ok(())) => {}
			Ok(Err(e)) => crate::log_debug!("Loading indicator failed: {}", e),
			Err(e) => crate::log_debug!("Loading indicator task failed: {}", e),
		}
	}
}

async fn animate(message: &'static str, done: Arc<AtomicBool>) -> Result<()> {
	let mut stdout = stdout();
	let mut frame_idx = 0;

	while !done.load(Ordering::SeqCst) {
		execute!(
			stdout,
			cursor::MoveToColumn(0),
			terminal::Clear(terminal::ClearType::CurrentLine)
		)?;
		print!(" {} {}", LOADING_FRAMES[frame_idx].cyan(), message.bright_blue());
		stdout.flush()?;

		frame_idx = (frame_idx + 1) % LOADING_FRAMES.len();
		tokio::time::sleep(tokio::time::Duration::from_millis(FRAME_DELAY_MS)).await;
	}

	execute!(
		stdout,
		cursor::MoveToColumn(0),
		terminal::Clear(terminal::ClearType::CurrentLine)
	)?;
	stdout.flush()?;

	Ok(())
}

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

// Conversation display

use crate::session::log::{RenderedLine, Role, SessionLog};
use anyhow::Result;
use colored::*;
use crossterm::{cursor, execute, terminal};
use std::io::{stdout, Write};

pub const TITLE: &str = "💰 AI Financial Assistant";
pub const INTRO: &str =
	"¡Hazme cualquier pregunta sobre finanzas y te proporcionaré la mejor respuesta!";

// Narrowest width used for alignment when the terminal size is unknown
const FALLBACK_WIDTH: usize = 80;

/// Style one line according to who said it
pub fn style_line(line: &RenderedLine<'_>) -> ColoredString {
	let padded = format!(" {} ", line.text);
	match line.role {
		Role::User => padded.bright_white().on_blue(),
		Role::System => padded.black().on_bright_white(),
	}
}

/// User lines are pushed to the right, answers stay on the left
pub fn indent_for(line: &RenderedLine<'_>, width: usize) -> usize {
	match line.role {
		Role::User => {
			// Two padding spaces plus a one-column margin
			let text_width = line.text.chars().count() + 3;
			width.saturating_sub(text_width).min(width / 5)
		}
		Role::System => 0,
	}
}

pub fn print_header() {
	println!("{}", TITLE.bold().bright_yellow());
	println!("{}", INTRO.dimmed());
	println!();
}

/// Clear the screen and print the whole log under the header
pub fn render_session(log: &SessionLog) -> Result<()> {
	let mut stdout = stdout();
	execute!(
		stdout,
		terminal::Clear(terminal::ClearType::All),
		cursor::MoveTo(0, 0)
	)?;
	print_header();
	print_lines(log.render_all())?;
	Ok(())
}

/// Print only the trailing `count` lines, for terminals that keep scrollback
pub fn render_tail(log: &SessionLog, count: usize) -> Result<()> {
	let skip = log.len().saturating_sub(count);
	print_lines(log.render_all().into_iter().skip(skip).collect())
}

fn print_lines(lines: Vec<RenderedLine<'_>>) -> Result<()> {
	let width = terminal::size()
		.map(|(cols, _)| cols as usize)
		.unwrap_or(FALLBACK_WIDTH);

	for line in &lines {
		println!("{}{}", " ".repeat(indent_for(line, width)), style_line(line));
	}
	println!();
	stdout().flush()?;

	Ok(())
}

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

// Interactive chat: session state, terminal input and display

pub mod animation;
pub mod display;
pub mod formatting;
pub mod input;
pub mod runner;
pub mod session;

pub use runner::{run_interactive_session, RunOptions};
pub use session::{ChatSession, SessionState, SubmitOutcome};

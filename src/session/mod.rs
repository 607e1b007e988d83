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

// Session module for handling interactive question answering sessions

pub mod answer;    // Answer client and normalized results
pub mod chat;      // Chat session logic
pub mod log;       // Append-only conversation log
pub mod providers; // Backend abstraction layer

pub use answer::{AnswerClient, AnswerOutcome, AnswerResult};
pub use chat::{ChatSession, SessionState, SubmitOutcome};
pub use log::{RenderedLine, Role, SessionLog};
pub use providers::{Candidate, QaBackend, QueryRequest, ServiceError};

//! Interactive session state.
//!
//! The answering pipeline is stateless; the question cap and transcript live
//! here, owned by the caller.

use assistant_knowledge::SourceRef;

/// Shown in place of an answer when a turn fails.
pub const TURN_FAILED_MESSAGE: &str = "Sorry, an error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub sources: Vec<SourceRef>,
}

/// Why a question was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRefusal {
    Blank,
    LimitReached { max_turns: u32 },
}

impl std::fmt::Display for TurnRefusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnRefusal::Blank => write!(f, "Please type a question."),
            TurnRefusal::LimitReached { max_turns } => write!(
                f,
                "You have reached the maximum limit of {} questions. Type /reset to start a new session.",
                max_turns
            ),
        }
    }
}

/// Transcript plus answered-question count for one session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    turn_count: u32,
    max_turns: u32,
}

impl ChatSession {
    pub fn new(max_turns: u32) -> Self {
        Self {
            messages: Vec::new(),
            turn_count: 0,
            max_turns,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    pub fn remaining(&self) -> u32 {
        self.max_turns.saturating_sub(self.turn_count)
    }

    pub fn is_exhausted(&self) -> bool {
        self.turn_count >= self.max_turns
    }

    /// Accept a question and record it, or refuse it.
    pub fn try_begin_turn(&mut self, question: &str) -> Result<(), TurnRefusal> {
        if question.trim().is_empty() {
            return Err(TurnRefusal::Blank);
        }
        if self.is_exhausted() {
            return Err(TurnRefusal::LimitReached {
                max_turns: self.max_turns,
            });
        }

        self.messages.push(ChatMessage {
            role: Role::User,
            content: question.to_string(),
            sources: Vec::new(),
        });
        Ok(())
    }

    /// Record an answer. Only answered questions count toward the cap.
    pub fn complete_turn(&mut self, answer: String, sources: Vec<SourceRef>) {
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: answer,
            sources,
        });
        self.turn_count += 1;
    }

    /// Record a failed turn without consuming a question.
    pub fn fail_turn(&mut self) {
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: TURN_FAILED_MESSAGE.to_string(),
            sources: Vec::new(),
        });
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.turn_count = 0;
    }
}

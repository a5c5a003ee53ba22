//! Human review of a candidate message.
//!
//! `Presenting -> {Accepted, Editing, Cancelled}` and
//! `Editing -> {Presenting, Accepted, Cancelled}`, where the edit exit depends
//! on [`EditPolicy`]. Only the terminal and the editor are touched here.

use tracing::{info, warn};

use crate::domain::message::{CandidateMessage, FinalMessage};
use crate::error::AppResult;
use crate::services::{MessageEditor, ReviewTerminal};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditPolicy {
    /// Show the edited text again for another accept/edit/cancel round.
    #[default]
    Represent,
    /// Treat the saved edit as accepted.
    CommitImmediately,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Accept,
    Edit,
    Cancel,
}

impl ReviewDecision {
    /// First character of the answer, case-insensitive.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().chars().next()?.to_ascii_lowercase() {
            'a' => Some(ReviewDecision::Accept),
            'e' => Some(ReviewDecision::Edit),
            'c' => Some(ReviewDecision::Cancel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    Accepted(FinalMessage),
    Cancelled,
}

#[derive(Debug)]
enum ReviewState {
    Presenting(String),
    Editing(String),
    Accepted(String),
    Cancelled,
}

pub struct ReviewController<'a> {
    terminal: &'a dyn ReviewTerminal,
    editor: &'a dyn MessageEditor,
    policy: EditPolicy,
}

impl<'a> ReviewController<'a> {
    pub fn new(
        terminal: &'a dyn ReviewTerminal,
        editor: &'a dyn MessageEditor,
        policy: EditPolicy,
    ) -> Self {
        Self {
            terminal,
            editor,
            policy,
        }
    }

    pub fn review(&self, candidate: CandidateMessage) -> AppResult<ReviewOutcome> {
        let mut state = ReviewState::Presenting(candidate.as_str().to_string());
        loop {
            state = match state {
                ReviewState::Presenting(text) => self.present(text)?,
                ReviewState::Editing(text) => self.edit(&text)?,
                ReviewState::Accepted(text) => {
                    return Ok(match FinalMessage::new(&text) {
                        Some(message) => ReviewOutcome::Accepted(message),
                        None => ReviewOutcome::Cancelled,
                    });
                }
                ReviewState::Cancelled => return Ok(ReviewOutcome::Cancelled),
            };
        }
    }

    fn present(&self, text: String) -> AppResult<ReviewState> {
        self.terminal.present(&text)?;
        loop {
            let Some(answer) = self.terminal.read_decision()? else {
                warn!("Input closed before a decision was made");
                return Ok(ReviewState::Cancelled);
            };
            match ReviewDecision::parse(&answer) {
                Some(ReviewDecision::Accept) => return Ok(ReviewState::Accepted(text)),
                Some(ReviewDecision::Edit) => return Ok(ReviewState::Editing(text)),
                Some(ReviewDecision::Cancel) => return Ok(ReviewState::Cancelled),
                None => warn!("Unrecognized choice '{}'", answer.trim()),
            }
        }
    }

    fn edit(&self, text: &str) -> AppResult<ReviewState> {
        info!("Opening editor for the commit message...");
        let edited = self.editor.edit(text)?;
        if edited.trim().is_empty() {
            info!("Edited message is empty");
            return Ok(ReviewState::Cancelled);
        }
        Ok(match self.policy {
            EditPolicy::Represent => ReviewState::Presenting(edited.trim().to_string()),
            EditPolicy::CommitImmediately => ReviewState::Accepted(edited),
        })
    }
}

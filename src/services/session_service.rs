//! Quiz attempt state machine.
//!
//! A session moves `Setup -> Taking -> Results` and back to `Setup` on retake.
//! Every change goes through [`transition`], a pure `(state, event) -> state`
//! function; events that do not apply to the current state leave it untouched.

use crate::models::answer::UserAnswer;
use crate::models::question::QuizQuestion;
use crate::models::quiz_config::QuizConfig;
use crate::services::scoring_service::{score_attempt, ScoreReport};
use crate::utils::time::{Clock, Countdown};
use serde::Serialize;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Setup,
    Taking,
    Results,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Generation succeeded; begin the attempt.
    Start {
        config: QuizConfig,
        questions: Vec<QuizQuestion>,
    },
    /// One wall-clock second elapsed.
    Tick,
    /// Pick an option for the current question.
    Select { option_index: usize },
    /// Move past the current (answered) question.
    Advance,
    /// Discard the finished attempt.
    Retake,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuizSession {
    status: SessionStatus,
    config: Option<QuizConfig>,
    questions: Vec<QuizQuestion>,
    answers: Vec<UserAnswer>,
    remaining_seconds: u32,
    current_index: usize,
    answered_current: bool,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn config(&self) -> Option<&QuizConfig> {
        self.config.as_ref()
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.status {
            SessionStatus::Taking => self.questions.get(self.current_index),
            _ => None,
        }
    }

    pub fn has_answered_current(&self) -> bool {
        self.answered_current
    }

    /// Option picked for the current question, once one has been picked.
    pub fn current_selection(&self) -> Option<usize> {
        if !self.answered_current {
            return None;
        }
        self.answers
            .iter()
            .rev()
            .find(|a| a.question_index == self.current_index)
            .map(|a| a.selected_option_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    /// Score report for a finished attempt.
    pub fn report(&self) -> Option<ScoreReport> {
        match self.status {
            SessionStatus::Results => Some(score_attempt(&self.questions, &self.answers)),
            _ => None,
        }
    }

    fn finish(mut self) -> Self {
        self.status = SessionStatus::Results;
        self.answered_current = false;
        self
    }
}

pub fn transition(session: QuizSession, event: SessionEvent) -> QuizSession {
    match (session.status, event) {
        (SessionStatus::Setup, SessionEvent::Start { config, questions }) => {
            if questions.is_empty() {
                tracing::debug!("Ignoring start without questions");
                return session;
            }
            if let Err(e) = config.validate() {
                tracing::debug!(error = %e, "Ignoring start with invalid config");
                return session;
            }
            QuizSession {
                status: SessionStatus::Taking,
                remaining_seconds: config.total_seconds(),
                config: Some(config),
                questions,
                answers: Vec::new(),
                current_index: 0,
                answered_current: false,
            }
        }

        (SessionStatus::Taking, SessionEvent::Tick) => {
            let mut next = session;
            next.remaining_seconds = next.remaining_seconds.saturating_sub(1);
            if next.remaining_seconds == 0 {
                tracing::debug!(answered = next.answers.len(), "Timer expired");
                return next.finish();
            }
            next
        }

        (SessionStatus::Taking, SessionEvent::Select { option_index }) => {
            if session.answered_current {
                return session;
            }
            let in_range = session
                .questions
                .get(session.current_index)
                .map_or(false, |q| option_index < q.options.len());
            if !in_range {
                return session;
            }
            let mut next = session;
            next.answers.push(UserAnswer {
                question_index: next.current_index,
                selected_option_index: option_index,
            });
            next.answered_current = true;
            next
        }

        (SessionStatus::Taking, SessionEvent::Advance) => {
            if !session.answered_current {
                return session;
            }
            if session.is_last_question() {
                return session.finish();
            }
            let mut next = session;
            next.current_index += 1;
            next.answered_current = false;
            next
        }

        (SessionStatus::Results, SessionEvent::Retake) => QuizSession::default(),

        (status, event) => {
            tracing::debug!(?status, ?event, "Ignoring event for current state");
            session
        }
    }
}

/// Applies one `Tick` per whole second the clock moved since the last sync.
pub fn sync_with_clock(
    mut session: QuizSession,
    countdown: &mut Countdown,
    clock: &dyn Clock,
) -> QuizSession {
    for _ in 0..countdown.elapsed_ticks(clock) {
        if session.status != SessionStatus::Taking {
            break;
        }
        session = transition(session, SessionEvent::Tick);
    }
    session
}

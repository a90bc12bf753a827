use super::error::{ErrorKind, ExchangeError};
use super::exchange::Exchange;
use super::models::{EntryKind, Transcript, TranscriptEntry, Turn};

pub const SUBMIT_LABEL: &str = "Send";
pub const BUSY_LABEL: &str = "Generating response...";
pub const LOADING_TEXT: &str = "Generating response...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetState {
    Idle,
    /// A question is in flight and `placeholder` is the position of
    /// its loading entry in the transcript.
    AwaitingResponse { placeholder: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, or a question was already in flight
    Ignored,
    Answered,
    Failed(ErrorKind),
}

/// Everything the chat page shows, independent of how it is drawn.
/// The submit control is enabled exactly when the widget is `Idle`.
#[derive(Debug)]
pub struct ChatWidget {
    transcript: Transcript,
    banner_visible: bool,
    input: String,
    input_focused: bool,
    state: WidgetState,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWidget {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            banner_visible: true,
            input: String::new(),
            input_focused: true,
            state: WidgetState::Idle,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_visible
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn submit_enabled(&self) -> bool {
        self.state == WidgetState::Idle
    }

    pub fn submit_label(&self) -> &'static str {
        match self.state {
            WidgetState::Idle => SUBMIT_LABEL,
            WidgetState::AwaitingResponse { .. } => BUSY_LABEL,
        }
    }

    /// Submit whatever is in the input control.
    pub async fn submit_input<E: Exchange + ?Sized>(&mut self, exchange: &E) -> SubmitOutcome {
        let text = self.input.clone();
        self.submit_question(exchange, &text).await
    }

    /// Ask `exchange` a question and record the round in the
    /// transcript. Blank text is ignored. On completion exactly one
    /// answer or error entry replaces the loading placeholder, even if
    /// this future is dropped before the exchange finishes.
    pub async fn submit_question<E: Exchange + ?Sized>(
        &mut self,
        exchange: &E,
        text: &str,
    ) -> SubmitOutcome {
        let question = text.trim();
        if question.is_empty() || !self.submit_enabled() {
            return SubmitOutcome::Ignored;
        }

        self.banner_visible = false;
        self.transcript
            .push(TranscriptEntry::new(Turn::user(question), EntryKind::Question));
        self.input.clear();

        let placeholder = self
            .transcript
            .push(TranscriptEntry::new(Turn::model(LOADING_TEXT), EntryKind::Loading));
        self.state = WidgetState::AwaitingResponse { placeholder };

        let pending = PendingReply::new(self);
        let result = exchange.ask(question).await;
        pending.settle(result)
    }

    /// Start a new conversation. No network call is made.
    pub fn reset_conversation(&mut self) {
        self.transcript.clear();
        self.banner_visible = true;
        self.input_focused = true;
    }

    fn finish_round(&mut self, result: Result<String, ExchangeError>) -> SubmitOutcome {
        if let WidgetState::AwaitingResponse { placeholder } = self.state
            && self.transcript.remove_placeholder(placeholder).is_none()
        {
            tracing::warn!("Loading placeholder at {} was already gone", placeholder);
        }

        let outcome = match result {
            Ok(answer) => {
                self.transcript
                    .push(TranscriptEntry::new(Turn::model(&answer), EntryKind::Answer));
                SubmitOutcome::Answered
            }
            Err(e) => {
                tracing::debug!("Showing error for failed exchange: {}", e);
                self.transcript.push(TranscriptEntry::new(
                    Turn::model(&e.user_message()),
                    EntryKind::Error,
                ));
                SubmitOutcome::Failed(e.kind())
            }
        };

        self.state = WidgetState::Idle;
        self.input_focused = true;
        outcome
    }
}

/// Holds the widget while a question is in flight. Settling it
/// records the result; dropping it unsettled (the submit future was
/// cancelled or the exchange panicked) records a cancellation so the
/// widget never stays stuck in `AwaitingResponse`.
struct PendingReply<'a> {
    widget: Option<&'a mut ChatWidget>,
}

impl<'a> PendingReply<'a> {
    fn new(widget: &'a mut ChatWidget) -> Self {
        Self {
            widget: Some(widget),
        }
    }

    fn settle(mut self, result: Result<String, ExchangeError>) -> SubmitOutcome {
        match self.widget.take() {
            Some(widget) => widget.finish_round(result),
            None => SubmitOutcome::Ignored,
        }
    }
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        if let Some(widget) = self.widget.take() {
            widget.finish_round(Err(ExchangeError::Cancelled));
        }
    }
}

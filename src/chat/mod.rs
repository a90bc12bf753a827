//! The chat client: a host independent widget state machine and the
//! network exchange it uses to reach the relay proxy.

pub mod error;
pub mod exchange;
pub mod models;
pub mod prompt;
pub mod render;
pub mod widget;

pub use error::{ErrorKind, ExchangeError};
pub use exchange::{DEFAULT_DEADLINE, Exchange, ProxyClient, ProxyClientBuilder};
pub use models::{EntryKind, Transcript, TranscriptEntry, Turn};
pub use widget::{ChatWidget, SubmitOutcome, WidgetState};

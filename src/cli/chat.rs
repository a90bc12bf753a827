use std::env;
use std::time::Duration;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::chat::widget::LOADING_TEXT;
use crate::chat::{ChatWidget, EntryKind, ProxyClientBuilder, SubmitOutcome};

const WELCOME: &str = "Ask a question. Type /new to start over or /quit to exit.";

/// Adds the question to the line editor history. Returns false when
/// it was skipped as a repeat or the history could not be updated.
fn remember(rl: &mut DefaultEditor, question: &str) -> bool {
    match rl.add_history_entry(question) {
        Ok(added) => added,
        Err(e) => {
            tracing::debug!("Failed to add history entry: {}", e);
            false
        }
    }
}

pub async fn run(proxy_url: &str, timeout_secs: u64) -> Result<()> {
    // Diagnostics go to stderr so they don't mix with answers
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=warn", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut rl = DefaultEditor::new()?;

    let mut builder =
        ProxyClientBuilder::new(proxy_url).deadline(Duration::from_secs(timeout_secs));
    if let Ok(instructions) = env::var("RELAYCHAT_SYSTEM_PROMPT") {
        builder = builder.instructions(&instructions);
    }
    let client = builder.build();

    let mut widget = ChatWidget::new();

    loop {
        if widget.banner_visible() && widget.transcript().is_empty() {
            println!("{}", WELCOME);
        }

        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => match line.trim() {
                "/quit" => break,
                "/new" => widget.reset_conversation(),
                question => {
                    if question.is_empty() {
                        continue;
                    }
                    remember(&mut rl, question);
                    println!("{}", LOADING_TEXT);

                    let outcome = widget.submit_question(&client, question).await;
                    if outcome == SubmitOutcome::Ignored {
                        continue;
                    }
                    if let Some(entry) = widget.transcript().last() {
                        match entry.kind {
                            EntryKind::Error => eprintln!("{}", entry.turn.text),
                            _ => println!("{}", entry.turn.text),
                        }
                    }
                }
            },
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

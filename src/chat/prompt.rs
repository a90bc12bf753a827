//! Prompt templates using Handlebars. Strict mode catches a missing
//! variable at render time instead of silently sending a blank.
//! Escaping is turned off because the output goes to the model as
//! plain text, not into HTML.

use std::fmt;

use anyhow::Result;
use handlebars::Handlebars;
use serde_json::json;

pub const DEFAULT_INSTRUCTIONS: &str = r"You are a helpful assistant. Answer the question below clearly and concisely. Use **bold** for key terms and answer in the same language the question was asked in.";

#[derive(Debug)]
pub enum Prompt {
    Question,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const QUESTION_PROMPT: &str = r#"{{instructions}}

---

"{{question}}""#;

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(&Prompt::Question.to_string(), QUESTION_PROMPT)
        .expect("Failed to register template");
    registry
}

/// Combine the fixed instructions with the user's raw question into
/// the single text part sent upstream.
pub fn question_prompt(templates: &Handlebars, instructions: &str, question: &str) -> Result<String> {
    let rendered = templates.render(
        &Prompt::Question.to_string(),
        &json!({
            "instructions": instructions,
            "question": question,
        }),
    )?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prompt_appends_question() {
        let prompt = question_prompt(&templates(), "Be brief.", "What is a lifetime?").unwrap();
        assert_eq!(prompt, "Be brief.\n\n---\n\n\"What is a lifetime?\"");
    }

    #[test]
    fn test_question_prompt_does_not_escape() {
        let prompt = question_prompt(&templates(), DEFAULT_INSTRUCTIONS, "is 1 < 2 & 'yes'?").unwrap();
        assert!(prompt.ends_with("\"is 1 < 2 & 'yes'?\""));
        assert!(prompt.starts_with(DEFAULT_INSTRUCTIONS));
    }
}

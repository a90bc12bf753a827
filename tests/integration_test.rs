mod test_utils;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use relaychat::chat::{
        ChatWidget, EntryKind, ErrorKind, ProxyClientBuilder, SubmitOutcome,
    };

    use crate::test_utils::{UPSTREAM_PATH, spawn_app, spawn_stalled_server, test_app};

    #[tokio::test]
    async fn it_answers_a_question_through_the_relay() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", UPSTREAM_PATH)
            .match_body(mockito::Matcher::Regex(r"How do I build it\?".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"Run **cargo** to build.\nSee `cargo build`."}]}}]}"#,
            )
            .create();

        let addr = spawn_app(test_app(&server.url())).await;
        let client = ProxyClientBuilder::new(&format!("http://{}/proxy", addr))
            .instructions("Answer briefly.")
            .build();
        let mut widget = ChatWidget::new();

        let outcome = widget.submit_question(&client, "How do I build it?").await;

        mock.assert();
        assert_eq!(outcome, SubmitOutcome::Answered);
        assert_eq!(widget.transcript().len(), 2);
        let answer = widget.transcript().last().unwrap();
        assert_eq!(answer.kind, EntryKind::Answer);
        assert_eq!(
            answer.html,
            "Run <strong>cargo</strong> to build.<br>See <code>cargo build</code>."
        );
        assert!(widget.submit_enabled());
    }

    #[tokio::test]
    async fn it_shows_a_friendly_error_for_upstream_rejection() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", UPSTREAM_PATH)
            .with_status(400)
            .with_body(r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#)
            .create();

        let addr = spawn_app(test_app(&server.url())).await;
        let client = ProxyClientBuilder::new(&format!("http://{}/proxy", addr)).build();
        let mut widget = ChatWidget::new();

        let outcome = widget.submit_question(&client, "Hello").await;

        assert_eq!(outcome, SubmitOutcome::Failed(ErrorKind::ClientError));
        let last = widget.transcript().last().unwrap();
        assert_eq!(last.kind, EntryKind::Error);
        assert!(last.turn.text.contains("check your question"));
        assert!(!last.turn.text.contains("API key"));
    }

    #[tokio::test]
    async fn it_shows_empty_output_error_for_blocked_prompt() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", UPSTREAM_PATH)
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create();

        let addr = spawn_app(test_app(&server.url())).await;
        let client = ProxyClientBuilder::new(&format!("http://{}/proxy", addr)).build();
        let mut widget = ChatWidget::new();

        let outcome = widget.submit_question(&client, "Hello").await;

        assert_eq!(outcome, SubmitOutcome::Failed(ErrorKind::EmptyOutput));
        assert_eq!(widget.transcript().len(), 2);
    }

    #[tokio::test]
    async fn it_times_out_when_the_relay_stalls() {
        let addr = spawn_stalled_server().await;
        let client = ProxyClientBuilder::new(&format!("http://{}/proxy", addr))
            .deadline(Duration::from_millis(300))
            .build();
        let mut widget = ChatWidget::new();

        let outcome = tokio::time::timeout(
            Duration::from_secs(10),
            widget.submit_question(&client, "A very long question"),
        )
        .await
        .expect("Exchange should give up before the test does");

        assert_eq!(outcome, SubmitOutcome::Failed(ErrorKind::Timeout));
        let last = widget.transcript().last().unwrap();
        assert!(last.turn.text.contains("took too long"));
        assert!(
            widget
                .transcript()
                .iter()
                .all(|entry| entry.kind != EntryKind::Loading)
        );
    }

    #[tokio::test]
    async fn it_resets_after_a_conversation() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", UPSTREAM_PATH)
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Hi"}]}}]}"#)
            .expect(2)
            .create();

        let addr = spawn_app(test_app(&server.url())).await;
        let client = ProxyClientBuilder::new(&format!("http://{}/proxy", addr)).build();
        let mut widget = ChatWidget::new();

        widget.submit_question(&client, "One").await;
        widget.submit_question(&client, "Two").await;
        assert_eq!(widget.transcript().len(), 4);

        widget.reset_conversation();
        assert!(widget.transcript().is_empty());
        assert!(widget.banner_visible());
    }
}

// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Courier pipeline.
//!
//! Each test creates an isolated TestHarness with temp SQLite and mock
//! adapters. Tests are independent and order-insensitive.

use courier_bot::filter::FilterReason;
use courier_bot::DispatchOutcome;
use courier_core::{ChatRole, InboundEvent};
use courier_storage::queries::{messages, users};
use courier_test_utils::TestHarness;
use tokio_util::sync::CancellationToken;

// ---- Message-to-reply pipeline ----

#[tokio::test]
async fn fresh_conversation_relays_and_persists_both_turns() {
    let harness = TestHarness::builder()
        .with_gateway_responses(vec!["Hello! Nice to meet you.".to_string()])
        .build()
        .await
        .unwrap();

    let outcome = harness.deliver("+1555", "hello").await;
    assert_eq!(outcome, DispatchOutcome::Replied);

    // One reply, carrying the gateway's text.
    let sent = harness.channel.sent_replies().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "+1555");
    assert_eq!(sent[0].content, "Hello! Nice to meet you.");

    // One gateway call with a 2-turn array: system + current.
    let requests = harness.gateway.requests().await;
    assert_eq!(requests.len(), 1);
    let turns = &requests[0].turns;
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, ChatRole::System);
    assert_eq!(turns[1].role, ChatRole::User);
    assert_eq!(turns[1].content, "hello");

    // Both turns stored, same session correlation id.
    let stored = messages::recent_for_handle(&harness.db, "+1555", 10)
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
    let assistant = &stored[0];
    let user_turn = &stored[1];
    assert_eq!(user_turn.role, ChatRole::User);
    assert_eq!(user_turn.content, "hello");
    assert_eq!(assistant.role, ChatRole::Assistant);
    assert_eq!(assistant.content, "Hello! Nice to meet you.");
    assert!(user_turn.session_id.is_some());
    assert_eq!(assistant.session_id, user_turn.session_id);
    assert_eq!(
        assistant.metadata.as_deref(),
        Some(r#"{"from_self":true}"#)
    );

    // The user row exists and counts the inbound message.
    let user = users::find_by_handle(&harness.db, "+1555")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.message_count, 1);
}

#[tokio::test]
async fn conversation_context_feeds_subsequent_requests() {
    let harness = TestHarness::builder()
        .with_gateway_responses(vec![
            "reply one".to_string(),
            "reply two".to_string(),
            "reply three".to_string(),
        ])
        .build()
        .await
        .unwrap();

    harness.deliver("+1555", "first").await;
    harness.deliver("+1555", "second").await;
    harness.deliver("+1555", "third").await;

    let requests = harness.gateway.requests().await;
    assert_eq!(requests.len(), 3);

    // Third request: system + (first, reply one, second, reply two) + third.
    let turns = &requests[2].turns;
    assert_eq!(turns.len(), 6);
    assert_eq!(turns[0].role, ChatRole::System);
    assert_eq!(turns[1].content, "first");
    assert_eq!(turns[2].content, "reply one");
    assert_eq!(turns[3].content, "second");
    assert_eq!(turns[4].content, "reply two");
    assert_eq!(turns[5].content, "third");
}

#[tokio::test]
async fn context_window_is_capped_at_the_history_limit() {
    let harness = TestHarness::builder().with_history_limit(5).build().await.unwrap();

    // Four full exchanges leave eight rows; the next request may carry
    // only the most recent five as history.
    for i in 0..4 {
        harness.deliver("+1555", &format!("question {i}")).await;
    }
    harness.deliver("+1555", "latest").await;

    let requests = harness.gateway.requests().await;
    let turns = &requests[4].turns;
    // system + 5 history + current
    assert_eq!(turns.len(), 7);
    // Oldest surviving history turn is the reply to "question 1"; earlier
    // turns fell out of the window.
    assert_eq!(turns[1].content, "mock completion");
    assert_eq!(turns[2].content, "question 2");
    assert_eq!(turns[3].content, "mock completion");
    assert_eq!(turns[4].content, "question 3");
    assert_eq!(turns[5].content, "mock completion");
    assert_eq!(turns[6].content, "latest");
}

// ---- Quota enforcement ----

#[tokio::test]
async fn quota_ceiling_denies_with_wait_time_and_skips_persistence() {
    let harness = TestHarness::builder().with_daily_limit(2).build().await.unwrap();

    assert_eq!(harness.deliver("+1555", "one").await, DispatchOutcome::Replied);
    assert_eq!(harness.deliver("+1555", "two").await, DispatchOutcome::Replied);
    assert_eq!(
        harness.deliver("+1555", "three").await,
        DispatchOutcome::QuotaDenied
    );

    let sent = harness.channel.sent_replies().await;
    assert_eq!(sent.len(), 3);
    assert!(sent[2].content.contains("Daily message limit reached"));
    assert!(sent[2].content.contains("hours"));

    // The denied turn was not persisted and never reached the gateway.
    assert_eq!(
        messages::count_for_handle(&harness.db, "+1555").await.unwrap(),
        4
    );
    assert_eq!(harness.gateway.request_count().await, 2);
}

#[tokio::test]
async fn quota_is_per_user() {
    let harness = TestHarness::builder().with_daily_limit(1).build().await.unwrap();

    assert_eq!(harness.deliver("+1555", "hi").await, DispatchOutcome::Replied);
    assert_eq!(
        harness.deliver("+1555", "again").await,
        DispatchOutcome::QuotaDenied
    );
    // A different user still has a full window.
    assert_eq!(harness.deliver("+1666", "hi").await, DispatchOutcome::Replied);
}

// ---- Gateway failure handling ----

#[tokio::test]
async fn gateway_failure_apologizes_and_keeps_only_the_user_turn() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.gateway.push_failure("connection reset").await;

    let outcome = harness.deliver("+1555", "hello").await;
    assert_eq!(outcome, DispatchOutcome::GatewayFailed);

    let sent = harness.channel.sent_replies().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].content.contains("Sorry, I encountered an error"));

    let stored = messages::recent_for_handle(&harness.db, "+1555", 10)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].role, ChatRole::User);
    assert_eq!(stored[0].content, "hello");
}

#[tokio::test]
async fn gateway_rate_limit_exhausts_the_user_until_reset() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.gateway.push_rate_limited(Some(7200)).await;

    let outcome = harness.deliver("+1555", "hello").await;
    assert_eq!(outcome, DispatchOutcome::RateLimited);

    let sent = harness.channel.sent_replies().await;
    assert!(sent[0].content.contains("API rate limit reached"));
    assert!(sent[0].content.contains("2 hours"));

    // All subsequent attempts are denied locally; the gateway saw one call.
    for _ in 0..3 {
        assert_eq!(
            harness.deliver("+1555", "retry").await,
            DispatchOutcome::QuotaDenied
        );
    }
    assert_eq!(harness.gateway.request_count().await, 1);

    // Other users are unaffected.
    assert_eq!(harness.deliver("+1666", "hi").await, DispatchOutcome::Replied);
}

// ---- Filtering ----

#[tokio::test]
async fn filtered_events_produce_no_writes_and_no_replies() {
    let harness = TestHarness::builder().build().await.unwrap();

    let cases = [
        (
            InboundEvent {
                id: "e1".into(),
                sender: "+1555".into(),
                body: "from myself".into(),
                from_self: true,
                has_media: false,
                metadata: None,
            },
            FilterReason::OwnMessage,
        ),
        (
            InboundEvent {
                id: "e2".into(),
                sender: "status@broadcast".into(),
                body: "broadcast".into(),
                from_self: false,
                has_media: false,
                metadata: None,
            },
            FilterReason::Broadcast,
        ),
        (
            InboundEvent {
                id: "e3".into(),
                sender: "12036304@g.us".into(),
                body: "group chatter".into(),
                from_self: false,
                has_media: false,
                metadata: None,
            },
            FilterReason::Group,
        ),
        (
            InboundEvent {
                id: "e4".into(),
                sender: "+1555".into(),
                body: String::new(),
                from_self: false,
                has_media: false,
                metadata: None,
            },
            FilterReason::EmptyOrMedia,
        ),
        (
            InboundEvent {
                id: "e5".into(),
                sender: "+1555".into(),
                body: "photo caption".into(),
                from_self: false,
                has_media: true,
                metadata: None,
            },
            FilterReason::EmptyOrMedia,
        ),
    ];

    for (event, expected) in cases {
        let outcome = harness.deliver_event(event).await;
        assert_eq!(outcome, DispatchOutcome::Filtered(expected));
    }

    assert_eq!(harness.channel.sent_count().await, 0);
    assert_eq!(harness.gateway.request_count().await, 0);
    assert_eq!(
        messages::count_for_handle(&harness.db, "+1555").await.unwrap(),
        0
    );
    assert!(
        users::find_by_handle(&harness.db, "+1555")
            .await
            .unwrap()
            .is_none()
    );
}

// ---- Receive loop ----

#[tokio::test]
async fn run_loop_processes_injected_events_until_cancelled() {
    let harness = TestHarness::builder()
        .with_gateway_responses(vec!["looped reply".to_string()])
        .build()
        .await
        .unwrap();

    harness
        .channel
        .inject_event(InboundEvent {
            id: "evt-loop".into(),
            sender: "+1555".into(),
            body: "hello loop".into(),
            from_self: false,
            has_media: false,
            metadata: None,
        })
        .await;

    let cancel = CancellationToken::new();
    let waiter = async {
        for _ in 0..200 {
            if harness.channel.sent_count().await > 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        cancel.cancel();
    };

    let (run_result, ()) = tokio::join!(harness.dispatcher.run(cancel.clone()), waiter);
    run_result.unwrap();

    let sent = harness.channel.sent_replies().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].content, "looped reply");
}

// ---- Cumulative user accounting ----

#[tokio::test]
async fn message_count_tracks_admitted_inbound_messages() {
    let harness = TestHarness::builder().build().await.unwrap();

    harness.deliver("+1555", "one").await;
    harness.deliver("+1555", "two").await;
    harness.deliver("+1555", "three").await;

    let user = users::find_by_handle(&harness.db, "+1555")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.message_count, 3);
}

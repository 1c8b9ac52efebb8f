//! Listing, pagination, moderation and fetch-join tests against the
//! in-memory store.

use crate::in_memory::helpers::{
    Harness, TestResult, harness, message_at, runtime, texts, uid,
};
use chat_store::chat::{
    domain::{ConversationId, FileId, MessageId, MessageType, SessionId, UserId, UserPartition},
    services::{MessagePage, MessageScope},
};
use chat_store::store::ports::DocumentStore;
use rstest::rstest;
use serde_json::{Value, json};
use std::io;
use tokio::runtime::Runtime;

async fn seed_timeline(harness: &Harness, uid: &UserId, count: i64) -> TestResult {
    for n in 0..count {
        harness.add(uid, &message_at(&format!("m{n}"), n)).await?;
    }
    Ok(())
}

#[rstest]
#[case::first_page(MessagePage::new(2, 0), vec!["m4", "m3"])]
#[case::second_page(MessagePage::new(2, 2), vec!["m2", "m1"])]
#[case::short_last_page(MessagePage::new(2, 4), vec!["m0"])]
#[case::offset_past_end(MessagePage::new(20, 10), vec![])]
#[case::zero_limit(MessagePage::new(0, 0), vec![])]
fn pages_are_newest_first(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
    #[case] page: MessagePage,
    #[case] expected: Vec<&str>,
) -> TestResult {
    let rt = runtime?;
    rt.block_on(seed_timeline(&harness, &uid, 5))?;

    let listed = rt.block_on(harness.chat.messages().get_messages(
        &uid,
        &MessageScope::unscoped(),
        page,
        false,
    ))?;

    assert_eq!(texts(&listed), expected);
    Ok(())
}

#[rstest]
fn messages_of_unrecognised_type_are_listed(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    let voice_id = MessageId::new();
    let Value::Object(voice) = json!({
        "id": voice_id.to_string(),
        "text": "voice memo",
        "created_at": "2024-06-01T12:05:00.000000Z",
        "sender": "human",
        "type": "voice_note",
    }) else {
        return Err("message body should be an object".into());
    };
    rt.block_on(async {
        harness.add(&uid, &message_at("typed", 0)).await?;
        harness
            .store
            .set(&UserPartition::new(&uid).messages().doc("voice"), voice)
            .await?;
        TestResult::Ok(())
    })?;

    let listed = rt.block_on(harness.chat.messages().get_messages(
        &uid,
        &MessageScope::unscoped(),
        MessagePage::default(),
        false,
    ))?;
    let found = rt.block_on(harness.chat.messages().get_message(&uid, voice_id))?;

    assert_eq!(texts(&listed), vec!["voice memo", "typed"]);
    let (message, doc_id) = found.ok_or("voice message should be found")?;
    assert_eq!(
        message.message_type(),
        &MessageType::Other("voice_note".to_owned())
    );
    assert_eq!(doc_id.as_str(), "voice");
    Ok(())
}

#[rstest]
fn absent_app_scope_only_matches_unscoped_messages(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    rt.block_on(async {
        harness.add(&uid, &message_at("plain", 0)).await?;
        harness
            .add(&uid, &message_at("weather", 1).with_app_id("weather"))
            .await?;
        TestResult::Ok(())
    })?;

    let unscoped = rt.block_on(harness.chat.messages().get_messages(
        &uid,
        &MessageScope::unscoped(),
        MessagePage::default(),
        false,
    ))?;
    let app = rt.block_on(harness.chat.messages().get_app_messages(
        &uid,
        "weather",
        MessagePage::default(),
        false,
    ))?;

    assert_eq!(texts(&unscoped), vec!["plain"]);
    assert_eq!(texts(&app), vec!["weather"]);
    Ok(())
}

#[rstest]
fn session_scope_narrows_listing(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    rt.block_on(async {
        for (text, session, at) in [("a", "s1", 0), ("b", "s2", 1), ("c", "s1", 2)] {
            let message = message_at(text, at)
                .with_app_id("p1")
                .with_chat_session(SessionId::new(session));
            harness.add(&uid, &message).await?;
        }
        TestResult::Ok(())
    })?;

    let s1 = rt.block_on(harness.chat.messages().get_messages(
        &uid,
        &MessageScope::app("p1").with_session(SessionId::new("s1")),
        MessagePage::default(),
        false,
    ))?;
    let unknown = rt.block_on(harness.chat.messages().get_messages(
        &uid,
        &MessageScope::app("p1").with_session(SessionId::new("nope")),
        MessagePage::default(),
        false,
    ))?;

    assert_eq!(texts(&s1), vec!["c", "a"]);
    assert!(unknown.is_empty());
    Ok(())
}

#[rstest]
fn reported_messages_are_hidden_but_still_addressable(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    let spam = message_at("spam", 1);
    let doc_id = rt.block_on(async {
        harness.add(&uid, &message_at("first", 0)).await?;
        let doc_id = harness.add(&uid, &spam).await?;
        harness.add(&uid, &message_at("last", 2)).await?;
        TestResult::Ok(doc_id)
    })?;

    let outcome = rt.block_on(harness.chat.messages().report_message(&uid, &doc_id));
    assert!(outcome.is_reported());

    let listed = rt.block_on(harness.chat.messages().get_messages(
        &uid,
        &MessageScope::unscoped(),
        MessagePage::new(3, 0),
        false,
    ))?;
    assert_eq!(texts(&listed), vec!["last", "first"]);

    let found = rt.block_on(harness.chat.messages().get_message(&uid, spam.id()))?;
    let (message, found_doc) = found.ok_or("reported message should still be found")?;
    assert!(message.is_reported());
    assert_eq!(found_doc, doc_id);
    Ok(())
}

#[rstest]
fn reporting_unknown_document_fails_softly(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;

    let outcome = rt.block_on(
        harness
            .chat
            .messages()
            .report_message(&uid, &chat_store::chat::domain::StorageDocId::new("ghost")),
    );

    assert!(!outcome.is_reported());
    assert!(outcome.message().starts_with("Update failed"));
    Ok(())
}

#[rstest]
fn conversations_resolve_in_reference_order(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    rt.block_on(async {
        harness.put_conversation(&uid, "c1", "Groceries").await?;
        harness.put_conversation(&uid, "c2", "Holiday").await?;
        let message = message_at("recap", 0).with_memories([
            ConversationId::new("c2"),
            ConversationId::new("c9"),
            ConversationId::new("c1"),
        ]);
        harness.add(&uid, &message).await?;
        TestResult::Ok(())
    })?;

    let listed = rt.block_on(harness.chat.messages().get_messages(
        &uid,
        &MessageScope::unscoped(),
        MessagePage::default(),
        true,
    ))?;

    let memories = listed
        .first()
        .and_then(|resolved| resolved.memories.as_ref())
        .ok_or("memories should be resolved")?;
    let ids: Vec<&str> = memories.iter().map(|c| c.id().as_str()).collect();
    assert_eq!(ids, vec!["c2", "c1"]);
    Ok(())
}

#[rstest]
fn deleted_conversation_leaves_empty_memories_on_every_referrer(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    let listed = rt.block_on(async {
        harness.put_conversation(&uid, "c1", "Gone soon").await?;
        for (text, at) in [("about c1", 0), ("also about c1", 1)] {
            harness
                .add(&uid, &message_at(text, at).with_memories([ConversationId::new("c1")]))
                .await?;
        }
        harness
            .store
            .delete(
                &chat_store::chat::domain::UserPartition::new(&uid)
                    .conversations()
                    .doc("c1"),
            )
            .await?;
        let listed = harness
            .chat
            .messages()
            .get_messages(&uid, &MessageScope::unscoped(), MessagePage::default(), true)
            .await?;
        TestResult::Ok(listed)
    })?;

    assert_eq!(texts(&listed), vec!["also about c1", "about c1"]);
    assert!(
        listed
            .iter()
            .all(|resolved| resolved.memories.as_deref().map(<[_]>::len) == Some(0))
    );
    Ok(())
}

#[rstest]
fn app_listing_resolves_conversations_but_not_files(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    rt.block_on(async {
        harness.put_conversation(&uid, "c1", "Context").await?;
        let message = message_at("reply", 0)
            .with_app_id("p1")
            .with_memories([ConversationId::new("c1")])
            .with_files([FileId::new("f1")]);
        harness.add(&uid, &message).await?;
        TestResult::Ok(())
    })?;

    let listed = rt.block_on(harness.chat.messages().get_app_messages(
        &uid,
        "p1",
        MessagePage::default(),
        true,
    ))?;

    let only = listed.first().ok_or("message should be listed")?;
    assert_eq!(only.memories.as_ref().map(Vec::len), Some(1));
    assert!(only.files.is_none());
    Ok(())
}

#[rstest]
fn partitions_do_not_leak_between_users(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    let other = UserId::new("user-2");
    rt.block_on(harness.add(&uid, &message_at("mine", 0)))?;

    let listed = rt.block_on(harness.chat.messages().get_messages(
        &other,
        &MessageScope::unscoped(),
        MessagePage::default(),
        false,
    ))?;

    assert!(listed.is_empty());
    Ok(())
}

#[rstest]
fn app_reply_helper_links_conversation(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    let reply = rt.block_on(harness.chat.messages().add_app_message(
        &uid,
        "Sunny tomorrow",
        "weather",
        Some(ConversationId::new("c1")),
    ))?;

    let found = rt.block_on(harness.chat.messages().get_message(&uid, reply.id()))?;
    let (message, _) = found.ok_or("reply should be stored")?;
    assert_eq!(message.app_id(), Some("weather"));
    assert_eq!(message.memories_id(), [ConversationId::new("c1")]);
    Ok(())
}

//! Chat clearing tests against the in-memory store.

use std::num::NonZeroUsize;

use crate::in_memory::helpers::{
    Harness, TestResult, harness, message_at, runtime, texts, uid,
};
use chat_store::chat::{
    config::ChatStoreConfig,
    domain::{ChatFile, FileId, UserId, UserPartition},
    services::{BulkDeleteReport, ClearChatOutcome, MessagePage, MessageScope},
};
use chat_store::store::ports::DocumentStore;
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

async fn seed_unscoped(harness: &Harness, uid: &UserId, count: i64) -> TestResult {
    for n in 0..count {
        harness.add(uid, &message_at(&format!("m{n}"), n)).await?;
    }
    Ok(())
}

#[rstest]
fn clearing_unknown_user_reports_not_found(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    rt.block_on(seed_unscoped(&harness, &uid, 2))?;

    let outcome = rt.block_on(
        harness
            .chat
            .messages()
            .clear_chat(&uid, &MessageScope::unscoped()),
    );

    assert_eq!(outcome, ClearChatOutcome::UserNotFound);
    let remaining = rt.block_on(harness.chat.messages().get_messages(
        &uid,
        &MessageScope::unscoped(),
        MessagePage::default(),
        false,
    ))?;
    assert_eq!(remaining.len(), 2);
    Ok(())
}

#[rstest]
fn clearing_scope_keeps_other_apps_and_attachments(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    let spam = message_at("spam", 5);
    rt.block_on(async {
        harness.create_user(&uid).await?;
        seed_unscoped(&harness, &uid, 3).await?;
        let doc_id = harness.add(&uid, &spam).await?;
        harness.chat.messages().report_message(&uid, &doc_id).await;
        harness
            .add(&uid, &message_at("app", 9).with_app_id("p1"))
            .await?;
        harness.put_conversation(&uid, "c1", "Kept").await?;
        harness
            .chat
            .files()
            .add_files(&uid, &[ChatFile::new(FileId::new("f1"))])
            .await?;
        TestResult::Ok(())
    })?;

    let outcome = rt.block_on(
        harness
            .chat
            .messages()
            .clear_chat(&uid, &MessageScope::unscoped()),
    );

    assert_eq!(
        outcome.report(),
        Some(&BulkDeleteReport {
            deleted: 4,
            iterations: 1,
        })
    );
    let found = rt.block_on(harness.chat.messages().get_message(&uid, spam.id()))?;
    assert!(found.is_none(), "reported messages are cleared too");

    let app = rt.block_on(harness.chat.messages().get_app_messages(
        &uid,
        "p1",
        MessagePage::default(),
        false,
    ))?;
    assert_eq!(texts(&app), vec!["app"]);

    let partition = UserPartition::new(&uid);
    let conversation = rt.block_on(harness.store.get(&partition.conversations().doc("c1")))?;
    assert!(conversation.is_some());
    let files = rt.block_on(harness.chat.files().get_files(&uid, &[]))?;
    assert_eq!(files.len(), 1);
    Ok(())
}

#[rstest]
fn clearing_twice_deletes_nothing_the_second_time(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    rt.block_on(async {
        harness.create_user(&uid).await?;
        seed_unscoped(&harness, &uid, 3).await
    })?;
    let scope = MessageScope::unscoped();

    let first = rt.block_on(harness.chat.messages().clear_chat(&uid, &scope));
    let second = rt.block_on(harness.chat.messages().clear_chat(&uid, &scope));

    assert_eq!(first.report().map(|r| r.deleted), Some(3));
    assert_eq!(
        second.report(),
        Some(&BulkDeleteReport {
            deleted: 0,
            iterations: 1,
        })
    );
    Ok(())
}

#[rstest]
#[case::exact_batch(450, 2)]
#[case::one_over(451, 2)]
#[case::one_under(449, 1)]
fn default_batch_boundary(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
    #[case] count: i64,
    #[case] iterations: usize,
) -> TestResult {
    let rt = runtime?;
    rt.block_on(async {
        harness.create_user(&uid).await?;
        seed_unscoped(&harness, &uid, count).await
    })?;

    let outcome = rt.block_on(
        harness
            .chat
            .messages()
            .clear_chat(&uid, &MessageScope::unscoped()),
    );

    let report = outcome.report().ok_or("clear should succeed")?;
    assert_eq!(report.deleted, usize::try_from(count)?);
    assert_eq!(report.iterations, iterations);
    assert_eq!(harness.store.document_count(), 1, "only the user document remains");
    Ok(())
}

#[rstest]
fn configured_batch_size_bounds_each_page(
    runtime: io::Result<Runtime>,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    let batch = NonZeroUsize::new(4).ok_or("non-zero batch size")?;
    let harness = Harness::with_config(ChatStoreConfig::default().with_delete_batch_size(batch));
    rt.block_on(async {
        harness.create_user(&uid).await?;
        seed_unscoped(&harness, &uid, 10).await
    })?;

    let outcome = rt.block_on(
        harness
            .chat
            .messages()
            .clear_chat(&uid, &MessageScope::unscoped()),
    );

    assert_eq!(
        outcome.report(),
        Some(&BulkDeleteReport {
            deleted: 10,
            iterations: 3,
        })
    );
    Ok(())
}

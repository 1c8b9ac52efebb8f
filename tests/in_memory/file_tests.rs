//! File upload and removal tests against the in-memory store.

use crate::in_memory::helpers::{Harness, TestResult, harness, message_at, runtime, uid};
use chat_store::chat::{
    domain::{ChatFile, FileId, UserId},
    services::{MessagePage, MessageScope},
};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

fn sample_files() -> Vec<ChatFile> {
    vec![
        ChatFile::new(FileId::new("f1")).with_name("a.txt"),
        ChatFile::new(FileId::new("f2")).with_name("b.png").with_mime_type("image/png"),
        ChatFile::new(FileId::new("f3")).with_field("pages", 12),
    ]
}

fn ids(files: &[ChatFile]) -> Vec<&str> {
    let mut ids: Vec<&str> = files.iter().map(|file| file.id().as_str()).collect();
    ids.sort_unstable();
    ids
}

#[rstest]
fn files_are_listed_all_or_by_id(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    rt.block_on(harness.chat.files().add_files(&uid, &sample_files()))?;

    let all = rt.block_on(harness.chat.files().get_files(&uid, &[]))?;
    let some = rt.block_on(
        harness
            .chat
            .files()
            .get_files(&uid, &[FileId::new("f3"), FileId::new("missing")]),
    )?;

    assert_eq!(ids(&all), vec!["f1", "f2", "f3"]);
    assert_eq!(some, vec![ChatFile::new(FileId::new("f3")).with_field("pages", 12)]);
    Ok(())
}

#[rstest]
fn re_adding_a_file_overwrites_it(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    let renamed = ChatFile::new(FileId::new("f1")).with_name("renamed.txt");
    rt.block_on(async {
        harness.chat.files().add_files(&uid, &sample_files()).await?;
        harness
            .chat
            .files()
            .add_files(&uid, std::slice::from_ref(&renamed))
            .await?;
        TestResult::Ok(())
    })?;

    let found = rt.block_on(harness.chat.files().get_files(&uid, &[FileId::new("f1")]))?;

    assert_eq!(found, vec![renamed]);
    Ok(())
}

#[rstest]
fn deleted_files_drop_out_of_message_resolution(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    let listed = rt.block_on(async {
        harness.chat.files().add_files(&uid, &sample_files()).await?;
        harness
            .add(
                &uid,
                &message_at("see files", 0).with_files([FileId::new("f2"), FileId::new("f1")]),
            )
            .await?;
        harness
            .chat
            .files()
            .delete_files(&uid, &[FileId::new("f2"), FileId::new("never-existed")])
            .await?;
        let listed = harness
            .chat
            .messages()
            .get_messages(&uid, &MessageScope::unscoped(), MessagePage::default(), true)
            .await?;
        TestResult::Ok(listed)
    })?;

    let only = listed.first().ok_or("message should survive file deletion")?;
    assert_eq!(only.message.files_id(), [FileId::new("f2"), FileId::new("f1")]);
    let resolved = only.files.as_deref().ok_or("files should be resolved")?;
    assert_eq!(ids(resolved), vec!["f1"]);
    Ok(())
}

#[rstest]
fn uploading_more_than_a_batch_is_rejected_atomically(
    runtime: io::Result<Runtime>,
    harness: Harness,
    uid: UserId,
) -> TestResult {
    let rt = runtime?;
    let limit = harness.store.max_batch_size();
    let files: Vec<ChatFile> = (0..=limit)
        .map(|n| ChatFile::new(FileId::new(format!("f{n}"))))
        .collect();

    let result = rt.block_on(harness.chat.files().add_files(&uid, &files));

    assert!(result.is_err());
    let stored = rt.block_on(harness.chat.files().get_files(&uid, &[]))?;
    assert!(stored.is_empty());
    Ok(())
}

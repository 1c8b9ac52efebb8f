//! Then steps for chat session BDD scenarios.

use super::world::{SessionWorld, run_async};
use chat_store::chat::domain::ChatSession;
use eyre::WrapErr;
use rstest_bdd_macros::then;

fn session_for(world: &SessionWorld, app_id: &str) -> Result<ChatSession, eyre::Report> {
    run_async(world.chat.sessions().get_session(&world.uid, Some(app_id)))
        .wrap_err("look up session")?
        .ok_or_else(|| eyre::eyre!("expected a session for app {app_id}"))
}

#[then(r#"the session for app "{app_id}" lists messages "{labels}""#)]
fn session_lists_messages(
    world: &SessionWorld,
    app_id: String,
    labels: String,
) -> Result<(), eyre::Report> {
    let session = session_for(world, &app_id)?;
    let expected: Vec<&str> = labels.split(", ").collect();
    let actual: Vec<&str> = session
        .message_ids()
        .iter()
        .map(|id| world.label_of(*id).unwrap_or("<unknown>"))
        .collect();

    if actual != expected {
        return Err(eyre::eyre!(
            "expected session members {expected:?}, found {actual:?}"
        ));
    }
    Ok(())
}

#[then(r#"the session for app "{app_id}" has no messages"#)]
fn session_has_no_messages(world: &SessionWorld, app_id: String) -> Result<(), eyre::Report> {
    let session = session_for(world, &app_id)?;
    if !session.message_ids().is_empty() {
        return Err(eyre::eyre!(
            "expected no session members, found {}",
            session.message_ids().len()
        ));
    }
    Ok(())
}

#[then(r#"the session for app "{app_id}" is "{session_id}""#)]
fn session_is(world: &SessionWorld, app_id: String, session_id: String) -> Result<(), eyre::Report> {
    let session = session_for(world, &app_id)?;
    if session.id().as_str() != session_id {
        return Err(eyre::eyre!(
            "expected session {session_id}, found {}",
            session.id()
        ));
    }
    Ok(())
}

#[then(r#"there is no session for app "{app_id}""#)]
fn no_session(world: &SessionWorld, app_id: String) -> Result<(), eyre::Report> {
    let found = run_async(world.chat.sessions().get_session(&world.uid, Some(&app_id)))
        .wrap_err("look up session")?;
    if let Some(session) = found {
        return Err(eyre::eyre!(
            "expected no session for app {app_id}, found {}",
            session.id()
        ));
    }
    Ok(())
}

use crate::{dispatch, settings::Settings, Result};
use futures::TryStreamExt;
use telegram::{messages::Message, updates};
use tokio_graceful_shutdown::SubsystemHandle;

/// Inbound command intake: a long-poll update stream handled one
/// message at a time. Poll failures restart the stream after a pause
/// instead of taking the subsystem down.
pub async fn subsystem(settings: Settings, handle: SubsystemHandle) -> Result<()> {
    let client = settings.telegram.client()?;
    tracing::info!("started update listener");
    let mut stream = updates::stream(&client, updates::LONG_POLL_TIMEOUT);
    loop {
        tokio::select! {
            _ = handle.on_shutdown_requested() => break,
            update = stream.try_next() => match update {
                Ok(Some(update)) => {
                    if let Some(message) = update.message {
                        handle_message(&settings, &client, message).await;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    tracing::error!(?err, "update poll failed, restarting stream");
                    tokio::time::sleep(std::time::Duration::from_secs(15)).await;
                    stream = updates::stream(&client, updates::LONG_POLL_TIMEOUT);
                }
            },
        }
    }
    tracing::info!("stopped update listener");
    Ok(())
}

async fn handle_message(settings: &Settings, client: &telegram::Client, message: Message) {
    let Some(text) = message.text.as_deref() else {
        return;
    };
    let sender = message.from.as_ref().map(|from| from.id);
    let chat = message.chat.id;
    let admin = settings.telegram.admin_chat;

    let outcome = match command(text) {
        "/birthdays" => dispatch::birthday_table(settings, client, chat).await,
        "/next5" if sender == Some(admin) => dispatch::next_birthdays(settings, client, chat).await,
        "/vacations" if sender == Some(admin) => dispatch::vacations(settings, client, chat).await,
        "/next5" | "/vacations" => deny(client, chat).await,
        _ if chat == admin => dispatch::birthday_table(settings, client, chat).await,
        _ => Ok(()),
    };
    if let Err(err) = outcome {
        tracing::error!(?err, chat, "command dispatch failed");
    }
}

/// First word of the message with any `@botname` suffix stripped, as
/// commands carry one in group chats
fn command(text: &str) -> &str {
    let first = text.split_whitespace().next().unwrap_or_default();
    first.split('@').next().unwrap_or_default()
}

async fn deny(client: &telegram::Client, chat: i64) -> Result<()> {
    telegram::messages::send(client, chat, "You are not allowed to run this command.", None)
        .await?;
    Ok(())
}

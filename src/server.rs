use crate::{cron, listener, settings::Settings, Error, Result};
use tokio_graceful_shutdown::{SubsystemBuilder, Toplevel};

pub async fn run(settings: Settings) -> Result {
    // unusable schedule or token configuration must fail here, before
    // the subsystems enter their recover-and-continue loops
    settings.schedule.targets()?;
    let client = settings.telegram.client()?;

    if let Err(err) = telegram::messages::send(
        &client,
        settings.telegram.admin_chat,
        "Reminder service started.",
        None,
    )
    .await
    {
        tracing::error!(?err, "failed to send startup greeting");
    }

    Toplevel::new(move |top_level| async move {
        top_level.start(SubsystemBuilder::new("cron", {
            let settings = settings.clone();
            move |handle| cron::subsystem(settings, handle)
        }));
        top_level.start(SubsystemBuilder::new("updates", {
            move |handle| listener::subsystem(settings, handle)
        }));
    })
    .catch_signals()
    .handle_shutdown_requests(tokio::time::Duration::from_secs(5))
    .await
    .map_err(Error::from)
}

//! Ready event handler.

use dioxus_logger::tracing;
use serenity::all::{ActivityData, Context, Ready};

/// Logs the connection and advertises the help command as the bot's activity.
pub async fn handle_ready(ctx: Context, ready: Ready, prefix: &str) {
    tracing::info!(
        "{} is connected to Discord in {} servers",
        ready.user.name,
        ready.guilds.len()
    );

    ctx.set_activity(Some(ActivityData::listening(format!("{}help", prefix))));
}

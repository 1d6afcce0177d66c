use sea_orm::DatabaseConnection;
use serenity::all::{Context, EventHandler, Message, Ready};
use serenity::async_trait;

use crate::{
    config::Config,
    graph::pacing::{FixedPacer, RetryPolicy},
    service::confirmation::ConfirmationGate,
};

pub mod command;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub db: DatabaseConnection,
    pub prefix: String,
    pub pacer: FixedPacer,
    pub retry: RetryPolicy,
    pub gate: ConfirmationGate,
}

impl Handler {
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        Self {
            db,
            prefix: config.command_prefix.clone(),
            pacer: FixedPacer::new(
                config.role_pacing,
                config.category_pacing,
                config.channel_pacing,
            ),
            retry: RetryPolicy::new(config.retry_max_attempts, config.retry_base_delay),
            gate: ConfirmationGate::new(config.confirm_timeout),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready, &self.prefix).await;
    }

    /// Called for every message the bot can see
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        if let Some(command) = command::parse(&self.prefix, &msg.content) {
            command::handle_command(self, &ctx, &msg, command).await;
        }
    }
}

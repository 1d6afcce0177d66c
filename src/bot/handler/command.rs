//! Prefix text commands.
//!
//! Each command runs to completion inside the message event. Failures are logged and
//! answered with an error embed in the invoking channel.

use dioxus_logger::tracing;
use serenity::all::{Context, CreateEmbed, CreateMessage, GuildId, Message};

use crate::{
    bot::{
        confirmation::ChannelConfirmation,
        embed::{self, GuildAccess},
        handler::Handler,
        progress::StatusMessage,
    },
    error::AppError,
    graph::discord::{DiscordGraphReader, DiscordGraphWriter},
    service::{reconstructor::Reconstructor, template::TemplateService},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Snapshot the given guild, or the current one when omitted.
    Snapshot(Option<String>),
    /// Apply the named template to the current guild.
    Apply(Option<String>),
    Templates,
    Guilds,
    Help,
}

/// Parses a message into a command. Returns `None` for anything that is not one.
pub fn parse(prefix: &str, content: &str) -> Option<Command> {
    if prefix.is_empty() {
        return None;
    }

    let rest = content.trim().strip_prefix(prefix)?;
    let mut parts = rest.split_whitespace();
    let name = parts.next()?.to_lowercase();
    let argument = parts.next().map(str::to_string);

    match name.as_str() {
        "snapshot" => Some(Command::Snapshot(argument)),
        "apply" => Some(Command::Apply(argument)),
        "templates" => Some(Command::Templates),
        "guilds" => Some(Command::Guilds),
        "help" => Some(Command::Help),
        _ => None,
    }
}

pub async fn handle_command(handler: &Handler, ctx: &Context, msg: &Message, command: Command) {
    tracing::debug!(
        "Command {:?} from {} in channel {}",
        command,
        msg.author.name,
        msg.channel_id
    );

    let result = match command {
        Command::Snapshot(guild_id) => snapshot(handler, ctx, msg, guild_id).await,
        Command::Apply(name) => apply(handler, ctx, msg, name).await,
        Command::Templates => templates(handler, ctx, msg).await,
        Command::Guilds => guilds(ctx, msg).await,
        Command::Help => reply(ctx, msg, embed::help(&handler.prefix)).await,
    };

    if let Err(e) = result {
        tracing::error!("Command from {} failed: {}", msg.author.name, e);
        if let Err(e) = reply(ctx, msg, embed::error(&e.user_message())).await {
            tracing::error!("Failed to send error reply: {}", e);
        }
    }
}

async fn reply(ctx: &Context, msg: &Message, embed: CreateEmbed) -> Result<(), AppError> {
    msg.channel_id
        .send_message(&ctx.http, CreateMessage::new().embed(embed))
        .await?;
    Ok(())
}

fn require_admin(ctx: &Context, msg: &Message) -> Result<(), AppError> {
    let is_admin = msg
        .author_permissions(&ctx.cache)
        .is_some_and(|permissions| permissions.administrator());

    if is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "This command requires the Administrator permission".to_string(),
        ))
    }
}

/// Resolves the snapshot source from the argument, falling back to the current guild.
fn source_guild(argument: Option<&str>, current: Option<GuildId>) -> Result<GuildId, AppError> {
    match argument {
        Some(raw) => raw
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .map(GuildId::new)
            .ok_or_else(|| AppError::BadRequest(format!("`{}` is not a valid server ID", raw))),
        None => current.ok_or_else(|| {
            AppError::BadRequest("Provide a server ID when not used inside a server".to_string())
        }),
    }
}

async fn snapshot(
    handler: &Handler,
    ctx: &Context,
    msg: &Message,
    guild_id: Option<String>,
) -> Result<(), AppError> {
    require_admin(ctx, msg)?;
    let guild_id = source_guild(guild_id.as_deref(), msg.guild_id)?;

    let reader = DiscordGraphReader::load(ctx.http.clone(), guild_id).await?;

    let status = msg
        .channel_id
        .say(&ctx.http, format!("Taking snapshot of server {}...", guild_id))
        .await?;
    let progress = StatusMessage::new(ctx.http.clone(), &status);

    let report = TemplateService::new(&handler.db)
        .snapshot(&reader, Some(&progress))
        .await?;

    reply(ctx, msg, embed::snapshot(&report)).await
}

async fn apply(
    handler: &Handler,
    ctx: &Context,
    msg: &Message,
    name: Option<String>,
) -> Result<(), AppError> {
    require_admin(ctx, msg)?;
    let guild_id = msg.guild_id.ok_or_else(|| {
        AppError::BadRequest("Templates can only be applied in a server".to_string())
    })?;
    let name = name.ok_or_else(|| {
        AppError::BadRequest(format!("Usage: `{}apply <template_name>`", handler.prefix))
    })?;

    let service = TemplateService::new(&handler.db);
    let template = service.get(&name).await?;
    let writer = DiscordGraphWriter::load(ctx.http.clone(), guild_id).await?;

    // Subscribe before prompting so an immediate reply is collected.
    let confirmation = ChannelConfirmation::new(&ctx.shard, msg.author.id, msg.channel_id);
    let prompt = msg
        .channel_id
        .send_message(
            &ctx.http,
            CreateMessage::new().embed(embed::confirm_apply(
                &name,
                &template.summary(name.clone()),
                handler.gate.window().as_secs(),
            )),
        )
        .await?;

    let progress = StatusMessage::new(ctx.http.clone(), &prompt);
    let reconstructor =
        Reconstructor::new(&writer, &handler.pacer, handler.retry).with_progress(&progress);

    tracing::info!(
        "{} requested apply of {} to guild {}",
        msg.author.name,
        name,
        guild_id
    );

    let report = service
        .apply(&template, &reconstructor, &handler.gate, &confirmation)
        .await?;

    reply(ctx, msg, embed::applied(&name, &report)).await
}

async fn templates(handler: &Handler, ctx: &Context, msg: &Message) -> Result<(), AppError> {
    let summaries = TemplateService::new(&handler.db).list().await?;

    reply(ctx, msg, embed::templates(&summaries)).await
}

async fn guilds(ctx: &Context, msg: &Message) -> Result<(), AppError> {
    let bot_id = ctx.cache.current_user().id;
    let mut guilds: Vec<GuildAccess> = ctx
        .cache
        .guilds()
        .into_iter()
        .map(|id| match ctx.cache.guild(id) {
            Some(guild) => GuildAccess {
                id,
                name: guild.name.clone(),
                admin: guild
                    .members
                    .get(&bot_id)
                    .is_some_and(|member| guild.member_permissions(member).administrator()),
            },
            None => GuildAccess {
                id,
                name: "Unknown".to_string(),
                admin: false,
            },
        })
        .collect();
    guilds.sort_by(|a, b| a.name.cmp(&b.name));

    reply(ctx, msg, embed::guilds(&guilds)).await
}

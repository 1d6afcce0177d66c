//! In-memory guild graph for engine tests.
//!
//! `MockGraph` serves a fixed source guild through `GraphReader` and records every
//! `GraphWriter` call in order. Reads and writes can be made to fail by name, and
//! writes can be made to hit a number of rate limits before succeeding.

use serenity::async_trait;
use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Duration,
};

use crate::{
    error::graph::{ReadError, WriteError},
    graph::{
        pacing::{CallKind, Pacer},
        GraphCategory, GraphChannel, GraphGuild, GraphOverwrite, GraphOverwriteTarget,
        GraphReader, GraphRole, GraphWriter,
    },
    model::template::{
        ChannelKind, GuildSettings, OverwriteTarget, TemplateCategory, TemplateChannel,
        TemplateEmoji, TemplateOverwrite, TemplateRole, TemplateSticker,
    },
    service::progress::{ApplyPhase, ProgressSink, SnapshotPhase},
};

/// First ID handed out for created entities.
const FIRST_CREATED_ID: u64 = 1000;

/// A write call captured by `MockGraph`.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteCall {
    CreateRole {
        name: String,
        id: u64,
    },
    CreateCategory {
        name: String,
        id: u64,
    },
    CreateChannel {
        name: String,
        parent: Option<u64>,
        kind: ChannelKind,
        id: u64,
    },
    SetOverwrite {
        resource: u64,
        role: u64,
        allow: u64,
        deny: u64,
    },
}

pub struct MockGraph {
    pub guild: GraphGuild,
    pub roles: Vec<GraphRole>,
    pub categories: Vec<GraphCategory>,
    pub top_level: Vec<GraphChannel>,
    pub children: HashMap<u64, Vec<GraphChannel>>,
    pub overwrites: HashMap<u64, Vec<GraphOverwrite>>,
    pub members: HashMap<u64, String>,
    pub emojis: Vec<TemplateEmoji>,
    pub stickers: Vec<TemplateSticker>,
    /// Read operations that fail, keyed like `list_roles` or `list_overwrites:11`.
    pub failing_reads: HashSet<String>,

    /// Entity names whose creation is rejected.
    pub failing_names: HashSet<String>,
    /// Resources on which every `set_overwrite` is rejected.
    pub failing_overwrites: HashSet<u64>,
    /// Remaining rate-limit rejections per entity name.
    pub rate_limits: Mutex<HashMap<String, u32>>,
    pub max_bitrate: u32,

    calls: Mutex<Vec<WriteCall>>,
    attempts: Mutex<HashMap<String, u32>>,
    next_id: AtomicU64,
}

impl MockGraph {
    pub fn new() -> Self {
        Self {
            guild: GraphGuild {
                id: 1,
                name: "Source Guild".to_string(),
                description: None,
                icon_url: None,
                settings: GuildSettings::default(),
            },
            roles: Vec::new(),
            categories: Vec::new(),
            top_level: Vec::new(),
            children: HashMap::new(),
            overwrites: HashMap::new(),
            members: HashMap::new(),
            emojis: Vec::new(),
            stickers: Vec::new(),
            failing_reads: HashSet::new(),
            failing_names: HashSet::new(),
            failing_overwrites: HashSet::new(),
            rate_limits: Mutex::new(HashMap::new()),
            max_bitrate: 384_000,
            calls: Mutex::new(Vec::new()),
            attempts: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(FIRST_CREATED_ID),
        }
    }

    pub fn fail_read(mut self, operation: impl Into<String>) -> Self {
        self.failing_reads.insert(operation.into());
        self
    }

    pub fn fail_write(mut self, name: impl Into<String>) -> Self {
        self.failing_names.insert(name.into());
        self
    }

    pub fn rate_limit(self, name: impl Into<String>, times: u32) -> Self {
        self.rate_limits
            .lock()
            .unwrap()
            .insert(name.into(), times);
        self
    }

    /// Recorded write calls in issue order.
    pub fn calls(&self) -> Vec<WriteCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of times creation of `name` was attempted, including rejected attempts.
    pub fn attempts(&self, name: &str) -> u32 {
        self.attempts
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    fn read<T>(&self, operation: &str, value: T) -> Result<T, ReadError> {
        if self.failing_reads.contains(operation) {
            return Err(ReadError::new(operation, "injected failure"));
        }
        Ok(value)
    }

    /// Runs the shared fault checks for a create call, returning the new ID.
    fn create(&self, name: &str) -> Result<u64, WriteError> {
        *self
            .attempts
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_insert(0) += 1;

        if let Some(remaining) = self.rate_limits.lock().unwrap().get_mut(name) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(WriteError::RateLimited { retry_after: None });
            }
        }

        if self.failing_names.contains(name) {
            return Err(WriteError::Rejected {
                status: 400,
                message: format!("cannot create {}", name),
            });
        }

        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn record(&self, call: WriteCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphReader for MockGraph {
    async fn guild_info(&self) -> Result<GraphGuild, ReadError> {
        self.read("guild_info", self.guild.clone())
    }

    async fn list_roles(&self) -> Result<Vec<GraphRole>, ReadError> {
        self.read("list_roles", self.roles.clone())
    }

    async fn list_categories(&self) -> Result<Vec<GraphCategory>, ReadError> {
        self.read("list_categories", self.categories.clone())
    }

    async fn list_top_level_channels(&self) -> Result<Vec<GraphChannel>, ReadError> {
        self.read("list_top_level_channels", self.top_level.clone())
    }

    async fn list_channels_of(&self, category_id: u64) -> Result<Vec<GraphChannel>, ReadError> {
        self.read(
            &format!("list_channels_of:{}", category_id),
            self.children.get(&category_id).cloned().unwrap_or_default(),
        )
    }

    async fn list_overwrites(&self, resource_id: u64) -> Result<Vec<GraphOverwrite>, ReadError> {
        self.read(
            &format!("list_overwrites:{}", resource_id),
            self.overwrites.get(&resource_id).cloned().unwrap_or_default(),
        )
    }

    async fn member_name(&self, user_id: u64) -> Result<String, ReadError> {
        let operation = format!("member_name:{}", user_id);
        match self.members.get(&user_id) {
            Some(name) => self.read(&operation, name.clone()),
            None => Err(ReadError::new(operation, "unknown member")),
        }
    }

    async fn list_emojis(&self) -> Result<Vec<TemplateEmoji>, ReadError> {
        self.read("list_emojis", self.emojis.clone())
    }

    async fn list_stickers(&self) -> Result<Vec<TemplateSticker>, ReadError> {
        self.read("list_stickers", self.stickers.clone())
    }
}

#[async_trait]
impl GraphWriter for MockGraph {
    async fn create_role(&self, role: &TemplateRole) -> Result<u64, WriteError> {
        let id = self.create(&role.name)?;
        self.record(WriteCall::CreateRole {
            name: role.name.clone(),
            id,
        });
        Ok(id)
    }

    async fn create_category(&self, category: &TemplateCategory) -> Result<u64, WriteError> {
        let id = self.create(&category.name)?;
        self.record(WriteCall::CreateCategory {
            name: category.name.clone(),
            id,
        });
        Ok(id)
    }

    async fn create_channel(
        &self,
        channel: &TemplateChannel,
        parent: Option<u64>,
    ) -> Result<u64, WriteError> {
        let id = self.create(&channel.name)?;
        self.record(WriteCall::CreateChannel {
            name: channel.name.clone(),
            parent,
            kind: channel.kind.clone(),
            id,
        });
        Ok(id)
    }

    async fn set_overwrite(
        &self,
        resource_id: u64,
        role_id: u64,
        allow: u64,
        deny: u64,
    ) -> Result<(), WriteError> {
        if self.failing_overwrites.contains(&resource_id) {
            return Err(WriteError::Rejected {
                status: 403,
                message: "Missing Permissions".to_string(),
            });
        }
        self.record(WriteCall::SetOverwrite {
            resource: resource_id,
            role: role_id,
            allow,
            deny,
        });
        Ok(())
    }

    fn everyone_role_id(&self) -> u64 {
        self.guild.id
    }

    fn max_bitrate(&self) -> u32 {
        self.max_bitrate
    }
}

/// Waiting captured by `RecordingPacer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceEvent {
    Pace(CallKind),
    Backoff(Duration),
}

/// Pacer that records instead of sleeping.
#[derive(Default)]
pub struct RecordingPacer {
    events: Mutex<Vec<PaceEvent>>,
}

impl RecordingPacer {
    pub fn events(&self) -> Vec<PaceEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pace(&self, kind: CallKind) {
        self.events.lock().unwrap().push(PaceEvent::Pace(kind));
    }

    async fn backoff(&self, delay: Duration) {
        self.events.lock().unwrap().push(PaceEvent::Backoff(delay));
    }
}

/// Progress notice captured by `RecordingProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Snapshot(SnapshotPhase, usize),
    Apply(ApplyPhase, usize),
}

#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressSink for RecordingProgress {
    async fn snapshot_phase_done(&self, phase: SnapshotPhase, count: usize) {
        self.events
            .lock()
            .unwrap()
            .push(ProgressEvent::Snapshot(phase, count));
    }

    async fn apply_phase_done(&self, phase: ApplyPhase, count: usize) {
        self.events
            .lock()
            .unwrap()
            .push(ProgressEvent::Apply(phase, count));
    }
}

pub fn source_role(id: u64, name: &str, position: u16) -> GraphRole {
    GraphRole {
        id,
        name: name.to_string(),
        color: 0,
        hoist: false,
        mentionable: false,
        permissions: 0,
        position,
        managed: false,
        everyone: false,
        display_icon: None,
    }
}

pub fn source_text(id: u64, name: &str, position: u16) -> GraphChannel {
    GraphChannel {
        id,
        name: name.to_string(),
        position,
        nsfw: false,
        kind: Ok(text_kind()),
    }
}

pub fn role_overwrite_of(role_id: u64, allow: u64, deny: u64) -> GraphOverwrite {
    GraphOverwrite {
        target: GraphOverwriteTarget::Role(role_id),
        allow,
        deny,
    }
}

pub fn text_kind() -> ChannelKind {
    ChannelKind::Text {
        topic: None,
        slowmode_delay: 0,
        default_auto_archive_duration: None,
    }
}

pub fn role(name: &str, position: u16) -> TemplateRole {
    TemplateRole {
        name: name.to_string(),
        color: 0,
        hoist: false,
        mentionable: false,
        permissions: 0,
        position,
        display_icon: None,
    }
}

pub fn text(name: &str, position: u16) -> TemplateChannel {
    TemplateChannel {
        name: name.to_string(),
        position,
        nsfw: false,
        kind: text_kind(),
        overwrites: Vec::new(),
    }
}

pub fn voice(name: &str, bitrate: u32) -> TemplateChannel {
    TemplateChannel {
        name: name.to_string(),
        position: 0,
        nsfw: false,
        kind: ChannelKind::Voice {
            bitrate,
            user_limit: 0,
            rtc_region: None,
        },
        overwrites: Vec::new(),
    }
}

pub fn category(name: &str, position: u16, channels: Vec<TemplateChannel>) -> TemplateCategory {
    TemplateCategory {
        name: name.to_string(),
        position,
        nsfw: false,
        overwrites: Vec::new(),
        channels,
    }
}

pub fn role_overwrite(name: &str, allow: u64, deny: u64) -> TemplateOverwrite {
    TemplateOverwrite {
        target: OverwriteTarget::Role {
            name: name.to_string(),
        },
        allow,
        deny,
    }
}

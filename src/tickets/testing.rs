// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory stand-ins for Discord and the database, recording what tickets do to them.

use super::TicketManager;
use super::platform::{HistoryMessage, NewTicketChannel, OutgoingMessage, Platform};
use crate::config::TicketTimingConfig;
use crate::error::{PlatformError, StoreError};
use crate::model::{GuildSettings, TicketRecord, TicketStatus, database_id_from_discord_id};
use crate::store::{SettingUpdate, TicketStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use twilight_model::channel::message::component::Component;
use twilight_model::channel::message::embed::Embed;
use twilight_model::channel::permission_overwrite::PermissionOverwrite;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, MessageMarker, RoleMarker, UserMarker};

pub fn manager(platform: FakePlatform, store: MemoryStore) -> TicketManager<FakePlatform, MemoryStore> {
	TicketManager::new(platform, store, TicketTimingConfig::default())
}

/// A message in a fake channel. Messages without an author were posted by the bot.
#[derive(Clone, Debug)]
pub struct FakeMessage {
	pub id: Id<MessageMarker>,
	pub author_id: Option<Id<UserMarker>>,
	pub content: Option<String>,
	pub embeds: Vec<Embed>,
	pub components: Vec<Component>,
	pub attachment_names: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct FakeChannel {
	pub name: String,
	pub topic: String,
	pub parent_id: Option<Id<ChannelMarker>>,
	pub permission_overwrites: Vec<PermissionOverwrite>,
	pub messages: Vec<FakeMessage>,
}

#[derive(Default)]
struct PlatformState {
	next_id: u64,
	roles: Vec<(Id<GuildMarker>, String, Id<RoleMarker>)>,
	categories: Vec<(Id<GuildMarker>, String, Id<ChannelMarker>)>,
	channels: BTreeMap<Id<ChannelMarker>, FakeChannel>,
	deleted_channels: Vec<Id<ChannelMarker>>,
	direct_messages: Vec<(Id<UserMarker>, OutgoingMessage)>,
	fail_direct_messages: bool,
	fail_history: bool,
}

impl PlatformState {
	fn new_id<T>(&mut self) -> Id<T> {
		self.next_id += 1;
		Id::new(1000 + self.next_id)
	}
}

#[derive(Clone, Default)]
pub struct FakePlatform {
	state: Arc<Mutex<PlatformState>>,
}

impl FakePlatform {
	pub fn add_role(&self, guild_id: Id<GuildMarker>, name: &str) -> Id<RoleMarker> {
		let mut state = self.state.lock().unwrap();
		let role_id = state.new_id();
		state.roles.push((guild_id, String::from(name), role_id));
		role_id
	}

	pub fn add_category(&self, guild_id: Id<GuildMarker>, name: &str) -> Id<ChannelMarker> {
		let mut state = self.state.lock().unwrap();
		let category_id = state.new_id();
		state.categories.push((guild_id, String::from(name), category_id));
		category_id
	}

	pub fn add_channel(&self, channel_id: Id<ChannelMarker>) {
		let mut state = self.state.lock().unwrap();
		state.channels.insert(channel_id, FakeChannel::default());
	}

	/// Posts a message as a user, as if it came in from Discord
	pub fn post_as_user(&self, channel_id: Id<ChannelMarker>, user_id: Id<UserMarker>, content: &str) -> Id<MessageMarker> {
		let mut state = self.state.lock().unwrap();
		let message_id = state.new_id();
		let channel = state.channels.get_mut(&channel_id).unwrap();
		channel.messages.push(FakeMessage {
			id: message_id,
			author_id: Some(user_id),
			content: Some(String::from(content)),
			embeds: Vec::new(),
			components: Vec::new(),
			attachment_names: Vec::new(),
		});
		message_id
	}

	pub fn channel(&self, channel_id: Id<ChannelMarker>) -> Option<FakeChannel> {
		self.state.lock().unwrap().channels.get(&channel_id).cloned()
	}

	pub fn channel_count(&self) -> usize {
		self.state.lock().unwrap().channels.len()
	}

	pub fn messages(&self, channel_id: Id<ChannelMarker>) -> Vec<FakeMessage> {
		self.channel(channel_id).map(|channel| channel.messages).unwrap_or_default()
	}

	pub fn deleted_channels(&self) -> Vec<Id<ChannelMarker>> {
		self.state.lock().unwrap().deleted_channels.clone()
	}

	pub fn direct_messages(&self) -> Vec<(Id<UserMarker>, OutgoingMessage)> {
		self.state.lock().unwrap().direct_messages.clone()
	}

	pub fn fail_direct_messages(&self) {
		self.state.lock().unwrap().fail_direct_messages = true;
	}

	pub fn fail_history(&self) {
		self.state.lock().unwrap().fail_history = true;
	}
}

fn unknown_channel() -> PlatformError {
	PlatformError::Rejected(String::from("Unknown Channel"))
}

#[async_trait]
impl Platform for FakePlatform {
	async fn guild_name(&self, _guild_id: Id<GuildMarker>) -> Result<String, PlatformError> {
		Ok(String::from("Test Guild"))
	}

	async fn role_by_name(&self, guild_id: Id<GuildMarker>, name: &str) -> Result<Option<Id<RoleMarker>>, PlatformError> {
		let state = self.state.lock().unwrap();
		Ok(state
			.roles
			.iter()
			.find(|(role_guild, role_name, _)| *role_guild == guild_id && role_name == name)
			.map(|(_, _, role_id)| *role_id))
	}

	async fn category_by_name(
		&self,
		guild_id: Id<GuildMarker>,
		name: &str,
	) -> Result<Option<Id<ChannelMarker>>, PlatformError> {
		let state = self.state.lock().unwrap();
		Ok(state
			.categories
			.iter()
			.find(|(category_guild, category_name, _)| *category_guild == guild_id && category_name == name)
			.map(|(_, _, category_id)| *category_id))
	}

	async fn create_ticket_channel(&self, channel: &NewTicketChannel) -> Result<Id<ChannelMarker>, PlatformError> {
		let mut state = self.state.lock().unwrap();
		let channel_id = state.new_id();
		state.channels.insert(
			channel_id,
			FakeChannel {
				name: channel.name.clone(),
				topic: channel.topic.clone(),
				parent_id: Some(channel.parent_id),
				permission_overwrites: channel.permission_overwrites.clone(),
				messages: Vec::new(),
			},
		);
		Ok(channel_id)
	}

	async fn channel_exists(&self, channel_id: Id<ChannelMarker>) -> Result<bool, PlatformError> {
		Ok(self.state.lock().unwrap().channels.contains_key(&channel_id))
	}

	async fn update_ticket_channel(
		&self,
		channel_id: Id<ChannelMarker>,
		name: &str,
		permission_overwrites: &[PermissionOverwrite],
		_reason: &str,
	) -> Result<(), PlatformError> {
		let mut state = self.state.lock().unwrap();
		let channel = state.channels.get_mut(&channel_id).ok_or_else(unknown_channel)?;
		channel.name = String::from(name);
		channel.permission_overwrites = permission_overwrites.to_vec();
		Ok(())
	}

	async fn delete_channel(&self, channel_id: Id<ChannelMarker>, _reason: &str) -> Result<(), PlatformError> {
		let mut state = self.state.lock().unwrap();
		state.channels.remove(&channel_id).ok_or_else(unknown_channel)?;
		state.deleted_channels.push(channel_id);
		Ok(())
	}

	async fn send_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message: &OutgoingMessage,
	) -> Result<Id<MessageMarker>, PlatformError> {
		let mut state = self.state.lock().unwrap();
		let message_id = state.new_id();
		let channel = state.channels.get_mut(&channel_id).ok_or_else(unknown_channel)?;
		channel.messages.push(FakeMessage {
			id: message_id,
			author_id: None,
			content: message.content.clone(),
			embeds: message.embeds.clone(),
			components: message.components.clone(),
			attachment_names: message
				.attachments
				.iter()
				.map(|attachment| attachment.filename.clone())
				.collect(),
		});
		Ok(message_id)
	}

	async fn send_direct_message(&self, user_id: Id<UserMarker>, message: &OutgoingMessage) -> Result<(), PlatformError> {
		let mut state = self.state.lock().unwrap();
		if state.fail_direct_messages {
			return Err(PlatformError::Rejected(String::from("Cannot send messages to this user")));
		}
		state.direct_messages.push((user_id, message.clone()));
		Ok(())
	}

	async fn delete_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message_id: Id<MessageMarker>,
	) -> Result<(), PlatformError> {
		let mut state = self.state.lock().unwrap();
		let channel = state.channels.get_mut(&channel_id).ok_or_else(unknown_channel)?;
		channel.messages.retain(|message| message.id != message_id);
		Ok(())
	}

	async fn delete_messages(
		&self,
		channel_id: Id<ChannelMarker>,
		message_ids: &[Id<MessageMarker>],
	) -> Result<(), PlatformError> {
		let mut state = self.state.lock().unwrap();
		let channel = state.channels.get_mut(&channel_id).ok_or_else(unknown_channel)?;
		channel.messages.retain(|message| !message_ids.contains(&message.id));
		Ok(())
	}

	async fn recent_message_ids(
		&self,
		channel_id: Id<ChannelMarker>,
		limit: u16,
	) -> Result<Vec<Id<MessageMarker>>, PlatformError> {
		let state = self.state.lock().unwrap();
		let channel = state.channels.get(&channel_id).ok_or_else(unknown_channel)?;
		Ok(channel
			.messages
			.iter()
			.rev()
			.take(usize::from(limit))
			.map(|message| message.id)
			.collect())
	}

	async fn message_history(&self, channel_id: Id<ChannelMarker>) -> Result<Vec<HistoryMessage>, PlatformError> {
		let state = self.state.lock().unwrap();
		if state.fail_history {
			return Err(PlatformError::Rejected(String::from("Missing Access")));
		}
		let channel = state.channels.get(&channel_id).ok_or_else(unknown_channel)?;
		Ok(channel
			.messages
			.iter()
			.map(|message| HistoryMessage {
				id: message.id,
				author_id: message.author_id.unwrap_or(Id::new(1)),
				author_name: match message.author_id {
					Some(author_id) => format!("user{}", author_id),
					None => String::from("Ticket Bot"),
				},
				author_is_bot: message.author_id.is_none(),
				content: message.content.clone().unwrap_or_default(),
				sent_at: Utc::now(),
				attachment_names: message.attachment_names.clone(),
				embed_count: message.embeds.len(),
			})
			.collect())
	}
}

#[derive(Default)]
struct StoreState {
	settings: HashMap<i64, GuildSettings>,
	tickets: Vec<TicketRecord>,
	settings_inserts: usize,
	reject_ticket_inserts: bool,
}

/// Keeps the same uniqueness rules as the database: one open ticket per author per guild, one ticket per channel
#[derive(Clone, Default)]
pub struct MemoryStore {
	state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
	/// How many times default settings were stored
	pub fn settings_inserts(&self) -> usize {
		self.state.lock().unwrap().settings_inserts
	}

	pub fn tickets(&self) -> Vec<TicketRecord> {
		self.state.lock().unwrap().tickets.clone()
	}

	/// Makes every ticket insert fail as if another open ticket won a race
	pub fn reject_ticket_inserts(&self) {
		self.state.lock().unwrap().reject_ticket_inserts = true;
	}
}

fn apply_setting_update(settings: &mut GuildSettings, update: &SettingUpdate) {
	match update {
		SettingUpdate::PanelTitle(value) => settings.panel_title = value.clone(),
		SettingUpdate::PanelDescription(value) => settings.panel_description = value.clone(),
		SettingUpdate::PanelFooter(value) => settings.panel_footer = value.clone(),
		SettingUpdate::PanelColour(value) => settings.panel_colour = value.clone(),
		SettingUpdate::Reason(1, value) => settings.reason1 = value.clone(),
		SettingUpdate::Reason(2, value) => settings.reason2 = value.clone(),
		SettingUpdate::Reason(3, value) => settings.reason3 = value.clone(),
		SettingUpdate::Reason(4, value) => settings.reason4 = value.clone(),
		SettingUpdate::Reason(5, value) => settings.reason5 = value.clone(),
		SettingUpdate::Reason(..) => (),
		SettingUpdate::StaffRoleName(value) => settings.staff_role_name = value.clone(),
		SettingUpdate::OpenMessage(value) => settings.open_message = value.clone(),
		SettingUpdate::OpenEmbedDescription(value) => settings.open_embed_description = value.clone(),
		SettingUpdate::OpenEmbedFooter(value) => settings.open_embed_footer = value.clone(),
		SettingUpdate::OpenCategory(value) => settings.open_category = value.clone(),
		SettingUpdate::Transcript(value) => settings.transcript = *value,
		SettingUpdate::TranscriptLogChannel(channel) => {
			settings.transcript_log_channel = channel.map(|channel| database_id_from_discord_id(channel.get()))
		}
	}
}

#[async_trait]
impl TicketStore for MemoryStore {
	async fn guild_settings(&self, guild_id: Id<GuildMarker>) -> Result<Option<GuildSettings>, StoreError> {
		let state = self.state.lock().unwrap();
		Ok(state.settings.get(&database_id_from_discord_id(guild_id.get())).cloned())
	}

	async fn insert_guild_settings(&self, settings: &GuildSettings) -> Result<GuildSettings, StoreError> {
		let mut state = self.state.lock().unwrap();
		if !state.settings.contains_key(&settings.guild_id) {
			state.settings_inserts += 1;
			state.settings.insert(settings.guild_id, settings.clone());
		}
		Ok(state.settings[&settings.guild_id].clone())
	}

	async fn update_guild_setting(&self, guild_id: Id<GuildMarker>, update: &SettingUpdate) -> Result<(), StoreError> {
		let mut state = self.state.lock().unwrap();
		if let Some(settings) = state.settings.get_mut(&database_id_from_discord_id(guild_id.get())) {
			apply_setting_update(settings, update);
		}
		Ok(())
	}

	async fn open_ticket_by_author(
		&self,
		guild_id: Id<GuildMarker>,
		author_id: Id<UserMarker>,
	) -> Result<Option<TicketRecord>, StoreError> {
		let state = self.state.lock().unwrap();
		Ok(state
			.tickets
			.iter()
			.find(|ticket| {
				ticket.get_guild_id() == guild_id && ticket.get_author_id() == author_id && ticket.status == TicketStatus::Open
			})
			.cloned())
	}

	async fn ticket_by_channel(&self, channel_id: Id<ChannelMarker>) -> Result<Option<TicketRecord>, StoreError> {
		let state = self.state.lock().unwrap();
		Ok(state
			.tickets
			.iter()
			.find(|ticket| ticket.get_channel_id() == channel_id)
			.cloned())
	}

	async fn insert_ticket(&self, ticket: &TicketRecord) -> Result<(), StoreError> {
		let mut state = self.state.lock().unwrap();
		let conflict = state.tickets.iter().any(|existing| {
			existing.channel_id == ticket.channel_id
				|| (ticket.status == TicketStatus::Open
					&& existing.status == TicketStatus::Open
					&& existing.guild_id == ticket.guild_id
					&& existing.author_id == ticket.author_id)
		});
		if conflict || state.reject_ticket_inserts {
			return Err(StoreError::Duplicate);
		}
		state.tickets.push(ticket.clone());
		Ok(())
	}

	async fn set_ticket_status(&self, channel_id: Id<ChannelMarker>, status: TicketStatus) -> Result<(), StoreError> {
		let mut state = self.state.lock().unwrap();
		let channel_id = database_id_from_discord_id(channel_id.get());
		let Some(index) = state.tickets.iter().position(|ticket| ticket.channel_id == channel_id) else {
			return Ok(());
		};
		if status == TicketStatus::Open {
			let ticket = &state.tickets[index];
			let conflict = state.tickets.iter().any(|existing| {
				existing.channel_id != channel_id
					&& existing.status == TicketStatus::Open
					&& existing.guild_id == ticket.guild_id
					&& existing.author_id == ticket.author_id
			});
			if conflict {
				return Err(StoreError::Duplicate);
			}
		}
		state.tickets[index].status = status;
		Ok(())
	}

	async fn remove_ticket(&self, channel_id: Id<ChannelMarker>) -> Result<bool, StoreError> {
		let mut state = self.state.lock().unwrap();
		let channel_id = database_id_from_discord_id(channel_id.get());
		let before = state.tickets.len();
		state.tickets.retain(|ticket| ticket.channel_id != channel_id);
		Ok(state.tickets.len() != before)
	}
}

// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::PlatformError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use twilight_model::channel::message::component::Component;
use twilight_model::channel::message::embed::Embed;
use twilight_model::channel::message::AllowedMentions;
use twilight_model::http::attachment::Attachment;
use twilight_model::channel::permission_overwrite::PermissionOverwrite;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, MessageMarker, RoleMarker, UserMarker};

/// Everything needed to create a ticket channel
#[derive(Clone, Debug)]
pub struct NewTicketChannel {
	pub guild_id: Id<GuildMarker>,
	pub name: String,
	/// The category the channel is created under
	pub parent_id: Id<ChannelMarker>,
	pub topic: String,
	pub permission_overwrites: Vec<PermissionOverwrite>,
}

/// A message to post to a channel or DM
#[derive(Clone, Debug, Default)]
pub struct OutgoingMessage {
	pub content: Option<String>,
	pub embeds: Vec<Embed>,
	pub components: Vec<Component>,
	pub attachments: Vec<Attachment>,
	pub allowed_mentions: AllowedMentions,
}

/// A message already in a channel, as much as a transcript needs of it
#[derive(Clone, Debug)]
pub struct HistoryMessage {
	pub id: Id<MessageMarker>,
	pub author_id: Id<UserMarker>,
	pub author_name: String,
	pub author_is_bot: bool,
	pub content: String,
	pub sent_at: DateTime<Utc>,
	pub attachment_names: Vec<String>,
	pub embed_count: usize,
}

/// A newly posted guild message, as much as the owner alert needs of it
#[derive(Clone, Debug)]
pub struct IncomingMessage {
	pub guild_id: Option<Id<GuildMarker>>,
	pub channel_id: Id<ChannelMarker>,
	pub author_id: Id<UserMarker>,
	pub author_is_bot: bool,
	pub member_roles: Vec<Id<RoleMarker>>,
}

/// The chat platform operations tickets are built from
#[async_trait]
pub trait Platform: Send + Sync + 'static {
	async fn guild_name(&self, guild_id: Id<GuildMarker>) -> Result<String, PlatformError>;

	/// Finds a role in the guild with exactly this name
	async fn role_by_name(&self, guild_id: Id<GuildMarker>, name: &str) -> Result<Option<Id<RoleMarker>>, PlatformError>;

	/// Finds a category in the guild with exactly this name
	async fn category_by_name(
		&self,
		guild_id: Id<GuildMarker>,
		name: &str,
	) -> Result<Option<Id<ChannelMarker>>, PlatformError>;

	async fn create_ticket_channel(&self, channel: &NewTicketChannel) -> Result<Id<ChannelMarker>, PlatformError>;

	/// Whether the channel still exists
	async fn channel_exists(&self, channel_id: Id<ChannelMarker>) -> Result<bool, PlatformError>;

	/// Renames the channel and replaces all of its permission overwrites
	async fn update_ticket_channel(
		&self,
		channel_id: Id<ChannelMarker>,
		name: &str,
		permission_overwrites: &[PermissionOverwrite],
		reason: &str,
	) -> Result<(), PlatformError>;

	async fn delete_channel(&self, channel_id: Id<ChannelMarker>, reason: &str) -> Result<(), PlatformError>;

	async fn send_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message: &OutgoingMessage,
	) -> Result<Id<MessageMarker>, PlatformError>;

	async fn send_direct_message(&self, user_id: Id<UserMarker>, message: &OutgoingMessage) -> Result<(), PlatformError>;

	async fn delete_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message_id: Id<MessageMarker>,
	) -> Result<(), PlatformError>;

	/// Deletes a batch of messages from one channel
	async fn delete_messages(
		&self,
		channel_id: Id<ChannelMarker>,
		message_ids: &[Id<MessageMarker>],
	) -> Result<(), PlatformError>;

	/// IDs of the most recent messages in the channel, newest first
	async fn recent_message_ids(
		&self,
		channel_id: Id<ChannelMarker>,
		limit: u16,
	) -> Result<Vec<Id<MessageMarker>>, PlatformError>;

	/// The channel's message history, oldest first
	async fn message_history(&self, channel_id: Id<ChannelMarker>) -> Result<Vec<HistoryMessage>, PlatformError>;
}

// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::StoreError;
use crate::model::{GuildSettings, TicketRecord, TicketStatus};
use async_trait::async_trait;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, UserMarker};

mod postgres;

pub use postgres::PostgresStore;

/// A single settings field with its new value
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SettingUpdate {
	PanelTitle(String),
	PanelDescription(String),
	PanelFooter(String),
	PanelColour(String),
	/// A reason label by 1-based slot
	Reason(usize, String),
	StaffRoleName(String),
	OpenMessage(String),
	OpenEmbedDescription(String),
	OpenEmbedFooter(String),
	OpenCategory(String),
	Transcript(bool),
	TranscriptLogChannel(Option<Id<ChannelMarker>>),
}

/// Durable storage for guild settings and the ticket registry
#[async_trait]
pub trait TicketStore: Send + Sync + 'static {
	async fn guild_settings(&self, guild_id: Id<GuildMarker>) -> Result<Option<GuildSettings>, StoreError>;

	/// Stores the settings unless the guild already has some, then returns whatever the guild has stored
	async fn insert_guild_settings(&self, settings: &GuildSettings) -> Result<GuildSettings, StoreError>;

	async fn update_guild_setting(&self, guild_id: Id<GuildMarker>, update: &SettingUpdate) -> Result<(), StoreError>;

	/// The author's open ticket in the guild, if they have one
	async fn open_ticket_by_author(
		&self,
		guild_id: Id<GuildMarker>,
		author_id: Id<UserMarker>,
	) -> Result<Option<TicketRecord>, StoreError>;

	async fn ticket_by_channel(&self, channel_id: Id<ChannelMarker>) -> Result<Option<TicketRecord>, StoreError>;

	/// Adds a ticket. Fails with [StoreError::Duplicate] if the author already has an open ticket in the guild.
	async fn insert_ticket(&self, ticket: &TicketRecord) -> Result<(), StoreError>;

	/// Changes the status of a ticket. Fails with [StoreError::Duplicate] if reopening would give the author two open
	/// tickets.
	async fn set_ticket_status(&self, channel_id: Id<ChannelMarker>, status: TicketStatus) -> Result<(), StoreError>;

	/// Removes the ticket for the channel, returning whether there was one
	async fn remove_ticket(&self, channel_id: Id<ChannelMarker>) -> Result<bool, StoreError>;
}

// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{SettingUpdate, TicketStore};
use crate::error::StoreError;
use crate::model::{GuildSettings, TicketRecord, TicketStatus, database_id_from_discord_id};
use crate::schema::{guild_ticket_settings, tickets};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, UserMarker};

/// [TicketStore] backed by Postgres.
///
/// Diesel is synchronous, so every query is run on the blocking thread pool.
#[derive(Clone)]
pub struct PostgresStore {
	db_connection_pool: Pool<ConnectionManager<PgConnection>>,
}

impl PostgresStore {
	pub fn new(db_connection_pool: Pool<ConnectionManager<PgConnection>>) -> Self {
		Self { db_connection_pool }
	}

	async fn run<T, F>(&self, query: F) -> Result<T, StoreError>
	where
		T: Send + 'static,
		F: FnOnce(&mut PgConnection) -> Result<T, StoreError> + Send + 'static,
	{
		let db_connection_pool = self.db_connection_pool.clone();
		let result = tokio::task::spawn_blocking(move || {
			let mut db_connection = db_connection_pool.get()?;
			query(&mut db_connection)
		})
		.await;
		match result {
			Ok(result) => result,
			Err(error) => Err(StoreError::Unavailable(Box::new(error))),
		}
	}
}

#[async_trait]
impl TicketStore for PostgresStore {
	async fn guild_settings(&self, guild_id: Id<GuildMarker>) -> Result<Option<GuildSettings>, StoreError> {
		let db_guild_id = database_id_from_discord_id(guild_id.get());
		self.run(move |db_connection| {
			let settings = guild_ticket_settings::table
				.find(db_guild_id)
				.select(GuildSettings::as_select())
				.first(db_connection)
				.optional()?;
			Ok(settings)
		})
		.await
	}

	async fn insert_guild_settings(&self, settings: &GuildSettings) -> Result<GuildSettings, StoreError> {
		let settings = settings.clone();
		self.run(move |db_connection| {
			diesel::insert_into(guild_ticket_settings::table)
				.values(&settings)
				.on_conflict(guild_ticket_settings::guild_id)
				.do_nothing()
				.execute(db_connection)?;
			let stored = guild_ticket_settings::table
				.find(settings.guild_id)
				.select(GuildSettings::as_select())
				.first(db_connection)?;
			Ok(stored)
		})
		.await
	}

	async fn update_guild_setting(&self, guild_id: Id<GuildMarker>, update: &SettingUpdate) -> Result<(), StoreError> {
		let db_guild_id = database_id_from_discord_id(guild_id.get());
		let update = update.clone();
		self.run(move |db_connection| {
			let target = guild_ticket_settings::table.find(db_guild_id);
			match update {
				SettingUpdate::PanelTitle(value) => diesel::update(target)
					.set(guild_ticket_settings::panel_title.eq(value))
					.execute(db_connection)?,
				SettingUpdate::PanelDescription(value) => diesel::update(target)
					.set(guild_ticket_settings::panel_description.eq(value))
					.execute(db_connection)?,
				SettingUpdate::PanelFooter(value) => diesel::update(target)
					.set(guild_ticket_settings::panel_footer.eq(value))
					.execute(db_connection)?,
				SettingUpdate::PanelColour(value) => diesel::update(target)
					.set(guild_ticket_settings::panel_colour.eq(value))
					.execute(db_connection)?,
				SettingUpdate::Reason(1, value) => diesel::update(target)
					.set(guild_ticket_settings::reason1.eq(value))
					.execute(db_connection)?,
				SettingUpdate::Reason(2, value) => diesel::update(target)
					.set(guild_ticket_settings::reason2.eq(value))
					.execute(db_connection)?,
				SettingUpdate::Reason(3, value) => diesel::update(target)
					.set(guild_ticket_settings::reason3.eq(value))
					.execute(db_connection)?,
				SettingUpdate::Reason(4, value) => diesel::update(target)
					.set(guild_ticket_settings::reason4.eq(value))
					.execute(db_connection)?,
				SettingUpdate::Reason(5, value) => diesel::update(target)
					.set(guild_ticket_settings::reason5.eq(value))
					.execute(db_connection)?,
				SettingUpdate::Reason(..) => 0,
				SettingUpdate::StaffRoleName(value) => diesel::update(target)
					.set(guild_ticket_settings::staff_role_name.eq(value))
					.execute(db_connection)?,
				SettingUpdate::OpenMessage(value) => diesel::update(target)
					.set(guild_ticket_settings::open_message.eq(value))
					.execute(db_connection)?,
				SettingUpdate::OpenEmbedDescription(value) => diesel::update(target)
					.set(guild_ticket_settings::open_embed_description.eq(value))
					.execute(db_connection)?,
				SettingUpdate::OpenEmbedFooter(value) => diesel::update(target)
					.set(guild_ticket_settings::open_embed_footer.eq(value))
					.execute(db_connection)?,
				SettingUpdate::OpenCategory(value) => diesel::update(target)
					.set(guild_ticket_settings::open_category.eq(value))
					.execute(db_connection)?,
				SettingUpdate::Transcript(value) => diesel::update(target)
					.set(guild_ticket_settings::transcript.eq(value))
					.execute(db_connection)?,
				SettingUpdate::TranscriptLogChannel(channel) => {
					let db_channel_id = channel.map(|channel| database_id_from_discord_id(channel.get()));
					diesel::update(target)
						.set(guild_ticket_settings::transcript_log_channel.eq(db_channel_id))
						.execute(db_connection)?
				}
			};
			Ok(())
		})
		.await
	}

	async fn open_ticket_by_author(
		&self,
		guild_id: Id<GuildMarker>,
		author_id: Id<UserMarker>,
	) -> Result<Option<TicketRecord>, StoreError> {
		let db_guild_id = database_id_from_discord_id(guild_id.get());
		let db_author_id = database_id_from_discord_id(author_id.get());
		self.run(move |db_connection| {
			let ticket = tickets::table
				.filter(
					tickets::guild_id
						.eq(db_guild_id)
						.and(tickets::author_id.eq(db_author_id))
						.and(tickets::status.eq(TicketStatus::Open)),
				)
				.select(TicketRecord::as_select())
				.first(db_connection)
				.optional()?;
			Ok(ticket)
		})
		.await
	}

	async fn ticket_by_channel(&self, channel_id: Id<ChannelMarker>) -> Result<Option<TicketRecord>, StoreError> {
		let db_channel_id = database_id_from_discord_id(channel_id.get());
		self.run(move |db_connection| {
			let ticket = tickets::table
				.filter(tickets::channel_id.eq(db_channel_id))
				.select(TicketRecord::as_select())
				.first(db_connection)
				.optional()?;
			Ok(ticket)
		})
		.await
	}

	async fn insert_ticket(&self, ticket: &TicketRecord) -> Result<(), StoreError> {
		let ticket = ticket.clone();
		self.run(move |db_connection| {
			diesel::insert_into(tickets::table)
				.values(&ticket)
				.execute(db_connection)?;
			Ok(())
		})
		.await
	}

	async fn set_ticket_status(&self, channel_id: Id<ChannelMarker>, status: TicketStatus) -> Result<(), StoreError> {
		let db_channel_id = database_id_from_discord_id(channel_id.get());
		self.run(move |db_connection| {
			diesel::update(tickets::table)
				.filter(tickets::channel_id.eq(db_channel_id))
				.set(tickets::status.eq(status))
				.execute(db_connection)?;
			Ok(())
		})
		.await
	}

	async fn remove_ticket(&self, channel_id: Id<ChannelMarker>) -> Result<bool, StoreError> {
		let db_channel_id = database_id_from_discord_id(channel_id.get());
		self.run(move |db_connection| {
			let removed = diesel::delete(tickets::table)
				.filter(tickets::channel_id.eq(db_channel_id))
				.execute(db_connection)?;
			Ok(removed > 0)
		})
		.await
	}
}

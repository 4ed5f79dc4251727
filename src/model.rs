// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::schema::{guild_ticket_settings, tickets};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, UserMarker};

/// The number of reason slots (and therefore panel buttons) a guild can configure
pub const REASON_SLOTS: usize = 5;

/// A guild's ticket configuration.
///
/// One of these exists per guild. It's created with [GuildSettings::defaults] the first time the guild is seen.
#[derive(Clone, Debug, Eq, Insertable, PartialEq, Queryable, Selectable)]
#[diesel(table_name = guild_ticket_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GuildSettings {
	/// The ID of the guild these settings belong to.
	///
	/// To get a Discord-facing version of this more easily, use [Self::get_guild_id].
	pub guild_id: i64,
	/// Title of the panel embed
	pub panel_title: String,
	/// Description of the panel embed
	pub panel_description: String,
	/// Footer of the panel embed
	pub panel_footer: String,
	/// Colour of the panel embed, either a colour name or a `#RRGGBB` hex code
	pub panel_colour: String,
	pub reason1: String,
	pub reason2: String,
	pub reason3: String,
	pub reason4: String,
	pub reason5: String,
	/// Name of the role staff members have. This is matched against role names in the guild, so renaming the role
	/// requires updating this setting.
	pub staff_role_name: String,
	/// Text sent alongside the owner mention when a ticket opens
	pub open_message: String,
	pub open_embed_description: String,
	pub open_embed_footer: String,
	/// Name of the category new ticket channels are created under
	pub open_category: String,
	/// Whether a transcript is generated when a ticket is closed
	pub transcript: bool,
	/// The ID of the channel transcripts are logged to, if one is set.
	///
	/// To get a Discord-facing version of this more easily, use [Self::get_transcript_log_channel].
	pub transcript_log_channel: Option<i64>,
}

impl GuildSettings {
	/// The settings a guild starts with
	pub fn defaults(guild_id: Id<GuildMarker>) -> Self {
		Self {
			guild_id: database_id_from_discord_id(guild_id.get()),
			panel_title: String::from("Create a Ticket!"),
			panel_description: String::from("Press a button below to open a ticket!"),
			panel_footer: String::from("Discord Ticket System"),
			panel_colour: String::from("GREY"),
			reason1: String::from("General Support"),
			reason2: String::from("Appeal Support"),
			reason3: String::from("Billing Support"),
			reason4: String::new(),
			reason5: String::new(),
			staff_role_name: String::from("Staff"),
			open_message: String::new(),
			open_embed_description: String::from(
				"Please begin writing your query, a member of staff will respond soon!",
			),
			open_embed_footer: String::from("Discord Ticket System"),
			open_category: String::from("Tickets"),
			transcript: true,
			transcript_log_channel: None,
		}
	}

	/// Gets the Discord-facing guild ID.
	///
	/// For the raw database representation, use [Self::guild_id].
	pub fn get_guild_id(&self) -> Id<GuildMarker> {
		Id::new(discord_id_from_database_id(self.guild_id))
	}

	/// Gets the channel transcripts are logged to, if one is set.
	///
	/// For the raw database representation, use [Self::transcript_log_channel].
	pub fn get_transcript_log_channel(&self) -> Option<Id<ChannelMarker>> {
		self.transcript_log_channel
			.map(|database_id| Id::new(discord_id_from_database_id(database_id)))
	}

	/// All reason labels in slot order. Empty labels are disabled slots.
	pub fn reasons(&self) -> [&str; REASON_SLOTS] {
		[
			self.reason1.as_str(),
			self.reason2.as_str(),
			self.reason3.as_str(),
			self.reason4.as_str(),
			self.reason5.as_str(),
		]
	}

	/// Gets the label for a 1-based reason slot. Returns `None` for slots out of range and for disabled slots.
	pub fn reason(&self, slot: usize) -> Option<&str> {
		let index = slot.checked_sub(1)?;
		let reason = *self.reasons().get(index)?;
		if reason.is_empty() { None } else { Some(reason) }
	}
}

#[derive(Clone, Copy, DbEnum, Debug, Eq, PartialEq)]
#[ExistingTypePath = "crate::schema::sql_types::TicketStatus"]
pub enum TicketStatus {
	Open,
	Closed,
}

impl TicketStatus {
	/// The prefix used for the names of ticket channels in this state
	pub fn channel_prefix(&self) -> &'static str {
		match self {
			Self::Open => "ticket",
			Self::Closed => "closed",
		}
	}
}

/// The database representation of a ticket and who owns it
#[derive(Clone, Debug, Eq, Insertable, PartialEq, Queryable, Selectable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TicketRecord {
	/// Ticket's ID
	pub id: String,
	/// The ID of the guild the ticket is in.
	///
	/// To get a Discord-facing version of this more easily, use [Self::get_guild_id].
	pub guild_id: i64,
	/// The ID of the user who opened the ticket.
	///
	/// To get a Discord-facing version of this more easily, use [Self::get_author_id].
	pub author_id: i64,
	/// The ID of the ticket channel.
	///
	/// To get a Discord-facing version of this more easily, use [Self::get_channel_id].
	pub channel_id: i64,
	/// The owner's name as used in the ticket channel name
	pub owner_name: String,
	/// The reason label the ticket was opened with
	pub reason: String,
	pub status: TicketStatus,
	pub opened_at: DateTime<Utc>,
}

impl TicketRecord {
	/// Gets the guild the ticket is in.
	///
	/// For the raw database representation, use [Self::guild_id].
	pub fn get_guild_id(&self) -> Id<GuildMarker> {
		Id::new(discord_id_from_database_id(self.guild_id))
	}

	/// Gets the user who opened the ticket.
	///
	/// For the raw database representation, use [Self::author_id].
	pub fn get_author_id(&self) -> Id<UserMarker> {
		Id::new(discord_id_from_database_id(self.author_id))
	}

	/// Gets the ticket channel.
	///
	/// For the raw database representation, use [Self::channel_id].
	pub fn get_channel_id(&self) -> Id<ChannelMarker> {
		Id::new(discord_id_from_database_id(self.channel_id))
	}

	/// The name the ticket channel should have in the ticket's current state
	pub fn channel_name(&self) -> String {
		self.channel_name_for(self.status)
	}

	/// The name the ticket channel should have in the given state
	pub fn channel_name_for(&self, status: TicketStatus) -> String {
		format!("{}-{}", status.channel_prefix(), self.owner_name)
	}
}

/// Converts an ID used with Discord (unsigned) to an ID for Postgres use (signed)
pub fn database_id_from_discord_id(discord_id: u64) -> i64 {
	discord_id as i64
}

/// Converts an ID retrieved from the database (signed) to an ID for use with Discord (unsigned)
pub fn discord_id_from_database_id(database_id: i64) -> u64 {
	database_id as u64
}

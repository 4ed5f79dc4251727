// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::TicketManager;
use super::components::{EmbedColour, close_button_row, closed_ticket_button_row, text_embed};
use super::permissions::{closed_ticket_overwrites, open_ticket_overwrites};
use super::platform::{IncomingMessage, NewTicketChannel, OutgoingMessage, Platform};
use super::transcript::TranscriptDelivery;
use crate::error::{StoreError, TicketError};
use crate::model::{GuildSettings, TicketRecord, TicketStatus, database_id_from_discord_id};
use crate::store::TicketStore;
use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use twilight_mention::fmt::Mention;
use twilight_model::channel::message::AllowedMentions;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, RoleMarker, UserMarker};

// Leaves room in the 100 character channel name limit for the status prefix.
const MAX_OWNER_NAME_LENGTH: usize = 90;

/// The user opening a ticket
#[derive(Clone, Debug)]
pub struct TicketUser {
	pub id: Id<UserMarker>,
	pub name: String,
}

/// The result of closing a ticket
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CloseOutcome {
	pub transcript: TranscriptDelivery,
}

/// The result of asking for a ticket to be deleted
#[derive(Debug)]
pub enum Deletion {
	/// The channel will be deleted once the delay passes, unless the ticket is reopened first
	Scheduled(JoinHandle<DeletionResult>),
	/// There's no ticket and no channel left to delete
	AlreadyGone,
}

/// What happened when a scheduled deletion fired
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeletionResult {
	Deleted,
	/// The ticket was no longer closed when the delay passed
	Aborted,
	Failed,
}

/// Makes a username safe to use in a channel name
fn owner_channel_name(username: &str) -> String {
	let mut name = String::new();
	for c in username.chars().flat_map(char::to_lowercase) {
		if c.is_alphanumeric() || c == '-' || c == '_' {
			name.push(c);
		} else if c.is_whitespace() || c == '.' {
			name.push('-');
		}
	}
	let name: String = name.chars().take(MAX_OWNER_NAME_LENGTH).collect();
	let name = name.trim_matches('-');
	if name.is_empty() {
		String::from("user")
	} else {
		String::from(name)
	}
}

fn mention_only(user_id: Id<UserMarker>) -> AllowedMentions {
	let mut allowed_mentions = AllowedMentions::default();
	allowed_mentions.users.push(user_id);
	allowed_mentions
}

fn opening_message(settings: &GuildSettings, owner: &TicketUser, reason: &str) -> Result<OutgoingMessage, TicketError> {
	let embed = text_embed(
		&format!("{} - {}", owner.name, reason),
		&settings.open_embed_description,
		&settings.open_embed_footer,
		EmbedColour::Random.resolve(),
	)?;
	let content = if settings.open_message.is_empty() {
		owner.id.mention().to_string()
	} else {
		format!("{} {}", owner.id.mention(), settings.open_message)
	};
	Ok(OutgoingMessage {
		content: Some(content),
		embeds: vec![embed],
		components: vec![close_button_row()],
		attachments: Vec::new(),
		allowed_mentions: mention_only(owner.id),
	})
}

impl<P: Platform, S: TicketStore> TicketManager<P, S> {
	async fn staff_role(&self, guild_id: Id<GuildMarker>, settings: &GuildSettings) -> Option<Id<RoleMarker>> {
		match self.platform.role_by_name(guild_id, &settings.staff_role_name).await {
			Ok(Some(role)) => Some(role),
			Ok(None) => {
				tracing::warn!(guild = %guild_id, role = %settings.staff_role_name, "Staff role not found");
				None
			}
			Err(error) => {
				tracing::warn!(source = ?error, guild = %guild_id, "Failed to look up staff role");
				None
			}
		}
	}

	async fn post_notice(&self, channel_id: Id<ChannelMarker>, message: OutgoingMessage) {
		if let Err(error) = self.platform.send_message(channel_id, &message).await {
			tracing::warn!(source = ?error, channel = %channel_id, "Failed to post ticket notice");
		}
	}

	/// Opens a ticket for the user using the reason in the given 1-based slot, returning the new channel
	pub async fn open(
		&self,
		guild_id: Id<GuildMarker>,
		owner: &TicketUser,
		reason_slot: usize,
	) -> Result<Id<ChannelMarker>, TicketError> {
		let settings = self.settings(guild_id).await?;
		let Some(reason) = settings.reason(reason_slot) else {
			return Err(TicketError::InvalidReason(reason_slot));
		};
		let Some(staff_role_id) = self.platform.role_by_name(guild_id, &settings.staff_role_name).await? else {
			return Err(TicketError::MissingStaffRole(settings.staff_role_name.clone()));
		};
		let Some(category_id) = self.platform.category_by_name(guild_id, &settings.open_category).await? else {
			return Err(TicketError::MissingCategory(settings.open_category.clone()));
		};
		if self.store.open_ticket_by_author(guild_id, owner.id).await?.is_some() {
			return Err(TicketError::DuplicateTicket);
		}

		let owner_name = owner_channel_name(&owner.name);
		let new_channel = NewTicketChannel {
			guild_id,
			name: format!("{}-{}", TicketStatus::Open.channel_prefix(), owner_name),
			parent_id: category_id,
			topic: owner.id.to_string(),
			permission_overwrites: open_ticket_overwrites(guild_id, owner.id, Some(staff_role_id)),
		};
		let channel_id = self.platform.create_ticket_channel(&new_channel).await?;

		let ticket = TicketRecord {
			id: cuid2::create_id(),
			guild_id: database_id_from_discord_id(guild_id.get()),
			author_id: database_id_from_discord_id(owner.id.get()),
			channel_id: database_id_from_discord_id(channel_id.get()),
			owner_name,
			reason: String::from(reason),
			status: TicketStatus::Open,
			opened_at: Utc::now(),
		};
		if let Err(error) = self.store.insert_ticket(&ticket).await {
			// The channel would otherwise be orphaned with nothing recording who owns it.
			if let Err(delete_error) = self.platform.delete_channel(channel_id, "Ticket could not be recorded").await {
				tracing::error!(source = ?delete_error, channel = %channel_id, "Failed to remove unrecorded ticket channel");
			}
			return Err(match error {
				StoreError::Duplicate => TicketError::DuplicateTicket,
				error => TicketError::Store(error),
			});
		}
		tracing::info!(guild = %guild_id, user = %owner.id, channel = %channel_id, reason, "Opened ticket");

		match opening_message(&settings, owner, reason) {
			Ok(message) => self.post_notice(channel_id, message).await,
			Err(error) => tracing::warn!(source = ?error, "Ticket opening message failed validation"),
		}

		Ok(channel_id)
	}

	/// Closes the open ticket in the channel
	pub async fn close(
		&self,
		channel_id: Id<ChannelMarker>,
		closed_by: Id<UserMarker>,
	) -> Result<CloseOutcome, TicketError> {
		let ticket = match self.store.ticket_by_channel(channel_id).await? {
			Some(ticket) if ticket.status == TicketStatus::Open => ticket,
			_ => return Err(TicketError::NotATicket),
		};
		let guild_id = ticket.get_guild_id();
		let settings = self.settings(guild_id).await?;

		let transcript = if settings.transcript {
			self.deliver_transcript(&settings, &ticket, closed_by).await
		} else {
			TranscriptDelivery::Disabled
		};

		let staff_role_id = self.staff_role(guild_id, &settings).await;
		let closed_name = ticket.channel_name_for(TicketStatus::Closed);
		let overwrites = closed_ticket_overwrites(guild_id, staff_role_id);
		if let Err(error) = self
			.platform
			.update_ticket_channel(channel_id, &closed_name, &overwrites, "Ticket Closed")
			.await
		{
			tracing::error!(source = ?error, channel = %channel_id, "Failed to update closed ticket channel");
		}

		self.store.set_ticket_status(channel_id, TicketStatus::Closed).await?;
		tracing::info!(channel = %channel_id, user = %closed_by, ?transcript, "Closed ticket");

		let notice = OutgoingMessage {
			content: Some(format!("This ticket was closed by {}.", closed_by.mention())),
			components: vec![closed_ticket_button_row()],
			..Default::default()
		};
		self.post_notice(channel_id, notice).await;

		Ok(CloseOutcome { transcript })
	}

	/// Reopens the closed ticket in the channel, giving the owner their access back
	pub async fn reopen(&self, channel_id: Id<ChannelMarker>, reopened_by: Id<UserMarker>) -> Result<(), TicketError> {
		let ticket = match self.store.ticket_by_channel(channel_id).await? {
			Some(ticket) if ticket.status == TicketStatus::Closed => ticket,
			_ => return Err(TicketError::NotClosed),
		};
		let guild_id = ticket.get_guild_id();
		let owner_id = ticket.get_author_id();
		if self.store.open_ticket_by_author(guild_id, owner_id).await?.is_some() {
			return Err(TicketError::DuplicateTicket);
		}
		match self.store.set_ticket_status(channel_id, TicketStatus::Open).await {
			Ok(()) => (),
			Err(StoreError::Duplicate) => return Err(TicketError::DuplicateTicket),
			Err(error) => return Err(error.into()),
		}

		let settings = self.settings(guild_id).await?;
		let staff_role_id = self.staff_role(guild_id, &settings).await;
		let open_name = ticket.channel_name_for(TicketStatus::Open);
		let overwrites = open_ticket_overwrites(guild_id, owner_id, staff_role_id);
		if let Err(error) = self
			.platform
			.update_ticket_channel(channel_id, &open_name, &overwrites, "Ticket Reopened")
			.await
		{
			tracing::error!(source = ?error, channel = %channel_id, "Failed to update reopened ticket channel");
		}
		tracing::info!(channel = %channel_id, user = %reopened_by, "Reopened ticket");

		let notice = OutgoingMessage {
			content: Some(format!(
				"{}, this ticket was reopened by {}.",
				owner_id.mention(),
				reopened_by.mention()
			)),
			components: vec![close_button_row()],
			allowed_mentions: mention_only(owner_id),
			..Default::default()
		};
		self.post_notice(channel_id, notice).await;

		Ok(())
	}

	/// Schedules deletion of the closed ticket in the channel.
	///
	/// The ticket is checked again when the delay passes, so reopening it in the meantime cancels the deletion.
	pub async fn delete_ticket(&self, channel_id: Id<ChannelMarker>) -> Result<Deletion, TicketError> {
		match self.store.ticket_by_channel(channel_id).await? {
			Some(ticket) if ticket.status == TicketStatus::Closed => (),
			Some(_) => return Err(TicketError::NotClosed),
			None => {
				if self.platform.channel_exists(channel_id).await? {
					return Err(TicketError::NotClosed);
				}
				return Ok(Deletion::AlreadyGone);
			}
		}

		tracing::info!(channel = %channel_id, delay = ?self.timing.delete_delay, "Scheduled ticket deletion");
		let manager = self.clone();
		let handle = tokio::spawn(async move { manager.finish_deletion(channel_id).await });
		Ok(Deletion::Scheduled(handle))
	}

	async fn finish_deletion(&self, channel_id: Id<ChannelMarker>) -> DeletionResult {
		sleep(self.timing.delete_delay).await;

		match self.store.ticket_by_channel(channel_id).await {
			Ok(Some(ticket)) if ticket.status == TicketStatus::Closed => (),
			Ok(_) => {
				tracing::info!(channel = %channel_id, "Ticket no longer closed; not deleting it");
				return DeletionResult::Aborted;
			}
			Err(error) => {
				tracing::error!(source = ?error, channel = %channel_id, "Failed to recheck ticket before deletion");
				return DeletionResult::Failed;
			}
		}

		if let Err(error) = self.platform.delete_channel(channel_id, "Ticket Deleted").await {
			tracing::error!(source = ?error, channel = %channel_id, "Failed to delete ticket channel");
			return DeletionResult::Failed;
		}
		if let Err(error) = self.store.remove_ticket(channel_id).await {
			tracing::error!(source = ?error, channel = %channel_id, "Failed to remove deleted ticket");
			return DeletionResult::Failed;
		}
		tracing::info!(channel = %channel_id, "Deleted ticket");
		DeletionResult::Deleted
	}

	/// Pings the ticket owner when staff reply in their open ticket. The ping is removed again shortly after, so it
	/// only serves as a notification.
	///
	/// Returns whether the owner was pinged.
	pub async fn alert_owner(&self, message: &IncomingMessage) -> Result<bool, TicketError> {
		if message.author_is_bot {
			return Ok(false);
		}
		let Some(guild_id) = message.guild_id else {
			return Ok(false);
		};
		let ticket = match self.store.ticket_by_channel(message.channel_id).await? {
			Some(ticket) if ticket.status == TicketStatus::Open => ticket,
			_ => return Ok(false),
		};
		let owner_id = ticket.get_author_id();
		if message.author_id == owner_id {
			return Ok(false);
		}

		let settings = self.settings(guild_id).await?;
		let Some(staff_role_id) = self.platform.role_by_name(guild_id, &settings.staff_role_name).await? else {
			return Ok(false);
		};
		if !message.member_roles.contains(&staff_role_id) {
			return Ok(false);
		}

		let ping = OutgoingMessage {
			content: Some(format!("A new reply has been added to your ticket {}", owner_id.mention())),
			allowed_mentions: mention_only(owner_id),
			..Default::default()
		};
		let ping_id = self.platform.send_message(message.channel_id, &ping).await?;
		sleep(self.timing.owner_ping_lifetime).await;
		if let Err(error) = self.platform.delete_message(message.channel_id, ping_id).await {
			tracing::warn!(source = ?error, channel = %message.channel_id, "Failed to remove owner ping");
		}
		Ok(true)
	}

	/// Drops the ticket for a channel that was deleted, returning whether there was one
	pub async fn forget_channel(&self, channel_id: Id<ChannelMarker>) -> Result<bool, TicketError> {
		let removed = self.store.remove_ticket(channel_id).await?;
		if removed {
			tracing::info!(channel = %channel_id, "Removed ticket for deleted channel");
		}
		Ok(removed)
	}
}

// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ticket actions shared by slash commands and buttons, returning the text to reply with.

use crate::discord::Tickets;
use crate::error::TicketError;
use crate::tickets::{Deletion, TicketUser, TranscriptDelivery};
use twilight_mention::fmt::Mention;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, UserMarker};
use twilight_model::user::User;

pub async fn open_ticket(tickets: &Tickets, guild_id: Id<GuildMarker>, user: &User, slot: usize) -> Result<String, TicketError> {
	let owner = TicketUser {
		id: user.id,
		name: user.name.clone(),
	};
	let channel_id = tickets.open(guild_id, &owner, slot).await?;
	Ok(format!("Your ticket has been opened: {}", channel_id.mention()))
}

pub async fn close_ticket(
	tickets: &Tickets,
	channel_id: Id<ChannelMarker>,
	closed_by: Id<UserMarker>,
) -> Result<String, TicketError> {
	let outcome = tickets.close(channel_id, closed_by).await?;
	let message = match outcome.transcript {
		TranscriptDelivery::Disabled => "Ticket closed.",
		TranscriptDelivery::Failed => "Ticket closed. A transcript couldn't be made.",
		TranscriptDelivery::Sent {
			owner_notified: false,
			..
		} => "Ticket closed. The transcript couldn't be sent to the ticket owner.",
		TranscriptDelivery::Sent { .. } => "Ticket closed and transcript sent.",
	};
	Ok(String::from(message))
}

pub async fn reopen_ticket(
	tickets: &Tickets,
	channel_id: Id<ChannelMarker>,
	reopened_by: Id<UserMarker>,
) -> Result<String, TicketError> {
	tickets.reopen(channel_id, reopened_by).await?;
	Ok(String::from("Ticket reopened."))
}

pub async fn delete_ticket(tickets: &Tickets, channel_id: Id<ChannelMarker>) -> Result<String, TicketError> {
	let message = match tickets.delete_ticket(channel_id).await? {
		// The deletion carries on without anyone waiting for it.
		Deletion::Scheduled(_) => "This ticket will be deleted in a few seconds.",
		Deletion::AlreadyGone => "This ticket has already been deleted.",
	};
	Ok(String::from(message))
}

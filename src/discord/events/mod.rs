// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::Tickets;
use crate::tickets::platform::IncomingMessage;
use twilight_model::gateway::payload::incoming::{ChannelDelete, MessageCreate};

/// Lets a ticket owner know when staff reply in their ticket
pub async fn handle_message(message: &MessageCreate, tickets: &Tickets) -> miette::Result<()> {
	let incoming = IncomingMessage {
		guild_id: message.guild_id,
		channel_id: message.channel_id,
		author_id: message.author.id,
		author_is_bot: message.author.bot,
		member_roles: message
			.member
			.as_ref()
			.map(|member| member.roles.clone())
			.unwrap_or_default(),
	};
	tickets.alert_owner(&incoming).await?;
	Ok(())
}

/// Forgets tickets whose channels were deleted by someone other than the bot
pub async fn handle_channel_delete(channel: &ChannelDelete, tickets: &Tickets) -> miette::Result<()> {
	tickets.forget_channel(channel.id).await?;
	Ok(())
}

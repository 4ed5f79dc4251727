// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::Tickets;
use super::utils::responses::DeferredReply;
use super::utils::tickets::{close_ticket, delete_ticket, open_ticket, reopen_ticket};
use crate::tickets::components::TICKET_COMPONENT_PREFIX;
use miette::bail;
use twilight_http::client::Client;
use twilight_model::application::interaction::message_component::MessageComponentInteractionData;
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;

/// What a ticket button asks for
#[derive(Debug, Eq, PartialEq)]
enum TicketButton {
	Open(usize),
	Close,
	Reopen,
	Delete,
}

fn parse_ticket_button(custom_id_path: &[&str]) -> Option<TicketButton> {
	match custom_id_path {
		[prefix, "open", slot] if *prefix == TICKET_COMPONENT_PREFIX => slot.parse().ok().map(TicketButton::Open),
		[prefix, "close"] if *prefix == TICKET_COMPONENT_PREFIX => Some(TicketButton::Close),
		[prefix, "reopen"] if *prefix == TICKET_COMPONENT_PREFIX => Some(TicketButton::Reopen),
		[prefix, "delete"] if *prefix == TICKET_COMPONENT_PREFIX => Some(TicketButton::Delete),
		_ => None,
	}
}

pub async fn route_interaction(
	interaction: &InteractionCreate,
	interaction_data: &MessageComponentInteractionData,
	http_client: &Client,
	application_id: Id<ApplicationMarker>,
	tickets: &Tickets,
) -> miette::Result<()> {
	let custom_id_path: Vec<&str> = interaction_data.custom_id.split('/').collect();
	let Some(button) = parse_ticket_button(&custom_id_path) else {
		bail!("Unknown interaction encountered: {}", interaction_data.custom_id);
	};
	let Some(guild_id) = interaction.guild_id else {
		bail!("Ticket button was used outside of a guild");
	};
	let Some(channel_id) = interaction.channel.as_ref().map(|channel| channel.id) else {
		bail!("Ticket button was used without a channel");
	};
	let Some(user) = interaction.author() else {
		bail!("Ticket button was used without a user");
	};

	let reply = DeferredReply::start(interaction, http_client, application_id).await?;
	let result = match button {
		TicketButton::Open(slot) => open_ticket(tickets, guild_id, user, slot).await,
		TicketButton::Close => close_ticket(tickets, channel_id, user.id).await,
		TicketButton::Reopen => reopen_ticket(tickets, channel_id, user.id).await,
		TicketButton::Delete => delete_ticket(tickets, channel_id).await,
	};
	reply.finish(result).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tickets::components::{close_ticket_custom_id, delete_ticket_custom_id, open_ticket_custom_id, reopen_ticket_custom_id};

	fn parse(custom_id: &str) -> Option<TicketButton> {
		let path: Vec<&str> = custom_id.split('/').collect();
		parse_ticket_button(&path)
	}

	#[test]
	fn button_ids_route_back_to_their_action() {
		assert_eq!(parse(&open_ticket_custom_id(3)), Some(TicketButton::Open(3)));
		assert_eq!(parse(&close_ticket_custom_id()), Some(TicketButton::Close));
		assert_eq!(parse(&reopen_ticket_custom_id()), Some(TicketButton::Reopen));
		assert_eq!(parse(&delete_ticket_custom_id()), Some(TicketButton::Delete));
	}

	#[test]
	fn unknown_button_ids_are_ignored() {
		assert_eq!(parse("ticket/open/three"), None);
		assert_eq!(parse("setup/abc/admin_role"), None);
		assert_eq!(parse("ticket"), None);
	}
}

// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::discord::Tickets;
use crate::discord::utils::responses::DeferredReply;
use crate::discord::utils::tickets::{close_ticket, delete_ticket, open_ticket, reopen_ticket};
use crate::model::REASON_SLOTS;
use miette::bail;
use twilight_http::client::Client;
use twilight_model::application::command::{Command, CommandType};
use twilight_model::application::interaction::InteractionContextType;
use twilight_model::application::interaction::application_command::{CommandData, CommandDataOption, CommandOptionValue};
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;
use twilight_util::builder::command::{CommandBuilder, IntegerBuilder, SubCommandBuilder};

pub fn command_definition() -> Command {
	let reason = IntegerBuilder::new("reason", "The number of the reason to open the ticket for")
		.required(true)
		.min_value(1)
		.max_value(REASON_SLOTS as i64);
	CommandBuilder::new("ticket", "Open and manage support tickets", CommandType::ChatInput)
		.contexts([InteractionContextType::Guild])
		.option(SubCommandBuilder::new("open", "Open a support ticket").option(reason))
		.option(SubCommandBuilder::new("close", "Close this ticket"))
		.option(SubCommandBuilder::new("reopen", "Reopen this closed ticket"))
		.option(SubCommandBuilder::new("delete", "Delete this closed ticket"))
		.build()
}

fn reason_slot(options: &[CommandDataOption]) -> usize {
	options
		.iter()
		.find(|option| option.name == "reason")
		.and_then(|option| match option.value {
			CommandOptionValue::Integer(slot) => usize::try_from(slot).ok(),
			_ => None,
		})
		.unwrap_or(0)
}

pub async fn handle_command(
	interaction: &InteractionCreate,
	command_data: &CommandData,
	http_client: &Client,
	application_id: Id<ApplicationMarker>,
	tickets: &Tickets,
) -> miette::Result<()> {
	let Some(guild_id) = interaction.guild_id else {
		bail!("Ticket command was used outside of a guild");
	};
	let Some(channel_id) = interaction.channel.as_ref().map(|channel| channel.id) else {
		bail!("Ticket command was used without a channel");
	};
	let Some(user) = interaction.author() else {
		bail!("Ticket command was used without a user");
	};
	let Some(subcommand) = command_data.options.first() else {
		bail!("Ticket command invoked with no subcommand");
	};
	let CommandOptionValue::SubCommand(options) = &subcommand.value else {
		bail!("Ticket command option {} wasn't a subcommand", subcommand.name);
	};
	if !matches!(subcommand.name.as_str(), "open" | "close" | "reopen" | "delete") {
		bail!("Unknown ticket subcommand encountered: {}", subcommand.name);
	}

	let reply = DeferredReply::start(interaction, http_client, application_id).await?;
	let result = match subcommand.name.as_str() {
		"open" => open_ticket(tickets, guild_id, user, reason_slot(options)).await,
		"close" => close_ticket(tickets, channel_id, user.id).await,
		"reopen" => reopen_ticket(tickets, channel_id, user.id).await,
		_ => delete_ticket(tickets, channel_id).await,
	};
	reply.finish(result).await
}

// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::discord::Tickets;
use crate::discord::utils::responses::DeferredReply;
use miette::bail;
use twilight_http::client::Client;
use twilight_mention::fmt::Mention;
use twilight_model::application::command::{Command, CommandType};
use twilight_model::application::interaction::InteractionContextType;
use twilight_model::application::interaction::application_command::{CommandData, CommandOptionValue};
use twilight_model::channel::ChannelType;
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::guild::Permissions;
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;
use twilight_util::builder::command::{ChannelBuilder, CommandBuilder};

pub fn command_definition() -> Command {
	let channel = ChannelBuilder::new("channel", "The channel to post the ticket panel in. Its recent messages are cleared.")
		.required(true)
		.channel_types([ChannelType::GuildText]);
	CommandBuilder::new(
		"ticket_panel",
		"Post the panel people use to open tickets",
		CommandType::ChatInput,
	)
	.contexts([InteractionContextType::Guild])
	.default_member_permissions(Permissions::MANAGE_GUILD)
	.option(channel)
	.build()
}

pub async fn handle_command(
	interaction: &InteractionCreate,
	command_data: &CommandData,
	http_client: &Client,
	application_id: Id<ApplicationMarker>,
	tickets: &Tickets,
) -> miette::Result<()> {
	let Some(guild_id) = interaction.guild_id else {
		bail!("Ticket panel command was used outside of a guild");
	};
	let Some(option) = command_data.options.first() else {
		bail!("Ticket panel command received without required options");
	};
	let CommandOptionValue::Channel(channel_id) = option.value else {
		bail!("Ticket panel argument channel wasn't a channel");
	};

	let reply = DeferredReply::start(interaction, http_client, application_id).await?;
	let result = tickets
		.publish_panel(guild_id, channel_id)
		.await
		.map(|_| format!("The ticket panel was posted in {}.", channel_id.mention()));
	reply.finish(result).await
}

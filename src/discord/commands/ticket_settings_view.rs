// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::discord::Tickets;
use crate::discord::utils::responses::{DeferredReply, error_message};
use crate::error::TicketError;
use crate::model::GuildSettings;
use crate::tickets::settings::describe_settings;
use miette::bail;
use twilight_http::client::Client;
use twilight_model::application::command::{Command, CommandType};
use twilight_model::application::interaction::InteractionContextType;
use twilight_model::channel::message::embed::Embed;
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::guild::Permissions;
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;
use twilight_util::builder::command::CommandBuilder;
use twilight_util::builder::embed::EmbedBuilder;

const SETTINGS_EMBED_COLOUR: u32 = 0x5865f2;

pub fn command_definition() -> Command {
	CommandBuilder::new("ticket_settings_view", "Show the ticket settings", CommandType::ChatInput)
		.contexts([InteractionContextType::Guild])
		.default_member_permissions(Permissions::MANAGE_GUILD)
		.build()
}

fn settings_embed(settings: &GuildSettings) -> Result<Embed, TicketError> {
	let embed = EmbedBuilder::new()
		.title("Ticket Settings")
		.description(describe_settings(settings))
		.color(SETTINGS_EMBED_COLOUR)
		.validate()?
		.build();
	Ok(embed)
}

pub async fn handle_command(
	interaction: &InteractionCreate,
	http_client: &Client,
	application_id: Id<ApplicationMarker>,
	tickets: &Tickets,
) -> miette::Result<()> {
	let Some(guild_id) = interaction.guild_id else {
		bail!("Ticket settings view command was used outside of a guild");
	};

	let reply = DeferredReply::start(interaction, http_client, application_id).await?;
	let embed = tickets
		.settings(guild_id)
		.await
		.and_then(|settings| settings_embed(&settings));
	match embed {
		Ok(embed) => reply.send_embed(embed).await,
		Err(error) => reply.send(&error_message(&error)).await,
	}
}

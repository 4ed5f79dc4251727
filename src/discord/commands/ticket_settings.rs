// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::discord::Tickets;
use crate::discord::utils::responses::DeferredReply;
use crate::tickets::settings::SETTING_KEYS;
use miette::bail;
use twilight_http::client::Client;
use twilight_model::application::command::{Command, CommandType};
use twilight_model::application::interaction::InteractionContextType;
use twilight_model::application::interaction::application_command::{CommandData, CommandOptionValue};
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::guild::Permissions;
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;
use twilight_util::builder::command::{CommandBuilder, StringBuilder};

pub fn command_definition() -> Command {
	let option = StringBuilder::new("option", "The setting to change")
		.required(true)
		.choices(SETTING_KEYS.iter().map(|(key, description)| (*description, *key)));
	let value = StringBuilder::new(
		"value",
		"The new value. Leave out to clear the setting (clearing a reason removes its button).",
	);
	CommandBuilder::new("ticket_settings", "Change a ticket setting", CommandType::ChatInput)
		.contexts([InteractionContextType::Guild])
		.default_member_permissions(Permissions::MANAGE_GUILD)
		.option(option)
		.option(value)
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
		bail!("Ticket settings command was used outside of a guild");
	};

	let mut key = None;
	let mut value = "";
	for option in command_data.options.iter() {
		match (option.name.as_str(), &option.value) {
			("option", CommandOptionValue::String(option_key)) => key = Some(option_key.as_str()),
			("value", CommandOptionValue::String(option_value)) => value = option_value.as_str(),
			_ => bail!("Ticket settings command received an unexpected option: {:?}", option),
		}
	}
	let Some(key) = key else {
		bail!("Ticket settings command received without required option option");
	};

	let reply = DeferredReply::start(interaction, http_client, application_id).await?;
	let result = tickets
		.update_setting(guild_id, key, value)
		.await
		.map(|_| format!("Updated `{}`.", key.to_ascii_lowercase()));
	reply.finish(result).await
}

// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::Tickets;
use miette::bail;
use twilight_http::client::Client;
use twilight_model::application::command::Command;
use twilight_model::application::interaction::application_command::CommandData;
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;

mod ticket;
mod ticket_panel;
mod ticket_settings;
mod ticket_settings_view;

pub fn command_definitions() -> Vec<Command> {
	vec![
		ticket::command_definition(),
		ticket_panel::command_definition(),
		ticket_settings::command_definition(),
		ticket_settings_view::command_definition(),
	]
}

pub async fn route_command(
	interaction: &InteractionCreate,
	command_data: &CommandData,
	http_client: &Client,
	application_id: Id<ApplicationMarker>,
	tickets: &Tickets,
) -> miette::Result<()> {
	match command_data.name.as_str() {
		"ticket" => ticket::handle_command(interaction, command_data, http_client, application_id, tickets).await,
		"ticket_panel" => {
			ticket_panel::handle_command(interaction, command_data, http_client, application_id, tickets).await
		}
		"ticket_settings" => {
			ticket_settings::handle_command(interaction, command_data, http_client, application_id, tickets).await
		}
		"ticket_settings_view" => {
			ticket_settings_view::handle_command(interaction, http_client, application_id, tickets).await
		}
		_ => bail!("Unknown command encountered: {}\n{:?}", command_data.name, command_data),
	}
}

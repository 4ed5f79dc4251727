// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::TicketError;
use miette::IntoDiagnostic;
use twilight_http::client::Client;
use twilight_model::channel::message::embed::Embed;
use twilight_model::channel::message::{AllowedMentions, MessageFlags};
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;
use twilight_util::builder::InteractionResponseDataBuilder;

pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred handling this command.";

/// The text shown to the user for a failed ticket operation. Internal errors are logged instead of shown.
pub fn error_message(error: &TicketError) -> String {
	if error.is_internal() {
		tracing::error!(source = ?error, "Ticket operation failed");
		String::from(INTERNAL_ERROR_MESSAGE)
	} else {
		error.to_string()
	}
}

/// A private reply to an interaction that's acknowledged first and filled in once the work is done.
///
/// Ticket operations can take longer than Discord waits for an initial response (transcripts especially), so every
/// ticket interaction is answered this way.
pub struct DeferredReply<'a> {
	http_client: &'a Client,
	application_id: Id<ApplicationMarker>,
	token: &'a str,
}

impl<'a> DeferredReply<'a> {
	pub async fn start(
		interaction: &'a InteractionCreate,
		http_client: &'a Client,
		application_id: Id<ApplicationMarker>,
	) -> miette::Result<Self> {
		let response = InteractionResponse {
			kind: InteractionResponseType::DeferredChannelMessageWithSource,
			data: Some(InteractionResponseDataBuilder::new().flags(MessageFlags::EPHEMERAL).build()),
		};
		http_client
			.interaction(application_id)
			.create_response(interaction.id, &interaction.token, &response)
			.await
			.into_diagnostic()?;
		Ok(Self {
			http_client,
			application_id,
			token: &interaction.token,
		})
	}

	pub async fn send(&self, content: &str) -> miette::Result<()> {
		self.http_client
			.interaction(self.application_id)
			.update_response(self.token)
			.content(Some(content))
			.allowed_mentions(Some(&AllowedMentions::default()))
			.await
			.into_diagnostic()?;
		Ok(())
	}

	pub async fn send_embed(&self, embed: Embed) -> miette::Result<()> {
		self.http_client
			.interaction(self.application_id)
			.update_response(self.token)
			.embeds(Some(&[embed]))
			.allowed_mentions(Some(&AllowedMentions::default()))
			.await
			.into_diagnostic()?;
		Ok(())
	}

	/// Replies with the outcome of a ticket operation
	pub async fn finish(&self, result: Result<String, TicketError>) -> miette::Result<()> {
		let content = match result {
			Ok(content) => content,
			Err(error) => error_message(&error),
		};
		self.send(&content).await
	}
}

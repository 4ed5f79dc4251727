// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::TicketManager;
use super::components::text_embed;
use super::platform::{HistoryMessage, OutgoingMessage, Platform};
use crate::model::{GuildSettings, TicketRecord};
use crate::store::TicketStore;
use twilight_mention::fmt::Mention;
use twilight_model::http::attachment::Attachment;
use twilight_model::id::Id;
use twilight_model::id::marker::UserMarker;

const CLOSED_EMBED_COLOUR: u32 = 0xed4245;
const LOG_FALLBACK_NOTE: &str =
	"Could not log the transcript! Check that a transcript log channel is set. The transcript is attached below.";

/// Where a closed ticket's transcript ended up
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TranscriptDelivery {
	/// Transcripts are turned off for the guild
	Disabled,
	/// The channel history couldn't be read, so no transcript was made
	Failed,
	Sent {
		/// Whether the ticket owner got a copy by DM
		owner_notified: bool,
		destination: TranscriptDestination,
	},
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TranscriptDestination {
	LogChannel,
	/// The log channel wasn't usable, so the transcript was posted in the ticket itself
	TicketChannel,
	Nowhere,
}

fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			c => escaped.push(c),
		}
	}
	escaped
}

const TRANSCRIPT_STYLE: &str = "body{background:#313338;color:#dbdee1;font-family:sans-serif;margin:2em}\
.message{padding:.4em 0;border-bottom:1px solid #3f4147}.author{font-weight:bold;color:#f2f3f5}\
.bot{background:#5865f2;color:#fff;border-radius:3px;font-size:.7em;padding:0 .3em;margin-left:.3em}\
time{color:#949ba4;font-size:.8em;margin-left:.5em}.content{white-space:pre-wrap;margin-top:.2em}\
.note{color:#949ba4;font-style:italic}";

/// Renders a channel's history as a standalone HTML document
pub fn render_transcript(channel_name: &str, messages: &[HistoryMessage]) -> String {
	let channel_name = escape_html(channel_name);
	let mut html = format!(
		"<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>#{0}</title>\n<style>{1}</style>\n</head>\n<body>\n<h1>#{0}</h1>\n<p class=\"note\">{2} message{3}</p>\n",
		channel_name,
		TRANSCRIPT_STYLE,
		messages.len(),
		if messages.len() == 1 { "" } else { "s" }
	);
	for message in messages {
		html.push_str(&format!("<div class=\"message\" id=\"m{}\">\n<div class=\"meta\">", message.id));
		html.push_str(&format!(
			"<span class=\"author\" title=\"{}\">{}</span>",
			message.author_id,
			escape_html(&message.author_name)
		));
		if message.author_is_bot {
			html.push_str("<span class=\"bot\">BOT</span>");
		}
		html.push_str(&format!(
			"<time datetime=\"{}\">{}</time></div>\n",
			message.sent_at.to_rfc3339(),
			message.sent_at.format("%Y-%m-%d %H:%M UTC")
		));
		if !message.content.is_empty() {
			html.push_str(&format!("<div class=\"content\">{}</div>\n", escape_html(&message.content)));
		}
		for attachment in message.attachment_names.iter() {
			html.push_str(&format!("<div class=\"note\">Attachment: {}</div>\n", escape_html(attachment)));
		}
		if message.embed_count > 0 {
			html.push_str(&format!(
				"<div class=\"note\">{} embed{}</div>\n",
				message.embed_count,
				if message.embed_count == 1 { "" } else { "s" }
			));
		}
		html.push_str("</div>\n");
	}
	html.push_str("</body>\n</html>\n");
	html
}

fn transcript_attachment(channel_name: &str, html: &str) -> Attachment {
	Attachment::from_bytes(
		format!("transcript-{}.html", channel_name),
		html.as_bytes().to_vec(),
		0,
	)
}

impl<P: Platform, S: TicketStore> TicketManager<P, S> {
	/// Makes a transcript of the ticket and sends it to the owner and the log channel.
	///
	/// Every step is independent; failures are logged and reported in the result rather than returned.
	pub(super) async fn deliver_transcript(
		&self,
		settings: &GuildSettings,
		ticket: &TicketRecord,
		closed_by: Id<UserMarker>,
	) -> TranscriptDelivery {
		let channel_id = ticket.get_channel_id();
		let channel_name = ticket.channel_name();
		let history = match self.platform.message_history(channel_id).await {
			Ok(history) => history,
			Err(error) => {
				tracing::warn!(source = ?error, channel = %channel_id, "Failed to read ticket history for a transcript");
				return TranscriptDelivery::Failed;
			}
		};
		let html = render_transcript(&channel_name, &history);
		let attachment = transcript_attachment(&channel_name, &html);

		let guild_id = ticket.get_guild_id();
		let guild_name = match self.platform.guild_name(guild_id).await {
			Ok(name) => name,
			Err(error) => {
				tracing::debug!(source = ?error, guild = %guild_id, "Couldn't get guild name for transcript DM");
				String::from("the server's")
			}
		};
		let owner_message = OutgoingMessage {
			content: Some(format!(
				"Thank you for contacting {} support! A copy of the chat transcript can be downloaded below.",
				guild_name
			)),
			attachments: vec![attachment.clone()],
			..Default::default()
		};
		let owner_id = ticket.get_author_id();
		let owner_notified = match self.platform.send_direct_message(owner_id, &owner_message).await {
			Ok(()) => true,
			Err(error) => {
				// Owners with closed DMs or who left the server are expected here.
				tracing::info!(source = ?error, user = %owner_id, "Couldn't DM transcript to ticket owner");
				false
			}
		};

		let mut destination = TranscriptDestination::Nowhere;
		if let Some(log_channel_id) = settings.get_transcript_log_channel() {
			let description = format!(
				"Ticket created by: {}\nTicket closed by: {}\nTicket name: {}\nReason: {}",
				owner_id.mention(),
				closed_by.mention(),
				channel_name,
				ticket.reason
			);
			let embed = text_embed(
				"Ticket Closed",
				&description,
				&settings.open_embed_footer,
				CLOSED_EMBED_COLOUR,
			);
			match embed {
				Ok(embed) => {
					let log_message = OutgoingMessage {
						embeds: vec![embed],
						attachments: vec![attachment.clone()],
						..Default::default()
					};
					match self.platform.send_message(log_channel_id, &log_message).await {
						Ok(_) => destination = TranscriptDestination::LogChannel,
						Err(error) => {
							tracing::warn!(source = ?error, channel = %log_channel_id, "Failed to post transcript to log channel")
						}
					}
				}
				Err(error) => tracing::warn!(source = ?error, "Closed ticket embed failed validation"),
			}
		}

		if destination == TranscriptDestination::Nowhere {
			let fallback_message = OutgoingMessage {
				content: Some(String::from(LOG_FALLBACK_NOTE)),
				attachments: vec![attachment],
				..Default::default()
			};
			match self.platform.send_message(channel_id, &fallback_message).await {
				Ok(_) => destination = TranscriptDestination::TicketChannel,
				Err(error) => {
					tracing::warn!(source = ?error, channel = %channel_id, "Failed to post transcript to ticket channel")
				}
			}
		}

		TranscriptDelivery::Sent {
			owner_notified,
			destination,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{TimeZone, Utc};

	fn history_message(id: u64, author: &str, content: &str) -> HistoryMessage {
		HistoryMessage {
			id: Id::new(id),
			author_id: Id::new(100 + id),
			author_name: String::from(author),
			author_is_bot: false,
			content: String::from(content),
			sent_at: Utc.with_ymd_and_hms(2025, 3, 4, 12, 30, 0).unwrap(),
			attachment_names: Vec::new(),
			embed_count: 0,
		}
	}

	#[test]
	fn transcript_escapes_markup() {
		let messages = vec![history_message(1, "<script>", "a < b & \"c\"")];
		let html = render_transcript("ticket-someone", &messages);
		assert!(html.contains("&lt;script&gt;"));
		assert!(html.contains("a &lt; b &amp; &quot;c&quot;"));
		assert!(!html.contains("<script>"));
	}

	#[test]
	fn transcript_keeps_message_order_and_notes() {
		let mut second = history_message(2, "staff", "Second");
		second.author_is_bot = true;
		second.attachment_names.push(String::from("log.txt"));
		second.embed_count = 2;
		let messages = vec![history_message(1, "owner", "First"), second];
		let html = render_transcript("ticket-owner", &messages);

		let first_at = html.find("First").unwrap();
		let second_at = html.find("Second").unwrap();
		assert!(first_at < second_at);
		assert!(html.contains("2 messages"));
		assert!(html.contains("Attachment: log.txt"));
		assert!(html.contains("2 embeds"));
		assert!(html.contains("2025-03-04 12:30 UTC"));
		assert!(html.contains("class=\"bot\""));
	}

	#[test]
	fn messages_can_be_linked_by_id() {
		let messages = vec![history_message(7, "owner", "Linked")];
		let html = render_transcript("ticket-owner", &messages);
		assert!(html.contains("<div class=\"message\" id=\"m7\">"));
	}

	#[test]
	fn attachment_is_named_after_the_channel() {
		let attachment = transcript_attachment("ticket-owner", "<html></html>");
		assert_eq!(attachment.filename, "transcript-ticket-owner.html");
		assert_eq!(attachment.file, b"<html></html>".to_vec());
	}
}

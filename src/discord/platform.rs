// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::utils::timestamp::{datetime_from_id, datetime_from_timestamp};
use crate::error::PlatformError;
use crate::tickets::platform::{HistoryMessage, NewTicketChannel, OutgoingMessage, Platform};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use twilight_http::client::Client;
use twilight_http::error::ErrorType;
use twilight_http::request::AuditLogReason;
use twilight_model::channel::{ChannelType, Message};
use twilight_model::channel::permission_overwrite::PermissionOverwrite;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, MessageMarker, RoleMarker, UserMarker};

/// Discord only fetches this many messages per request
const MESSAGE_PAGE_SIZE: u16 = 100;
/// Caps how far back transcripts go
const MAX_HISTORY_PAGES: usize = 10;
/// Discord refuses to bulk delete messages older than two weeks. The margin covers clock drift.
const BULK_DELETE_MAX_AGE_HOURS: i64 = 14 * 24 - 1;

/// The [Platform] backed by Discord's HTTP API
pub struct DiscordPlatform {
	http_client: Arc<Client>,
}

impl DiscordPlatform {
	pub fn new(http_client: Arc<Client>) -> Self {
		Self { http_client }
	}

	async fn message_page(
		&self,
		channel_id: Id<ChannelMarker>,
		before: Option<Id<MessageMarker>>,
	) -> Result<Vec<Message>, PlatformError> {
		let response = match before {
			Some(before) => {
				self.http_client
					.channel_messages(channel_id)
					.before(before)
					.limit(MESSAGE_PAGE_SIZE)
					.await?
			}
			None => {
				self.http_client
					.channel_messages(channel_id)
					.limit(MESSAGE_PAGE_SIZE)
					.await?
			}
		};
		Ok(response.models().await?)
	}
}

/// Which messages can go in bulk deletes and which have to be deleted one at a time
#[derive(Debug, Default, Eq, PartialEq)]
struct DeletionPlan {
	bulk: Vec<Vec<Id<MessageMarker>>>,
	single: Vec<Id<MessageMarker>>,
}

/// Bulk deletes need between 2 and 100 messages, all younger than the bulk delete cutoff.
fn plan_message_deletion(message_ids: &[Id<MessageMarker>], now: DateTime<Utc>) -> DeletionPlan {
	let bulk_cutoff = now - Duration::hours(BULK_DELETE_MAX_AGE_HOURS);
	let (recent, old): (Vec<Id<MessageMarker>>, Vec<Id<MessageMarker>>) = message_ids
		.iter()
		.partition(|message_id| datetime_from_id(**message_id).is_some_and(|sent_at| sent_at > bulk_cutoff));

	let mut plan = DeletionPlan::default();
	for chunk in recent.chunks(usize::from(MESSAGE_PAGE_SIZE)) {
		match chunk {
			[message_id] => plan.single.push(*message_id),
			messages => plan.bulk.push(messages.to_vec()),
		}
	}
	plan.single.extend(old);
	plan
}

fn history_message(message: Message) -> HistoryMessage {
	let sent_at = datetime_from_timestamp(&message.timestamp)
		.or_else(|| datetime_from_id(message.id))
		.unwrap_or_else(Utc::now);
	let author_name = match message.author.global_name {
		Some(global_name) if global_name != message.author.name => {
			format!("{} ({})", global_name, message.author.name)
		}
		_ => message.author.name,
	};
	HistoryMessage {
		id: message.id,
		author_id: message.author.id,
		author_name,
		author_is_bot: message.author.bot,
		content: message.content,
		sent_at,
		attachment_names: message
			.attachments
			.into_iter()
			.map(|attachment| attachment.filename)
			.collect(),
		embed_count: message.embeds.len(),
	}
}

#[async_trait]
impl Platform for DiscordPlatform {
	async fn guild_name(&self, guild_id: Id<GuildMarker>) -> Result<String, PlatformError> {
		let guild = self.http_client.guild(guild_id).await?.model().await?;
		Ok(guild.name)
	}

	async fn role_by_name(&self, guild_id: Id<GuildMarker>, name: &str) -> Result<Option<Id<RoleMarker>>, PlatformError> {
		let roles = self.http_client.roles(guild_id).await?.models().await?;
		Ok(roles.into_iter().find(|role| role.name == name).map(|role| role.id))
	}

	async fn category_by_name(
		&self,
		guild_id: Id<GuildMarker>,
		name: &str,
	) -> Result<Option<Id<ChannelMarker>>, PlatformError> {
		let channels = self.http_client.guild_channels(guild_id).await?.models().await?;
		Ok(channels
			.into_iter()
			.find(|channel| channel.kind == ChannelType::GuildCategory && channel.name.as_deref() == Some(name))
			.map(|channel| channel.id))
	}

	async fn create_ticket_channel(&self, channel: &NewTicketChannel) -> Result<Id<ChannelMarker>, PlatformError> {
		let new_channel = self
			.http_client
			.create_guild_channel(channel.guild_id, &channel.name)
			.kind(ChannelType::GuildText)
			.parent_id(channel.parent_id)
			.permission_overwrites(&channel.permission_overwrites)
			.topic(&channel.topic)
			.reason("Ticket Creation")
			.await?
			.model()
			.await?;
		Ok(new_channel.id)
	}

	async fn channel_exists(&self, channel_id: Id<ChannelMarker>) -> Result<bool, PlatformError> {
		match self.http_client.channel(channel_id).await {
			Ok(_) => Ok(true),
			Err(error) => {
				let not_found = matches!(error.kind(), ErrorType::Response { status, .. } if status.get() == 404);
				if not_found { Ok(false) } else { Err(error.into()) }
			}
		}
	}

	async fn update_ticket_channel(
		&self,
		channel_id: Id<ChannelMarker>,
		name: &str,
		permission_overwrites: &[PermissionOverwrite],
		reason: &str,
	) -> Result<(), PlatformError> {
		self.http_client
			.update_channel(channel_id)
			.name(name)
			.permission_overwrites(permission_overwrites)
			.reason(reason)
			.await?;
		Ok(())
	}

	async fn delete_channel(&self, channel_id: Id<ChannelMarker>, reason: &str) -> Result<(), PlatformError> {
		self.http_client.delete_channel(channel_id).reason(reason).await?;
		Ok(())
	}

	async fn send_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message: &OutgoingMessage,
	) -> Result<Id<MessageMarker>, PlatformError> {
		let mut request = self
			.http_client
			.create_message(channel_id)
			.embeds(&message.embeds)
			.components(&message.components)
			.attachments(&message.attachments)
			.allowed_mentions(Some(&message.allowed_mentions));
		if let Some(content) = message.content.as_deref() {
			request = request.content(content);
		}
		let sent_message = request.await?.model().await?;
		Ok(sent_message.id)
	}

	async fn send_direct_message(&self, user_id: Id<UserMarker>, message: &OutgoingMessage) -> Result<(), PlatformError> {
		let dm_channel = self.http_client.create_private_channel(user_id).await?.model().await?;
		self.send_message(dm_channel.id, message).await?;
		Ok(())
	}

	async fn delete_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message_id: Id<MessageMarker>,
	) -> Result<(), PlatformError> {
		self.http_client.delete_message(channel_id, message_id).await?;
		Ok(())
	}

	async fn delete_messages(
		&self,
		channel_id: Id<ChannelMarker>,
		message_ids: &[Id<MessageMarker>],
	) -> Result<(), PlatformError> {
		let plan = plan_message_deletion(message_ids, Utc::now());
		for batch in plan.bulk {
			self.http_client.delete_messages(channel_id, &batch).await?;
		}
		for message_id in plan.single {
			self.delete_message(channel_id, message_id).await?;
		}
		Ok(())
	}

	async fn recent_message_ids(
		&self,
		channel_id: Id<ChannelMarker>,
		limit: u16,
	) -> Result<Vec<Id<MessageMarker>>, PlatformError> {
		let messages = self
			.http_client
			.channel_messages(channel_id)
			.limit(limit.min(MESSAGE_PAGE_SIZE))
			.await?
			.models()
			.await?;
		Ok(messages.into_iter().map(|message| message.id).collect())
	}

	async fn message_history(&self, channel_id: Id<ChannelMarker>) -> Result<Vec<HistoryMessage>, PlatformError> {
		let mut messages: Vec<Message> = Vec::new();
		let mut before = None;
		for _ in 0..MAX_HISTORY_PAGES {
			let page = self.message_page(channel_id, before).await?;
			let page_len = page.len();
			before = page.last().map(|message| message.id);
			messages.extend(page);
			if page_len < usize::from(MESSAGE_PAGE_SIZE) {
				break;
			}
		}
		if messages.len() >= usize::from(MESSAGE_PAGE_SIZE) * MAX_HISTORY_PAGES {
			tracing::info!(channel = %channel_id, "Transcript history truncated to the most recent messages");
		}

		// Discord pages newest first.
		messages.reverse();
		Ok(messages.into_iter().map(history_message).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	const DISCORD_EPOCH_MILLIS: i64 = 1_420_070_400_000;

	fn message_sent_at(sent_at: DateTime<Utc>, sequence: u64) -> Id<MessageMarker> {
		let millis = (sent_at.timestamp_millis() - DISCORD_EPOCH_MILLIS) as u64;
		Id::new((millis << 22) | sequence)
	}

	fn now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
	}

	#[test]
	fn messages_past_the_cutoff_are_deleted_singly() {
		let now = now();
		let cutoff = now - Duration::hours(BULK_DELETE_MAX_AGE_HOURS);
		let fresh = message_sent_at(now - Duration::minutes(5), 1);
		let just_inside = message_sent_at(cutoff + Duration::seconds(1), 2);
		let at_cutoff = message_sent_at(cutoff, 3);
		let ancient = message_sent_at(now - Duration::days(30), 4);

		let plan = plan_message_deletion(&[fresh, just_inside, at_cutoff, ancient], now);
		assert_eq!(plan.bulk, vec![vec![fresh, just_inside]]);
		assert_eq!(plan.single, vec![at_cutoff, ancient]);
	}

	#[test]
	fn a_lone_recent_message_is_not_bulk_deleted() {
		let now = now();
		let message_id = message_sent_at(now - Duration::hours(1), 1);
		let plan = plan_message_deletion(&[message_id], now);
		assert!(plan.bulk.is_empty());
		assert_eq!(plan.single, vec![message_id]);
	}

	#[test]
	fn bulk_batches_hold_at_most_a_page() {
		let now = now();
		let message_ids: Vec<Id<MessageMarker>> = (1..=101)
			.map(|sequence| message_sent_at(now - Duration::minutes(10), sequence))
			.collect();
		let plan = plan_message_deletion(&message_ids, now);
		assert_eq!(plan.bulk.len(), 1);
		assert_eq!(plan.bulk[0].len(), 100);
		assert_eq!(plan.single, vec![message_ids[100]]);
	}
}

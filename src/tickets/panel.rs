// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::TicketManager;
use super::components::{panel_embed, reason_buttons};
use super::platform::{OutgoingMessage, Platform};
use crate::error::TicketError;
use crate::store::TicketStore;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, MessageMarker};

/// How many recent messages are cleared out of the panel channel before the panel is posted
const PANEL_CLEAR_LIMIT: u16 = 100;

impl<P: Platform, S: TicketStore> TicketManager<P, S> {
	/// Clears the channel and posts the guild's ticket panel to it
	pub async fn publish_panel(
		&self,
		guild_id: Id<GuildMarker>,
		channel_id: Id<ChannelMarker>,
	) -> Result<Id<MessageMarker>, TicketError> {
		let settings = self.settings(guild_id).await?;
		let Some(buttons) = reason_buttons(&settings) else {
			return Err(TicketError::NoReasonsConfigured);
		};
		let embed = panel_embed(&settings)?;

		let old_messages = self.platform.recent_message_ids(channel_id, PANEL_CLEAR_LIMIT).await?;
		if !old_messages.is_empty() {
			self.platform.delete_messages(channel_id, &old_messages).await?;
		}

		let panel = OutgoingMessage {
			embeds: vec![embed],
			components: vec![buttons],
			..Default::default()
		};
		let message_id = self.platform.send_message(channel_id, &panel).await?;
		tracing::info!(
			guild = %guild_id,
			channel = %channel_id,
			cleared = old_messages.len(),
			"Published ticket panel"
		);
		Ok(message_id)
	}
}

#[cfg(test)]
mod tests {
	use crate::error::TicketError;
	use crate::tickets::testing::{FakePlatform, MemoryStore, manager};
	use twilight_model::id::Id;

	#[tokio::test]
	async fn publishing_twice_leaves_one_panel() {
		let platform = FakePlatform::default();
		let channel_id = Id::new(50);
		platform.add_channel(channel_id);
		platform.post_as_user(channel_id, Id::new(9), "chatter");
		let tickets = manager(platform.clone(), MemoryStore::default());
		let guild_id = Id::new(1);

		tickets.publish_panel(guild_id, channel_id).await.unwrap();
		let panel_id = tickets.publish_panel(guild_id, channel_id).await.unwrap();

		let messages = platform.messages(channel_id);
		assert_eq!(messages.len(), 1);
		assert_eq!(messages[0].id, panel_id);
		assert_eq!(messages[0].embeds.len(), 1);
		assert_eq!(messages[0].components.len(), 1);
	}

	#[tokio::test]
	async fn panel_needs_a_reason() {
		let platform = FakePlatform::default();
		let channel_id = Id::new(50);
		platform.add_channel(channel_id);
		platform.post_as_user(channel_id, Id::new(9), "keep me");
		let store = MemoryStore::default();
		let tickets = manager(platform.clone(), store.clone());
		let guild_id = Id::new(1);
		for slot in 1..=3 {
			tickets.update_setting(guild_id, &format!("reason{}", slot), "").await.unwrap();
		}

		let result = tickets.publish_panel(guild_id, channel_id).await;
		assert!(matches!(result, Err(TicketError::NoReasonsConfigured)));
		assert_eq!(platform.messages(channel_id).len(), 1);
	}
}

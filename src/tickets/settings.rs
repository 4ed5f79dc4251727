// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::components::parse_colour;
use super::platform::Platform;
use super::TicketManager;
use crate::error::TicketError;
use crate::model::GuildSettings;
use crate::store::{SettingUpdate, TicketStore};
use twilight_mention::fmt::Mention;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker};
use twilight_validate::component::COMPONENT_BUTTON_LABEL_LENGTH;
use twilight_validate::embed::{DESCRIPTION_LENGTH, FOOTER_TEXT_LENGTH, TITLE_LENGTH};

/// The keys operators use to change settings, with a short description of each
pub const SETTING_KEYS: [(&str, &str); 16] = [
	("paneltitle", "Panel title"),
	("paneldescription", "Panel description"),
	("embedfooter", "Panel footer"),
	("embedcolour", "Panel colour"),
	("reason1", "Reason 1"),
	("reason2", "Reason 2"),
	("reason3", "Reason 3"),
	("reason4", "Reason 4"),
	("reason5", "Reason 5"),
	("staffrole", "Staff role name"),
	("ticketopenmessage", "Ticket open message"),
	("ticketopenembed", "Ticket open embed description"),
	("ticketopenembedfooter", "Ticket open embed footer"),
	("opencategory", "Ticket category name"),
	("transcript", "Transcripts enabled"),
	("transcriptlogchannel", "Transcript log channel"),
];

// Leaves room for the owner mention that precedes the open message.
const OPEN_MESSAGE_LENGTH: usize = 1900;
const NAME_LENGTH: usize = 100;

/// Turns an operator-supplied key and value into a settings update
pub fn parse_setting(key: &str, value: &str) -> Result<SettingUpdate, TicketError> {
	let normalized_key = key.trim().to_ascii_lowercase();
	let value = value.trim();

	let update = match normalized_key.as_str() {
		"paneltitle" => SettingUpdate::PanelTitle(bounded_text("paneltitle", value, TITLE_LENGTH)?),
		"paneldescription" => {
			SettingUpdate::PanelDescription(bounded_text("paneldescription", value, DESCRIPTION_LENGTH)?)
		}
		"embedfooter" => SettingUpdate::PanelFooter(bounded_text("embedfooter", value, FOOTER_TEXT_LENGTH)?),
		"embedcolour" | "embedcolor" => {
			if parse_colour(value).is_none() {
				return Err(TicketError::InvalidSettingValue {
					key: "embedcolour",
					reason: String::from("use a colour name like `GREY`, `RANDOM`, or a hex code like `#5865F2`"),
				});
			}
			SettingUpdate::PanelColour(String::from(value))
		}
		"reason1" => SettingUpdate::Reason(1, bounded_text("reason1", value, COMPONENT_BUTTON_LABEL_LENGTH)?),
		"reason2" => SettingUpdate::Reason(2, bounded_text("reason2", value, COMPONENT_BUTTON_LABEL_LENGTH)?),
		"reason3" => SettingUpdate::Reason(3, bounded_text("reason3", value, COMPONENT_BUTTON_LABEL_LENGTH)?),
		"reason4" => SettingUpdate::Reason(4, bounded_text("reason4", value, COMPONENT_BUTTON_LABEL_LENGTH)?),
		"reason5" => SettingUpdate::Reason(5, bounded_text("reason5", value, COMPONENT_BUTTON_LABEL_LENGTH)?),
		"staffrole" => SettingUpdate::StaffRoleName(required_name("staffrole", value)?),
		"ticketopenmessage" => {
			SettingUpdate::OpenMessage(bounded_text("ticketopenmessage", value, OPEN_MESSAGE_LENGTH)?)
		}
		"ticketopenembed" => {
			SettingUpdate::OpenEmbedDescription(bounded_text("ticketopenembed", value, DESCRIPTION_LENGTH)?)
		}
		"ticketopenembedfooter" => {
			SettingUpdate::OpenEmbedFooter(bounded_text("ticketopenembedfooter", value, FOOTER_TEXT_LENGTH)?)
		}
		"opencategory" => SettingUpdate::OpenCategory(required_name("opencategory", value)?),
		"transcript" => SettingUpdate::Transcript(parse_flag(value)?),
		"transcriptlogchannel" => SettingUpdate::TranscriptLogChannel(parse_channel(value)?),
		_ => return Err(TicketError::UnknownSetting(String::from(key.trim()))),
	};
	Ok(update)
}

fn bounded_text(key: &'static str, value: &str, max_length: usize) -> Result<String, TicketError> {
	if value.chars().count() > max_length {
		return Err(TicketError::InvalidSettingValue {
			key,
			reason: format!("must be at most {} characters", max_length),
		});
	}
	Ok(String::from(value))
}

fn required_name(key: &'static str, value: &str) -> Result<String, TicketError> {
	if value.is_empty() {
		return Err(TicketError::InvalidSettingValue {
			key,
			reason: String::from("can't be empty"),
		});
	}
	bounded_text(key, value, NAME_LENGTH)
}

fn parse_flag(value: &str) -> Result<bool, TicketError> {
	match value.to_ascii_lowercase().as_str() {
		"true" | "yes" | "on" | "1" | "enable" | "enabled" => Ok(true),
		"false" | "no" | "off" | "0" | "disable" | "disabled" => Ok(false),
		_ => Err(TicketError::InvalidSettingValue {
			key: "transcript",
			reason: String::from("use `true` or `false`"),
		}),
	}
}

fn parse_channel(value: &str) -> Result<Option<Id<ChannelMarker>>, TicketError> {
	if value.is_empty() || value.eq_ignore_ascii_case("none") {
		return Ok(None);
	}
	let raw_id = value
		.strip_prefix("<#")
		.and_then(|value| value.strip_suffix('>'))
		.unwrap_or(value);
	raw_id
		.parse::<u64>()
		.ok()
		.and_then(Id::new_checked)
		.map(Some)
		.ok_or_else(|| TicketError::InvalidSettingValue {
			key: "transcriptlogchannel",
			reason: String::from("use a channel mention or channel ID, or `none` to unset"),
		})
}

const SHOWN_VALUE_LENGTH: usize = 120;

fn shown(value: &str) -> String {
	if value.is_empty() {
		String::from("*(not set)*")
	} else if value.chars().count() > SHOWN_VALUE_LENGTH {
		let start: String = value.chars().take(SHOWN_VALUE_LENGTH).collect();
		format!("`{}…`", start)
	} else {
		format!("`{}`", value)
	}
}

/// A readable summary of a guild's settings, keyed the same way they're changed
pub fn describe_settings(settings: &GuildSettings) -> String {
	let mut lines = vec![
		format!("**paneltitle**: {}", shown(&settings.panel_title)),
		format!("**paneldescription**: {}", shown(&settings.panel_description)),
		format!("**embedfooter**: {}", shown(&settings.panel_footer)),
		format!("**embedcolour**: {}", shown(&settings.panel_colour)),
	];
	for (index, reason) in settings.reasons().into_iter().enumerate() {
		lines.push(format!("**reason{}**: {}", index + 1, shown(reason)));
	}
	lines.push(format!("**staffrole**: {}", shown(&settings.staff_role_name)));
	lines.push(format!("**ticketopenmessage**: {}", shown(&settings.open_message)));
	lines.push(format!("**ticketopenembed**: {}", shown(&settings.open_embed_description)));
	lines.push(format!("**ticketopenembedfooter**: {}", shown(&settings.open_embed_footer)));
	lines.push(format!("**opencategory**: {}", shown(&settings.open_category)));
	lines.push(format!("**transcript**: `{}`", settings.transcript));
	let log_channel = match settings.get_transcript_log_channel() {
		Some(channel) => channel.mention().to_string(),
		None => String::from("*(not set)*"),
	};
	lines.push(format!("**transcriptlogchannel**: {}", log_channel));
	lines.join("\n")
}

impl<P: Platform, S: TicketStore> TicketManager<P, S> {
	/// Gets the guild's settings, storing the defaults first if the guild has none yet
	pub async fn settings(&self, guild_id: Id<GuildMarker>) -> Result<GuildSettings, TicketError> {
		if let Some(settings) = self.store.guild_settings(guild_id).await? {
			return Ok(settings);
		}
		tracing::info!(guild = %guild_id, "Creating default ticket settings");
		let settings = self.store.insert_guild_settings(&GuildSettings::defaults(guild_id)).await?;
		Ok(settings)
	}

	/// Changes one setting for the guild
	pub async fn update_setting(
		&self,
		guild_id: Id<GuildMarker>,
		key: &str,
		value: &str,
	) -> Result<SettingUpdate, TicketError> {
		let update = parse_setting(key, value)?;
		self.settings(guild_id).await?;
		self.store.update_guild_setting(guild_id, &update).await?;
		tracing::info!(guild = %guild_id, ?update, "Updated ticket setting");
		Ok(update)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tickets::testing::{FakePlatform, MemoryStore, manager};

	#[test]
	fn every_listed_key_parses() {
		for (key, _) in SETTING_KEYS {
			let value = match key {
				"embedcolour" => "GREY",
				"transcript" => "false",
				"transcriptlogchannel" => "<#1234>",
				_ => "Something",
			};
			assert!(parse_setting(key, value).is_ok(), "{} should parse", key);
		}
	}

	#[test]
	fn unknown_keys_are_rejected() {
		assert!(matches!(
			parse_setting("panelwidth", "3"),
			Err(TicketError::UnknownSetting(key)) if key == "panelwidth"
		));
	}

	#[test]
	fn values_are_validated_per_key() {
		assert!(matches!(parse_setting("embedcolour", "mauve-ish"), Err(TicketError::InvalidSettingValue { .. })));
		assert!(matches!(parse_setting("transcript", "maybe"), Err(TicketError::InvalidSettingValue { .. })));
		assert!(matches!(parse_setting("staffrole", "  "), Err(TicketError::InvalidSettingValue { .. })));
		let longest_label = "x".repeat(COMPONENT_BUTTON_LABEL_LENGTH);
		assert!(parse_setting("reason1", &longest_label).is_ok());
		let long_label = "x".repeat(COMPONENT_BUTTON_LABEL_LENGTH + 1);
		assert!(matches!(parse_setting("reason1", &long_label), Err(TicketError::InvalidSettingValue { .. })));
	}

	#[test]
	fn log_channel_accepts_mentions_ids_and_none() {
		assert_eq!(
			parse_setting("transcriptlogchannel", "<#42>").unwrap(),
			SettingUpdate::TranscriptLogChannel(Some(Id::new(42)))
		);
		assert_eq!(
			parse_setting("TranscriptLogChannel", "42").unwrap(),
			SettingUpdate::TranscriptLogChannel(Some(Id::new(42)))
		);
		assert_eq!(
			parse_setting("transcriptlogchannel", "none").unwrap(),
			SettingUpdate::TranscriptLogChannel(None)
		);
		assert!(parse_setting("transcriptlogchannel", "0").is_err());
	}

	#[test]
	fn empty_reason_disables_the_slot() {
		assert_eq!(parse_setting("reason4", "").unwrap(), SettingUpdate::Reason(4, String::new()));
	}

	#[tokio::test]
	async fn defaults_are_created_once() {
		let store = MemoryStore::default();
		let tickets = manager(FakePlatform::default(), store.clone());
		let guild_id = Id::new(7);

		let first = tickets.settings(guild_id).await.unwrap();
		assert_eq!(first, GuildSettings::defaults(guild_id));
		let second = tickets.settings(guild_id).await.unwrap();
		assert_eq!(first, second);
		assert_eq!(store.settings_inserts(), 1);
	}

	#[tokio::test]
	async fn update_creates_settings_then_applies_the_change() {
		let store = MemoryStore::default();
		let tickets = manager(FakePlatform::default(), store.clone());
		let guild_id = Id::new(7);

		tickets.update_setting(guild_id, "reason2", "").await.unwrap();
		tickets.update_setting(guild_id, "transcript", "off").await.unwrap();

		let settings = tickets.settings(guild_id).await.unwrap();
		assert_eq!(settings.reason2, "");
		assert!(!settings.transcript);
		assert_eq!(settings.reason1, "General Support");
	}

	#[tokio::test]
	async fn invalid_update_changes_nothing() {
		let store = MemoryStore::default();
		let tickets = manager(FakePlatform::default(), store.clone());
		let guild_id = Id::new(7);

		assert!(tickets.update_setting(guild_id, "bogus", "value").await.is_err());
		assert_eq!(store.settings_inserts(), 0);
	}

	#[test]
	fn description_lists_every_key() {
		let description = describe_settings(&GuildSettings::defaults(Id::new(1)));
		for (key, _) in SETTING_KEYS {
			assert!(description.contains(&format!("**{}**", key)), "{} missing", key);
		}
	}
}

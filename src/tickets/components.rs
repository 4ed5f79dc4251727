// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::model::GuildSettings;
use twilight_model::channel::message::component::{ActionRow, Button, ButtonStyle, Component};
use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFooterBuilder};
use twilight_validate::embed::{COLOR_MAXIMUM, EmbedValidationError};

/// Custom ID prefix shared by every ticket button
pub const TICKET_COMPONENT_PREFIX: &str = "ticket";

pub fn open_ticket_custom_id(slot: usize) -> String {
	format!("{}/open/{}", TICKET_COMPONENT_PREFIX, slot)
}

pub fn close_ticket_custom_id() -> String {
	format!("{}/close", TICKET_COMPONENT_PREFIX)
}

pub fn reopen_ticket_custom_id() -> String {
	format!("{}/reopen", TICKET_COMPONENT_PREFIX)
}

pub fn delete_ticket_custom_id() -> String {
	format!("{}/delete", TICKET_COMPONENT_PREFIX)
}

fn button(custom_id: String, label: &str, style: ButtonStyle) -> Button {
	Button {
		custom_id: Some(custom_id),
		disabled: false,
		emoji: None,
		label: Some(String::from(label)),
		style,
		url: None,
		sku_id: None,
	}
}

fn action_row(buttons: Vec<Button>) -> Component {
	Component::ActionRow(ActionRow {
		components: buttons.into_iter().map(Component::Button).collect(),
	})
}

/// One button per configured reason, in slot order. Returns `None` when no reasons are configured.
pub fn reason_buttons(settings: &GuildSettings) -> Option<Component> {
	let buttons: Vec<Button> = settings
		.reasons()
		.iter()
		.enumerate()
		.filter(|(_, reason)| !reason.is_empty())
		.map(|(index, reason)| button(open_ticket_custom_id(index + 1), reason, ButtonStyle::Primary))
		.collect();
	if buttons.is_empty() {
		None
	} else {
		Some(action_row(buttons))
	}
}

pub fn close_button_row() -> Component {
	action_row(vec![button(close_ticket_custom_id(), "Close", ButtonStyle::Primary)])
}

pub fn closed_ticket_button_row() -> Component {
	action_row(vec![
		button(reopen_ticket_custom_id(), "Reopen", ButtonStyle::Secondary),
		button(delete_ticket_custom_id(), "Delete", ButtonStyle::Danger),
	])
}

/// An embed colour setting
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EmbedColour {
	Fixed(u32),
	/// A new colour every time the embed is built
	Random,
}

impl EmbedColour {
	pub fn resolve(&self) -> u32 {
		match self {
			Self::Fixed(colour) => *colour,
			Self::Random => rand::random::<u32>() & COLOR_MAXIMUM,
		}
	}
}

const NAMED_COLOURS: &[(&str, u32)] = &[
	("DEFAULT", 0x000000),
	("WHITE", 0xffffff),
	("AQUA", 0x1abc9c),
	("GREEN", 0x57f287),
	("BLUE", 0x3498db),
	("YELLOW", 0xfee75c),
	("PURPLE", 0x9b59b6),
	("LUMINOUSVIVIDPINK", 0xe91e63),
	("FUCHSIA", 0xeb459e),
	("GOLD", 0xf1c40f),
	("ORANGE", 0xe67e22),
	("RED", 0xed4245),
	("GREY", 0x95a5a6),
	("NAVY", 0x34495e),
	("DARKAQUA", 0x11806a),
	("DARKGREEN", 0x1f8b4c),
	("DARKBLUE", 0x206694),
	("DARKPURPLE", 0x71368a),
	("DARKVIVIDPINK", 0xad1457),
	("DARKGOLD", 0xc27c0e),
	("DARKORANGE", 0xa84300),
	("DARKRED", 0x992d22),
	("DARKGREY", 0x979c9f),
	("DARKERGREY", 0x7f8c8d),
	("LIGHTGREY", 0xbcc0c0),
	("DARKNAVY", 0x2c3e50),
	("BLURPLE", 0x5865f2),
	("GREYPLE", 0x99aab5),
	("DARKBUTNOTBLACK", 0x2c2f33),
	("NOTQUITEBLACK", 0x23272a),
];

/// Parses a colour name (`GREY`, `dark_aqua`, `Dark Aqua`), `RANDOM`, or a hex code (`#5865F2`, `0x5865f2`)
pub fn parse_colour(value: &str) -> Option<EmbedColour> {
	let value = value.trim();
	let hex = value
		.strip_prefix('#')
		.or_else(|| value.strip_prefix("0x"))
		.or_else(|| value.strip_prefix("0X"));
	if let Some(hex) = hex {
		return u32::from_str_radix(hex, 16)
			.ok()
			.filter(|colour| *colour <= COLOR_MAXIMUM)
			.map(EmbedColour::Fixed);
	}

	let name: String = value
		.chars()
		.filter(|c| !matches!(c, '_' | ' ' | '-'))
		.map(|c| c.to_ascii_uppercase())
		.collect();
	if name == "RANDOM" {
		return Some(EmbedColour::Random);
	}
	NAMED_COLOURS
		.iter()
		.find(|(colour_name, _)| *colour_name == name)
		.map(|(_, colour)| EmbedColour::Fixed(*colour))
}

/// Builds an embed, leaving out any empty parts (Discord rejects empty strings in embeds)
pub fn text_embed(title: &str, description: &str, footer: &str, colour: u32) -> Result<Embed, EmbedValidationError> {
	let mut embed = EmbedBuilder::new().color(colour);
	if !title.is_empty() {
		embed = embed.title(title);
	}
	if !description.is_empty() {
		embed = embed.description(description);
	}
	if !footer.is_empty() {
		embed = embed.footer(EmbedFooterBuilder::new(footer));
	}
	Ok(embed.validate()?.build())
}

/// The embed at the top of the ticket panel
pub fn panel_embed(settings: &GuildSettings) -> Result<Embed, EmbedValidationError> {
	let colour = parse_colour(&settings.panel_colour).unwrap_or(EmbedColour::Fixed(0x95a5a6));
	text_embed(
		&settings.panel_title,
		&settings.panel_description,
		&settings.panel_footer,
		colour.resolve(),
	)
}

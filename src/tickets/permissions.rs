// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use twilight_model::guild::Permissions;
use twilight_model::channel::permission_overwrite::{PermissionOverwrite, PermissionOverwriteType};
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, RoleMarker, UserMarker};

/// What the owner and staff can do in an open ticket
pub fn ticket_participant_permissions() -> Permissions {
	Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES | Permissions::READ_MESSAGE_HISTORY
}

fn hidden_from_everyone(guild_id: Id<GuildMarker>) -> PermissionOverwrite {
	PermissionOverwrite {
		allow: Permissions::empty(),
		deny: Permissions::VIEW_CHANNEL,
		id: guild_id.cast(),
		kind: PermissionOverwriteType::Role,
	}
}

/// Overwrites for an open ticket: only the owner and staff can see it.
///
/// Without a staff role, only the owner is let in.
pub fn open_ticket_overwrites(
	guild_id: Id<GuildMarker>,
	owner_id: Id<UserMarker>,
	staff_role_id: Option<Id<RoleMarker>>,
) -> Vec<PermissionOverwrite> {
	let mut overwrites = vec![
		hidden_from_everyone(guild_id),
		PermissionOverwrite {
			allow: ticket_participant_permissions(),
			deny: Permissions::empty(),
			id: owner_id.cast(),
			kind: PermissionOverwriteType::Member,
		},
	];
	if let Some(staff_role_id) = staff_role_id {
		overwrites.push(PermissionOverwrite {
			allow: ticket_participant_permissions(),
			deny: Permissions::empty(),
			id: staff_role_id.cast(),
			kind: PermissionOverwriteType::Role,
		});
	}
	overwrites
}

/// Overwrites for a closed ticket. The owner loses access, and staff can read and talk but not manage messages.
pub fn closed_ticket_overwrites(
	guild_id: Id<GuildMarker>,
	staff_role_id: Option<Id<RoleMarker>>,
) -> Vec<PermissionOverwrite> {
	let mut overwrites = vec![hidden_from_everyone(guild_id)];
	if let Some(staff_role_id) = staff_role_id {
		overwrites.push(PermissionOverwrite {
			allow: ticket_participant_permissions(),
			deny: Permissions::MANAGE_MESSAGES,
			id: staff_role_id.cast(),
			kind: PermissionOverwriteType::Role,
		});
	}
	overwrites
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn closing_drops_the_owner_and_limits_staff() {
		let guild_id = Id::new(10);
		let staff_role_id = Id::new(20);
		let overwrites = closed_ticket_overwrites(guild_id, Some(staff_role_id));
		assert_eq!(overwrites.len(), 2);
		assert!(overwrites.iter().all(|overwrite| overwrite.kind == PermissionOverwriteType::Role));
		let staff = &overwrites[1];
		assert_eq!(staff.id, staff_role_id.cast());
		assert_eq!(staff.deny, Permissions::MANAGE_MESSAGES);
	}

	#[test]
	fn everyone_role_shares_the_guild_id() {
		let guild_id = Id::new(10);
		let overwrites = open_ticket_overwrites(guild_id, Id::new(30), None);
		assert_eq!(overwrites[0].id, guild_id.cast());
		assert_eq!(overwrites[0].deny, Permissions::VIEW_CHANNEL);
		assert!(overwrites[0].allow.is_empty());
		assert_eq!(overwrites[1].id, Id::<UserMarker>::new(30).cast());
		assert_eq!(overwrites[1].allow, ticket_participant_permissions());
		assert!(overwrites[1].deny.is_empty());
	}
}

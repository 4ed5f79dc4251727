// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, TimeZone, Utc};
use twilight_model::util::datetime::Timestamp;
use twilight_util::snowflake::Snowflake;

/// Gets when the object with the ID was created. If any failures occur in the conversion, returns `None`.
///
/// Message IDs are used to tell which messages are still young enough to bulk delete.
pub fn datetime_from_id(id: impl Snowflake) -> Option<DateTime<Utc>> {
	Utc.timestamp_millis_opt(id.timestamp()).single()
}

/// Gets the [DateTime] object for a timestamp from Discord. If any failures occur in the conversion, returns `None`.
pub fn datetime_from_timestamp(timestamp: &Timestamp) -> Option<DateTime<Utc>> {
	Utc.timestamp_micros(timestamp.as_micros()).single()
}

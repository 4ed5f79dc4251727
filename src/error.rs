// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use miette::Diagnostic;
use std::error::Error;
use std::fmt;
use twilight_http::response::DeserializeBodyError;
use twilight_validate::embed::EmbedValidationError;

/// Errors from ticket operations.
///
/// Everything other than [TicketError::Store] and [TicketError::Platform] is a problem the user who triggered the
/// operation can do something about, and the display text is written for them.
#[derive(Debug, Diagnostic)]
pub enum TicketError {
	/// The guild has no role matching the configured staff role name
	MissingStaffRole(String),
	/// The guild has no category matching the configured ticket category name
	MissingCategory(String),
	/// Every reason slot is empty, so there's nothing to put on a panel
	NoReasonsConfigured,
	/// The reason slot is out of range or not configured
	InvalidReason(usize),
	/// The user already has an open ticket
	DuplicateTicket,
	/// The channel isn't an open ticket
	NotATicket,
	/// The channel isn't a closed ticket
	NotClosed,
	/// The settings key isn't one of the known keys
	UnknownSetting(String),
	/// The value given for a setting couldn't be used for that setting
	InvalidSettingValue { key: &'static str, reason: String },
	Store(StoreError),
	Platform(PlatformError),
}

impl TicketError {
	/// Whether the error is an internal failure rather than something the user caused
	pub fn is_internal(&self) -> bool {
		matches!(self, Self::Store(_) | Self::Platform(_))
	}
}

impl fmt::Display for TicketError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::MissingStaffRole(name) => write!(
				f,
				"No role named `{}` exists on this server. Create it or change the `staffrole` setting.",
				name
			),
			Self::MissingCategory(name) => write!(
				f,
				"No category named `{}` exists on this server. Create it or change the `opencategory` setting.",
				name
			),
			Self::NoReasonsConfigured => write!(
				f,
				"At least one ticket reason must be set (`reason1` to `reason5`) before a panel can be published."
			),
			Self::InvalidReason(slot) => write!(f, "Ticket reason {} isn't available.", slot),
			Self::DuplicateTicket => write!(f, "You already have an open ticket."),
			Self::NotATicket => write!(f, "This channel isn't an open ticket."),
			Self::NotClosed => write!(f, "This channel isn't a closed ticket."),
			Self::UnknownSetting(key) => write!(f, "`{}` isn't a ticket setting.", key),
			Self::InvalidSettingValue { key, reason } => write!(f, "Invalid value for `{}`: {}", key, reason),
			Self::Store(error) => write!(f, "database error: {}", error),
			Self::Platform(error) => write!(f, "Discord error: {}", error),
		}
	}
}

impl Error for TicketError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Store(error) => Some(error),
			Self::Platform(error) => Some(error),
			_ => None,
		}
	}
}

impl From<StoreError> for TicketError {
	fn from(error: StoreError) -> Self {
		Self::Store(error)
	}
}

impl From<PlatformError> for TicketError {
	fn from(error: PlatformError) -> Self {
		Self::Platform(error)
	}
}

/// Errors from the ticket database
#[derive(Debug, Diagnostic)]
pub enum StoreError {
	/// No connection could be obtained
	Unavailable(Box<dyn Error + Send + Sync>),
	Query(diesel::result::Error),
	/// A uniqueness constraint rejected the write
	Duplicate,
}

impl fmt::Display for StoreError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unavailable(error) => write!(f, "database unavailable: {}", error),
			Self::Query(error) => write!(f, "query failed: {}", error),
			Self::Duplicate => write!(f, "a conflicting record already exists"),
		}
	}
}

impl Error for StoreError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Unavailable(error) => Some(error.as_ref()),
			Self::Query(error) => Some(error),
			Self::Duplicate => None,
		}
	}
}

impl From<diesel::result::Error> for StoreError {
	fn from(error: diesel::result::Error) -> Self {
		use diesel::result::{DatabaseErrorKind, Error as DbError};
		match error {
			DbError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => Self::Duplicate,
			error => Self::Query(error),
		}
	}
}

impl From<diesel::r2d2::PoolError> for StoreError {
	fn from(error: diesel::r2d2::PoolError) -> Self {
		Self::Unavailable(Box::new(error))
	}
}

/// Errors from Discord
#[derive(Debug, Diagnostic)]
pub enum PlatformError {
	Http(twilight_http::Error),
	Deserialize(DeserializeBodyError),
	Embed(EmbedValidationError),
	/// Discord answered, but not with something usable
	Rejected(String),
}

impl fmt::Display for PlatformError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Http(error) => write!(f, "HTTP error: {}", error),
			Self::Deserialize(error) => write!(f, "deserialization error: {}", error),
			Self::Embed(error) => write!(f, "invalid embed: {}", error),
			Self::Rejected(reason) => write!(f, "{}", reason),
		}
	}
}

impl Error for PlatformError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Http(error) => Some(error),
			Self::Deserialize(error) => Some(error),
			Self::Embed(error) => Some(error),
			Self::Rejected(_) => None,
		}
	}
}

impl From<twilight_http::Error> for PlatformError {
	fn from(error: twilight_http::Error) -> Self {
		Self::Http(error)
	}
}

impl From<DeserializeBodyError> for PlatformError {
	fn from(error: DeserializeBodyError) -> Self {
		Self::Deserialize(error)
	}
}

impl From<EmbedValidationError> for PlatformError {
	fn from(error: EmbedValidationError) -> Self {
		Self::Embed(error)
	}
}

impl From<EmbedValidationError> for TicketError {
	fn from(error: EmbedValidationError) -> Self {
		Self::Platform(PlatformError::Embed(error))
	}
}

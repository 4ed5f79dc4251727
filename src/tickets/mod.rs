// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ticket lifecycle: settings, panels, and the open → closed → reopened/deleted transitions.
//!
//! The [TicketStore] is the source of truth for who owns a ticket and whether it's open. Channel names and topics are
//! only ever written from it.

use crate::config::TicketTimingConfig;
use crate::store::TicketStore;
use platform::Platform;
use std::sync::Arc;

pub mod components;
mod lifecycle;
mod panel;
pub mod permissions;
pub mod platform;
pub mod settings;
#[cfg(test)]
mod testing;
mod transcript;

pub use lifecycle::{CloseOutcome, Deletion, DeletionResult, TicketUser};
pub use transcript::{TranscriptDelivery, TranscriptDestination, render_transcript};

/// Runs ticket operations against a platform and a store
pub struct TicketManager<P, S> {
	platform: Arc<P>,
	store: Arc<S>,
	timing: TicketTimingConfig,
}

impl<P, S> Clone for TicketManager<P, S> {
	fn clone(&self) -> Self {
		Self {
			platform: Arc::clone(&self.platform),
			store: Arc::clone(&self.store),
			timing: self.timing,
		}
	}
}

impl<P: Platform, S: TicketStore> TicketManager<P, S> {
	pub fn new(platform: P, store: S, timing: TicketTimingConfig) -> Self {
		Self {
			platform: Arc::new(platform),
			store: Arc::new(store),
			timing,
		}
	}
}

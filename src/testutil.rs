//! Shared test helpers

use crate::display::BreathingDisplay;
use crate::types::AnimationState;
use std::time::Instant;

/// One call made on the display
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayUpdate {
	PhaseText(String),
	Animation(AnimationState),
	Countdown(u32),
	SessionClock(String),
	Progress(f32),
}

/// Display that records every update in order
#[derive(Debug, Default)]
pub struct RecordingDisplay {
	pub updates: Vec<DisplayUpdate>,
}

impl RecordingDisplay {
	pub fn take(&mut self) -> Vec<DisplayUpdate> {
		std::mem::take(&mut self.updates)
	}

	pub fn countdowns(&self) -> Vec<u32> {
		self.updates
			.iter()
			.filter_map(|u| match u {
				DisplayUpdate::Countdown(n) => Some(*n),
				_ => None,
			})
			.collect()
	}

	pub fn last_phase_text(&self) -> Option<&str> {
		self.updates.iter().rev().find_map(|u| match u {
			DisplayUpdate::PhaseText(t) => Some(t.as_str()),
			_ => None,
		})
	}
}

impl BreathingDisplay for RecordingDisplay {
	fn set_phase_text(&mut self, text: &str) {
		self.updates.push(DisplayUpdate::PhaseText(text.to_owned()));
	}

	fn set_animation_state(&mut self, state: AnimationState, _since: Instant) {
		self.updates.push(DisplayUpdate::Animation(state));
	}

	fn set_countdown(&mut self, seconds: u32) {
		self.updates.push(DisplayUpdate::Countdown(seconds));
	}

	fn set_session_clock_text(&mut self, text: &str) {
		self.updates.push(DisplayUpdate::SessionClock(text.to_owned()));
	}

	fn set_progress_percent(&mut self, percent: f32) {
		self.updates.push(DisplayUpdate::Progress(percent));
	}
}

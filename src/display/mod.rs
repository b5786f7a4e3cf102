use crate::types::AnimationState;
use std::time::Instant;

/// Display capabilities the sequencer drives
pub trait BreathingDisplay {
	fn set_phase_text(&mut self, text: &str);
	/// `since` is the logical time the new state took effect
	fn set_animation_state(&mut self, state: AnimationState, since: Instant);
	fn set_countdown(&mut self, seconds: u32);
	fn set_session_clock_text(&mut self, text: &str);
	/// `percent` is in `0.0..=100.0`
	fn set_progress_percent(&mut self, percent: f32);
}

/// Snapshot of everything the window shows, read by the view each frame
#[derive(Debug, Clone)]
pub struct DisplayState {
	pub phase_text: String,
	pub animation: AnimationState,
	pub countdown: u32,
	pub session_clock: String,
	pub progress_percent: f32,
	/// When the animation tag last changed, for easing the circle
	pub animation_started: Instant,
	/// Countdown value when the animation tag last changed
	pub animation_span: u32,
}

impl DisplayState {
	pub fn new() -> Self {
		Self {
			phase_text: "Press Start".to_owned(),
			animation: AnimationState::None,
			countdown: 0,
			session_clock: "Session: 0:00".to_owned(),
			progress_percent: 0.0,
			animation_started: Instant::now(),
			animation_span: 0,
		}
	}
}

impl Default for DisplayState {
	fn default() -> Self {
		Self::new()
	}
}

impl BreathingDisplay for DisplayState {
	fn set_phase_text(&mut self, text: &str) {
		self.phase_text.clear();
		self.phase_text.push_str(text);
	}

	fn set_animation_state(&mut self, state: AnimationState, since: Instant) {
		self.animation = state;
		self.animation_started = since;
		self.animation_span = 0;
	}

	fn set_countdown(&mut self, seconds: u32) {
		// First value after a phase change is the phase length
		if self.animation_span == 0 {
			self.animation_span = seconds;
		}
		self.countdown = seconds;
	}

	fn set_session_clock_text(&mut self, text: &str) {
		self.session_clock.clear();
		self.session_clock.push_str(text);
	}

	fn set_progress_percent(&mut self, percent: f32) {
		self.progress_percent = percent.clamp(0.0, 100.0);
	}
}

/// Nominal session length the progress indicator fills up against
pub const REFERENCE_SESSION_SECS: u64 = 300;

/// Whole-session elapsed counter, independent of phase boundaries
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionClock {
	elapsed: u64,
}

impl SessionClock {
	pub fn reset(&mut self) {
		self.elapsed = 0;
	}

	pub fn advance(&mut self) -> u64 {
		self.elapsed += 1;
		self.elapsed
	}

	pub fn elapsed(&self) -> u64 {
		self.elapsed
	}

	pub fn text(&self) -> String {
		format_session_clock(self.elapsed)
	}

	pub fn progress_percent(&self) -> f32 {
		progress_percent(self.elapsed)
	}
}

/// `Session: M:SS`
pub fn format_session_clock(elapsed_secs: u64) -> String {
	format!("Session: {}:{:02}", elapsed_secs / 60, elapsed_secs % 60)
}

pub fn progress_percent(elapsed_secs: u64) -> f32 {
	let fraction = (elapsed_secs as f64 / REFERENCE_SESSION_SECS as f64).min(1.0);
	(fraction * 100.0) as f32
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clock_text_pads_seconds() {
		assert_eq!(format_session_clock(0), "Session: 0:00");
		assert_eq!(format_session_clock(9), "Session: 0:09");
		assert_eq!(format_session_clock(65), "Session: 1:05");
		assert_eq!(format_session_clock(600), "Session: 10:00");
	}

	#[test]
	fn progress_caps_at_reference_length() {
		assert_eq!(progress_percent(0), 0.0);
		assert_eq!(progress_percent(150), 50.0);
		assert_eq!(progress_percent(300), 100.0);
		assert_eq!(progress_percent(600), 100.0);
	}

	#[test]
	fn advance_and_reset() {
		let mut clock = SessionClock::default();
		for _ in 0..65 {
			clock.advance();
		}
		assert_eq!(clock.text(), "Session: 1:05");
		clock.reset();
		assert_eq!(clock.elapsed(), 0);
	}
}

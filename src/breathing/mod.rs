pub mod session;

use crate::catalog::PatternCatalog;
use crate::display::BreathingDisplay;
use crate::error::SequencerError;
use crate::reactor::{
	ComponentResponse, Event, SessionEvent, SettingsEvent, TimerEvent, TimerHandle, TimerSlot,
};
use crate::types::{AnimationState, Phase};
use session::SessionClock;
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

/// Live session: the loaded pattern, where we are in it and the two timers
/// that drive it
struct RunningSession {
	pattern_id: String,
	phases: &'static [Phase],
	step: usize,
	remaining: u32,
	countdown: TimerHandle,
	clock: TimerHandle,
}

enum SequencerState {
	Stopped,
	Running(RunningSession),
}

/// Steps through the phases of the selected pattern, one countdown second at
/// a time, while a separate clock counts the whole session.
pub struct PhaseSequencer<D: BreathingDisplay> {
	catalog: PatternCatalog,
	display: D,
	state: SequencerState,
	clock: SessionClock,
	selected: String,
	next_serial: u64,
	/// Time of the event being handled, stamped on animation changes
	now: Instant,
}

impl<D: BreathingDisplay> PhaseSequencer<D> {
	pub fn new(display: D, catalog: PatternCatalog) -> Self {
		log::info!("Initializing phase sequencer");
		Self {
			selected: catalog.default_id().to_owned(),
			catalog,
			display,
			state: SequencerState::Stopped,
			clock: SessionClock::default(),
			next_serial: 1,
			now: Instant::now(),
		}
	}

	/// Align with the reactor's clock before handling an event
	pub fn sync_clock(&mut self, now: Instant) {
		self.now = now;
	}

	pub fn handle(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::Session(SessionEvent::Toggle) => {
				let result = self.toggle();
				Self::recover(result)
			}
			Event::Session(SessionEvent::Start { pattern_id }) => {
				let result = self.start(pattern_id);
				Self::recover(result)
			}
			Event::Session(SessionEvent::Stop) => self.stop(),
			Event::Session(SessionEvent::SelectPattern { pattern_id }) => {
				match self.select(pattern_id) {
					Ok(()) => ComponentResponse::emit(Event::Settings(
						SettingsEvent::PatternSelected {
							pattern_id: pattern_id.clone(),
						},
					)),
					Err(e) => {
						log::warn!("Selection rejected: {}", e);
						ComponentResponse::none()
					}
				}
			}
			Event::Timer(TimerEvent::CountdownTick { handle }) => self.on_countdown_tick(*handle),
			Event::Timer(TimerEvent::ClockTick { handle }) => self.on_clock_tick(*handle),
			_ => ComponentResponse::none(),
		}
	}

	/// Begin a session on `pattern_id`. Leaves all state untouched on error.
	pub fn start(&mut self, pattern_id: &str) -> Result<ComponentResponse, SequencerError> {
		if self.is_running() {
			return Err(SequencerError::DoubleStart);
		}
		let phases = self.catalog.lookup(pattern_id)?;
		let Some(&first) = phases.first() else {
			return Err(SequencerError::UnknownPattern(pattern_id.to_owned()));
		};

		let cycle = self.catalog.cycle_seconds(pattern_id)?;
		log::info!("Session started: pattern='{}', cycle={}s", pattern_id, cycle);
		self.clock.reset();
		self.show_clock();

		let countdown = self.next_handle(TimerSlot::PhaseCountdown);
		let clock = self.next_handle(TimerSlot::SessionClock);
		self.state = SequencerState::Running(RunningSession {
			pattern_id: pattern_id.to_owned(),
			phases,
			step: 0,
			remaining: first.seconds,
			countdown,
			clock,
		});
		Self::show_phase(&mut self.display, first, self.now);

		Ok(
			ComponentResponse::interval(countdown, countdown_tick(countdown), TICK)
				.with_interval(clock, clock_tick(clock), TICK),
		)
	}

	/// End the session and release both timers. Idempotent.
	pub fn stop(&mut self) -> ComponentResponse {
		let SequencerState::Running(session) =
			std::mem::replace(&mut self.state, SequencerState::Stopped)
		else {
			log::debug!("Stop ignored: not running");
			return ComponentResponse::none();
		};

		log::info!(
			"Session stopped: pattern='{}', elapsed={}s",
			session.pattern_id,
			self.clock.elapsed()
		);
		self.display.set_phase_text("Paused");
		self.display.set_animation_state(AnimationState::None, self.now);
		self.display.set_countdown(0);

		ComponentResponse::none()
			.with_cancel(session.countdown)
			.with_cancel(session.clock)
	}

	pub fn toggle(&mut self) -> Result<ComponentResponse, SequencerError> {
		if self.is_running() {
			Ok(self.stop())
		} else {
			let pattern_id = self.selected.clone();
			self.start(&pattern_id)
		}
	}

	/// Record the pattern the next start will use
	pub fn select(&mut self, pattern_id: &str) -> Result<(), SequencerError> {
		if !self.catalog.contains(pattern_id) {
			return Err(SequencerError::UnknownPattern(pattern_id.to_owned()));
		}
		log::debug!("Pattern selected: '{}'", pattern_id);
		self.selected = pattern_id.to_owned();
		Ok(())
	}

	fn on_countdown_tick(&mut self, handle: TimerHandle) -> ComponentResponse {
		let SequencerState::Running(session) = &mut self.state else {
			log::trace!("Countdown tick after stop ignored");
			return ComponentResponse::none();
		};
		if session.countdown != handle {
			log::trace!("Stale countdown tick ignored: {:?}", handle);
			return ComponentResponse::none();
		}

		session.remaining = session.remaining.saturating_sub(1);
		self.display.set_countdown(session.remaining);
		if session.remaining > 0 {
			return ComponentResponse::none();
		}
		self.advance_phase()
	}

	/// Move to the next phase, wrapping to a freshly looked-up pattern after
	/// the last one. The finished phase's timer is released and a new one armed.
	fn advance_phase(&mut self) -> ComponentResponse {
		let reload = match &self.state {
			SequencerState::Running(s) if s.step + 1 >= s.phases.len() => {
				Some(self.catalog.lookup(&s.pattern_id))
			}
			_ => None,
		};
		let reloaded = match reload {
			Some(Ok(phases)) if !phases.is_empty() => Some(phases),
			Some(Ok(_)) | Some(Err(_)) => {
				log::error!("Pattern vanished from catalog mid-session, stopping");
				return self.stop();
			}
			None => None,
		};

		let next = self.next_handle(TimerSlot::PhaseCountdown);
		let SequencerState::Running(session) = &mut self.state else {
			return ComponentResponse::none();
		};
		match reloaded {
			Some(phases) => {
				log::debug!("Cycle complete: pattern='{}'", session.pattern_id);
				session.phases = phases;
				session.step = 0;
			}
			None => session.step += 1,
		}

		let phase = session.phases[session.step];
		let finished = session.countdown;
		session.remaining = phase.seconds;
		session.countdown = next;
		log::debug!(
			"Phase {} of {}: {:?} for {}s",
			session.step + 1,
			session.phases.len(),
			phase.name,
			phase.seconds
		);
		Self::show_phase(&mut self.display, phase, self.now);

		ComponentResponse::none()
			.with_cancel(finished)
			.with_interval(next, countdown_tick(next), TICK)
	}

	fn on_clock_tick(&mut self, handle: TimerHandle) -> ComponentResponse {
		let live = matches!(&self.state, SequencerState::Running(s) if s.clock == handle);
		if !live {
			log::trace!("Stale clock tick ignored: {:?}", handle);
			return ComponentResponse::none();
		}

		let elapsed = self.clock.advance();
		log::trace!("Session elapsed: {}s", elapsed);
		self.show_clock();
		ComponentResponse::none()
	}

	fn show_phase(display: &mut D, phase: Phase, since: Instant) {
		display.set_phase_text(phase.name.label());
		display.set_animation_state(phase.name.animation(), since);
		display.set_countdown(phase.seconds);
	}

	fn show_clock(&mut self) {
		self.display.set_session_clock_text(&self.clock.text());
		self.display.set_progress_percent(self.clock.progress_percent());
	}

	fn next_handle(&mut self, slot: TimerSlot) -> TimerHandle {
		let serial = self.next_serial;
		self.next_serial += 1;
		TimerHandle { slot, serial }
	}

	fn recover(result: Result<ComponentResponse, SequencerError>) -> ComponentResponse {
		match result {
			Ok(response) => response,
			Err(SequencerError::DoubleStart) => {
				log::debug!("Start ignored: session already running");
				ComponentResponse::none()
			}
			Err(e) => {
				log::warn!("Start rejected: {}", e);
				ComponentResponse::none()
			}
		}
	}

	// Accessors for ViewManager
	pub fn is_running(&self) -> bool {
		matches!(self.state, SequencerState::Running(_))
	}

	pub fn elapsed_seconds(&self) -> u64 {
		self.clock.elapsed()
	}

	pub fn selected_pattern(&self) -> &str {
		&self.selected
	}

	#[cfg(test)]
	pub fn current_phase(&self) -> Option<Phase> {
		match &self.state {
			SequencerState::Running(s) => Some(s.phases[s.step]),
			SequencerState::Stopped => None,
		}
	}

	#[cfg(test)]
	pub fn remaining_seconds(&self) -> Option<u32> {
		match &self.state {
			SequencerState::Running(s) => Some(s.remaining),
			SequencerState::Stopped => None,
		}
	}

	pub fn catalog(&self) -> &PatternCatalog {
		&self.catalog
	}

	pub fn display(&self) -> &D {
		&self.display
	}

	#[cfg(test)]
	pub fn display_mut(&mut self) -> &mut D {
		&mut self.display
	}

	/// Swap the pattern table under a running session
	#[cfg(test)]
	pub fn replace_catalog(&mut self, catalog: PatternCatalog) {
		self.catalog = catalog;
	}
}

fn countdown_tick(handle: TimerHandle) -> Event {
	Event::Timer(TimerEvent::CountdownTick { handle })
}

fn clock_tick(handle: TimerHandle) -> Event {
	Event::Timer(TimerEvent::ClockTick { handle })
}

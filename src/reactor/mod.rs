pub mod event;
pub mod queue;
pub mod scheduler;

pub use event::{
	ComponentResponse, Event, SessionEvent, SettingsEvent, TimerEvent, TimerHandle, TimerSlot,
};
pub use queue::EventQueue;
pub use scheduler::Scheduler;

use crate::breathing::PhaseSequencer;
use crate::catalog::PatternCatalog;
use crate::display::{BreathingDisplay, DisplayState};
use crate::settings::SettingsManager;
use crate::view::ViewManager;
use eframe::egui;
use std::time::{Duration, Instant};

/// Upper bound on events handled per drain
const MAX_ITERATIONS: usize = 1000;

/// How often the window wakes up to let timers fire
const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

pub struct Reactor<D: BreathingDisplay> {
	queue: EventQueue,
	scheduler: Scheduler,

	pub sequencer: PhaseSequencer<D>,
	pub settings: SettingsManager,
	pub view: ViewManager,
}

impl<D: BreathingDisplay> Reactor<D> {
	pub fn new(display: D, settings: SettingsManager) -> Self {
		Self::with_scheduler(display, settings, Scheduler::new())
	}

	pub fn with_scheduler(display: D, settings: SettingsManager, scheduler: Scheduler) -> Self {
		log::info!("Initializing all components");
		let mut sequencer = PhaseSequencer::new(display, PatternCatalog::new());
		let preferred = settings.settings().default_pattern.clone();
		if let Err(e) = sequencer.select(&preferred) {
			log::warn!("Stored pattern not usable, keeping default: {}", e);
		}

		let reactor = Self {
			queue: EventQueue::new(),
			scheduler,
			sequencer,
			settings,
			view: ViewManager::new(),
		};
		log::info!("Initialization complete");
		reactor
	}

	/// Handle an event and everything it causes
	pub fn dispatch(&mut self, event: Event) {
		self.queue.push(event);
		self.drain_queue();
	}

	/// Fire every timer due up to `now`, one at a time in deadline order
	pub fn advance_to(&mut self, now: Instant) {
		self.drain_queue();
		while let Some(event) = self.scheduler.pop_due(now) {
			self.queue.push(event);
			self.drain_queue();
		}
	}

	pub fn tick(&mut self) {
		self.advance_to(Instant::now());
	}

	#[cfg(test)]
	pub fn now(&self) -> Instant {
		self.scheduler.now()
	}

	pub fn active_timers(&self) -> usize {
		self.scheduler.active_count()
	}

	fn drain_queue(&mut self) {
		let mut iterations = 0;
		while let Some(event) = self.queue.pop() {
			log::trace!("Processing event: {:?}", event);
			let response = self.route(&event);
			self.process_response(response);

			iterations += 1;
			if iterations > MAX_ITERATIONS {
				log::warn!("Event loop exceeded {} iterations, breaking", MAX_ITERATIONS);
				break;
			}
		}
	}

	fn process_response(&mut self, response: ComponentResponse) {
		// Releases before arming
		for handle in response.cancelled {
			if !self.scheduler.cancel(handle) {
				log::trace!("Cancel of inactive timer {:?}", handle);
			}
		}
		for request in response.intervals {
			self.scheduler
				.schedule_interval(request.handle, request.event, request.period);
		}
		for e in response.events {
			self.queue.push(e);
		}
	}

	fn route(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::Session(_) | Event::Timer(_) => {
				self.sequencer.sync_clock(self.scheduler.now());
				self.sequencer.handle(event)
			}
			Event::Settings(_) => self.settings.handle(event),
		}
	}
}

impl eframe::App for Reactor<DisplayState> {
	fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
		self.tick();

		let events = self.view.render(ctx, &self.sequencer);
		for event in events {
			log::trace!("Processing render event: {:?}", event);
			self.dispatch(event);
		}

		ctx.request_repaint_after(REPAINT_INTERVAL);
	}

	fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
		log::info!(
			"Window closing: session elapsed={}s",
			self.sequencer.elapsed_seconds()
		);
		self.dispatch(Event::Session(SessionEvent::Stop));
		log::debug!("Timers live after shutdown: {}", self.active_timers());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::Pattern;
	use crate::testutil::{DisplayUpdate, RecordingDisplay};
	use crate::types::{AnimationState, Phase, PhaseName};

	static SHORT_478: &[Pattern] = &[Pattern {
		id: "478",
		label: "Short",
		phases: &[
			Phase::new(PhaseName::Inhale, 2),
			Phase::new(PhaseName::Exhale, 3),
		],
	}];

	static BOX_ONLY: &[Pattern] = &[Pattern {
		id: "box",
		label: "Box Breathing",
		phases: &[
			Phase::new(PhaseName::Inhale, 4),
			Phase::new(PhaseName::Hold, 4),
			Phase::new(PhaseName::Exhale, 4),
			Phase::new(PhaseName::Hold, 4),
		],
	}];

	fn reactor() -> Reactor<RecordingDisplay> {
		Reactor::with_scheduler(
			RecordingDisplay::default(),
			SettingsManager::default(),
			Scheduler::starting_at(Instant::now()),
		)
	}

	fn start(reactor: &mut Reactor<RecordingDisplay>, pattern_id: &str) {
		reactor.dispatch(Event::Session(SessionEvent::Start {
			pattern_id: pattern_id.into(),
		}));
	}

	fn advance_secs(reactor: &mut Reactor<RecordingDisplay>, secs: u64) {
		let target = reactor.now() + Duration::from_secs(secs);
		reactor.advance_to(target);
	}

	fn display(reactor: &mut Reactor<RecordingDisplay>) -> &mut RecordingDisplay {
		reactor.sequencer.display_mut()
	}

	#[test]
	fn running_session_holds_exactly_two_timers() {
		let mut reactor = reactor();
		assert_eq!(reactor.active_timers(), 0);

		start(&mut reactor, "478");
		assert_eq!(reactor.active_timers(), 2);

		advance_secs(&mut reactor, 30);
		assert_eq!(reactor.active_timers(), 2);

		reactor.dispatch(Event::Session(SessionEvent::Stop));
		assert_eq!(reactor.active_timers(), 0);
	}

	#[test]
	fn stop_after_first_update_silences_every_pattern() {
		let catalog = PatternCatalog::new();
		for pattern_id in catalog.ids() {
			let mut reactor = reactor();
			start(&mut reactor, pattern_id);
			advance_secs(&mut reactor, 1);
			reactor.dispatch(Event::Session(SessionEvent::Stop));
			display(&mut reactor).take();

			advance_secs(&mut reactor, 60);
			assert!(
				display(&mut reactor).updates.is_empty(),
				"pattern {} kept updating after stop",
				pattern_id
			);
			assert_eq!(reactor.active_timers(), 0);
		}
	}

	#[test]
	fn box_cycle_period_is_sixteen_seconds() {
		let mut reactor = reactor();
		start(&mut reactor, "box");
		advance_secs(&mut reactor, 16);

		let phase = reactor.sequencer.current_phase().unwrap();
		assert_eq!(phase.name, PhaseName::Inhale);
		assert_eq!(reactor.sequencer.remaining_seconds(), Some(4));
		assert_eq!(display(&mut reactor).last_phase_text(), Some("Inhale"));
		assert_eq!(display(&mut reactor).countdowns().last(), Some(&4));
	}

	#[test]
	fn four_seven_eight_is_one_second_into_hold_at_five() {
		let mut reactor = reactor();
		start(&mut reactor, "478");
		advance_secs(&mut reactor, 5);

		let phase = reactor.sequencer.current_phase().unwrap();
		assert_eq!(phase.name, PhaseName::Hold);
		assert_eq!(reactor.sequencer.remaining_seconds(), Some(6));
	}

	#[test]
	fn session_clock_renders_minutes_and_seconds() {
		let mut reactor = reactor();
		start(&mut reactor, "diaphragm");
		advance_secs(&mut reactor, 65);

		assert_eq!(reactor.sequencer.elapsed_seconds(), 65);
		let last_clock = display(&mut reactor)
			.updates
			.iter()
			.rev()
			.find_map(|u| match u {
				DisplayUpdate::SessionClock(t) => Some(t.clone()),
				_ => None,
			});
		assert_eq!(last_clock.as_deref(), Some("Session: 1:05"));
	}

	#[test]
	fn late_frame_catches_up_without_losing_ticks() {
		let mut reactor = reactor();
		start(&mut reactor, "478");
		display(&mut reactor).take();

		// One big jump must match many small ones
		advance_secs(&mut reactor, 19 * 3 + 2);
		assert_eq!(reactor.sequencer.elapsed_seconds(), 59);
		assert_eq!(
			reactor.sequencer.current_phase().unwrap().name,
			PhaseName::Inhale
		);
		assert_eq!(reactor.sequencer.remaining_seconds(), Some(2));
	}

	#[test]
	fn double_start_keeps_one_decrement_per_second() {
		let mut reactor = reactor();
		start(&mut reactor, "478");
		start(&mut reactor, "478");
		reactor.dispatch(Event::Session(SessionEvent::Toggle));
		assert!(!reactor.sequencer.is_running());
		start(&mut reactor, "478");
		start(&mut reactor, "478");
		assert_eq!(reactor.active_timers(), 2);
		display(&mut reactor).take();

		advance_secs(&mut reactor, 1);
		assert_eq!(display(&mut reactor).countdowns(), vec![3]);
	}

	#[test]
	fn stopping_twice_is_harmless() {
		let mut reactor = reactor();
		start(&mut reactor, "box");
		reactor.dispatch(Event::Session(SessionEvent::Stop));
		display(&mut reactor).take();

		reactor.dispatch(Event::Session(SessionEvent::Stop));
		assert!(display(&mut reactor).updates.is_empty());
		assert_eq!(reactor.active_timers(), 0);
	}

	#[test]
	fn stop_keeps_elapsed_and_restart_resets_it() {
		let mut reactor = reactor();
		start(&mut reactor, "box");
		advance_secs(&mut reactor, 10);
		reactor.dispatch(Event::Session(SessionEvent::Stop));
		advance_secs(&mut reactor, 10);
		assert_eq!(reactor.sequencer.elapsed_seconds(), 10);

		start(&mut reactor, "box");
		assert_eq!(reactor.sequencer.elapsed_seconds(), 0);
		advance_secs(&mut reactor, 3);
		assert_eq!(reactor.sequencer.elapsed_seconds(), 3);
	}

	#[test]
	fn selection_changes_apply_on_next_start() {
		let mut reactor = reactor();
		reactor.dispatch(Event::Session(SessionEvent::Toggle));
		assert_eq!(reactor.sequencer.remaining_seconds(), Some(4));

		reactor.dispatch(Event::Session(SessionEvent::SelectPattern {
			pattern_id: "diaphragm".into(),
		}));
		assert_eq!(reactor.settings.settings().default_pattern, "diaphragm");
		// The running session keeps its pattern
		advance_secs(&mut reactor, 4);
		assert_eq!(reactor.sequencer.current_phase().unwrap().seconds, 7);

		reactor.dispatch(Event::Session(SessionEvent::Toggle));
		reactor.dispatch(Event::Session(SessionEvent::Toggle));
		assert_eq!(reactor.sequencer.remaining_seconds(), Some(6));
	}

	#[test]
	fn unknown_pattern_start_does_not_arm_timers() {
		let mut reactor = reactor();
		start(&mut reactor, "square");
		assert!(!reactor.sequencer.is_running());
		assert_eq!(reactor.active_timers(), 0);
	}

	#[test]
	fn cycle_wrap_rereads_the_catalog() {
		let mut reactor = reactor();
		start(&mut reactor, "478");
		advance_secs(&mut reactor, 5);
		reactor
			.sequencer
			.replace_catalog(PatternCatalog::with_patterns(SHORT_478));

		// The current cycle finishes on the phases it started with
		advance_secs(&mut reactor, 7);
		let phase = reactor.sequencer.current_phase().unwrap();
		assert_eq!((phase.name, phase.seconds), (PhaseName::Exhale, 8));

		advance_secs(&mut reactor, 7);
		let phase = reactor.sequencer.current_phase().unwrap();
		assert_eq!((phase.name, phase.seconds), (PhaseName::Inhale, 2));
		assert_eq!(reactor.sequencer.remaining_seconds(), Some(2));

		advance_secs(&mut reactor, 2);
		let phase = reactor.sequencer.current_phase().unwrap();
		assert_eq!((phase.name, phase.seconds), (PhaseName::Exhale, 3));
		assert_eq!(reactor.active_timers(), 2);
	}

	#[test]
	fn pattern_missing_at_wrap_stops_the_session() {
		let mut reactor = reactor();
		start(&mut reactor, "478");
		advance_secs(&mut reactor, 5);
		reactor
			.sequencer
			.replace_catalog(PatternCatalog::with_patterns(BOX_ONLY));

		advance_secs(&mut reactor, 13);
		assert!(reactor.sequencer.is_running());

		advance_secs(&mut reactor, 1);
		assert!(!reactor.sequencer.is_running());
		assert_eq!(reactor.active_timers(), 0);
		assert_eq!(display(&mut reactor).last_phase_text(), Some("Paused"));

		display(&mut reactor).take();
		advance_secs(&mut reactor, 30);
		assert!(display(&mut reactor).updates.is_empty());
	}

	#[test]
	fn animation_start_uses_scheduler_time() {
		let t0 = Instant::now();
		let mut reactor = Reactor::with_scheduler(
			DisplayState::new(),
			SettingsManager::default(),
			Scheduler::starting_at(t0),
		);
		reactor.dispatch(Event::Session(SessionEvent::Start {
			pattern_id: "478".into(),
		}));
		assert_eq!(reactor.sequencer.display().animation_started, t0);

		reactor.advance_to(t0 + Duration::from_millis(4500));
		let display = reactor.sequencer.display();
		assert_eq!(display.animation, AnimationState::Hold);
		assert_eq!(display.animation_started, t0 + Duration::from_secs(4));
		assert_eq!(display.animation_span, 7);
	}
}

use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
	Session(SessionEvent),
	Timer(TimerEvent),
	Settings(SettingsEvent),
}

impl Event {
	pub fn priority(&self) -> Priority {
		match self {
			Event::Session(_) => Priority::High,
			Event::Timer(_) => Priority::Normal,
			Event::Settings(_) => Priority::Low,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
	High = 0,
	Normal = 1,
	Low = 2,
}

impl Priority {
	pub fn as_index(&self) -> usize {
		*self as usize
	}
}

/// User commands coming from the display host
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
	Toggle,
	Start { pattern_id: String },
	Stop,
	SelectPattern { pattern_id: String },
}

/// Timer callbacks, tagged with the handle that armed them
#[derive(Clone, Debug, PartialEq)]
pub enum TimerEvent {
	CountdownTick { handle: TimerHandle },
	ClockTick { handle: TimerHandle },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SettingsEvent {
	/// A validated pattern selection to remember across launches
	PatternSelected { pattern_id: String },
}

/// Which timer a handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerSlot {
	PhaseCountdown,
	SessionClock,
}

/// Identity of one armed timer. A new serial means a new timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
	pub slot: TimerSlot,
	pub serial: u64,
}

/// Timer request carried in a response
#[derive(Clone, Debug)]
pub struct TimerRequest {
	pub handle: TimerHandle,
	pub event: Event,
	pub period: Duration,
}

/// Response from component.handle()
#[derive(Default, Debug)]
pub struct ComponentResponse {
	/// Events to dispatch immediately
	pub events: Vec<Event>,
	/// Repeating timers to arm
	pub intervals: Vec<TimerRequest>,
	/// Timers to release, applied before `intervals`
	pub cancelled: Vec<TimerHandle>,
}

impl ComponentResponse {
	pub fn none() -> Self {
		Self::default()
	}

	pub fn emit(event: Event) -> Self {
		Self {
			events: vec![event],
			..Default::default()
		}
	}

	pub fn interval(handle: TimerHandle, event: Event, period: Duration) -> Self {
		Self::none().with_interval(handle, event, period)
	}

	pub fn with_interval(mut self, handle: TimerHandle, event: Event, period: Duration) -> Self {
		self.intervals.push(TimerRequest {
			handle,
			event,
			period,
		});
		self
	}

	pub fn with_cancel(mut self, handle: TimerHandle) -> Self {
		self.cancelled.push(handle);
		self
	}
}

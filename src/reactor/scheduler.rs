use super::event::{Event, TimerHandle};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

/// Shortest period an interval may use
const MIN_PERIOD: Duration = Duration::from_millis(1);

struct ScheduledEvent {
	emit_at: Instant,
	seq: u64,
	ticket: u64,
	handle: TimerHandle,
	period: Duration,
	event: Event,
}

impl PartialEq for ScheduledEvent {
	fn eq(&self, other: &Self) -> bool {
		self.emit_at == other.emit_at && self.seq == other.seq
	}
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for ScheduledEvent {
	fn cmp(&self, other: &Self) -> Ordering {
		// Min-heap on deadline, ties fire in arming order
		other
			.emit_at
			.cmp(&self.emit_at)
			.then_with(|| other.seq.cmp(&self.seq))
	}
}

/// Timer facility with cancellable interval handles.
///
/// Time only moves when [`Scheduler::pop_due`] is called, so everything armed
/// while handling a timer event is measured from that event's deadline rather
/// than from wall-clock time.
pub struct Scheduler {
	pending: BinaryHeap<ScheduledEvent>,
	/// Live handles and the ticket of their current arming
	live: HashMap<TimerHandle, u64>,
	now: Instant,
	next_seq: u64,
}

impl Scheduler {
	pub fn new() -> Self {
		Self::starting_at(Instant::now())
	}

	pub fn starting_at(now: Instant) -> Self {
		Self {
			pending: BinaryHeap::new(),
			live: HashMap::new(),
			now,
			next_seq: 0,
		}
	}

	pub fn now(&self) -> Instant {
		self.now
	}

	/// Arm a repeating timer that first fires one `period` from now.
	/// Re-arming a live handle replaces its previous schedule.
	pub fn schedule_interval(&mut self, handle: TimerHandle, event: Event, period: Duration) {
		let seq = self.bump_seq();
		self.live.insert(handle, seq);
		let period = period.max(MIN_PERIOD);
		self.pending.push(ScheduledEvent {
			emit_at: self.now + period,
			seq,
			ticket: seq,
			handle,
			period,
			event,
		});
	}

	/// Release a timer. Returns false if it was not live.
	pub fn cancel(&mut self, handle: TimerHandle) -> bool {
		self.live.remove(&handle).is_some()
	}

	pub fn active_count(&self) -> usize {
		self.live.len()
	}

	/// Pop the earliest live timer due at or before `until` and re-arm it.
	/// When nothing is due the clock moves to `until`.
	pub fn pop_due(&mut self, until: Instant) -> Option<Event> {
		while let Some(next) = self.pending.peek() {
			if next.emit_at > until {
				break;
			}
			let Some(scheduled) = self.pending.pop() else {
				break;
			};
			if self.live.get(&scheduled.handle) != Some(&scheduled.ticket) {
				// Cancelled or replaced
				continue;
			}

			self.now = self.now.max(scheduled.emit_at);
			let event = scheduled.event.clone();
			let seq = self.bump_seq();
			self.pending.push(ScheduledEvent {
				emit_at: scheduled.emit_at + scheduled.period,
				seq,
				..scheduled
			});
			return Some(event);
		}

		self.now = self.now.max(until);
		None
	}

	fn bump_seq(&mut self) -> u64 {
		let seq = self.next_seq;
		self.next_seq += 1;
		seq
	}
}

impl Default for Scheduler {
	fn default() -> Self {
		Self::new()
	}
}

use crate::error::SequencerError;
use crate::types::{Phase, PhaseName};

/// A registered breathing pattern
pub struct Pattern {
	pub id: &'static str,
	pub label: &'static str,
	pub phases: &'static [Phase],
}

use PhaseName::{Exhale, Hold, Inhale};

static DEFAULT_PATTERNS: &[Pattern] = &[
	Pattern {
		id: "478",
		label: "4-7-8 Breathing",
		phases: &[
			Phase::new(Inhale, 4),
			Phase::new(Hold, 7),
			Phase::new(Exhale, 8),
		],
	},
	Pattern {
		id: "box",
		label: "Box Breathing",
		phases: &[
			Phase::new(Inhale, 4),
			Phase::new(Hold, 4),
			Phase::new(Exhale, 4),
			Phase::new(Hold, 4),
		],
	},
	Pattern {
		id: "diaphragm",
		label: "Diaphragmatic",
		phases: &[
			Phase::new(Inhale, 6),
			Phase::new(Hold, 2),
			Phase::new(Exhale, 6),
		],
	},
];

/// Immutable pattern id -> phase sequence table
#[derive(Clone, Copy)]
pub struct PatternCatalog {
	patterns: &'static [Pattern],
}

impl PatternCatalog {
	pub fn new() -> Self {
		Self {
			patterns: DEFAULT_PATTERNS,
		}
	}

	/// Catalog over a caller-supplied table
	#[cfg(test)]
	pub fn with_patterns(patterns: &'static [Pattern]) -> Self {
		Self { patterns }
	}

	pub fn lookup(&self, id: &str) -> Result<&'static [Phase], SequencerError> {
		self.find(id)
			.map(|p| p.phases)
			.ok_or_else(|| SequencerError::UnknownPattern(id.to_string()))
	}

	pub fn contains(&self, id: &str) -> bool {
		self.find(id).is_some()
	}

	/// Pattern ids in display order
	pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.patterns.iter().map(|p| p.id)
	}

	pub fn label(&self, id: &str) -> Option<&'static str> {
		self.find(id).map(|p| p.label)
	}

	/// Length of one full cycle in seconds
	pub fn cycle_seconds(&self, id: &str) -> Result<u32, SequencerError> {
		Ok(self.lookup(id)?.iter().map(|p| p.seconds).sum())
	}

	/// First registered pattern, used when no valid selection exists
	pub fn default_id(&self) -> &'static str {
		self.patterns.first().map(|p| p.id).unwrap_or_default()
	}

	fn find(&self, id: &str) -> Option<&'static Pattern> {
		self.patterns.iter().find(|p| p.id == id)
	}
}

impl Default for PatternCatalog {
	fn default() -> Self {
		Self::new()
	}
}

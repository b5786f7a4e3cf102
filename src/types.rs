/// Named segment of a breathing pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseName {
	Inhale,
	Hold,
	Exhale,
}

impl PhaseName {
	/// Text shown while the phase is active
	pub fn label(&self) -> &'static str {
		match self {
			PhaseName::Inhale => "Inhale",
			PhaseName::Hold => "Hold",
			PhaseName::Exhale => "Exhale",
		}
	}

	pub fn animation(&self) -> AnimationState {
		match self {
			PhaseName::Inhale => AnimationState::Inhale,
			PhaseName::Hold => AnimationState::Hold,
			PhaseName::Exhale => AnimationState::Exhale,
		}
	}
}

/// Animation tag driven by phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
	#[default]
	None,
	Inhale,
	Hold,
	Exhale,
}

/// One step of a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
	pub name: PhaseName,
	pub seconds: u32,
}

impl Phase {
	pub const fn new(name: PhaseName, seconds: u32) -> Self {
		Self { name, seconds }
	}
}

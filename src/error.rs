use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
	#[error("unknown breathing pattern '{0}'")]
	UnknownPattern(String),
	#[error("a session is already running")]
	DoubleStart,
}

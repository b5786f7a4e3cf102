use crate::catalog::PatternCatalog;
use crate::reactor::{ComponentResponse, Event, SettingsEvent};
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.toml";

/// Preferences kept between launches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Pattern selected when the window opens
	pub default_pattern: String,
	pub window_width: f32,
	pub window_height: f32,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			default_pattern: PatternCatalog::new().default_id().to_owned(),
			window_width: 480.0,
			window_height: 640.0,
		}
	}
}

impl Settings {
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let text = fs::read_to_string(path)
			.with_context(|| format!("reading {}", path.display()))?;
		let settings = toml::from_str(&text)
			.with_context(|| format!("parsing {}", path.display()))?;
		Ok(settings)
	}

	/// Load from `path`, falling back to defaults when it is missing or broken
	pub fn load_or_default(path: &Path) -> Self {
		if !path.exists() {
			log::info!("No settings at {}, using defaults", path.display());
			return Self::default();
		}
		match Self::load(path) {
			Ok(settings) => {
				log::info!("Loaded settings from {}", path.display());
				settings
			}
			Err(e) => {
				log::warn!("Ignoring settings file: {:#}", e);
				Self::default()
			}
		}
	}

	pub fn save(&self, path: &Path) -> anyhow::Result<()> {
		if let Some(dir) = path.parent() {
			fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
		}
		let text = toml::to_string_pretty(self).context("serializing settings")?;
		fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
		Ok(())
	}
}

/// Platform config location, e.g. `~/.config/breathe-rs/settings.toml`
pub fn default_path() -> Option<PathBuf> {
	ProjectDirs::from("", "", "breathe-rs").map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

pub struct SettingsManager {
	settings: Settings,
	/// None keeps settings in memory only
	path: Option<PathBuf>,
}

impl SettingsManager {
	pub fn new(settings: Settings, path: Option<PathBuf>) -> Self {
		Self { settings, path }
	}

	/// Settings from the platform config directory
	pub fn from_default_location() -> Self {
		let path = default_path();
		let settings = match &path {
			Some(p) => Settings::load_or_default(p),
			None => {
				log::warn!("No config directory available, settings will not persist");
				Settings::default()
			}
		};
		Self::new(settings, path)
	}

	pub fn handle(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::Settings(SettingsEvent::PatternSelected { pattern_id }) => {
				if self.settings.default_pattern == *pattern_id {
					return ComponentResponse::none();
				}
				self.settings.default_pattern = pattern_id.clone();
				self.persist();
				ComponentResponse::none()
			}
			_ => ComponentResponse::none(),
		}
	}

	fn persist(&self) {
		let Some(path) = &self.path else {
			return;
		};
		match self.settings.save(path) {
			Ok(()) => log::debug!("Saved settings to {}", path.display()),
			Err(e) => log::error!("Failed to save settings: {:#}", e),
		}
	}

	// Accessors for ViewManager/UI
	pub fn settings(&self) -> &Settings {
		&self.settings
	}
}

impl Default for SettingsManager {
	fn default() -> Self {
		Self::new(Settings::default(), None)
	}
}

#![windows_subsystem = "windows"]

mod breathing;
mod catalog;
mod display;
mod error;
mod reactor;
mod settings;
mod types;
mod view;

#[cfg(test)]
mod testutil;

use display::DisplayState;
use reactor::Reactor;
use settings::SettingsManager;

fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let settings = SettingsManager::from_default_location();
	let (width, height) = {
		let s = settings.settings();
		(s.window_width, s.window_height)
	};

	let native_options = eframe::NativeOptions {
		viewport: eframe::egui::ViewportBuilder::default()
			.with_inner_size([width, height])
			.with_min_inner_size([320.0, 400.0]),
		..Default::default()
	};

	eframe::run_native(
		"Breathe",
		native_options,
		Box::new(|_cc| Ok(Box::new(Reactor::new(DisplayState::new(), settings)))),
	)
	.map_err(|e| anyhow::anyhow!("Failed to run window: {}", e))
}

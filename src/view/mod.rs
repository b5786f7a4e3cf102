use crate::breathing::PhaseSequencer;
use crate::display::DisplayState;
use crate::reactor::{Event, SessionEvent};
use crate::types::AnimationState;
use eframe::egui;

/// Circle radius range as a fraction of the shorter side of the canvas
const CIRCLE_MIN: f32 = 0.18;
const CIRCLE_MAX: f32 = 0.42;

pub struct ViewManager {
	/// Circle size, 0.0 = fully exhaled, 1.0 = fully inhaled
	circle_fill: f32,
}

impl ViewManager {
	pub fn new() -> Self {
		Self { circle_fill: 0.0 }
	}

	/// Main render function of the whole thing
	pub fn render(
		&mut self,
		ctx: &egui::Context,
		sequencer: &PhaseSequencer<DisplayState>,
	) -> Vec<Event> {
		let mut events = Vec::new();

		let is_typing = ctx.memory(|m| m.focused().is_some());
		if !is_typing && ctx.input(|i| i.key_pressed(egui::Key::Space)) {
			events.push(Event::Session(SessionEvent::Toggle));
		}

		self.render_top_panel(ctx, sequencer, &mut events);
		self.render_bottom_panel(ctx, sequencer.display());
		self.render_central_panel(ctx, sequencer.display());

		events
	}

	fn render_top_panel(
		&mut self,
		ctx: &egui::Context,
		sequencer: &PhaseSequencer<DisplayState>,
		events: &mut Vec<Event>,
	) {
		egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
			ui.horizontal(|ui| {
				ui.label("Pattern:");

				let catalog = sequencer.catalog();
				let selected = sequencer.selected_pattern();
				let selected_label = catalog.label(selected).unwrap_or(selected);
				egui::ComboBox::from_id_salt("pattern")
					.selected_text(selected_label)
					.show_ui(ui, |ui| {
						for id in catalog.ids() {
							let label = catalog.label(id).unwrap_or(id);
							if ui.selectable_label(id == selected, label).clicked() && id != selected
							{
								events.push(Event::Session(SessionEvent::SelectPattern {
									pattern_id: id.to_owned(),
								}));
							}
						}
					});

				ui.separator();

				if sequencer.is_running() {
					if ui.button("Stop").clicked() {
						events.push(Event::Session(SessionEvent::Stop));
					}
				} else if ui.button("Start").clicked() {
					events.push(Event::Session(SessionEvent::Start {
						pattern_id: selected.to_owned(),
					}));
				}
			});
		});
	}

	fn render_bottom_panel(&self, ctx: &egui::Context, display: &DisplayState) {
		egui::TopBottomPanel::bottom("session_panel").show(ctx, |ui| {
			ui.add_space(4.0);
			ui.label(display.session_clock.as_str());
			ui.add(egui::ProgressBar::new(display.progress_percent / 100.0).show_percentage());
			ui.add_space(4.0);
		});
	}

	fn render_central_panel(&mut self, ctx: &egui::Context, display: &DisplayState) {
		self.update_circle(display);

		egui::CentralPanel::default().show(ctx, |ui| {
			let size = ui.available_size();
			let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
			let painter = ui.painter_at(rect);

			let center = rect.center();
			let short_side = rect.width().min(rect.height());
			let radius = short_side * (CIRCLE_MIN + (CIRCLE_MAX - CIRCLE_MIN) * self.circle_fill);
			let color = Self::phase_color(display.animation);

			painter.circle_filled(center, radius, color.gamma_multiply(0.35));
			painter.circle_stroke(center, radius, egui::Stroke::new(3.0, color));

			let font_size = (short_side * 0.08).max(16.0);
			painter.text(
				center - egui::vec2(0.0, font_size * 0.6),
				egui::Align2::CENTER_CENTER,
				&display.phase_text,
				egui::FontId::proportional(font_size),
				egui::Color32::WHITE,
			);
			painter.text(
				center + egui::vec2(0.0, font_size * 0.6),
				egui::Align2::CENTER_CENTER,
				display.countdown.to_string(),
				egui::FontId::monospace(font_size * 1.2),
				egui::Color32::LIGHT_GRAY,
			);
		});

		if display.animation != AnimationState::None {
			ctx.request_repaint();
		}
	}

	/// Ease the circle towards the size the current phase calls for
	fn update_circle(&mut self, display: &DisplayState) {
		let span = display.animation_span.max(1) as f32;
		let progress = (display.animation_started.elapsed().as_secs_f32() / span).clamp(0.0, 1.0);
		let eased = (1.0 - (progress * std::f32::consts::PI).cos()) * 0.5;

		self.circle_fill = match display.animation {
			AnimationState::Inhale => eased,
			AnimationState::Exhale => 1.0 - eased,
			// Holds keep whatever size the previous phase ended on
			AnimationState::Hold => self.circle_fill,
			AnimationState::None => 0.0,
		};
	}

	fn phase_color(state: AnimationState) -> egui::Color32 {
		match state {
			AnimationState::Inhale => egui::Color32::LIGHT_BLUE,
			AnimationState::Hold => egui::Color32::YELLOW,
			AnimationState::Exhale => egui::Color32::GREEN,
			AnimationState::None => egui::Color32::GRAY,
		}
	}
}

impl Default for ViewManager {
	fn default() -> Self {
		Self::new()
	}
}

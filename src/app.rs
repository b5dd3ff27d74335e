use eframe::egui;

use crate::placeholder::PlaceholderCache;
use crate::state::AppState;
use crate::ui::{grid, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ImageGridApp {
    pub state: AppState,
    placeholders: PlaceholderCache,
}

impl ImageGridApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            placeholders: PlaceholderCache::default(),
        }
    }
}

impl eframe::App for ImageGridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + filters ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });
        egui::TopBottomPanel::top("filter_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            panels::filter_bar(ui, &mut self.state);
            ui.add_space(4.0);
        });

        // ---- Central panel: cards ----
        egui::CentralPanel::default().show(ctx, |ui| {
            grid::image_grid(ui, &self.state, &mut self.placeholders);
        });
    }
}

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::ImageRecord;
use crate::placeholder::{CARD_IMAGE_SIZE, PlaceholderCache, placeholder_path};
use crate::state::AppState;

use super::panels::display_category;

const CARD_WIDTH: f32 = 260.0;
const IMAGE_HEIGHT: f32 = 192.0;

pub const NO_RESULTS: &str = "No images found matching your filters.";

/// How many cards fit side by side; at least one.
pub fn column_count(available_width: f32, spacing: f32) -> usize {
    (((available_width + spacing) / (CARD_WIDTH + spacing)).floor() as usize).max(1)
}

// ---------------------------------------------------------------------------
// Image grid (central panel)
// ---------------------------------------------------------------------------

/// Render the visible records as cards, or the empty-state message.
pub fn image_grid(ui: &mut Ui, state: &AppState, placeholders: &mut PlaceholderCache) {
    if !state.has_results() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(NO_RESULTS).color(Color32::GRAY));
        });
        return;
    }

    let (w, h) = CARD_IMAGE_SIZE;
    let image_path = placeholder_path(w, h);
    let image_bytes = placeholders.resolve(&image_path);

    let spacing = ui.spacing().item_spacing.x;
    let columns = column_count(ui.available_width(), spacing);
    let records: Vec<&ImageRecord> = state.visible_records().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for row in records.chunks(columns) {
                ui.horizontal_top(|ui: &mut Ui| {
                    for record in row {
                        card(ui, state, record, &image_path, image_bytes.as_ref());
                    }
                });
                ui.add_space(spacing);
            }
        });
}

fn card(
    ui: &mut Ui,
    state: &AppState,
    record: &ImageRecord,
    image_path: &str,
    image_bytes: Option<&std::sync::Arc<[u8]>>,
) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(CARD_WIDTH);
        ui.vertical(|ui: &mut Ui| {
            match image_bytes {
                Some(bytes) => {
                    let uri = format!("bytes:/{image_path}.png");
                    ui.add(
                        egui::Image::from_bytes(uri, egui::load::Bytes::Shared(bytes.clone()))
                            .fit_to_exact_size(egui::vec2(CARD_WIDTH, IMAGE_HEIGHT)),
                    )
                    .on_hover_text(record.name.as_str());
                }
                None => {
                    ui.add_sized([CARD_WIDTH, IMAGE_HEIGHT], egui::Label::new(image_path));
                }
            }

            ui.label(RichText::new(&record.name).strong());
            ui.label(
                RichText::new(display_category(&record.category))
                    .small()
                    .color(state.colors().color_for(&record.category)),
            );
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for tag in &record.tags {
                    ui.label(
                        RichText::new(tag)
                            .small()
                            .background_color(Color32::from_gray(230))
                            .color(Color32::from_gray(60)),
                    );
                }
            });
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_width() {
        assert_eq!(column_count(0.0, 8.0), 1);
        assert_eq!(column_count(CARD_WIDTH, 8.0), 1);
        assert_eq!(column_count(2.0 * CARD_WIDTH + 8.0, 8.0), 2);
        assert_eq!(column_count(3.0 * CARD_WIDTH + 15.0, 8.0), 2);
        assert_eq!(column_count(3.0 * CARD_WIDTH + 16.0, 8.0), 3);
    }
}

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::{Selection, SortKey};
use crate::state::AppState;

const CONTROL_WIDTH: f32 = 180.0;

/// First letter upper-cased, the rest untouched.
pub fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Filter bar – search, category, tags, year, sort
// ---------------------------------------------------------------------------

/// Render the filter controls bound to the state's filter fields.
pub fn filter_bar(ui: &mut Ui, state: &mut AppState) {
    // Facets are cloned out so state can be mutated from the widgets.
    let facets = state.facets();
    let filters = state.filters().clone();

    ui.horizontal_wrapped(|ui: &mut Ui| {
        // ---- Search ----
        let mut search = filters.search_term.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut search)
                .hint_text("Search images...")
                .desired_width(240.0),
        );
        if response.changed() {
            state.set_search_term(search);
        }

        // ---- Category ----
        let category_text = filters
            .category
            .value()
            .map_or_else(|| "All Categories".to_string(), display_category);
        egui::ComboBox::from_id_salt("category")
            .selected_text(category_text)
            .width(CONTROL_WIDTH)
            .show_ui(ui, |ui: &mut Ui| {
                if ui
                    .selectable_label(filters.category.is_all(), "All Categories")
                    .clicked()
                {
                    state.set_category(Selection::All);
                }
                for cat in &facets.categories {
                    let colored = RichText::new(display_category(cat))
                        .color(state.colors().color_for(cat));
                    let selected = filters.category.value() == Some(cat.as_str());
                    if ui.selectable_label(selected, colored).clicked() {
                        state.set_category(Selection::only(cat.clone()));
                    }
                }
            });

        // ---- Tags ----
        ui.menu_button(format!("Tags ({})", filters.tags.len()), |ui: &mut Ui| {
            ui.label(RichText::new("Select Tags").strong());
            ui.separator();
            for tag in &facets.tags {
                let mut checked = state.filters().tags.contains(tag);
                if ui.checkbox(&mut checked, tag.as_str()).changed() {
                    state.set_tag_checked(tag, checked);
                }
            }
        });

        // ---- Year ----
        let year_text = filters.year.value().unwrap_or("All Years").to_string();
        egui::ComboBox::from_id_salt("year")
            .selected_text(year_text)
            .width(CONTROL_WIDTH)
            .show_ui(ui, |ui: &mut Ui| {
                if ui
                    .selectable_label(filters.year.is_all(), "All Years")
                    .clicked()
                {
                    state.set_year(Selection::All);
                }
                for year in &facets.years {
                    let value = year.to_string();
                    let selected = filters.year.value() == Some(value.as_str());
                    if ui.selectable_label(selected, value.as_str()).clicked() {
                        state.set_year(Selection::only(value));
                    }
                }
            });

        // ---- Sort ----
        egui::ComboBox::from_id_salt("sort_by")
            .selected_text(filters.sort_by.label())
            .width(CONTROL_WIDTH)
            .show_ui(ui, |ui: &mut Ui| {
                for key in SortKey::ALL {
                    if ui
                        .selectable_label(filters.sort_by == key, key.label())
                        .clicked()
                    {
                        state.set_sort(key);
                    }
                }
            });

        if ui
            .add_enabled(filters.is_filtering(), egui::Button::new("Reset"))
            .clicked()
        {
            state.reset_filters();
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Use sample data").clicked() {
                state.set_dataset(crate::data::sample::sample_dataset(), None);
                ui.close_menu();
            }
        });

        ui.separator();

        let source = state
            .source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sample".to_string());
        ui.label(format!(
            "{source}: {} images, {} visible",
            state.dataset().len(),
            state.visible_indices().len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open image catalog")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!("Loaded {} images from {}", dataset.len(), path.display());
                state.set_dataset(dataset, Some(path));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

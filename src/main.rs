use anyhow::Result;
use clap::Parser;
use eframe::egui;

use image_grid::app::ImageGridApp;
use image_grid::cli::{Args, format_results};
use image_grid::state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let dataset = args.load_dataset()?;
    let filters = args.filter_state();

    if args.print {
        println!("{}", format_results(&dataset, &filters)?);
        return Ok(());
    }

    let mut state = AppState::new(dataset, filters, args.cache_facets);
    state.source = args.dataset.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Image Grid",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can decode the placeholder PNGs.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(ImageGridApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}

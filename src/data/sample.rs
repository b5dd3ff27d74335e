use super::model::{ImageDataset, ImageRecord};

/// The catalog shown before anything is loaded.
pub fn sample_records() -> Vec<ImageRecord> {
    vec![
        ImageRecord::new(
            1,
            "Mountain Landscape",
            "nature",
            &["mountains", "landscape"],
            2023,
        ),
        ImageRecord::new(2, "City Night", "urban", &["city", "night"], 2024),
        ImageRecord::new(3, "Ocean Sunset", "nature", &["ocean", "sunset"], 2023),
    ]
}

pub fn sample_dataset() -> ImageDataset {
    ImageDataset::from_records(sample_records()).unwrap_or_default()
}

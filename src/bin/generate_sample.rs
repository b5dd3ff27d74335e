use std::path::Path;

use anyhow::Result;

use image_grid::data::loader::write_file;
use image_grid::data::model::{ImageDataset, ImageRecord};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

const SUBJECTS: [(&str, &[&str], &[&str]); 4] = [
    (
        "nature",
        &["Mountain", "Forest", "Ocean", "Desert", "Meadow", "Glacier"],
        &["mountains", "landscape", "ocean", "sunset", "trees", "snow"],
    ),
    (
        "urban",
        &["City", "Bridge", "Alley", "Skyline", "Station"],
        &["city", "night", "architecture", "street", "lights"],
    ),
    (
        "portrait",
        &["Child", "Elder", "Dancer", "Musician"],
        &["people", "studio", "smile", "black-and-white"],
    ),
    (
        "animals",
        &["Fox", "Heron", "Horse", "Owl", "Whale"],
        &["wildlife", "birds", "ocean", "closeup"],
    ),
];

const MOODS: [&str; 6] = ["at Dawn", "Night", "Sunset", "in Fog", "Landscape", "Study"];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let mut records = Vec::new();

    for id in 1..=48 {
        let (category, nouns, tags) = SUBJECTS[rng.below(SUBJECTS.len())];
        let name = format!("{} {} {id}", rng.pick(nouns), rng.pick(&MOODS));

        let mut chosen: Vec<&str> = Vec::new();
        for _ in 0..1 + rng.below(3) {
            let tag = rng.pick(tags);
            if !chosen.contains(&tag) {
                chosen.push(tag);
            }
        }
        let year = 2018 + rng.below(7) as i32;

        records.push(ImageRecord::new(id, name, category, &chosen, year));
    }

    let dataset = ImageDataset::from_records(records)?;
    for output in ["sample_catalog.parquet", "sample_catalog.json", "sample_catalog.csv"] {
        write_file(Path::new(output), &dataset)?;
        println!("Wrote {} images to {output}", dataset.len());
    }
    Ok(())
}

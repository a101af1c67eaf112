use std::env;
use std::path::Path;
use std::process;

use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use collage_layout::collage_doc::CollageDocument;
use collage_layout::config::Config;
use collage_layout::layout_generator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = Config::from_env()?;
    let Some(document_path) = env::args().nth(1) else {
        error!("Usage: collage-layout <document.collage>");
        process::exit(2);
    };

    let document = CollageDocument::open(Path::new(&document_path))?;
    info!(
        "Loaded {} ({} photos, {}x{})",
        document_path,
        document.photos.len(),
        document.width,
        document.height
    );

    let page = match config.seed {
        Some(seed) => {
            info!("Using seeded rng ({})", seed);
            layout_generator::generate_from_document(&document, &mut StdRng::seed_from_u64(seed))?
        }
        None => layout_generator::generate_from_document(&document, &mut rand::rng())?,
    };

    let geometry = page.geometry();
    let json = if config.pretty_output {
        serde_json::to_string_pretty(&geometry)?
    } else {
        serde_json::to_string(&geometry)?
    };
    println!("{}", json);

    info!(
        "Wrote geometry for {} cells across {} columns ({}x{})",
        geometry.cells.len(),
        geometry.columns.len(),
        geometry.width.round(),
        geometry.height.round()
    );

    Ok(())
}

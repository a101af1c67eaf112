use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Seed for the layout rng; unset means a fresh random layout per run.
    pub seed: Option<u64>,
    pub pretty_output: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let seed = match env::var("COLLAGE_LAYOUT_SEED") {
            Ok(value) => Some(value.parse()?),
            Err(_) => None,
        };

        Ok(Config {
            seed,
            pretty_output: env::var("COLLAGE_LAYOUT_PRETTY")
                .unwrap_or_else(|_| "true".to_string())
                .parse()?,
        })
    }
}

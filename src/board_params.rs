use serde::Deserialize;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::board::{
    DEFAULT_HEIGHT, DEFAULT_IMAGE_FILENAME, DEFAULT_NUM_BALLS, DEFAULT_NUM_ROWS, DEFAULT_WIDTH,
};

/// Run-parameter file looked up in the working directory.
pub const PARAMS_FILENAME: &str = "galton_config.json";

// The JSON file is flat and every field is optional:
// { "num_rows": 12, "num_balls": 5000, "seed": 1, "output": "out.png" }
// Fields left out keep the board defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardParams {
    #[serde(default = "BoardParams::default_num_rows")]
    pub num_rows: u32,
    #[serde(default = "BoardParams::default_num_balls")]
    pub num_balls: u32,
    #[serde(default = "BoardParams::default_width")]
    pub width: u32,
    #[serde(default = "BoardParams::default_height")]
    pub height: u32,
    /// Seed for a reproducible run; absent means the process-local generator.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "BoardParams::default_output")]
    pub output: String,
    /// Draw each slot's total above its bar.
    #[serde(default)]
    pub count_labels: bool,
}

impl BoardParams {
    fn default_num_rows() -> u32 {
        DEFAULT_NUM_ROWS
    }
    fn default_num_balls() -> u32 {
        DEFAULT_NUM_BALLS
    }
    fn default_width() -> u32 {
        DEFAULT_WIDTH
    }
    fn default_height() -> u32 {
        DEFAULT_HEIGHT
    }
    fn default_output() -> String {
        DEFAULT_IMAGE_FILENAME.to_string()
    }
}

impl Default for BoardParams {
    fn default() -> Self {
        Self {
            num_rows: Self::default_num_rows(),
            num_balls: Self::default_num_balls(),
            width: Self::default_width(),
            height: Self::default_height(),
            seed: None,
            output: Self::default_output(),
            count_labels: false,
        }
    }
}

pub fn read_board_params_from_json(path: &str) -> Result<BoardParams, Box<dyn Error>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let params: BoardParams = serde_json::from_reader(reader)?;
    Ok(params)
}

/// A missing file is the normal no-config case and yields the defaults; a
/// present but unreadable or malformed file is an error.
pub fn load_board_params(path: &str) -> Result<BoardParams, Box<dyn Error>> {
    if !Path::new(path).exists() {
        return Ok(BoardParams::default());
    }
    read_board_params_from_json(path)
}

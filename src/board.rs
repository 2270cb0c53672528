use rand::Rng;

use crate::chart_renderer;
use crate::error::GaltonError;

pub const DEFAULT_NUM_ROWS: u32 = 10;
pub const DEFAULT_NUM_BALLS: u32 = 1000;
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_IMAGE_FILENAME: &str = "galton_board.png";

/// Vertical margin kept free below and above the bars, in pixels.
pub const BAR_BOTTOM_MARGIN: u32 = 20;

/// A Galton board: balls fall through `num_rows` rows of pegs, each peg
/// deflecting left or right with equal probability, and land in one of
/// `num_rows + 1` slots. Slot totals follow a binomial distribution.
#[derive(Debug, Clone)]
pub struct GaltonBoard {
    num_rows: u32,
    num_slots: u32,
    num_balls: u32,
    width: u32,
    height: u32,
    bar_width: u32,
    max_bar_height: u32,
    slot_counts: Vec<u64>,
}

impl GaltonBoard {
    /// Build a board from the four run parameters. Every parameter must be
    /// strictly positive; the offending parameter is named in the error.
    pub fn new(
        num_rows: u32,
        num_balls: u32,
        width: u32,
        height: u32,
    ) -> Result<Self, GaltonError> {
        validate_parameters(num_rows, num_balls, width, height)?;
        Ok(Self::from_validated(num_rows, num_balls, width, height))
    }

    fn from_validated(num_rows: u32, num_balls: u32, width: u32, height: u32) -> Self {
        let num_slots = num_rows + 1;
        Self {
            num_rows,
            num_slots,
            num_balls,
            width,
            height,
            bar_width: width / (num_slots + 1),
            // A canvas shorter than both margins leaves no room for bars.
            max_bar_height: height.saturating_sub(BAR_BOTTOM_MARGIN * 2),
            slot_counts: vec![0; num_slots as usize],
        }
    }

    /// Drop all balls through the pegs, using the process-local generator.
    ///
    /// Repeated calls accumulate onto the existing slot totals; call
    /// [`reset`](Self::reset) first to start a fresh run on the same board.
    pub fn simulate(&mut self) {
        self.simulate_with_rng(&mut rand::rng());
    }

    /// Same walk over a caller-supplied generator, so a seeded rng gives a
    /// reproducible distribution.
    pub fn simulate_with_rng<R: Rng>(&mut self, rng: &mut R) {
        for _ in 0..self.num_balls {
            let mut slot = 0usize;
            for _ in 0..self.num_rows {
                if rng.random_bool(0.5) {
                    slot += 1;
                }
            }
            self.slot_counts[slot] += 1;
        }
    }

    /// Zero the slot counters.
    pub fn reset(&mut self) {
        self.slot_counts.fill(0);
    }

    /// Render the current slot totals as a bar histogram and write a PNG to
    /// `filename`, overwriting any existing file.
    pub fn generate_image(&self, filename: &str) -> Result<(), GaltonError> {
        chart_renderer::render_histogram_to_png(self, filename, false)
    }

    pub fn num_rows(&self) -> u32 {
        self.num_rows
    }

    pub fn num_slots(&self) -> u32 {
        self.num_slots
    }

    pub fn num_balls(&self) -> u32 {
        self.num_balls
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bar_width(&self) -> u32 {
        self.bar_width
    }

    pub fn max_bar_height(&self) -> u32 {
        self.max_bar_height
    }

    pub fn slot_counts(&self) -> &[u64] {
        &self.slot_counts
    }

    pub(crate) fn set_slot_counts(&mut self, counts: &[u64]) {
        assert_eq!(counts.len(), self.num_slots as usize);
        self.slot_counts.copy_from_slice(counts);
    }
}

impl Default for GaltonBoard {
    fn default() -> Self {
        Self::from_validated(
            DEFAULT_NUM_ROWS,
            DEFAULT_NUM_BALLS,
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
        )
    }
}

fn validate_parameters(
    num_rows: u32,
    num_balls: u32,
    width: u32,
    height: u32,
) -> Result<(), GaltonError> {
    if num_rows == 0 {
        return Err(GaltonError::InvalidParameter {
            param: "num_rows",
            reason: "number of rows must be positive",
        });
    }
    if num_balls == 0 {
        return Err(GaltonError::InvalidParameter {
            param: "num_balls",
            reason: "number of balls must be positive",
        });
    }
    if width == 0 {
        return Err(GaltonError::InvalidParameter {
            param: "width",
            reason: "width must be positive",
        });
    }
    if height == 0 {
        return Err(GaltonError::InvalidParameter {
            param: "height",
            reason: "height must be positive",
        });
    }
    Ok(())
}

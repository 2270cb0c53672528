//! Galton board simulation rendered as a PNG histogram: balls fall through
//! rows of pegs, deflecting left or right at each peg, and land in slots
//! whose totals follow a binomial distribution. The slot totals are drawn
//! as a vertical-bar chart and written to an image file.

pub mod board;
pub mod board_params;
pub mod chart_renderer;
pub mod error;

pub use board::GaltonBoard;
pub use error::GaltonError;

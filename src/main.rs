use rand::SeedableRng;
use rand::rngs::StdRng;

use galton_board::GaltonBoard;
use galton_board::board_params::{self, PARAMS_FILENAME};
use galton_board::chart_renderer;

fn main() {
    // optional run parameters from the working directory; defaults otherwise
    let params = match board_params::load_board_params(PARAMS_FILENAME) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Failed to read {PARAMS_FILENAME}: {e}");
            std::process::exit(1);
        }
    };

    let mut board =
        match GaltonBoard::new(params.num_rows, params.num_balls, params.width, params.height) {
            Ok(board) => board,
            Err(e) => {
                eprintln!("Failed to set up galton board: {e}");
                std::process::exit(1);
            }
        };

    match params.seed {
        Some(seed) => board.simulate_with_rng(&mut StdRng::seed_from_u64(seed)),
        None => board.simulate(),
    }

    if let Err(e) = chart_renderer::render_histogram_to_png(&board, &params.output, params.count_labels) {
        eprintln!("Failed to render galton board: {e}");
        std::process::exit(1);
    } else {
        println!("Galton board image written to {}", params.output);
    }
}

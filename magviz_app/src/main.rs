//! MagViz executable
//!
//! Opens the MagViz window and runs until it is closed. Exit code 0 on a clean
//! close, 1 when the window or OpenGL context could not be brought up.

use magviz_engine::{application, foundation::logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();

    let ignored = std::env::args().skip(1).count();
    if ignored > 0 {
        log::debug!("Ignoring {ignored} command-line argument(s)");
    }

    application::run_default().into()
}

mod commands;
mod render;
mod setup;

/// Run the CLI, printing any error to stderr and exiting with status 1.
pub fn run() {
    if let Err(e) = commands::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = placefinder_cli::run() {
        eprintln!("placefinder: {err}");
        std::process::exit(1);
    }
}

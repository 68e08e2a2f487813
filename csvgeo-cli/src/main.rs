//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = csvgeo_cli::run() {
        eprintln!("csvgeo: {err}");
        std::process::exit(1);
    }
}

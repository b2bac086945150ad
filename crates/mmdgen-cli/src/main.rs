//! mmdgen CLI - Render Mermaid.js diagrams to PNG, SVG and PDF

mod cli;
mod interactive;
mod status;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    let mut app = cli::MmdgenApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

use clap::Parser;
use std::process;

use glucoscope::cli::{self, Cli};

fn main() {
  let cli = Cli::parse();
  herald::set_color(!cli.no_color);

  let config = match cli::load_config(&cli) {
    Ok(config) => config,
    Err(e) => {
      herald::error!("{e:#}");
      process::exit(1);
    }
  };
  let color = cli.color_enabled(&config);
  herald::set_color(color);
  herald::init_tracing(env!("CARGO_CRATE_NAME"), cli.verbose, color);

  match cli::run(&cli, &config) {
    Ok(status) => process::exit(status.exit_code()),
    Err(e) => {
      herald::error!("{e:#}");
      process::exit(1);
    }
  }
}

//! Convert a TrueType or OpenType font into a ufnt bitmap font.
//!
//! ```sh
//! mkfont --range 0x20 0x7e --range 0xa0 0xff DejaVuSans.ttf 12 font.bin
//! ```

use clap::Parser;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = mkfont::Args::parse();
    if let Err(e) = mkfont::run(&args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

use std::io;
use std::process;

use camino::Utf8PathBuf;
use clap::Parser;

use sat_offsets::{process_file, HorizonsClient};

/// Add spacecraft offset records to an 80-column astrometry file.
///
/// The rewritten stream goes to stdout; diagnostics go to stderr.
#[derive(Debug, Parser)]
#[command(name = "sat-offsets", version)]
struct Cli {
    /// Input file of 80-column astrometry.
    input: Utf8PathBuf,

    /// Verbosity; pass a level for more detail (1 = debug, 2 = trace).
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        num_args = 0..=1,
        default_missing_value = "1"
    )]
    verbose: Option<u8>,
}

fn main() {
    let cli = Cli::parse();

    let spec = match cli.verbose {
        None | Some(0) => "info",
        Some(1) => "debug",
        Some(_) => "trace",
    };
    let _logger = flexi_logger::Logger::try_with_str(spec)
        .and_then(|logger| logger.start())
        .map_err(|e| eprintln!("Logger initialization failed: {e}"))
        .ok();

    let client = HorizonsClient::new();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    match process_file(&cli.input, &client, &mut writer) {
        Ok(stats) => log::info!(
            "{} positions set, {} failed",
            stats.positions_set,
            stats.positions_failed
        ),
        Err(e) => {
            eprintln!("sat-offsets: {e}");
            process::exit(1);
        }
    }
}

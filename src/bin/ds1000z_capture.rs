use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use ds1000z::{Config, DS1000Z, Source, WaveMode};
use ds1000z::devices::ds1000z::screenshot::ImageFormat;

/// Capture a waveform from a Rigol DS1000Z over the network
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Hostname or IP address of the oscilloscope
    host: String,

    /// Waveform source: CHAN1-CHAN4, D0-D15 or MATH
    #[arg(short, long, default_value = "CHAN1")]
    source: Source,

    /// Reading mode: NORM (screen), MAX or RAW (internal memory)
    #[arg(short, long, default_value = "NORM")]
    mode: WaveMode,

    /// Where to write the waveform, stdout if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write JSON instead of CSV
    #[arg(long)]
    json: bool,

    /// Print the instrument's state as JSON on stderr before capturing
    #[arg(long)]
    state: bool,

    /// Also save a screenshot to this file
    #[arg(long)]
    screenshot: Option<PathBuf>,

    #[arg(long, default_value = "PNG")]
    image_format: ImageFormat,

    /// JSON file with link settings (timeouts, device name, throttle)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ds1000z::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    let mut scope = DS1000Z::connect(&args.host, &config)?;

    if args.state {
        let state = scope.get_full_state()?;
        eprintln!("{}", serde_json::to_string_pretty(&state).map_err(io::Error::from)?);
    }

    if let Some(path) = &args.screenshot {
        let image = scope.screenshot(args.image_format)?;
        std::fs::write(path, &image)?;
        log::info!("saved {} byte screenshot to {}", image.len(), path.display());
    }

    let series = scope.fetch_waveform(args.source, args.mode)?;
    log::info!("captured {} points from {}", series.len(), args.source);

    let out:Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    if args.json {
        let mut out = out;
        serde_json::to_writer(&mut out, &series).map_err(io::Error::from)?;
        writeln!(out)?;
        out.flush()?;
    } else {
        series.write_csv(out)?;
    }

    Ok(())
}

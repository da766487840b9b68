use std::path::PathBuf;
use clap::Parser;
use log::LevelFilter;
use perfplot::{
    logger,
    report::{self, ChartOptions, DEFAULT_OUTPUT, DEFAULT_SOURCE},
};

#[derive(Parser, Debug)]
#[command(name = "perfplot", version,
          about = "Plot benchmark time against thread count")]
struct Cli {
    #[arg(default_value = DEFAULT_SOURCE,
          help = "Results table (CSV with Method, NumThreads, TimeMs columns)")]
    source: PathBuf,
    #[arg(default_value = DEFAULT_OUTPUT,
          help = "Image to write; the format follows the extension")]
    output: PathBuf,
    #[arg(long, default_value_t = 10., help = "Figure width in inches")]
    width: f64,
    #[arg(long, default_value_t = 6., help = "Figure height in inches")]
    height: f64,
    #[arg(long, help = "Resolution in dots per inch")]
    dpi: Option<f64>,
    #[arg(long, default_value = "warn",
          help = "Log level on stderr: off|error|warn|info|debug|trace")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();
    let level = logger::parse_level(&cli.log_level).unwrap_or(LevelFilter::Warn);
    if let Err(e) = logger::init(level) {
        eprintln!("logging disabled: {e}");
    }
    let options = ChartOptions { width: cli.width, height: cli.height,
                                 dpi: cli.dpi };
    report::plot_results_with(&cli.source, &cli.output, &options);
}

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "benchplot")]
#[command(about = "Chart benchmark results across runtimes", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Config file (default: ~/.config/benchplot/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show more detail (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// IPC benchmark: knitting vs worker vs websocket vs http
    ///
    /// Writes one chart per runtime plus `ipc_combined.png` when more than
    /// one runtime has results.
    Ipc(IpcArgs),

    /// Latency benchmark: worker vs knitting, all runtimes on one chart
    Latency(ReportArgs),

    /// Multi-threaded benchmark: worker vs knitting, all runtimes on one chart
    Multi(ReportArgs),

    /// Types benchmark: one chart per message count, payload types on the x axis
    Types(ReportArgs),

    /// With-load benchmark: speedup and parallel efficiency per thread count
    Withload(ReportArgs),

    /// Stitch rendered charts side by side into one image
    Montage(MontageArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Results directory (or a single result file, for `ipc`)
    #[arg(short, long, default_value = "./results")]
    pub input: PathBuf,

    /// Output directory, or a `.png` path for single-chart reports
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Also print the plotted values as a table
    #[arg(long)]
    pub table: bool,
}

impl ReportArgs {
    pub fn out_or<'a>(&'a self, default: &'a str) -> &'a Path {
        self.out.as_deref().unwrap_or(Path::new(default))
    }
}

#[derive(Args, Debug, Clone)]
pub struct IpcArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Stitch the per-runtime charts into `ipc_montage.png`
    #[arg(long)]
    pub montage: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MontageArgs {
    /// Images to stitch, left to right
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Output image
    #[arg(short, long, default_value = "./charts/montage.png")]
    pub out: PathBuf,
}

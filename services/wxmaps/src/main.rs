//! wxmaps command-line entry point.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use grid_processor::IndexWindow;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use wx_common::{BoundingBox, HourlyRange};

use wxmaps::acis::AcisClient;
use wxmaps::conus404::Conus404Client;
use wxmaps::fetch::{DapClient, HttpFetcher};
use wxmaps::nomads::NomadsClient;
use wxmaps::pipelines::gust::GustRun;
use wxmaps::pipelines::precip_type::PrecipTypeRun;
use wxmaps::pipelines::snowfall::SnowfallRun;
use wxmaps::pipelines::{self, load_overlays, RunContext};
use wxmaps::styles::ProductStyles;
use wxmaps::config::OverlayConfig;
use wxmaps::{ForecastModel, GustRequest, WxmapsConfig};

#[derive(Parser, Debug)]
#[command(name = "wxmaps")]
#[command(about = "Render CONUS404 and NAM/HRRR weather maps to PNG")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "WXMAPS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory the maps are written under
    #[arg(short, long, default_value = "output", global = true)]
    output_dir: PathBuf,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// JSON file overriding the built-in color scales
    #[arg(long, global = true)]
    styles: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hourly precipitation type, MSLP and wind maps from CONUS404
    PrecipType {
        /// First hour, e.g. "1993-03-12 00:00"
        #[arg(long)]
        start: String,

        /// Last hour, inclusive
        #[arg(long)]
        end: String,

        /// Map extent "west,east,south,north"
        #[arg(long, value_parser = BoundingBox::parse_extent)]
        extent: Option<BoundingBox>,

        /// Grid crop "rows,cols", e.g. "250:-200,700:"
        #[arg(long)]
        window: Option<IndexWindow>,
    },

    /// Storm-total snowfall from CONUS404 with COOP station totals
    Snowfall {
        /// First hour, e.g. "1989-12-22 00:00"
        #[arg(long)]
        start: String,

        /// Last hour, inclusive
        #[arg(long)]
        end: String,

        /// Map extent "west,east,south,north"
        #[arg(long, value_parser = BoundingBox::parse_extent)]
        extent: Option<BoundingBox>,

        /// Grid crop "rows,cols"
        #[arg(long)]
        window: Option<IndexWindow>,

        /// Snow-to-liquid ratio
        #[arg(long)]
        slr: Option<f32>,

        /// Output file name (without extension)
        #[arg(long)]
        name: Option<String>,
    },

    /// Surface wind gust maps for one NAM or HRRR cycle
    Gust {
        #[arg(long, value_enum, ignore_case = true)]
        model: ForecastModel,

        /// Cycle hour, e.g. "06"
        #[arg(long)]
        hour: String,

        /// Cycle date, YYYYMMDD
        #[arg(long)]
        date: String,

        /// Named region from the config
        #[arg(long)]
        region: Option<String>,
    },
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main(args))
}

fn init_tracing(log_level: &str, format: LogFormat) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder().with_max_level(level);
    match format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
    }
    Ok(())
}

async fn async_main(args: Args) -> Result<()> {
    let config = WxmapsConfig::load(args.config.as_deref())?;

    // Validate the request before touching the network.
    let job = Job::from_command(args.command, &config)?;

    let http = HttpFetcher::new(config.http.timeout(), &config.http.user_agent)?;
    let ctx = build_context(
        &config,
        job.overlays(&config),
        &http,
        &args.output_dir,
        args.styles.as_deref(),
    )
    .await?;
    info!(output_dir = %ctx.output_dir.display(), "Starting wxmaps");

    match job {
        Job::PrecipType(run) => {
            let source = Conus404Client::new(DapClient::new(http), &config.servers.conus404);
            let written = pipelines::precip_type::run(&ctx, &source, &run).await?;
            info!(maps = written.len(), "Precip-type run complete");
        }
        Job::Snowfall(run) => {
            let reanalysis = Conus404Client::new(DapClient::new(http.clone()), &config.servers.conus404);
            let stations = AcisClient::new(http, &config.servers.acis);
            let path = pipelines::snowfall::run(&ctx, &reanalysis, &stations, &run).await?;
            info!(path = %path.display(), "Snowfall run complete");
        }
        Job::Gust(run) => {
            let source = NomadsClient::new(DapClient::new(http), &config.servers.nomads);
            let written = pipelines::gust::run(&ctx, &source, &run).await?;
            info!(maps = written.len(), "Gust run complete");
        }
    }

    Ok(())
}

/// A validated run, with CLI flags already merged over the config.
enum Job {
    PrecipType(PrecipTypeRun),
    Snowfall(SnowfallRun),
    Gust(GustRun),
}

impl Job {
    fn from_command(command: Command, config: &WxmapsConfig) -> Result<Self> {
        let job = match command {
            Command::PrecipType {
                start,
                end,
                extent,
                window,
            } => {
                let range = parse_range(&start, &end)?;
                Job::PrecipType(PrecipTypeRun {
                    range,
                    extent: extent.unwrap_or_else(|| BoundingBox::from_extent(config.precip_type.extent)),
                    window: window.unwrap_or(config.precip_type.window),
                })
            }
            Command::Snowfall {
                start,
                end,
                extent,
                window,
                slr,
                name,
            } => {
                let range = parse_range(&start, &end)?;
                let slr = slr.unwrap_or(config.snowfall.slr);
                if slr.is_nan() || slr <= 0.0 {
                    anyhow::bail!("--slr must be positive, got {}", slr);
                }
                Job::Snowfall(SnowfallRun {
                    range,
                    extent: extent.unwrap_or_else(|| BoundingBox::from_extent(config.snowfall.extent)),
                    window: window.unwrap_or(config.snowfall.window),
                    slr,
                    name,
                })
            }
            Command::Gust {
                model,
                hour,
                date,
                region,
            } => {
                let request = GustRequest::new(model, &hour, &date)?;
                let region_name = region.unwrap_or_else(|| config.gust.region.clone());
                Job::Gust(GustRun {
                    request,
                    region: config.region(&region_name)?,
                    padding: config.gust.padding,
                })
            }
        };
        Ok(job)
    }

    /// Boundary layers configured for this job's product.
    fn overlays<'a>(&self, config: &'a WxmapsConfig) -> &'a [OverlayConfig] {
        match self {
            Job::PrecipType(_) => &config.precip_type.overlays,
            Job::Snowfall(_) => &config.snowfall.overlays,
            Job::Gust(_) => &config.gust.overlays,
        }
    }
}

fn parse_range(start: &str, end: &str) -> Result<HourlyRange> {
    let range = HourlyRange::parse(start, end).context("Invalid time range")?;
    if range.is_empty() {
        warn!(start = %range.start(), end = %range.end(), "End is before start, nothing to do");
    }
    Ok(range)
}

async fn build_context(
    config: &WxmapsConfig,
    overlays: &[OverlayConfig],
    http: &HttpFetcher,
    output_dir: &Path,
    styles_override: Option<&Path>,
) -> Result<RunContext> {
    let styles_path = styles_override.or(config.styles.as_deref());
    let styles = ProductStyles::load(styles_path)?;
    let overlays = load_overlays(overlays, http).await?;

    Ok(RunContext {
        output_dir: output_dir.to_path_buf(),
        layout: config.image.layout(),
        credit: config.credit.clone(),
        overlays,
        styles,
    })
}

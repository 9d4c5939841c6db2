use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use color_terms::Rgb8;
use termmap::models::{ChromaMode, GeneratorConfig, Variant};
use termmap::services::{chart_sampler, Generator, TermMapLookup};

#[derive(Parser)]
#[command(name = "termmap")]
#[command(about = "Basic color term maps of the RGB cube from Munsell naming charts")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate term maps (the default command)
    Generate(GenerateArgs),
    /// Print the term of colors in a generated term map
    Lookup {
        /// Term map PNG (grayscale or palette)
        #[arg(short, long)]
        map: PathBuf,

        /// Variant whose term order applies when there is no legend file
        #[arg(long)]
        variant: Option<Variant>,

        /// Colors as hex RGB (e.g. "#E87D53" or "0f0")
        #[arg(required = true)]
        colors: Vec<String>,
    },
    /// Sample a chart image and write its confidence grids as JSON
    Sample {
        /// Which figure the chart is
        #[arg(long)]
        variant: Variant,

        /// Chart image (defaults to the variant's figure file name)
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct GenerateArgs {
    /// YAML configuration file (or TERMMAP_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generate the 20-term map (with --bct11: both; neither: configured set)
    #[arg(long)]
    bct20: bool,

    /// Generate the 11-term map
    #[arg(long)]
    bct11: bool,

    /// Color difference: cie76 or ciede2000
    #[arg(long)]
    metric: Option<String>,

    /// Classify with CIEDE2000 and report how many colors CIE76 names
    /// differently
    #[arg(long, alias = "delta_e_cie2000")]
    delta2000: bool,

    /// RGB working space (srgb, display-p3, adobe-rgb, rec2020, prophoto)
    #[arg(long)]
    space: Option<String>,

    /// Skip the second classification that counts metric differences
    #[arg(long, conflicts_with = "delta2000")]
    no_compare: bool,

    /// Munsell renotation data file (h V C x y Y rows, e.g. real.dat)
    #[arg(long)]
    renotation: Option<PathBuf>,

    /// Chroma selection: table or retry
    #[arg(long)]
    chroma_policy: Option<String>,

    /// Chart image or JSON grids for the 20-term map
    #[arg(long)]
    bct20_chart: Option<PathBuf>,

    /// Chart image or JSON grids for the 11-term map
    #[arg(long)]
    bct11_chart: Option<PathBuf>,

    /// Directory for rasters and legends
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory for the Lab cube cache
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Neither read nor write the Lab cube cache
    #[arg(long)]
    no_cache: bool,

    /// Plain report without color swatches
    #[arg(long)]
    no_color: bool,

    /// Steps per channel of the device cube
    #[arg(long, hide = true)]
    levels: Option<usize>,
}

impl GenerateArgs {
    /// Apply command-line overrides on top of the loaded configuration
    fn apply(&self, config: &mut GeneratorConfig) -> anyhow::Result<()> {
        if self.bct20 || self.bct11 {
            config.variants = Variant::ALL
                .into_iter()
                .filter(|v| match v {
                    Variant::Bct20 => self.bct20,
                    Variant::Bct11 => self.bct11,
                })
                .collect();
        }
        if let Some(metric) = &self.metric {
            config.metric = metric.clone();
        }
        if self.delta2000 {
            config.metric = "ciede2000".to_string();
            config.compare_metrics = true;
        }
        if let Some(space) = &self.space {
            config.working_space = space.clone();
        }
        if self.no_compare {
            config.compare_metrics = false;
        }
        if let Some(path) = &self.renotation {
            config.renotation = Some(path.clone());
        }
        if let Some(policy) = &self.chroma_policy {
            config.chroma_policy = match policy.to_ascii_lowercase().as_str() {
                "table" => ChromaMode::Table,
                "retry" => ChromaMode::Retry,
                other => anyhow::bail!("unknown chroma policy: {other} (expected table or retry)"),
            };
        }
        if let Some(path) = &self.bct20_chart {
            config.charts.bct20 = Some(path.clone());
        }
        if let Some(path) = &self.bct11_chart {
            config.charts.bct11 = Some(path.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if self.no_cache {
            config.use_cache = false;
        }
        if self.no_color {
            config.ansi = false;
        }
        if let Some(levels) = self.levels {
            config.levels = levels;
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Generate(args)) => run_generate_command(&args),
        Some(Commands::Lookup {
            map,
            variant,
            colors,
        }) => run_lookup_command(&map, variant, &colors),
        Some(Commands::Sample {
            variant,
            chart,
            output,
        }) => run_sample_command(variant, chart, output),
        None => run_generate_command(&GenerateArgs::default()),
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "termmap=warn",
        1 => "termmap=info",
        2 => "termmap=debug",
        _ => "termmap=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Generate the configured term maps and print their reports
fn run_generate_command(args: &GenerateArgs) -> anyhow::Result<()> {
    let config_path = args
        .config
        .clone()
        .or_else(|| std::env::var("TERMMAP_CONFIG").ok().map(PathBuf::from));
    let mut config = GeneratorConfig::load_or_default(config_path.as_deref())?;
    args.apply(&mut config)?;
    let ansi = config.ansi;

    let generator = Generator::new(config)?;
    let summary = generator.run()?;

    for report in &summary.reports {
        println!("{}", report.render(ansi));
    }
    for path in &summary.written {
        tracing::info!(path = %path.display(), "Wrote");
    }

    if !summary.is_success() {
        let messages: Vec<String> = summary
            .failures
            .iter()
            .map(|(variant, e)| format!("{variant}: {e}"))
            .collect();
        anyhow::bail!(
            "{} term map(s) not generated:\n  {}",
            messages.len(),
            messages.join("\n  ")
        );
    }
    Ok(())
}

fn run_lookup_command(map: &Path, variant: Option<Variant>, colors: &[String]) -> anyhow::Result<()> {
    let lookup = TermMapLookup::open(map, variant)?;
    for color in colors {
        let rgb: Rgb8 = color
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid color {color:?}: {e}"))?;
        match lookup.term(rgb) {
            Some(term) => println!("{rgb} {term}"),
            None => println!("{rgb} <index {}>", lookup.index(rgb)),
        }
    }
    Ok(())
}

fn run_sample_command(
    variant: Variant,
    chart: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let chart = chart.unwrap_or_else(|| variant.default_chart());
    let grids = chart_sampler::load_confidence(variant, &chart)?;
    let json = chart_sampler::confidence_to_json(&grids)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            tracing::info!(path = %path.display(), grids = grids.len(), "Wrote confidence grids");
        }
        None => println!("{json}"),
    }
    Ok(())
}

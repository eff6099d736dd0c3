use anyhow::{bail, Context, Result};
use ccml::check::check_files;
use ccml::index::{MethodReader, SearchPager};
use ccml::output;
use ccml::utils::{get_config_path, method_file_path, parse_stage, AppConfig};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ccml")]
#[command(about = "Prefix search over change-ringing method databases")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr (otherwise CCML_LOG, default warn)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the header of a method file
    Info {
        /// Path to a methods-X.ccml file
        file: PathBuf,
    },
    /// List methods whose titles start with a prefix
    Search {
        /// Stage as a number, name or file character (8, major, E)
        stage: String,

        /// Title prefix, compared as raw bytes in the device charset, so
        /// non-ASCII input does not fold like the stored titles; empty lists
        /// every method
        #[arg(default_value = "")]
        prefix: String,

        /// Page of results to show, from 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Directory holding the method files
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Decode the method at a file offset
    Show {
        /// Stage as a number, name or file character
        stage: String,

        /// Record offset, as printed by search
        offset: u64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Also print every row of the plain course
        #[arg(long)]
        rows: bool,

        /// Directory holding the method files
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Decode and verify every method of every stage file
    Check {
        /// Directory holding the method files
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load()?;
    let color = !cli.no_color;

    match cli.command {
        Commands::Info { file } => {
            show_info(&file, color)?;
        }
        Commands::Search {
            stage,
            prefix,
            page,
            dir,
        } => {
            let path = stage_file(&config, dir, &stage)?;
            search(&config, &path, &prefix, page, color)?;
        }
        Commands::Show {
            stage,
            offset,
            json,
            rows,
            dir,
        } => {
            let path = stage_file(&config, dir, &stage)?;
            show(&path, offset, json, rows, color)?;
        }
        Commands::Check { dir } => {
            let dir = methods_dir(&config, dir)?;
            check(&config, &dir, color)?;
        }
        Commands::Config => {
            println!("# {}", get_config_path()?.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_env("CCML_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn methods_dir(config: &AppConfig, dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => config.effective_methods_dir(),
    }
}

fn stage_file(config: &AppConfig, dir: Option<PathBuf>, stage: &str) -> Result<PathBuf> {
    let stage = parse_stage(stage).with_context(|| format!("Unknown stage '{}'", stage))?;
    let dir = methods_dir(config, dir)?;
    method_file_path(&dir, stage).with_context(|| format!("No method file for stage {}", stage))
}

fn open(path: &Path) -> Result<MethodReader> {
    let mut reader = MethodReader::default();
    reader
        .open_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(reader)
}

fn show_info(path: &Path, color: bool) -> Result<()> {
    let mut reader = open(path)?;
    let header = reader.header().context("Method file closed unexpectedly")?;
    let size = reader.size()?;

    let mut records = 0;
    while !reader.end_of_file()? {
        reader
            .read_summary()
            .with_context(|| format!("Failed after {} records", records))?;
        records += 1;
    }

    let mut stdout = output::stdout(color);
    output::print_file_info(&mut stdout, path, &header, size, records)?;
    Ok(())
}

fn search(config: &AppConfig, path: &Path, prefix: &str, page: usize, color: bool) -> Result<()> {
    if page == 0 {
        bail!("Pages are numbered from 1");
    }
    let mut reader = open(path)?;
    let key = prefix.as_bytes();
    let mut pager = SearchPager::new(&mut reader, key, config.page_size)?;
    let entries = pager.page(&mut reader, page - 1)?;
    let more = page < pager.pages_known();

    let mut stdout = output::stdout(color);
    output::print_search_page(&mut stdout, key, page - 1, &entries, config.title_width, more)?;
    Ok(())
}

fn show(path: &Path, offset: u64, json: bool, rows: bool, color: bool) -> Result<()> {
    let mut reader = open(path)?;
    let method = reader
        .read_method_at(offset)
        .with_context(|| format!("No method at offset {}", offset))?;

    let mut stdout = output::stdout(color);
    if json {
        writeln!(stdout, "{}", output::method_json(&method, offset)?)?;
        return Ok(());
    }
    output::print_method(&mut stdout, &method, offset)?;
    if rows {
        writeln!(stdout)?;
        output::print_rows(&mut stdout, &method)?;
    }
    Ok(())
}

fn check(config: &AppConfig, dir: &Path, color: bool) -> Result<()> {
    let paths: Vec<PathBuf> = (1..=16)
        .filter_map(|stage| method_file_path(dir, stage))
        .filter(|p| p.exists())
        .collect();
    if paths.is_empty() {
        bail!("No method files found in {}", dir.display());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.effective_parallel_files())
        .build()
        .context("Failed to start check threads")?;
    let reports = pool.install(|| check_files(&paths));

    let mut stdout = output::stdout(color);
    output::print_check_reports(&mut stdout, &reports)?;

    let failed = reports.iter().filter(|r| !r.is_clean()).count();
    if failed > 0 {
        bail!("{} of {} method files failed", failed, reports.len());
    }
    Ok(())
}

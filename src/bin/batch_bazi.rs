use bazi_engine::domain::ports::{ConfigProvider, OutputFormat};
use bazi_engine::utils::error::{BaziError, ErrorSeverity};
use bazi_engine::utils::{logger, validation};
use bazi_engine::utils::validation::Validate;
use bazi_engine::{run_batch, BatchSummary, BaziEngine, TomlConfig};
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

#[derive(Parser)]
#[command(name = "batch-bazi")]
#[command(about = "Compute charts for every row of a CSV file (year,month,day,hour,gender)")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "bazi-batch.toml")]
    config: String,

    /// Input CSV (overrides batch.input_path)
    #[arg(short, long)]
    input: Option<String>,

    /// Output file (overrides batch.output_path)
    #[arg(short, long)]
    output: Option<String>,

    /// csv or json (JSON Lines); overrides output.format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Disable result memoization
    #[arg(long)]
    no_cache: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Show the resolved settings without computing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let args = Args::parse();

    // 載入 TOML 配置; a missing default file falls back to built-in defaults
    let config = if Path::new(&args.config).exists() {
        TomlConfig::from_file(&args.config)
    } else {
        Ok(TomlConfig::default())
    };
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(args.verbose, config.log_level(), config.json_logs());
    tracing::info!("🚀 Starting batch chart computation");

    // 應用命令列覆蓋設定
    config.apply_overrides(args.format, args.no_cache);
    if config.output_format() == OutputFormat::Text {
        config.output.format = OutputFormat::Csv;
    }

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let paths = resolve_paths(&config, &args);
    let (input_path, output_path) = match paths {
        Ok(paths) => paths,
        Err(e) => fail(&e),
    };

    display_config_summary(&config, &input_path, &output_path, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No charts will be computed");
        return;
    }

    let result = if config.cache_enabled() {
        process(&BaziEngine::new(), &input_path, &output_path, config.output_format())
    } else {
        process(&BaziEngine::uncached(), &input_path, &output_path, config.output_format())
    };

    match result {
        Ok(summary) => {
            tracing::info!("✅ Batch completed: {} rows, {} failed", summary.rows, summary.failed);
            println!("✅ Batch completed!");
            println!(
                "📊 Rows: {}, failed: {}, cached charts: {}",
                summary.rows, summary.failed, summary.cached_entries
            );
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => fail(&e),
    }
}

fn resolve_paths(config: &TomlConfig, args: &Args) -> Result<(String, String), BaziError> {
    let from_file = config.batch.as_ref();
    let input = args
        .input
        .clone()
        .or_else(|| from_file.map(|b| b.input_path.clone()))
        .ok_or_else(|| BaziError::ConfigError {
            message: "no input file: pass --input or set batch.input_path".to_string(),
        })?;
    let output = args
        .output
        .clone()
        .or_else(|| from_file.map(|b| b.output_path.clone()))
        .ok_or_else(|| BaziError::ConfigError {
            message: "no output file: pass --output or set batch.output_path".to_string(),
        })?;

    validation::validate_path("input", &input)?;
    validation::validate_path("output", &output)?;
    Ok((input, output))
}

fn process<C: bazi_engine::domain::ports::ChartCache>(
    engine: &BaziEngine<C>,
    input_path: &str,
    output_path: &str,
    format: OutputFormat,
) -> Result<BatchSummary, BaziError> {
    let reader = BufReader::new(File::open(input_path)?);
    if let Some(parent) = Path::new(output_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let writer = BufWriter::new(File::create(output_path)?);
    run_batch(engine, reader, writer, format)
}

fn display_config_summary(config: &TomlConfig, input: &str, output: &str, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Input: {}", input);
    println!("  Output: {}", output);
    println!("  Format: {}", config.output_format().as_str());
    println!("  Cache: {}", if config.cache_enabled() { "on" } else { "off" });

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn fail(e: &BaziError) -> ! {
    tracing::error!(
        "❌ Batch failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

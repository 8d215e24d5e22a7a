use bazi_engine::core::report;
use bazi_engine::domain::ports::{ChartCache, ConfigProvider, OutputFormat};
use bazi_engine::utils::error::{BaziError, ErrorSeverity};
use bazi_engine::utils::{logger, validation::Validate};
use bazi_engine::{BaziEngine, CliConfig, TomlConfig};
use clap::Parser;

fn main() {
    let cli = CliConfig::parse();

    // 載入配置檔 (可選)
    let file_config = match cli.config.as_deref().map(TomlConfig::from_file).transpose() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let json_logs = file_config.as_ref().map(|c| c.json_logs()).unwrap_or(false);
    let level = file_config.as_ref().and_then(|c| c.log_level());
    logger::init_logger(cli.verbose, level, json_logs);

    tracing::info!("Starting bazi chart computation");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings: Box<dyn ConfigProvider> = match file_config {
        Some(mut config) => {
            if let Err(e) = config.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
            config.apply_overrides(cli.format, cli.no_cache);
            Box::new(config)
        }
        None => Box::new(cli.clone()),
    };

    let result = if settings.cache_enabled() {
        run(&BaziEngine::new(), &cli, settings.as_ref())
    } else {
        run(&BaziEngine::uncached(), &cli, settings.as_ref())
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!(
                "❌ Computation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", report::failure_message(&e));
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn run<C: ChartCache>(
    engine: &BaziEngine<C>,
    cli: &CliConfig,
    settings: &dyn ConfigProvider,
) -> Result<String, BaziError> {
    let input = cli.birth_input();
    let chart = engine.calculate(&input)?;
    tracing::info!(?input, "chart computed");

    match settings.output_format() {
        OutputFormat::Json if settings.pretty_json() => Ok(serde_json::to_string_pretty(&*chart)?),
        OutputFormat::Json => Ok(serde_json::to_string(&*chart)?),
        OutputFormat::Text => Ok(format!(
            "{}\n五行: {}\n{}",
            report::format_pillars(&chart),
            report::format_tally(&chart),
            report::interpretation(&chart)
        )),
        OutputFormat::Csv => Err(BaziError::InvalidConfigValueError {
            field: "output.format".to_string(),
            value: "csv".to_string(),
            reason: "csv is only available from batch_bazi".to_string(),
        }),
    }
}

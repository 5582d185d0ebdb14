use cep_geocoder::core::ConfigProvider;
use cep_geocoder::utils::{logger, validation::Validate};
use cep_geocoder::{CliConfig, EtlEngine, GeocodePipeline, LocalStorage, TomlConfig};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting cep-geocoder");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let dry_run = cli.dry_run;
    let exit_code = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => run(config.with_input(cli.input), dry_run).await,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    1
                }
            }
        }
        None => run(cli, dry_run).await,
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

async fn run<C: ConfigProvider + Validate>(config: C, dry_run: bool) -> i32 {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return e.exit_code().max(1);
    }

    if dry_run {
        display_config_summary(&config);
        return 0;
    }

    let pipeline = match GeocodePipeline::new(LocalStorage::new("."), config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            return e.exit_code().max(1);
        }
    };
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Geocoding completed successfully!");
            println!("✅ Geocoding completed successfully!");
            println!(
                "📊 {} of {} records resolved",
                report.summary.succeeded(),
                report.summary.total
            );
            println!("📁 Output saved to: {}", report.output_path);
            0
        }
        Err(e) => {
            tracing::error!(
                "❌ Geocoding failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            e.exit_code()
        }
    }
}

fn display_config_summary<C: ConfigProvider>(config: &C) {
    println!("🔍 DRY RUN - no records will be processed");
    println!("   Input:            {}", config.input_path());
    println!(
        "   Output:           {}/{}",
        config.output_path().trim_end_matches('/'),
        config.output_filename()
    );
    println!("   Address service:  {}", config.address_endpoint());
    println!("   Geocoding:        {}", config.geocoding_endpoint());
    println!("   User-Agent:       {}", config.user_agent());
    println!("   Timeout:          {:?}", config.request_timeout());
    println!("   Record delay:     {:?}", config.record_delay());
    println!("   Country:          {}", config.country());
    if config.fallback_enabled() {
        println!("   City fallback:    suffix {}", config.fallback_suffix());
    } else {
        println!("   City fallback:    disabled");
    }
}

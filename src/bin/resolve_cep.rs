use cep_geocoder::adapters::nominatim::DEFAULT_NOMINATIM_ENDPOINT;
use cep_geocoder::adapters::viacep::DEFAULT_VIACEP_ENDPOINT;
use cep_geocoder::config::{DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT};
use cep_geocoder::core::resolver::{ResolverOptions, DEFAULT_COUNTRY, DEFAULT_FALLBACK_SUFFIX};
use cep_geocoder::utils::logger;
use cep_geocoder::{normalize, CoordinateResolver, NominatimClient, ViaCepClient};
use clap::Parser;
use serde::Serialize;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "resolve-cep")]
#[command(about = "Resolve a single CEP to coordinates and print the result as JSON")]
struct Args {
    /// Postal code, with or without punctuation
    cep: String,

    #[arg(long, default_value = DEFAULT_VIACEP_ENDPOINT)]
    address_endpoint: String,

    #[arg(long, default_value = DEFAULT_NOMINATIM_ENDPOINT)]
    geocoding_endpoint: String,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    timeout_seconds: u64,

    #[arg(long, default_value = DEFAULT_COUNTRY)]
    country: String,

    /// Disable the city-level fallback for codes ending in 000
    #[arg(long)]
    no_fallback: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    postal_code: &'a str,
    latitude: &'a str,
    longitude: &'a str,
    status: &'a str,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let timeout = Duration::from_secs(args.timeout_seconds);
    let resolver = CoordinateResolver::with_options(
        ViaCepClient::new(&args.address_endpoint, &args.user_agent, timeout)?,
        NominatimClient::new(&args.geocoding_endpoint, &args.user_agent, timeout)?,
        ResolverOptions {
            country: args.country.clone(),
            fallback_enabled: !args.no_fallback,
            fallback_suffix: DEFAULT_FALLBACK_SUFFIX.to_string(),
        },
    );

    let postal_code = normalize(&args.cep).formatted;
    let result = resolver.resolve(&args.cep).await;

    let output = Output {
        postal_code: &postal_code,
        latitude: &result.latitude,
        longitude: &result.longitude,
        status: result.status.as_str(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    if !result.status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

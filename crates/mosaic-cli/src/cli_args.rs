use clap::Parser;
use mosaic_solver::SolverConfig;

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_u32(value: &str) -> Result<u32, String> {
    let parsed = value
        .parse::<u32>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "mosaic",
    about = "Discovers scattered message fragments behind a remote service and reassembles the full message",
    version
)]
/// Public struct `Cli` used across Mosaic components.
pub struct Cli {
    #[arg(
        long,
        env = "MOSAIC_BASE_URL",
        default_value = "http://localhost:8888",
        help = "Base URL of the fragment service"
    )]
    pub base_url: String,

    #[arg(
        long,
        env = "MOSAIC_MAX_CONCURRENT_REQUESTS",
        default_value = "30",
        value_parser = parse_positive_usize,
        help = "Maximum fragment requests in flight at once; also the probe batch size"
    )]
    pub max_concurrent_requests: usize,

    #[arg(
        long,
        env = "MOSAIC_REQUEST_TIMEOUT_MS",
        default_value = "5000",
        value_parser = parse_positive_u64,
        help = "Per-request timeout in milliseconds"
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long,
        env = "MOSAIC_DISCOVERY_SAMPLE_SIZE",
        default_value = "50",
        value_parser = parse_positive_usize,
        help = "Number of random identifiers probed while discovering the message structure"
    )]
    pub discovery_sample_size: usize,

    #[arg(
        long,
        env = "MOSAIC_DISCOVERY_ID_CEILING",
        default_value = "1000",
        value_parser = parse_positive_u64,
        help = "Exclusive upper bound of the low identifier range sampled during discovery"
    )]
    pub discovery_id_ceiling: u64,

    #[arg(
        long,
        env = "MOSAIC_GAP_SEARCH_ID_CEILING",
        default_value = "10000",
        value_parser = parse_positive_u64,
        help = "Exclusive upper bound of the identifier range scanned while filling gaps"
    )]
    pub gap_search_id_ceiling: u64,

    #[arg(
        long,
        env = "MOSAIC_GIVE_UP_THRESHOLD",
        default_value = "100",
        value_parser = parse_positive_u32,
        help = "Consecutive empty probe windows tolerated before the search is abandoned"
    )]
    pub give_up_threshold: u32,
}

impl Cli {
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            base_url: self.base_url.clone(),
            max_concurrent_requests: self.max_concurrent_requests,
            request_timeout_ms: self.request_timeout_ms,
            discovery_sample_size: self.discovery_sample_size,
            discovery_id_ceiling: self.discovery_id_ceiling,
            gap_search_id_ceiling: self.gap_search_id_ceiling,
            give_up_threshold: self.give_up_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn defaults_match_documented_tuning() {
        let cli = Cli::try_parse_from(["mosaic"]).expect("defaults parse");
        assert_eq!(cli.base_url, "http://localhost:8888");
        assert_eq!(cli.max_concurrent_requests, 30);
        assert_eq!(cli.request_timeout_ms, 5_000);
        assert_eq!(cli.discovery_sample_size, 50);
        assert_eq!(cli.discovery_id_ceiling, 1_000);
        assert_eq!(cli.gap_search_id_ceiling, 10_000);
        assert_eq!(cli.give_up_threshold, 100);

        let config = cli.solver_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unit_zero_valued_flags_are_rejected() {
        assert!(Cli::try_parse_from(["mosaic", "--max-concurrent-requests", "0"]).is_err());
        assert!(Cli::try_parse_from(["mosaic", "--request-timeout-ms", "0"]).is_err());
        assert!(Cli::try_parse_from(["mosaic", "--give-up-threshold", "0"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "mosaic",
            "--base-url",
            "http://decoder.example:8080",
            "--max-concurrent-requests",
            "8",
            "--give-up-threshold",
            "12",
        ])
        .expect("flags parse");
        assert_eq!(cli.base_url, "http://decoder.example:8080");
        assert_eq!(cli.max_concurrent_requests, 8);
        assert_eq!(cli.give_up_threshold, 12);
    }
}

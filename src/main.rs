use clap::{builder::BoolishValueParser, ArgAction, Parser};
use fetch_env::{fetch, init_logger, EnvConfig, FetchOptions, DEFAULT_DEST, DEFAULT_REGION};
use log::info;
use std::{path::PathBuf, process, time::Duration};

/// Connection parameters come from IONOS_BUCKET, IONOS_FILE_KEY,
/// IONOS_ACCESS_KEY, IONOS_SECRET_KEY and IONOS_ENDPOINT.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, env = "IONOS_REGION", default_value = DEFAULT_REGION)]
    region: String,
    #[arg(long, env = "IONOS_PATH_STYLE", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    path_style: bool,
    #[arg(long, env = "IONOS_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
    #[arg(long, env = "FETCH_ENV_LOG_PATH")]
    log_path: Option<PathBuf>,
    #[arg(long, env = "FETCH_ENV_LOG", default_value = "warn")]
    log_level: String,
}

/// --help and --version exit 0, any other parse failure exits 1.
fn parse_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            process::exit(parse_exit_code(&err));
        }
    };
    let logger = match init_logger(&args.log_level, args.log_path.as_deref()) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("logger disabled: {}", err);
            None
        }
    };
    let code = run(args);
    if let Some(logger) = logger {
        logger.flush();
    }
    process::exit(code);
}

fn run(args: Args) -> i32 {
    // fail before any client is built
    let config = match EnvConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return 1;
        }
    };
    let options = FetchOptions {
        region: args.region,
        path_style: args.path_style,
        timeout: args.timeout_secs.map(Duration::from_secs),
    };
    info!("fetching {} from bucket {}", config.file_key, config.bucket);
    match fetch(config.into_request(DEFAULT_DEST), options) {
        Ok(report) => {
            info!("download finished: {} bytes", report.bytes);
            println!("{}", report.message());
            0
        }
        Err(err) => {
            eprintln!("{}", err);
            err.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;
    use std::str::FromStr;

    #[test]
    fn test_bad_value_exits_1() {
        let err = Args::try_parse_from(["fetch-env", "--timeout-secs", "abc"]).unwrap_err();
        assert_eq!(parse_exit_code(&err), 1);
        let err = Args::try_parse_from(["fetch-env", "--no-such-flag"]).unwrap_err();
        assert_eq!(parse_exit_code(&err), 1);
    }

    #[test]
    fn test_help_and_version_exit_0() {
        let err = Args::try_parse_from(["fetch-env", "--help"]).unwrap_err();
        assert_eq!(parse_exit_code(&err), 0);
        let err = Args::try_parse_from(["fetch-env", "--version"]).unwrap_err();
        assert_eq!(parse_exit_code(&err), 0);
    }

    // the only test in this binary that sets process environment
    #[test]
    fn test_path_style_env_is_boolish() {
        for (value, expected) in [("yes", true), ("1", true), ("on", true), ("no", false), ("0", false)] {
            std::env::set_var("IONOS_PATH_STYLE", value);
            let args = Args::try_parse_from(["fetch-env"]).unwrap();
            assert_eq!(args.path_style, expected, "IONOS_PATH_STYLE={}", value);
        }
        std::env::remove_var("IONOS_PATH_STYLE");
        assert!(!Args::try_parse_from(["fetch-env"]).unwrap().path_style);
        assert!(Args::try_parse_from(["fetch-env", "--path-style"]).unwrap().path_style);
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["fetch-env"]).unwrap();
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_default_level_hides_failure_log() {
        let args = Args::try_parse_from(["fetch-env"]).unwrap();
        let filter = LevelFilter::from_str(&args.log_level).unwrap();
        assert!(fetch_env::FAILURE_LOG_LEVEL > filter);
    }
}

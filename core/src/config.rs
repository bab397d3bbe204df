//! Environment configuration helpers.
//!
//! Values are read from the process environment, after an optional `.env`
//! file in the working directory (or one of its parents) has been merged in.

use anyhow::{anyhow, bail, Context, Result};
use log::LevelFilter;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Connection string variable understood by every binary in the workspace.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Merge a `.env` file into the environment. Variables that are already set
/// win over the file. Returns the path of the file that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

pub fn parse_log_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Log level from `var`, falling back to `default` when unset or unknown.
pub fn resolve_log_level(var: &str, default: LevelFilter) -> LevelFilter {
    env::var(var)
        .ok()
        .as_deref()
        .and_then(parse_log_level)
        .unwrap_or(default)
}

/// Log file from `var`. Unset, empty and `none` all mean console only.
pub fn resolve_log_file(var: &str) -> Option<String> {
    log_file_from(env::var(var).ok().as_deref())
}

fn log_file_from(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// The database connection string. Its syntax is checked by the client
/// library when connecting, not here.
pub fn database_url() -> Result<String> {
    required_var(DATABASE_URL_VAR)
}

pub fn required_var(var: &str) -> Result<String> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => bail!("{var} is set but empty"),
        Err(env::VarError::NotPresent) => bail!("{var} is not set"),
        Err(err) => Err(anyhow!(err).context(format!("{var} is not valid unicode"))),
    }
}

/// Parse `var` as `T`, or return `default` when it is unset.
pub fn env_or<T>(var: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_or(var, env::var(var), default)
}

fn parse_or<T>(var: &str, value: Result<String, env::VarError>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{var}={raw:?} is not a valid value")),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(anyhow!(err).context(format!("{var} is not valid unicode"))),
    }
}

/// Parse a comma separated list of positive counts, e.g. `100, 10_000`.
pub fn parse_count_list(value: &str) -> Result<Vec<i32>> {
    let mut counts = Vec::new();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let count: i32 = part
            .replace('_', "")
            .parse()
            .with_context(|| format!("invalid count {part:?}"))?;
        if count <= 0 {
            bail!("count must be positive, got {count}");
        }
        counts.push(count);
    }
    if counts.is_empty() {
        bail!("count list {value:?} is empty");
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_levels_parse_case_insensitively() {
        assert_eq!(parse_log_level("WARNING"), Some(LevelFilter::Warn));
        assert_eq!(parse_log_level(" debug "), Some(LevelFilter::Debug));
        assert_eq!(parse_log_level("loud"), None);
    }

    #[test]
    fn log_file_none_and_empty_disable_file_output() {
        assert_eq!(log_file_from(None), None);
        assert_eq!(log_file_from(Some("  ")), None);
        assert_eq!(log_file_from(Some("NONE")), None);
        assert_eq!(log_file_from(Some(" bench.log ")), Some("bench.log".to_string()));
    }

    #[test]
    fn count_lists_accept_separators_and_whitespace() {
        assert_eq!(
            parse_count_list("100, 10_000,1000000").unwrap(),
            vec![100, 10_000, 1_000_000]
        );
        assert_eq!(parse_count_list("7,").unwrap(), vec![7]);
    }

    #[test]
    fn count_lists_reject_bad_input() {
        assert!(parse_count_list("").is_err());
        assert!(parse_count_list("0").is_err());
        assert!(parse_count_list("-5").is_err());
        assert!(parse_count_list("ten").is_err());
        assert!(parse_count_list("3000000000").is_err());
    }

    #[test]
    fn missing_variable_is_reported_by_name() {
        let err = required_var("BENCH_CORE_TEST_SURELY_UNSET").unwrap_err();
        assert!(err.to_string().contains("BENCH_CORE_TEST_SURELY_UNSET"));
    }

    #[test]
    fn env_or_falls_back_when_unset() {
        let value: u64 = env_or("BENCH_CORE_TEST_ALSO_UNSET", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn non_unicode_value_is_an_error_not_the_default() {
        let raw = env::VarError::NotUnicode(std::ffi::OsString::from("ignored"));
        let err = parse_or::<u64>("PLBENCH_SAMPLES", Err(raw), 42).unwrap_err();
        assert!(err.to_string().contains("PLBENCH_SAMPLES"));
    }

    #[test]
    fn present_value_is_parsed_and_bad_value_rejected() {
        assert_eq!(parse_or::<u64>("N", Ok(" 7 ".to_string()), 1).unwrap(), 7);
        assert!(parse_or::<u64>("N", Ok("seven".to_string()), 1).is_err());
    }
}

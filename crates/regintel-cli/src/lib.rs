//! # regintel-cli — Command Line Front End
//!
//! Provides the `regintel` binary over the timeline and impact engines.
//!
//! ## Subcommands
//!
//! - `regintel timeline`: generate an implementation timeline.
//! - `regintel impact`: assess a circular's impact on an organization.
//! - `regintel deadlines`: list deadlines falling inside a window.
//!
//! ```bash
//! regintel timeline --circular circular.json --options options.yaml --organization-id org-1
//! regintel impact --request request.yaml --circular circular.json
//! regintel -v deadlines --circular a.json --circular b.json --options options.yaml --within-days 14
//! ```
//!
//! Inputs are JSON, or YAML when the file ends in `.yaml` or `.yml`.
//! Results go to stdout as pretty JSON; logs go to stderr.
//!
//! Each `run_*` handler returns an exit code: 0 on success, 1 when the
//! input fails validation. Operational failures (unreadable or malformed
//! files) surface as `Err`.

pub mod deadlines;
pub mod impact;
pub mod input;
pub mod timeline;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use regintel_core::{EngineConfig, RegintelError};

/// Load the engine configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration: {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Write `value` to `out` as pretty JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}

/// Map an engine result onto an exit code, reporting validation failures.
///
/// Validation failures yield `Ok(None)` after logging; any other engine
/// error is returned.
pub(crate) fn validated<T>(result: Result<T, RegintelError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(RegintelError::Validation(e)) => {
            tracing::error!("validation failed: {e}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regintel_core::ValidationError;

    #[test]
    fn default_config_without_path() {
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }

    #[test]
    fn config_file_errors_carry_path() {
        let err = load_config(Some(Path::new("/nonexistent/regintel.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/regintel.yaml"));
    }

    #[test]
    fn json_is_pretty_and_terminated() {
        let mut buf: Vec<u8> = Vec::new();
        write_json(&mut buf, &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn validation_errors_become_none() {
        let r: Result<u8, RegintelError> =
            Err(ValidationError::MissingField("circular_id").into());
        assert!(validated(r).unwrap().is_none());

        let r: Result<u8, RegintelError> = Err(RegintelError::Config("bad".into()));
        assert!(validated(r).is_err());

        assert_eq!(validated(Ok::<u8, RegintelError>(3)).unwrap(), Some(3));
    }
}

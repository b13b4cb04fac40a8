//! Plain number-list ingest.
//!
//! Accepts numbers separated by commas and/or whitespace, one or many per
//! line. `#` starts a comment that runs to the end of the line. Bad tokens
//! are reported with their line number (exit code 2); non-finite numbers are
//! left for the estimator to reject.

use std::fs;
use std::path::Path;

use crate::error::{AppError, EXIT_USAGE};

/// Read a number list from `path`.
pub fn read_values(path: &Path) -> Result<Vec<f64>, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to read '{}': {e}", path.display())))?;
    let values = parse_values(&text)?;
    log::debug!("read {} value(s) from {}", values.len(), path.display());
    Ok(values)
}

/// Parse a number list from text.
pub fn parse_values(text: &str) -> Result<Vec<f64>, AppError> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or("");
        for token in content.split(|c: char| c == ',' || c.is_whitespace()) {
            if token.is_empty() {
                continue;
            }
            let value: f64 = token.parse().map_err(|_| {
                AppError::new(
                    EXIT_USAGE,
                    format!("Line {}: '{token}' is not a number.", idx + 1),
                )
            })?;
            out.push(value);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_separators_and_comments() {
        let text = "# sorted masses\n6.5, 6.5\n7.7 8.9 # last two\n\n";
        assert_eq!(parse_values(text).unwrap(), vec![6.5, 6.5, 7.7, 8.9]);
    }

    #[test]
    fn reports_the_offending_line() {
        let err = parse_values("1.2\n2.4, abc\n").unwrap_err();
        assert_eq!(err.exit_code(), EXIT_USAGE);
        assert!(err.to_string().starts_with("Line 2: 'abc'"));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diffs.txt");
        std::fs::write(&path, "1.2\n2.4\n3.6\n").unwrap();
        assert_eq!(read_values(&path).unwrap(), vec![1.2, 2.4, 3.6]);
    }

    #[test]
    fn missing_file_is_a_usage_error() {
        let err = read_values(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_USAGE);
    }
}

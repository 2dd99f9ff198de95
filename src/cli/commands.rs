//! Command implementations for the UDON CLI
//!
//! All commands return `CliResult<ExitCode>` instead of calling `process::exit`.

use std::fs;

use udon_syntax::host;

use super::{CliError, CliResult, ExitCode};
use crate::config::DumpConfig;
use crate::dump;
use crate::lint;

/// Maximum source file size (10 MB)
const MAX_SOURCE_SIZE: u64 = 10 * 1024 * 1024;

/// Read a source file, refusing oversized inputs.
pub fn read_source(file_path: &str) -> CliResult<String> {
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

/// Lex and display tokens.
pub fn tokens_file(file_path: &str, config: &DumpConfig) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tokens = host::tokenize(&source);
    println!("{}", dump::render_tokens(&source, &tokens, config));
    Ok(ExitCode::SUCCESS)
}

/// Lex and display tokens with the scanner state after each.
pub fn state_file(file_path: &str, config: &DumpConfig) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    println!("{}", dump::render_states(&source, config));
    Ok(ExitCode::SUCCESS)
}

/// Lint a file; lints go to stderr and make the exit code 1.
pub fn check_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let lints = lint::check_source(&source);
    if lints.is_empty() {
        println!("{}: ok", file_path);
        return Ok(ExitCode::SUCCESS);
    }

    for found in &lints {
        eprintln!("{}", lint::render_report(found, file_path, &source));
    }
    let noun = if lints.len() == 1 { "problem" } else { "problems" };
    eprintln!("{}: {} layout {}", file_path, lints.len(), noun);
    Ok(ExitCode::FAILURE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("udon_cli_{}_{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file_fails() {
        let err = read_source("/nonexistent/doc.udon").unwrap_err();
        assert!(err.message.contains("Cannot access file"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_check_clean_file_succeeds() {
        let path = write_temp("clean.udon", "|a\n  |b\n");
        let code = check_file(&path.to_string_lossy()).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_check_reports_problems() {
        let path = write_temp("tabs.udon", "|a\n\t|b\n");
        let code = check_file(&path.to_string_lossy()).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_tokens_and_state_succeed() {
        let path = write_temp("dump.udon", "|a\n  ```\n  x\n  ```\n");
        let config = DumpConfig::default();
        assert_eq!(tokens_file(&path.to_string_lossy(), &config).unwrap(), ExitCode::SUCCESS);
        assert_eq!(state_file(&path.to_string_lossy(), &config).unwrap(), ExitCode::SUCCESS);
        let _ = fs::remove_file(path);
    }
}

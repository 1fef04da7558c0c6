// src/config.rs
use std::path::PathBuf;

use clap::Parser;

use crate::utils::AppError;

pub const DEFAULT_CASE_COLUMN: &str = "PJE";
pub const DEFAULT_PARTIES_COLUMN: &str = "PARTES";
pub const CASE_COLUMN_ENV: &str = "CASE_COLUMN";
pub const PARTIES_COLUMN_ENV: &str = "PARTIES_COLUMN";

/// Command Line Interface for the case record cleaner
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Spreadsheet to clean (.xlsx, .xls, .ods, .csv, .tsv)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Sheet to read (defaults to the first sheet)
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// Output directory for the cleaned table
    #[arg(short, long, default_value = "./output")]
    pub output_dir: PathBuf,

    /// File name of the cleaned table inside the output directory
    #[arg(long, default_value = "cleaned_data.csv")]
    pub output_name: String,

    /// Column holding the case identifiers (env CASE_COLUMN, default PJE)
    #[arg(long)]
    pub case_column: Option<String>,

    /// Column holding the parties (env PARTIES_COLUMN, default PARTES)
    #[arg(long)]
    pub parties_column: Option<String>,

    /// Write tab-separated output instead of comma-separated
    #[arg(long)]
    pub tsv: bool,

    /// Keep generated columns outside the export groups, appended at the end
    #[arg(long)]
    pub keep_unlisted: bool,

    /// Debug mode - save an annotated HTML page of every matched region
    #[arg(short, long)]
    pub debug: bool,
}

/// Settings for one run, resolved from CLI arguments, environment and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub sheet: Option<String>,
    pub output_dir: PathBuf,
    pub output_name: String,
    pub case_column: String,
    pub parties_column: String,
    pub delimiter: u8,
    pub keep_unlisted: bool,
    pub debug: bool,
}

impl RunConfig {
    pub fn from_args(args: Args) -> Result<Self, AppError> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Resolution order for column names: CLI flag, then `env`, then default.
    pub fn resolve<F>(args: Args, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let case_column = pick(args.case_column, &env, CASE_COLUMN_ENV, DEFAULT_CASE_COLUMN)?;
        let parties_column = pick(args.parties_column, &env, PARTIES_COLUMN_ENV, DEFAULT_PARTIES_COLUMN)?;

        if case_column == parties_column {
            return Err(AppError::Config(format!(
                "Case and parties columns must differ (both are '{}')",
                case_column
            )));
        }
        if args.output_name.trim().is_empty() {
            return Err(AppError::Config("Output file name is empty".to_string()));
        }

        Ok(Self {
            input: args.input,
            sheet: args.sheet,
            output_dir: args.output_dir,
            output_name: args.output_name,
            case_column,
            parties_column,
            delimiter: if args.tsv { b'\t' } else { b',' },
            keep_unlisted: args.keep_unlisted,
            debug: args.debug,
        })
    }
}

fn pick<F>(cli: Option<String>, env: &F, key: &str, default: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match cli {
        Some(v) => v,
        None => match env(key) {
            Some(v) => {
                tracing::debug!("Using {}={} from environment", key, v);
                v
            }
            None => default.to_string(),
        },
    };

    if value.trim().is_empty() {
        return Err(AppError::Config(format!("Column name for {} is empty", key)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            input: PathBuf::from("casos.xlsx"),
            output_dir: PathBuf::from("./output"),
            output_name: "cleaned_data.csv".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_apply_without_flags_or_env() {
        let config = RunConfig::resolve(args(), |_| None).unwrap();
        assert_eq!(config.case_column, "PJE");
        assert_eq!(config.parties_column, "PARTES");
        assert_eq!(config.delimiter, b',');
        assert!(!config.keep_unlisted);
    }

    #[test]
    fn flag_beats_env_beats_default() {
        let env = |key: &str| match key {
            CASE_COLUMN_ENV => Some("PROCESSOS".to_string()),
            PARTIES_COLUMN_ENV => Some("ENVOLVIDOS".to_string()),
            _ => None,
        };
        let mut a = args();
        a.parties_column = Some("PARTES DO CASO".to_string());
        a.tsv = true;

        let config = RunConfig::resolve(a, env).unwrap();
        assert_eq!(config.case_column, "PROCESSOS");
        assert_eq!(config.parties_column, "PARTES DO CASO");
        assert_eq!(config.delimiter, b'\t');
    }

    #[test]
    fn blank_or_clashing_columns_are_rejected() {
        let mut a = args();
        a.case_column = Some("  ".to_string());
        assert!(matches!(RunConfig::resolve(a, |_| None), Err(AppError::Config(_))));

        let mut a = args();
        a.case_column = Some("PARTES".to_string());
        assert!(matches!(RunConfig::resolve(a, |_| None), Err(AppError::Config(_))));
    }

    #[test]
    fn parses_command_line() {
        let parsed = Args::try_parse_from([
            "case_extractor",
            "--input",
            "casos.xlsx",
            "--sheet",
            "Planilha1",
            "--keep-unlisted",
        ])
        .unwrap();
        assert_eq!(parsed.sheet.as_deref(), Some("Planilha1"));
        assert!(parsed.keep_unlisted);
        assert_eq!(parsed.output_name, "cleaned_data.csv");
    }
}

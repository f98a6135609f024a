use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dayone_import::config::ImportConfig;
use dayone_import::{import, logging};
use org::format_org_file;
use org::storage::write_org_file;

#[derive(Debug, Parser)]
#[command(
    name = "dayone-to-org",
    about = "Import a Day One CSV export into an Org datetree",
    version
)]
struct Cli {
    /// Day One CSV export [default: Journal.csv].
    csv: Option<PathBuf>,
    /// Directory containing `<uuid>.jpg` photos to link from entries.
    #[arg(long)]
    photos: Option<PathBuf>,
    /// Org file to update in place (created when missing). Prints to stdout otherwise.
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// What to do with entries already present in the output: `skip` or `replace`.
    #[arg(long)]
    on_conflict: Option<String>,
    /// Outline path to nest the datetree under; repeat once per level.
    #[arg(long)]
    anchor: Vec<String>,
    /// Output format when printing to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Org)]
    emit: OutputFormat,
    /// TOML file with import options; flags given here take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Enable verbose logging for debugging.
    #[arg(long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Org,
    Json,
}

impl Cli {
    /// Layer flags over the config file (or defaults when none was given).
    fn into_config(self) -> Result<(ImportConfig, OutputFormat)> {
        let mut config = match &self.config {
            Some(path) => ImportConfig::load(path)?,
            None => ImportConfig::default(),
        };
        if self.csv.is_some() {
            config.csv = self.csv;
        }
        if self.photos.is_some() {
            config.photos = self.photos;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        if self.on_conflict.is_some() {
            config.on_conflict = self.on_conflict;
        }
        if !self.anchor.is_empty() {
            config.anchor = self.anchor;
        }
        Ok((config, self.emit))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let (config, emit) = cli.into_config()?;

    let (file, report) = import::run(&config)
        .with_context(|| format!("importing {:?}", config.csv_path()))?;

    if config.output.is_some() {
        write_org_file(&file)?;
    } else {
        match emit {
            OutputFormat::Org => print!("{}", format_org_file(&file)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&file)?),
        }
    }
    eprintln!("{report}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config_path = tmp.path().join("import.toml");
        std::fs::write(
            &config_path,
            "csv = \"from-config.csv\"\non_conflict = \"replace\"\nanchor = [\"Journal\"]\n",
        )
        .expect("write config");

        let cli = Cli::parse_from([
            "dayone-to-org",
            "from-flag.csv",
            "--config",
            config_path.to_str().expect("utf8 path"),
            "--anchor",
            "Life",
            "--anchor",
            "Days",
            "--emit",
            "json",
        ]);
        let (config, emit) = cli.into_config().expect("config");
        assert_eq!(config.csv_path(), PathBuf::from("from-flag.csv"));
        assert_eq!(config.on_conflict.as_deref(), Some("replace"));
        assert_eq!(config.anchor, vec!["Life".to_string(), "Days".to_string()]);
        assert_eq!(emit, OutputFormat::Json);
    }

    #[test]
    fn defaults_without_flags() {
        let cli = Cli::parse_from(["dayone-to-org"]);
        let (config, emit) = cli.into_config().expect("config");
        assert_eq!(config.csv_path(), PathBuf::from("Journal.csv"));
        assert_eq!(config.output, None);
        assert_eq!(emit, OutputFormat::Org);
    }
}

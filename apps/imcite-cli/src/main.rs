//! `imcite` — command-line host adapter for the citation bridge
//!
//! A host editor shells out to this binary: `search` prints candidate
//! records for its selection UI, `cite` prints insertion text on stdout,
//! `open` hands a PDF to the platform opener. Errors are one line on
//! stderr and a non-zero exit; the host surfaces that line as a
//! notification. Text insertion itself stays with the host — it captures
//! stdout and places it at the cursor.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use imcite_core::{cite, citekey::CiteKey, Bridge, Config, ImciteError, PaperRecord};

#[derive(Parser)]
#[command(name = "imcite")]
#[command(about = "Browse a reference manager's library, insert citations, open PDFs")]
#[command(version)]
struct Cli {
    /// Config file (defaults to imcite/config.toml in the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Library root folder, overriding the config file
    #[arg(short, long, global = true)]
    library: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List records matching a query (the whole library when omitted)
    Search {
        query: Option<String>,

        /// Print records as JSON lines for structured hosts
        #[arg(long)]
        json: bool,
    },

    /// Print citation text for one or more cite keys
    Cite {
        #[arg(required = true)]
        keys: Vec<String>,

        /// Render a `{key, key}` group instead of styled citations
        #[arg(long, conflicts_with = "markdown")]
        group: bool,

        /// Render Markdown deep links into the reference manager
        #[arg(long)]
        markdown: bool,
    },

    /// Open the PDF linked to a cite key
    Open { key: String },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("IMCITE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("imcite: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = load_config(&cli)?;
    let mut bridge = Bridge::new(config)?;

    match cli.command {
        Commands::Search { query, json } => {
            let records = bridge.search(query.as_deref().unwrap_or(""))?;
            for record in &records {
                if json {
                    println!("{}", serde_json::to_string(record)?);
                } else {
                    println!("{}", render_line(record));
                }
            }
        }
        Commands::Cite {
            keys,
            group,
            markdown,
        } => {
            let keys = keys
                .iter()
                .map(|k| CiteKey::parse(k))
                .collect::<Result<Vec<_>, _>>()?;
            if group {
                println!("{}", cite::format_key_group(&keys));
            } else if markdown {
                println!("{}", cite::format_markdown_links(&keys));
            } else {
                let mut citations = Vec::with_capacity(keys.len());
                for key in &keys {
                    let record = bridge
                        .record_for_key(key)?
                        .ok_or_else(|| ImciteError::KeyNotFound(key.to_string()))?;
                    citations.push(bridge.cite(&record)?);
                }
                println!("{}", citations.join("; "));
            }
        }
        Commands::Open { key } => {
            let key = CiteKey::parse(&key)?;
            let path = bridge.open_key(&key)?;
            tracing::info!(path = %path.display(), "opened");
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn Error>> {
    let mut config = match (&cli.config, Config::default_path()) {
        (Some(path), _) => Config::load(path)?,
        (None, Some(path)) if path.is_file() => Config::load(&path)?,
        _ => Config::default(),
    };
    if let Some(root) = &cli.library {
        config.library.root = root.clone();
    }
    Ok(config)
}

/// Tab-separated so hosts can split key and label apart.
fn render_line(record: &PaperRecord) -> String {
    format!("{}\t{}", record.cite_key, record.display_label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_line_is_tab_separated() {
        let record = PaperRecord {
            id: 1,
            title: "Graph Theory".into(),
            authors: vec!["Euler".into()],
            year: Some(1736),
            cite_key: "Euler:1736ta".into(),
            pdf_path: None,
        };
        assert_eq!(render_line(&record), "Euler:1736ta\tEuler 1736 Graph Theory");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::parse_from(["imcite", "search", "euler", "--json"]);
        assert!(matches!(
            cli.command,
            Commands::Search {
                query: Some(q),
                json: true,
            } if q == "euler"
        ));

        let cli = Cli::parse_from(["imcite", "--library", "/tmp/Papers2", "open", "Euler:1736ta"]);
        assert_eq!(cli.library, Some(PathBuf::from("/tmp/Papers2")));
        assert!(matches!(cli.command, Commands::Open { .. }));

        let cli = Cli::parse_from(["imcite", "cite", "--group", "Euler:1736ta", "Gauss:1801bc"]);
        assert!(matches!(
            cli.command,
            Commands::Cite { keys, group: true, .. } if keys.len() == 2
        ));
    }
}

//! Command-line interface for aml
//!
//! Reads one document from a file, standard input, a URL or a Google Doc, and prints it
//! as JSON, YAML or XML.
//!
//! Usage:
//!   aml story.aml                      - Convert a file with the configured format
//!   aml --stream -f yaml < story.aml   - Read standard input, print YAML
//!   aml --gdoc `<url-or-id>` --compact   - Fetch a published Google Doc, print compact JSON
//!
//! Settings come from the built-in defaults, then `$XDG_CONFIG_HOME/aml.toml` (or
//! `~/.config/aml.toml`) if present, then `--config`, then flags.

use archieml::aml::config::{AmlConfig, Loader};
use archieml::aml::error::LoadError;
use archieml::aml::formats::{self, Format};
use archieml::aml::loader::Source;
use clap::{ArgAction, ArgGroup, Parser};
use std::error::Error;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "aml")]
#[command(version, about = "Convert ArchieML documents to JSON, YAML or XML")]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["path", "stream", "url", "gdoc"])
))]
struct Args {
    /// Path to the document
    path: Option<PathBuf>,

    /// Read the document from standard input
    #[arg(short, long)]
    stream: bool,

    /// Fetch the document over HTTP
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// Fetch a Google Doc by URL or document id
    #[arg(short, long, value_name = "REF")]
    gdoc: Option<String>,

    /// Output format: json, xml or yaml (defaults to the configured format)
    #[arg(short, long)]
    format: Option<Format>,

    /// Disable pretty-printing
    #[arg(long)]
    compact: bool,

    /// Extra configuration file layered over the defaults and the user file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn source(&self) -> Source {
        if let Some(path) = &self.path {
            Source::Path(path.clone())
        } else if let Some(url) = &self.url {
            Source::Url(url.clone())
        } else if let Some(reference) = &self.gdoc {
            Source::GoogleDoc(reference.clone())
        } else {
            Source::Stdin
        }
    }

    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(output) if output.ends_with('\n') => print!("{}", output),
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<String, Box<dyn Error>> {
    let config = load_config(args)?;
    let doc = args.source().load(&config.fetch)?;
    let output = formats::render(&doc, config.output.format, &config.output)?;
    Ok(output)
}

fn load_config(args: &Args) -> Result<AmlConfig, LoadError> {
    let mut loader = Loader::new().with_user_file();
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }
    if let Some(format) = args.format {
        loader = loader.set_override("output.format", format.name())?;
    }
    if args.compact {
        loader = loader.set_override("output.pretty", false)?;
    }
    Ok(loader.build()?)
}

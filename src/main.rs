#![allow(clippy::print_stderr, clippy::print_stdout)]

//! CLI entrypoint for `secure-id` (cryptographically sourced identifiers).
//!
//! Generation logic lives in the `secure_id` library crate (`src/id.rs`, `src/source.rs`).

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use secure_id::{FallbackFormat, GeneratorConfig, SourceKind};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "secure-id",
    version,
    about = "Generate identifiers from cryptographically strong randomness",
    long_about = "Generate identifiers from cryptographically strong randomness.\n\n\
Sources are consulted in order. The first source with a direct UUID capability wins; \
otherwise the first source that can fill 16 random bytes wins and the bytes are rendered \
per --fallback-format. If nothing answers, the command fails with \
\"Secure random generator unavailable\" and never falls back to a non-cryptographic generator.\n\n\
Use `--json` for machine-readable output. Set RUST_LOG=debug to see which source answered.",
    after_long_help = r#"Config file (JSON, every field optional):
  {
    "sources": ["os", "thread"],
    "direct_uuid": true,
    "fallback_format": "raw-hex"
  }

Examples:
  secure-id generate
  secure-id generate --count 5 --json
  secure-id generate --no-direct-uuid --fallback-format uuid-v4
  SECURE_ID_SOURCES=thread,os secure-id sources
"#
)]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value_t = false,
        help = "Emit pretty JSON (suitable for scripting)."
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one or more identifiers.
    #[command(after_long_help = r#"Tiers:
  direct-uuid   A source generated UUID-v4 text directly
  filled-bytes  A source filled 16 bytes; rendered per --fallback-format

Examples:
  secure-id generate
  secure-id generate --count 3 --json
"#)]
    Generate {
        #[arg(
            long,
            default_value_t = 1,
            value_name = "N",
            value_parser = clap::value_parser!(u32).range(1..),
            help = "Number of identifiers to generate."
        )]
        count: u32,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Show the effective configuration and source chain without generating.
    Sources {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[derive(Args)]
struct ConfigArgs {
    #[arg(
        long,
        env = "SECURE_ID_CONFIG",
        value_name = "PATH",
        help = "JSON config file (defaults apply to missing fields)."
    )]
    config: Option<PathBuf>,
    #[arg(
        long = "source",
        env = "SECURE_ID_SOURCES",
        value_enum,
        ignore_case = true,
        value_delimiter = ',',
        value_name = "KIND",
        help = "Source to consult, in priority order (repeatable; overrides the config file)."
    )]
    sources: Vec<SourceKind>,
    #[arg(long, help = "Ignore direct UUID capabilities; always fill bytes.")]
    no_direct_uuid: bool,
    #[arg(
        long,
        env = "SECURE_ID_FALLBACK_FORMAT",
        value_enum,
        ignore_case = true,
        value_name = "FORMAT",
        help = "Rendering of byte-filled identifiers."
    )]
    fallback_format: Option<FallbackFormat>,
}

impl ConfigArgs {
    fn resolve(self) -> anyhow::Result<GeneratorConfig> {
        let mut cfg = match self.config {
            Some(path) => GeneratorConfig::load(&path)?,
            None => GeneratorConfig::default(),
        };
        if !self.sources.is_empty() {
            cfg.sources = self.sources;
        }
        if self.no_direct_uuid {
            cfg.direct_uuid = false;
        }
        if let Some(format) = self.fallback_format {
            cfg.fallback_format = format;
        }
        Ok(cfg)
    }
}

#[derive(Debug, Serialize)]
struct SourcesResult<'a> {
    chain: Vec<&'a str>,
    #[serde(flatten)]
    config: &'a GeneratorConfig,
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { count, config } => {
            let generator = config.resolve()?.build();
            let mut out = Vec::new();
            for _ in 0..count {
                out.push(
                    generator
                        .generate_with_origin()
                        .context("generate identifier")?,
                );
            }
            if cli.json {
                write_json(&out)?;
            } else {
                for generated in &out {
                    println!("{}", generated.id);
                }
            }
        }

        Commands::Sources { config } => {
            let cfg = config.resolve()?;
            let generator = cfg.build();
            let res = SourcesResult {
                chain: generator.source_names().collect(),
                config: &cfg,
            };
            write_result(cli.json, &res)?;
        }
    }

    Ok(())
}

fn write_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    let raw = serde_json::to_string_pretty(value).context("serialize JSON")?;
    stdout.write_all(raw.as_bytes()).context("write stdout")?;
    stdout.write_all(b"\n").context("write stdout newline")?;
    Ok(())
}

fn write_result<T: Serialize>(json: bool, value: &T) -> anyhow::Result<()> {
    if json {
        write_json(value)
    } else {
        // human output: best-effort JSON on one line.
        println!("{}", serde_json::to_string(value).context("serialize")?);
        Ok(())
    }
}

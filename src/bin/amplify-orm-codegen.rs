//! generate amplify orm data-access modules from a schema pair
//!
//! reads a json config (`srcSchema`, `buildSchema`, `fragments`, `hooks`,
//! `collections`, ...), runs the generator and writes one module per model
//! plus the collection index, query inputs and input types.

use amplify_orm::{emit, generate_from_config, FsWriter, GeneratorConfig, JsonRenderer, ParserKind};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "amplify-orm-codegen", version, about)]
struct Cli {
    /// generator config file
    #[arg(short, long, default_value = "amplify-orm.json")]
    config: PathBuf,

    /// output directory
    #[arg(short, long, default_value = "generated")]
    out: PathBuf,

    /// scanner implementation: text or document
    #[arg(long)]
    parser: Option<ParserKind>,

    /// log at debug level
    #[arg(long)]
    debug: bool,

    /// print the generation as json instead of writing files
    #[arg(long)]
    dump: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut config = match GeneratorConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load config {}: {err}", cli.config.display());
            std::process::exit(1);
        }
    };
    if let Some(parser) = cli.parser {
        config = config.with_parser(parser);
    }
    if cli.debug {
        config = config.with_debug(true);
    }

    init_tracing(config.debug());

    let generation = match generate_from_config(&config) {
        Ok(generation) => generation,
        Err(err) => {
            eprintln!("codegen failed: {err}");
            std::process::exit(1);
        }
    };

    if cli.dump {
        match serde_json::to_string_pretty(&generation) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("failed to serialize generation: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    let mut writer = FsWriter::new(&cli.out);
    match emit(&generation, &JsonRenderer, &mut writer, config.use_esm()) {
        Ok(files) => {
            tracing::info!(files, out = %cli.out.display(), "generated modules");
        }
        Err(err) => {
            eprintln!("failed to write output: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

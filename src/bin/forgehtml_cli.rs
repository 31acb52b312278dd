//! ForgeHtml CLI - Attribute catalog and emission
//!
//! Commands: attributes, check, emit
//! Outputs JSON (or markup) to stdout
//! Returns non-zero on compatibility failure

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use forgehtml_core::{
    AttributeRegistry, Document, Doctype, RenderConfig, Script, Target, Validator,
};

#[derive(Parser)]
#[command(name = "forgehtml-cli")]
#[command(about = "ForgeHtml CLI - Fluent HTML Attribute Emitter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory of extra attribute definitions (*.json)
    #[arg(long, default_value = "attributes")]
    attributes_dir: PathBuf,

    /// Render configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List known attributes
    Attributes,

    /// Check an attribute against a doctype
    Check {
        /// Attribute name
        #[arg(short, long)]
        attribute: String,

        /// Doctype (html5, html4, html4-transitional, html4-frameset, none)
        #[arg(short, long)]
        doctype: Doctype,
    },

    /// Emit an element carrying one attribute
    Emit {
        /// Attribute name
        #[arg(short, long)]
        attribute: String,

        /// Attribute value
        #[arg(short, long)]
        value: String,

        /// Element name
        #[arg(short, long, default_value = "div")]
        element: String,

        /// Overrides the configured doctype
        #[arg(short, long)]
        doctype: Option<Doctype>,

        /// Write the value as a script fragment (no trimming)
        #[arg(long)]
        fragment: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let registry = match AttributeRegistry::load_from_dir(&cli.attributes_dir) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", serde_json::json!({ "error": format!("Failed to load attributes: {}", e) }));
            return ExitCode::FAILURE;
        }
    };

    let config = match &cli.config {
        Some(path) => match RenderConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}", serde_json::json!({ "error": format!("Failed to load config: {}", e) }));
                return ExitCode::FAILURE;
            }
        },
        None => RenderConfig::default(),
    };

    match cli.command {
        Commands::Attributes => {
            let attributes: Vec<_> = registry
                .list()
                .iter()
                .map(|def| serde_json::json!({
                    "name": def.name,
                    "constraint": def.constraint,
                    "normalizer": def.normalizer,
                    "valueKinds": def.value_kinds,
                    "deprecation": def.deprecation,
                }))
                .collect();

            print_json(&attributes);
            ExitCode::SUCCESS
        }

        Commands::Check { attribute, doctype } => {
            let Some(def) = registry.get(&attribute) else {
                println!("{}", serde_json::json!({ "valid": false, "error": format!("Unknown attribute: {}", attribute) }));
                return ExitCode::FAILURE;
            };

            let result = Validator::standard().validate(def, doctype);
            print_json(&result);
            if result.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2) // Compatibility failure
            }
        }

        Commands::Emit { attribute, value, element, doctype, fragment } => {
            let Some(def) = registry.get(&attribute) else {
                println!("{}", serde_json::json!({ "success": false, "error": format!("Unknown attribute: {}", attribute) }));
                return ExitCode::FAILURE;
            };

            let config = RenderConfig {
                doctype: doctype.unwrap_or(config.doctype),
                ..config
            };
            let mut document = Document::new(Vec::new(), config);

            let rendered = document.start(&element).and_then(|mut el| {
                if fragment {
                    el.attr_fragment(def, Some(&Script::new(value.as_str())))?;
                } else {
                    el.attr(def, value.as_str())?;
                }
                el.close()
            });

            match rendered {
                Ok(()) => {
                    println!("{}", String::from_utf8_lossy(&document.into_inner()));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    println!("{}", serde_json::json!({ "success": false, "error": e.to_string() }));
                    ExitCode::from(2)
                }
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("{}", serde_json::json!({ "error": e.to_string() })),
    }
}

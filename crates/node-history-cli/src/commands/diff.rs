//! Diff command
//!
//! Usage: node-history diff --event <FILE> --node-types <FILE> [--format json|text]

use super::{read_input, read_yaml};
use clap::{Args, ValueEnum};
use node_history_core::changes::StaticTranslations;
use node_history_core::diff::render_human_summary;
use node_history_core::{
    parse_event_bytes, ChangeSetBuilder, DiffOptions, DiffRenderer, HtmlArrayRenderer,
    PlainArrayRenderer, SchemaRegistry,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RendererKind {
    /// Inline `<ins>`/`<del>` markers, HTML-escaped lines
    #[default]
    Html,
    /// `{+ +}`/`[- -]` markers, raw lines
    Plain,
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Event JSON file
    #[arg(long)]
    pub event: PathBuf,

    /// NodeTypes YAML file
    #[arg(long)]
    pub node_types: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Diff renderer
    #[arg(short, long, value_enum, default_value_t = RendererKind::Html)]
    pub renderer: RendererKind,

    /// Diff options TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Label translations YAML file (label id to text)
    #[arg(short, long)]
    pub translations: Option<PathBuf>,
}

/// Execute diff command
pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = match &args.config {
        Some(path) => DiffOptions::from_toml_file(path)?,
        None => DiffOptions::default(),
    };
    let registry = SchemaRegistry::from_yaml_file(&args.node_types)?;
    let translations: StaticTranslations = read_yaml(args.translations.as_deref())?;
    let event = parse_event_bytes(&read_input(&args.event)?)?;

    let renderer: &dyn DiffRenderer = match args.renderer {
        RendererKind::Html => &HtmlArrayRenderer,
        RendererKind::Plain => &PlainArrayRenderer,
    };
    let changes = ChangeSetBuilder::new(&registry)
        .with_translator(&translations)
        .with_options(options)
        .build(&event, Some(renderer))?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&changes)?),
        OutputFormat::Text => print!("{}", render_human_summary(&changes)),
    }
    Ok(())
}

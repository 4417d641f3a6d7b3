//! sqlrender: render SQL ASTs for a target dialect
//!
//! # Usage
//!
//! ```bash
//! # Render a JSON-encoded statement for MySQL
//! sqlrender render statement.json --dialect mysql
//!
//! # Supply render-time values for named parameters (e.g. JSON paths)
//! sqlrender render statement.json --bind path='$.tags[0]'
//!
//! # Show dialect capabilities
//! sqlrender dialects
//!
//! # Inspect a JSON path
//! sqlrender json-path '$.a[2]."b c"'
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use sqlrender::config::RenderConfig;
use sqlrender::json_path::{JsonPathElement, parse_json_path_elements, render_json_path};
use sqlrender::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlrender")]
#[command(version)]
#[command(about = "Render SQL ASTs into dialect-specific SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlrender render query.json --dialect singlestore
    sqlrender render query.json --config sqlrender.toml --bind limit=10
    sqlrender json-path '$.items[0].tags[2]'")]
struct Cli {
    /// Verbose output (debug logging of the rendered SQL)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON-encoded statement
    Render {
        /// Statement file (JSON); `-` reads stdin
        file: PathBuf,

        /// Target dialect, overriding the configuration
        #[arg(short, long, env = "SQLRENDER_DIALECT")]
        dialect: Option<DialectKind>,

        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Render-time parameter values (name=value)
        #[arg(short, long)]
        bind: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// List dialects and their capabilities
    Dialects,
    /// Parse a JSON path and show its elements
    JsonPath {
        /// The path, e.g. `$.a[2]`
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Render {
            file,
            dialect,
            config,
            bind,
            format,
        } => render(file, *dialect, config.as_deref(), bind, format),
        Commands::Dialects => {
            show_dialects();
            Ok(())
        }
        Commands::JsonPath { path } => show_json_path(path),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sqlrender=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_bindings(raw: &[String]) -> Result<ParameterBindings> {
    let mut bindings = ParameterBindings::new();
    for entry in raw {
        let Some((name, value)) = entry.split_once('=') else {
            bail!("Invalid binding '{}', expected name=value", entry);
        };
        bindings.insert(name.trim().to_string(), Literal::parse_loose(value));
    }
    Ok(bindings)
}

fn read_statement(file: &std::path::Path) -> Result<Statement> {
    let content = if file.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };
    serde_json::from_str(&content).with_context(|| format!("Invalid statement in {}", file.display()))
}

fn render(
    file: &std::path::Path,
    dialect: Option<DialectKind>,
    config: Option<&std::path::Path>,
    bind: &[String],
    format: &OutputFormat,
) -> Result<()> {
    let mut config = RenderConfig::discover(config)?;
    if let Some(kind) = dialect {
        config.dialect = kind;
    }
    let bindings = parse_bindings(bind)?;
    let statement = read_statement(file)?;
    let dialect = config.build_dialect();

    let operation = SqlAstTranslator::new(&dialect)
        .with_bindings(&bindings)
        .translate(&statement)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&operation)?),
        OutputFormat::Text => {
            println!("{} {}", "Dialect:".dimmed(), dialect.kind().to_string().cyan());
            println!("{}", "Generated SQL:".green().bold());
            println!("{}", operation.sql.white());
            if !operation.parameters.is_empty() {
                println!();
                println!("{}", "Parameters:".cyan());
                for (i, parameter) in operation.parameters.iter().enumerate() {
                    let label = parameter.label.as_deref().unwrap_or("<anonymous>");
                    match &parameter.sql_type {
                        Some(sql_type) => println!("  {} = {} ({})", i + 1, label.yellow(), sql_type),
                        None => println!("  {} = {}", i + 1, label.yellow()),
                    }
                }
            }
        }
    }
    Ok(())
}

fn show_dialects() {
    let flag = |value: bool| if value { "yes".green() } else { "no".red() };
    for kind in DialectKind::ALL {
        let dialect = Dialect::new(kind);
        let caps = dialect.capabilities();
        println!("{}", kind.to_string().cyan().bold());
        println!("  union with limit        {}", flag(caps.supports_union_with_limit));
        println!("  order by in subquery    {}", flag(caps.supports_order_by_in_subquery));
        println!("  subquery in order by    {}", flag(caps.supports_correlated_subquery_in_order_by));
        println!("  subquery quantifiers    {}", flag(caps.supports_subquery_quantifiers));
        println!("  intersect / except      {}", flag(caps.supports_intersect));
        println!("  nulls first / last      {}", flag(caps.supports_nulls_precedence));
        println!("  aggregate filter        {}", flag(caps.supports_aggregate_filter));
        println!("  typed select parameters {}", flag(caps.requires_typed_parameters_in_select));
        println!("  limit handler           {:?}", dialect.limit_handler());
        println!("  select item reference   {:?}", caps.select_item_reference_strategy);
        println!("  functions               {}", dialect.functions().names().join(", ").dimmed());
        println!();
    }
}

fn show_json_path(path: &str) -> Result<()> {
    let elements = parse_json_path_elements(path)?;
    println!("{}", "Elements:".green().bold());
    for (i, element) in elements.iter().enumerate() {
        let description = match element {
            JsonPathElement::Attribute(name) => format!("attribute {}", name.yellow()),
            JsonPathElement::IndexAccess(index) => format!("index {}", index.to_string().yellow()),
            JsonPathElement::ParameterIndexAccess(name) => {
                format!("parameter index {}", name.yellow())
            }
        };
        println!("  {}. {}", i + 1, description);
    }
    println!("{} {}", "Canonical:".dimmed(), render_json_path(&elements));
    Ok(())
}

//! Command-line interface for xsd-grammar

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
use xsd_grammar::model::{LocalType, Schema};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsd-grammar")]
#[command(author, version, about = "XML Schema grammar checker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that schema documents follow the XSD grammar
    Check {
        /// Paths to the XSD schema files
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },

    /// Parse a schema and display its top-level components
    Inspect {
        /// Path to the XSD schema file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the full object model as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xsd_grammar=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { files } => cmd_check(&files),
        Commands::Inspect { file, json } => cmd_inspect(file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn cmd_check(files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let mut failures = 0;
    for file in files {
        match xsd_grammar::parse_file(file) {
            Ok(_) => println!("{}: ok", file.display()),
            Err(e) => {
                println!("{}: {}", file.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} schema(s) failed", failures, files.len()).into());
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_inspect(file: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let schema = xsd_grammar::parse_file(&file)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&schema)?);
    } else {
        print_schema_summary(&schema);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn print_schema_summary(schema: &Schema) {
    println!("xsd-grammar v{}", xsd_grammar::VERSION);
    println!();
    println!("Schema Information:");
    println!("  Target Namespace: {}", schema.target_namespace().unwrap_or("(none)"));
    println!("  Element Form Default: {}", schema.element_form_default_or_default());
    println!("  Attribute Form Default: {}", schema.attribute_form_default_or_default());
    println!();
    println!("Statistics:");
    println!("  Includes/Imports/Redefines: {}", schema.composition.len());
    println!("  Global Elements: {}", schema.elements().count());
    println!("  Complex Types: {}", schema.complex_types().count());
    println!("  Simple Types: {}", schema.simple_types().count());
    println!("  Global Attributes: {}", schema.attributes().count());
    println!("  Model Groups: {}", schema.groups().count());
    println!("  Attribute Groups: {}", schema.attribute_groups().count());
    println!("  Notations: {}", schema.notations().count());

    println!("\n=== Global Elements ===");
    for element in schema.elements() {
        let name = element.attributes.name.as_deref().unwrap_or_default();
        let type_str = match (&element.attributes.type_name, &element.type_definition) {
            (Some(type_name), _) => type_name.to_string(),
            (None, Some(LocalType::ComplexType(_))) => "anonymous complex type".to_string(),
            (None, Some(LocalType::SimpleType(_))) => "anonymous simple type".to_string(),
            (None, None) => "anyType".to_string(),
        };
        println!("  {} : {}", name, type_str);
    }

    println!("\n=== Global Types ===");
    for complex_type in schema.complex_types() {
        println!(
            "  {} (complex)",
            complex_type.attributes.name.as_deref().unwrap_or_default()
        );
    }
    for simple_type in schema.simple_types() {
        println!(
            "  {} (simple, {})",
            simple_type.attributes.name.as_deref().unwrap_or_default(),
            simple_type.derivation.context()
        );
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}

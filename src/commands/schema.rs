//! Comando schema - Mostra o esquema de configuração da extensão

use anyhow::Result;
use clap::ValueEnum;
use colored::*;

use stencil::extension::{PackageName, stub};

/// Output format of `schema`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaFormat {
    Json,
    Toml,
}

pub fn run(package: &str, format: SchemaFormat, quiet: bool) -> Result<()> {
    let package = PackageName::parse(package)?;
    let schema = stub::config_schema()?;

    if !quiet {
        println!("{}", "⚙️  Esquema de configuração:".bright_cyan());
        for (option, descriptor) in schema.iter() {
            println!(
                "   {} ({}, padrão {})",
                package.config_key(option)?.to_string().bright_green(),
                descriptor.kind(),
                descriptor.default
            );
        }
        println!();
    }

    let rendered = match format {
        SchemaFormat::Json => schema.to_json_pretty()?,
        SchemaFormat::Toml => schema.to_toml()?,
    };
    println!("{rendered}");

    Ok(())
}

//! Comando template - Gerencia templates
//!
//! Lista, mostra e instancia templates do catálogo

use anyhow::Result;
use colored::*;
use std::path::PathBuf;

use stencil::core::builder::{self, WriteOptions};
use stencil::core::catalog::Catalog;
use stencil::core::config::Settings;
use stencil::core::template::{self as engine, TemplateOrigin, TemplateVars};
use stencil::core::utils;
use stencil::extension::PackageName;

/// Arguments of `template new`
pub struct NewArgs {
    pub template: String,
    pub name: String,
    pub class: Option<String>,
    pub output: Option<PathBuf>,
    pub force: bool,
    pub dry_run: bool,
}

pub fn list(settings: &Settings, _verbose: bool) -> Result<()> {
    let catalog = Catalog::load(settings)?;

    println!("{}", "📝 Templates disponíveis:".bright_cyan());
    println!();
    for template in catalog.list() {
        let origin = match &template.origin {
            TemplateOrigin::Builtin => "embutido".to_string(),
            TemplateOrigin::Disk(path) => path.display().to_string(),
        };
        println!(
            "  {} - {} {}",
            template.name().bright_green(),
            template.manifest.description,
            format!("({origin})").bright_black()
        );
    }
    println!();
    println!(
        "Use {} para criar um pacote",
        "stencil template new <tipo> <nome>".bright_yellow()
    );

    Ok(())
}

pub fn show(settings: &Settings, name: &str, verbose: bool) -> Result<()> {
    let catalog = Catalog::load(settings)?;
    let template = catalog.get(name)?;
    let manifest = &template.manifest;

    println!("{}", format!("📝 Template: {}", template.name()).bright_cyan());
    println!();
    utils::print_field("Descrição", &manifest.description);
    utils::print_field("Entrada", manifest.entry.as_deref().unwrap_or("-"));
    utils::print_field("Variáveis", &manifest.variables.join(", "));
    utils::print_field("Requer", &manifest.requires.join(", "));
    println!();

    println!("   Arquivos:");
    for file in template.files() {
        println!("     {}", file.path.display().to_string().bright_cyan());
        if verbose {
            let mut used = engine::placeholders(&file.contents);
            used.retain(|name| manifest.variables.contains(name));
            if !used.is_empty() {
                println!("       {}", used.join(", ").bright_black());
            }
        }
    }

    Ok(())
}

pub fn new(settings: &Settings, args: &NewArgs, verbose: bool, quiet: bool) -> Result<()> {
    println!(
        "{}",
        format!("🔨 Criando {} '{}'...", args.template, args.name).bright_yellow()
    );

    let catalog = Catalog::load(settings)?;
    let template = catalog.get(&args.template)?;
    let package = PackageName::parse(&args.name)?;
    let bound = TemplateVars::for_package(
        &package,
        args.class.as_deref(),
        settings.author.as_deref(),
    )?;

    utils::print_step("Renderizando arquivos...");
    let files = template.render(&bound)?;

    let output = args.output.clone().unwrap_or_else(|| settings.output_dir());
    let target = builder::package_dir(&output, package.as_str());

    utils::print_step("Gravando pacote...");
    let report = builder::write_package(
        &target,
        &files,
        WriteOptions {
            force: args.force,
            dry_run: args.dry_run,
            verbose,
            quiet,
        },
    )?;

    if args.dry_run {
        utils::print_warning("Simulação: nenhum arquivo foi gravado");
        for file in &report.files {
            println!("     {}", report.root.join(file).display().to_string().bright_black());
        }
        return Ok(());
    }

    utils::print_success(&format!(
        "{} arquivo(s), {} bytes",
        report.files.len(),
        report.bytes
    ));
    println!(
        "   Localização: {}",
        report.root.display().to_string().bright_cyan()
    );

    Ok(())
}

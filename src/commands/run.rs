//! Comando run - Executa a extensão num host em memória
//!
//! Percorre o ciclo de vida completo: construção, comando, serialização e
//! destruição.

use anyhow::Result;
use colored::*;

use stencil::core::utils;
use stencil::extension::memory::{self, LifecycleReport};
use stencil::extension::{ConfigValue, PackageName};

pub fn run(package: &str, welcome: Option<bool>, verbose: bool) -> Result<()> {
    println!("{}", "🚀 Executando extensão...".bright_yellow());

    let package = PackageName::parse(package)?;
    let report = memory::run_lifecycle(&package, welcome)?;
    print_report(&report, verbose)?;

    utils::print_success("Ciclo de vida concluído");
    Ok(())
}

fn print_report(report: &LifecycleReport, verbose: bool) -> Result<()> {
    utils::print_step("Construindo...");
    for name in &report.commands {
        utils::print_field("Comando", name);
    }
    for key in &report.tutorial_keys {
        utils::print_field("Tutorial", key);
    }
    print_value(report, report.welcome_before);

    for name in &report.commands {
        utils::print_step(&format!("Invocando {name}..."));
    }
    print_value(report, report.welcome_after);

    utils::print_step("Serializando...");
    utils::print_field("Estado", &serde_json::to_string(&report.state)?);

    utils::print_step("Destruindo...");
    utils::print_field("Comandos", &report.commands_after_destroy.to_string());

    if verbose {
        utils::print_field("Escritas", &report.writes.to_string());
    }
    Ok(())
}

fn print_value(report: &LifecycleReport, value: Option<ConfigValue>) {
    let value = value.map_or_else(|| "-".to_string(), |value| value.to_string());
    println!(
        "   {} = {}",
        report.welcome_key.to_string().bright_cyan(),
        value.bright_green()
    );
}

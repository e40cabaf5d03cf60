//! Comando env - Mostra ambiente
//!
//! Verifica as ferramentas externas exigidas pelos templates

use anyhow::Result;
use colored::*;
use std::collections::BTreeMap;
use xshell::Shell;

use stencil::core::catalog::Catalog;
use stencil::core::config::Settings;
use stencil::core::utils;

pub fn run(settings: &Settings, verbose: bool) -> Result<()> {
    println!("{}", "🔧 Ambiente:".bright_cyan());
    println!();

    let author = settings.author.as_deref().unwrap_or("-");
    let templates_dir = settings
        .templates_dir
        .as_ref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    utils::print_field("Autor", author);
    utils::print_field("Templates", &templates_dir);
    utils::print_field("Saída", &settings.output_dir().display().to_string());
    println!();

    let catalog = Catalog::load(settings)?;
    let mut tools: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for template in catalog.list() {
        for tool in &template.manifest.requires {
            tools.entry(tool.as_str()).or_default().push(template.name());
        }
    }

    let sh = Shell::new()?;
    let mut missing = 0;
    for (tool, users) in &tools {
        match tool_version(&sh, tool) {
            Some(version) => {
                utils::print_success(&format!("{} {}", tool, version.bright_black()));
                if verbose {
                    println!("       usado por: {}", users.join(", "));
                }
            }
            None => {
                missing += 1;
                utils::print_warning(&format!(
                    "{} não encontrado (necessário para: {})",
                    tool,
                    users.join(", ")
                ));
            }
        }
    }

    println!();
    if missing == 0 {
        utils::print_success("Todas as ferramentas encontradas");
    } else {
        utils::print_warning(&format!("{missing} ferramenta(s) ausente(s)"));
    }

    Ok(())
}

/// First line of `<tool> --version`, if the tool runs
fn tool_version(sh: &Shell, tool: &str) -> Option<String> {
    sh.cmd(tool)
        .arg("--version")
        .quiet()
        .ignore_stderr()
        .read()
        .ok()
        .and_then(|out| out.lines().next().map(|line| line.trim().to_string()))
}

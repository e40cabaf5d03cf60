//! Stencil - Gerador de pacotes de extensão
//!
//! Cria pacotes a partir de templates e exercita o contrato da extensão
//! gerada num host em memória.
//!
//! # Uso
//! ```bash
//! stencil template list
//! stencil template new atom-package my-ext
//! stencil schema my-ext --format json
//! stencil run my-ext
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use stencil::core::config::Settings;
use stencil::core::logging;

mod commands;

use commands::schema::SchemaFormat;

#[derive(Parser)]
#[command(name = "stencil")]
#[command(about = "🧩 Stencil - Gerador de pacotes de extensão", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Arquivo de configuração (padrão: ./stencil.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Gerencia templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Mostra o esquema de configuração da extensão
    Schema {
        /// Nome do pacote
        package: String,

        /// Formato de saída
        #[arg(long, value_enum, default_value_t = SchemaFormat::Json)]
        format: SchemaFormat,
    },

    /// Executa a extensão num host em memória
    Run {
        /// Nome do pacote
        package: String,

        /// Valor inicial de showWelcomeOnActivation
        #[arg(long)]
        welcome: Option<bool>,
    },

    /// Mostra ambiente
    Env,
}

#[derive(Subcommand)]
enum TemplateAction {
    /// Lista templates
    List,
    /// Mostra template
    Show { name: String },
    /// Cria novo pacote
    New {
        /// Tipo (atom-package, bash-builtin, ...)
        template_type: String,
        /// Nome do pacote
        name: String,
        /// Nome da classe principal (padrão: PascalCase do nome)
        #[arg(long)]
        class: Option<String>,
        /// Diretório de saída
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Sobrescreve diretório existente
        #[arg(long)]
        force: bool,
        /// Apenas mostra o que seria gerado
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = logging::init_logging(logging::level_for(cli.verbose, cli.quiet))?;

    // Banner
    if !cli.quiet {
        println!("{}", "🧩 Stencil - Gerador de pacotes de extensão".bright_cyan().bold());
        println!();
    }

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Template { action } => match action {
            TemplateAction::List => commands::template::list(&settings, cli.verbose),
            TemplateAction::Show { name } => commands::template::show(&settings, &name, cli.verbose),
            TemplateAction::New {
                template_type,
                name,
                class,
                output,
                force,
                dry_run,
            } => {
                let args = commands::template::NewArgs {
                    template: template_type,
                    name,
                    class,
                    output,
                    force,
                    dry_run,
                };
                commands::template::new(&settings, &args, cli.verbose, cli.quiet)
            }
        },
        Commands::Schema { package, format } => commands::schema::run(&package, format, cli.quiet),
        Commands::Run { package, welcome } => commands::run::run(&package, welcome, cli.verbose),
        Commands::Env => commands::env::run(&settings, cli.verbose),
    }
}

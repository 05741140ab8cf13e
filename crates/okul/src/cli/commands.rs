//! # CLI Layer
//!
//! This module is one possible client of okulapp. It is the only place that:
//! - knows about stdout and stderr,
//! - parses arguments,
//! - installs the tracing subscriber,
//! - formats output for people.
//!
//! Every command maps to one [`SiteApi`] call; the result is handed to
//! [`render::print_result`](super::render::print_result). `config` and
//! `completions` are handled here directly since they need no store.

use super::render::print_result;
use super::setup::{Cli, Commands, CompletionShell, ConfigCommands};
use anyhow::Context;
use clap::Parser;
use clapfig::{Clapfig, ConfigAction, SearchPath};
use okulapp::api::SiteApi;
use okulapp::commands::section::SectionInput;
use okulapp::commands::CmdResult;
use okulapp::config::{SiteConfig, CONFIG_FILE};
use okulapp::init::{initialize, resolve_data_dir};
use okulapp::media::{MediaFile, MediaStore};
use okulapp::model::PageMeta;
use okulapp::store::DocumentStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Completions { shell } = &cli.command {
        print_completions(*shell);
        return Ok(());
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if let Commands::Config { action } = &cli.command {
        let data_dir = resolve_data_dir(&cwd, cli.data.clone())?;
        return handle_config_command(action.as_ref(), &data_dir);
    }

    let mut ctx = initialize(&cwd, cli.data.clone())?;
    tracing::debug!(command = ?cli.command, data = %ctx.data_dir.display(), "dispatching");
    let result = dispatch(&mut ctx.api, cli.command)?;
    print_result(&result, cli.output)
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("okulapp={0},okul={0}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn dispatch<S: DocumentStore, M: MediaStore>(
    api: &mut SiteApi<S, M>,
    command: Commands,
) -> anyhow::Result<CmdResult> {
    let result = match command {
        Commands::Pages => api.list_pages()?,
        Commands::Sections { page } => api.page_sections(&page)?,
        Commands::Show { page, section } => api.show_section(&page, &section)?,
        Commands::Set {
            page,
            section,
            text,
            file,
            image,
            remove_image,
            button_text,
            button_url,
        } => {
            let content = match (text, file) {
                (Some(text), _) => Some(text),
                (None, Some(path)) => Some(
                    std::fs::read_to_string(&path)
                        .with_context(|| format!("Could not read {}", path.display()))?,
                ),
                (None, None) => None,
            };
            let input = SectionInput {
                content,
                image: read_image(image.as_deref())?,
                remove_image,
                button_text,
                button_url,
            };
            api.save_section(&page, &section, input)?
        }
        Commands::Meta {
            page,
            title,
            description,
            keywords,
        } => api.set_meta(
            &page,
            PageMeta {
                title,
                description,
                keywords,
            },
        )?,
        Commands::Render { target } => api.render(&target)?,
        Commands::List { kind, category } => api.list_entities(&kind, category.as_deref())?,
        Commands::Add {
            kind,
            fields,
            image,
        } => api.create_entity(&kind, &fields, read_image(image.as_deref())?)?,
        Commands::Update {
            kind,
            id,
            fields,
            image,
        } => api.update_entity(&kind, &id, &fields, read_image(image.as_deref())?)?,
        Commands::Delete { kind, id } => api.delete_entity(&kind, &id)?,
        Commands::Status { id, status } => api.set_message_status(&id, status.as_str())?,
        Commands::Config { .. } | Commands::Completions { .. } => CmdResult::default(),
    };
    Ok(result)
}

fn read_image(path: Option<&Path>) -> anyhow::Result<Option<MediaFile>> {
    path.map(|p| {
        MediaFile::from_path(p).with_context(|| format!("Could not read image {}", p.display()))
    })
    .transpose()
}

/// Handle the `okul config` subcommand using clapfig directly.
fn handle_config_command(action: Option<&ConfigCommands>, data_dir: &Path) -> anyhow::Result<()> {
    let config_builder = || {
        Clapfig::builder::<SiteConfig>()
            .app_name("okul")
            .file_name(CONFIG_FILE)
            .search_paths(vec![SearchPath::Path(data_dir.to_path_buf())])
            .no_env()
            .strict(false)
    };
    match action {
        None => {
            let config: SiteConfig = config_builder().load().unwrap_or_default();
            let table = toml::Value::try_from(&config)?;
            if let toml::Value::Table(t) = table {
                for (k, v) in &t {
                    println!("{} = {}", k, format_toml_value(v));
                }
            }
            Ok(())
        }
        Some(ConfigCommands::Gen { output }) => {
            let action = ConfigAction::Gen {
                output: output.clone(),
            };
            let result = config_builder()
                .handle(&action)
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            print!("{result}");
            Ok(())
        }
        Some(ConfigCommands::Get { key }) => {
            let action = ConfigAction::Get {
                key: key.clone(),
                scope: None,
            };
            let result = config_builder()
                .handle(&action)
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            println!("{result}");
            Ok(())
        }
        Some(ConfigCommands::Set { key, value }) => {
            std::fs::create_dir_all(data_dir)
                .with_context(|| format!("Could not create {}", data_dir.display()))?;
            let action = ConfigAction::Set {
                key: key.clone(),
                value: value.clone(),
                scope: None,
            };
            let result = config_builder()
                .handle(&action)
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            println!("{result}");
            Ok(())
        }
    }
}

fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

fn print_completions(shell: CompletionShell) {
    let shell = match shell {
        CompletionShell::Bash => clap_complete::Shell::Bash,
        CompletionShell::Zsh => clap_complete::Shell::Zsh,
        CompletionShell::Fish => clap_complete::Shell::Fish,
    };
    let mut cmd = super::setup::build_command();
    clap_complete::generate(shell, &mut cmd, "okul", &mut std::io::stdout());
}

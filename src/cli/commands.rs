//! Command dispatch: settings → services → output

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, MenuCommands, PageCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{self, global_config_path, local_config_path, Settings};
use crate::domain::{
    DeletePolicy, DomainError, MenuPatch, MenuTarget, NewMenuNode, SchemaViolation,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{AccessPolicy, AllowAll, ReadOnly, RealFileSystem};
use crate::infrastructure::InfraError;

/// Run the parsed command line.
pub fn execute(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        None => Err(CliError::Usage(
            "no command given, see `amisite --help`".to_string(),
        )),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "amisite", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config { command }) => {
            let settings = load_settings(cli)?;
            execute_config(command, &settings, cli)
        }
        Some(Commands::Menu { command }) => execute_menu(command, &container(cli)?),
        Some(Commands::Page { command }) => execute_page(command, &container(cli)?),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(cli.data_dir.as_deref())?;
    config::init_brand(settings.brand.clone());
    debug!("data_dir: {}", settings.data_dir.display());
    Ok(settings)
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = load_settings(cli)?;
    let access: Arc<dyn AccessPolicy> = if cli.read_only {
        Arc::new(ReadOnly)
    } else {
        Arc::new(AllowAll)
    };
    Ok(ServiceContainer::with_deps(
        settings,
        Arc::new(RealFileSystem),
        access,
    ))
}

#[instrument(level = "debug", skip(container))]
fn execute_menu(command: &MenuCommands, container: &ServiceContainer) -> CliResult<()> {
    let menu = container.menu_service();
    match command {
        MenuCommands::Tree { published, all } => {
            let published_only =
                *published || (!*all && container.settings.menu.published_only_default);
            let forest = menu.list_tree(published_only)?;
            if forest.is_empty() {
                output::warning("menu is empty");
            }
            output::data(&forest.to_tree(&config::brand().site_name));
        }
        MenuCommands::Show { id } => {
            output::node_details(&menu.get(*id)?);
        }
        MenuCommands::Add {
            title,
            url,
            page,
            parent,
            draft,
        } => {
            let node = menu.create(NewMenuNode {
                title: title.clone(),
                target: MenuTarget::from_parts(url.clone(), *page)?,
                parent: *parent,
                published: !*draft,
            })?;
            output::done("Added", &node);
        }
        MenuCommands::Update {
            id,
            title,
            url,
            page,
            label,
            parent,
            root,
            publish,
            unpublish,
        } => {
            let target = if *label {
                Some(MenuTarget::Label)
            } else if url.is_some() || page.is_some() {
                Some(MenuTarget::from_parts(url.clone(), *page)?)
            } else {
                None
            };
            let patch = MenuPatch {
                title: title.clone(),
                target,
                parent: if *root { Some(None) } else { parent.map(Some) },
                published: match (publish, unpublish) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };
            if patch.is_empty() {
                output::warning("nothing to update");
            }
            let node = menu.update(*id, patch)?;
            output::done("Updated", &node);
        }
        MenuCommands::Remove {
            id,
            cascade,
            reparent,
        } => {
            let policy = match (cascade, reparent) {
                (true, _) => Some(DeletePolicy::Cascade),
                (_, true) => Some(DeletePolicy::Reparent),
                _ => None,
            };
            output::removed_nodes(&menu.delete(*id, policy)?);
        }
        MenuCommands::Reorder { ids } => {
            menu.reorder(ids)?;
            output::done("Reordered", &format!("{} node(s)", ids.len()));
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn execute_page(command: &PageCommands, container: &ServiceContainer) -> CliResult<()> {
    let content = container.content_service();
    match command {
        PageCommands::Show { page, raw } => {
            let document = if *raw {
                content.load_raw(*page)?
            } else {
                content.load(*page)?.to_value()?
            };
            output::data(&to_pretty_json(&document)?);
        }
        PageCommands::Validate { file } => {
            let document = read_document(file)?;
            let violations = content.validate(&document);
            ensure_valid(violations)?;
            output::valid(&file.display());
        }
        PageCommands::Replace { page, file } => {
            let document = read_document(file)?;
            let typed = content.replace_document(*page, document)?;
            output::done(
                "Replaced",
                &format!("page {} ({} element(s))", page, typed.elements().len()),
            );
        }
        PageCommands::Migrate { dry_run } => {
            output::migration(&content.migrate_all(*dry_run)?);
        }
    }
    Ok(())
}

fn execute_config(command: &ConfigCommands, settings: &Settings, cli: &Cli) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::data(&settings.to_toml()?),
        ConfigCommands::Template => output::data(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::config_path("global", &path),
                None => output::warning("no global config directory on this platform"),
            }
            let data_dir = cli
                .data_dir
                .clone()
                .unwrap_or_else(|| settings.data_dir.clone());
            output::config_path("local", &local_config_path(&data_dir));
            output::config_path("data", &settings.data_dir);
        }
    }
    Ok(())
}

fn read_document(path: &Path) -> CliResult<Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
    serde_json::from_str(&content)
        .map_err(|e| InfraError::json(format!("{} is not valid JSON", path.display()), e).into())
}

fn ensure_valid(violations: Vec<SchemaViolation>) -> CliResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(DomainError::InvalidDocument(violations).into())
    }
}

fn to_pretty_json(value: &Value) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| InfraError::json("render document", e).into())
}

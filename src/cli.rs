//! CLI definitions and command routing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commit::CommitManager;
use crate::config::Settings;
use crate::entry::{EntryPatch, HostEntry, NewEntry, View};
use crate::platform::default_elevated_copy;
use crate::store::EntryStore;

#[derive(Parser)]
#[command(name = "hostpilot")]
#[command(about = "Structured editor for the system hosts file with backups")]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List entries, optionally filtered by view and search text
    List {
        /// "all", "disabled", or a project tag
        #[arg(long, default_value = "all")]
        view: String,
        /// Case-insensitive substring over ip, domain, project and comment
        #[arg(long, default_value = "")]
        search: String,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add an entry and save
    Add {
        ip: String,
        domain: String,
        /// Project tag written as a [Tag] suffix
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        comment: Option<String>,
        /// Write the entry commented out
        #[arg(long)]
        disabled: bool,
    },

    /// Change fields of the entry for DOMAIN and save
    Edit {
        domain: String,
        #[arg(long)]
        ip: Option<String>,
        /// New domain name
        #[arg(long = "rename")]
        new_domain: Option<String>,
        #[arg(long, conflicts_with = "no_project")]
        project: Option<String>,
        /// Clear the project tag
        #[arg(long)]
        no_project: bool,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Enable or disable the entry for DOMAIN and save
    Toggle { domain: String },

    /// Delete the entry for DOMAIN and save
    Remove { domain: String },

    /// List distinct project tags
    Projects,

    /// Manage backups of the hosts file (create, list, restore)
    Backup {
        #[command(subcommand)]
        cmd: BackupCmd,
    },

    /// Export entries to a JSON file
    Export { file: PathBuf },

    /// Add entries from a JSON file and save
    Import { file: PathBuf },

    /// Check the hosts file, backup directory and elevation helper
    Doctor,
}

#[derive(Subcommand)]
pub enum BackupCmd {
    /// Snapshot the current hosts file
    Create,
    /// List backups, newest first
    List,
    /// Write a backup back onto the hosts file (no snapshot of the current state is taken)
    Restore { path: PathBuf },
}

/// Run CLI and dispatch to handlers.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::resolve()?;
    let manager = CommitManager::new(&settings.paths, default_elevated_copy(settings.elevate));
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(dispatch(&manager, cli.command))
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

async fn dispatch(manager: &CommitManager, command: Commands) -> Result<()> {
    match command {
        Commands::List { view, search, json } => {
            let store = manager.load_store()?;
            let view: View = view.parse()?;
            let rows: Vec<&HostEntry> = store.query(&view, &search).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for e in rows {
                    println!("{}", format_row(e));
                }
            }
            Ok(())
        }
        Commands::Add {
            ip,
            domain,
            project,
            comment,
            disabled,
        } => {
            let mut store = manager.load_store()?;
            store.add(NewEntry {
                ip,
                domain: domain.clone(),
                project_tag: project,
                comment: comment.unwrap_or_default(),
                enabled: !disabled,
            })?;
            commit(manager, &mut store).await?;
            println!("Added {domain}");
            Ok(())
        }
        Commands::Edit {
            domain,
            ip,
            new_domain,
            project,
            no_project,
            comment,
        } => {
            let mut store = manager.load_store()?;
            let id = entry_id(&store, &domain)?;
            let project_tag = if no_project { Some(None) } else { project.map(Some) };
            store.update(
                id,
                EntryPatch {
                    ip,
                    domain: new_domain,
                    project_tag,
                    comment,
                    enabled: None,
                },
            )?;
            commit(manager, &mut store).await?;
            println!("Updated {domain}");
            Ok(())
        }
        Commands::Toggle { domain } => {
            let mut store = manager.load_store()?;
            let id = entry_id(&store, &domain)?;
            let enabled = store.toggle(id)?;
            commit(manager, &mut store).await?;
            let state = if enabled { "enabled" } else { "disabled" };
            println!("{domain} {state}");
            Ok(())
        }
        Commands::Remove { domain } => {
            let mut store = manager.load_store()?;
            let id = entry_id(&store, &domain)?;
            store.remove(id);
            commit(manager, &mut store).await?;
            println!("Removed {domain}");
            Ok(())
        }
        Commands::Projects => {
            let store = manager.load_store()?;
            for tag in store.distinct_project_tags() {
                println!("{tag}");
            }
            Ok(())
        }
        Commands::Backup { cmd } => match cmd {
            BackupCmd::Create => {
                let path = manager.create_backup()?;
                println!("Backup created: {}", path.display());
                Ok(())
            }
            BackupCmd::List => {
                for b in manager.list_backups() {
                    println!("{}\t{}", b.name, b.modified_at.to_rfc3339());
                }
                Ok(())
            }
            BackupCmd::Restore { path } => {
                let path = resolve_backup_path(manager, path);
                manager.restore(&path).await?;
                println!("Restored {}", path.display());
                Ok(())
            }
        },
        Commands::Export { file } => {
            let store = manager.load_store()?;
            let n = crate::transfer::export_entries(&store, &file)?;
            println!("Exported {n} entries to {}", file.display());
            Ok(())
        }
        Commands::Import { file } => {
            let mut store = manager.load_store()?;
            let report = crate::transfer::import_entries(&mut store, &file)?;
            for (domain, e) in &report.skipped {
                eprintln!("Skipped {domain}: {e}");
            }
            if store.has_changes() {
                commit(manager, &mut store).await?;
            }
            println!("Imported {} entries", report.added);
            Ok(())
        }
        Commands::Doctor => {
            let results = crate::doctor::run_checks(manager);
            let mut all_ok = true;
            for r in &results {
                let mark = if r.ok { "ok" } else { "!!" };
                println!("[{mark}] {}", r.message);
                all_ok &= r.ok;
            }
            if !all_ok {
                anyhow::bail!("doctor found problems");
            }
            Ok(())
        }
    }
}

async fn commit(manager: &CommitManager, store: &mut EntryStore) -> Result<()> {
    let backup = manager
        .save_store(store)
        .await
        .context("save hosts file")?;
    println!("Backup: {}", backup.display());
    Ok(())
}

fn entry_id(store: &EntryStore, domain: &str) -> Result<crate::entry::EntryId> {
    store
        .find_by_domain(domain)
        .map(|e| e.id)
        .ok_or_else(|| anyhow::anyhow!("no entry for domain '{domain}'"))
}

/// Bare backup names resolve inside the backup directory.
fn resolve_backup_path(manager: &CommitManager, path: PathBuf) -> PathBuf {
    if path.components().count() == 1 && !path.exists() {
        manager.backup_dir().join(path)
    } else {
        path
    }
}

fn format_row(e: &HostEntry) -> String {
    let state = if e.enabled { "on " } else { "off" };
    let mut row = format!("{state}\t{}\t{}", e.ip, e.domain);
    if let Some(ref tag) = e.project_tag {
        row.push_str(&format!("\t[{tag}]"));
    }
    if !e.comment.is_empty() {
        row.push_str(&format!("\t# {}", e.comment));
    }
    row
}

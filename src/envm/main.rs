use chrono::{DateTime, Utc};
use clap::Parser;
use colored::*;
use envm::api::{CmdMessage, ConfigAction, MessageLevel, PathAction};
use envm::backup::RetentionPolicy;
use envm::commands::{BackupListing, CmdResult};
use envm::error::Result;
use envm::init::{self, EnvmContext};
use envm::model::{MutateOptions, Scope};
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands, PathCommands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let ctx = init::initialize(&cwd);

    let scope_flag: Option<Scope> = match cli.scope.as_deref() {
        Some(raw) => Some(raw.parse()?),
        None => None,
    };
    let scope = scope_flag.unwrap_or(Scope::User);

    match cli.command {
        Commands::Get {
            name,
            expand,
            across_scopes,
        } => handle_get(&ctx, &name, scope, expand, across_scopes),
        Commands::Set {
            name,
            value,
            no_backup,
            no_verify,
            no_rollback,
            dry_run,
        } => {
            let opts = mutate_opts(scope, no_backup, no_verify, no_rollback);
            let result = ctx.api.set(&name, &value, &opts, dry_run)?;
            finish(result)
        }
        Commands::Unset {
            name,
            no_backup,
            no_verify,
            no_rollback,
            dry_run,
        } => {
            let opts = mutate_opts(scope, no_backup, no_verify, no_rollback);
            let result = ctx.api.unset(&name, &opts, dry_run)?;
            finish(result)
        }
        Commands::Backups => handle_backups(&ctx, scope_flag),
        Commands::Restore { id } => finish(ctx.api.restore(&id)?),
        Commands::Purge {
            max_per_scope,
            max_age_days,
        } => handle_purge(&ctx, max_per_scope, max_age_days),
        Commands::Path { action } => handle_path(&ctx, scope, action),
        Commands::Config { key, value } => handle_config(&ctx, key, value),
    }
}

fn mutate_opts(scope: Scope, no_backup: bool, no_verify: bool, no_rollback: bool) -> MutateOptions {
    let mut opts = MutateOptions::new(scope);
    opts.backup = !no_backup;
    opts.verify = !no_verify;
    opts.rollback_on_fail = !no_rollback;
    opts
}

fn handle_get(
    ctx: &EnvmContext,
    name: &str,
    scope: Scope,
    expand: bool,
    across_scopes: bool,
) -> Result<()> {
    let result = ctx.api.get(name, scope, expand, across_scopes)?;
    if let Some(value) = &result.value {
        println!("{}", value);
        Ok(())
    } else {
        print_messages(&result.messages);
        std::process::exit(1);
    }
}

fn handle_backups(ctx: &EnvmContext, scope: Option<Scope>) -> Result<()> {
    let result = ctx.api.list_backups(scope)?;
    print_backups(&result.backups);
    print_messages(&result.messages);
    Ok(())
}

fn handle_purge(
    ctx: &EnvmContext,
    max_per_scope: Option<usize>,
    max_age_days: Option<i64>,
) -> Result<()> {
    let defaults = ctx.config.retention();
    let policy = RetentionPolicy {
        max_per_scope: max_per_scope.unwrap_or(defaults.max_per_scope),
        max_age_days: max_age_days.unwrap_or(defaults.max_age_days),
    };
    finish(ctx.api.purge(&policy)?)
}

fn handle_path(ctx: &EnvmContext, scope: Scope, action: PathCommands) -> Result<()> {
    let opts = MutateOptions::new(scope);
    let (name, action) = match action {
        PathCommands::List { name } => (name, PathAction::List),
        PathCommands::Add { segment, name } => (name, PathAction::Add(segment)),
        PathCommands::Remove { segment, name } => (name, PathAction::Remove(segment)),
        PathCommands::Dedupe { name } => (name, PathAction::Dedupe),
    };
    let listing = matches!(action, PathAction::List);
    let result = ctx.api.path(&name, action, &opts)?;
    if listing {
        for segment in &result.segments {
            println!("{}", segment);
        }
    }
    finish(result)
}

fn handle_config(ctx: &EnvmContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        let show = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<default>".to_string())
        };
        println!("profile-file = {}", show(&config.profile_file));
        println!("system-file = {}", show(&config.system_file));
        println!("backup-dir = {}", show(&config.backup_dir));
        println!("max-per-scope = {}", config.max_per_scope);
        println!("max-age-days = {}", config.max_age_days);
    }
    print_messages(&result.messages);
    Ok(())
}

/// Print a result's messages and mutation diagnostics, then translate a
/// failed mutation/restore into exit code 1.
fn finish(result: CmdResult) -> Result<()> {
    print_messages(&result.messages);
    if let Some(mutation) = &result.mutation {
        for note in &mutation.notes {
            println!("  {}", note.dimmed());
        }
    }
    if !result.succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_backups(backups: &[BackupListing]) {
    if backups.is_empty() {
        return;
    }

    let id_width = backups.iter().map(|b| b.id.width()).max().unwrap_or(0);
    for backup in backups {
        let age = backup
            .timestamp
            .map(format_time_ago)
            .unwrap_or_else(|| "unknown age".to_string());
        let padding = " ".repeat(id_width.saturating_sub(backup.id.width()));
        println!(
            "  {}{}  {:<7} {}  {}",
            backup.id,
            padding,
            backup.scope.to_string().yellow(),
            backup.name,
            age.dimmed()
        );
    }
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    timeago::Formatter::new().convert(duration.to_std().unwrap_or_default())
}

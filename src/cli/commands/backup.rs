use std::path::PathBuf;

use crate::cli::core::{require_arg, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::storage::BACKUP_FILE_NAME;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "backup",
            "Write a timestamped backup into the archive",
            "backup [note]",
            cmd_backup,
        ),
        CommandDefinition::new("backups", "List archived backups", "backups", cmd_backups),
        CommandDefinition::new(
            "export",
            "Write all data to a JSON backup file",
            "export [path]",
            cmd_export,
        ),
        CommandDefinition::new(
            "restore",
            "Replace all data with a backup file or archived backup",
            "restore <path|backup name>",
            cmd_restore,
        ),
    ]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = if args.is_empty() {
        None
    } else {
        Some(args.join(" "))
    };
    let document = context.app.backup_document();
    let path = context.archive.create(&document, note.as_deref())?;
    io::print_success(format!("Backup saved to {}.", path.display()));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section(format!("Backups in {}", context.archive.dir().display()));
    let backups = context.archive.list()?;
    if backups.is_empty() {
        io::print_info("No backups yet. Use `backup [note]` to create one.");
        return Ok(());
    }
    for (index, info) in backups.iter().enumerate() {
        let note = info
            .note
            .as_deref()
            .map(|note| format!("  ({})", note))
            .unwrap_or_default();
        io::print_info(format!(
            "  {:>2}. {}  {}{}",
            index + 1,
            info.created_at.format("%Y-%m-%d %H:%M:%S"),
            info.file_name,
            note
        ));
    }
    io::print_info(format!(
        "Keeping the newest {} backup(s).",
        context.archive.retention()
    ));
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = args
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(BACKUP_FILE_NAME));
    context.app.export_backup(&path)?;
    io::print_success(format!("Exported all data to {}.", path.display()));
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = require_arg(args, 0, "restore <path|backup name>")?;
    let path = context.archive.resolve(reference);
    if !context.confirm(
        "Restoring replaces every transaction, budget, debt, split and category. Continue?",
        true,
    )? {
        io::print_info("Restore cancelled.");
        return Ok(());
    }
    context.app.restore_from_path(&path)?;
    io::print_success(format!("Data restored from {}.", path.display()));
    Ok(())
}

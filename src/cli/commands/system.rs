use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::config::Theme;
use crate::ledger::SortKey;
use crate::utils::build_info;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "theme",
            "Toggle or set the colour theme",
            "theme [light|dark]",
            cmd_theme,
        )
        .with_subcommands(&["light", "dark"]),
        CommandDefinition::new(
            "sort",
            "Show or set the default list order",
            "sort [date-desc|date-asc|amount-desc|amount-asc|category]",
            cmd_sort,
        )
        .with_subcommands(&["date-desc", "date-asc", "amount-desc", "amount-asc", "category"]),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_theme(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let theme = match args.first() {
        Some(raw) => raw.parse::<Theme>()?,
        None => context.config.theme.toggled(),
    };
    context.config.theme = theme;
    context.persist_config()?;
    context.apply_output_preferences();
    io::print_success(format!("Theme set to {}.", theme));
    Ok(())
}

fn cmd_sort(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        io::print_info(format!("Default order: {}", context.config.default_sort));
        let options: Vec<_> = SortKey::ALL.iter().map(SortKey::as_str).collect();
        io::print_hint(format!("Options: {}", options.join(", ")));
        return Ok(());
    };
    let key = raw.parse::<SortKey>()?;
    context.config.default_sort = key;
    context.persist_config()?;
    io::print_success(format!("Transactions will be listed by {}.", key));
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Expense Core {}", meta.version));
    io::print_info(format!("  Build hash   : {}", meta.git_hash));
    io::print_info(format!("  Built at     : {}", meta.timestamp));
    io::print_info(format!("  Target       : {}", meta.target));
    io::print_info(format!("  Profile      : {}", meta.profile));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first().map(|name| name.to_lowercase()) {
        match context.command(&name) {
            Some(definition) => help::print_command(definition),
            None => context.suggest_command(args[0]),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

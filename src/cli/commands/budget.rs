use crate::cli::core::{parse_amount_arg, require_arg, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{band_label, money, progress_bar, section as output_section};
use crate::ledger::BudgetStatus;

use super::{split_action, unknown_action, CommandDefinition};

const USAGE: &str = "budget <set|remove|list> [category] [limit]";
const BAR_WIDTH: usize = 20;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("budget", "Manage monthly category budgets", USAGE, cmd_budget)
            .with_subcommands(&["set", "remove", "list"]),
    ]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    match action.as_str() {
        "set" => {
            let category = require_arg(rest, 0, USAGE)?;
            let limit = parse_amount_arg(require_arg(rest, 1, USAGE)?)?;
            context.app.set_budget(category, limit)?;
            io::print_success(format!(
                "Budget for `{}` set to {}.",
                category.trim(),
                money(limit)
            ));
            Ok(())
        }
        "remove" | "rm" => {
            let category = require_arg(rest, 0, USAGE)?;
            if context.app.remove_budget(category)? {
                io::print_success(format!("Budget for `{}` removed.", category.trim()));
            } else {
                io::print_warning(format!("No budget set for `{}`.", category.trim()));
            }
            Ok(())
        }
        "list" | "ls" => {
            output_section(format!("Budgets - {}", context.app.active_month().label()));
            let statuses = context.app.budget_statuses();
            if statuses.is_empty() {
                io::print_info("No budgets set. Try `budget set Food 300`.");
            }
            for status in &statuses {
                io::print_info(status_line(status));
            }
            Ok(())
        }
        other => Err(unknown_action(other, USAGE)),
    }
}

fn status_line(status: &BudgetStatus) -> String {
    let remaining = status
        .remaining
        .map(money)
        .unwrap_or_else(|| "n/a".to_string());
    let percent = status
        .ratio
        .map(|ratio| format!("{:.0}%", ratio * 100.0))
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "  {:<16} {} {:>5}  spent {} of {}, remaining {} {}",
        status.category,
        progress_bar(status.progress_percent(), BAR_WIDTH),
        percent,
        money(status.spent),
        money(status.limit),
        remaining,
        band_label(status.band)
    )
}

use chrono::{Local, NaiveDateTime};

use crate::cli::core::{
    parse_amount_arg, parse_date, parse_position, parse_time, require_arg, CommandError,
    CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output::{money, section as output_section};
use crate::errors::LedgerError;
use crate::ledger::{BudgetBand, MonthKey, SortKey, Transaction, TransactionPatch};

use super::CommandDefinition;

const ADD_USAGE: &str =
    "add <description> <amount> <category> [--recurring] [--date YYYY-MM-DD] [--time HH:MM]";
const QUICK_USAGE: &str = "quick <category> <amount>";
const EDIT_USAGE: &str =
    "edit <position> [--description TEXT] [--amount AMOUNT] [--category NAME]";
const DELETE_USAGE: &str = "delete <position>";
const MONTH_USAGE: &str = "month [YEAR-MONTH|next|prev]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("add", "Record a transaction in the active month", ADD_USAGE, cmd_add),
        CommandDefinition::new("quick", "Record an amount under a category", QUICK_USAGE, cmd_quick),
        CommandDefinition::new("edit", "Change a transaction of the active month", EDIT_USAGE, cmd_edit),
        CommandDefinition::new("delete", "Remove a transaction of the active month", DELETE_USAGE, cmd_delete),
        CommandDefinition::new("list", "List the active month's transactions", "list [sort]", cmd_list)
            .with_subcommands(&["date-desc", "date-asc", "amount-desc", "amount-asc", "category"]),
        CommandDefinition::new("month", "Show or switch the active month", MONTH_USAGE, cmd_month)
            .with_subcommands(&["next", "prev"]),
        CommandDefinition::new("months", "Show the total of every recorded month", "months", cmd_months),
        CommandDefinition::new(
            "next-month",
            "Start the next month, carrying recurring transactions over",
            "next-month",
            cmd_next_month,
        ),
    ]
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Positional operands plus the `--flag value` options of a command line.
#[derive(Default)]
struct ParsedArgs<'a> {
    positional: Vec<&'a str>,
    options: Vec<(&'a str, &'a str)>,
    recurring: bool,
}

impl<'a> ParsedArgs<'a> {
    fn parse(args: &[&'a str], value_flags: &[&str], usage: &str) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            if arg == "--recurring" || arg == "-r" {
                parsed.recurring = true;
            } else if value_flags.contains(&arg) {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("`{}` needs a value; usage: {}", arg, usage))
                })?;
                parsed.options.push((arg, value));
            } else if arg.starts_with("--") {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{}`; usage: {}",
                    arg, usage
                )));
            } else {
                parsed.positional.push(arg);
            }
        }
        Ok(parsed)
    }

    fn option(&self, flag: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(name, _)| *name == flag)
            .map(|(_, value)| *value)
    }
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["--date", "--time"], ADD_USAGE)?;
    if parsed.positional.len() != 3 {
        return Err(CommandError::InvalidArguments(format!("usage: {}", ADD_USAGE)));
    }
    let description = parsed.positional[0];
    let amount = parse_amount_arg(parsed.positional[1])?;
    let category = parsed.positional[2];

    let moment = now();
    let date = match parsed.option("--date") {
        Some(raw) => parse_date(raw)?,
        None => moment.date(),
    };
    let time = match parsed.option("--time") {
        Some(raw) => parse_time(raw)?,
        None => moment.time(),
    };

    if !context.app.categories().contains(category.trim()) {
        io::print_warning(format!(
            "`{}` is not a known category; recording it anyway.",
            category.trim()
        ));
    }

    let transaction = Transaction::new(date, time, description, amount, category.trim())
        .with_recurring(parsed.recurring);
    let index = context.app.add_transaction(transaction)?;
    io::print_success(format!(
        "Added #{}: {} {} [{}]{}",
        index + 1,
        description,
        money(amount),
        category.trim(),
        if parsed.recurring { " (recurring)" } else { "" }
    ));
    warn_on_budget(context, category.trim());
    Ok(())
}

fn cmd_quick(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let category = require_arg(args, 0, QUICK_USAGE)?;
    let amount = parse_amount_arg(require_arg(args, 1, QUICK_USAGE)?)?;
    let index = context.app.quick_add(category, amount, now())?;
    io::print_success(format!(
        "Added #{}: {} under {}",
        index + 1,
        money(amount),
        category.trim()
    ));
    warn_on_budget(context, category.trim());
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["--description", "--amount", "--category"], EDIT_USAGE)?;
    let [position] = parsed.positional.as_slice() else {
        return Err(CommandError::InvalidArguments(format!("usage: {}", EDIT_USAGE)));
    };
    let index = parse_position(position)?;

    let mut patch = TransactionPatch::new();
    if let Some(description) = parsed.option("--description") {
        patch = patch.description(description);
    }
    if let Some(amount) = parsed.option("--amount") {
        patch = patch.amount(parse_amount_arg(amount)?);
    }
    if let Some(category) = parsed.option("--category") {
        patch = patch.category(category.trim());
    }
    if patch.is_empty() {
        return Err(CommandError::InvalidArguments(format!(
            "nothing to change; usage: {}",
            EDIT_USAGE
        )));
    }

    let updated = context.app.edit_transaction(index, &patch)?;
    io::print_success(format!(
        "Updated #{}: {} {} [{}]",
        index + 1,
        updated.description,
        money(updated.amount),
        updated.category
    ));
    warn_on_budget(context, &updated.category);
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let index = parse_position(require_arg(args, 0, DELETE_USAGE)?)?;
    let month = context.app.active_month();
    let Some(target) = context.app.ledger().transaction(month, index) else {
        let len = context.app.ledger().transactions(month).len();
        return Err(LedgerError::out_of_range(index, len).into());
    };
    let prompt = format!("Delete `{}` ({})?", target.description, money(target.amount));
    if !context.confirm(&prompt, true)? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    let removed = context.app.delete_transaction(index)?;
    io::print_success(format!("Deleted `{}`.", removed.description));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = match args.first() {
        Some(raw) => raw.parse::<SortKey>()?,
        None => context.config.default_sort,
    };
    let month = context.app.active_month();
    output_section(format!("{} (sorted by {})", month.label(), key));

    let view = context.app.sorted_transactions(key);
    if view.is_empty() {
        io::print_info("No transactions recorded for this month.");
        return Ok(());
    }
    for (index, txn) in view.iter() {
        io::print_info(format!(
            "  #{:<3} {} {}  {:<24} {:<14} {:>10}{}",
            index + 1,
            txn.date.format("%Y-%m-%d"),
            txn.time.format("%H:%M"),
            txn.description,
            format!("[{}]", txn.category),
            money(txn.amount),
            if txn.recurring { "  (recurring)" } else { "" }
        ));
    }
    io::print_info(format!("  Total: {}", money(context.app.active_total())));
    Ok(())
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let current = context.app.active_month();
    let target = match args.first().map(|raw| raw.to_lowercase()) {
        None => {
            io::print_info(format!(
                "Active month: {} ({}), total {}",
                current.label(),
                current,
                money(context.app.active_total())
            ));
            return Ok(());
        }
        Some(word) if word == "next" => current.next(),
        Some(word) if word == "prev" || word == "previous" => current.previous(),
        Some(raw) => raw.parse::<MonthKey>()?,
    };
    context.app.set_active_month(target);
    io::print_success(format!("Active month is now {}.", target.label()));
    Ok(())
}

fn cmd_months(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Monthly totals");
    let summaries = context.app.month_summaries();
    if summaries.is_empty() {
        io::print_info("Nothing recorded yet.");
        return Ok(());
    }
    for summary in summaries.iter().rev() {
        io::print_info(format!(
            "  {:<16} {:>10}",
            summary.month.label(),
            money(summary.total)
        ));
    }
    Ok(())
}

fn cmd_next_month(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let target = context.app.active_month().next();
    if context.app.ledger().contains_month(target)
        && !context.confirm(
            &format!("{} already has entries; replace them?", target.label()),
            true,
        )?
    {
        io::print_info("Rollover cancelled.");
        return Ok(());
    }
    let rollover = context.app.start_next_month()?;
    io::print_success(format!(
        "New month started: {}. {} recurring transaction(s) carried over.",
        rollover.month.label(),
        rollover.carried
    ));
    Ok(())
}

fn warn_on_budget(context: &ShellContext, category: &str) {
    let Some(status) = context.app.budget_status(category) else {
        return;
    };
    if matches!(status.band, BudgetBand::Warning | BudgetBand::Danger) {
        io::print_warning(format!(
            "{} budget at {:.0}% ({} of {}).",
            status.category,
            status.progress_percent().unwrap_or(100.0),
            money(status.spent),
            money(status.limit)
        ));
    }
}

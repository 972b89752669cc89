use crate::cli::core::{parse_amount_arg, parse_position, require_arg, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{money, section as output_section};
use crate::ledger::DebtDirection;

use super::{split_action, unknown_action, CommandDefinition};

const USAGE: &str = "debt <add|remove|list> [description amount i-owe|owed] [position]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("debt", "Track money you owe or are owed", USAGE, cmd_debt)
            .with_subcommands(&["add", "remove", "list"]),
    ]
}

fn cmd_debt(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    match action.as_str() {
        "add" => {
            let description = require_arg(rest, 0, USAGE)?;
            let amount = parse_amount_arg(require_arg(rest, 1, USAGE)?)?;
            let direction: DebtDirection = require_arg(rest, 2, USAGE)?.parse()?;
            let debt = context.app.add_debt(description, amount, direction)?;
            io::print_success(format!(
                "Recorded `{}`: {} ({}).",
                debt.description,
                money(debt.amount),
                debt.direction
            ));
            Ok(())
        }
        "remove" | "rm" => {
            let index = parse_position(require_arg(rest, 0, USAGE)?)?;
            let removed = context.app.remove_debt(index)?;
            io::print_success(format!("Removed debt `{}`.", removed.description));
            Ok(())
        }
        "list" | "ls" => {
            output_section("Debts");
            let debts = context.app.debts().list();
            if debts.is_empty() {
                io::print_info("No debts recorded.");
                return Ok(());
            }
            for (index, debt) in debts.iter().enumerate() {
                io::print_info(format!(
                    "  #{:<3} {:<24} {:>10}  {}",
                    index + 1,
                    debt.description,
                    money(debt.amount),
                    debt.direction
                ));
            }
            let totals = context.app.debt_totals();
            io::print_info(format!(
                "  I owe {}, owed to me {}, net {}",
                money(totals.owed_by_me),
                money(totals.owed_to_me),
                money(totals.net())
            ));
            Ok(())
        }
        other => Err(unknown_action(other, USAGE)),
    }
}

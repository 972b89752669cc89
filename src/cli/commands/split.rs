use crate::cli::core::{parse_amount_arg, parse_position, require_arg, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{money, section as output_section};

use super::{split_action, unknown_action, CommandDefinition};

const USAGE: &str = "split <add|remove|list> [description total \"name, name\"] [position]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("split", "Share an expense evenly between people", USAGE, cmd_split)
            .with_subcommands(&["add", "remove", "list"]),
    ]
}

fn cmd_split(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    match action.as_str() {
        "add" => {
            let description = require_arg(rest, 0, USAGE)?;
            let total = parse_amount_arg(require_arg(rest, 1, USAGE)?)?;
            // Participants may arrive as one quoted list or as separate words.
            let participants = rest.get(2..).unwrap_or_default().join(",");
            let split = context.app.add_split(description, total, &participants)?;
            io::print_success(format!(
                "Split `{}` {} between {}: {} each.",
                split.description,
                money(split.total),
                split.participants.join(", "),
                money(split.each)
            ));
            Ok(())
        }
        "remove" | "rm" => {
            let index = parse_position(require_arg(rest, 0, USAGE)?)?;
            let removed = context.app.remove_split(index)?;
            io::print_success(format!("Removed split `{}`.", removed.description));
            Ok(())
        }
        "list" | "ls" => {
            output_section("Splits");
            let splits = context.app.splits().list();
            if splits.is_empty() {
                io::print_info("No splits recorded.");
            }
            for (index, split) in splits.iter().enumerate() {
                io::print_info(format!(
                    "  #{:<3} {:<24} {:>10}  {} each ({})",
                    index + 1,
                    split.description,
                    money(split.total),
                    money(split.each),
                    split.participants.join(", ")
                ));
            }
            Ok(())
        }
        other => Err(unknown_action(other, USAGE)),
    }
}

use crate::cli::core::{require_arg, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{money, section as output_section};

use super::{split_action, unknown_action, CommandDefinition};

const USAGE: &str = "category <add|remove|list> [name]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("category", "Manage spending categories", USAGE, cmd_category)
            .with_subcommands(&["add", "remove", "list"]),
    ]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    match action.as_str() {
        "add" => {
            let name = rest.join(" ");
            require_arg(rest, 0, USAGE)?;
            if context.app.add_category(&name)? {
                io::print_success(format!("Category `{}` added.", name.trim()));
            } else {
                io::print_info(format!("Category `{}` already exists.", name.trim()));
            }
            Ok(())
        }
        "remove" | "rm" => {
            let name = rest.join(" ");
            require_arg(rest, 0, USAGE)?;
            if context.app.remove_category(&name)? {
                io::print_success(format!("Category `{}` removed.", name.trim()));
            } else {
                io::print_warning(format!("No category named `{}`.", name.trim()));
            }
            Ok(())
        }
        "list" | "ls" => {
            output_section("Categories");
            let month = context.app.active_month();
            for name in context.app.categories().iter() {
                let spent = context.app.ledger().category_total(month, name);
                io::print_info(format!("  {:<20} {:>10}", name, money(spent)));
            }
            Ok(())
        }
        other => Err(unknown_action(other, USAGE)),
    }
}

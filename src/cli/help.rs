use crate::cli::commands::{CommandDefinition, CommandRegistry};
use crate::cli::io;
use crate::cli::output::section as output_section;

pub fn print_overview(registry: &CommandRegistry) {
    output_section("Available commands");
    for definition in registry.iter() {
        io::print_info(format!("  {:<12} {}", definition.name, definition.description));
    }
    io::print_info("Use `help <command>` for details. Positions start at 1.");
}

pub fn print_command(definition: &CommandDefinition) {
    output_section(format!("Help: {}", definition.name));
    io::print_info(format!("  Description: {}", definition.description));
    io::print_info(format!("  Usage: {}", definition.usage));
    if !definition.subcommands.is_empty() {
        io::print_info(format!(
            "  Sub-commands: {}",
            definition.subcommands.join(", ")
        ));
    }
}

use crate::core::{Message, Role};
use colored::*;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.len()).bright_cyan());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

/// One line per message, role-colored
pub fn print_messages(messages: &[Message]) {
    if messages.is_empty() {
        print_info("(no messages)");
        return;
    }

    for message in messages {
        let label = match message.role {
            Role::Human => "Human".yellow().bold(),
            Role::Ai => "AI".magenta().bold(),
        };
        println!("{}: {}", label, message.content);
    }
}

use anyhow::Result;
use colored::{ColoredString, Colorize};
use declarative::Action;
use serde::Serialize;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Symbol for a planned or performed action
pub fn action_symbol(action: Action) -> ColoredString {
    match action {
        Action::Create => "+".green(),
        Action::Delete => "-".red(),
        Action::NoOp => "○".dimmed(),
    }
}

/// Print a value as pretty JSON on stdout
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The uniform failure object printed in JSON output mode
pub fn failure(err: &anyhow::Error) -> serde_json::Value {
    serde_json::json!({
        "failed": true,
        "msg": format!("{err:#}"),
        "exception": format!("{err:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_action_symbols_are_distinct() {
        let symbols: Vec<String> = [Action::Create, Action::Delete, Action::NoOp]
            .into_iter()
            .map(|a| action_symbol(a).to_string())
            .collect();
        assert_ne!(symbols[0], symbols[1]);
        assert_ne!(symbols[1], symbols[2]);
    }

    #[test]
    fn test_failure_object() {
        let err = Err::<(), _>(anyhow::anyhow!("status 400"))
            .context("create failed")
            .unwrap_err();
        let value = failure(&err);
        assert_eq!(value["failed"], true);
        assert_eq!(value["msg"], "create failed: status 400");
        assert!(value["exception"].as_str().unwrap().contains("Caused by"));
    }
}

//! Output formatting shared by the subcommands.

use serde::Serialize;

/// How a subcommand prints its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable Estonian text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format whole euros the Estonian way: `1 786 €`.
pub fn euros(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{grouped} €")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euros_groups_thousands() {
        assert_eq!(euros(0), "0 €");
        assert_eq!(euros(725), "725 €");
        assert_eq!(euros(1786), "1 786 €");
        assert_eq!(euros(1234567), "1 234 567 €");
        assert_eq!(euros(-43), "-43 €");
    }
}

//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use tabled::{Table, Tabled};

use crate::{Variable, VariableList};

/// Trait for human-readable output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

impl PrettyPrint for Variable {
    fn pretty_print(&self) -> String {
        let header = format!("Variable: {}", self.name);
        let divider = "─".repeat(header.chars().count().max(30));

        let mut lines = vec![header, divider, format!("Value:          {}", self.value)];

        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", created.format(TIMESTAMP_FORMAT)));
        }

        if let Some(ref updated) = self.updated_at {
            lines.push(format!("Updated:        {}", updated.format(TIMESTAMP_FORMAT)));
        }

        lines.join("\n")
    }
}

/// Table row for a variable listing.
#[derive(Tabled)]
pub struct VariableRow {
    name: String,
    value: String,
    updated: String,
}

impl From<&Variable> for VariableRow {
    fn from(v: &Variable) -> Self {
        Self {
            name: v.name.clone(),
            value: v.value.clone(),
            updated: v
                .updated_at
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }
}

impl PrettyPrint for VariableList {
    fn pretty_print(&self) -> String {
        let rows: Vec<VariableRow> = self.iter().map(VariableRow::from).collect();
        let mut out = Table::new(rows).to_string();

        if self.is_partial() {
            out.push_str(&format!(
                "\n\nShowing {} of {} variables (use --all for every page)",
                self.len(),
                self.total_count
            ));
        } else {
            out.push_str(&format!("\n\n{} variables", self.total_count));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Variable {
        serde_json::from_value(serde_json::json!({
            "name": "API_URL",
            "value": "https://example.com",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-02-01T12:30:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_variable_pretty_print_format() {
        let output = sample().pretty_print();
        assert!(output.starts_with("Variable: API_URL"));
        assert!(output.contains("Value:          https://example.com"));
        assert!(output.contains("Updated:        2024-02-01 12:30:00 UTC"));
    }

    #[test]
    fn test_list_pretty_print_mentions_partial_results() {
        let list = VariableList {
            total_count: 2,
            variables: vec![sample()],
        };
        let output = list.pretty_print();
        assert!(output.contains("API_URL"));
        assert!(output.contains("Showing 1 of 2 variables"));

        let list = VariableList {
            total_count: 1,
            variables: vec![sample()],
        };
        assert!(list.pretty_print().ends_with("1 variables"));
    }
}

//! Output formatting for the CLI.

use anyhow::Result;
use console::style;
use issuekit_manifest::ComposedBody;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output (request body only, ready to send)
    Json,
    /// YAML output
    Yaml,
}

/// Print a value in the specified format.
pub fn print<T: Serialize + HumanDisplay>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => println!("{}", value.human_display()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

/// Print a composed request body.
///
/// JSON output is the bare body so it can be piped straight into a client.
pub fn print_body(composed: &ComposedBody, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&composed.body)?);
            Ok(())
        }
        _ => print(composed, format),
    }
}

/// Print a success message.
pub fn print_success(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Human => println!("{message}"),
        OutputFormat::Json => {
            println!("{}", serde_json::json!({"status": "ok", "message": message}));
        }
        OutputFormat::Yaml => {
            println!("status: ok\nmessage: {message}");
        }
    }
}

/// Trait for human-readable display.
pub trait HumanDisplay {
    fn human_display(&self) -> String;
}

impl HumanDisplay for ComposedBody {
    fn human_display(&self) -> String {
        let mut out = String::new();

        writeln!(out, "{}   {}", style("Kind:").bold(), self.kind).unwrap();
        writeln!(out, "{} {}", style("Dialect:").bold(), self.dialect).unwrap();
        writeln!(out, "{}", style("Body:").bold()).unwrap();

        let pretty = serde_json::to_string_pretty(&self.body).unwrap_or_default();
        for line in pretty.lines() {
            writeln!(out, "  {line}").unwrap();
        }

        out
    }
}

/// Alias table view.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AliasTable<'a>(pub &'a BTreeMap<String, String>);

impl HumanDisplay for AliasTable<'_> {
    fn human_display(&self) -> String {
        if self.0.is_empty() {
            return "No aliases configured.".to_string();
        }

        let width = self.0.keys().map(String::len).max().unwrap_or(5).max(5);
        let mut out = String::new();
        writeln!(out, "{:<width$}  FIELD", "ALIAS").unwrap();
        writeln!(out, "{}", "-".repeat(width + 20)).unwrap();
        for (alias, field) in self.0 {
            writeln!(out, "{alias:<width$}  {field}").unwrap();
        }
        out
    }
}

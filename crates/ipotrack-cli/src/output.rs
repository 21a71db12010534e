use serde_json::Value;

use crate::error::CliError;

/// Print the command report as a single JSON document on stdout. Progress
/// and diagnostics go to stderr so stdout stays machine-readable.
pub fn render(report: &Value, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    println!("{payload}");

    Ok(())
}

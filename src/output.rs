//! Rendering of identification results and collection records.
//!
//! Text output mirrors the scanner result card: species name, confidence as
//! a whole percentage, region, and the safety classification highlighted.
//! JSON output is the plain serde form for scripting.

use yansi::Paint;

use crate::session::Identification;
use crate::store::MushroomRecord;

/// Render an identification as colored text.
#[must_use]
pub fn identification_text(result: &Identification) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}  {}\n",
        result.name.bold().green(),
        format!("{:.0}% confidence", result.confidence * 100.0).dim()
    ));
    out.push_str(&format!("{}\n", result.desc));
    out.push_str(&format!("Region: {}\n", result.region));
    out.push_str(&format!("Safety: {}\n", result.edibility.bold().red()));
    out
}

/// Render a collection snapshot as text, one block per record.
#[must_use]
pub fn records_text(records: &[MushroomRecord]) -> String {
    if records.is_empty() {
        return "The collection is empty.\n".to_string();
    }

    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "#{} {}  {}\n",
            record.id,
            record.name.bold(),
            format!("{:.0}%", record.confidence * 100.0).dim()
        ));
        out.push_str(&format!(
            "    {} | {}\n",
            record.region,
            record.edibility.red()
        ));
        if let Some(location) = &record.location {
            out.push_str(&format!("    found at {}\n", location));
        }
        if let Some(found_on) = &record.found_on {
            out.push_str(&format!("    found on {}\n", found_on));
        }
        out.push_str(&format!(
            "    saved {}\n",
            record.saved_at.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    out
}

/// Render any serializable value as pretty JSON.
pub fn json<T: serde::Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

// Headless export of a built model as pretty-printed JSON.

use std::io::Write;

use unitcast_core::BuiltModel;

/// Serialize the unit table, team table, sources and diagnostics.
pub fn to_json(model: &BuiltModel) -> serde_json::Result<String> {
    serde_json::to_string_pretty(model)
}

/// Write the JSON export followed by a newline.
pub fn write_json<W: Write>(model: &BuiltModel, mut writer: W) -> anyhow::Result<()> {
    let json = to_json(model)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

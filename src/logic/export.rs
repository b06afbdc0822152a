//! CSV export of the points table.

use crate::models::StandingsRow;

/// Ranked rows as CSV, one line per team, NRR to three decimals.
pub fn standings_csv(rows: &[StandingsRow]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Team", "P", "W", "L", "T", "RF", "RA", "NRR", "Pts"])?;
    for r in rows {
        writer.write_record([
            r.team.clone(),
            r.played.to_string(),
            r.won.to_string(),
            r.lost.to_string(),
            r.tied.to_string(),
            r.runs_for.to_string(),
            r.runs_against.to_string(),
            format!("{:.3}", r.net_run_rate),
            r.points.to_string(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

//! Plain-text tables for the list subcommands

use std::fmt;

use crate::controls::{RaplPowerLimit, TemperatureTarget, VoltagePlane};
use crate::orchestrator::BatchOutcome;

/// Borderless table with left-aligned, space-padded columns
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_uppercase()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }
        widths
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        let write_line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:<w$}"))
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())
        };

        write_line(f, &self.headers)?;
        for row in &self.rows {
            write_line(f, row)?;
        }
        Ok(())
    }
}

pub fn voltage_table(outcome: &BatchOutcome<Vec<(VoltagePlane, i32)>>) -> Table {
    let mut table = Table::new(&["cpu", "plane", "offset (mV)"]);
    for (cpu, offsets) in outcome.results() {
        for (plane, offset_mv) in offsets {
            table.push_row(vec![
                cpu.to_string(),
                plane.to_string(),
                offset_mv.to_string(),
            ]);
        }
    }
    table
}

pub fn temperature_table(outcome: &BatchOutcome<TemperatureTarget>) -> Table {
    let mut table = Table::new(&["cpu", "target (°C)", "offset (°C)", "throttle temp (°C)"]);
    for (cpu, tt) in outcome.results() {
        table.push_row(vec![
            cpu.to_string(),
            tt.target.to_string(),
            tt.offset.to_string(),
            tt.throttle_temp().to_string(),
        ]);
    }
    table
}

fn yes_no(flag: bool) -> String {
    (if flag { "yes" } else { "no" }).to_string()
}

pub fn power_limit_table(outcome: &BatchOutcome<RaplPowerLimit>) -> Table {
    let mut table = Table::new(&[
        "cpu",
        "limit (W)",
        "window (s)",
        "enabled",
        "clamping",
        "short-term limit (W)",
        "short-term window (s)",
        "locked",
        "energy unit (J)",
    ]);
    for (cpu, limit) in outcome.results() {
        table.push_row(vec![
            cpu.to_string(),
            format!("{:.3}", limit.power_limit_watts),
            format!("{:.6}", limit.time_window_seconds),
            yes_no(limit.enabled),
            yes_no(limit.clamping),
            format!("{:.3}", limit.short_term.power_limit_watts),
            format!("{:.6}", limit.short_term.time_window_seconds),
            yes_no(limit.locked),
            format!("{:e}", limit.units.energy_unit_joules),
        ]);
    }
    table
}

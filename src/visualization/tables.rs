use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::models::{EditableField, SimulationInstance, SimulationParams};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format the model parameters as a table.
pub fn format_params_table(params: &SimulationParams) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Model Parameters".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table();
    table.set_header(vec!["Parameter", "Value"]);
    for field in EditableField::ALL {
        table.add_row(vec![
            Cell::new(field.label()),
            Cell::new(format!("{}", params.field_value(field))),
        ]);
    }
    table.add_row(vec![Cell::new("Time Step"), Cell::new(format!("{}", params.step))]);

    output.push_str(&format!("{table}"));
    output
}

/// Print the model parameters.
pub fn print_params_table(params: &SimulationParams) {
    print!("{}", format_params_table(params));
}

/// Format one instance's adoption series with week-over-week new users.
pub fn format_series_table(instance: &SimulationInstance) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Simulated Adoption".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    if instance.data.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let mut table = new_table();
    table.set_header(vec!["Time", "Users", "New Users", "% of M"]);

    let mut previous: Option<i64> = None;
    for point in &instance.data {
        let new_users = previous
            .map(|p| format!("{:+}", point.users.saturating_sub(p)))
            .unwrap_or_else(|| "-".to_string());
        let share = if instance.params.saturation > 0.0 {
            format!("{:.1}%", point.users as f64 / instance.params.saturation * 100.0)
        } else {
            "-".to_string()
        };
        table.add_row(vec![
            Cell::new(format!("{}", point.time)),
            Cell::new(point.users),
            Cell::new(new_users),
            Cell::new(share),
        ]);
        previous = Some(point.users);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print one instance's adoption series.
pub fn print_series_table(instance: &SimulationInstance) {
    print!("{}", format_series_table(instance));
}

/// Format a one-row-per-instance overview.
pub fn format_instances_summary(instances: &[SimulationInstance]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Simulation Instances".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table();
    table.set_header(vec!["#", "M", "k", "B", "Duration", "Points", "Final Users"]);
    for (i, inst) in instances.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{}", inst.params.saturation)),
            Cell::new(format!("{}", inst.params.growth_rate)),
            Cell::new(format!("{}", inst.params.initial_population)),
            Cell::new(inst.params.duration),
            Cell::new(inst.data.len()),
            Cell::new(
                inst.last_users()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print a one-row-per-instance overview.
pub fn print_instances_summary(instances: &[SimulationInstance]) {
    print!("{}", format_instances_summary(instances));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataPoint;

    fn sample_instance() -> SimulationInstance {
        let mut inst = SimulationInstance::new(SimulationParams::default());
        inst.data = vec![
            DataPoint {
                time: 0.0,
                users: 10,
            },
            DataPoint {
                time: 1.0,
                users: 11,
            },
            DataPoint {
                time: 2.0,
                users: 13,
            },
        ];
        inst
    }

    #[test]
    fn test_params_table() {
        let output = format_params_table(&SimulationParams::default());
        assert!(output.contains("Market Saturation M"));
        assert!(output.contains("Growth Rate k"));
        assert!(output.contains("0.1"));
        assert!(output.contains("Duration (Weeks)"));
        assert!(output.contains("52"));
    }

    #[test]
    fn test_series_table() {
        let output = format_series_table(&sample_instance());
        assert!(output.contains("New Users"));
        assert!(output.contains("+2"));
        assert!(output.contains("1.3%"));
    }

    #[test]
    fn test_series_table_extreme_users() {
        let mut inst = SimulationInstance::new(SimulationParams::default());
        inst.data = vec![
            DataPoint {
                time: 0.0,
                users: i64::MIN,
            },
            DataPoint {
                time: 1.0,
                users: i64::MAX,
            },
            DataPoint {
                time: 2.0,
                users: i64::MIN,
            },
        ];
        let output = format_series_table(&inst);
        assert!(output.contains("New Users"));
    }

    #[test]
    fn test_series_table_empty() {
        let inst = SimulationInstance::new(SimulationParams::default());
        assert!(format_series_table(&inst).contains("No data available."));
    }

    #[test]
    fn test_instances_summary() {
        let instances = vec![
            sample_instance(),
            SimulationInstance::new(SimulationParams::default()),
        ];
        let output = format_instances_summary(&instances);
        assert!(output.contains("Final Users"));
        assert!(output.contains("13"));
        assert!(output.contains('-'));
    }
}

mod charts;
mod tables;

pub use charts::{
    format_text_chart, print_text_chart, render_svg_chart, render_svg_chart_with, ChartLayout,
    ChartScale, SERIES_COLOR, X_AXIS_LABEL, Y_AXIS_LABEL,
};
pub use tables::{
    format_instances_summary, format_params_table, format_series_table, print_instances_summary,
    print_params_table, print_series_table,
};

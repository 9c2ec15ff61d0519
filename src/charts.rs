//! Bar charts for the trip distribution panels.
//!
//! Series come from [`crate::aggregate`]; this module only decides how they
//! look. Each chart is an ECharts option set built with `charming`, and a
//! [`ChartSlot`] holds the single live chart for one panel.

use crate::models::{ChartSeries, ChartView};
use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{
        AxisLabel, AxisLine, AxisPointer, AxisPointerType, AxisType, ItemStyle, LineStyle,
        SplitLine, TextStyle, Tooltip, Trigger,
    },
    series::Bar,
};
use tracing::debug;

/// Value axis is split into this many steps.
const TICKS: u32 = 4;

pub const SERIES_LABEL: &str = "Number of Trips";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipStyle {
    pub background: &'static str,
    pub border: &'static str,
    pub border_width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarStyle {
    pub bar_color: &'static str,
    pub bar_radius: u32,
    pub border_width: u32,
    pub tick_color: &'static str,
    pub grid_color: &'static str,
    pub tooltip: TooltipStyle,
}

const TOOLTIP: TooltipStyle = TooltipStyle {
    background: "#1e293b",
    border: "#475569",
    border_width: 1,
};

pub const HOURLY_STYLE: BarStyle = BarStyle {
    bar_color: "#8b5cf6",
    bar_radius: 8,
    border_width: 0,
    tick_color: "#94a3b8",
    grid_color: "#475569",
    tooltip: TOOLTIP,
};

pub const WEEKDAY_STYLE: BarStyle = BarStyle {
    bar_color: "#3b82f6",
    ..HOURLY_STYLE
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Hourly,
    Weekday,
}

impl ChartKind {
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Hourly => "Trips by hour",
            ChartKind::Weekday => "Trips by weekday",
        }
    }

    pub fn element_id(self) -> &'static str {
        match self {
            ChartKind::Hourly => "hourlyChart",
            ChartKind::Weekday => "weekdayChart",
        }
    }

    pub fn style(self) -> &'static BarStyle {
        match self {
            ChartKind::Hourly => &HOURLY_STYLE,
            ChartKind::Weekday => &WEEKDAY_STYLE,
        }
    }
}

/// A rendered chart instance: the series plus its ECharts options JSON.
#[derive(Debug, Clone)]
pub struct BarChart {
    pub kind: ChartKind,
    pub generation: u64,
    pub series: ChartSeries,
    pub options: String,
}

impl BarChart {
    pub fn render(kind: ChartKind, generation: u64, series: ChartSeries) -> Self {
        let options = bar_chart(&series, kind.style()).to_string();
        Self {
            kind,
            generation,
            series,
            options,
        }
    }

    pub fn view(&self) -> ChartView {
        ChartView {
            generation: self.generation,
            title: self.kind.title().to_string(),
            element_id: self.kind.element_id().to_string(),
            series: self.series.clone(),
            options: self.options.clone(),
        }
    }
}

/// Holds at most one chart for a panel. Replacing destroys the old one first.
#[derive(Debug)]
pub struct ChartSlot {
    kind: ChartKind,
    generation: u64,
    active: Option<BarChart>,
}

impl ChartSlot {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            generation: 0,
            active: None,
        }
    }

    pub fn replace(&mut self, series: ChartSeries) -> &BarChart {
        if let Some(previous) = self.active.take() {
            debug!(
                chart = self.kind.element_id(),
                generation = previous.generation,
                "destroying chart"
            );
        }
        self.generation += 1;
        self.active.insert(BarChart::render(self.kind, self.generation, series))
    }

    #[cfg(test)]
    pub fn active(&self) -> Option<&BarChart> {
        self.active.as_ref()
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        usize::from(self.active.is_some())
    }

    pub fn view(&self) -> Option<ChartView> {
        self.active.as_ref().map(BarChart::view)
    }
}

pub fn bar_chart(series: &ChartSeries, style: &BarStyle) -> Chart {
    let values: Vec<f64> = series.values.iter().map(|count| *count as f64).collect();

    let chart = Chart::new()
        .tooltip(tooltip(style))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(series.labels.clone())
                .axis_line(AxisLine::new().line_style((1.0, style.grid_color)))
                .axis_label(AxisLabel::new().color(style.tick_color)),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .split_number(f64::from(TICKS))
                .axis_label(AxisLabel::new().color(style.tick_color))
                .split_line(SplitLine::new().line_style(LineStyle::new().color(style.grid_color))),
        )
        .series(
            Bar::new()
                .name(SERIES_LABEL)
                .item_style(
                    ItemStyle::new()
                        .color(style.bar_color)
                        .border_radius(f64::from(style.bar_radius))
                        .border_width(f64::from(style.border_width)),
                )
                .data(values),
        );

    if series.is_empty() {
        return chart.title(
            Title::new()
                .text("No data yet")
                .left("center")
                .top("middle")
                .text_style(TextStyle::new().color(style.tick_color)),
        );
    }
    chart
}

fn tooltip(style: &BarStyle) -> Tooltip {
    let tip = &style.tooltip;
    Tooltip::new()
        .trigger(Trigger::Axis)
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
        .background_color(tip.background)
        .border_color(tip.border)
        .border_width(f64::from(tip.border_width))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[u64]) -> ChartSeries {
        ChartSeries {
            labels: (0..values.len()).map(|i| format!("{i}:00")).collect(),
            values: values.to_vec(),
        }
    }

    fn options(chart: &BarChart) -> serde_json::Value {
        serde_json::from_str(&chart.options).unwrap()
    }

    #[test]
    fn replacing_keeps_a_single_instance() {
        let mut slot = ChartSlot::new(ChartKind::Hourly);
        assert_eq!(slot.active_count(), 0);

        slot.replace(series(&[1, 2]));
        slot.replace(series(&[3]));

        assert_eq!(slot.active_count(), 1);
        let active = slot.active().unwrap();
        assert_eq!(active.generation, 2);
        assert_eq!(active.series.values, vec![3]);
    }

    #[test]
    fn empty_series_shows_a_placeholder_title() {
        let chart = BarChart::render(ChartKind::Hourly, 1, ChartSeries::default());
        assert!(chart.options.contains("No data yet"));
    }

    #[test]
    fn bars_carry_the_panel_colour_and_series_name() {
        let chart = BarChart::render(ChartKind::Weekday, 1, series(&[2, 0, 0, 0, 0, 0, 1]));
        let options = options(&chart);

        let bars = &options["series"][0];
        assert_eq!(bars["type"], "bar");
        assert_eq!(bars["name"], SERIES_LABEL);
        assert_eq!(bars["itemStyle"]["color"], "#3b82f6");
        assert_eq!(bars["itemStyle"]["borderRadius"].as_f64(), Some(8.0));
        let data: Vec<f64> = bars["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|value| value.as_f64())
            .collect();
        assert_eq!(data, vec![2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        assert!(!chart.options.contains("No data yet"));
        assert!(chart.options.contains("\"0:00\""));
        assert!(chart.options.contains("#1e293b"));
    }

    #[test]
    fn view_names_the_target_element() {
        let mut slot = ChartSlot::new(ChartKind::Hourly);
        slot.replace(series(&[4]));
        let view = slot.view().unwrap();
        assert_eq!(view.element_id, "hourlyChart");
        assert_eq!(view.title, "Trips by hour");
        assert!(view.options.contains("#8b5cf6"));
    }

    #[test]
    fn weekday_style_only_changes_the_bar_colour() {
        assert_eq!(WEEKDAY_STYLE.grid_color, HOURLY_STYLE.grid_color);
        assert_ne!(WEEKDAY_STYLE.bar_color, HOURLY_STYLE.bar_color);
    }
}

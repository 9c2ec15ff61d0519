use crate::models::{ChartView, DashboardSnapshot, FilterSet, Notice, StatsView, TripRow};
use html_escape::{
    encode_double_quoted_attribute, encode_script, encode_script_double_quoted_text, encode_text,
};
use std::fmt::Write;

const EMPTY_VALUE: &str = "--";

pub fn render_index(snapshot: &DashboardSnapshot) -> String {
    let stats = snapshot.stats.as_ref();
    let trips = &snapshot.trips;
    let charts = [trips.hourly.as_ref(), trips.weekday.as_ref()];

    fill_template(INDEX_HTML, |name| {
        let value = match name {
            "API_BASE" => encode_text(&snapshot.api_base_url).into_owned(),
            "TOTAL_TRIPS" => stat_value(stats, |s| &s.total_trips),
            "AVG_DISTANCE" => stat_value(stats, |s| &s.avg_distance),
            "AVG_SPEED" => stat_value(stats, |s| &s.avg_speed),
            "AVG_DURATION" => stat_value(stats, |s| &s.avg_duration),
            "BUSIEST" => render_busiest(stats),
            "FILTER_INPUTS" => render_filter_inputs(&snapshot.filters),
            "NOTICES" => render_notices(&snapshot.notices),
            "LOADING_CLASS" => hidden_unless(snapshot.loading),
            "TABLE_CLASS" => hidden_unless(!snapshot.loading),
            "TRIP_COUNT" => trips.trip_count.to_string(),
            "TRIP_ROWS" => render_rows(&trips.rows),
            "HOURLY_CHART" => render_chart(trips.hourly.as_ref()),
            "WEEKDAY_CHART" => render_chart(trips.weekday.as_ref()),
            "CHART_SCRIPT" => render_chart_script(&charts),
            _ => return None,
        };
        Some(value)
    })
}

/// Replaces every `{{NAME}}` marker in one pass over the template. Inserted
/// text is never scanned for markers. Unknown markers are left as they are.
fn fill_template(template: &str, value: impl Fn(&str) -> Option<String>) -> String {
    let mut html = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        let (before, marker) = rest.split_at(open);
        html.push_str(before);
        let Some(close) = marker.find("}}") else {
            rest = marker;
            break;
        };
        match value(&marker[2..close]) {
            Some(text) => html.push_str(&text),
            None => html.push_str(&marker[..close + 2]),
        }
        rest = &marker[close + 2..];
    }
    html.push_str(rest);
    html
}

fn hidden_unless(visible: bool) -> String {
    if visible { String::new() } else { "hidden".to_string() }
}

fn stat_value(stats: Option<&StatsView>, field: impl Fn(&StatsView) -> &String) -> String {
    stats
        .map(|s| encode_text(field(s)).into_owned())
        .unwrap_or_else(|| EMPTY_VALUE.to_string())
}

fn render_busiest(stats: Option<&StatsView>) -> String {
    let Some(stats) = stats else {
        return String::new();
    };
    let mut parts = Vec::new();
    if let Some(hour) = &stats.busiest_hour {
        parts.push(format!("Busiest hour: {}", encode_text(hour)));
    }
    if let Some(day) = &stats.busiest_weekday {
        parts.push(format!("Busiest day: {}", encode_text(day)));
    }
    if parts.is_empty() {
        return String::new();
    }
    format!("<p class=\"subtitle\">{}</p>", parts.join(" &middot; "))
}

fn render_filter_inputs(filters: &FilterSet) -> String {
    let mut html = String::new();
    for (name, value) in filters.fields() {
        let kind = if name == "time_of_day" { "text" } else { "number" };
        let step = if name.starts_with("min_") || name.starts_with("max_") {
            " step=\"any\""
        } else {
            ""
        };
        let _ = write!(
            html,
            "<label>{label}<input id=\"{name}\" name=\"{name}\" type=\"{kind}\"{step} value=\"{value}\" /></label>",
            label = field_label(name),
            value = encode_double_quoted_attribute(value.unwrap_or_default()),
        );
    }
    html
}

fn field_label(name: &str) -> &'static str {
    match name {
        "limit" => "Limit",
        "pickup_hour" => "Pickup hour (0-23)",
        "pickup_weekday" => "Weekday (0=Mon, 6=Sun)",
        "time_of_day" => "Time of day",
        "min_speed" => "Min speed (km/h)",
        "max_speed" => "Max speed (km/h)",
        "min_distance" => "Min distance (km)",
        "max_distance" => "Max distance (km)",
        _ => "",
    }
}

fn render_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|notice| {
            format!(
                "<div class=\"alert\" data-alert>{}</div>",
                encode_text(&notice.message)
            )
        })
        .collect()
}

fn render_rows(rows: &[TripRow]) -> String {
    let mut html = String::new();
    for row in rows {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><span class=\"badge\">{}</span></td></tr>",
            encode_text(&row.pickup),
            encode_text(&row.duration),
            encode_text(&row.distance),
            encode_text(&row.speed),
            encode_text(&row.passengers),
            encode_text(&row.time_of_day),
        );
    }
    html
}

fn render_chart(chart: Option<&ChartView>) -> String {
    match chart {
        Some(chart) => format!(
            "<div id=\"{}\" class=\"chart\" role=\"img\" aria-label=\"{}\"></div>",
            encode_double_quoted_attribute(&chart.element_id),
            encode_double_quoted_attribute(&chart.title),
        ),
        None => "<p class=\"hint\">No trips loaded yet.</p>".to_string(),
    }
}

/// One ECharts instance per container. Any instance already bound to the
/// element is disposed before the new one is created.
fn render_chart_script(charts: &[Option<&ChartView>]) -> String {
    let inits: Vec<String> = charts
        .iter()
        .flatten()
        .map(|chart| {
            format!(
                r#"    (function() {{
      const dom = document.getElementById("{id}");
      const previous = echarts.getInstanceByDom(dom);
      if (previous) {{
        previous.dispose();
      }}
      const chart = echarts.init(dom);
      chart.setOption({options});
      window.addEventListener('resize', () => chart.resize());
    }})();"#,
                id = encode_script_double_quoted_text(&chart.element_id),
                options = encode_script(&chart.options),
            )
        })
        .collect();

    if inits.is_empty() {
        return String::new();
    }
    format!(
        "<script>\n  document.addEventListener('DOMContentLoaded', function() {{\n{}\n  }});\n  </script>",
        inits.join("\n")
    )
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Urban Mobility Dashboard</title>
  <script src="https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js"></script>
  <style>
    :root {
      --bg: #0f172a;
      --card: #1e293b;
      --border: #475569;
      --ink: #e2e8f0;
      --muted: #94a3b8;
      --accent: #8b5cf6;
      --accent-2: #3b82f6;
      --danger: #f87171;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1200px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.2rem;
    }

    .subtitle,
    .hint {
      margin: 6px 0 0;
      color: var(--muted);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .card {
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 16px;
      padding: 18px;
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .stat .value {
      display: block;
      margin-top: 8px;
      font-size: 1.7rem;
      font-weight: 600;
    }

    .alert {
      background: rgba(248, 113, 113, 0.12);
      border: 1px solid var(--danger);
      color: var(--danger);
      border-radius: 12px;
      padding: 12px 16px;
    }

    details summary {
      cursor: pointer;
      font-weight: 600;
    }

    .filters {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 12px;
      margin-top: 16px;
    }

    .filters label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    input {
      background: var(--bg);
      color: var(--ink);
      border: 1px solid var(--border);
      border-radius: 8px;
      padding: 8px 10px;
    }

    .actions {
      display: flex;
      gap: 12px;
      margin-top: 16px;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.secondary {
      background: transparent;
      border: 1px solid var(--border);
      color: var(--ink);
    }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(420px, 1fr));
      gap: 16px;
    }

    .chart {
      width: 100%;
      min-height: 260px;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th,
    td {
      text-align: left;
      padding: 10px 12px;
      border-bottom: 1px solid var(--border);
    }

    th {
      color: var(--muted);
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
    }

    .badge {
      background: rgba(139, 92, 246, 0.18);
      color: #c4b5fd;
      border-radius: 999px;
      padding: 2px 10px;
      font-size: 0.85rem;
    }

    .hidden {
      display: none;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Urban Mobility Dashboard</h1>
      <p class="subtitle">Trip data from {{API_BASE}}</p>
      {{BUSIEST}}
    </header>

    {{NOTICES}}

    <section class="panel">
      <div class="card stat">
        <span class="label">Total trips</span>
        <span id="totalTrips" class="value">{{TOTAL_TRIPS}}</span>
      </div>
      <div class="card stat">
        <span class="label">Avg distance</span>
        <span id="avgDistance" class="value">{{AVG_DISTANCE}}</span>
      </div>
      <div class="card stat">
        <span class="label">Avg speed</span>
        <span id="avgSpeed" class="value">{{AVG_SPEED}}</span>
      </div>
      <div class="card stat">
        <span class="label">Avg duration</span>
        <span id="avgDuration" class="value">{{AVG_DURATION}}</span>
      </div>
    </section>

    <details id="filterPanel" class="card">
      <summary>Filters</summary>
      <form method="post" action="/filters">
        <div class="filters">
          {{FILTER_INPUTS}}
        </div>
        <div class="actions">
          <button type="submit">Apply filters</button>
          <button class="secondary" type="submit" formaction="/filters/reset">Reset</button>
        </div>
      </form>
    </details>

    <section class="charts">
      <div class="card">
        <h2>Trips by hour</h2>
        {{HOURLY_CHART}}
      </div>
      <div class="card">
        <h2>Trips by weekday</h2>
        {{WEEKDAY_CHART}}
      </div>
    </section>

    <section class="card">
      <h2>Trips (<span id="tripCount">{{TRIP_COUNT}}</span>)</h2>
      <div id="loadingDiv" class="{{LOADING_CLASS}}">Loading trips...</div>
      <div id="tableDiv" class="{{TABLE_CLASS}}">
        <table>
          <thead>
            <tr>
              <th>Pickup</th>
              <th>Duration</th>
              <th>Distance</th>
              <th>Speed</th>
              <th>Passengers</th>
              <th>Time of day</th>
            </tr>
          </thead>
          <tbody id="tripsTableBody">
            {{TRIP_ROWS}}
          </tbody>
        </table>
      </div>
    </section>
  </main>

  {{CHART_SCRIPT}}
  <script>
    document.querySelectorAll('[data-alert]').forEach((notice) => alert(notice.textContent));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Dashboard;
    use crate::models::{StatsSummary, TripRecord};

    fn loaded() -> Dashboard {
        let mut dashboard = Dashboard::new("http://127.0.0.1:8080");
        dashboard
            .finish_stats_fetch(Ok(StatsSummary {
                total_trips: 1_234,
                avg_trip_distance_km: Some(3.44),
                avg_trip_speed_kmh: Some(14.42),
                avg_trip_duration_sec: Some(959.0),
                most_active_hour: Some(18),
                most_active_weekday: Some(4),
            }))
            .unwrap();
        let ticket = dashboard.begin_trip_fetch();
        let trips = vec![TripRecord {
            pickup_datetime: "2016-03-14 17:24:55".into(),
            trip_duration: Some(455.0),
            pickup_hour: Some(17),
            pickup_weekday: Some(0),
            time_of_day: Some("<Evening>".into()),
            ..TripRecord::default()
        }];
        dashboard.finish_trip_fetch(ticket, Ok(trips)).unwrap();
        dashboard
    }

    #[test]
    fn page_shows_stats_table_and_charts() {
        let html = render_index(&loaded().snapshot());
        assert!(html.contains("<span id=\"totalTrips\" class=\"value\">1,234</span>"));
        assert!(html.contains("16 min"));
        assert!(html.contains("Busiest hour: 18:00"));
        assert!(html.contains("Busiest day: Fri"));
        assert!(html.contains("<span id=\"tripCount\">1</span>"));
        assert!(html.contains("<td>N/A</td>"));
        assert!(html.contains("&lt;Evening&gt;"));
        assert!(html.contains("<div id=\"hourlyChart\" class=\"chart\""));
        assert!(html.contains("<div id=\"weekdayChart\" class=\"chart\""));
        assert!(html.contains("echarts.init(dom)"));
        assert_eq!(html.matches("echarts.getInstanceByDom").count(), 2);
        assert!(!html.contains("{{"));
    }

    #[test]
    fn empty_dashboard_uses_placeholders() {
        let html = render_index(&Dashboard::new("http://api").snapshot());
        assert!(html.contains("<span id=\"avgSpeed\" class=\"value\">--</span>"));
        assert!(html.contains("No trips loaded yet."));
        assert!(!html.contains("echarts.init"));
        assert!(html.contains("id=\"limit\" name=\"limit\" type=\"number\" value=\"100\""));
        assert!(!html.contains("data-alert>"));
    }

    #[test]
    fn loading_hides_the_table() {
        let mut dashboard = Dashboard::new("http://api");
        dashboard.begin_trip_fetch();
        let html = render_index(&dashboard.snapshot());
        assert!(html.contains("<div id=\"loadingDiv\" class=\"\">"));
        assert!(html.contains("<div id=\"tableDiv\" class=\"hidden\">"));
    }

    #[test]
    fn filter_values_are_escaped() {
        let filters = FilterSet {
            time_of_day: Some("\"late\"".into()),
            ..FilterSet::default()
        };
        let html = render_filter_inputs(&filters);
        assert!(html.contains("value=\"&quot;late&quot;\""));
    }

    #[test]
    fn inserted_text_is_not_expanded_again() {
        let mut dashboard = Dashboard::new("http://api");
        dashboard.set_filters(FilterSet {
            time_of_day: Some("{{TRIP_ROWS}}".into()),
            ..FilterSet::defaults()
        });
        let ticket = dashboard.begin_trip_fetch();
        let trips = vec![TripRecord {
            pickup_datetime: "2016-03-14 17:24:55".into(),
            pickup_hour: Some(17),
            time_of_day: Some("{{HOURLY_CHART}}".into()),
            ..TripRecord::default()
        }];
        dashboard.finish_trip_fetch(ticket, Ok(trips)).unwrap();

        let html = render_index(&dashboard.snapshot());
        assert_eq!(html.matches("id=\"hourlyChart\"").count(), 1);
        assert!(html.contains("<span class=\"badge\">{{HOURLY_CHART}}</span>"));
        assert!(html.contains("type=\"text\" value=\"{{TRIP_ROWS}}\" />"));
        assert_eq!(html.matches("<tr><td>").count(), 1);
    }

    #[test]
    fn template_markers_are_filled_once() {
        let html = fill_template("a {{X}} b {{Y}} {{UNKNOWN}} {{open", |name| match name {
            "X" => Some("{{Y}}".to_string()),
            "Y" => Some("y".to_string()),
            _ => None,
        });
        assert_eq!(html, "a {{Y}} b y {{UNKNOWN}} {{open");
    }
}

//! The three revenue charts and the HTML page that hosts them.

use chrono::NaiveDate;

use crate::domain::{App, Partner, UnitType};
use crate::error::AppError;
use crate::plot::figure::{Axis, Config, Figure, Font, Layout, Legend, Title, Trace};
use crate::report::pivot::Pivots;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 400;

/// Headroom above the tallest revenue bar, in dollars.
const REVENUE_HEADROOM: f64 = 500.0;
/// Headroom above the highest impressions point.
const IMPRESSIONS_HEADROOM: f64 = 5_000_000.0;

const TOTAL_HOVER: &str = "Total Revenue: %{y:$,.2f}<extra></extra>";

fn partner_color(partner: Partner) -> &'static str {
    match partner {
        Partner::Fyber => "#2b83ba",
        Partner::FyberVideo => "#abdda4",
        Partner::MoPub => "#fdae61",
    }
}

fn unit_type_color(unit_type: UnitType) -> &'static str {
    match unit_type {
        UnitType::Banner => "#a8e6cf",
        UnitType::Native => "#ffd3b6",
        UnitType::Video => "#ffaaa5",
    }
}

fn app_color(app: App) -> &'static str {
    match app {
        App::Android => "#ff5d5d",
        App::Ios => "#84b9ef",
    }
}

/// Build the three dashboard figures, top to bottom.
pub fn build_figures(pivots: &Pivots) -> Vec<Figure> {
    let revenue_range = [0.0, pivots.max_daily_revenue() + REVENUE_HEADROOM];
    vec![
        revenue_by_partner(pivots, revenue_range),
        revenue_by_unit_type(pivots, revenue_range),
        revenue_by_app(pivots, revenue_range),
    ]
}

fn revenue_by_partner(pivots: &Pivots, revenue_range: [f64; 2]) -> Figure {
    let rows = &pivots.by_partner;
    let x = day_labels(rows.iter().map(|r| r.day));

    let mut data: Vec<Trace> = Partner::ALL
        .into_iter()
        .map(|partner| {
            let y = rows.iter().map(|r| r.revenue(partner)).collect();
            Trace::bar(partner.display_name(), x.clone(), y, partner_color(partner))
        })
        .collect();
    data.push(Trace::hover_only(
        "Total Revenue",
        x.clone(),
        rows.iter().map(|r| r.total_revenue).collect(),
        TOTAL_HOVER,
    ));
    data.push(
        Trace::line(
            "Impressions",
            x,
            rows.iter().map(|r| r.impressions as f64).collect(),
            "navy",
            2.0,
        )
        .on_secondary_axis(),
    );

    let impressions_max = pivots.max_daily_impressions() as f64 + IMPRESSIONS_HEADROOM;
    let mut layout = base_layout("IMVU Mobile Ad Revenue by Date, Impressions", revenue_range);
    layout.yaxis2 = Some(Axis {
        title: Some(axis_title("Impressions")),
        tickformat: Some(",d"),
        range: Some([0.0, impressions_max]),
        showgrid: Some(false),
        overlaying: Some("y"),
        side: Some("right"),
        ..Default::default()
    });

    Figure {
        data,
        layout,
        config: Config::default(),
    }
}

fn revenue_by_unit_type(pivots: &Pivots, revenue_range: [f64; 2]) -> Figure {
    let rows = &pivots.by_unit_type;
    let x = day_labels(rows.iter().map(|r| r.day));

    let mut data: Vec<Trace> = UnitType::ALL
        .into_iter()
        .map(|unit_type| {
            let y = rows.iter().map(|r| r.revenue(unit_type)).collect();
            Trace::bar(unit_type.label(), x.clone(), y, unit_type_color(unit_type))
        })
        .collect();
    data.push(Trace::hover_only(
        "Total Revenue",
        x,
        rows.iter().map(|r| r.total_revenue).collect(),
        TOTAL_HOVER,
    ));

    Figure {
        data,
        layout: base_layout("IMVU Mobile Ad Revenue by Type, Date", revenue_range),
        config: Config::default(),
    }
}

fn revenue_by_app(pivots: &Pivots, revenue_range: [f64; 2]) -> Figure {
    let rows = &pivots.by_app;
    let x = day_labels(rows.iter().map(|r| r.day));

    let mut data: Vec<Trace> = App::ALL
        .into_iter()
        .map(|app| {
            let y = rows.iter().map(|r| r.revenue(app)).collect();
            Trace::bar(app.platform(), x.clone(), y, app_color(app)).with_opacity(0.6)
        })
        .collect();
    data.push(Trace::hover_only(
        "Total Revenue",
        x,
        rows.iter().map(|r| r.total_revenue).collect(),
        TOTAL_HOVER,
    ));

    Figure {
        data,
        layout: base_layout("IMVU Mobile Ad Revenue by App, Date", revenue_range),
        config: Config::default(),
    }
}

fn base_layout(title: &str, revenue_range: [f64; 2]) -> Layout {
    Layout {
        title: Title {
            text: title.to_string(),
            font: gray_arial(Some(18)),
        },
        width: WIDTH,
        height: HEIGHT,
        barmode: "stack",
        hovermode: "x unified",
        dragmode: "zoom",
        xaxis: Axis {
            kind: Some("date"),
            title: Some(axis_title("Date")),
            hoverformat: Some("%Y-%m-%d"),
            showgrid: Some(false),
            ..Default::default()
        },
        yaxis: Axis {
            title: Some(axis_title("Revenue")),
            tickformat: Some("$,.2f"),
            hoverformat: Some("$,.2f"),
            range: Some(revenue_range),
            ..Default::default()
        },
        yaxis2: None,
        legend: Legend::default(),
    }
}

fn axis_title(text: &str) -> Title {
    Title {
        text: text.to_string(),
        font: gray_arial(None),
    }
}

fn gray_arial(size: Option<u32>) -> Font {
    Font {
        family: "Arial",
        color: "gray",
        size,
    }
}

fn day_labels(days: impl Iterator<Item = NaiveDate>) -> Vec<String> {
    days.map(|d| d.format("%Y-%m-%d").to_string()).collect()
}

/// Render the figures into one self-contained HTML page, stacked vertically.
///
/// plotly.js itself is loaded from the CDN.
pub fn render_html(title: &str, figures: &[Figure]) -> Result<String, AppError> {
    let mut divs = String::new();
    let mut scripts = String::new();

    for (idx, figure) in figures.iter().enumerate() {
        let id = format!("chart-{}", idx + 1);
        let json = serde_json::to_string(figure)
            .map_err(|e| AppError::Output(format!("failed to serialize chart {}: {e}", idx + 1)))?;
        divs.push_str(&format!("    <div id=\"{id}\" class=\"chart\"></div>\n"));
        scripts.push_str(&format!(
            "    (function () {{\n      var fig = {};\n      Plotly.newPlot(\"{id}\", fig.data, fig.layout, fig.config);\n    }})();\n",
            escape_script(&json)
        ));
    }

    Ok(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         \x20 <meta charset=\"utf-8\">\n\
         \x20 <title>{title}</title>\n\
         \x20 <script src=\"{PLOTLY_CDN}\"></script>\n\
         \x20 <style>body {{ font-family: Arial, sans-serif; }} .chart {{ margin: 0 auto 24px; width: {WIDTH}px; }}</style>\n\
         </head>\n\
         <body>\n\
         {divs}\
         \x20 <script>\n\
         {scripts}\
         \x20 </script>\n\
         </body>\n\
         </html>\n",
        title = escape_html(title),
    ))
}

/// Keep embedded JSON from closing the surrounding `<script>` element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

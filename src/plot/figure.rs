//! Typed plotly.js figure model.
//!
//! Only the attributes the dashboard uses are modelled. Everything serializes
//! to the JSON shape `Plotly.newPlot(div, data, layout, config)` expects;
//! unset options are omitted so plotly.js falls back to its own defaults.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub config: Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Bar,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    /// Axis id for traces on a secondary axis (`"y2"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    pub hovertemplate: String,
}

impl Trace {
    pub fn bar(name: impl Into<String>, x: Vec<String>, y: Vec<f64>, color: &str) -> Self {
        Self {
            kind: TraceKind::Bar,
            name: name.into(),
            x,
            y,
            mode: None,
            marker: Some(Marker {
                color: color.to_string(),
                opacity: None,
            }),
            line: None,
            yaxis: None,
            showlegend: None,
            hovertemplate: "%{fullData.name}: %{y:$,.2f}<extra></extra>".to_string(),
        }
    }

    pub fn line(name: impl Into<String>, x: Vec<String>, y: Vec<f64>, color: &str, width: f64) -> Self {
        Self {
            kind: TraceKind::Scatter,
            name: name.into(),
            x,
            y,
            mode: Some("lines"),
            marker: None,
            line: Some(Line {
                color: color.to_string(),
                width,
            }),
            yaxis: None,
            showlegend: None,
            hovertemplate: "%{fullData.name}: %{y:,}<extra></extra>".to_string(),
        }
    }

    /// Invisible markers that only contribute a hover line.
    pub fn hover_only(name: impl Into<String>, x: Vec<String>, y: Vec<f64>, hovertemplate: &str) -> Self {
        Self {
            kind: TraceKind::Scatter,
            name: name.into(),
            x,
            y,
            mode: Some("markers"),
            marker: Some(Marker {
                color: "rgba(0,0,0,0)".to_string(),
                opacity: Some(0.0),
            }),
            line: None,
            yaxis: None,
            showlegend: Some(false),
            hovertemplate: hovertemplate.to_string(),
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        if let Some(marker) = self.marker.as_mut() {
            marker.opacity = Some(opacity);
        }
        self
    }

    pub fn on_secondary_axis(mut self) -> Self {
        self.yaxis = Some("y2");
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub family: &'static str,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub width: u32,
    pub height: u32,
    pub barmode: &'static str,
    pub hovermode: &'static str,
    pub dragmode: &'static str,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<Axis>,
    pub legend: Legend,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverformat: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub orientation: &'static str,
    pub x: f64,
    pub xanchor: &'static str,
    pub y: f64,
    pub yanchor: &'static str,
    pub itemclick: &'static str,
}

impl Default for Legend {
    /// Horizontal, centered above the plot area; clicking hides a series.
    fn default() -> Self {
        Self {
            orientation: "h",
            x: 0.5,
            xanchor: "center",
            y: 1.02,
            yanchor: "bottom",
            itemclick: "toggle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub displaylogo: bool,
    #[serde(rename = "scrollZoom")]
    pub scroll_zoom: bool,
    pub responsive: bool,
    #[serde(rename = "modeBarButtonsToRemove")]
    pub mode_bar_buttons_to_remove: Vec<&'static str>,
}

impl Default for Config {
    /// Pan, box zoom, zoom in/out, wheel zoom, reset and PNG export; no plotly logo.
    fn default() -> Self {
        Self {
            displaylogo: false,
            scroll_zoom: true,
            responsive: false,
            mode_bar_buttons_to_remove: vec!["select2d", "lasso2d", "autoScale2d"],
        }
    }
}

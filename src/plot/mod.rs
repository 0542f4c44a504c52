//! Interactive dashboard charts.
//!
//! - `figure`: serde model of a plotly.js figure
//! - `dashboard`: the three revenue views and the HTML page hosting them

pub mod dashboard;
pub mod figure;

pub use dashboard::{build_figures, render_html};

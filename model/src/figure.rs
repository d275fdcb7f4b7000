use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{SegmentCategory, SegmentKey, Trace, TraceKind};

/// Where the map starts out and how it looks
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapLayout {
    pub style: String,
    pub center_lon: f64,
    pub center_lat: f64,
    pub zoom: f64,
    pub height: usize,
}

impl Default for MapLayout {
    fn default() -> Self {
        // Centered on Ingolstadt
        Self {
            style: "carto-positron".to_string(),
            center_lon: 11.441815,
            center_lat: 48.772619,
            zoom: 13.5,
            height: 1200,
        }
    }
}

#[derive(Debug)]
pub struct MapFigure {
    pub traces: Vec<Trace>,
    pub layout: MapLayout,
}

impl MapFigure {
    pub fn new(traces: Vec<Trace>, layout: MapLayout) -> Self {
        Self { traces, layout }
    }

    /// A plotly figure with one scattermapbox trace per trace
    pub fn to_plotly(&self) -> Value {
        let data: Vec<Value> = self.traces.iter().map(scattermapbox).collect();
        json!({
            "data": data,
            "layout": {
                "height": self.layout.height,
                "margin": {"l": 0, "t": 0, "b": 0, "r": 0},
                "legend": {
                    "orientation": "h",
                    "yanchor": "bottom",
                    "y": 1.02,
                    "xanchor": "right",
                    "x": 1,
                },
                "showlegend": false,
                "mapbox": {
                    "style": self.layout.style,
                    "center": {"lon": self.layout.center_lon, "lat": self.layout.center_lat},
                    "zoom": self.layout.zoom,
                },
            },
        })
    }
}

fn scattermapbox(trace: &Trace) -> Value {
    let lon: Vec<f64> = trace.points.iter().map(|pt| pt.x).collect();
    let lat: Vec<f64> = trace.points.iter().map(|pt| pt.y).collect();
    let mut obj = json!({
        "type": "scattermapbox",
        "name": trace.name,
        "lon": lon,
        "lat": lat,
    });

    match trace.kind {
        TraceKind::Line => {
            obj["mode"] = json!("lines");
            obj["line"] = json!({"width": trace.size, "color": trace.color});
        }
        TraceKind::Marker => {
            obj["mode"] = json!("markers");
            obj["marker"] = json!({"size": trace.size, "color": trace.color, "symbol": "circle"});
        }
        TraceKind::Text => {
            obj["mode"] = json!("text");
            obj["text"] = json!([trace.label.clone().unwrap_or_default()]);
            obj["textfont"] = json!({"size": trace.size, "color": "black"});
            obj["showlegend"] = json!(false);
        }
    }
    if let Some(ref hover) = trace.hover_text {
        obj["text"] = json!(hover);
        obj["hoverinfo"] = json!("text");
    }
    obj
}

/// Horizontal bars with the average duration of every segment
pub fn segment_duration_chart(per_segment: &[(SegmentKey, f64)]) -> Value {
    bar_chart(
        "Average Duration By Segment",
        per_segment
            .iter()
            .map(|(key, duration)| (key.to_string(), *duration))
            .collect(),
        1500,
        2000,
    )
}

pub fn category_duration_chart(per_category: &[(SegmentCategory, f64)]) -> Value {
    bar_chart(
        "Average Duration By Segment Type",
        per_category
            .iter()
            .map(|(category, duration)| (category.describe().to_string(), *duration))
            .collect(),
        300,
        1500,
    )
}

pub fn category_duration_pie(per_category: &[(SegmentCategory, f64)]) -> Value {
    let labels: Vec<&str> = per_category.iter().map(|(c, _)| c.describe()).collect();
    let values: Vec<f64> = per_category.iter().map(|(_, d)| *d).collect();
    json!({
        "data": [{"type": "pie", "labels": labels, "values": values}],
        "layout": {"title": "Average Duration By Segment Type"},
    })
}

fn bar_chart(title: &str, rows: Vec<(String, f64)>, height: usize, width: usize) -> Value {
    let text: Vec<String> = rows
        .iter()
        .map(|(label, duration)| format!("{label}<br>{duration} seconds"))
        .collect();
    let (labels, durations): (Vec<String>, Vec<f64>) = rows.into_iter().unzip();
    json!({
        "data": [{
            "type": "bar",
            "orientation": "h",
            "x": durations,
            "y": labels,
            "marker": {"color": "skyblue"},
            "text": text,
            "textposition": "auto",
        }],
        "layout": {
            "title": title,
            "xaxis": {"title": "Average Duration (seconds)"},
            "yaxis": {"title": "Segment", "tickmode": "array", "dtick": 1},
            "height": height,
            "width": width,
        },
    })
}

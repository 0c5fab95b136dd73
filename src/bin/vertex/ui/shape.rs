//! Vertex editor view: one period of the shape with the vertices marked

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use vertex_synth::dsp::{interpolate::lerp, InterpolationMode, VertexSet};

/// Points plotted per segment
const SEGMENT_RESOLUTION: usize = 24;

/// Trace one period, including the segment that wraps from the last vertex
/// around to the first. The trace starts one segment early (shifted back a
/// period) so the curve is continuous across phase 0.
fn trace(vertices: &VertexSet, mode: InterpolationMode) -> Vec<(f64, f64)> {
    let slice = vertices.as_slice();
    let (Some(first), Some(last)) = (slice.first(), slice.last()) else {
        return Vec::new();
    };

    let mut anchors: Vec<(f32, f32)> = Vec::with_capacity(slice.len() + 2);
    anchors.push((last.phase() - 1.0, last.amplitude()));
    anchors.extend(slice.iter().map(|v| (v.phase(), v.amplitude())));
    anchors.push((first.phase() + 1.0, first.amplitude()));

    let mut points = Vec::with_capacity(anchors.len() * SEGMENT_RESOLUTION);
    for pair in anchors.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        for step in 0..SEGMENT_RESOLUTION {
            let q = step as f32 / SEGMENT_RESOLUTION as f32;
            let x = lerp(x0, x1, q);
            let y = lerp(y0, y1, mode.shape(q));
            points.push((x as f64, y as f64));
        }
    }

    points
        .into_iter()
        .filter(|(x, _)| (0.0..=1.0).contains(x))
        .collect()
}

pub fn render_shape(
    frame: &mut Frame,
    area: Rect,
    vertices: &VertexSet,
    selected: usize,
    mode: InterpolationMode,
) {
    let title = format!(" Shape ({} vertices, {}) ", vertices.len(), mode.name());
    let block = Block::default().title(title).borders(Borders::ALL);

    let curve = trace(vertices, mode);
    let markers: Vec<(f64, f64)> = vertices
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != selected)
        .map(|(_, v)| (v.phase() as f64, v.amplitude() as f64))
        .collect();
    let current: Vec<(f64, f64)> = vertices
        .get(selected)
        .map(|v| vec![(v.phase() as f64, v.amplitude() as f64)])
        .unwrap_or_default();

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&curve),
        Dataset::default()
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::White))
            .data(&markers),
        Dataset::default()
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Yellow))
            .data(&current),
    ];

    let zero_line_color = if vertices.has_zero_crossing() {
        Color::DarkGray
    } else {
        Color::Red
    };

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .labels(["0", "phase", "1"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .labels(["-1", "0", "+1"])
                .style(Style::default().fg(zero_line_color)),
        );

    frame.render_widget(chart, area);
}

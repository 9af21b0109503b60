use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::{ReceiverColors, ScoreGradient};
use crate::data::model::ScoredCombination;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Bar chart: diff score per sender, stacked by receiver
// ---------------------------------------------------------------------------

/// Sender categories (first-appearance order) and, per receiver, one value
/// per sender slot. Missing pairs and undefined scores contribute 0.
pub fn bar_layout(matches: &[ScoredCombination]) -> (Vec<String>, Vec<(String, Vec<f64>)>) {
    let mut senders: Vec<String> = Vec::new();
    for m in matches {
        if !senders.contains(&m.record.sender) {
            senders.push(m.record.sender.clone());
        }
    }

    let mut series: Vec<(String, Vec<f64>)> = Vec::new();
    for m in matches {
        let slot = senders
            .iter()
            .position(|s| *s == m.record.sender)
            .unwrap_or_default();
        let idx = match series.iter().position(|(r, _)| *r == m.record.receiver) {
            Some(i) => i,
            None => {
                series.push((m.record.receiver.clone(), vec![0.0; senders.len()]));
                series.len() - 1
            }
        };
        series[idx].1[slot] += m.diff_score.unwrap_or(0.0);
    }
    series.sort_by(|a, b| a.0.cmp(&b.0));
    (senders, series)
}

/// Render the bar chart of the current top matches.
pub fn score_bar_chart(ui: &mut Ui, state: &AppState, height: f32) {
    let (senders, series) = bar_layout(&state.matches);
    let colors = ReceiverColors::new(&state.matches);

    let mut charts: Vec<BarChart> = Vec::with_capacity(series.len());
    for (receiver, values) in series {
        let bars: Vec<Bar> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Bar::new(i as f64, v).width(0.6).name(format!("{} / {receiver}", senders[i])))
            .collect();
        let others: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(&receiver)
            .color(colors.color_for(&receiver))
            .stack_on(&others);
        charts.push(chart);
    }

    let labels = senders.clone();
    Plot::new("score_bar_chart")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Sender")
        .y_axis_label("Diff Score")
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// 3D projection: (GFP, mCherry, trigger time) → screen plane
// ---------------------------------------------------------------------------

/// Orthographic view of the unit cube. `p` is in `[0, 1]^3` with
/// x = GFP, y = mCherry, z = trigger time (up). Angles in degrees.
pub fn project(p: [f64; 3], yaw_deg: f32, pitch_deg: f32) -> [f64; 2] {
    let (yaw, pitch) = ((yaw_deg as f64).to_radians(), (pitch_deg as f64).to_radians());
    let [x, y, z] = [p[0] - 0.5, p[1] - 0.5, p[2] - 0.5];

    let xr = x * yaw.cos() - y * yaw.sin();
    let depth = x * yaw.sin() + y * yaw.cos();

    [xr, z * pitch.cos() + depth * pitch.sin()]
}

/// Scale `v` from `[lo, hi]` to `[0, 1]` (unclamped).
fn unit(v: f64, [lo, hi]: [f64; 2]) -> f64 {
    (v - lo) / (hi - lo)
}

const CUBE_EDGES: [([f64; 3], [f64; 3]); 12] = [
    ([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 1.0, 0.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 1.0]),
    ([0.0, 1.0, 1.0], [1.0, 1.0, 1.0]),
    ([0.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([1.0, 0.0, 0.0], [1.0, 1.0, 0.0]),
    ([0.0, 0.0, 1.0], [0.0, 1.0, 1.0]),
    ([1.0, 0.0, 1.0], [1.0, 1.0, 1.0]),
    ([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([1.0, 0.0, 0.0], [1.0, 0.0, 1.0]),
    ([0.0, 1.0, 0.0], [0.0, 1.0, 1.0]),
    ([1.0, 1.0, 0.0], [1.0, 1.0, 1.0]),
];

/// Render the rotatable 3D expression profile of the top matches.
pub fn expression_projection(ui: &mut Ui, state: &mut AppState, height: f32) {
    ui.horizontal(|ui: &mut Ui| {
        ui.add(eframe::egui::Slider::new(&mut state.yaw, -180.0..=180.0).text("Yaw"));
        ui.add(eframe::egui::Slider::new(&mut state.pitch, -90.0..=90.0).text("Pitch"));
    });

    let gradient = ScoreGradient::new(&state.matches);
    if let Some((lo, hi)) = gradient.range() {
        ui.label(
            RichText::new(format!("colour: diff score {lo:.3} (blue) → {hi:.3} (red)"))
                .small()
                .weak(),
        );
    }

    let (yaw, pitch) = (state.yaw, state.pitch);
    let ranges = [
        state.settings.gfp_range,
        state.settings.mcherry_range,
        state.settings.trigger_range,
    ];
    let matches = &state.matches;

    Plot::new("expression_projection")
        .height(height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (a, b) in CUBE_EDGES {
                let pts: PlotPoints = vec![project(a, yaw, pitch), project(b, yaw, pitch)].into();
                plot_ui.line(Line::new(pts).color(Color32::DARK_GRAY).width(1.0));
            }
            for (corner, label) in [
                ([1.05, 0.0, 0.0], "GFP"),
                ([0.0, 1.05, 0.0], "mCherry"),
                ([0.0, 0.0, 1.05], "TriggerTime_min"),
            ] {
                let [x, y] = project(corner, yaw, pitch);
                plot_ui.text(Text::new(PlotPoint::new(x, y), label));
            }

            for m in matches {
                // records without a trigger time have no z coordinate
                let Some(t) = m.record.trigger_minutes else {
                    continue;
                };
                let p = [
                    unit(m.record.gfp, ranges[0]),
                    unit(m.record.mcherry, ranges[1]),
                    unit(t, ranges[2]),
                ];
                let name = format!("{} / {}", m.record.sender, m.record.receiver);
                plot_ui.points(
                    Points::new(vec![project(p, yaw, pitch)])
                        .color(gradient.color_for(m.diff_score))
                        .radius(5.0)
                        .name(name),
                );
            }
        });
}

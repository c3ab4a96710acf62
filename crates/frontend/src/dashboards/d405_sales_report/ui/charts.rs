use contracts::dashboards::d405_sales_report::{ChartKind, ChartPoint, ChartSpec};
use leptos::prelude::*;

use crate::shared::number_format::{format_compact, format_money};

const PALETTE: [&str; 8] = [
    "#2563eb", "#16a34a", "#f59e0b", "#dc2626", "#7c3aed", "#0891b2", "#db2777", "#65a30d",
];

const CENTER: f64 = 50.0;
const RADIUS: f64 = 45.0;
const DONUT_HOLE: f64 = 26.0;

fn color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub share: f64,
    /// SVG path on a 100x100 view box
    pub path: String,
}

fn polar(angle: f64) -> (f64, f64) {
    (CENTER + RADIUS * angle.sin(), CENTER - RADIUS * angle.cos())
}

/// Slices clockwise from 12 o'clock. Negative values count as zero; an all-zero
/// series has no slices.
pub fn pie_slices(points: &[ChartPoint]) -> Vec<PieSlice> {
    let total: f64 = points.iter().map(|p| p.value.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = 0.0_f64;
    points
        .iter()
        .filter(|p| p.value > 0.0)
        .map(|p| {
            let share = p.value / total;
            let sweep = share * std::f64::consts::TAU;
            let path = if share >= 0.9999 {
                // Full circle as two half arcs
                format!(
                    "M {c} {top} A {r} {r} 0 1 1 {c} {bottom} A {r} {r} 0 1 1 {c} {top} Z",
                    c = CENTER,
                    r = RADIUS,
                    top = CENTER - RADIUS,
                    bottom = CENTER + RADIUS
                )
            } else {
                let (x1, y1) = polar(start);
                let (x2, y2) = polar(start + sweep);
                let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
                format!(
                    "M {c} {c} L {x1:.3} {y1:.3} A {r} {r} 0 {large} 1 {x2:.3} {y2:.3} Z",
                    c = CENTER,
                    r = RADIUS
                )
            };
            start += sweep;
            PieSlice {
                label: p.label.clone(),
                value: p.value,
                share,
                path,
            }
        })
        .collect()
}

/// Bar heights in percent of the largest value.
pub fn column_heights(points: &[ChartPoint]) -> Vec<f64> {
    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    points
        .iter()
        .map(|p| {
            if max > 0.0 {
                (p.value.max(0.0) / max * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            }
        })
        .collect()
}

/// Line and filled-area paths for a trend on a 100x100 view box.
pub fn trend_paths(points: &[ChartPoint]) -> Option<(String, String)> {
    if points.is_empty() {
        return None;
    }
    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    let step = if points.len() > 1 {
        100.0 / (points.len() - 1) as f64
    } else {
        0.0
    };
    let coords: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let y = if max > 0.0 {
                100.0 - p.value.max(0.0) / max * 90.0
            } else {
                100.0
            };
            (i as f64 * step, y)
        })
        .collect();
    let line: Vec<String> = coords.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).collect();
    let line = line.join(" ");
    let last_x = coords.last().map(|(x, _)| *x).unwrap_or(0.0);
    let area = format!("M 0,100 L {} L {:.2},100 Z", line.replace(' ', " L "), last_x);
    Some((line, area))
}

#[component]
fn EmptyChart() -> impl IntoView {
    view! { <div class="chart__empty">"No data"</div> }
}

#[component]
fn PieChart(points: Vec<ChartPoint>, donut: bool) -> impl IntoView {
    let slices = pie_slices(&points);
    if slices.is_empty() {
        return view! { <EmptyChart/> }.into_any();
    }
    let legend = slices
        .iter()
        .enumerate()
        .map(|(i, s)| {
            view! {
                <li class="chart__legend-item">
                    <span class="chart__swatch" style=format!("background: {}", color(i))></span>
                    <span class="chart__legend-label">{s.label.clone()}</span>
                    <span class="chart__legend-value">
                        {format!("{} ({:.1}%)", format_money(s.value), s.share * 100.0)}
                    </span>
                </li>
            }
        })
        .collect_view();
    let paths = slices
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            view! {
                <path d=s.path fill=color(i)>
                    <title>{s.label}</title>
                </path>
            }
        })
        .collect_view();

    view! {
        <div class="chart chart--pie">
            <svg viewBox="0 0 100 100" class="chart__svg">
                {paths}
                {donut.then(|| view! { <circle cx="50" cy="50" r=DONUT_HOLE fill="var(--color-surface, #fff)"/> })}
            </svg>
            <ul class="chart__legend">{legend}</ul>
        </div>
    }
    .into_any()
}

#[component]
fn ColumnChart(points: Vec<ChartPoint>) -> impl IntoView {
    if points.is_empty() {
        return view! { <EmptyChart/> }.into_any();
    }
    let heights = column_heights(&points);
    let bars = points
        .into_iter()
        .zip(heights)
        .enumerate()
        .map(|(i, (p, height))| {
            view! {
                <div class="chart__column" title=format!("{}: {}", p.label, format_money(p.value))>
                    <span class="chart__column-value">{format_compact(p.value)}</span>
                    <div
                        class="chart__bar chart__bar--3d"
                        style=format!("height: {:.1}%; background: {}", height, color(i))
                    ></div>
                    <span class="chart__column-label">{p.label.clone()}</span>
                </div>
            }
        })
        .collect_view();
    view! { <div class="chart chart--columns">{bars}</div> }.into_any()
}

#[component]
fn TrendChart(points: Vec<ChartPoint>) -> impl IntoView {
    let Some((line, area)) = trend_paths(&points) else {
        return view! { <EmptyChart/> }.into_any();
    };
    let first = points.first().map(|p| p.label.clone()).unwrap_or_default();
    let last = points.last().map(|p| p.label.clone()).unwrap_or_default();
    view! {
        <div class="chart chart--trend">
            <svg viewBox="0 0 100 100" preserveAspectRatio="none" class="chart__svg chart__svg--wide">
                <path d=area fill=color(0) fill-opacity="0.2"/>
                <polyline points=line fill="none" stroke=color(0) stroke-width="1.2"/>
            </svg>
            <div class="chart__axis">
                <span>{first}</span>
                <span>{last}</span>
            </div>
        </div>
    }
    .into_any()
}

/// One chart of a level layout
#[component]
pub fn ChartCard(spec: ChartSpec, points: Vec<ChartPoint>) -> impl IntoView {
    let body = match spec.kind {
        ChartKind::Pie => view! { <PieChart points=points donut=false/> }.into_any(),
        ChartKind::Donut => view! { <PieChart points=points donut=true/> }.into_any(),
        ChartKind::Column3d => view! { <ColumnChart points=points/> }.into_any(),
        ChartKind::TrendArea => view! { <TrendChart points=points/> }.into_any(),
    };
    view! {
        <div class="chart-card" data-chart=spec.key>
            <div class="chart-card__title">{spec.title}</div>
            {body}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[f64]) -> Vec<ChartPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ChartPoint {
                label: format!("p{i}"),
                value: *v,
            })
            .collect()
    }

    #[test]
    fn test_pie_shares() {
        let slices = pie_slices(&points(&[30.0, 10.0, -5.0, 0.0, 60.0]));
        assert_eq!(slices.len(), 3);
        let total: f64 = slices.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((slices[2].share - 0.6).abs() < 1e-9);
        assert!(pie_slices(&points(&[0.0, -1.0])).is_empty());
    }

    #[test]
    fn test_single_slice_is_full_circle() {
        let slices = pie_slices(&points(&[5.0]));
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].path.matches(" A ").count(), 2);
    }

    #[test]
    fn test_column_heights() {
        assert_eq!(column_heights(&points(&[50.0, 100.0, -3.0])), vec![50.0, 100.0, 0.0]);
        assert_eq!(column_heights(&points(&[0.0, 0.0])), vec![0.0, 0.0]);
    }

    #[test]
    fn test_trend_paths() {
        assert!(trend_paths(&[]).is_none());
        let (line, area) = trend_paths(&points(&[0.0, 10.0])).unwrap();
        assert_eq!(line, "0.00,100.00 100.00,10.00");
        assert!(area.starts_with("M 0,100 L 0.00,100.00 L 100.00,10.00"));
        assert!(area.ends_with("L 100.00,100 Z"));
    }
}

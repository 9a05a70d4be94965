//! Standalone SVG line charts.

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 320.0;
const PADDING: f64 = 48.0;

/// Labels for a single-series line chart.
pub struct LineChart<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

/// Render `points` as an SVG polyline, scaled to fill the plot area.
///
/// Points are drawn in the order given; callers sort them by `x` first.
/// Returns an empty string when there is nothing to plot.
pub fn render_line_chart(chart: &LineChart, points: &[(f64, f64)]) -> String {
    let points: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if points.is_empty() {
        return String::new();
    }

    let (min_x, max_x) = bounds(points.iter().map(|p| p.0));
    let (min_y, max_y) = bounds(points.iter().map(|p| p.1));

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let scale_x = if max_x > min_x {
        plot_width / (max_x - min_x)
    } else {
        0.0
    };
    let scale_y = if max_y > min_y {
        plot_height / (max_y - min_y)
    } else {
        0.0
    };

    let polyline = points
        .iter()
        .map(|(x, y)| {
            let px = PADDING + (x - min_x) * scale_x;
            let py = HEIGHT - PADDING - (y - min_y) * scale_y;
            format!("{:.1},{:.1}", px, py)
        })
        .collect::<Vec<_>>()
        .join(" ");

    let bottom = HEIGHT - PADDING;
    let right = WIDTH - PADDING;

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">
<rect width="100%" height="100%" fill="#121212"/>
<text x="{cx:.0}" y="24" fill="#17A2B8" font-family="Arial, sans-serif" font-size="16" text-anchor="middle">{title}</text>
<line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{bottom:.0}" stroke="#888888"/>
<line x1="{p:.0}" y1="{bottom:.0}" x2="{right:.0}" y2="{bottom:.0}" stroke="#888888"/>
<text x="{p:.0}" y="{below:.0}" fill="#CCCCCC" font-family="Arial, sans-serif" font-size="10">{min_x:.2}</text>
<text x="{right:.0}" y="{below:.0}" fill="#CCCCCC" font-family="Arial, sans-serif" font-size="10" text-anchor="end">{max_x:.2}</text>
<text x="4" y="{bottom:.0}" fill="#CCCCCC" font-family="Arial, sans-serif" font-size="10">{min_y:.4}</text>
<text x="4" y="{top:.0}" fill="#CCCCCC" font-family="Arial, sans-serif" font-size="10">{max_y:.4}</text>
<text x="{cx:.0}" y="{xl:.0}" fill="#FFFFFF" font-family="Arial, sans-serif" font-size="12" text-anchor="middle">{x_label}</text>
<text x="12" y="{cy:.0}" fill="#FFFFFF" font-family="Arial, sans-serif" font-size="12" transform="rotate(-90 12 {cy:.0})" text-anchor="middle">{y_label}</text>
<polyline fill="none" stroke="#0066CC" stroke-width="2" points="{polyline}"/>
</svg>
"##,
        w = WIDTH,
        h = HEIGHT,
        p = PADDING,
        cx = WIDTH / 2.0,
        cy = HEIGHT / 2.0,
        bottom = bottom,
        right = right,
        below = bottom + 14.0,
        top = PADDING + 4.0,
        xl = HEIGHT - 8.0,
        title = escape(chart.title),
        x_label = escape(chart.x_label),
        y_label = escape(chart.y_label),
        min_x = min_x,
        max_x = max_x,
        min_y = min_y,
        max_y = max_y,
        polyline = polyline,
    )
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

use super::ui;
use crate::core::{ChartView, ComparisonRate, ConversionController, HistoryPoint};
use chrono::NaiveDate;
use console::{Color, style};

const BAR_WIDTH: usize = 40;
const TREND_HEIGHT: usize = 8;
const TREND_COLUMN: usize = 5;

const PALETTE: [Color; 6] = [
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Red,
];

/// Renders whichever chart the controller's view selects.
pub fn render_chart(controller: &ConversionController) -> String {
    let state = controller.state();
    match state.view {
        ChartView::Comparison => render_comparison_chart(&state.comparison, &state.from),
        ChartView::Trend => render_trend_chart(&state.history, &state.from, &state.to),
    }
}

/// Horizontal bars of `1 base = rate code`, scaled to the largest rate.
pub fn render_comparison_chart(data: &[ComparisonRate], base: &str) -> String {
    let title = format!(
        "{} {}",
        ui::style_text("Comparison", ui::StyleType::Title),
        ui::style_text(&format!("1 {base} ="), ui::StyleType::Subtle)
    );
    if data.is_empty() {
        return format!(
            "{title}\n{}",
            ui::style_text("No comparison data found", ui::StyleType::Subtle)
        );
    }

    let max = data.iter().map(|d| d.rate).fold(0.0_f64, f64::max);
    let mut lines = vec![title];
    for (i, item) in data.iter().enumerate() {
        let len = if max > 0.0 {
            ((item.rate / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar = "█".repeat(len.max(1));
        lines.push(format!(
            "{:<4} {} {}",
            item.code,
            style(format!("{:<width$}", bar, width = BAR_WIDTH)).fg(PALETTE[i % PALETTE.len()]),
            ui::format_grouped(item.rate, 0, 4)
        ));
    }
    lines.push(ui::style_text(
        &format!("scale 0 .. {}", ui::compact_number(max)),
        ui::StyleType::Subtle,
    ));
    lines.join("\n")
}

fn weekday_label(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%a").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// Column heights in `1..=TREND_HEIGHT`; absent rates stay `None`.
fn trend_levels(points: &[HistoryPoint], low: f64, high: f64) -> Vec<Option<usize>> {
    points
        .iter()
        .map(|p| {
            p.rate.map(|rate| {
                if high > low {
                    1 + (((rate - low) / (high - low)) * (TREND_HEIGHT - 1) as f64).round() as usize
                } else {
                    TREND_HEIGHT / 2
                }
            })
        })
        .collect()
}

/// Filled area of the series with weekday labels; gaps mark dates without a quote.
pub fn render_trend_chart(points: &[HistoryPoint], from: &str, to: &str) -> String {
    let title = format!(
        "{} {}",
        ui::style_text("Historical Trend", ui::StyleType::Title),
        ui::style_text(&format!("{from}/{to}"), ui::StyleType::Subtle)
    );

    let rates: Vec<f64> = points.iter().filter_map(|p| p.rate).collect();
    if rates.is_empty() {
        return format!(
            "{title}\n{}",
            ui::style_text("No history data found", ui::StyleType::Subtle)
        );
    }

    let low = rates.iter().copied().fold(f64::INFINITY, f64::min);
    let high = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let levels = trend_levels(points, low, high);

    let mut lines = vec![title];
    for row in (1..=TREND_HEIGHT).rev() {
        let line: String = levels
            .iter()
            .map(|level| match level {
                Some(l) if *l >= row => {
                    style(format!("{:^width$}", "███", width = TREND_COLUMN))
                        .cyan()
                        .to_string()
                }
                None if row == 1 => format!("{:^width$}", "·", width = TREND_COLUMN),
                _ => " ".repeat(TREND_COLUMN),
            })
            .collect();
        lines.push(line.trim_end().to_string());
    }
    lines.push("─".repeat(TREND_COLUMN * points.len()));
    lines.push(
        points
            .iter()
            .map(|p| format!("{:^width$}", weekday_label(&p.date), width = TREND_COLUMN))
            .collect::<String>()
            .trim_end()
            .to_string(),
    );

    let latest = rates.last().copied().unwrap_or_default();
    lines.push(ui::style_text(
        &format!(
            "Rate: 1 {from} = {} {to} · low {} · high {}",
            ui::format_grouped(latest, 0, 4),
            ui::format_grouped(low, 0, 4),
            ui::format_grouped(high, 0, 4)
        ),
        ui::StyleType::Subtle,
    ));
    lines.join("\n")
}

use super::ui;
use crate::core::catalog;
use crate::core::{DashboardPairRate, DashboardState, RateProvider};
use anyhow::Result;
use comfy_table::Cell;

const SKELETON_ROWS: usize = 8;

fn title() -> String {
    format!(
        "{}\n{}",
        ui::style_text("Market Overview", ui::StyleType::Title),
        ui::style_text(
            "Latest spot rates of global currency pairs",
            ui::StyleType::Subtle
        )
    )
}

fn pair_row(item: &DashboardPairRate) -> Vec<Cell> {
    vec![
        Cell::new(format!(
            "{} {}",
            catalog::flag(&item.from),
            catalog::flag(&item.to)
        )),
        Cell::new(format!("{} / {}", item.from, item.to)),
        ui::rate_cell(item.rate, 4),
        Cell::new(ui::style_text(
            &format!("1 {} = {:.4} {}", item.from, item.rate, item.to),
            ui::StyleType::Subtle,
        )),
    ]
}

/// Grid of dashboard pairs; skeleton rows while the first load is pending.
pub fn render_market_grid(state: &DashboardState) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Pair"),
        ui::header_cell("Rate"),
        ui::header_cell("FX Spot"),
    ]);

    if state.loading {
        for _ in 0..SKELETON_ROWS {
            table.add_row(vec![
                ui::skeleton_cell(4),
                ui::skeleton_cell(9),
                ui::skeleton_cell(10),
                ui::skeleton_cell(18),
            ]);
        }
        return format!("{}\n\n{table}", title());
    }

    if state.rates.is_empty() {
        return format!(
            "{}\n\n{}",
            title(),
            ui::style_text("Market data unavailable", ui::StyleType::Subtle)
        );
    }

    for item in &state.rates {
        table.add_row(pair_row(item));
    }
    format!("{}\n\n{table}", title())
}

pub async fn run(provider: &dyn RateProvider) -> Result<()> {
    let mut dashboard = DashboardState::new();
    let pb = ui::new_spinner("Aggregating market data");
    dashboard.load(provider).await;
    pb.finish_and_clear();

    println!("{}", render_market_grid(&dashboard));
    Ok(())
}

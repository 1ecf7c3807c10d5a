use super::{charts, market, ui};
use crate::core::catalog;
use crate::core::{ConversionController, DashboardState, RateProvider};
use anyhow::Result;
use tracing::info;

/// Result panel: the converted amount, the unit rate, or the inline error.
pub fn render_conversion(controller: &ConversionController) -> String {
    let state = controller.state();
    if state.loading {
        return ui::style_text("Syncing rates...", ui::StyleType::Subtle);
    }
    if let Some(error) = &state.error {
        return format!("✖ {}", ui::style_text(error, ui::StyleType::Error));
    }

    let mut output = format!(
        "{} {} {} equals\n",
        ui::format_grouped(state.amount, 0, 3),
        catalog::flag(&state.from),
        state.from
    );
    output.push_str(&format!(
        "{} {}\n",
        catalog::flag(&state.to),
        ui::style_text(
            &ui::format_money(controller.display_value(), &state.to),
            ui::StyleType::Value
        )
    ));
    if let Some(rate) = state.rate {
        output.push_str(&ui::style_text(
            &format!("1 {} = {:.6} {}", state.from, rate, state.to),
            ui::StyleType::Subtle,
        ));
    }
    output
}

pub fn render_analytics(controller: &ConversionController) -> String {
    format!(
        "{} {}\n\n{}",
        ui::style_text("Market Visualization", ui::StyleType::Title),
        ui::style_text(
            &format!("{} performance index", controller.state().from),
            ui::StyleType::Subtle
        ),
        charts::render_chart(controller)
    )
}

pub async fn run(provider: &dyn RateProvider, controller: &mut ConversionController) -> Result<()> {
    info!(
        from = %controller.state().from,
        to = %controller.state().to,
        "Converting..."
    );
    let pb = ui::new_spinner("Syncing rates");
    controller.convert(provider).await;
    pb.finish_and_clear();

    println!("{}", render_conversion(controller));
    if controller.error().is_none() {
        ui::print_separator();
        println!("{}", render_analytics(controller));
    }
    Ok(())
}

/// Full page: market overview and the default conversion, loaded side by side.
pub async fn run_dashboard(
    provider: &dyn RateProvider,
    controller: &mut ConversionController,
) -> Result<()> {
    let mut dashboard = DashboardState::new();
    let pb = ui::new_spinner("Aggregating market data");
    tokio::join!(dashboard.load(provider), controller.convert(provider));
    pb.finish_and_clear();

    println!("{}", market::render_market_grid(&dashboard));
    ui::print_separator();
    println!("{}", render_conversion(controller));
    ui::print_separator();
    println!("{}", render_analytics(controller));
    Ok(())
}

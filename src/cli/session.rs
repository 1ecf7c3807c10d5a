//! Interactive session mirroring the converter page: amount, selectors, swap, resync and view toggle

use super::picker::{CurrencyPicker, Selection, render_currency_list};
use super::{convert, market, ui};
use crate::core::catalog;
use crate::core::dashboard::fetch_dashboard;
use crate::core::error::Result as FxResult;
use crate::core::{ChartView, ConversionController, DashboardPairRate, DashboardState, RateProvider};
use anyhow::{Result, anyhow};
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  amount <n>          set the amount to convert
  from <code|search>  choose the base currency
  to <code|search>    choose the target currency
  swap                exchange base and target
  sync                refetch the latest rates
  view <comparison|trend>
  toggle              switch between comparison and trend
  search <term>       list matching currencies
  market              show the market overview
  show                show the current conversion
  help                show this help
  quit                leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Amount(f64),
    From(String),
    To(String),
    Swap,
    Sync,
    View(ChartView),
    Toggle,
    Search(String),
    Market,
    Show,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, arg) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let arg = arg.trim();
        let require_arg = || {
            if arg.is_empty() {
                Err(anyhow!("'{}' needs an argument", verb))
            } else {
                Ok(arg.to_string())
            }
        };

        match verb.to_lowercase().as_str() {
            "amount" => {
                let amount: f64 = require_arg()?
                    .replace(',', "")
                    .parse()
                    .map_err(|_| anyhow!("Invalid amount: {}", arg))?;
                if !amount.is_finite() {
                    return Err(anyhow!("Invalid amount: {}", arg));
                }
                Ok(SessionCommand::Amount(amount))
            }
            "from" => Ok(SessionCommand::From(require_arg()?)),
            "to" => Ok(SessionCommand::To(require_arg()?)),
            "swap" => Ok(SessionCommand::Swap),
            "sync" | "resync" => Ok(SessionCommand::Sync),
            "view" => Ok(SessionCommand::View(require_arg()?.parse()?)),
            "toggle" => Ok(SessionCommand::Toggle),
            "search" => Ok(SessionCommand::Search(arg.to_string())),
            "market" => Ok(SessionCommand::Market),
            "show" => Ok(SessionCommand::Show),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" | "q" => Ok(SessionCommand::Quit),
            _ => Err(anyhow!("Unknown command: {}", verb)),
        }
    }
}

pub struct Session<W: Write> {
    provider: Arc<dyn RateProvider>,
    controller: ConversionController,
    from_picker: CurrencyPicker,
    to_picker: CurrencyPicker,
    dashboard: DashboardState,
    dashboard_task: Option<JoinHandle<FxResult<Vec<DashboardPairRate>>>>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(provider: Arc<dyn RateProvider>, controller: ConversionController, out: W) -> Self {
        let from_picker = CurrencyPicker::new("From", &controller.state().from);
        let to_picker = CurrencyPicker::new("To", &controller.state().to);
        Session {
            provider,
            controller,
            from_picker,
            to_picker,
            dashboard: DashboardState::new(),
            dashboard_task: None,
            out,
        }
    }

    pub fn controller(&self) -> &ConversionController {
        &self.controller
    }

    pub fn dashboard(&self) -> &DashboardState {
        &self.dashboard
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Starts the market overview in the background; it lands whenever it finishes.
    fn spawn_dashboard(&mut self) {
        let provider = Arc::clone(&self.provider);
        self.dashboard.loading = true;
        self.dashboard_task = Some(tokio::spawn(async move {
            fetch_dashboard(provider.as_ref()).await
        }));
    }

    async fn poll_dashboard(&mut self, wait: bool) {
        let ready = self
            .dashboard_task
            .as_ref()
            .is_some_and(|task| wait || task.is_finished());
        if !ready {
            return;
        }
        if let Some(task) = self.dashboard_task.take() {
            match task.await {
                Ok(result) => self.dashboard.finish(result),
                Err(e) => {
                    warn!(error = %e, "Dashboard task did not complete");
                    self.dashboard.loading = false;
                }
            }
        }
    }

    async fn sync(&mut self) -> Result<()> {
        self.controller.convert(self.provider.as_ref()).await;
        self.show()
    }

    fn show(&mut self) -> Result<()> {
        writeln!(self.out, "{}", self.from_picker.render())?;
        writeln!(self.out, "{}", self.to_picker.render())?;
        writeln!(self.out, "{}", convert::render_conversion(&self.controller))?;
        if self.controller.error().is_none() {
            writeln!(self.out, "{}", convert::render_analytics(&self.controller))?;
        }
        Ok(())
    }

    async fn select(&mut self, is_from: bool, input: &str) -> Result<()> {
        let picker = if is_from {
            &mut self.from_picker
        } else {
            &mut self.to_picker
        };
        match picker.choose(input) {
            Selection::Chosen(code) => {
                let changed = if is_from {
                    self.controller.set_from(&code)
                } else {
                    self.controller.set_to(&code)
                };
                if changed {
                    self.sync().await?;
                }
            }
            Selection::Ambiguous(matches) => {
                writeln!(
                    self.out,
                    "Several currencies match '{input}':\n{}",
                    render_currency_list(&matches, None)
                )?;
            }
            Selection::NotFound => {
                writeln!(
                    self.out,
                    "{}",
                    ui::style_text("No currencies found", ui::StyleType::Error)
                )?;
                picker.close();
            }
        }
        Ok(())
    }

    /// Applies one command; returns false when the session should end.
    pub async fn handle(&mut self, command: SessionCommand) -> Result<bool> {
        debug!(?command, "Session command");
        self.poll_dashboard(false).await;

        match command {
            SessionCommand::Amount(amount) => {
                self.controller.set_amount(amount);
                writeln!(self.out, "{}", convert::render_conversion(&self.controller))?;
            }
            SessionCommand::From(input) => self.select(true, &input).await?,
            SessionCommand::To(input) => self.select(false, &input).await?,
            SessionCommand::Swap => {
                self.controller.swap();
                let state = self.controller.state();
                self.from_picker.sync_value(&state.from);
                self.to_picker.sync_value(&state.to);
                self.sync().await?;
            }
            SessionCommand::Sync => self.sync().await?,
            SessionCommand::View(view) => {
                self.controller.set_view(view);
                writeln!(self.out, "{}", convert::render_analytics(&self.controller))?;
            }
            SessionCommand::Toggle => {
                self.controller.toggle_view();
                writeln!(self.out, "{}", convert::render_analytics(&self.controller))?;
            }
            SessionCommand::Search(term) => {
                writeln!(
                    self.out,
                    "{}",
                    render_currency_list(&catalog::search(&term), None)
                )?;
            }
            SessionCommand::Market => {
                writeln!(self.out, "{}", market::render_market_grid(&self.dashboard))?;
            }
            SessionCommand::Show => self.show()?,
            SessionCommand::Help => writeln!(self.out, "{HELP}")?,
            SessionCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Reads commands line by line until `quit` or end of input.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        self.spawn_dashboard();
        self.sync().await?;
        writeln!(self.out, "{}", ui::style_text("Type 'help' for commands.", ui::StyleType::Subtle))?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let command = match line.parse::<SessionCommand>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(self.out, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?;
                    continue;
                }
            };
            if !self.handle(command).await? {
                break;
            }
        }

        self.poll_dashboard(true).await;
        Ok(())
    }
}

pub async fn run(provider: Arc<dyn RateProvider>, controller: ConversionController) -> Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut session = Session::new(provider, controller, std::io::stdout());
    session.run(stdin).await
}

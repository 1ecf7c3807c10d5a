//! Searchable currency selector

use super::ui;
use crate::core::catalog::{self, CURRENCIES, CurrencyInfo};
use anyhow::Result;
use comfy_table::{Attribute, Cell, Color};

/// Result of typing a code or a search term into the picker.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Chosen(String),
    Ambiguous(Vec<&'static CurrencyInfo>),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct CurrencyPicker {
    label: String,
    value: String,
    open: bool,
    search: String,
}

impl CurrencyPicker {
    pub fn new(label: &str, value: &str) -> Self {
        CurrencyPicker {
            label: label.to_string(),
            value: value.to_uppercase(),
            open: false,
            search: String::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_search(&mut self, term: &str) {
        self.open = true;
        self.search = term.to_string();
    }

    pub fn results(&self) -> Vec<&'static CurrencyInfo> {
        catalog::search(&self.search)
    }

    /// Entry shown on the closed picker; unknown codes fall back to the first catalog entry.
    pub fn selected(&self) -> &'static CurrencyInfo {
        catalog::find(&self.value).unwrap_or(&CURRENCIES[0])
    }

    /// Picks `code`, closing the dropdown and clearing the search.
    pub fn select(&mut self, code: &str) {
        self.value = code.to_uppercase();
        self.open = false;
        self.search.clear();
    }

    /// Sets the value syncing with external changes such as a swap.
    pub fn sync_value(&mut self, code: &str) {
        self.value = code.to_uppercase();
    }

    /// Accepts an exact catalog code or a search term with a single match.
    pub fn choose(&mut self, input: &str) -> Selection {
        if let Some(currency) = catalog::find(input) {
            self.select(currency.code);
            return Selection::Chosen(currency.code.to_string());
        }

        self.set_search(input);
        let results = self.results();
        match results.as_slice() {
            [] => Selection::NotFound,
            [only] => {
                let code = only.code.to_string();
                self.select(&code);
                Selection::Chosen(code)
            }
            _ => Selection::Ambiguous(results),
        }
    }

    pub fn render(&self) -> String {
        let selected = self.selected();
        let mut output = format!(
            "{}: {} {} ({})",
            ui::style_text(&self.label, ui::StyleType::Label),
            selected.flag,
            selected.code,
            ui::style_text(selected.name, ui::StyleType::Subtle)
        );
        if self.open {
            output.push('\n');
            output.push_str(&render_currency_list(&self.results(), Some(&self.value)));
        }
        output
    }
}

pub fn render_currency_list(currencies: &[&CurrencyInfo], selected: Option<&str>) -> String {
    if currencies.is_empty() {
        return ui::style_text("No currencies found", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell(""),
    ]);
    for currency in currencies {
        let is_selected = selected.is_some_and(|s| s == currency.code);
        let code_cell = if is_selected {
            Cell::new(currency.code)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(currency.code)
        };
        table.add_row(vec![
            Cell::new(currency.flag),
            code_cell,
            Cell::new(currency.name),
            Cell::new(if is_selected { "✔" } else { "" }),
        ]);
    }
    table.to_string()
}

/// Lists the catalog, optionally filtered by a search term.
pub fn run(search: Option<&str>) -> Result<()> {
    let matches = catalog::search(search.unwrap_or_default());
    println!("{}", render_currency_list(&matches, None));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_exact_code() {
        let mut picker = CurrencyPicker::new("From", "USD");
        assert_eq!(picker.choose("jpy"), Selection::Chosen("JPY".to_string()));
        assert_eq!(picker.value(), "JPY");
        assert!(!picker.is_open());
    }

    #[test]
    fn test_choose_unique_search_term() {
        let mut picker = CurrencyPicker::new("To", "USD");
        assert_eq!(picker.choose("rupiah"), Selection::Chosen("IDR".to_string()));
        assert_eq!(picker.results().len(), CURRENCIES.len());
    }

    #[test]
    fn test_choose_ambiguous_keeps_picker_open() {
        let mut picker = CurrencyPicker::new("To", "EUR");
        match picker.choose("dollar") {
            Selection::Ambiguous(matches) => {
                let codes: Vec<_> = matches.iter().map(|c| c.code).collect();
                assert_eq!(codes, vec!["USD", "SGD", "AUD", "CAD"]);
            }
            other => panic!("Expected ambiguous selection, got {other:?}"),
        }
        assert!(picker.is_open());
        assert_eq!(picker.value(), "EUR");
        assert!(picker.render().contains("Singapore Dollar"));
    }

    #[test]
    fn test_choose_unknown_term() {
        let mut picker = CurrencyPicker::new("To", "EUR");
        assert_eq!(picker.choose("zloty"), Selection::NotFound);
        assert!(picker.render().contains("No currencies found"));
    }

    #[test]
    fn test_unknown_value_displays_first_catalog_entry() {
        let picker = CurrencyPicker::new("From", "XYZ");
        assert_eq!(picker.selected().code, "USD");
        assert_eq!(picker.value(), "XYZ");
    }

    #[test]
    fn test_toggle_and_close() {
        let mut picker = CurrencyPicker::new("From", "USD");
        picker.toggle();
        assert!(picker.is_open());
        picker.close();
        assert!(!picker.is_open());
    }
}

//! Static reference data: supported currencies and default views

/// Glyph shown for codes that are not in the catalog.
pub const PLACEHOLDER_FLAG: &str = "🏳️";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyPair {
    pub from: &'static str,
    pub to: &'static str,
}

const fn currency(code: &'static str, name: &'static str, flag: &'static str) -> CurrencyInfo {
    CurrencyInfo { code, name, flag }
}

const fn pair(from: &'static str, to: &'static str) -> CurrencyPair {
    CurrencyPair { from, to }
}

pub const CURRENCIES: &[CurrencyInfo] = &[
    currency("USD", "US Dollar", "🇺🇸"),
    currency("IDR", "Indonesian Rupiah", "🇮🇩"),
    currency("EUR", "Euro", "🇪🇺"),
    currency("GBP", "British Pound", "🇬🇧"),
    currency("JPY", "Japanese Yen", "🇯🇵"),
    currency("SGD", "Singapore Dollar", "🇸🇬"),
    currency("AUD", "Australian Dollar", "🇦🇺"),
    currency("CAD", "Canadian Dollar", "🇨🇦"),
    currency("CHF", "Swiss Franc", "🇨🇭"),
    currency("CNY", "Chinese Yuan", "🇨🇳"),
    currency("KRW", "South Korean Won", "🇰🇷"),
    currency("MYR", "Malaysian Ringgit", "🇲🇾"),
    currency("THB", "Thai Baht", "🇹🇭"),
    currency("INR", "Indian Rupee", "🇮🇳"),
    currency("MXN", "Mexican Peso", "🇲🇽"),
];

/// Pairs shown in the market overview, in display order.
pub const DASHBOARD_PAIRS: &[CurrencyPair] = &[
    pair("USD", "EUR"),
    pair("USD", "GBP"),
    pair("USD", "JPY"),
    pair("USD", "IDR"),
    pair("EUR", "USD"),
    pair("GBP", "USD"),
    pair("USD", "CAD"),
    pair("USD", "AUD"),
    pair("USD", "CHF"),
    pair("USD", "INR"),
    pair("EUR", "GBP"),
    pair("USD", "SGD"),
];

/// Bases fetched to populate the market overview.
pub const DASHBOARD_BASES: [&str; 3] = ["USD", "EUR", "GBP"];

pub const COMPARISON_TARGETS: &[&str] = &[
    "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "SGD", "IDR", "INR", "KRW", "MXN",
];

pub fn find(code: &str) -> Option<&'static CurrencyInfo> {
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Uppercases `input` when it looks like an ISO 4217 code: exactly three ASCII letters.
pub fn normalize_code(input: &str) -> Option<String> {
    let code = input.trim();
    (code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| code.to_ascii_uppercase())
}

pub fn flag(code: &str) -> &'static str {
    find(code).map_or(PLACEHOLDER_FLAG, |c| c.flag)
}

/// Case-insensitive substring match on code or name, in catalog order.
pub fn search(term: &str) -> Vec<&'static CurrencyInfo> {
    let needle = term.trim().to_lowercase();
    CURRENCIES
        .iter()
        .filter(|c| {
            c.code.to_lowercase().contains(&needle) || c.name.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_dollar_preserves_catalog_order() {
        let codes: Vec<_> = search("dollar").iter().map(|c| c.code).collect();
        assert_eq!(codes, vec!["USD", "SGD", "AUD", "CAD"]);
    }

    #[test]
    fn test_search_matches_code_case_insensitively() {
        let codes: Vec<_> = search("jp").iter().map(|c| c.code).collect();
        assert_eq!(codes, vec!["JPY"]);
    }

    #[test]
    fn test_empty_search_returns_full_catalog() {
        assert_eq!(search("").len(), CURRENCIES.len());
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" eur "), Some("EUR".to_string()));
        assert_eq!(normalize_code("XYZ"), Some("XYZ".to_string()));
        assert_eq!(normalize_code("EUR&to=JPY"), None);
        assert_eq!(normalize_code("EU"), None);
        assert_eq!(normalize_code("E1R"), None);
        assert_eq!(normalize_code("ÉUR"), None);
    }

    #[test]
    fn test_unknown_code_gets_placeholder_flag() {
        assert_eq!(flag("EUR"), "🇪🇺");
        assert_eq!(flag("XYZ"), PLACEHOLDER_FLAG);
    }

    #[test]
    fn test_dashboard_pairs_use_fetched_bases() {
        assert!(
            DASHBOARD_PAIRS
                .iter()
                .all(|p| DASHBOARD_BASES.contains(&p.from))
        );
    }
}

use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("BRL")
    }
}

/// Locale-aware number formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "pt-BR".into(),
            decimal_separator: ',',
            grouping_separator: '.',
        }
    }
}

impl LocaleConfig {
    /// Builds formatting preferences for a BCP 47 language tag. English
    /// tags flip the separators; anything else keeps the Brazilian ones.
    pub fn for_tag(tag: &str) -> Self {
        let (decimal_separator, grouping_separator) =
            if tag.to_ascii_lowercase().starts_with("en") {
                ('.', ',')
            } else {
                (',', '.')
            };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "BRL" => "R$".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let mut body = format!("{:.*}", precision as usize, value);
    if locale.decimal_separator != '.' {
        if let Some(pos) = body.find('.') {
            body.replace_range(pos..=pos, &locale.decimal_separator.to_string());
        }
    }
    if let Some(pos) = body.find(locale.decimal_separator) {
        let mut int_part = body[..pos].to_string();
        insert_grouping(&mut int_part, locale.grouping_separator);
        body = format!("{}{}", int_part, &body[pos..]);
    } else {
        insert_grouping(&mut body, locale.grouping_separator);
    }
    body
}

fn insert_grouping(int_part: &mut String, separator: char) {
    let mut cleaned = int_part.replace(separator, "");
    if cleaned.starts_with('-') {
        let sign = cleaned.remove(0);
        let grouped = group_digits(&cleaned, separator);
        *int_part = format!("{}{}", sign, grouped);
    } else {
        *int_part = group_digits(&cleaned, separator);
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}

/// Formats a monetary amount with the currency symbol, e.g. `R$ 1.234,56`.
pub fn format_currency_value(amount: f64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(locale, amount, precision);
    format!("{} {}", symbol_for(code.as_str()), body)
}

/// Formats a quantity with its unit, trimming an integral value to no
/// decimals, e.g. `5000 g` or `1,50 un`. Quantities are never digit-grouped.
pub fn format_quantity(locale: &LocaleConfig, quantity: f64, unit: &str) -> String {
    let body = if quantity.fract().abs() < 1e-9 {
        format!("{:.0}", quantity)
    } else {
        format!("{:.2}", quantity).replace('.', &locale.decimal_separator.to_string())
    };
    format!("{} {}", body, unit)
}

/// Formats a percentage with one decimal place, e.g. `3,5%`.
pub fn format_percent(locale: &LocaleConfig, value: f64) -> String {
    format!("{}%", format_number(locale, value, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_brl_with_default_locale() {
        let locale = LocaleConfig::default();
        let code = CurrencyCode::default();
        insta::assert_snapshot!(format_currency_value(1234.5, &code, &locale), @"R$ 1.234,50");
        insta::assert_snapshot!(format_currency_value(0.0, &code, &locale), @"R$ 0,00");
        insta::assert_snapshot!(format_currency_value(-42.0, &code, &locale), @"R$ -42,00");
    }

    #[test]
    fn groups_large_integers() {
        let locale = LocaleConfig::default();
        assert_eq!(format_number(&locale, 1234567.891, 2), "1.234.567,89");
    }

    #[test]
    fn for_tag_flips_separators_for_english() {
        let locale = LocaleConfig::for_tag("en-US");
        assert_eq!(format_number(&locale, 1234.5, 2), "1,234.50");
        let fallback = LocaleConfig::for_tag("pt-BR");
        assert_eq!(format_number(&fallback, 1234.5, 2), "1.234,50");
    }

    #[test]
    fn formats_quantities_and_percentages() {
        let locale = LocaleConfig::default();
        assert_eq!(format_quantity(&locale, 5000.0, "g"), "5000 g");
        assert_eq!(format_quantity(&locale, 1.5, "un"), "1,50 un");
        assert_eq!(format_percent(&locale, 3.5), "3,5%");
    }

    #[test]
    fn falls_back_to_code_symbol() {
        assert_eq!(symbol_for("BRL"), "R$");
        assert_eq!(symbol_for("XYZ"), "XYZ");
    }
}

//! Formatting money amounts for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Format `number` as dollars with two decimal places, e.g. `$1,234.50` or
/// `-$50.00`.
///
/// The amount is rounded to the nearest cent first, so float noise such as
/// `0.3 - 0.1 - 0.2` is shown as `$0.00`.
pub fn format_currency(number: f64) -> String {
    let number = (number * 100.0).round() / 100.0;

    // numfmt switches to scientific notation for small magnitudes and only
    // the thousands separator is needed from it.
    if number.abs() < 1000.0 {
        return plain_currency(number);
    }

    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| currency_formatter("$"));
    let negative_fmt = NEGATIVE_FMT.get_or_init(|| currency_formatter("-$"));

    let formatted = if number < 0.0 {
        negative_fmt
            .as_ref()
            .map(|formatter| formatter.fmt_string(number.abs()))
    } else {
        positive_fmt
            .as_ref()
            .map(|formatter| formatter.fmt_string(number))
    };

    let Some(mut formatted_string) = formatted.filter(|string| !string.contains('e')) else {
        return plain_currency(number);
    };

    // numfmt omits trailing zeros, e.g. "12.30" is rendered as "12.3" and
    // "12.00" as "12", so we pad the decimals ourselves.
    match formatted_string.rfind('.') {
        Some(dot) => {
            let decimals = formatted_string.len() - dot - 1;
            for _ in decimals..2 {
                formatted_string.push('0');
            }
        }
        None => formatted_string.push_str(".00"),
    }

    formatted_string
}

fn plain_currency(number: f64) -> String {
    if number < 0.0 {
        format!("-${:.2}", number.abs())
    } else {
        format!("${:.2}", number.abs())
    }
}

fn currency_formatter(prefix: &str) -> Option<Formatter> {
    Formatter::currency(prefix)
        .ok()
        .map(|formatter| formatter.precision(Precision::Decimals(2)))
}

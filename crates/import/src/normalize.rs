//! Cell-value normalizers. Every function takes raw cell text and returns a
//! typed value or a defined fallback; none of them can fail a row.

use brokerbase_graph::{CustomerStatus, LicenseStatus};

/// Affirmative / negative word sets for boolean-ish cells (Swedish + English).
const AFFIRMATIVE: &[&str] = &["ja", "yes", "true", "1", "x", "aktiv", "active"];
const NEGATIVE: &[&str] = &["nej", "no", "false", "0", "inaktiv", "inactive"];

/// Parse a money amount from locale-messy text ("1 234 kr", "1.234,56").
///
/// Keeps digits, comma, period and minus. When both comma and period are
/// present, period is the thousands separator and comma the decimal mark;
/// a lone comma is a decimal comma. Returns 0.0 on anything unparseable.
pub fn parse_money(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let mut t: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    let has_comma = t.contains(',');
    let has_dot = t.contains('.');
    if has_comma && has_dot {
        t = t.replace('.', "").replace(',', ".");
    } else if has_comma {
        t = t.replace(',', ".");
    }
    t.parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Canonicalize an org/customer number to its 10-digit form.
///
/// Strips everything but digits; accepts the 10-digit form as-is and the
/// 12-digit form by dropping the leading century pair. Anything else is
/// rejected as empty.
pub fn canonical_org_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 => digits,
        12 => digits[2..].to_string(),
        _ => String::new(),
    }
}

/// Tri-state boolean. `None` means "unspecified"; callers must not treat it
/// as false.
pub fn parse_boolish(raw: &str) -> Option<bool> {
    let v = raw.trim().to_lowercase();
    if v.is_empty() {
        return None;
    }
    if AFFIRMATIVE.contains(&v.as_str()) {
        return Some(true);
    }
    if NEGATIVE.contains(&v.as_str()) {
        return Some(false);
    }
    None
}

/// Customer status from a free-text cell, by leading-character prefix.
/// Unrecognized values fall back to non-customer.
pub fn parse_status(raw: &str) -> CustomerStatus {
    let v = raw.trim().to_lowercase();
    if v.is_empty() {
        return CustomerStatus::NotContacted;
    }
    if v.starts_with('k') || v.contains("kund") || v.contains("customer") {
        return CustomerStatus::Customer;
    }
    if v.starts_with('p') {
        return CustomerStatus::Prospect;
    }
    if v.contains("ja") {
        CustomerStatus::Customer
    } else {
        CustomerStatus::NotContacted
    }
}

/// License state by leading-character prefix ("aktiv"/"active" → Active,
/// "test"/"trial" → Trial).
pub fn parse_license_status(raw: &str) -> LicenseStatus {
    let v = raw.trim().to_lowercase();
    if v.starts_with('a') {
        LicenseStatus::Active
    } else if v.starts_with('t') {
        LicenseStatus::Trial
    } else {
        LicenseStatus::None
    }
}

/// Split a single full-name cell into (first, last) on the final whitespace
/// token. Single tokens become a first name with an empty last name.
pub fn split_full_name(raw: &str) -> (String, String) {
    let mut parts: Vec<&str> = raw.split_whitespace().collect();
    match parts.len() {
        0 => (String::new(), String::new()),
        1 => (parts[0].to_string(), String::new()),
        _ => {
            let last = parts.pop().unwrap_or_default().to_string();
            (parts.join(" "), last)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn money_space_grouped_decimal_comma() {
        assert_eq!(parse_money("1 234,50"), 1234.5);
    }

    #[test]
    fn money_dot_grouped_decimal_comma() {
        assert_eq!(parse_money("1.234,50"), 1234.5);
    }

    #[test]
    fn money_plain_decimal_dot() {
        assert_eq!(parse_money("1234.50"), 1234.5);
    }

    #[test]
    fn money_currency_suffix() {
        assert_eq!(parse_money("849 kr"), 849.0);
        assert_eq!(parse_money("-1 099 kr"), -1099.0);
    }

    #[test]
    fn money_empty_and_garbage_fall_back_to_zero() {
        assert_eq!(parse_money(""), 0.0);
        assert_eq!(parse_money("n/a"), 0.0);
        assert_eq!(parse_money("-,.-"), 0.0);
    }

    #[test]
    fn org_number_ten_digit_with_dash() {
        assert_eq!(canonical_org_number("556677-8899"), "5566778899");
    }

    #[test]
    fn org_number_twelve_digit_drops_century() {
        assert_eq!(canonical_org_number("165566778899"), "5566778899");
    }

    #[test]
    fn org_number_rejects_short_forms() {
        assert_eq!(canonical_org_number("12345"), "");
        assert_eq!(canonical_org_number(""), "");
    }

    #[test]
    fn boolish_locale_words() {
        assert_eq!(parse_boolish("Ja"), Some(true));
        assert_eq!(parse_boolish("NEJ"), Some(false));
        assert_eq!(parse_boolish("yes"), Some(true));
        assert_eq!(parse_boolish("inactive"), Some(false));
    }

    #[test]
    fn boolish_unrecognized_is_unspecified() {
        assert_eq!(parse_boolish(""), None);
        assert_eq!(parse_boolish("kanske"), None);
    }

    #[test]
    fn status_prefix_match() {
        assert_eq!(parse_status("Kund"), CustomerStatus::Customer);
        assert_eq!(parse_status("k"), CustomerStatus::Customer);
        assert_eq!(parse_status("Prospekt"), CustomerStatus::Prospect);
        assert_eq!(parse_status("är kund: ja"), CustomerStatus::Customer);
        assert_eq!(parse_status("avstängd"), CustomerStatus::NotContacted);
        assert_eq!(parse_status(""), CustomerStatus::NotContacted);
    }

    #[test]
    fn license_prefix_match() {
        assert_eq!(parse_license_status("Aktiv"), LicenseStatus::Active);
        assert_eq!(parse_license_status("test"), LicenseStatus::Trial);
        assert_eq!(parse_license_status("trial"), LicenseStatus::Trial);
        assert_eq!(parse_license_status("ingen"), LicenseStatus::None);
    }

    #[test]
    fn full_name_splits_on_last_token() {
        assert_eq!(
            split_full_name("Anna Maria Berg"),
            ("Anna Maria".to_string(), "Berg".to_string())
        );
        assert_eq!(split_full_name("Cher"), ("Cher".to_string(), String::new()));
        assert_eq!(split_full_name("  "), (String::new(), String::new()));
    }

    proptest! {
        // Normalizers must never panic and money must stay finite, whatever
        // the cell contains.
        #[test]
        fn money_total_on_arbitrary_input(s in "\\PC*") {
            let n = parse_money(&s);
            prop_assert!(n.is_finite());
        }

        #[test]
        fn org_number_is_ten_digits_or_empty(s in "\\PC*") {
            let canon = canonical_org_number(&s);
            prop_assert!(canon.is_empty() || canon.len() == 10);
        }
    }
}

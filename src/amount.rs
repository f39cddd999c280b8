/// Parse an exchange-export cell into a number.
///
/// Accepts accounting negatives `(12.30)`, thousands separators and stray
/// currency symbols. Anything that does not reduce to a number yields `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    let paren = s.len() >= 2 && s.starts_with('(') && s.ends_with(')');
    let core = if paren { &s[1..s.len() - 1] } else { s };

    let cleaned: String = core
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'))
        .collect();
    if cleaned.is_empty() || cleaned == "-" || cleaned == "+" {
        return 0.0;
    }

    let n = cleaned.parse::<f64>().unwrap_or(0.0);
    if paren {
        -n
    } else {
        n
    }
}

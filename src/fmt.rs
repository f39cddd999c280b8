/// Format with thousands separators and a fixed number of decimals: 1,234.56
pub fn amount(val: f64, decimals: usize) -> String {
    let negative = val < 0.0;
    let fixed = format!("{:.*}", decimals, val.abs());
    let (int_part, dec_part) = match fixed.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (fixed.as_str(), None),
    };

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let mut out: String = with_commas.chars().rev().collect();
    if let Some(d) = dec_part {
        out.push('.');
        out.push_str(d);
    }

    if negative && out.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{out}")
    } else {
        out
    }
}

/// Plain fixed-point rendering, used for fee figures.
pub fn fixed(val: f64, decimals: usize) -> String {
    let s = format!("{:.*}", decimals, val);
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

/// Quantities: up to eight decimals, trailing zeros trimmed.
pub fn qty(val: f64) -> String {
    let s = format!("{val:.8}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "" | "-0" => "0".to_string(),
        _ => s.to_string(),
    }
}

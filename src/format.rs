//! Conversions between the display text and numbers.

/// Parses the longest numeric prefix of the display text.
///
/// The display only ever holds digits, `.` and a leading `-`, so a sign,
/// digits and one decimal point are all that is understood. Trailing
/// garbage is ignored, so `"1.2.3"` is `1.2`. Text with no digits gives NaN.
pub fn parse_float(text: &str) -> f64 {
    let input = text.trim_start().as_bytes();
    let mut index = 0;

    if index < input.len() && (input[index] == b'+' || input[index] == b'-') {
        index += 1;
    }

    let mut digits = 0;
    while index < input.len() && input[index].is_ascii_digit() {
        index += 1;
        digits += 1;
    }
    if index < input.len() && input[index] == b'.' {
        index += 1;
        while index < input.len() && input[index].is_ascii_digit() {
            index += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    // The prefix is pure ASCII, so slicing on a byte index is safe
    let prefix = &text.trim_start()[..index];
    let prefix = prefix.strip_suffix('.').unwrap_or(prefix);
    prefix.parse().unwrap_or(f64::NAN)
}

/// Renders a number the way the display shows it.
///
/// Whole numbers drop their fraction, magnitudes from `1e21` up and below
/// `1e-6` switch to exponent form (`1e+21`, `1.5e-7`), and negative zero
/// is shown as `0`.
pub fn format_number(number: f64) -> String {
    if number.is_nan() {
        return "NaN".to_owned();
    }
    if number.is_infinite() {
        return if number > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if number == 0.0 {
        return "0".to_owned();
    }

    let magnitude = number.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", number);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    format!("{}", number)
}

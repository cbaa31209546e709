/// Форматирует число с разделителями тысяч (точками), как в отчётах
///
/// # Примеры
/// ```
/// use backend::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1.234.567");
/// assert_eq!(format_number(-4200), "-4.200");
/// ```
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut groups: Vec<&str> = Vec::new();
    let mut end = digits.len();
    while end > 3 {
        groups.push(&digits[end - 3..end]);
        end -= 3;
    }
    groups.push(&digits[..end]);
    groups.reverse();

    let sign = if n < 0 { "-" } else { "" };
    format!("{}{}", sign, groups.join("."))
}

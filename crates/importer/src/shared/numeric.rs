/// Приводит сырую строку со смешанными локальными форматами чисел к
/// каноническому виду, пригодному для `f64::parse`.
///
/// Эвристика (намеренно, поведение зафиксировано тестами):
/// 1. прямой парсинг — если строка уже число, возвращаем как есть;
/// 2. выбрасываем всё, кроме цифр, `.`, `,`, `-`;
/// 3. больше одной точки — все точки считаются разделителями тысяч и удаляются;
/// 4. оставшаяся запятая — десятичный разделитель, меняется на точку;
/// 5. если точек снова несколько, первая группа — целая часть, хвост
///    склеивается в дробную.
///
/// Пустой или полностью нечисловой результат нормализуется в `"0"`.
///
/// # Примеры
/// ```
/// use importer::shared::numeric::clean_number;
/// assert_eq!(clean_number("65.231.000"), "65231000");
/// assert_eq!(clean_number("68,34"), "68.34");
/// assert_eq!(clean_number(""), "0");
/// assert_eq!(clean_number("abc"), "0");
/// ```
pub fn clean_number(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "0".to_string();
    }

    if trimmed.parse::<f64>().is_ok() {
        return trimmed.to_string();
    }

    let mut s: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    if s.matches('.').count() > 1 {
        s = s.replace('.', "");
    }

    if s.contains(',') {
        s = s.replace(',', ".");
    }

    if s.matches('.').count() > 1 {
        let mut parts = s.split('.');
        let head = parts.next().unwrap_or("").to_string();
        let tail: String = parts.collect();
        s = format!("{}.{}", head, tail);
    }

    if s.parse::<f64>().is_ok() {
        s
    } else {
        "0".to_string()
    }
}

/// Оставляет в строке только ASCII-цифры (для целочисленных полей)
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Округление денежных сумм до 2 знаков
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// File: crates/stockviz-core/src/format.rs
// Summary: Locale-aware number, currency, percent and date formatting plus UI strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::series::Time;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid date '{0}'")]
    InvalidDate(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurrencyPosition {
    Prefix,
    /// Symbol after the amount, separated by a no-break space.
    Suffix,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateOrder {
    DayMonthYear,
    MonthDayYear,
}

/// User-visible labels. Templates use `{symbol}` / `{message}` placeholders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strings {
    pub date: &'static str,
    pub price: &'static str,
    pub open: &'static str,
    pub high: &'static str,
    pub low: &'static str,
    pub close: &'static str,
    pub volume: &'static str,
    pub up: &'static str,
    pub down: &'static str,
    pub year: &'static str,
    pub month: &'static str,
    pub monthly_return: &'static str,
    pub loading: &'static str,
    pub no_data: &'static str,
    pub no_volume_data: &'static str,
    pub no_monthly_returns: &'static str,
    pub no_shareholders: &'static str,
    pub no_heatmap_data: &'static str,
    pub load_error: &'static str,
    pub monthly_returns_title: &'static str,
    pub shareholders_title: &'static str,
    pub chart_line: &'static str,
    pub chart_candle: &'static str,
    pub sentiment: &'static str,
    pub sentiment_positive: &'static str,
    pub sentiment_neutral: &'static str,
    pub sentiment_negative: &'static str,
    pub news_source: &'static str,
    pub article_count: &'static str,
    pub no_sentiment_data: &'static str,
    pub no_news_data: &'static str,
    /// 1m, 3m, 6m, 1y, 3y, 5y, all
    pub ranges: [&'static str; 7],
}

impl Strings {
    pub fn fill(template: &str, symbol: &str) -> String {
        template.replace("{symbol}", symbol)
    }

    pub fn load_error(&self, message: &str) -> String {
        self.load_error.replace("{message}", message)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Locale {
    pub tag: &'static str,
    pub group_sep: char,
    pub decimal_sep: char,
    pub currency_symbol: &'static str,
    pub currency_position: CurrencyPosition,
    pub date_order: DateOrder,
    pub month_names: [&'static str; 12],
    pub strings: Strings,
}

impl Default for Locale {
    fn default() -> Self {
        Self::vi_vn()
    }
}

impl Locale {
    pub fn vi_vn() -> Self {
        Self {
            tag: "vi-VN",
            group_sep: '.',
            decimal_sep: ',',
            currency_symbol: "₫",
            currency_position: CurrencyPosition::Suffix,
            date_order: DateOrder::DayMonthYear,
            month_names: [
                "Tháng 1", "Tháng 2", "Tháng 3", "Tháng 4", "Tháng 5", "Tháng 6",
                "Tháng 7", "Tháng 8", "Tháng 9", "Tháng 10", "Tháng 11", "Tháng 12",
            ],
            strings: Strings {
                date: "Ngày",
                price: "Giá",
                open: "Mở",
                high: "Cao",
                low: "Thấp",
                close: "Đóng",
                volume: "Khối lượng",
                up: "Tăng",
                down: "Giảm",
                year: "Năm",
                month: "Tháng",
                monthly_return: "Lợi nhuận",
                loading: "Đang tải dữ liệu...",
                no_data: "Không có dữ liệu cho cổ phiếu {symbol}",
                no_volume_data: "Không có dữ liệu khối lượng cho cổ phiếu {symbol}",
                no_monthly_returns: "Không có dữ liệu lợi nhuận hàng tháng cho cổ phiếu {symbol}",
                no_shareholders: "Không có dữ liệu cổ đông cho cổ phiếu {symbol}",
                no_heatmap_data: "Không có dữ liệu cho biểu đồ nhiệt",
                load_error: "Lỗi khi tải dữ liệu: {message}",
                monthly_returns_title: "Lợi nhuận hàng tháng {symbol}",
                shareholders_title: "Cơ cấu cổ đông {symbol}",
                chart_line: "Đường",
                chart_candle: "Nến",
                sentiment: "Cảm xúc",
                sentiment_positive: "Tích cực",
                sentiment_neutral: "Trung lập",
                sentiment_negative: "Tiêu cực",
                news_source: "Nguồn",
                article_count: "Số lượng bài báo",
                no_sentiment_data: "Không có dữ liệu cảm xúc",
                no_news_data: "Không có dữ liệu tin tức",
                ranges: ["1T", "3T", "6T", "1N", "3N", "5N", "Tất cả"],
            },
        }
    }

    pub fn en_us() -> Self {
        Self {
            tag: "en-US",
            group_sep: ',',
            decimal_sep: '.',
            currency_symbol: "$",
            currency_position: CurrencyPosition::Prefix,
            date_order: DateOrder::MonthDayYear,
            month_names: [
                "January", "February", "March", "April", "May", "June",
                "July", "August", "September", "October", "November", "December",
            ],
            strings: Strings {
                date: "Date",
                price: "Price",
                open: "Open",
                high: "High",
                low: "Low",
                close: "Close",
                volume: "Volume",
                up: "Up",
                down: "Down",
                year: "Year",
                month: "Month",
                monthly_return: "Return",
                loading: "Loading data...",
                no_data: "No data for {symbol}",
                no_volume_data: "No volume data for {symbol}",
                no_monthly_returns: "No monthly returns for {symbol}",
                no_shareholders: "No shareholder data for {symbol}",
                no_heatmap_data: "No data for the heatmap",
                load_error: "Error loading data: {message}",
                monthly_returns_title: "Monthly returns {symbol}",
                shareholders_title: "Shareholders {symbol}",
                chart_line: "Line",
                chart_candle: "Candles",
                sentiment: "Sentiment",
                sentiment_positive: "Positive",
                sentiment_neutral: "Neutral",
                sentiment_negative: "Negative",
                news_source: "Source",
                article_count: "Articles",
                no_sentiment_data: "No sentiment data",
                no_news_data: "No news data",
                ranges: ["1M", "3M", "6M", "1Y", "3Y", "5Y", "All"],
            },
        }
    }

    /// Resolve a BCP 47 tag; unknown tags fall back to vi-VN.
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("en-US") || tag.eq_ignore_ascii_case("en") {
            Self::en_us()
        } else {
            Self::vi_vn()
        }
    }

    /// Grouped number with exactly `decimals` fraction digits.
    pub fn format_number(&self, value: f64, decimals: usize) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "∞".to_string() } else { "-∞".to_string() };
        }
        // Ties round away from zero, like the browser's number formatter.
        let factor = 10f64.powi(decimals.min(15) as i32);
        let rounded = (value.abs() * factor).round() / factor;
        let magnitude = if rounded.is_finite() { rounded } else { value.abs() };
        let text = format!("{:.*}", decimals, magnitude);
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (text.as_str(), None),
        };
        // A value that rounds to zero prints without a sign.
        let negative = value < 0.0 && text.bytes().any(|b| b.is_ascii_digit() && b != b'0');

        let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 1);
        if negative {
            out.push('-');
        }
        out.push_str(&group_digits(int_part, self.group_sep));
        if let Some(frac) = frac_part {
            out.push(self.decimal_sep);
            out.push_str(frac);
        }
        out
    }

    /// Whole-unit currency amount.
    pub fn format_currency(&self, value: f64) -> String {
        let amount = self.format_number(value.abs(), 0);
        let sign = if value < 0.0 && amount.bytes().any(|b| b.is_ascii_digit() && b != b'0') { "-" } else { "" };
        match self.currency_position {
            CurrencyPosition::Prefix => format!("{sign}{}{amount}", self.currency_symbol),
            CurrencyPosition::Suffix => format!("{sign}{amount}\u{a0}{}", self.currency_symbol),
        }
    }

    /// Fraction rendered as a percentage with two decimals (0.0523 -> 5,23%).
    pub fn format_percent(&self, fraction: f64) -> String {
        format!("{}%", self.format_number(fraction * 100.0, 2))
    }

    /// ISO date (or RFC 3339 / naive timestamp) to zero-padded day/month/year in locale order.
    pub fn format_date(&self, iso: &str) -> Result<String, FormatError> {
        parse_calendar_date(iso)
            .map(|d| self.format_naive_date(d))
            .ok_or_else(|| FormatError::InvalidDate(iso.to_string()))
    }

    pub fn format_naive_date(&self, date: NaiveDate) -> String {
        use chrono::Datelike;
        match self.date_order {
            DateOrder::DayMonthYear => format!("{:02}/{:02}/{:04}", date.day(), date.month(), date.year()),
            DateOrder::MonthDayYear => format!("{:02}/{:02}/{:04}", date.month(), date.day(), date.year()),
        }
    }

    /// Calendar date (UTC) of a chart time.
    pub fn format_time(&self, time: Time) -> String {
        self.format_naive_date(time.date())
    }

    /// Compact volume label: 950, 12,5K, 1,2M, 3B.
    pub fn format_volume(&self, value: f64) -> String {
        const UNITS: [(f64, &str); 4] = [(1.0, ""), (1e3, "K"), (1e6, "M"), (1e9, "B")];
        let abs = value.abs();
        let mut unit = UNITS.iter().rposition(|(u, _)| abs >= *u).unwrap_or(0);
        let decimals = |unit: usize| if unit == 0 { 0 } else { 1 };
        let round = |unit: usize| {
            let p = 10f64.powi(decimals(unit));
            (abs / UNITS[unit].0 * p).round() / p
        };
        // Rounding may carry into the next unit (999 950 -> 1000,0K -> 1M).
        while unit + 1 < UNITS.len() && round(unit) >= 1000.0 {
            unit += 1;
        }
        if unit == 0 {
            return self.format_number(value, 0);
        }
        let (_, suffix) = UNITS[unit];
        let scaled = round(unit).copysign(value);
        let mut text = self.format_number(scaled, 1);
        let trailing = format!("{}0", self.decimal_sep);
        if text.ends_with(&trailing) {
            text.truncate(text.len() - trailing.len());
        }
        text.push_str(suffix);
        text
    }

    /// Month label for 1-based `month`, falling back to the number.
    pub fn month_name(&self, month: u32) -> String {
        month
            .checked_sub(1)
            .and_then(|i| self.month_names.get(i as usize))
            .map(|s| s.to_string())
            .unwrap_or_else(|| month.to_string())
    }
}

/// Escape text for HTML content and SVG/HTML attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Time-axis tick label, `dd/MM`.
pub fn format_tick(time: Time) -> String {
    use chrono::Datelike;
    let d = time.date();
    format!("{:02}/{:02}", d.day(), d.month())
}

/// Accepts `YYYY-MM-DD`, RFC 3339 and naive `YYYY-MM-DD[T ]HH:MM:SS` timestamps.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc().date());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

fn group_digits(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_digits("1", '.'), "1");
        assert_eq!(group_digits("1234", '.'), "1.234");
        assert_eq!(group_digits("123456", ','), "123,456");
        assert_eq!(group_digits("1234567", '.'), "1.234.567");
    }

    #[test]
    fn negative_zero_has_no_sign() {
        let vi = Locale::vi_vn();
        assert_eq!(vi.format_number(-0.001, 2), "0,00");
        assert_eq!(vi.format_number(-1234.5, 1), "-1.234,5");
        assert_eq!(vi.format_number(2.5, 0), "3");
        assert_eq!(vi.format_number(-2.5, 0), "-3");
    }
}

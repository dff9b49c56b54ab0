use chrono::{DateTime, Local, Utc};

/// Дата для карточек: `17.10.2026`
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.with_timezone(&Local).format("%d.%m.%Y").to_string()
}

/// Секундомер прохождения: `mm:ss`, часы добавляются при необходимости
pub fn format_timer(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timer() {
        assert_eq!(format_timer(0), "00:00");
        assert_eq!(format_timer(75), "01:15");
        assert_eq!(format_timer(3600 + 5), "1:00:05");
    }
}

use chrono::{DateTime, NaiveDate, Utc};

// Two-digit years are tried before four so `1/12/19` is not read as year 19.
const DATE_FORMATS: [&str; 5] = ["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Parse the sale date text shown on a price-guide row
pub fn parse_listing_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

/// Whole days from `listing_date` to `reference`; `None` if the listing is dated later
pub fn age_days(listing_date: NaiveDate, reference: DateTime<Utc>) -> Option<i64> {
    let days = (reference.date_naive() - listing_date).num_days();
    (days >= 0).then_some(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_site_formats() {
        assert_eq!(parse_listing_date("Jan 12, 2019"), Some(ymd(2019, 1, 12)));
        assert_eq!(parse_listing_date("January 12, 2019"), Some(ymd(2019, 1, 12)));
        assert_eq!(parse_listing_date("2019-01-12"), Some(ymd(2019, 1, 12)));
        assert_eq!(parse_listing_date("01/12/2019"), Some(ymd(2019, 1, 12)));
        assert_eq!(parse_listing_date("1/12/19"), Some(ymd(2019, 1, 12)));
        assert_eq!(
            parse_listing_date("2019-01-12T23:30:00-05:00"),
            Some(ymd(2019, 1, 13))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_listing_date(""), None);
        assert_eq!(parse_listing_date("yesterday"), None);
        assert_eq!(parse_listing_date("2019-13-45"), None);
    }

    #[test]
    fn age_is_counted_from_reference() {
        let reference = Utc.with_ymd_and_hms(2019, 2, 1, 8, 0, 0).unwrap();
        assert_eq!(age_days(ymd(2019, 1, 12), reference), Some(20));
        assert_eq!(age_days(ymd(2019, 2, 1), reference), Some(0));
        assert_eq!(age_days(ymd(2019, 2, 2), reference), None);
    }
}

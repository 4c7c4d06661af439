use crate::error::{QueryError, Result};
use crate::utils::constants::QUERY_DATE_FORMAT;
use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` query parameter.
///
/// Only the canonical zero-padded form is accepted: anything that does not
/// format back to the same string (`2017-8-1`, `2017-08-01T00:00`) fails.
pub fn parse_query_date(value: &str) -> Result<NaiveDate> {
    let invalid = || QueryError::InvalidDateFormat(value.to_string());

    let date = NaiveDate::parse_from_str(value, QUERY_DATE_FORMAT).map_err(|_| invalid())?;
    if date.format(QUERY_DATE_FORMAT).to_string() != value {
        return Err(invalid());
    }

    Ok(date)
}

/// Parse a `start` and optional `end` pair, failing on the first bad value.
pub fn parse_date_range(start: &str, end: Option<&str>) -> Result<(NaiveDate, Option<NaiveDate>)> {
    let start = parse_query_date(start)?;
    let end = end.map(parse_query_date).transpose()?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_date() {
        let date = parse_query_date("2015-07-14").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2015, 7, 14).unwrap());
    }

    #[test]
    fn test_parse_query_date_rejects_malformed() {
        for value in [
            "",
            "2015/07/14",
            "14-07-2015",
            "2015-7-14",
            "2015-02-30",
            "2015-07-14T00:00:00",
            "2015-07-14 ",
            "yesterday",
        ] {
            let result = parse_query_date(value);
            assert!(
                matches!(result, Err(QueryError::InvalidDateFormat(ref v)) if v == value),
                "accepted malformed date {:?}",
                value
            );
        }
    }

    #[test]
    fn test_parse_date_range() {
        let (start, end) = parse_date_range("2016-08-23", Some("2017-08-23")).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2016, 8, 23).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2017, 8, 23));

        let (_, end) = parse_date_range("2016-08-23", None).unwrap();
        assert!(end.is_none());

        assert!(parse_date_range("2016-08-23", Some("2017-13-01")).is_err());
    }
}

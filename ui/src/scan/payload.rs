//! Decoded QR text → endpoint query.
//!
//! Labels carry `productId,lineCode,DD/MM/YYYY`; the endpoint wants the date
//! as `YYYY-MM-DD`.

use time::{macros::format_description, Date, Month};

use super::error::ScanError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanQuery {
    pub product_id: String,
    pub line_code: String,
    pub date: Date,
}

impl ScanQuery {
    pub fn parse(decoded: &str) -> Result<Self, ScanError> {
        let parts: Vec<&str> = decoded.split(',').map(str::trim).collect();
        let [product_id, line_code, raw_date] = parts.as_slice() else {
            return Err(ScanError::InvalidPayloadFormat { parts: parts.len() });
        };

        if product_id.is_empty() {
            return Err(ScanError::InvalidPayloadFormat { parts: parts.len() });
        }

        Ok(Self {
            product_id: product_id.to_string(),
            line_code: line_code.to_string(),
            date: parse_label_date(raw_date)?,
        })
    }

    /// `YYYY-MM-DD`, as the endpoint expects.
    pub fn date_param(&self) -> String {
        self.date
            .format(&format_description!("[year]-[month]-[day]"))
            .unwrap_or_else(|_| self.date.to_string())
    }

    pub fn endpoint(&self, base: &str) -> String {
        format!("{}/data", base.trim_end_matches('/'))
    }

    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("productId", self.product_id.clone()),
            ("date", self.date_param()),
        ]
    }
}

fn parse_label_date(raw: &str) -> Result<Date, ScanError> {
    let invalid = || ScanError::InvalidDateFormat(raw.to_string());

    let components: Vec<&str> = raw.split('/').map(str::trim).collect();
    let [day, month, year] = components.as_slice() else {
        return Err(invalid());
    };
    if day.is_empty() || month.is_empty() || year.is_empty() {
        return Err(invalid());
    }

    let day: u8 = day.parse().map_err(|_| invalid())?;
    let month: u8 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month = Month::try_from(month).map_err(|_| invalid())?;

    Date::from_calendar_date(year, month, day).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_date_becomes_iso() {
        let query = ScanQuery::parse("P100,L2,05/01/2024").unwrap();
        assert_eq!(query.product_id, "P100");
        assert_eq!(query.line_code, "L2");
        assert_eq!(query.date_param(), "2024-01-05");
    }

    #[test]
    fn unpadded_dates_are_padded() {
        let query = ScanQuery::parse(" P7 , L1 , 5/1/2024 ").unwrap();
        assert_eq!(query.product_id, "P7");
        assert_eq!(query.date_param(), "2024-01-05");
    }

    #[test]
    fn wrong_part_count_is_rejected() {
        assert_eq!(
            ScanQuery::parse("P100,L2"),
            Err(ScanError::InvalidPayloadFormat { parts: 2 })
        );
        assert_eq!(
            ScanQuery::parse("P100,L2,05/01/2024,extra"),
            Err(ScanError::InvalidPayloadFormat { parts: 4 })
        );
        assert_eq!(
            ScanQuery::parse(",L2,05/01/2024"),
            Err(ScanError::InvalidPayloadFormat { parts: 3 })
        );
    }

    #[test]
    fn broken_dates_are_rejected() {
        for raw in ["P1,L1,05/2024", "P1,L1,//2024", "P1,L1,31/02/2024", "P1,L1,aa/01/2024"] {
            assert!(
                matches!(ScanQuery::parse(raw), Err(ScanError::InvalidDateFormat(_))),
                "{raw} should fail date validation"
            );
        }
    }

    #[test]
    fn endpoint_joins_the_base() {
        let query = ScanQuery::parse("P100,L2,05/01/2024").unwrap();
        assert_eq!(query.endpoint("https://host/app/"), "https://host/app/data");
        assert_eq!(
            query.query_pairs(),
            [
                ("productId", "P100".to_string()),
                ("date", "2024-01-05".to_string())
            ]
        );
    }
}

//! `Expires` attribute dates.

use serde::{Serialize, Serializer};
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Value of an `Expires` attribute.
///
/// The raw text is always kept; `at` is set when the date could be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expires {
    pub raw: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub at: Option<OffsetDateTime>,
}

fn serialize_timestamp<S: Serializer>(
    at: &Option<OffsetDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let formatted = at
        .map(|at| at.format(&Rfc3339))
        .transpose()
        .map_err(serde::ser::Error::custom)?;
    match formatted {
        Some(text) => serializer.serialize_some(&text),
        None => serializer.serialize_none(),
    }
}

impl Expires {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            at: parse_cookie_date(raw.trim()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.at.is_some()
    }
}

/// IMF-fixdate, the Netscape dashed variant, then RFC 2822 and RFC 3339.
fn parse_cookie_date(input: &str) -> Option<OffsetDateTime> {
    let imf_fixdate = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    let netscape = format_description!(
        "[weekday repr:short], [day]-[month repr:short]-[year] [hour]:[minute]:[second] GMT"
    );

    PrimitiveDateTime::parse(input, imf_fixdate)
        .or_else(|_| PrimitiveDateTime::parse(input, netscape))
        .map(PrimitiveDateTime::assume_utc)
        .or_else(|_| OffsetDateTime::parse(input, &Rfc2822))
        .or_else(|_| OffsetDateTime::parse(input, &Rfc3339))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn imf_fixdate() {
        let expires = Expires::parse("Wed, 09 Jun 2021 10:18:14 GMT");
        assert_eq!(expires.at, Some(datetime!(2021-06-09 10:18:14 UTC)));
        assert_eq!(expires.raw, "Wed, 09 Jun 2021 10:18:14 GMT");
    }

    #[test]
    fn netscape_dashed_date() {
        let expires = Expires::parse("Wed, 09-Jun-2021 10:18:14 GMT");
        assert_eq!(expires.at, Some(datetime!(2021-06-09 10:18:14 UTC)));
    }

    #[test]
    fn rfc3339_date() {
        let expires = Expires::parse("2030-01-01T00:00:00Z");
        assert_eq!(expires.at, Some(datetime!(2030-01-01 0:00 UTC)));
    }

    #[test]
    fn garbage_keeps_raw_text() {
        let expires = Expires::parse("next tuesday");
        assert!(!expires.is_valid());
        assert_eq!(expires.raw, "next tuesday");
    }
}

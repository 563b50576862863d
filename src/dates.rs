//! Date normalisation. Incoming timestamps may carry a UTC offset; the offset is
//! dropped and the wall-clock time kept, so `2024-05-01T10:00:00+03:00` is stored
//! as `2024-05-01T10:00:00`.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

pub fn strip_offset(dt: DateTime<FixedOffset>) -> NaiveDateTime {
    dt.naive_local()
}

/// Parses RFC 3339 (offset dropped) or a naive `YYYY-MM-DDTHH:MM:SS[.f]` / space-separated form.
pub fn parse_wall_clock(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(strip_offset(dt));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// serde adapter for required timestamps.
pub mod wall_clock {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&dt.format("%Y-%m-%dT%H:%M:%S%.f"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_wall_clock(&raw).ok_or_else(|| de::Error::custom(format!("invalid datetime: {}", raw)))
    }
}

/// serde adapter for optional timestamps; use with `#[serde(default)]`.
pub mod wall_clock_option {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => super::wall_clock::serialize(dt, s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) => super::parse_wall_clock(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid datetime: {}", raw))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde::Deserialize;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn offset_is_dropped_wall_clock_kept() {
        let dt = DateTime::parse_from_rfc3339("2024-05-01T10:00:00+03:00").unwrap();
        assert_eq!(strip_offset(dt), at(10));
        assert_eq!(parse_wall_clock("2024-05-01T10:00:00-07:00"), Some(at(10)));
        assert_eq!(parse_wall_clock("2024-05-01T10:00:00Z"), Some(at(10)));
    }

    #[test]
    fn naive_forms_are_accepted() {
        assert_eq!(parse_wall_clock("2024-05-01T10:00:00"), Some(at(10)));
        assert_eq!(parse_wall_clock("2024-05-01 10:00:00"), Some(at(10)));
        assert_eq!(parse_wall_clock("2024-05-01T10:00"), Some(at(10)));
        assert_eq!(parse_wall_clock("May 1st"), None);
    }

    #[derive(Deserialize)]
    struct Payload {
        #[serde(with = "wall_clock")]
        start: NaiveDateTime,
        #[serde(default, with = "wall_clock_option")]
        end: Option<NaiveDateTime>,
    }

    #[test]
    fn serde_adapters() {
        let p: Payload = serde_json::from_str(r#"{"start": "2024-05-01T10:00:00+05:00"}"#).unwrap();
        assert_eq!(p.start, at(10));
        assert_eq!(p.end, None);
        let p: Payload = serde_json::from_str(r#"{"start": "2024-05-01T10:00:00", "end": null}"#).unwrap();
        assert_eq!(p.end, None);
        assert!(serde_json::from_str::<Payload>(r#"{"start": "soon"}"#).is_err());
    }
}

use chrono::{DateTime, SubsecRound, Utc};

const MILLIS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Current time truncated to the precision postings are persisted with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub fn to_iso_millis(dt: &DateTime<Utc>) -> String {
    dt.format(MILLIS_FORMAT).to_string()
}

/// Accepts RFC 3339 as well as the `+0000` offset form older clients send.
pub fn from_iso(s: &str) -> anyhow::Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))?;
    Ok(parsed.with_timezone(&Utc).trunc_subsecs(3))
}

/// Serde adapter for optional timestamps on the wire.
pub mod iso_millis_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&super::to_iso_millis(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| super::from_iso(raw.trim()).map_err(serde::de::Error::custom))
            .transpose()
    }
}

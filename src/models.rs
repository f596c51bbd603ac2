use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Server-assigned property identifier.
///
/// The API hands ids out as strings but accepts numbers in request bodies,
/// so both forms deserialize into the same value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(String);

impl PropertyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PropertyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl FromStr for PropertyId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PropertyId(s.trim().to_string()))
    }
}

impl Serialize for PropertyId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PropertyId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = PropertyId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a property id as string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(PropertyId(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(PropertyId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(PropertyId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Serializes an id as a JSON number when it is numeric, the way the
/// rent-record endpoint expects `propertyId`.
fn serialize_id_numeric<S: Serializer>(id: &PropertyId, serializer: S) -> Result<S::Ok, S::Error> {
    match id.as_str().parse::<i64>() {
        Ok(n) => serializer.serialize_i64(n),
        Err(_) => serializer.serialize_str(id.as_str()),
    }
}

/// A calendar month with a zero-based month index (0 = January), matching
/// the `"year-month"` keys used by the rent history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Returns `None` when `month` is outside 0..=11.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (month < 12).then_some(Self { year, month })
    }

    /// Builds a key from a one-based month number as typed by a user.
    pub fn from_human(year: i32, month: u32) -> Option<Self> {
        month.checked_sub(1).and_then(|m| Self::new(year, m))
    }

    pub fn of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 11 {
            Self { year: self.year + 1, month: 0 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 0 {
            Self { year: self.year - 1, month: 11 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
    }

    pub fn days_in_month(self) -> u32 {
        match (self.first_day(), self.next().first_day()) {
            (Some(start), Some(end)) => (end - start).num_days() as u32,
            _ => 31,
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .rsplit_once('-')
            .ok_or_else(|| format!("invalid month key: {}", s))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| format!("invalid year in month key: {}", s))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| format!("invalid month in month key: {}", s))?;
        MonthKey::new(year, month).ok_or_else(|| format!("month out of range in key: {}", s))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// How the rent goes up on each lease anniversary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YearlyIncrease {
    Percent(f64),
    Amount(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub address: String,
    pub renter_name: String,
    #[serde(default)]
    pub renter_contact: String,
    pub initial_rent: f64,
    pub current_rent: f64,
    pub lease_start_date: NaiveDate,
    pub expected_rent_date: u32,
    #[serde(default)]
    pub yearly_increase_percent: Option<f64>,
    #[serde(default)]
    pub yearly_increase_amount: Option<f64>,
    #[serde(default, with = "flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_rent: Option<f64>,
}

impl Property {
    /// The amount used by every up-to-date display and total.
    pub fn rent(&self) -> f64 {
        self.current_rent
    }

    pub fn yearly_increase(&self) -> Option<YearlyIncrease> {
        match (self.yearly_increase_percent, self.yearly_increase_amount) {
            (Some(p), _) if p != 0.0 => Some(YearlyIncrease::Percent(p)),
            (_, Some(a)) if a != 0.0 => Some(YearlyIncrease::Amount(a)),
            _ => None,
        }
    }
}

/// Status of one property for one month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentRecord {
    #[serde(default)]
    pub received: bool,
    #[serde(default, with = "empty_date")]
    pub expected_date: Option<NaiveDate>,
    #[serde(default, with = "empty_date")]
    pub received_date: Option<NaiveDate>,
    #[serde(default, with = "empty_string")]
    pub payment_mode: Option<String>,
    #[serde(default, with = "zero_amount")]
    pub rent_amount: Option<f64>,
}

/// Rent records keyed by month, then by property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RentHistory(BTreeMap<MonthKey, BTreeMap<PropertyId, RentRecord>>);

impl RentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn month(&self, key: MonthKey) -> Option<&BTreeMap<PropertyId, RentRecord>> {
        self.0.get(&key)
    }

    pub fn get(&self, key: MonthKey, id: &PropertyId) -> Option<&RentRecord> {
        self.0.get(&key).and_then(|bucket| bucket.get(id))
    }

    /// Stores a record, creating the month bucket if needed.
    pub fn upsert(&mut self, key: MonthKey, id: PropertyId, record: RentRecord) {
        self.0.entry(key).or_default().insert(id, record);
    }

    /// Drops every record of a property across all months.
    pub fn purge_property(&mut self, id: &PropertyId) -> usize {
        let mut removed = 0;
        for bucket in self.0.values_mut() {
            if bucket.remove(id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (MonthKey, &PropertyId, &RentRecord)> {
        self.0
            .iter()
            .flat_map(|(key, bucket)| bucket.iter().map(move |(id, record)| (*key, id, record)))
    }

    pub fn contains_property(&self, id: &PropertyId) -> bool {
        self.0.values().any(|bucket| bucket.contains_key(id))
    }

    pub fn record_count(&self) -> usize {
        self.0.values().map(|bucket| bucket.len()).sum()
    }
}

/// Body of `POST /api/properties`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub name: String,
    pub renter_name: String,
    pub address: String,
    pub renter_contact: String,
    pub initial_rent: f64,
    pub expected_rent_date: u32,
    pub lease_start_date: NaiveDate,
    pub yearly_increase_percent: Option<f64>,
    pub yearly_increase_amount: Option<f64>,
}

/// Body of `PUT /api/properties/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyUpdate {
    pub name: String,
    pub address: String,
    pub monthly_rent: f64,
}

/// Body of `POST /api/rent-records`; the server creates or overwrites the
/// record for `(propertyId, year, month)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentRecordUpsert {
    #[serde(serialize_with = "serialize_id_numeric")]
    pub property_id: PropertyId,
    pub month: u32,
    pub year: i32,
    #[serde(with = "empty_date")]
    pub expected_date: Option<NaiveDate>,
    #[serde(with = "empty_date")]
    pub received_date: Option<NaiveDate>,
    pub received: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_amount: Option<f64>,
}

impl RentRecordUpsert {
    pub fn key(&self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month,
        }
    }
}

/// Local JSON snapshot written by the JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub properties: Vec<Property>,
    pub rent_history: RentHistory,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

pub const BACKUP_VERSION: &str = "1.0";

/// `YYYY-MM-DD` on the wire, empty string when absent.
mod empty_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.collect_str(&d.format("%Y-%m-%d")),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

mod empty_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.filter(|s| !s.trim().is_empty()))
    }
}

/// The server reports "no recorded amount" as `0`.
mod zero_amount {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(value.unwrap_or(0.0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let raw: Option<f64> = Option::deserialize(d)?;
        Ok(raw.filter(|v| *v != 0.0))
    }
}

/// Accepts RFC 3339 timestamps and the naive ISO timestamps the server
/// emits, treating the latter as UTC.
mod flexible_datetime {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => s.serialize_str(&dt.to_rfc3339()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Some(naive.and_utc()))
            .map_err(de::Error::custom)
    }
}

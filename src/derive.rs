//! Pure views over the cached properties and rent history.
//!
//! Nothing in here touches the network or the terminal, so every function
//! can be driven directly from tests.

use crate::models::{MonthKey, Property, PropertyId, RentHistory, RentRecord, YearlyIncrease};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

/// Newest property additions considered for the activity feed.
pub const RECENT_PROPERTY_LIMIT: usize = 3;

/// Entries shown in the activity feed.
pub const ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RentStatus {
    Received,
    Pending,
}

impl RentStatus {
    pub fn label(self) -> &'static str {
        match self {
            RentStatus::Received => "Received",
            RentStatus::Pending => "Pending",
        }
    }
}

/// A property with no record for the month counts as pending.
pub fn rent_status(history: &RentHistory, key: MonthKey, id: &PropertyId) -> RentStatus {
    match history.get(key, id) {
        Some(record) if record.received => RentStatus::Received,
        _ => RentStatus::Pending,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub month: MonthKey,
    pub total_properties: usize,
    pub expected: f64,
    pub collected: f64,
    pub pending: f64,
    pub collection_rate: f64,
}

pub fn month_summary(properties: &[Property], history: &RentHistory, key: MonthKey) -> MonthSummary {
    let mut expected = 0.0;
    let mut collected = 0.0;
    let mut pending = 0.0;

    for property in properties {
        expected += property.rent();
        match rent_status(history, key, &property.id) {
            RentStatus::Received => collected += property.rent(),
            RentStatus::Pending => pending += property.rent(),
        }
    }

    MonthSummary {
        month: key,
        total_properties: properties.len(),
        expected,
        collected,
        pending,
        collection_rate: collection_rate(collected, expected),
    }
}

pub fn collection_rate(collected: f64, expected: f64) -> f64 {
    if expected > 0.0 {
        collected / expected * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityKind {
    PropertyAdded,
    RentReceived,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub property_id: PropertyId,
    pub message: String,
    pub date: DateTime<Utc>,
}

/// Merges the newest property additions with this month's received rents,
/// newest first, capped at [`ACTIVITY_LIMIT`].
pub fn recent_activity(
    properties: &[Property],
    history: &RentHistory,
    key: MonthKey,
    now: DateTime<Utc>,
) -> Vec<Activity> {
    let mut added: Vec<(&Property, DateTime<Utc>)> = properties
        .iter()
        .filter_map(|p| p.created_at.map(|created| (p, created)))
        .collect();
    added.sort_by(|a, b| b.1.cmp(&a.1));

    let mut activities: Vec<Activity> = added
        .into_iter()
        .take(RECENT_PROPERTY_LIMIT)
        .map(|(property, created)| Activity {
            kind: ActivityKind::PropertyAdded,
            property_id: property.id.clone(),
            message: format!("Added property: {}", property.name),
            date: created,
        })
        .collect();

    if let Some(bucket) = history.month(key) {
        for (id, record) in bucket {
            if !record.received {
                continue;
            }
            let Some(property) = properties.iter().find(|p| &p.id == id) else {
                continue;
            };
            let date = record
                .received_date
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
                .unwrap_or(now);
            activities.push(Activity {
                kind: ActivityKind::RentReceived,
                property_id: id.clone(),
                message: format!("Rent received from {}", property.name),
                date,
            });
        }
    }

    activities.sort_by(|a, b| b.date.cmp(&a.date));
    activities.truncate(ACTIVITY_LIMIT);
    activities
}

/// One line of the records listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRow {
    pub property_id: PropertyId,
    pub property_name: String,
    pub renter_name: String,
    pub month: MonthKey,
    pub amount: f64,
    pub status: RentStatus,
    pub expected_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,
    pub payment_mode: Option<String>,
    pub days_late: Option<i64>,
}

/// Flattens the history against known properties, newest month first and
/// by property name within a month. Records of unknown properties are
/// dropped.
pub fn record_rows(properties: &[Property], history: &RentHistory) -> Vec<RecordRow> {
    let mut rows: Vec<RecordRow> = history
        .iter()
        .filter_map(|(key, id, record)| {
            let property = properties.iter().find(|p| &p.id == id)?;
            Some(RecordRow {
                property_id: id.clone(),
                property_name: property.name.clone(),
                renter_name: property.renter_name.clone(),
                month: key,
                amount: record.rent_amount.unwrap_or(property.rent()),
                status: if record.received {
                    RentStatus::Received
                } else {
                    RentStatus::Pending
                },
                expected_date: record.expected_date,
                received_date: record.received_date,
                payment_mode: record.payment_mode.clone(),
                days_late: days_late(record),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.month
            .year
            .cmp(&a.month.year)
            .then(b.month.month.cmp(&a.month.month))
            .then_with(|| a.property_name.cmp(&b.property_name))
    });
    rows
}

/// Days between the expected and received dates of a paid record, when late.
pub fn days_late(record: &RentRecord) -> Option<i64> {
    if !record.received {
        return None;
    }
    let diff = (record.received_date? - record.expected_date?).num_days();
    (diff > 0).then_some(diff)
}

/// The day rent is due in `key`, clamped to the month's last day.
pub fn due_date(property: &Property, key: MonthKey) -> Option<NaiveDate> {
    let day = property.expected_rent_date.clamp(1, key.days_in_month());
    NaiveDate::from_ymd_opt(key.year, key.month + 1, day)
}

/// Full lease years elapsed between `start` and `today`.
pub fn lease_years(start: NaiveDate, today: NaiveDate) -> u32 {
    if today <= start {
        return 0;
    }
    let mut years = today.year() - start.year();
    if (today.month(), today.day()) < (start.month(), start.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Rent after applying the yearly increase once per full lease year.
pub fn projected_rent(property: &Property, today: NaiveDate) -> f64 {
    let years = lease_years(property.lease_start_date, today);
    let mut rent = property.initial_rent;
    match property.yearly_increase() {
        Some(YearlyIncrease::Percent(p)) => {
            for _ in 0..years {
                rent += rent * (p / 100.0);
            }
        }
        Some(YearlyIncrease::Amount(a)) => rent += a * years as f64,
        None => {}
    }
    rent
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn property(id: &str, name: &str, rent: f64) -> Property {
        Property {
            id: PropertyId::new(id),
            name: name.to_string(),
            address: format!("{} Main St", id),
            renter_name: format!("Renter {}", id),
            renter_contact: String::new(),
            initial_rent: rent,
            current_rent: rent,
            lease_start_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            expected_rent_date: 5,
            yearly_increase_percent: None,
            yearly_increase_amount: None,
            created_at: None,
            monthly_rent: Some(rent),
        }
    }

    fn received_on(date: Option<NaiveDate>) -> RentRecord {
        RentRecord {
            received: true,
            received_date: date,
            ..Default::default()
        }
    }

    fn march() -> MonthKey {
        MonthKey::new(2024, 2).unwrap()
    }

    #[test]
    fn test_untracked_month_is_pending() {
        let properties = vec![property("1", "Maple", 1200.0)];
        let history = RentHistory::new();

        assert_eq!(rent_status(&history, march(), &properties[0].id), RentStatus::Pending);

        let summary = month_summary(&properties, &history, march());
        assert_eq!(summary.pending, 1200.0);
        assert_eq!(summary.collected, 0.0);
        assert_eq!(summary.collection_rate, 0.0);
    }

    #[test]
    fn test_rate_with_one_of_two_received() {
        let properties = vec![property("1", "Maple", 1000.0), property("2", "Oak", 500.0)];
        let mut history = RentHistory::new();
        history.upsert(march(), PropertyId::new("1"), received_on(None));

        let summary = month_summary(&properties, &history, march());
        assert_eq!(summary.total_properties, 2);
        assert_eq!(summary.expected, 1500.0);
        assert_eq!(summary.collected, 1000.0);
        assert_eq!(summary.pending, 500.0);
        assert_eq!(format!("{:.1}", summary.collection_rate), "66.7");
    }

    #[test]
    fn test_rate_is_zero_without_expected_rent() {
        assert_eq!(collection_rate(250.0, 0.0), 0.0);
        let summary = month_summary(&[], &RentHistory::new(), march());
        assert_eq!(summary.collection_rate, 0.0);
        assert_eq!(summary.total_properties, 0);
    }

    #[test]
    fn test_unreceived_record_counts_as_pending() {
        let properties = vec![property("1", "Maple", 800.0)];
        let mut history = RentHistory::new();
        history.upsert(
            march(),
            PropertyId::new("1"),
            RentRecord {
                expected_date: NaiveDate::from_ymd_opt(2024, 3, 5),
                ..Default::default()
            },
        );
        let summary = month_summary(&properties, &history, march());
        assert_eq!(summary.pending, 800.0);
    }

    #[test]
    fn test_activity_feed_is_capped_and_sorted() {
        let mut properties = Vec::new();
        for i in 0..6 {
            let mut p = property(&i.to_string(), &format!("Unit {}", i), 100.0);
            p.created_at = Some(Utc.with_ymd_and_hms(2024, 2, 1 + i, 12, 0, 0).unwrap());
            properties.push(p);
        }
        let mut history = RentHistory::new();
        for i in 0..4u32 {
            history.upsert(
                march(),
                PropertyId::new(i.to_string()),
                received_on(NaiveDate::from_ymd_opt(2024, 3, 1 + i)),
            );
        }
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();

        let feed = recent_activity(&properties, &history, march(), now);
        assert_eq!(feed.len(), ACTIVITY_LIMIT);
        assert!(feed.windows(2).all(|w| w[0].date >= w[1].date));
        assert_eq!(feed[0].message, "Rent received from Unit 3");

        let added = feed
            .iter()
            .filter(|a| a.kind == ActivityKind::PropertyAdded)
            .count();
        assert!(added <= RECENT_PROPERTY_LIMIT);
    }

    #[test]
    fn test_activity_without_received_date_uses_now() {
        let properties = vec![property("1", "Maple", 100.0)];
        let mut history = RentHistory::new();
        history.upsert(march(), PropertyId::new("1"), received_on(None));
        history.upsert(march(), PropertyId::new("ghost"), received_on(None));
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 8, 0, 0).unwrap();

        let feed = recent_activity(&properties, &history, march(), now);
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].date, now);
        assert_eq!(feed[0].kind, ActivityKind::RentReceived);
    }

    #[test]
    fn test_record_rows_order_and_amount_fallback() {
        let properties = vec![property("1", "Oak", 500.0), property("2", "Birch", 700.0)];
        let mut history = RentHistory::new();
        let jan = MonthKey::new(2024, 0).unwrap();
        history.upsert(jan, PropertyId::new("1"), RentRecord::default());
        history.upsert(
            march(),
            PropertyId::new("1"),
            RentRecord {
                rent_amount: Some(480.0),
                ..received_on(None)
            },
        );
        history.upsert(march(), PropertyId::new("2"), received_on(None));
        history.upsert(march(), PropertyId::new("99"), received_on(None));

        let rows = record_rows(&properties, &history);
        let names: Vec<_> = rows
            .iter()
            .map(|r| (r.month, r.property_name.as_str()))
            .collect();
        assert_eq!(names, vec![(march(), "Birch"), (march(), "Oak"), (jan, "Oak")]);
        assert_eq!(rows[0].amount, 700.0);
        assert_eq!(rows[1].amount, 480.0);
    }

    #[test]
    fn test_days_late() {
        let record = RentRecord {
            received: true,
            expected_date: NaiveDate::from_ymd_opt(2024, 3, 5),
            received_date: NaiveDate::from_ymd_opt(2024, 3, 9),
            ..Default::default()
        };
        assert_eq!(days_late(&record), Some(4));

        let on_time = RentRecord {
            received_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..record.clone()
        };
        assert_eq!(days_late(&on_time), None);
    }

    #[test]
    fn test_due_date_clamps_to_month_end() {
        let mut p = property("1", "Maple", 100.0);
        p.expected_rent_date = 31;
        let feb = MonthKey::new(2023, 1).unwrap();
        assert_eq!(due_date(&p, feb), NaiveDate::from_ymd_opt(2023, 2, 28));
        assert_eq!(due_date(&p, march()), NaiveDate::from_ymd_opt(2024, 3, 31));
    }

    #[test]
    fn test_projected_rent() {
        let mut p = property("1", "Maple", 1000.0);
        let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        assert_eq!(lease_years(p.lease_start_date, today), 2);

        p.yearly_increase_percent = Some(10.0);
        assert!((projected_rent(&p, today) - 1210.0).abs() < 1e-9);

        p.yearly_increase_percent = None;
        p.yearly_increase_amount = Some(50.0);
        assert_eq!(projected_rent(&p, today), 1100.0);

        let before_anniversary = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
        assert_eq!(projected_rent(&p, before_anniversary), 1000.0);
    }
}

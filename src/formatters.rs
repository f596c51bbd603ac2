use crate::derive::{Activity, ActivityKind, MonthSummary, RecordRow, RentStatus};
use crate::models::{MonthKey, Property, RentHistory, YearlyIncrease};
use crate::tracker::RentDetails;
use chrono::{DateTime, NaiveDate, Utc};
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate)
}

pub fn ordinal_suffix(day: u32) -> &'static str {
    if (4..=20).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

pub fn format_ordinal(day: u32) -> String {
    format!("{}{}", day, ordinal_suffix(day))
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES.get(month as usize).copied().unwrap_or("Unknown")
}

/// "March 2024"
pub fn month_label(key: MonthKey) -> String {
    format!("{} {}", month_name(key.month), key.year)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "-".to_string())
}

/// Human distance between `date` and `now`.
pub fn format_relative_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - date).num_hours();
    if hours < 1 {
        return "Just now".to_string();
    }
    if hours < 24 {
        return format!("{} hour{} ago", hours, if hours > 1 { "s" } else { "" });
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{} day{} ago", days, if days > 1 { "s" } else { "" });
    }
    date.format("%-m/%-d/%Y").to_string()
}

pub fn format_properties_table(properties: &[Property], history: &RentHistory, key: MonthKey) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![
        Cell::new("ID").style_spec("bFc"),
        Cell::new("Property").style_spec("bFc"),
        Cell::new("Renter").style_spec("bFc"),
        Cell::new("Address").style_spec("bFc"),
        Cell::new("Rent").style_spec("bFc"),
        Cell::new("Due").style_spec("bFc"),
        Cell::new(&month_label(key)).style_spec("bFc"),
    ]));

    for property in properties {
        let status = crate::derive::rent_status(history, key, &property.id);
        table.add_row(Row::new(vec![
            Cell::new(property.id.as_str()),
            Cell::new(&property.name),
            Cell::new(&property.renter_name),
            Cell::new(&property.address),
            Cell::new(&format_currency(property.rent())).style_spec("Fg"),
            Cell::new(&format_ordinal(property.expected_rent_date)),
            status_cell(status),
        ]));
    }

    table.to_string()
}

pub fn format_properties_csv(
    properties: &[Property],
    history: &RentHistory,
    key: MonthKey,
) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "ID",
        "Property",
        "Renter",
        "Contact",
        "Address",
        "Rent",
        "Due Day",
        "Lease Start",
        "Status",
    ])?;

    for property in properties {
        let status = crate::derive::rent_status(history, key, &property.id);
        writer.write_record([
            property.id.to_string(),
            property.name.clone(),
            property.renter_name.clone(),
            property.renter_contact.clone(),
            property.address.clone(),
            format!("{:.2}", property.rent()),
            property.expected_rent_date.to_string(),
            format_date(property.lease_start_date),
            status.label().to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn format_properties_markdown(properties: &[Property], history: &RentHistory, key: MonthKey) -> String {
    let mut md = String::new();
    md.push_str(&format!("### Properties for {}\n\n", month_label(key)));
    md.push_str("| ID | Property | Renter | Address | Rent | Due | Status |\n");
    md.push_str("|----|----------|--------|---------|------|-----|--------|\n");

    for property in properties {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            property.id,
            property.name,
            property.renter_name,
            property.address,
            format_currency(property.rent()),
            format_ordinal(property.expected_rent_date),
            crate::derive::rent_status(history, key, &property.id).label(),
        ));
    }

    md
}

pub fn format_records_table(rows: &[RecordRow]) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![
        Cell::new("Property").style_spec("bFc"),
        Cell::new("Renter").style_spec("bFc"),
        Cell::new("Month").style_spec("bFc"),
        Cell::new("Amount").style_spec("bFc"),
        Cell::new("Status").style_spec("bFc"),
        Cell::new("Received Date").style_spec("bFc"),
        Cell::new("Payment Mode").style_spec("bFc"),
        Cell::new("Days Late").style_spec("bFc"),
    ]));

    for row in rows {
        table.add_row(Row::new(vec![
            Cell::new(&row.property_name),
            Cell::new(&row.renter_name),
            Cell::new(&month_label(row.month)),
            Cell::new(&format_currency(row.amount)).style_spec("Fg"),
            status_cell(row.status),
            Cell::new(&format_optional_date(row.received_date)),
            Cell::new(row.payment_mode.as_deref().unwrap_or("-")),
            Cell::new(&row.days_late.map(|d| d.to_string()).unwrap_or_default()),
        ]));
    }

    table.to_string()
}

fn status_cell(status: RentStatus) -> Cell {
    match status {
        RentStatus::Received => Cell::new("Received").style_spec("Fg"),
        RentStatus::Pending => Cell::new("Pending").style_spec("Fy"),
    }
}

pub fn format_records_csv(rows: &[RecordRow]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Property",
        "Renter",
        "Year",
        "Month",
        "Amount",
        "Status",
        "Expected Date",
        "Received Date",
        "Payment Mode",
        "Days Late",
    ])?;

    for row in rows {
        writer.write_record([
            row.property_name.clone(),
            row.renter_name.clone(),
            row.month.year.to_string(),
            month_name(row.month.month).to_string(),
            format!("{:.2}", row.amount),
            row.status.label().to_string(),
            row.expected_date.map(format_date).unwrap_or_default(),
            row.received_date.map(format_date).unwrap_or_default(),
            row.payment_mode.clone().unwrap_or_default(),
            row.days_late.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn format_records_markdown(rows: &[RecordRow]) -> String {
    let mut md = String::new();
    md.push_str("| Property | Renter | Month | Amount | Status | Received Date | Payment Mode |\n");
    md.push_str("|----------|--------|-------|--------|--------|---------------|--------------|\n");

    for row in rows {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            row.property_name,
            row.renter_name,
            month_label(row.month),
            format_currency(row.amount),
            row.status.label(),
            format_optional_date(row.received_date),
            row.payment_mode.as_deref().unwrap_or("-"),
        ));
    }

    md
}

pub fn format_summary_markdown(summary: &MonthSummary) -> String {
    format!(
        "### {} Summary\n\n| Properties | Expected | Collected | Pending | Rate |\n|---|---|---|---|---|\n| {} | {} | {} | {} | {} |\n",
        month_label(summary.month),
        summary.total_properties,
        format_currency(summary.expected),
        format_currency(summary.collected),
        format_currency(summary.pending),
        format_rate(summary.collection_rate),
    )
}

pub fn format_summary_csv(summary: &MonthSummary) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Month", "Properties", "Expected", "Collected", "Pending", "Rate"])?;
    writer.write_record([
        month_label(summary.month),
        summary.total_properties.to_string(),
        format!("{:.2}", summary.expected),
        format!("{:.2}", summary.collected),
        format!("{:.2}", summary.pending),
        format!("{:.1}", summary.collection_rate),
    ])?;

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn format_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

pub fn print_summary(summary: &MonthSummary) {
    println!(
        "\n{}",
        format!("=== {} Summary ===", month_label(summary.month))
            .bright_cyan()
            .bold()
    );
    println!("  Total Properties: {}", summary.total_properties.to_string().cyan());
    println!("  Expected: {}", format_currency(summary.expected).cyan());
    println!("  Collected: {}", format_currency(summary.collected).green().bold());
    println!("  Pending: {}", format_currency(summary.pending).yellow());
    println!("  Collection Rate: {}", format_rate(summary.collection_rate).bold());
}

pub fn print_property_details(details: &RentDetails, today: NaiveDate) {
    let property = &details.property;
    println!("\n{}", property.name.bright_cyan().bold());
    println!("  Address: {}", property.address);
    println!("  Renter: {}", property.renter_name);
    if !property.renter_contact.is_empty() {
        println!("  Contact: {}", property.renter_contact);
    }
    println!("  Current Rent: {}", format_currency(property.rent()).green());
    println!("  Initial Rent: {}", format_currency(property.initial_rent));
    println!("  Rent Due: {} of each month", format_ordinal(property.expected_rent_date));
    println!("  Lease Start: {}", format_date(property.lease_start_date));
    match property.yearly_increase() {
        Some(YearlyIncrease::Percent(p)) => println!("  Yearly Increase: {}%", p),
        Some(YearlyIncrease::Amount(a)) => println!("  Yearly Increase: {}", format_currency(a)),
        None => {}
    }
    let projected = crate::derive::projected_rent(property, today);
    if (projected - property.rent()).abs() > f64::EPSILON {
        println!("  Rent After Increases: {}", format_currency(projected).yellow());
    }

    let record = &details.record;
    println!("\n  {}", month_label(details.month).bold());
    let status = if record.received {
        "Received".green()
    } else {
        "Pending".yellow()
    };
    println!("    Status: {}", status);
    println!("    Amount: {}", format_currency(details.amount()));
    println!("    Expected Date: {}", format_optional_date(record.expected_date));
    println!("    Received Date: {}", format_optional_date(record.received_date));
    println!("    Payment Mode: {}", record.payment_mode.as_deref().unwrap_or("-"));
}

pub fn print_activity(activities: &[Activity], now: DateTime<Utc>) {
    if activities.is_empty() {
        println!("No recent activity");
        return;
    }
    for activity in activities {
        let marker = match activity.kind {
            ActivityKind::PropertyAdded => "+".cyan(),
            ActivityKind::RentReceived => "$".green(),
        };
        println!(
            "{} {}  {}",
            marker,
            activity.message,
            format_relative_date(activity.date, now).dimmed()
        );
    }
}

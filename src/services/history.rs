use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::database::models::{BookingHistoryEntry, BookingSnapshot, FieldChange};

/// Renders the human-readable diff between two audit snapshots. The diff is
/// computed lazily at read time from the stored pair; nothing pre-rendered is
/// ever persisted, which keeps the append-only log minimal.
pub fn render_diff(old: &BookingSnapshot, new: &BookingSnapshot) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    let mut push = |field: &str, label: &str, before: String, after: String| {
        if before != after {
            changes.push(FieldChange {
                field: field.to_string(),
                label: label.to_string(),
                before,
                after,
            });
        }
    };

    push(
        "customerName",
        "Customer",
        old.customer_name.clone(),
        new.customer_name.clone(),
    );
    push(
        "customerPhone",
        "Phone",
        fmt_opt(&old.customer_phone),
        fmt_opt(&new.customer_phone),
    );
    push(
        "customerEmail",
        "Email",
        fmt_opt(&old.customer_email),
        fmt_opt(&new.customer_email),
    );
    push(
        "bookingDate",
        "Date",
        old.booking_date.to_string(),
        new.booking_date.to_string(),
    );
    push(
        "startTime",
        "Start",
        old.start_time.format("%H:%M").to_string(),
        new.start_time.format("%H:%M").to_string(),
    );
    push(
        "endTime",
        "End",
        old.end_time.format("%H:%M").to_string(),
        new.end_time.format("%H:%M").to_string(),
    );
    push(
        "passengers",
        "Passengers",
        old.passengers.to_string(),
        new.passengers.to_string(),
    );
    push(
        "packageType",
        "Package",
        old.package_type.to_string(),
        new.package_type.to_string(),
    );
    push(
        "category",
        "Category",
        old.category.to_string(),
        new.category.to_string(),
    );
    push(
        "isBareBoat",
        "Bare boat",
        fmt_bool(old.is_bare_boat),
        fmt_bool(new.is_bare_boat),
    );
    push(
        "agentId",
        "Agent",
        fmt_opt_id(&old.agent_id),
        fmt_opt_id(&new.agent_id),
    );
    push(
        "captainId",
        "Captain",
        fmt_opt_id(&old.captain_id),
        fmt_opt_id(&new.captain_id),
    );
    push(
        "sailorIds",
        "Sailors",
        fmt_ids(&old.sailor_ids),
        fmt_ids(&new.sailor_ids),
    );
    push(
        "totalPrice",
        "Total price",
        fmt_money(&old.total_price),
        fmt_money(&new.total_price),
    );
    push(
        "depositAmount",
        "Deposit",
        fmt_money(&old.deposit_amount),
        fmt_money(&new.deposit_amount),
    );
    push(
        "depositPaid",
        "Deposit paid",
        fmt_bool(old.deposit_paid),
        fmt_bool(new.deposit_paid),
    );
    push(
        "discountPercentage",
        "Discount %",
        old.discount_percentage.to_string(),
        new.discount_percentage.to_string(),
    );
    push(
        "captainFee",
        "Captain fee",
        fmt_money(&old.captain_fee),
        fmt_money(&new.captain_fee),
    );
    push(
        "sailorFee",
        "Sailor fee",
        fmt_money(&old.sailor_fee),
        fmt_money(&new.sailor_fee),
    );
    push(
        "fuelCost",
        "Fuel cost",
        fmt_money(&old.fuel_cost),
        fmt_money(&new.fuel_cost),
    );
    push(
        "packageAddonCost",
        "Package add-on cost",
        fmt_money(&old.package_addon_cost),
        fmt_money(&new.package_addon_cost),
    );
    push(
        "agentCommission",
        "Agent commission",
        fmt_money(&old.agent_commission),
        fmt_money(&new.agent_commission),
    );
    push(
        "status",
        "Status",
        old.status.to_string(),
        new.status.to_string(),
    );
    push("notes", "Notes", fmt_opt(&old.notes), fmt_opt(&new.notes));

    changes
}

/// Diff for one stored history entry; None when either snapshot is absent
/// (creation entries only carry `new_data`).
pub fn entry_diff(entry: &BookingHistoryEntry) -> Option<Vec<FieldChange>> {
    let old: BookingSnapshot = serde_json::from_value(entry.old_data.clone()?).ok()?;
    let new: BookingSnapshot = serde_json::from_value(entry.new_data.clone()?).ok()?;
    Some(render_diff(&old, &new))
}

fn fmt_opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn fmt_opt_id(value: &Option<Uuid>) -> String {
    value.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

fn fmt_ids(ids: &[Uuid]) -> String {
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn fmt_bool(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn fmt_money(value: &BigDecimal) -> String {
    value.with_scale(2).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{BookingCategory, BookingStatus, PackageType};
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn snapshot() -> BookingSnapshot {
        BookingSnapshot {
            customer_name: "Alice".to_string(),
            customer_phone: None,
            customer_email: Some("alice@example.com".to_string()),
            boat_id: Uuid::new_v4(),
            agent_id: None,
            captain_id: None,
            sailor_ids: vec![],
            booking_date: NaiveDate::from_ymd_opt(2026, 7, 14).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            passengers: 6,
            package_type: PackageType::CharterOnly,
            category: BookingCategory::Commercial,
            is_bare_boat: false,
            total_price: BigDecimal::from_str("850").unwrap(),
            deposit_amount: BigDecimal::from_str("200").unwrap(),
            deposit_paid: false,
            discount_percentage: BigDecimal::from(0),
            captain_fee: BigDecimal::from(100),
            sailor_fee: BigDecimal::from(0),
            fuel_cost: BigDecimal::from(0),
            package_addon_cost: BigDecimal::from(0),
            agent_commission: BigDecimal::from(0),
            status: BookingStatus::PendingHold,
            notes: None,
        }
    }

    #[test]
    fn identical_snapshots_produce_no_changes() {
        let snap = snapshot();
        assert_eq!(render_diff(&snap, &snap), vec![]);
    }

    #[test]
    fn changed_fields_are_rendered_with_labels() {
        let old = snapshot();
        let mut new = snapshot();
        new.passengers = 8;
        new.package_type = PackageType::CharterFull;
        new.status = BookingStatus::Confirmed;

        let diff = render_diff(&old, &new);
        assert_eq!(diff.len(), 3);

        assert_eq!(diff[0].field, "passengers");
        assert_eq!(diff[0].label, "Passengers");
        assert_eq!(diff[0].before, "6");
        assert_eq!(diff[0].after, "8");

        assert_eq!(diff[1].field, "packageType");
        assert_eq!(diff[1].before, "charter_only");
        assert_eq!(diff[1].after, "charter_full");

        assert_eq!(diff[2].field, "status");
        assert_eq!(diff[2].before, "pending_hold");
        assert_eq!(diff[2].after, "confirmed");
    }

    #[test]
    fn money_renders_with_two_places() {
        let old = snapshot();
        let mut new = snapshot();
        new.total_price = BigDecimal::from_str("912.5").unwrap();

        let diff = render_diff(&old, &new);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].label, "Total price");
        assert_eq!(diff[0].before, "850.00");
        assert_eq!(diff[0].after, "912.50");
    }

    #[test]
    fn optional_fields_render_as_dash() {
        let old = snapshot();
        let mut new = snapshot();
        new.customer_phone = Some("+30 694 000 000".to_string());

        let diff = render_diff(&old, &new);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].before, "-");
        assert_eq!(diff[0].after, "+30 694 000 000");
    }
}

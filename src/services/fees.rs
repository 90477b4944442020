use bigdecimal::{BigDecimal, RoundingMode, Zero};

use crate::database::models::{CrewMember, FeeMode, PackageType};

/// Every monetary result is rounded to 2 decimal places here, at the point the
/// value is produced for storage. Callers recompute from stored inputs instead
/// of adjusting stored results incrementally, so no drift accumulates.
pub fn round2(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

/// Fee owed to the captain for a charter of `duration_hours`. The fee mode is
/// explicit: hourly captains charge rate x hours, flat-day captains charge
/// their day rate regardless of duration, and owners charge nothing.
pub fn captain_fee(captain: Option<&CrewMember>, duration_hours: &BigDecimal) -> BigDecimal {
    match captain {
        Some(c) => match c.fee_mode {
            FeeMode::Hourly => round2(&(&c.hourly_rate * duration_hours)),
            FeeMode::FlatDay => round2(&c.flat_day_rate),
            FeeMode::None => BigDecimal::zero(),
        },
        None => BigDecimal::zero(),
    }
}

pub fn sailor_fee(hourly_rate: &BigDecimal, duration_hours: &BigDecimal) -> BigDecimal {
    round2(&(hourly_rate * duration_hours))
}

/// Aggregate fee across all assigned sailors.
pub fn total_sailor_fee(sailors: &[CrewMember], duration_hours: &BigDecimal) -> BigDecimal {
    let total = sailors
        .iter()
        .map(|s| sailor_fee(&s.hourly_rate, duration_hours))
        .sum::<BigDecimal>();
    round2(&total)
}

pub fn agent_commission(total_price: &BigDecimal, commission_percentage: &BigDecimal) -> BigDecimal {
    round2(&(total_price * commission_percentage / BigDecimal::from(100)))
}

/// Zero when the boat has no fuel configuration (non-motorized or unset).
pub fn fuel_cost(
    consumption_lph: Option<&BigDecimal>,
    price_per_liter: Option<&BigDecimal>,
    duration_hours: &BigDecimal,
) -> BigDecimal {
    match (consumption_lph, price_per_liter) {
        (Some(rate), Some(price)) => round2(&(rate * price * duration_hours)),
        _ => BigDecimal::zero(),
    }
}

/// Operator-side cost of the package tier, distinct from the customer price.
pub fn package_addon_cost(
    package_type: PackageType,
    passengers: i32,
    drinks_cost_per_person: &BigDecimal,
    food_cost_per_person: &BigDecimal,
) -> BigDecimal {
    let passengers = BigDecimal::from(passengers);
    let cost = match package_type {
        PackageType::CharterOnly => BigDecimal::zero(),
        PackageType::CharterDrinks => drinks_cost_per_person * &passengers,
        PackageType::CharterFood => food_cost_per_person * &passengers,
        PackageType::CharterFull => (drinks_cost_per_person + food_cost_per_person) * &passengers,
    };
    round2(&cost)
}

pub fn discounted_price(price: &BigDecimal, discount_percentage: &BigDecimal) -> BigDecimal {
    round2(&(price * (BigDecimal::from(100) - discount_percentage) / BigDecimal::from(100)))
}

#[allow(clippy::too_many_arguments)]
pub fn net_profit(
    total_price: &BigDecimal,
    captain_fee: &BigDecimal,
    sailor_fee: &BigDecimal,
    agent_commission: &BigDecimal,
    fuel_cost: &BigDecimal,
    package_addon_cost: &BigDecimal,
) -> BigDecimal {
    round2(&(total_price - captain_fee - sailor_fee - agent_commission - fuel_cost - package_addon_cost))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitClass {
    Profitable,
    BreakEven,
    Loss,
}

/// Classification thresholds are a display policy, configurable via
/// `Config::profit_threshold`, not a financial rule.
pub fn classify_profit(net: &BigDecimal, threshold: &BigDecimal) -> ProfitClass {
    if net > threshold {
        ProfitClass::Profitable
    } else if net < &(-threshold) {
        ProfitClass::Loss
    } else {
        ProfitClass::BreakEven
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::CrewRole;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn crew(role: CrewRole, fee_mode: FeeMode, hourly: &str, flat: &str) -> CrewMember {
        CrewMember {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            name: "Test".to_string(),
            role,
            fee_mode,
            hourly_rate: dec(hourly),
            flat_day_rate: dec(flat),
            commission_percentage: BigDecimal::zero(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn hourly_captain_charges_rate_times_hours() {
        let captain = crew(CrewRole::Captain, FeeMode::Hourly, "25", "0");
        assert_eq!(captain_fee(Some(&captain), &dec("4")), dec("100.00"));
    }

    #[test]
    fn flat_day_captain_ignores_duration() {
        let captain = crew(CrewRole::Captain, FeeMode::FlatDay, "0", "180");
        assert_eq!(captain_fee(Some(&captain), &dec("4")), dec("180.00"));
        assert_eq!(captain_fee(Some(&captain), &dec("8")), dec("180.00"));
    }

    #[test]
    fn owner_captain_and_no_captain_are_free() {
        let owner = crew(CrewRole::Captain, FeeMode::None, "25", "180");
        assert_eq!(captain_fee(Some(&owner), &dec("4")), BigDecimal::zero());
        assert_eq!(captain_fee(None, &dec("4")), BigDecimal::zero());
    }

    #[test]
    fn sailor_fee_is_rate_times_hours() {
        assert_eq!(sailor_fee(&dec("15"), &dec("4")), dec("60.00"));
    }

    #[test]
    fn total_sailor_fee_sums_over_crew() {
        let sailors = vec![
            crew(CrewRole::Sailor, FeeMode::Hourly, "15", "0"),
            crew(CrewRole::Sailor, FeeMode::Hourly, "12.50", "0"),
        ];
        assert_eq!(total_sailor_fee(&sailors, &dec("4")), dec("110.00"));
    }

    #[test]
    fn agent_commission_is_percentage_of_price() {
        assert_eq!(agent_commission(&dec("850"), &dec("10")), dec("85.00"));
        assert_eq!(agent_commission(&dec("333"), &dec("15")), dec("49.95"));
    }

    #[test]
    fn fuel_cost_needs_full_configuration() {
        assert_eq!(fuel_cost(Some(&dec("20")), Some(&dec("1.80")), &dec("4")), dec("144.00"));
        assert_eq!(fuel_cost(None, Some(&dec("1.80")), &dec("4")), BigDecimal::zero());
        assert_eq!(fuel_cost(Some(&dec("20")), None, &dec("4")), BigDecimal::zero());
    }

    #[test]
    fn package_addon_cost_matches_tier() {
        let drinks = dec("12");
        let food = dec("22");
        assert_eq!(
            package_addon_cost(PackageType::CharterOnly, 8, &drinks, &food),
            BigDecimal::zero()
        );
        assert_eq!(
            package_addon_cost(PackageType::CharterDrinks, 8, &drinks, &food),
            dec("96.00")
        );
        assert_eq!(
            package_addon_cost(PackageType::CharterFood, 8, &drinks, &food),
            dec("176.00")
        );
        assert_eq!(
            package_addon_cost(PackageType::CharterFull, 8, &drinks, &food),
            dec("272.00")
        );
    }

    #[test]
    fn package_addon_recomputation_is_idempotent() {
        let drinks = dec("12.34");
        let food = dec("5.67");
        let first = package_addon_cost(PackageType::CharterFull, 7, &drinks, &food);
        let second = package_addon_cost(PackageType::CharterFull, 7, &drinks, &food);
        assert_eq!(first, second);
    }

    #[test]
    fn discount_reduces_price() {
        assert_eq!(discounted_price(&dec("1000"), &dec("10")), dec("900.00"));
        assert_eq!(discounted_price(&dec("850"), &dec("0")), dec("850.00"));
    }

    #[test]
    fn net_profit_subtracts_every_cost() {
        let net = net_profit(
            &dec("1000"),
            &dec("100"),
            &dec("60"),
            &dec("85"),
            &dec("144"),
            &dec("272"),
        );
        assert_eq!(net, dec("339.00"));
    }

    #[test]
    fn profit_classification_uses_threshold() {
        let threshold = dec("10");
        assert_eq!(classify_profit(&dec("10.01"), &threshold), ProfitClass::Profitable);
        assert_eq!(classify_profit(&dec("10"), &threshold), ProfitClass::BreakEven);
        assert_eq!(classify_profit(&dec("-10"), &threshold), ProfitClass::BreakEven);
        assert_eq!(classify_profit(&dec("-10.01"), &threshold), ProfitClass::Loss);
        assert_eq!(classify_profit(&BigDecimal::zero(), &threshold), ProfitClass::BreakEven);
    }

    #[test]
    fn rounding_happens_half_up_at_two_places() {
        assert_eq!(round2(&dec("10.005")), dec("10.01"));
        assert_eq!(round2(&dec("10.004")), dec("10.00"));
    }
}

//! Household grouping for the child alert.

use safetynet_core::{CombinedPersonRecord, Household, HouseholdMember, ADULT_AGE};

/// Records aged 0 to 17 inclusive.
pub fn extract_children(combined: &[CombinedPersonRecord]) -> Vec<&CombinedPersonRecord> {
    combined
        .iter()
        .filter(|record| (0..ADULT_AGE).contains(&record.age))
        .collect()
}

/// One household per child, built from everyone sharing the child's last name and address.
///
/// Members are ordered children first then adults, each part by ascending age with ties
/// kept in input order. Households with an identical member list are emitted once.
pub fn fetch_households(
    all: &[CombinedPersonRecord],
    children: &[&CombinedPersonRecord],
) -> Vec<Household> {
    let mut households: Vec<Household> = Vec::new();

    for child in children {
        let (mut minors, mut adults): (Vec<HouseholdMember>, Vec<HouseholdMember>) = all
            .iter()
            .filter(|record| record.last_name == child.last_name && record.address == child.address)
            .map(HouseholdMember::from)
            .partition(|member| member.age < ADULT_AGE);

        minors.sort_by_key(|member| member.age);
        adults.sort_by_key(|member| member.age);
        minors.append(&mut adults);

        let household = Household {
            household_members: minors,
        };
        if !households.contains(&household) {
            households.push(household);
        }
    }

    households
}

/// `"<member count> <last name of first member>"`.
///
/// Two households of the same size headed by the same last name produce the same key.
pub fn household_key(household: &Household) -> String {
    let last_name = household
        .household_members
        .first()
        .map(|member| member.last_name.as_str())
        .unwrap_or_default();
    format!("{} {}", household.household_members.len(), last_name)
}

//! Alert views composed from the joins and household grouping.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;
use safetynet_core::{
    CombinedPersonRecord, CountMap, DataSnapshot, Firestation, HouseholdMap, Inhabitant,
    PersonInfo, Result, StationCoverage,
};

use crate::household::{extract_children, fetch_households, household_key};
use crate::join::{combine, persons_by_addresses, records_for};

/// Addresses covered by `station`, in store order.
pub fn station_addresses(firestations: &[Firestation], station: u32) -> Vec<String> {
    firestations
        .iter()
        .filter(|firestation| firestation.station == station)
        .map(|firestation| firestation.address.clone())
        .collect()
}

/// Station of the first mapping for `address`.
pub fn station_for_address(firestations: &[Firestation], address: &str) -> Option<u32> {
    firestations
        .iter()
        .find(|firestation| firestation.address == address)
        .map(|firestation| firestation.station)
}

pub fn count_adults_and_children(combined: &[CombinedPersonRecord]) -> CountMap {
    let adults = combined.iter().filter(|record| record.is_adult()).count() as u64;
    CountMap {
        adults,
        children: combined.len() as u64 - adults,
    }
}

fn residents_of<S: AsRef<str>>(
    snapshot: &DataSnapshot,
    addresses: &[S],
    reference: NaiveDate,
) -> Result<Vec<CombinedPersonRecord>> {
    let persons = persons_by_addresses(&snapshot.persons, addresses);
    let records = records_for(&persons, &snapshot.medicalrecords);
    combine(&persons, &records, reference)
}

/// Everyone covered by one station, with an adult / child count.
pub fn station_coverage(
    snapshot: &DataSnapshot,
    station: u32,
    reference: NaiveDate,
) -> Result<StationCoverage> {
    let addresses = station_addresses(&snapshot.firestations, station);
    let persons = residents_of(snapshot, &addresses, reference)?;
    let count = count_adults_and_children(&persons);
    debug!(
        "station {station}: {} addresses, {} adults, {} children",
        addresses.len(),
        count.adults,
        count.children
    );
    Ok(StationCoverage { persons, count })
}

/// Inhabitants per requested station, each tagged with its station number.
pub fn flood_stations(
    snapshot: &DataSnapshot,
    stations: &[u32],
    reference: NaiveDate,
) -> Result<BTreeMap<u32, Vec<Inhabitant>>> {
    let mut response = BTreeMap::new();

    for &station in stations {
        let addresses = station_addresses(&snapshot.firestations, station);
        let inhabitants = residents_of(snapshot, &addresses, reference)?
            .into_iter()
            .map(|record| Inhabitant::tagged(record, Some(station)))
            .collect::<Vec<_>>();
        debug!("flood station {station}: {} inhabitants", inhabitants.len());
        response.insert(station, inhabitants);
    }

    Ok(response)
}

/// Inhabitants of one address, tagged with the station covering it (if any).
pub fn fire_by_address(
    snapshot: &DataSnapshot,
    address: &str,
    reference: NaiveDate,
) -> Result<Vec<Inhabitant>> {
    let station = station_for_address(&snapshot.firestations, address);
    let inhabitants = residents_of(snapshot, &[address], reference)?
        .into_iter()
        .map(|record| Inhabitant::tagged(record, station))
        .collect::<Vec<_>>();
    debug!(
        "fire at {address}: station {station:?}, {} inhabitants",
        inhabitants.len()
    );
    Ok(inhabitants)
}

/// Households with children at `address`, or `None` when no child lives there.
///
/// Keys come from [`household_key`]; a later household with the same key replaces an
/// earlier one.
pub fn child_alert(
    snapshot: &DataSnapshot,
    address: &str,
    reference: NaiveDate,
) -> Result<Option<HouseholdMap>> {
    let residents = residents_of(snapshot, &[address], reference)?;
    let children = extract_children(&residents);
    if children.is_empty() {
        debug!("child alert at {address}: no child");
        return Ok(None);
    }

    let mut response = HouseholdMap::new();
    for household in fetch_households(&residents, &children) {
        response.insert(household_key(&household), household);
    }
    Ok(Some(response))
}

/// Distinct phone numbers of everyone covered by `station`, first occurrence first.
pub fn phone_alert(snapshot: &DataSnapshot, station: u32) -> Vec<String> {
    let addresses = station_addresses(&snapshot.firestations, station);
    let mut phones: Vec<String> = Vec::new();
    for person in persons_by_addresses(&snapshot.persons, &addresses) {
        if !phones.contains(&person.phone) {
            phones.push(person.phone.clone());
        }
    }
    phones
}

/// Persons named exactly `first_name last_name`, joined against every medical record.
pub fn person_info(
    snapshot: &DataSnapshot,
    first_name: &str,
    last_name: &str,
    reference: NaiveDate,
) -> Result<Vec<PersonInfo>> {
    let persons: Vec<_> = snapshot
        .persons
        .iter()
        .filter(|person| person.has_name(first_name, last_name))
        .collect();
    let records: Vec<_> = snapshot.medicalrecords.iter().collect();

    Ok(combine(&persons, &records, reference)?
        .into_iter()
        .map(PersonInfo::from)
        .collect())
}

/// Distinct emails of persons living in `city` (case-insensitive), first occurrence first.
pub fn community_email(snapshot: &DataSnapshot, city: &str) -> Vec<String> {
    let city = city.to_lowercase();
    let mut emails: Vec<String> = Vec::new();
    for person in snapshot
        .persons
        .iter()
        .filter(|person| person.city.to_lowercase() == city)
    {
        if !emails.contains(&person.email) {
            emails.push(person.email.clone());
        }
    }
    emails
}

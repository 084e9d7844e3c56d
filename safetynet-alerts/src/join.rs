//! Name and address joins between persons, medical records and fire stations.

use chrono::NaiveDate;
use log::debug;
use safetynet_core::{calculate_age, CombinedPersonRecord, MedicalRecord, Person, Result};

/// Persons whose address is one of `addresses` (exact match), in input order.
pub fn persons_by_addresses<'a, S>(persons: &'a [Person], addresses: &[S]) -> Vec<&'a Person>
where
    S: AsRef<str>,
{
    persons
        .iter()
        .filter(|person| {
            addresses
                .iter()
                .any(|address| address.as_ref() == person.address)
        })
        .collect()
}

/// First record carrying exactly this name.
pub fn match_record<'a>(
    records: &'a [MedicalRecord],
    first_name: &str,
    last_name: &str,
) -> Option<&'a MedicalRecord> {
    records
        .iter()
        .find(|record| record.has_name(first_name, last_name))
}

/// The first matching record of each person, in person order.
pub fn records_for<'a>(persons: &[&Person], records: &'a [MedicalRecord]) -> Vec<&'a MedicalRecord> {
    persons
        .iter()
        .filter_map(|person| match_record(records, &person.first_name, &person.last_name))
        .collect()
}

/// Inner join of persons and records on `(firstName, lastName)`.
///
/// Every matching pair yields one record, ordered by person then by record. A person
/// without a medical record is left out of the result rather than reported.
pub fn combine(
    persons: &[&Person],
    records: &[&MedicalRecord],
    reference: NaiveDate,
) -> Result<Vec<CombinedPersonRecord>> {
    let mut combined = Vec::new();

    for person in persons {
        let mut matched = false;
        for record in records
            .iter()
            .filter(|record| record.has_name(&person.first_name, &person.last_name))
        {
            let age = calculate_age(&record.birthdate, reference)?;
            combined.push(CombinedPersonRecord::from_parts(person, record, age));
            matched = true;
        }

        if !matched {
            debug!(
                "no medical record for {} {}, omitted",
                person.first_name, person.last_name
            );
        }
    }

    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use safetynet_core::AlertsError;

    fn person(first: &str, last: &str, address: &str) -> Person {
        Person {
            first_name: first.into(),
            last_name: last.into(),
            address: address.into(),
            ..Person::default()
        }
    }

    fn record(first: &str, last: &str, birthdate: &str) -> MedicalRecord {
        MedicalRecord {
            first_name: first.into(),
            last_name: last.into(),
            birthdate: birthdate.into(),
            ..MedicalRecord::default()
        }
    }

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn filters_by_address_membership() {
        let persons = vec![
            person("John", "Boyd", "1509 Culver St"),
            person("Peter", "Duncan", "644 Gershwin Cir"),
            person("Tenley", "Boyd", "1509 Culver St"),
        ];
        let found = persons_by_addresses(&persons, &["1509 Culver St"]);
        let names: Vec<_> = found.iter().map(|p| p.first_name.as_str()).collect();
        assert_eq!(names, ["John", "Tenley"]);

        assert!(persons_by_addresses(&persons, &["1509 culver st"]).is_empty());
    }

    #[test]
    fn match_record_requires_both_names() {
        let records = vec![record("John", "Boyd", "03/06/1984")];
        assert!(match_record(&records, "John", "Boyd").is_some());
        assert!(match_record(&records, "John", "Smith").is_none());
        assert!(match_record(&records, "JOHN", "Boyd").is_none());
    }

    #[test]
    fn combine_drops_persons_without_record() {
        let persons = vec![
            person("John", "Boyd", "1509 Culver St"),
            person("Ghost", "Boyd", "1509 Culver St"),
            person("Tenley", "Boyd", "1509 Culver St"),
        ];
        let records = vec![
            record("Tenley", "Boyd", "02/18/2012"),
            record("John", "Boyd", "03/06/1984"),
        ];
        let person_refs: Vec<_> = persons.iter().collect();
        let record_refs: Vec<_> = records.iter().collect();

        let combined = combine(&person_refs, &record_refs, reference()).unwrap();
        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].first_name, "John");
        assert_eq!(combined[0].age, 39);
        assert_eq!(combined[1].first_name, "Tenley");
        assert_eq!(combined[1].age, 11);
    }

    #[test]
    fn records_for_follows_person_order() {
        let persons = vec![
            person("Tenley", "Boyd", "1509 Culver St"),
            person("Ghost", "Boyd", "1509 Culver St"),
            person("John", "Boyd", "1509 Culver St"),
        ];
        let records = vec![
            record("John", "Boyd", "03/06/1984"),
            record("Tenley", "Boyd", "02/18/2012"),
        ];
        let person_refs: Vec<_> = persons.iter().collect();
        let picked = records_for(&person_refs, &records);
        let names: Vec<_> = picked.iter().map(|r| r.first_name.as_str()).collect();
        assert_eq!(names, ["Tenley", "John"]);
    }

    #[test]
    fn combine_propagates_bad_birthdate() {
        let persons = vec![person("John", "Boyd", "1509 Culver St")];
        let records = vec![record("John", "Boyd", "1984-03-06")];
        let person_refs: Vec<_> = persons.iter().collect();
        let record_refs: Vec<_> = records.iter().collect();

        let err = combine(&person_refs, &record_refs, reference()).unwrap_err();
        assert!(matches!(err, AlertsError::InvalidBirthdate { .. }));
    }
}

//! Thao tác CRUD trên snapshot trong bộ nhớ. Việc nạp / ghi file do store đảm nhiệm.

use serde::{Deserialize, Serialize};

use crate::age::parse_birthdate;
use crate::{AlertsError, DataSnapshot, Firestation, MedicalRecord, Person, Result};

/// Các trường cập nhật của cư dân; `None` giữ nguyên giá trị cũ.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonPatch {
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl From<&Person> for PersonPatch {
    fn from(person: &Person) -> Self {
        Self {
            address: Some(person.address.clone()),
            city: Some(person.city.clone()),
            zip: Some(person.zip.clone()),
            phone: Some(person.phone.clone()),
            email: Some(person.email.clone()),
        }
    }
}

/// Các trường cập nhật của hồ sơ y tế; `None` giữ nguyên giá trị cũ.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MedicalRecordPatch {
    pub birthdate: Option<String>,
    pub medications: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
}

fn apply(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn person_not_found(first_name: &str, last_name: &str) -> AlertsError {
    AlertsError::PersonNotFound {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

fn record_not_found(first_name: &str, last_name: &str) -> AlertsError {
    AlertsError::MedicalRecordNotFound {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

impl DataSnapshot {
    pub fn person(&self, first_name: &str, last_name: &str) -> Result<&Person> {
        self.persons
            .iter()
            .find(|person| person.has_name(first_name, last_name))
            .ok_or_else(|| person_not_found(first_name, last_name))
    }

    /// Thêm cư dân, không kiểm tra trùng tên.
    pub fn add_person(&mut self, person: Person) {
        self.persons.push(person);
    }

    /// Chỉ cập nhật cư dân khớp đầu tiên.
    pub fn update_person(
        &mut self,
        first_name: &str,
        last_name: &str,
        patch: PersonPatch,
    ) -> Result<()> {
        let person = self
            .persons
            .iter_mut()
            .find(|person| person.has_name(first_name, last_name))
            .ok_or_else(|| person_not_found(first_name, last_name))?;

        apply(&mut person.address, patch.address);
        apply(&mut person.city, patch.city);
        apply(&mut person.zip, patch.zip);
        apply(&mut person.phone, patch.phone);
        apply(&mut person.email, patch.email);
        Ok(())
    }

    /// Xóa mọi cư dân trùng tên.
    pub fn delete_person(&mut self, first_name: &str, last_name: &str) -> Result<()> {
        let before = self.persons.len();
        self.persons
            .retain(|person| !person.has_name(first_name, last_name));
        if self.persons.len() == before {
            return Err(person_not_found(first_name, last_name));
        }
        Ok(())
    }

    pub fn add_firestation(&mut self, address: impl Into<String>, station: u32) -> &Firestation {
        self.firestations.push(Firestation {
            address: address.into(),
            station,
        });
        &self.firestations[self.firestations.len() - 1]
    }

    /// Đổi số trạm cho mọi ánh xạ tại địa chỉ.
    pub fn update_station_number(&mut self, address: &str, station: u32) -> Result<()> {
        let mut found = false;
        for firestation in self
            .firestations
            .iter_mut()
            .filter(|firestation| firestation.address == address)
        {
            firestation.station = station;
            found = true;
        }

        if !found {
            return Err(AlertsError::AddressNotFound(address.to_string()));
        }
        Ok(())
    }

    /// Xóa theo địa chỉ và/hoặc theo số trạm.
    pub fn delete_firestation(&mut self, address: Option<&str>, station: Option<u32>) -> Result<()> {
        if address.is_none() && station.is_none() {
            return Err(AlertsError::MissingFirestationSelector);
        }

        let before = self.firestations.len();
        if let Some(address) = address {
            self.firestations
                .retain(|firestation| firestation.address != address);
        }
        if let Some(station) = station {
            self.firestations
                .retain(|firestation| firestation.station != station);
        }

        if self.firestations.len() == before {
            return Err(AlertsError::FirestationNotFound {
                address: address.map(str::to_string),
                station,
            });
        }
        Ok(())
    }

    pub fn addresses_for_station(&self, station: u32) -> Result<Vec<String>> {
        let addresses: Vec<String> = self
            .firestations
            .iter()
            .filter(|firestation| firestation.station == station)
            .map(|firestation| firestation.address.clone())
            .collect();

        if addresses.is_empty() {
            return Err(AlertsError::NoAddressForStation(station));
        }
        Ok(addresses)
    }

    pub fn medical_record(&self, first_name: &str, last_name: &str) -> Result<&MedicalRecord> {
        self.medicalrecords
            .iter()
            .find(|record| record.has_name(first_name, last_name))
            .ok_or_else(|| record_not_found(first_name, last_name))
    }

    /// Ngày sinh phải đúng định dạng `MM/dd/yyyy`.
    pub fn add_medical_record(&mut self, record: MedicalRecord) -> Result<()> {
        if self
            .medicalrecords
            .iter()
            .any(|existing| existing.has_name(&record.first_name, &record.last_name))
        {
            return Err(AlertsError::MedicalRecordExists {
                first_name: record.first_name,
                last_name: record.last_name,
            });
        }
        parse_birthdate(&record.birthdate)?;
        self.medicalrecords.push(record);
        Ok(())
    }

    /// Cập nhật mọi hồ sơ trùng tên.
    pub fn update_medical_record(
        &mut self,
        first_name: &str,
        last_name: &str,
        patch: MedicalRecordPatch,
    ) -> Result<()> {
        if let Some(birthdate) = &patch.birthdate {
            parse_birthdate(birthdate)?;
        }
        let mut found = false;
        for record in self
            .medicalrecords
            .iter_mut()
            .filter(|record| record.has_name(first_name, last_name))
        {
            apply(&mut record.birthdate, patch.birthdate.clone());
            if let Some(medications) = &patch.medications {
                record.medications = medications.clone();
            }
            if let Some(allergies) = &patch.allergies {
                record.allergies = allergies.clone();
            }
            found = true;
        }

        if !found {
            return Err(record_not_found(first_name, last_name));
        }
        Ok(())
    }

    pub fn delete_medical_record(&mut self, first_name: &str, last_name: &str) -> Result<()> {
        let before = self.medicalrecords.len();
        self.medicalrecords
            .retain(|record| !record.has_name(first_name, last_name));
        if self.medicalrecords.len() == before {
            return Err(record_not_found(first_name, last_name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(first: &str, last: &str, address: &str) -> Person {
        Person {
            first_name: first.into(),
            last_name: last.into(),
            address: address.into(),
            city: "Culver".into(),
            zip: "97451".into(),
            phone: "841-874-6512".into(),
            email: format!("{}@email.com", first.to_lowercase()),
        }
    }

    fn record(first: &str, last: &str) -> MedicalRecord {
        MedicalRecord {
            first_name: first.into(),
            last_name: last.into(),
            birthdate: "03/06/1984".into(),
            medications: vec!["aznol:350mg".into()],
            allergies: vec!["nillacilan".into()],
        }
    }

    fn sample() -> DataSnapshot {
        DataSnapshot {
            persons: vec![
                person("John", "Boyd", "1509 Culver St"),
                person("Jacob", "Boyd", "1509 Culver St"),
            ],
            firestations: vec![
                Firestation {
                    address: "1509 Culver St".into(),
                    station: 3,
                },
                Firestation {
                    address: "29 15th St".into(),
                    station: 2,
                },
                Firestation {
                    address: "834 Binoc Ave".into(),
                    station: 3,
                },
            ],
            medicalrecords: vec![record("John", "Boyd")],
        }
    }

    #[test]
    fn update_person_keeps_unset_fields() {
        let mut snapshot = sample();
        snapshot
            .update_person(
                "John",
                "Boyd",
                PersonPatch {
                    zip: Some("75009".into()),
                    ..PersonPatch::default()
                },
            )
            .unwrap();

        let john = snapshot.person("John", "Boyd").unwrap();
        assert_eq!(john.zip, "75009");
        assert_eq!(john.address, "1509 Culver St");
    }

    #[test]
    fn update_unknown_person_fails() {
        let mut snapshot = sample();
        let err = snapshot
            .update_person("Nobody", "Boyd", PersonPatch::default())
            .unwrap_err();
        assert!(matches!(err, AlertsError::PersonNotFound { .. }));
    }

    #[test]
    fn delete_person_removes_match() {
        let mut snapshot = sample();
        snapshot.delete_person("Jacob", "Boyd").unwrap();
        assert_eq!(snapshot.persons.len(), 1);
        assert!(snapshot.delete_person("Jacob", "Boyd").is_err());
    }

    #[test]
    fn name_lookup_is_case_sensitive() {
        let snapshot = sample();
        assert!(snapshot.person("john", "Boyd").is_err());
    }

    #[test]
    fn update_station_number_changes_every_mapping() {
        let mut snapshot = sample();
        snapshot.update_station_number("29 15th St", 4).unwrap();
        assert_eq!(snapshot.addresses_for_station(4).unwrap(), vec!["29 15th St"]);
        assert!(matches!(
            snapshot.update_station_number("nowhere", 1),
            Err(AlertsError::AddressNotFound(_))
        ));
    }

    #[test]
    fn delete_firestation_by_station_or_address() {
        let mut snapshot = sample();
        assert!(matches!(
            snapshot.delete_firestation(None, None),
            Err(AlertsError::MissingFirestationSelector)
        ));

        snapshot.delete_firestation(None, Some(3)).unwrap();
        assert_eq!(snapshot.firestations.len(), 1);

        snapshot.delete_firestation(Some("29 15th St"), None).unwrap();
        assert!(snapshot.firestations.is_empty());

        assert!(matches!(
            snapshot.delete_firestation(Some("29 15th St"), Some(2)),
            Err(AlertsError::FirestationNotFound { .. })
        ));
    }

    #[test]
    fn addresses_for_unknown_station_is_an_error() {
        let snapshot = sample();
        assert_eq!(
            snapshot.addresses_for_station(3).unwrap(),
            vec!["1509 Culver St", "834 Binoc Ave"]
        );
        assert!(matches!(
            snapshot.addresses_for_station(9),
            Err(AlertsError::NoAddressForStation(9))
        ));
    }

    #[test]
    fn duplicate_medical_record_is_rejected() {
        let mut snapshot = sample();
        let err = snapshot.add_medical_record(record("John", "Boyd")).unwrap_err();
        assert!(matches!(err, AlertsError::MedicalRecordExists { .. }));
        snapshot.add_medical_record(record("Jacob", "Boyd")).unwrap();
        assert_eq!(snapshot.medicalrecords.len(), 2);
    }

    #[test]
    fn medical_record_birthdate_is_validated() {
        let mut snapshot = sample();
        let mut jacob = record("Jacob", "Boyd");
        jacob.birthdate = String::new();
        assert!(matches!(
            snapshot.add_medical_record(jacob),
            Err(AlertsError::InvalidBirthdate { .. })
        ));

        let err = snapshot
            .update_medical_record(
                "John",
                "Boyd",
                MedicalRecordPatch {
                    birthdate: Some("1984-03-06".into()),
                    ..MedicalRecordPatch::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.status(), 400);
        assert_eq!(snapshot.medicalrecords.len(), 1);
        assert_eq!(snapshot.medicalrecords[0].birthdate, "03/06/1984");
    }

    #[test]
    fn update_medical_record_replaces_lists() {
        let mut snapshot = sample();
        snapshot
            .update_medical_record(
                "John",
                "Boyd",
                MedicalRecordPatch {
                    allergies: Some(vec![]),
                    ..MedicalRecordPatch::default()
                },
            )
            .unwrap();

        let john = snapshot.medical_record("John", "Boyd").unwrap();
        assert!(john.allergies.is_empty());
        assert_eq!(john.medications, vec!["aznol:350mg"]);
        assert_eq!(john.birthdate, "03/06/1984");
    }

    #[test]
    fn delete_missing_medical_record_fails() {
        let mut snapshot = sample();
        snapshot.delete_medical_record("John", "Boyd").unwrap();
        assert!(matches!(
            snapshot.delete_medical_record("John", "Boyd"),
            Err(AlertsError::MedicalRecordNotFound { .. })
        ));
    }
}

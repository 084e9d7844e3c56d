//! One method per API endpoint: load the snapshot, compute or mutate, save if needed.

use std::collections::BTreeMap;

use log::{info, warn};
use safetynet_alerts as alerts;
use safetynet_core::{
    AlertsConfig, AlertsError, DataSnapshot, Firestation, HouseholdMap, Inhabitant,
    MedicalRecord, MedicalRecordPatch, Person, PersonInfo, PersonPatch, Result, StationCoverage,
};

use crate::store::SnapshotStore;

pub struct AlertService<S> {
    store: S,
    config: AlertsConfig,
}

impl<S: SnapshotStore> AlertService<S> {
    pub fn new(store: S, config: AlertsConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AlertsConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read<T>(&self, view: impl FnOnce(&DataSnapshot) -> Result<T>) -> Result<T> {
        let snapshot = self.store.load().map_err(log_failure)?;
        view(&snapshot).map_err(log_failure)
    }

    fn mutate<T>(&self, change: impl FnOnce(&mut DataSnapshot) -> Result<T>) -> Result<T> {
        let mut snapshot = self.store.load().map_err(log_failure)?;
        let outcome = change(&mut snapshot).map_err(log_failure)?;
        self.store.save(&snapshot).map_err(log_failure)?;
        Ok(outcome)
    }

    pub fn person(&self, first_name: &str, last_name: &str) -> Result<Person> {
        self.read(|snapshot| snapshot.person(first_name, last_name).cloned())
    }

    pub fn add_person(&self, person: Person) -> Result<Person> {
        info!("adding person {} {}", person.first_name, person.last_name);
        self.mutate(|snapshot| {
            snapshot.add_person(person.clone());
            Ok(person)
        })
    }

    pub fn update_person(&self, first_name: &str, last_name: &str, patch: PersonPatch) -> Result<()> {
        info!("updating person {first_name} {last_name}");
        self.mutate(|snapshot| snapshot.update_person(first_name, last_name, patch))
    }

    pub fn delete_person(&self, first_name: &str, last_name: &str) -> Result<()> {
        info!("deleting person {first_name} {last_name}");
        self.mutate(|snapshot| snapshot.delete_person(first_name, last_name))
    }

    pub fn station_addresses(&self, station: u32) -> Result<Vec<String>> {
        self.read(|snapshot| snapshot.addresses_for_station(station))
    }

    pub fn add_firestation(&self, address: &str, station: u32) -> Result<Firestation> {
        info!("adding firestation {station} at {address}");
        self.mutate(|snapshot| Ok(snapshot.add_firestation(address, station).clone()))
    }

    pub fn update_firestation(&self, address: &str, station: u32) -> Result<()> {
        info!("moving {address} to station {station}");
        self.mutate(|snapshot| snapshot.update_station_number(address, station))
    }

    pub fn delete_firestation(&self, address: Option<&str>, station: Option<u32>) -> Result<()> {
        info!("deleting firestation (address: {address:?}, station: {station:?})");
        self.mutate(|snapshot| snapshot.delete_firestation(address, station))
    }

    pub fn medical_record(&self, first_name: &str, last_name: &str) -> Result<MedicalRecord> {
        self.read(|snapshot| snapshot.medical_record(first_name, last_name).cloned())
    }

    pub fn add_medical_record(&self, record: MedicalRecord) -> Result<MedicalRecord> {
        info!(
            "adding medical record for {} {}",
            record.first_name, record.last_name
        );
        self.mutate(|snapshot| {
            snapshot.add_medical_record(record.clone())?;
            Ok(record)
        })
    }

    /// Returns the record as stored after the update.
    pub fn update_medical_record(
        &self,
        first_name: &str,
        last_name: &str,
        patch: MedicalRecordPatch,
    ) -> Result<MedicalRecord> {
        info!("updating medical record for {first_name} {last_name}");
        self.mutate(|snapshot| {
            snapshot.update_medical_record(first_name, last_name, patch)?;
            snapshot.medical_record(first_name, last_name).cloned()
        })
    }

    pub fn delete_medical_record(&self, first_name: &str, last_name: &str) -> Result<()> {
        info!("deleting medical record for {first_name} {last_name}");
        self.mutate(|snapshot| snapshot.delete_medical_record(first_name, last_name))
    }

    pub fn station_coverage(&self, station: u32) -> Result<StationCoverage> {
        let today = self.config.today();
        self.read(|snapshot| alerts::station_coverage(snapshot, station, today))
    }

    /// Households with children at `address`; [`AlertsError::NoChildFound`] if there are none.
    pub fn child_alert(&self, address: &str) -> Result<HouseholdMap> {
        let today = self.config.today();
        self.read(|snapshot| {
            alerts::child_alert(snapshot, address, today)?
                .ok_or_else(|| AlertsError::NoChildFound(address.to_string()))
        })
    }

    pub fn phone_alert(&self, station: u32) -> Result<Vec<String>> {
        self.read(|snapshot| Ok(alerts::phone_alert(snapshot, station)))
    }

    pub fn fire(&self, address: &str) -> Result<Vec<Inhabitant>> {
        let today = self.config.today();
        self.read(|snapshot| alerts::fire_by_address(snapshot, address, today))
    }

    pub fn flood(&self, stations: &[u32]) -> Result<BTreeMap<u32, Vec<Inhabitant>>> {
        let today = self.config.today();
        self.read(|snapshot| alerts::flood_stations(snapshot, stations, today))
    }

    pub fn person_info(&self, first_name: &str, last_name: &str) -> Result<Vec<PersonInfo>> {
        let today = self.config.today();
        self.read(|snapshot| alerts::person_info(snapshot, first_name, last_name, today))
    }

    pub fn community_email(&self, city: &str) -> Result<Vec<String>> {
        self.read(|snapshot| Ok(alerts::community_email(snapshot, city)))
    }
}

fn log_failure(err: AlertsError) -> AlertsError {
    warn!("request failed ({}): {err}", err.status());
    err
}

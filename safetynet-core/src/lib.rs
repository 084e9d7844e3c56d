//! Kiểu dữ liệu lõi cho hệ thống cảnh báo SafetyNet: hồ sơ gốc, DTO dẫn xuất, cấu hình và lỗi.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub mod age;
pub mod snapshot;

pub use age::{calculate_age, parse_birthdate, BIRTHDATE_FORMAT};
pub use snapshot::{MedicalRecordPatch, PersonPatch};

/// Tuổi bắt đầu được tính là người lớn.
pub const ADULT_AGE: i32 = 18;

/// Cấu hình vận hành: vị trí file dữ liệu và ngày tham chiếu để tính tuổi.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertsConfig {
    /// File JSON chứa toàn bộ dữ liệu.
    pub data_path: PathBuf,
    /// Ngày tham chiếu cố định (dùng cho kiểm thử); `None` nghĩa là hôm nay.
    pub reference_date: Option<NaiveDate>,
    /// In JSON có thụt lề.
    pub pretty: bool,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data.json"),
            reference_date: None,
            pretty: true,
        }
    }
}

impl AlertsConfig {
    /// Ngày dùng để tính tuổi cho một yêu cầu.
    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Một cư dân trong dữ liệu gốc.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
}

impl Person {
    pub fn has_name(&self, first_name: &str, last_name: &str) -> bool {
        self.first_name == first_name && self.last_name == last_name
    }
}

/// Ánh xạ địa chỉ -> số trạm cứu hỏa.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Firestation {
    pub address: String,
    #[serde(deserialize_with = "station_number")]
    pub station: u32,
}

/// Hồ sơ y tế gắn với một cư dân qua (firstName, lastName).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalRecord {
    pub first_name: String,
    pub last_name: String,
    /// Định dạng `MM/dd/yyyy`.
    pub birthdate: String,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

impl MedicalRecord {
    pub fn has_name(&self, first_name: &str, last_name: &str) -> bool {
        self.first_name == first_name && self.last_name == last_name
    }
}

/// Toàn bộ tài liệu dữ liệu, được nạp và ghi lại nguyên khối.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DataSnapshot {
    pub persons: Vec<Person>,
    pub firestations: Vec<Firestation>,
    pub medicalrecords: Vec<MedicalRecord>,
}

/// Cư dân ghép với hồ sơ y tế và tuổi đã tính.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CombinedPersonRecord {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
    pub age: i32,
    pub birthdate: String,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

impl CombinedPersonRecord {
    pub fn from_parts(person: &Person, record: &MedicalRecord, age: i32) -> Self {
        Self {
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            address: person.address.clone(),
            city: person.city.clone(),
            zip: person.zip.clone(),
            phone: person.phone.clone(),
            email: person.email.clone(),
            age,
            birthdate: record.birthdate.clone(),
            medications: record.medications.clone(),
            allergies: record.allergies.clone(),
        }
    }

    pub fn is_adult(&self) -> bool {
        self.age >= ADULT_AGE
    }
}

/// Thành viên hộ gia đình trong cảnh báo trẻ em.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdMember {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
}

impl From<&CombinedPersonRecord> for HouseholdMember {
    fn from(record: &CombinedPersonRecord) -> Self {
        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            age: record.age,
        }
    }
}

/// Hộ gia đình: trẻ em trước (tuổi tăng dần), sau đó người lớn (tuổi tăng dần).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub household_members: Vec<HouseholdMember>,
}

/// Các hộ gia đình theo khóa `"<số thành viên> <họ>"`.
pub type HouseholdMap = BTreeMap<String, Household>;

/// Dữ liệu cư dân cho cảnh báo cháy / lũ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Inhabitant {
    pub firestation_number: Option<u32>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub age: i32,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

impl Inhabitant {
    pub fn tagged(record: CombinedPersonRecord, firestation_number: Option<u32>) -> Self {
        Self {
            firestation_number,
            first_name: record.first_name,
            last_name: record.last_name,
            phone: record.phone,
            age: record.age,
            medications: record.medications,
            allergies: record.allergies,
        }
    }
}

/// Thông tin cá nhân tra cứu theo tên.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonInfo {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub age: i32,
    pub email: String,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

impl From<CombinedPersonRecord> for PersonInfo {
    fn from(record: CombinedPersonRecord) -> Self {
        Self {
            first_name: record.first_name,
            last_name: record.last_name,
            address: record.address,
            city: record.city,
            zip: record.zip,
            age: record.age,
            email: record.email,
            medications: record.medications,
            allergies: record.allergies,
        }
    }
}

/// Số người lớn / trẻ em.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountMap {
    #[serde(rename = "Adults")]
    pub adults: u64,
    #[serde(rename = "Children")]
    pub children: u64,
}

/// Kết quả tra cứu theo một trạm.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StationCoverage {
    pub persons: Vec<CombinedPersonRecord>,
    pub count: CountMap,
}

/// Nhóm lỗi, dùng để chọn mã phản hồi.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Conflict,
    Internal,
}

/// Lỗi chung của hệ thống cảnh báo.
#[derive(Debug, thiserror::Error)]
pub enum AlertsError {
    #[error("Không tìm thấy cư dân {first_name} {last_name}")]
    PersonNotFound {
        first_name: String,
        last_name: String,
    },
    #[error("Không tìm thấy hồ sơ y tế của {first_name} {last_name}")]
    MedicalRecordNotFound {
        first_name: String,
        last_name: String,
    },
    #[error("Hồ sơ y tế của {first_name} {last_name} đã tồn tại")]
    MedicalRecordExists {
        first_name: String,
        last_name: String,
    },
    #[error("Địa chỉ {0} không thuộc trạm nào")]
    AddressNotFound(String),
    #[error("Không có trạm nào khớp (address: {address:?}, station: {station:?})")]
    FirestationNotFound {
        address: Option<String>,
        station: Option<u32>,
    },
    #[error("Không có trẻ em tại địa chỉ {0}")]
    NoChildFound(String),
    #[error("Trạm {0} không phụ trách địa chỉ nào")]
    NoAddressForStation(u32),
    #[error("Cần ít nhất address hoặc station để xóa trạm")]
    MissingFirestationSelector,
    #[error("Ngày sinh không hợp lệ {value:?}: {source}")]
    InvalidBirthdate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Lỗi vào/ra: {0}")]
    Io(#[from] std::io::Error),
}

impl AlertsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PersonNotFound { .. }
            | Self::MedicalRecordNotFound { .. }
            | Self::AddressNotFound(_)
            | Self::FirestationNotFound { .. }
            | Self::NoChildFound(_) => ErrorKind::NotFound,
            Self::NoAddressForStation(_)
            | Self::MissingFirestationSelector
            | Self::InvalidBirthdate { .. } => ErrorKind::BadRequest,
            Self::MedicalRecordExists { .. } => ErrorKind::Conflict,
            Self::Parse(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }

    /// Mã trạng thái kiểu HTTP tương ứng.
    pub fn status(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::BadRequest => 400,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
        }
    }
}

pub type Result<T, E = AlertsError> = std::result::Result<T, E>;

// Dữ liệu cũ lưu station dạng chuỗi ("3").
fn station_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_accepts_number_or_string() {
        let stations: Vec<Firestation> = serde_json::from_str(
            r#"[{"address":"1509 Culver St","station":"3"},{"address":"29 15th St","station":2}]"#,
        )
        .unwrap();
        assert_eq!(stations[0].station, 3);
        assert_eq!(stations[1].station, 2);
    }

    #[test]
    fn count_map_uses_capitalized_keys() {
        let value = serde_json::to_value(CountMap {
            adults: 3,
            children: 1,
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"Adults": 3, "Children": 1}));
    }

    #[test]
    fn snapshot_tolerates_missing_lists() {
        let snapshot: DataSnapshot = serde_json::from_str(r#"{"persons":[]}"#).unwrap();
        assert!(snapshot.firestations.is_empty());
        assert!(snapshot.medicalrecords.is_empty());
    }

    #[test]
    fn error_kinds_map_to_status() {
        assert_eq!(AlertsError::NoChildFound("x".into()).status(), 404);
        assert_eq!(AlertsError::MissingFirestationSelector.status(), 400);
        assert_eq!(
            AlertsError::MedicalRecordExists {
                first_name: "a".into(),
                last_name: "b".into()
            }
            .status(),
            409
        );
        assert_eq!(AlertsError::Parse("bad".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn inhabitant_serializes_null_station() {
        let value = serde_json::to_value(Inhabitant {
            firestation_number: None,
            first_name: "John".into(),
            last_name: "Boyd".into(),
            phone: "841-874-6512".into(),
            age: 40,
            medications: vec![],
            allergies: vec![],
        })
        .unwrap();
        assert!(value["firestationNumber"].is_null());
        assert_eq!(value["firstName"], "John");
    }
}

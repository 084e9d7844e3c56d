use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use safetynet_core::{MedicalRecord, MedicalRecordPatch, Person, PersonPatch};

#[derive(Parser, Debug)]
#[command(
    name = "safetynet",
    about = "Tra cứu và cập nhật dữ liệu cảnh báo SafetyNet trên file JSON."
)]
pub struct Args {
    /// File JSON dữ liệu (mặc định data.json).
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// File cấu hình JSON; khóa thiếu giữ giá trị mặc định.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Ngày tham chiếu để tính tuổi (YYYY-MM-DD).
    #[arg(long, global = true)]
    pub as_of: Option<NaiveDate>,

    /// In JSON trên một dòng.
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Quản lý cư dân.
    #[command(subcommand)]
    Person(PersonCommand),
    /// Quản lý ánh xạ địa chỉ -> trạm.
    #[command(subcommand)]
    Firestation(FirestationCommand),
    /// Quản lý hồ sơ y tế.
    #[command(subcommand)]
    MedicalRecord(MedicalRecordCommand),
    /// Cư dân thuộc một trạm kèm số người lớn / trẻ em.
    StationCoverage {
        #[arg(long)]
        station: u32,
    },
    /// Hộ gia đình có trẻ em tại một địa chỉ.
    ChildAlert {
        #[arg(long)]
        address: String,
    },
    /// Số điện thoại của cư dân thuộc một trạm.
    PhoneAlert {
        #[arg(long)]
        firestation: u32,
    },
    /// Cư dân tại một địa chỉ và trạm phụ trách.
    Fire {
        #[arg(long)]
        address: String,
    },
    /// Cư dân theo từng trạm trong danh sách.
    Flood {
        #[arg(long, value_delimiter = ',', required = true)]
        stations: Vec<u32>,
    },
    /// Thông tin cá nhân theo tên.
    PersonInfo(NameArgs),
    /// Email của cư dân trong một thành phố.
    CommunityEmail {
        #[arg(long)]
        city: String,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct NameArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PersonFields {
    #[command(flatten)]
    pub name: NameArgs,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub zip: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

impl PersonFields {
    pub fn into_person(self) -> Person {
        Person {
            first_name: self.name.first_name,
            last_name: self.name.last_name,
            address: self.address.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            zip: self.zip.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
        }
    }

    pub fn into_patch(self) -> (NameArgs, PersonPatch) {
        let patch = PersonPatch {
            address: self.address,
            city: self.city,
            zip: self.zip,
            phone: self.phone,
            email: self.email,
        };
        (self.name, patch)
    }
}

#[derive(Subcommand, Debug)]
pub enum PersonCommand {
    Get(NameArgs),
    Add(PersonFields),
    /// Chỉ các trường được truyền mới bị thay đổi.
    Update(PersonFields),
    Delete(NameArgs),
}

#[derive(Subcommand, Debug)]
pub enum FirestationCommand {
    Add {
        #[arg(long)]
        address: String,
        #[arg(long)]
        station: u32,
    },
    /// Đổi số trạm của một địa chỉ.
    Update {
        #[arg(long)]
        address: String,
        #[arg(long)]
        station: u32,
    },
    /// Xóa theo địa chỉ và/hoặc số trạm.
    Delete {
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        station: Option<u32>,
    },
    /// Các địa chỉ do một trạm phụ trách.
    Addresses {
        #[arg(long)]
        station: u32,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct MedicalRecordFields {
    #[command(flatten)]
    pub name: NameArgs,
    /// Ngày sinh MM/dd/yyyy.
    #[arg(long)]
    pub birthdate: Option<String>,
    /// Danh sách "tên:liều", phân tách bằng dấu phẩy; để trống để xóa hết.
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub medications: Option<Vec<String>>,
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub allergies: Option<Vec<String>>,
}

impl MedicalRecordFields {
    pub fn into_patch(self) -> (NameArgs, MedicalRecordPatch) {
        let patch = MedicalRecordPatch {
            birthdate: self.birthdate,
            medications: self.medications,
            allergies: self.allergies,
        };
        (self.name, patch)
    }
}

/// Hồ sơ mới bắt buộc có ngày sinh.
#[derive(ClapArgs, Debug, Clone)]
pub struct NewMedicalRecordFields {
    #[command(flatten)]
    pub name: NameArgs,
    /// Ngày sinh MM/dd/yyyy.
    #[arg(long)]
    pub birthdate: String,
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub medications: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub allergies: Vec<String>,
}

impl NewMedicalRecordFields {
    pub fn into_record(self) -> MedicalRecord {
        MedicalRecord {
            first_name: self.name.first_name,
            last_name: self.name.last_name,
            birthdate: self.birthdate,
            medications: self.medications,
            allergies: self.allergies,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum MedicalRecordCommand {
    Get(NameArgs),
    Add(NewMedicalRecordFields),
    Update(MedicalRecordFields),
    Delete(NameArgs),
}

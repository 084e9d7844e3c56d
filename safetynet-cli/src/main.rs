mod args;

use std::fs;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::debug;
use safetynet_core::{AlertsConfig, AlertsError, ErrorKind};
use safetynet_store::{AlertService, JsonFileStore};
use serde::Serialize;

use crate::args::{Args, Command, FirestationCommand, MedicalRecordCommand, PersonCommand};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Lỗi in ra stdout chỉ là --help / --version.
            let _ = err.print();
            return ExitCode::from(usage_exit_code(&err));
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Lỗi: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    debug!("config: {config:?}");

    let store = JsonFileStore::new(config.data_path.clone());
    let pretty = config.pretty;
    let service = AlertService::new(store, config);

    match args.command {
        Command::Person(command) => match command {
            PersonCommand::Get(name) => {
                print_json(&service.person(&name.first_name, &name.last_name)?, pretty)
            }
            PersonCommand::Add(fields) => {
                print_json(&service.add_person(fields.into_person())?, pretty)
            }
            PersonCommand::Update(fields) => {
                let (name, patch) = fields.into_patch();
                Ok(service.update_person(&name.first_name, &name.last_name, patch)?)
            }
            PersonCommand::Delete(name) => {
                Ok(service.delete_person(&name.first_name, &name.last_name)?)
            }
        },
        Command::Firestation(command) => match command {
            FirestationCommand::Add { address, station } => {
                print_json(&service.add_firestation(&address, station)?, pretty)
            }
            FirestationCommand::Update { address, station } => {
                Ok(service.update_firestation(&address, station)?)
            }
            FirestationCommand::Delete { address, station } => {
                Ok(service.delete_firestation(address.as_deref(), station)?)
            }
            FirestationCommand::Addresses { station } => {
                print_json(&service.station_addresses(station)?, pretty)
            }
        },
        Command::MedicalRecord(command) => match command {
            MedicalRecordCommand::Get(name) => print_json(
                &service.medical_record(&name.first_name, &name.last_name)?,
                pretty,
            ),
            MedicalRecordCommand::Add(fields) => {
                print_json(&service.add_medical_record(fields.into_record())?, pretty)
            }
            MedicalRecordCommand::Update(fields) => {
                let (name, patch) = fields.into_patch();
                print_json(
                    &service.update_medical_record(&name.first_name, &name.last_name, patch)?,
                    pretty,
                )
            }
            MedicalRecordCommand::Delete(name) => {
                Ok(service.delete_medical_record(&name.first_name, &name.last_name)?)
            }
        },
        Command::StationCoverage { station } => {
            print_json(&service.station_coverage(station)?, pretty)
        }
        Command::ChildAlert { address } => print_json(&service.child_alert(&address)?, pretty),
        Command::PhoneAlert { firestation } => {
            print_json(&service.phone_alert(firestation)?, pretty)
        }
        Command::Fire { address } => print_json(&service.fire(&address)?, pretty),
        Command::Flood { stations } => print_json(&service.flood(&stations)?, pretty),
        Command::PersonInfo(name) => print_json(
            &service.person_info(&name.first_name, &name.last_name)?,
            pretty,
        ),
        Command::CommunityEmail { city } => print_json(&service.community_email(&city)?, pretty),
    }
}

/// Mặc định <- file `--config` <- cờ dòng lệnh.
fn load_config(args: &Args) -> anyhow::Result<AlertsConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Không đọc được file cấu hình {path:?}"))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Cấu hình không hợp lệ {path:?}"))?
        }
        None => AlertsConfig::default(),
    };

    if let Some(data) = &args.data {
        config.data_path = data.clone();
    }
    if let Some(as_of) = args.as_of {
        config.reference_date = Some(as_of);
    }
    if args.compact {
        config.pretty = false;
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Không serialize được kết quả")?;
    println!("{rendered}");
    Ok(())
}

/// Cú pháp sai được xếp cùng nhóm BadRequest.
fn usage_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        3
    } else {
        0
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<AlertsError>().map(AlertsError::kind) {
        Some(ErrorKind::NotFound) => 2,
        Some(ErrorKind::BadRequest) => 3,
        Some(ErrorKind::Conflict) => 4,
        Some(ErrorKind::Internal) | None => 1,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn exit_code_follows_error_kind() {
        let not_found = anyhow::Error::from(AlertsError::NoChildFound("x".into()));
        assert_eq!(exit_code(&not_found), 2);

        let bad = anyhow::Error::from(AlertsError::MissingFirestationSelector)
            .context("xóa trạm");
        assert_eq!(exit_code(&bad), 3);

        assert_eq!(exit_code(&anyhow::anyhow!("khác")), 1);
    }

    #[test]
    fn usage_errors_are_bad_requests_not_missing_data() {
        let usage = Args::try_parse_from([
            "safetynet",
            "fire",
            "--address",
            "x",
            "--as-of",
            "01/01/2024",
        ])
        .unwrap_err();
        assert_eq!(usage_exit_code(&usage), 3);

        let bad_station =
            Args::try_parse_from(["safetynet", "station-coverage", "--station", "abc"])
                .unwrap_err();
        assert_eq!(usage_exit_code(&bad_station), 3);

        let not_found = anyhow::Error::from(AlertsError::NoChildFound("x".into()));
        assert_eq!(exit_code(&not_found), 2);
        assert_ne!(usage_exit_code(&usage), exit_code(&not_found));

        let help = Args::try_parse_from(["safetynet", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&help), 0);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{"data_path": "/srv/data.json", "reference_date": "2020-05-01"}"#,
        )
        .unwrap();

        let args = Args::try_parse_from([
            "safetynet",
            "--config",
            config_path.to_str().unwrap(),
            "--as-of",
            "2024-01-01",
            "community-email",
            "--city",
            "Culver",
        ])
        .unwrap();
        let config = load_config(&args).unwrap();

        assert_eq!(config.data_path, PathBuf::from("/srv/data.json"));
        assert_eq!(
            config.reference_date,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert!(config.pretty);
    }
}

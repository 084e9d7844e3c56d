//! Tính tuổi từ ngày sinh `MM/dd/yyyy`.

use chrono::{Datelike, NaiveDate};

use crate::{AlertsError, Result};

/// Định dạng ngày sinh trong dữ liệu.
pub const BIRTHDATE_FORMAT: &str = "%m/%d/%Y";

pub fn parse_birthdate(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, BIRTHDATE_FORMAT).map_err(|source| {
        AlertsError::InvalidBirthdate {
            value: value.to_string(),
            source,
        }
    })
}

/// Số năm tròn giữa ngày sinh và ngày tham chiếu.
///
/// Tính theo khoảng thời gian (tháng + ngày), không phải hiệu số năm, nên người
/// chưa tới sinh nhật trong năm tham chiếu chưa được cộng tuổi.
pub fn calculate_age(birthdate: &str, reference: NaiveDate) -> Result<i32> {
    let born = parse_birthdate(birthdate)?;
    Ok(whole_years_between(born, reference))
}

fn whole_years_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    let days = end.day() as i32 - start.day() as i32;

    if months > 0 && days < 0 {
        months -= 1;
    } else if months < 0 && days > 0 {
        months += 1;
    }

    months / 12
}

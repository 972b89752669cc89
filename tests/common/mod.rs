#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use expense_core::{core::AppContext, ledger::MonthKey, storage::JsonStorage};
use tempfile::TempDir;

pub fn month(year: i32, month: u32) -> MonthKey {
    MonthKey::new(year, month).expect("valid month")
}

pub fn moment(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

/// Opens an app over JSON files in a fresh directory; keep the guard alive.
pub fn setup_app(active: MonthKey) -> (AppContext, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let app = open_app_in(&temp, active);
    (app, temp)
}

pub fn open_app_in(temp: &TempDir, active: MonthKey) -> AppContext {
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
    AppContext::open(Box::new(storage))
        .expect("open app")
        .with_active_month(active)
}

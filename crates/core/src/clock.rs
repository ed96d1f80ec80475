//! Nguồn "hôm nay" cho scheduler và removal transactions.

use chrono::{Local, NaiveDate};

/// Cung cấp ngày hiện tại
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Đồng hồ hệ thống (local time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Đồng hồ cố định, dùng trong tests và replay
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

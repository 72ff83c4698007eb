use std::fmt;

use time::{format_description::FormatItem, macros::format_description};

pub const NAIVE_DATETIME_FORMAT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub fn sec_to_minsec(secs: u32) -> SecToMinSecFormatter {
    SecToMinSecFormatter { secs }
}

pub struct SecToMinSecFormatter {
    secs: u32,
}

impl fmt::Display for SecToMinSecFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.secs / 60, self.secs % 60)
    }
}

use chrono::prelude::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn iso8601(st: SystemTime) -> String {
    let dt: DateTime<Utc> = st.into();
    dt.format("%+").to_string()
}

pub fn unix_millis(st: SystemTime) -> u64 {
    st.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub fn now_millis() -> u64 {
    unix_millis(SystemTime::now())
}

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Epoch milliseconds of the start of the current UTC day
pub fn start_of_today_millis() -> i64 {
    start_of_day_millis(now_millis())
}

/// Epoch milliseconds of the UTC midnight at or before `ts`
pub fn start_of_day_millis(ts: i64) -> i64 {
    const DAY_MS: i64 = 86_400_000;
    ts.div_euclid(DAY_MS) * DAY_MS
}

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Local calendar day as `YYYYMMDD`, the order-number prefix.
pub fn today_stamp() -> String {
    chrono::Local::now().format("%Y%m%d").to_string()
}

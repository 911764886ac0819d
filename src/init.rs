use env_logger::Env;

/// 初始化日誌系統
///
/// 預設只輸出 warn 以上，避免干擾互動式選單；
/// 可透過 `RUST_LOG` 環境變數調整。
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();
}

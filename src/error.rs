use thiserror::Error;

/// 核心錯誤分類
///
/// 所有錯誤對當前執行都是致命的：本工具每次呼叫只做一件事，
/// 不做部分結果回收，也不自動重試。呼叫端（CLI 或互動層）
/// 負責呈現錯誤訊息。
#[derive(Debug, Error)]
pub enum PreviewError {
    /// 設定不合法，在任何解碼工作開始前攔截
    #[error("設定不合法: {0}")]
    InvalidConfiguration(String),

    /// 來源無法開啟或探測
    #[error("無法開啟影片來源: {0}")]
    SourceOpen(String),

    /// 來源範圍無法解碼（毀損或不支援的編碼）
    #[error("無法解碼影片範圍: {0}")]
    SourceRead(String),

    /// 沒有任何子片段可以合成
    #[error("沒有任何子片段可以合成")]
    EmptyTimeline,

    /// 影格寫入磁碟失敗
    #[error("影格寫入失敗: {0}")]
    FrameWrite(String),

    /// 輸出編碼失敗
    #[error("輸出編碼失敗: {0}")]
    Encode(String),

    #[error("IO 錯誤: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PreviewError>;

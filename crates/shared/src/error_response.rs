//! # エラーレスポンス
//!
//! 全ルートで共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換はブートストラップ側の責務（shared に axum 依存を入れない）
//! - ステータスコードはボディに含めず、HTTP ステータス行のみで表現する

use serde::{Deserialize, Serialize};

/// エラーレスポンス
///
/// 中央のエラー変換器が返すボディの形。どのエンドポイントで失敗しても、
/// クライアントは `{"detail": "<メッセージ>"}` を受け取る。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 人間が読めるエラーの詳細メッセージ
    pub detail: String,
}

impl ErrorResponse {
    /// 新しいエラーレスポンスを作成する
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

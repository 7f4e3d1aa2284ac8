//! # API サーバー設定
//!
//! 環境変数から API サーバーの設定を読み込む。
//!
//! すべての変数にデフォルト値があるため、環境変数なしでも起動できる。
//! ただし値が不正な場合はデフォルトへ黙ってフォールバックせず、
//! 起動を中断する（意図しないアドレスへのバインドを防ぐ）。

use std::{env, net::IpAddr};

use thiserror::Error;

/// 設定の読み込みエラー
///
/// いずれも起動時に致命的となる。サーバーはこのエラーを報告して
/// リクエストの受付を開始せずに終了しなければならない。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `SERVER_HOST` が IP アドレスとしてパースできない
    #[error("SERVER_HOST が不正です（IP アドレスを指定してください）: {0:?}")]
    InvalidHost(String),

    /// `APP_PORT` が 1〜65535 の整数としてパースできない
    #[error("APP_PORT が不正です（1〜65535 の整数を指定してください）: {0:?}")]
    InvalidPort(String),

    /// `API_PREFIX` が `/` で始まらない、`/` 単体、または `/` で終わる
    #[error("API_PREFIX が不正です（`/` で始まり、`/` 以外で終わる必要があります）: {0:?}")]
    InvalidPrefix(String),
}

/// API サーバーの設定
///
/// プロセス起動時に一度だけ構築し、以降は参照で引き回す。
/// 構築後の変更はない。
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// バインドアドレス
    pub host: IpAddr,
    /// ポート番号
    pub port: u16,
    /// プラグインルーターをマウントするパスプレフィックス
    pub api_prefix: String,
}

impl ApiConfig {
    /// 環境変数から設定を読み込む
    ///
    /// | 変数名 | デフォルト | 説明 |
    /// |--------|------------|------|
    /// | `SERVER_HOST` | `0.0.0.0` | バインドアドレス |
    /// | `APP_PORT` | `8000` | ポート番号 |
    /// | `API_PREFIX` | `/api/v1` | マウントプレフィックス |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            env::var("SERVER_HOST").ok(),
            env::var("APP_PORT").ok(),
            env::var("API_PREFIX").ok(),
        )
    }

    /// 個別の値から設定を構築する
    ///
    /// `None` はデフォルト値の適用を意味する。
    fn from_values(
        host: Option<String>,
        port: Option<String>,
        prefix: Option<String>,
    ) -> Result<Self, ConfigError> {
        let host_raw = host.unwrap_or_else(|| "0.0.0.0".to_string());
        let host = host_raw
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidHost(host_raw))?;

        let port_raw = port.unwrap_or_else(|| "8000".to_string());
        let port = port_raw
            .parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| ConfigError::InvalidPort(port_raw))?;

        let api_prefix = prefix.unwrap_or_else(|| "/api/v1".to_string());
        if !api_prefix.starts_with('/') || api_prefix.len() < 2 || api_prefix.ends_with('/') {
            return Err(ConfigError::InvalidPrefix(api_prefix));
        }

        Ok(Self {
            host,
            port,
            api_prefix,
        })
    }
}

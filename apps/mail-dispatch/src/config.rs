//! # 送信設定
//!
//! 環境変数から送信バックエンドの種別と接続設定を読み込む。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `MAIL_TRANSPORT` | No | `lettre` / `mail_send`（デフォルト: `lettre`） |
//! | `MAIL_HOST` | **Yes** | SMTP ホスト |
//! | `MAIL_PORT` | No | ポート番号（デフォルト: `587`） |
//! | `MAIL_USERNAME` | No | SMTP ユーザー |
//! | `MAIL_PASSWORD` | No | SMTP パスワード |
//! | `MAIL_TLS` | No | `starttls` / `tls` / `none`（デフォルト: `starttls`） |
//! | `MAIL_TIMEOUT_SECS` | No | 1 回の送信の期限（秒） |
//!
//! `MAIL_USERNAME` と `MAIL_PASSWORD` は両方設定するか、両方省略する。
//! 両方省略した場合は SMTP 認証を行わない。

use std::{env, time::Duration};

use mailgate_domain::{
    UnknownTransportType,
    transport::{TlsMode, TransportConfig, TransportKind},
};
use thiserror::Error;

const DEFAULT_PORT: u16 = 587;

/// 設定読み込みエラー
///
/// 値そのものを含めるのは認証情報以外の変数に限る。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    #[error("MAIL_USERNAME と MAIL_PASSWORD は両方設定するか、両方省略する必要があります")]
    IncompleteCredentials,

    #[error("MAIL_PORT は 1〜65535 の整数である必要があります: {0}")]
    InvalidPort(String),

    #[error("MAIL_TLS は starttls / tls / none のいずれかである必要があります: {0}")]
    InvalidTls(String),

    #[error("MAIL_TIMEOUT_SECS は正の整数である必要があります: {0}")]
    InvalidTimeout(String),

    #[error(transparent)]
    UnknownTransport(#[from] UnknownTransportType),
}

/// 送信設定
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// 送信バックエンド種別
    pub transport_kind: TransportKind,
    /// 接続設定
    pub transport:      TransportConfig,
}

impl DispatchConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 空文字列は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let transport_kind = match get("MAIL_TRANSPORT") {
            Some(tag) => TransportKind::parse(&tag)?,
            None => TransportKind::Lettre,
        };

        let port = match get("MAIL_PORT") {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };

        let tls = match get("MAIL_TLS") {
            Some(raw) => raw
                .trim()
                .parse::<TlsMode>()
                .map_err(|_| ConfigError::InvalidTls(raw))?,
            None => TlsMode::default(),
        };

        let (username, password) = match (get("MAIL_USERNAME"), get("MAIL_PASSWORD")) {
            (Some(username), Some(password)) => (username, password),
            (None, None) => (String::new(), String::new()),
            _ => return Err(ConfigError::IncompleteCredentials),
        };

        let mut transport =
            TransportConfig::new(require("MAIL_HOST")?, port, username, password).with_tls(tls);

        if let Some(raw) = get("MAIL_TIMEOUT_SECS") {
            transport = transport.with_timeout(parse_timeout(&raw)?);
        }

        Ok(Self {
            transport_kind,
            transport,
        })
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort(raw.to_string())),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

//! # 送信バックエンド設定
//!
//! 送信バックエンドの接続設定と、バックエンド種別の選択タグを定義する。
//!
//! ## 含まれる型
//!
//! | 型 | 用途 |
//! |---|------|
//! | [`TransportConfig`] | 接続先・認証情報（一度生成したら変更しない） |
//! | [`TlsMode`] | 接続時の暗号化方式 |
//! | [`TransportKind`] | バックエンド種別（lettre / mail-send） |
//!
//! ## セキュリティ
//!
//! `TransportConfig` の Debug 出力ではパスワードをマスクする。
//! Display / Serialize は実装しない。

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{TransportInitError, UnknownTransportType};

/// 接続時の暗号化方式
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum TlsMode {
    /// 平文で接続して STARTTLS で昇格する（submission ポート 587 向け）
    #[default]
    #[serde(rename = "starttls")]
    #[strum(to_string = "starttls")]
    StartTls,
    /// 接続直後から TLS（ポート 465 向け）
    #[serde(rename = "tls", alias = "implicit")]
    #[strum(to_string = "tls", serialize = "implicit")]
    Implicit,
    /// 暗号化しない（Mailpit 等のローカル SMTP 向け）
    #[serde(rename = "none", alias = "disabled")]
    #[strum(to_string = "none", serialize = "disabled")]
    Disabled,
}

/// 送信バックエンド種別
///
/// 閉じた列挙で、ファクトリは全バリアントを網羅的に扱う。
/// 文字列タグからの変換のみ失敗しうる（[`TransportKind::parse`]）。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TransportKind {
    /// lettre の `AsyncSmtpTransport` による SMTP 送信
    Lettre,
    /// mail-send の `SmtpClient` による SMTP 送信
    #[serde(alias = "mail-send")]
    #[strum(to_string = "mail_send", serialize = "mail-send")]
    MailSend,
}

impl TransportKind {
    /// 文字列タグからバックエンド種別を解析する
    ///
    /// 大文字小文字は区別しない。前後の空白は無視する。
    ///
    /// # エラー
    ///
    /// 既知のタグでない場合は [`UnknownTransportType`] を返す。
    pub fn parse(tag: &str) -> Result<Self, UnknownTransportType> {
        tag.trim()
            .parse()
            .map_err(|_| UnknownTransportType(tag.to_string()))
    }
}

/// 送信バックエンドの接続設定
///
/// 外部設定から一度だけ生成する認証情報の束。生成後に認証情報は変更できない。
/// どのバックエンド種別も同じ設定で SMTP サーバーに接続する。
/// ユーザー名が空の場合は認証（AUTH）を行わない。
/// 構造的な検証（ホスト名、ポート番号）はバックエンド生成時に
/// [`validate`](Self::validate) で行う。
///
/// # 使用例
///
/// ```rust
/// use std::time::Duration;
///
/// use mailgate_domain::transport::{TlsMode, TransportConfig};
///
/// let config = TransportConfig::new("smtp.example.com", 587, "u", "p")
///     .with_tls(TlsMode::StartTls)
///     .with_timeout(Duration::from_secs(10));
///
/// assert_eq!(config.host(), "smtp.example.com");
/// assert!(!format!("{config:?}").contains("\"p\""));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct TransportConfig {
    host:     String,
    port:     u16,
    username: String,
    password: String,
    tls:      TlsMode,
    timeout:  Option<Duration>,
}

impl TransportConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            tls: TlsMode::default(),
            timeout: None,
        }
    }

    /// 暗号化方式を指定する
    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    /// 1 回の送信にかけられる時間の上限を指定する
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// パスワードを取得する
    ///
    /// 送信ライブラリへの受け渡し専用。ログやエラーメッセージに含めないこと。
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn tls(&self) -> TlsMode {
        self.tls
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// 構造的な妥当性を検証する
    ///
    /// # バリデーション
    ///
    /// - ホスト名が空でない
    /// - ホスト名に空白・制御文字・`/` を含まない
    /// - ポート番号が 0 でない
    pub fn validate(&self) -> Result<(), TransportInitError> {
        if self.host.trim().is_empty() {
            return Err(TransportInitError::EmptyHost);
        }
        if self
            .host
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '/')
        {
            return Err(TransportInitError::InvalidHost(self.host.clone()));
        }
        if self.port == 0 {
            return Err(TransportInitError::InvalidPort(self.port));
        }
        Ok(())
    }
}

impl std::fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("tls", &self.tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}

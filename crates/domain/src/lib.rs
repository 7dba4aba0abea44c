//! # mailgate ドメイン層
//!
//! メール送信の入力となる値オブジェクトとエラー分類を定義する。
//!
//! ## 設計方針
//!
//! - **値オブジェクト**: 送信前に入力を検証し、不正な値をバックエンドに渡さない
//! - **バックエンド非依存**: 具体的な送信ライブラリ（lettre, mail-send）には一切依存しない
//! - **型によるエラー分類**: 失敗の種類ごとに型を分け、呼び出し側で分岐可能にする
//!
//! ## 依存関係の方向
//!
//! ```text
//! mailgate-dispatch → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`mail`] - メールアドレスとメール内容
//! - [`transport`] - 送信バックエンドの接続設定と種別
//! - [`error`] - エラー定義
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mailgate_domain::mail::{EmailAddress, EmailContent};
//!
//! let from = EmailAddress::new("cedric@prof.dev", "Cédric Prof")?;
//! let content = EmailContent::new("Envoi de mail", "<strong>HTML</strong>");
//!
//! assert_eq!(from.email(), "cedric@prof.dev");
//! assert!(content.is_html());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod mail;
pub mod transport;

pub use error::{
    DeliveryError,
    DeliveryErrorKind,
    InvalidAddress,
    MailError,
    TransportInitError,
    UnknownTransportType,
};

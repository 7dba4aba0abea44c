//! # mailgate インフラ層
//!
//! 送信ライブラリとの接続を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! ドメイン層の値オブジェクトを受け取り、具体的な送信ライブラリ（lettre, mail-send）の
//! 呼び出し規約に変換する。どちらのバックエンドも SMTP サーバーに送信し、
//! 呼び出し側から見た振る舞いとエラー型は同じになる。
//!
//! ## 依存関係
//!
//! ```text
//! mailgate-dispatch → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`transport`] - 送信トレイトと各バックエンド実装
//! - [`factory`] - 設定からバックエンドを生成するファクトリ
//! - `mock` - テスト用の記録付き送信（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use mailgate_domain::transport::{TransportConfig, TransportKind};
//! use mailgate_infra::factory::TransportFactory;
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TransportConfig::new("smtp.example.com", 587, "user", "password");
//!     let transport = TransportFactory::create(&config, TransportKind::Lettre)?;
//!     Ok(())
//! }
//! ```

pub mod factory;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod transport;

pub use factory::TransportFactory;
pub use transport::Transport;

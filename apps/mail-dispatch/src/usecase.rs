//! # ユースケース層
//!
//! ## 設計方針
//!
//! - **依存性注入**: 送信バックエンドを `Arc<dyn Transport>` で外部から注入
//! - **バックエンド非依存**: ユースケースは具体的な送信実装を知らない
//!
//! ## モジュール構成
//!
//! - `dispatch`: メール送信

pub mod dispatch;

pub use dispatch::DispatchService;

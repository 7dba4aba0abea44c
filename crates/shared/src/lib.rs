//! # mailgate 共有ユーティリティ
//!
//! 複数のクレートから使われる、ビジネスロジックを含まないユーティリティ。
//!
//! - [`observability`] - トレーシング初期化とログ出力形式

pub mod observability;

//! # メール送信アプリケーション
//!
//! 送信ユースケースと設定読み込みを公開する。
//! 実行ファイル（`mailgate-dispatch`）はこれらを組み合わせて 1 通のメールを送信する。

pub mod cli;
pub mod config;
pub mod usecase;

//! # エラー定義
//!
//! メール送信の各段階で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **段階ごとの型**: 値オブジェクト生成、バックエンド生成、種別選択、送信の 4 段階で型を分ける
//! - **バックエンド非依存**: 送信ライブラリのエラー型は [`DeliveryError`] に変換してから返す
//! - **秘匿情報を含めない**: エラーメッセージに認証情報を埋め込まない
//!
//! ## エラーの種類
//!
//! | エラー型 | 発生箇所 | 回復 |
//! |---------|---------|------|
//! | [`InvalidAddress`] | `EmailAddress` の生成・変更 | 変更を拒否（値は変わらない） |
//! | [`TransportInitError`] | バックエンドの生成 | 設定を修正するまで回復不可 |
//! | [`UnknownTransportType`] | 種別タグの解析 | 呼び出し側のバグ |
//! | [`DeliveryError`] | 送信 | 呼び出し側が判断（リトライはしない） |

use derive_more::Display;
use thiserror::Error;

/// メールアドレスの形式が不正
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("メールアドレスの形式が不正です: {email}")]
pub struct InvalidAddress {
    /// 拒否されたアドレス文字列
    pub email: String,
}

impl InvalidAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// 送信バックエンドの生成に失敗
///
/// 接続設定の構造的な誤りを表す。ネットワーク接続の失敗はここでは扱わず、
/// 送信時に [`DeliveryError`] として返す。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportInitError {
    /// ホスト名が空
    #[error("ホスト名が設定されていません")]
    EmptyHost,

    /// ホスト名に使用できない文字が含まれる、または URL として解釈できない
    #[error("ホスト名が不正です: {0}")]
    InvalidHost(String),

    /// ポート番号が範囲外（1〜65535）
    #[error("ポート番号が範囲外です: {0}")]
    InvalidPort(u16),

    /// 送信ライブラリが設定を受け付けなかった
    #[error("送信バックエンドの初期化に失敗: {0}")]
    Backend(String),
}

/// 未知の送信バックエンド種別
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("未知の送信バックエンド種別です: {0}")]
pub struct UnknownTransportType(pub String);

/// 送信失敗の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DeliveryErrorKind {
    /// メッセージの組み立てに失敗（アドレス変換、ヘッダー構築など）
    #[display("message")]
    Message,
    /// 送信ライブラリが受け付けなかった、または通信に失敗した
    #[display("submission")]
    Submission,
    /// 送信が期限内に完了しなかった
    #[display("timeout")]
    Timeout,
}

/// 送信失敗
///
/// どのバックエンドが失敗したかに関わらず同じ形で返す。
/// `code` には送信ライブラリ固有のエラーコード（SMTP 応答コードなど）を
/// 取得できた場合のみ格納する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("メール送信に失敗 ({kind}): {message}")]
pub struct DeliveryError {
    kind:    DeliveryErrorKind,
    message: String,
    code:    Option<String>,
}

impl DeliveryError {
    /// メッセージ組み立て失敗を生成する
    pub fn message_build(message: impl Into<String>) -> Self {
        Self {
            kind:    DeliveryErrorKind::Message,
            message: message.into(),
            code:    None,
        }
    }

    /// 送信失敗を生成する
    pub fn submission(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            kind: DeliveryErrorKind::Submission,
            message: message.into(),
            code,
        }
    }

    /// 期限切れを生成する
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind:    DeliveryErrorKind::Timeout,
            message: message.into(),
            code:    None,
        }
    }

    pub fn kind(&self) -> DeliveryErrorKind {
        self.kind
    }

    /// 人が読むためのエラーメッセージ
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 送信ライブラリ固有のエラーコード
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

/// 上記エラーの集約
///
/// 段階をまたいで 1 つの型で扱いたい呼び出し側向け。
#[derive(Debug, Error)]
pub enum MailError {
    #[error(transparent)]
    InvalidAddress(#[from] InvalidAddress),

    #[error(transparent)]
    TransportInit(#[from] TransportInitError),

    #[error(transparent)]
    UnknownTransportType(#[from] UnknownTransportType),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

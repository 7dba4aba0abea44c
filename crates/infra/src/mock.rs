//! # テスト用モック送信
//!
//! ユースケーステストで使用するインメモリの記録付き送信。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! mailgate-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mailgate_domain::{
    DeliveryError,
    mail::{EmailAddress, EmailContent},
};

use crate::transport::Transport;

/// [`MockTransport`] が受け取った 1 回分の送信
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub from:    EmailAddress,
    pub to:      EmailAddress,
    pub content: EmailContent,
}

// ===== MockTransport =====

/// 送信内容を記録し、設定された結果を返す送信
///
/// `Clone` したインスタンス同士は記録を共有する。
#[derive(Clone)]
pub struct MockTransport {
    sent:     Arc<Mutex<Vec<SentEmail>>>,
    response: Result<(), DeliveryError>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// 常に成功する送信を作成する
    pub fn new() -> Self {
        Self {
            sent:     Arc::new(Mutex::new(Vec::new())),
            response: Ok(()),
        }
    }

    /// 常に指定したエラーを返す送信を作成する
    pub fn failing(error: DeliveryError) -> Self {
        Self {
            sent:     Arc::new(Mutex::new(Vec::new())),
            response: Err(error),
        }
    }

    /// これまでに受け取った送信の一覧
    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// 最後に受け取った送信
    pub fn last_sent(&self) -> Option<SentEmail> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        from: &EmailAddress,
        to: &EmailAddress,
        content: &EmailContent,
    ) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(SentEmail {
            from:    from.clone(),
            to:      to.clone(),
            content: content.clone(),
        });
        self.response.clone()
    }
}

//! # メール送信サービス
//!
//! 呼び出し側が使う唯一の送信窓口。
//!
//! ## 設計方針
//!
//! - **依存性注入**: 送信バックエンドは生成時に 1 つだけ受け取り、自分では選ばない
//! - **そのまま転送**: リトライ・変換・ログ出力を一切行わず、結果をそのまま返す
//!
//! テストではバックエンドを記録付きのモックに差し替えられる。

use std::sync::Arc;

use mailgate_domain::{
    DeliveryError,
    mail::{EmailAddress, EmailContent},
};
use mailgate_infra::Transport;

/// メール送信サービス
pub struct DispatchService {
    transport: Arc<dyn Transport>,
}

impl DispatchService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// メールを 1 通送信する
    ///
    /// 送信バックエンドの結果（成功・[`DeliveryError`]）をそのまま返す。
    pub async fn send(
        &self,
        from: &EmailAddress,
        to: &EmailAddress,
        content: &EmailContent,
    ) -> Result<(), DeliveryError> {
        self.transport.send(from, to, content).await
    }
}

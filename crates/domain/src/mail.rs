//! # メール
//!
//! 送信元・宛先のメールアドレスと、件名・本文からなるメール内容を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 不変条件 |
//! |---|------------|---------|
//! | [`EmailAddress`] | メールアドレス（表示名付き） | アドレスは常に書式検証済み |
//! | [`EmailContent`] | メール内容 | なし（空の件名・本文も許容） |
//!
//! ## 設計方針
//!
//! - **生成時検証**: `EmailAddress` は生成時と変更時に書式を検証し、不正な値を持たない
//! - **部分変更なし**: 検証に失敗した変更は値を一切書き換えない
//! - **本文の判断はバックエンドに委ねる**: `EmailContent` は空文字列も受け付ける

use serde::{Deserialize, Serialize};

use crate::InvalidAddress;

const MAX_ADDRESS_LENGTH: usize = 254;
const MAX_LOCAL_PART_LENGTH: usize = 64;
const MAX_LABEL_LENGTH: usize = 63;

// =========================================================================
// EmailAddress（メールアドレス）
// =========================================================================

/// メールアドレス（値オブジェクト）
///
/// アドレスと表示名の組。アドレスは `local@domain.tld` 形式であることが保証される。
/// 表示名からは改行などの制御文字を取り除く（ヘッダーへの混入を防ぐ）。
///
/// # 使用例
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use mailgate_domain::mail::EmailAddress;
///
/// let mut address = EmailAddress::new("cedric@prof.dev", "Cédric Prof")?;
/// assert_eq!(address.to_string(), "Cédric Prof <cedric@prof.dev>");
///
/// // 不正な値への変更は拒否され、元の値が残る
/// assert!(address.set_email("not-an-email").is_err());
/// assert_eq!(address.email(), "cedric@prof.dev");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEmailAddress")]
pub struct EmailAddress {
    email: String,
    name:  String,
}

/// デシリアライズ時の検証前の形
#[derive(Deserialize)]
struct RawEmailAddress {
    email: String,
    #[serde(default)]
    name:  String,
}

impl TryFrom<RawEmailAddress> for EmailAddress {
    type Error = InvalidAddress;

    fn try_from(raw: RawEmailAddress) -> Result<Self, Self::Error> {
        Self::new(raw.email, raw.name)
    }
}

impl EmailAddress {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - `@` がちょうど 1 つあり、ローカル部とドメインが空でない
    /// - 空白・制御文字を含まない
    /// - ドメインは `.` を含み、各ラベルが英数字とハイフンのみ
    /// - 全体で 254 文字以内、ローカル部は 64 文字以内
    ///
    /// 表示名の制御文字は取り除く。
    ///
    /// # エラー
    ///
    /// 書式に合わない場合は [`InvalidAddress`] を返す。
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Result<Self, InvalidAddress> {
        let email = email.into();
        validate_address(&email)?;
        Ok(Self {
            email,
            name: sanitize_name(name.into()),
        })
    }

    /// アドレスを取得する
    pub fn email(&self) -> &str {
        &self.email
    }

    /// 表示名を取得する
    pub fn name(&self) -> &str {
        &self.name
    }

    /// アドレスを変更する
    ///
    /// [`new`](Self::new) と同じ検証を行う。失敗した場合は元の値のまま。
    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), InvalidAddress> {
        let email = email.into();
        validate_address(&email)?;
        self.email = email;
        Ok(())
    }

    /// 表示名を変更する
    ///
    /// 制御文字は取り除く。
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = sanitize_name(name.into());
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.email)
        } else {
            write!(f, "{} <{}>", self.name, self.email)
        }
    }
}

fn sanitize_name(name: String) -> String {
    if name.chars().any(char::is_control) {
        name.chars().filter(|c| !c.is_control()).collect()
    } else {
        name
    }
}

fn validate_address(value: &str) -> Result<(), InvalidAddress> {
    if is_valid_address(value) {
        Ok(())
    } else {
        Err(InvalidAddress::new(value))
    }
}

fn is_valid_address(value: &str) -> bool {
    if value.is_empty() || value.len() > MAX_ADDRESS_LENGTH {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    is_valid_local_part(local) && is_valid_domain(domain)
}

/// RFC 5322 の dot-atom 形式（引用符付きローカル部は受け付けない）
fn is_valid_local_part(local: &str) -> bool {
    const ATEXT_SYMBOLS: &str = "!#$%&'*+/=?^_`{|}~-";

    if local.is_empty() || local.len() > MAX_LOCAL_PART_LENGTH {
        return false;
    }

    local
        .split('.')
        .all(|atom| {
            !atom.is_empty()
                && atom
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || ATEXT_SYMBOLS.contains(c))
        })
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LENGTH
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    // トップレベルが数字のみのものは IP アドレスの書き損じとして扱う
    let tld_ok = labels
        .last()
        .is_some_and(|tld| !tld.chars().all(|c| c.is_ascii_digit()));

    labels_ok && tld_ok
}

// =========================================================================
// EmailContent（メール内容）
// =========================================================================

/// メール内容（値オブジェクト）
///
/// 件名・本文・本文形式（HTML かプレーンテキストか）の組。
/// 生成は失敗しない。空の件名や本文を拒否するかどうかは送信バックエンドが決める。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContent {
    subject: String,
    body:    String,
    #[serde(default = "default_is_html")]
    is_html: bool,
}

fn default_is_html() -> bool {
    true
}

impl EmailContent {
    /// HTML 形式のメール内容を作成する
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_format(subject, body, true)
    }

    /// プレーンテキスト形式のメール内容を作成する
    pub fn plain_text(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_format(subject, body, false)
    }

    /// 本文形式を指定してメール内容を作成する
    pub fn with_format(subject: impl Into<String>, body: impl Into<String>, is_html: bool) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            is_html,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// 本文が HTML かどうか
    pub fn is_html(&self) -> bool {
        self.is_html
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn set_html(&mut self, is_html: bool) {
        self.is_html = is_html;
    }
}

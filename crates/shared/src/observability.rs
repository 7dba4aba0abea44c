//! # Observability 基盤
//!
//! トレーシング初期化とログ出力形式の設定を提供する。
//! 環境変数 `LOG_FORMAT` で JSON / Pretty 出力を切り替え、`RUST_LOG` でログレベルを制御する。

/// 既定のログフィルタ（`RUST_LOG` 未設定時）
pub const DEFAULT_FILTER: &str = "info,mailgate=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON 形式（ログ収集基盤向け）
    Json,
    /// 人間が読みやすい形式（端末向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// 文字列からログ形式を解析する
    ///
    /// 未設定・不正な値は [`Pretty`](LogFormat::Pretty) とする。
    /// 不正な値だった場合は第 2 要素にその値を返す（トレーシング初期化後に警告するため）。
    pub fn parse(value: Option<&str>) -> (Self, Option<String>) {
        match value.map(str::trim) {
            None | Some("") => (Self::Pretty, None),
            Some(v) if v.eq_ignore_ascii_case("json") => (Self::Json, None),
            Some(v) if v.eq_ignore_ascii_case("pretty") => (Self::Pretty, None),
            Some(other) => (Self::Pretty, Some(other.to_string())),
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// ログ出力形式
    pub log_format:      LogFormat,
    /// `RUST_LOG` 未設定時に使うフィルタ
    pub default_filter:  String,
    /// 解釈できなかった `LOG_FORMAT` の値
    pub rejected_format: Option<String>,
}

impl TracingConfig {
    pub fn new(log_format: LogFormat) -> Self {
        Self {
            log_format,
            default_filter: DEFAULT_FILTER.to_string(),
            rejected_format: None,
        }
    }

    /// 環境変数 `LOG_FORMAT` から設定を読み取る
    pub fn from_env() -> Self {
        let raw = std::env::var("LOG_FORMAT").ok();
        let (log_format, rejected_format) = LogFormat::parse(raw.as_deref());
        Self {
            rejected_format,
            ..Self::new(log_format)
        }
    }
}

/// トレーシングを初期化する
///
/// 既にグローバルなサブスクライバが設定されている場合はエラーを返す。
#[cfg(feature = "observability")]
pub fn init_tracing(
    config: &TracingConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_filter.as_str().into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
}

use crate::models::Stage;
use thiserror::Error;

/// 抽取过程中的错误，均为本次运行的终止性错误
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("{stage}: I/O error at line {line}: {source}")]
    Io {
        stage: Stage,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage}: cannot open {resource}: {source}")]
    Open {
        stage: Stage,
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage}: malformed record at line {line}: expected field {field}, got {found} field(s)")]
    MalformedRecord {
        stage: Stage,
        line: usize,
        field: usize,
        found: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Report export failed: {0}")]
    Report(#[from] csv::Error),
}

impl ExtractError {
    /// 出错的阶段（配置类错误没有阶段）
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Io { stage, .. } | Self::Open { stage, .. } | Self::MalformedRecord { stage, .. } => {
                Some(*stage)
            }
            _ => None,
        }
    }

    /// 出错的行号（1 起始）
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io { line, .. } | Self::MalformedRecord { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;

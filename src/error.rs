use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SidenavError {
    #[error("读取文件失败 {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),
    #[error("输出失败: {0}")]
    Output(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, SidenavError>;

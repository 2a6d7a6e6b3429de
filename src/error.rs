//! 错误类型定义

use crate::graph::{EdgeId, VertexId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("顶点不存在: {0}")]
    VertexNotFound(VertexId),

    #[error("边不存在: {0}")]
    EdgeNotFound(EdgeId),

    #[error("顶点 {vertex} 不是边 {edge} 的端点")]
    NotIncident { vertex: VertexId, edge: EdgeId },
}

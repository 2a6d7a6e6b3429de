//! 顶点定义
//!
//! 顶点只是一个句柄加上一个泛型标签，身份由句柄决定而非标签

use serde::{Deserialize, Serialize};
use std::fmt;

/// 顶点 ID（图内唯一，不复用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u64);

impl VertexId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VertexId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// 顶点
#[derive(Debug, Clone)]
pub struct Vertex<V> {
    /// 顶点 ID
    id: VertexId,
    /// 顶点标签
    label: V,
}

impl<V> Vertex<V> {
    /// 创建新顶点
    pub(crate) fn new(id: VertexId, label: V) -> Self {
        Self { id, label }
    }

    /// 获取顶点 ID
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// 获取顶点标签
    pub fn label(&self) -> &V {
        &self.label
    }

    /// 获取可变标签
    pub fn label_mut(&mut self) -> &mut V {
        &mut self.label
    }
}

impl<V: fmt::Display> fmt::Display for Vertex<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

//! 边定义
//!
//! 一条边由两个端点 (v0, v1) 和一个泛型标签组成。
//! 有向图中边从 v0 指向 v1；无向图中同一条存储边可以从任一端点查询。

use crate::error::{Error, Result};
use crate::graph::vertex::VertexId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 边 ID（图内唯一，不复用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for EdgeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// 边
#[derive(Debug, Clone)]
pub struct Edge<E> {
    /// 边 ID
    id: EdgeId,
    /// 出发端点
    v0: VertexId,
    /// 到达端点
    v1: VertexId,
    /// 边标签
    label: E,
}

impl<E> Edge<E> {
    /// 创建新边
    pub(crate) fn new(id: EdgeId, v0: VertexId, v1: VertexId, label: E) -> Self {
        Self { id, v0, v1, label }
    }

    /// 获取边 ID
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// 边离开的顶点（无向边中为任一端点）
    pub fn v0(&self) -> VertexId {
        self.v0
    }

    /// 边进入的顶点（无向边中为另一端点）
    pub fn v1(&self) -> VertexId {
        self.v1
    }

    /// 获取边标签
    pub fn label(&self) -> &E {
        &self.label
    }

    /// 两个端点
    pub fn endpoints(&self) -> (VertexId, VertexId) {
        (self.v0, self.v1)
    }

    /// 是否为自环
    pub fn is_loop(&self) -> bool {
        self.v0 == self.v1
    }

    /// 是否与顶点相邻
    pub fn is_incident(&self, v: VertexId) -> bool {
        self.v0 == v || self.v1 == v
    }

    /// 返回边上 `v` 之外的另一端点
    ///
    /// `v` 不是端点时返回 [`Error::NotIncident`]。
    pub fn other(&self, v: VertexId) -> Result<VertexId> {
        if v == self.v0 {
            Ok(self.v1)
        } else if v == self.v1 {
            Ok(self.v0)
        } else {
            Err(Error::NotIncident {
                vertex: v,
                edge: self.id,
            })
        }
    }
}

impl<E: fmt::Display> fmt::Display for Edge<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{}):{}", self.v0, self.v1, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_endpoints() {
        let e = Edge::new(EdgeId::new(1), VertexId::new(100), VertexId::new(200), 5);

        assert_eq!(e.id().as_u64(), 1);
        assert_eq!(e.v0().as_u64(), 100);
        assert_eq!(e.v1().as_u64(), 200);
        assert_eq!(*e.label(), 5);
        assert!(!e.is_loop());
        assert_eq!(e.to_string(), "(v100,v200):5");
    }

    #[test]
    fn test_edge_other() {
        let e = Edge::new(EdgeId::new(1), VertexId::new(1), VertexId::new(2), ());

        assert_eq!(e.other(VertexId::new(1)), Ok(VertexId::new(2)));
        assert_eq!(e.other(VertexId::new(2)), Ok(VertexId::new(1)));
        assert_eq!(
            e.other(VertexId::new(3)),
            Err(Error::NotIncident {
                vertex: VertexId::new(3),
                edge: EdgeId::new(1),
            })
        );
    }

    #[test]
    fn test_self_loop_other() {
        let e = Edge::new(EdgeId::new(9), VertexId::new(4), VertexId::new(4), "loop");

        assert!(e.is_loop());
        assert_eq!(e.other(VertexId::new(4)), Ok(VertexId::new(4)));
    }
}

//! 邻接索引
//!
//! 每个顶点对应一条出边列表和一条入边列表（存储方向）。
//! 无向图也使用同一份索引，方向合并在查询层完成。

use crate::graph::edge::EdgeId;
use crate::graph::vertex::VertexId;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::HashMap;

/// 单个顶点的邻接边列表
pub type EdgeList = SmallVec<[EdgeId; 4]>;

/// 邻接索引
#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    /// 源顶点到出边的映射
    outgoing: HashMap<VertexId, EdgeList>,
    /// 目标顶点到入边的映射
    incoming: HashMap<VertexId, EdgeList>,
}

impl AdjacencyIndex {
    /// 创建新索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 预分配顶点容量
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            outgoing: HashMap::with_capacity(vertices),
            incoming: HashMap::with_capacity(vertices),
        }
    }

    /// 注册一个没有邻接边的顶点
    pub fn add_vertex(&mut self, vertex_id: VertexId) {
        self.outgoing.entry(vertex_id).or_default();
        self.incoming.entry(vertex_id).or_default();
    }

    /// 移除顶点的邻接列表，返回其出边与入边
    pub fn remove_vertex(&mut self, vertex_id: VertexId) -> (EdgeList, EdgeList) {
        (
            self.outgoing.remove(&vertex_id).unwrap_or_default(),
            self.incoming.remove(&vertex_id).unwrap_or_default(),
        )
    }

    /// 添加边
    pub fn add_edge(&mut self, edge_id: EdgeId, src: VertexId, dst: VertexId) {
        // 出边索引
        self.outgoing.entry(src).or_default().push(edge_id);

        // 入边索引
        self.incoming.entry(dst).or_default().push(edge_id);
    }

    /// 移除边
    pub fn remove_edge(&mut self, edge_id: EdgeId, src: VertexId, dst: VertexId) {
        if let Some(edges) = self.outgoing.get_mut(&src) {
            edges.retain(|id| *id != edge_id);
        }
        if let Some(edges) = self.incoming.get_mut(&dst) {
            edges.retain(|id| *id != edge_id);
        }
    }

    /// 获取顶点的出边
    pub fn get_outgoing(&self, vertex_id: VertexId) -> &[EdgeId] {
        self.outgoing
            .get(&vertex_id)
            .map(|edges| edges.as_slice())
            .unwrap_or(&[])
    }

    /// 获取顶点的入边
    pub fn get_incoming(&self, vertex_id: VertexId) -> &[EdgeId] {
        self.incoming
            .get(&vertex_id)
            .map(|edges| edges.as_slice())
            .unwrap_or(&[])
    }

    /// 获取顶点的出度（存储方向）
    pub fn out_degree(&self, vertex_id: VertexId) -> usize {
        self.get_outgoing(vertex_id).len()
    }

    /// 获取顶点的入度（存储方向）
    pub fn in_degree(&self, vertex_id: VertexId) -> usize {
        self.get_incoming(vertex_id).len()
    }

    /// 按给定顺序对所有邻接列表做一次稳定排序
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&EdgeId, &EdgeId) -> Ordering,
    {
        for edges in self
            .outgoing
            .values_mut()
            .chain(self.incoming.values_mut())
        {
            edges.sort_by(&mut compare);
        }
    }
}

//! 图数据结构
//!
//! 可变多重图：允许平行边与自环。有向图与无向图共用同一份存储，
//! 无向图只是在查询时把两个存储方向合并。

use super::edge::{Edge, EdgeId};
use super::index::AdjacencyIndex;
use super::vertex::{Vertex, VertexId};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// 图的方向性
pub trait EdgeType {
    /// 是否为有向图
    fn is_directed() -> bool;
}

/// 有向图标记
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directed;

/// 无向图标记
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Undirected;

impl EdgeType for Directed {
    fn is_directed() -> bool {
        true
    }
}

impl EdgeType for Undirected {
    fn is_directed() -> bool {
        false
    }
}

/// 有向图
pub type DirectedGraph<V, E> = Graph<V, E, Directed>;

/// 无向图
pub type UndirectedGraph<V, E> = Graph<V, E, Undirected>;

/// 图
///
/// 顶点标签类型为 `V`，边标签类型为 `E`。所有迭代器都借用图本身，
/// 因此在迭代期间无法修改图结构；需要边删边迭代时先 `collect` 一份快照。
#[derive(Clone)]
pub struct Graph<V, E, Ty = Directed> {
    /// 顶点（插入顺序）
    vertices: IndexMap<VertexId, Vertex<V>>,
    /// 边（插入顺序，或最近一次 `order_edges` 的顺序）
    edges: IndexMap<EdgeId, Edge<E>>,
    /// 邻接索引
    index: AdjacencyIndex,
    /// 下一个顶点 ID
    next_vertex_id: u64,
    /// 下一个边 ID
    next_edge_id: u64,
    ty: PhantomData<Ty>,
}

impl<V, E, Ty: EdgeType> Default for Graph<V, E, Ty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E, Ty: EdgeType> Graph<V, E, Ty> {
    /// 创建空图
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// 创建预分配容量的空图
    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: IndexMap::with_capacity(vertices),
            edges: IndexMap::with_capacity(edges),
            index: AdjacencyIndex::with_capacity(vertices),
            next_vertex_id: 0,
            next_edge_id: 0,
            ty: PhantomData,
        }
    }

    /// 是否为有向图
    pub fn is_directed(&self) -> bool {
        Ty::is_directed()
    }

    // ==================== 顶点操作 ====================

    /// 添加一个没有邻接边的顶点
    pub fn add_vertex(&mut self, label: V) -> VertexId {
        let id = VertexId::new(self.next_vertex_id);
        self.next_vertex_id += 1;

        self.index.add_vertex(id);
        self.vertices.insert(id, Vertex::new(id, label));

        trace!(vertex = %id, "添加顶点");
        id
    }

    /// 获取顶点
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex<V>> {
        self.vertices.get(&id)
    }

    /// 获取顶点标签
    pub fn vertex_label(&self, id: VertexId) -> Option<&V> {
        self.vertices.get(&id).map(Vertex::label)
    }

    /// 获取可变顶点标签
    pub fn vertex_label_mut(&mut self, id: VertexId) -> Option<&mut V> {
        self.vertices.get_mut(&id).map(Vertex::label_mut)
    }

    /// 顶点是否属于本图
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// 顶点在插入顺序中的位置
    pub(crate) fn vertex_rank(&self, id: VertexId) -> Option<usize> {
        self.vertices.get_index_of(&id)
    }

    /// 删除顶点及其所有邻接边
    pub fn remove_vertex(&mut self, id: VertexId) {
        if !self.vertices.contains_key(&id) {
            return;
        }

        let (outgoing, incoming) = self.index.remove_vertex(id);
        let mut incident: Vec<EdgeId> = outgoing.into_iter().chain(incoming).collect();
        // 自环同时出现在出边与入边列表中
        incident.sort_unstable();
        incident.dedup();

        for edge_id in &incident {
            self.remove_edge(*edge_id);
        }
        self.vertices.shift_remove(&id);

        debug!(vertex = %id, removed_edges = incident.len(), "删除顶点");
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // ==================== 边操作 ====================

    /// 添加边
    ///
    /// 有向图中边从 `from` 指向 `to`。两个端点都必须属于本图。
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, label: E) -> Result<EdgeId> {
        if !self.vertices.contains_key(&from) {
            return Err(Error::VertexNotFound(from));
        }
        if !self.vertices.contains_key(&to) {
            return Err(Error::VertexNotFound(to));
        }

        let id = EdgeId::new(self.next_edge_id);
        self.next_edge_id += 1;

        self.index.add_edge(id, from, to);
        self.edges.insert(id, Edge::new(id, from, to, label));

        trace!(edge = %id, %from, %to, "添加边");
        Ok(id)
    }

    /// 添加使用默认标签的边
    pub fn add_unlabeled_edge(&mut self, from: VertexId, to: VertexId) -> Result<EdgeId>
    where
        E: Default,
    {
        self.add_edge(from, to, E::default())
    }

    /// 获取边
    pub fn edge(&self, id: EdgeId) -> Option<&Edge<E>> {
        self.edges.get(&id)
    }

    /// 获取边标签
    pub fn edge_label(&self, id: EdgeId) -> Option<&E> {
        self.edges.get(&id).map(Edge::label)
    }

    /// 边是否属于本图
    pub fn contains_edge_id(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// 删除边，不存在时什么也不做
    pub fn remove_edge(&mut self, id: EdgeId) {
        if let Some(edge) = self.edges.shift_remove(&id) {
            self.index.remove_edge(id, edge.v0(), edge.v1());
            trace!(edge = %id, "删除边");
        }
    }

    /// 删除两个顶点之间的所有边（两个存储方向都删除）
    pub fn remove_edges_between(&mut self, v1: VertexId, v2: VertexId) {
        let mut doomed: Vec<EdgeId> = self
            .stored_between(v1, v2)
            .chain(self.stored_between(v2, v1))
            .collect();
        doomed.sort_unstable();
        doomed.dedup();

        for edge_id in &doomed {
            self.remove_edge(*edge_id);
        }
        debug!(%v1, %v2, removed = doomed.len(), "删除点对之间的边");
    }

    /// 获取边数量
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 按存储方向从 `u` 指向 `v` 的边
    fn stored_between(&self, u: VertexId, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.index
            .get_outgoing(u)
            .iter()
            .copied()
            .filter(move |id| self.edges.get(id).is_some_and(|e| e.v1() == v))
    }

    /// 获取两点之间的所有边；无向图包含两个方向
    pub fn edges_between(&self, u: VertexId, v: VertexId) -> Vec<EdgeId> {
        let mut edges: Vec<EdgeId> = self.stored_between(u, v).collect();
        if !Ty::is_directed() && u != v {
            edges.extend(self.stored_between(v, u));
        }
        edges
    }

    /// 是否存在边 (u, v)，标签任意
    pub fn contains_edge(&self, u: VertexId, v: VertexId) -> bool {
        self.stored_between(u, v).next().is_some()
            || (!Ty::is_directed() && self.stored_between(v, u).next().is_some())
    }

    /// 是否存在标签为 `label` 的边 (u, v)
    pub fn contains_labeled_edge(&self, u: VertexId, v: VertexId, label: &E) -> bool
    where
        E: PartialEq,
    {
        let labeled = |id: EdgeId| self.edges.get(&id).is_some_and(|e| e.label() == label);
        self.stored_between(u, v).any(labeled)
            || (!Ty::is_directed() && self.stored_between(v, u).any(labeled))
    }

    /// 返回边上 `from` 之外的另一端点
    pub fn other_endpoint(&self, edge: EdgeId, from: VertexId) -> Result<VertexId> {
        self.edges
            .get(&edge)
            .ok_or(Error::EdgeNotFound(edge))?
            .other(from)
    }

    // ==================== 度与邻居查询 ====================

    /// 出度；无向图为出入之和，自环计两次
    pub fn out_degree(&self, v: VertexId) -> usize {
        if Ty::is_directed() {
            self.index.out_degree(v)
        } else {
            self.index.out_degree(v) + self.index.in_degree(v)
        }
    }

    /// 入度；无向图与出度相同
    pub fn in_degree(&self, v: VertexId) -> usize {
        if Ty::is_directed() {
            self.index.in_degree(v)
        } else {
            self.out_degree(v)
        }
    }

    /// `out_degree` 的同义词，用于无向图
    pub fn degree(&self, v: VertexId) -> usize {
        self.out_degree(v)
    }

    /// 所有顶点
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    /// 所有边
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.keys().copied()
    }

    /// 顶点的出边；无向图包含两个存储方向
    pub fn out_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        let incoming: &[EdgeId] = if Ty::is_directed() {
            &[]
        } else {
            self.index.get_incoming(v)
        };
        self.index
            .get_outgoing(v)
            .iter()
            .chain(incoming)
            .copied()
    }

    /// 顶点的入边；无向图与 `out_edges` 相同
    pub fn in_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        let (first, second): (&[EdgeId], &[EdgeId]) = if Ty::is_directed() {
            (self.index.get_incoming(v), &[])
        } else {
            (self.index.get_outgoing(v), self.index.get_incoming(v))
        };
        first.iter().chain(second).copied()
    }

    /// `out_edges` 的同义词，用于无向图
    pub fn incident_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(v)
    }

    /// 后继顶点（每条出边一个，平行边会重复）
    pub fn successors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.out_edges(v)
            .filter_map(move |id| self.edges.get(&id)?.other(v).ok())
    }

    /// 前驱顶点；无向图与 `successors` 相同
    pub fn predecessors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.in_edges(v)
            .filter_map(move |id| self.edges.get(&id)?.other(v).ok())
    }

    /// `successors` 的同义词，用于无向图
    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.successors(v)
    }

    // ==================== 排序 ====================

    /// 按边标签对边序列及每个顶点的邻接列表做一次性排序
    ///
    /// 之后新增的边不保证维持该顺序，需要时再次调用。
    pub fn order_edges<F>(&mut self, mut compare: F)
    where
        F: FnMut(&E, &E) -> Ordering,
    {
        self.edges
            .sort_by(|_, a, _, b| compare(a.label(), b.label()));

        let edges = &self.edges;
        self.index
            .sort_by(|a, b| match (edges.get(a), edges.get(b)) {
                (Some(x), Some(y)) => compare(x.label(), y.label()),
                _ => Ordering::Equal,
            });

        debug!(edges = self.edges.len(), "边已按标签排序");
    }

    /// 按标签的自然顺序排序边
    pub fn order_edges_by_label(&mut self)
    where
        E: Ord,
    {
        self.order_edges(|a, b| a.cmp(b));
    }
}

impl<V, E, Ty: EdgeType> fmt::Debug for Graph<V, E, Ty> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("directed", &Ty::is_directed())
            .field("vertices", &self.vertices.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}

//! 通用图遍历
//!
//! 遍历维护一个"边缘"（fringe）：反复从中取出一个未标记的顶点，访问它，
//! 再把它尚未标记的后继加入边缘。取出顺序由遍历方式决定：
//! - 一般遍历：边缘按调用方给出的标签顺序排序，不调用 `post_visit`
//! - 深度优先：后进先出，全部后继处理完后对顶点调用 `post_visit`
//! - 广度优先：先进先出，顶点第二次出队时调用 `post_visit`
//!
//! 访问者的每个钩子返回 [`VisitFlow`]：
//! - `Stop` 立即结束整个遍历，当时正在处理的顶点可由 `final_vertex` 取得
//! - `Reject` 在 `pre_visit` 中阻止该边的目标进入边缘；在 `visit` 中阻止
//!   展开该顶点的后继；在 `post_visit` 中无效

use crate::graph::{EdgeId, EdgeType, Graph, VertexId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// 访问者钩子的返回值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitFlow {
    /// 继续遍历
    #[default]
    Continue,
    /// 拒绝当前边或当前顶点的后继
    Reject,
    /// 终止遍历
    Stop,
}

/// 遍历方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraversalMode {
    /// 按标签顺序的一般遍历
    General,
    /// 深度优先
    DepthFirst,
    /// 广度优先
    BreadthFirst,
}

/// 遍历访问者
///
/// 所有钩子默认什么也不做并返回 [`VisitFlow::Continue`]。
pub trait Visitor<V, E, Ty: EdgeType> {
    /// 准备把 `edge` 另一端的顶点加入边缘时调用
    fn pre_visit(&mut self, _graph: &Graph<V, E, Ty>, _edge: EdgeId, _from: VertexId) -> VisitFlow {
        VisitFlow::Continue
    }

    /// 顶点第一次从边缘取出并被标记时调用，每个顶点恰好一次
    fn visit(&mut self, _graph: &Graph<V, E, Ty>, _vertex: VertexId) -> VisitFlow {
        VisitFlow::Continue
    }

    /// 顶点的后继全部处理完后调用（仅深度优先与广度优先）
    fn post_visit(&mut self, _graph: &Graph<V, E, Ty>, _vertex: VertexId) -> VisitFlow {
        VisitFlow::Continue
    }
}

impl<V, E, Ty: EdgeType> Visitor<V, E, Ty> for () {}

type LabelOrder<'g, V> = Rc<dyn Fn(&V, &V) -> Ordering + 'g>;

/// 图遍历器
///
/// 持有访问者，并在一次完整遍历及其后续的 `continue_traversing` 期间借用图。
pub struct Traversal<'g, V, E, Ty, H> {
    visitor: H,
    graph: Option<&'g Graph<V, E, Ty>>,
    mode: Option<TraversalMode>,
    order: Option<LabelOrder<'g, V>>,
    /// 本轮遍历已标记的顶点
    marked: HashSet<VertexId>,
    final_vertex: Option<VertexId>,
    final_edge: Option<EdgeId>,
}

impl<'g, V, E, Ty, H> Traversal<'g, V, E, Ty, H>
where
    Ty: EdgeType,
    H: Visitor<V, E, Ty>,
{
    /// 创建遍历器
    pub fn new(visitor: H) -> Self {
        Self {
            visitor,
            graph: None,
            mode: None,
            order: None,
            marked: HashSet::new(),
            final_vertex: None,
            final_edge: None,
        }
    }

    pub fn visitor(&self) -> &H {
        &self.visitor
    }

    pub fn visitor_mut(&mut self) -> &mut H {
        &mut self.visitor
    }

    pub fn into_visitor(self) -> H {
        self.visitor
    }

    /// 最近一次完整遍历的方式
    pub fn mode(&self) -> Option<TraversalMode> {
        self.mode
    }

    /// 遍历被 `Stop` 提前终止时正在处理的顶点；正常结束时为 `None`
    pub fn final_vertex(&self) -> Option<VertexId> {
        self.final_vertex
    }

    /// 若终止由 `pre_visit` 引起，返回当时的边
    pub fn final_edge(&self) -> Option<EdgeId> {
        self.final_edge
    }

    pub fn is_marked(&self, vertex: VertexId) -> bool {
        self.marked.contains(&vertex)
    }

    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    /// 一般遍历：边缘按 `order` 对顶点标签排序，每次取出最小者
    ///
    /// 顺序相同的顶点按加入边缘的先后取出。
    pub fn traverse<F>(&mut self, graph: &'g Graph<V, E, Ty>, start: VertexId, order: F)
    where
        F: Fn(&V, &V) -> Ordering + 'g,
    {
        self.begin(graph, TraversalMode::General);
        self.order = Some(Rc::new(order));
        self.run_general(graph, start);
    }

    /// 深度优先遍历
    pub fn depth_first_traverse(&mut self, graph: &'g Graph<V, E, Ty>, start: VertexId) {
        self.begin(graph, TraversalMode::DepthFirst);
        self.run_depth_first(graph, start);
    }

    /// 广度优先遍历
    pub fn breadth_first_traverse(&mut self, graph: &'g Graph<V, E, Ty>, start: VertexId) {
        self.begin(graph, TraversalMode::BreadthFirst);
        self.run_breadth_first(graph, start);
    }

    /// 以相同方式和相同的标记集合，从 `start` 继续上一次遍历
    ///
    /// 已标记的顶点不会再次访问，可用于遍历尚未到达的其他连通分量。
    pub fn continue_traversing(&mut self, start: VertexId) {
        let (Some(graph), Some(mode)) = (self.graph, self.mode) else {
            warn!(%start, "没有可继续的遍历");
            return;
        };

        self.final_vertex = None;
        self.final_edge = None;
        if self.marked.contains(&start) {
            trace!(%start, "起点已标记，跳过");
            return;
        }

        debug!(%start, ?mode, marked = self.marked.len(), "继续遍历");
        match mode {
            TraversalMode::General => self.run_general(graph, start),
            TraversalMode::DepthFirst => self.run_depth_first(graph, start),
            TraversalMode::BreadthFirst => self.run_breadth_first(graph, start),
        }
    }

    fn begin(&mut self, graph: &'g Graph<V, E, Ty>, mode: TraversalMode) {
        self.graph = Some(graph);
        self.mode = Some(mode);
        self.order = None;
        self.marked.clear();
        self.final_vertex = None;
        self.final_edge = None;
        debug!(?mode, vertices = graph.vertex_count(), "开始遍历");
    }

    fn stop_at(&mut self, vertex: VertexId, edge: Option<EdgeId>) {
        self.final_vertex = Some(vertex);
        self.final_edge = edge;
        debug!(%vertex, marked = self.marked.len(), "遍历被终止");
    }

    fn run_general(&mut self, graph: &'g Graph<V, E, Ty>, start: VertexId) {
        let Some(order) = self.order.clone() else {
            return;
        };
        let order: &dyn Fn(&V, &V) -> Ordering = &*order;

        let mut fringe = BinaryHeap::new();
        let mut seq = 0;
        fringe.extend(OrderedEntry::new(graph, start, seq, order));

        while let Some(entry) = fringe.pop() {
            let current = entry.vertex;
            if !self.marked.insert(current) {
                continue;
            }

            match self.visitor.visit(graph, current) {
                VisitFlow::Stop => return self.stop_at(current, None),
                VisitFlow::Reject => continue,
                VisitFlow::Continue => {}
            }

            for edge in graph.out_edges(current) {
                let Ok(child) = graph.other_endpoint(edge, current) else {
                    continue;
                };
                if self.marked.contains(&child) {
                    continue;
                }
                match self.visitor.pre_visit(graph, edge, current) {
                    VisitFlow::Stop => return self.stop_at(current, Some(edge)),
                    VisitFlow::Reject => {}
                    VisitFlow::Continue => {
                        seq += 1;
                        fringe.extend(OrderedEntry::new(graph, child, seq, order));
                    }
                }
            }
        }
    }

    fn run_depth_first(&mut self, graph: &'g Graph<V, E, Ty>, start: VertexId) {
        let mut stack = Vec::new();
        match self.enter(graph, start) {
            DepthStep::Expand(frame) => stack.push(frame),
            DepthStep::Done => return,
            DepthStep::Halt => return,
        }

        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = frame.successors.get(frame.next) {
                frame.next += 1;
                match self.enter(graph, child) {
                    DepthStep::Expand(frame) => stack.push(frame),
                    DepthStep::Done => {}
                    DepthStep::Halt => return,
                }
            } else {
                let vertex = frame.vertex;
                stack.pop();
                if self.visitor.post_visit(graph, vertex) == VisitFlow::Stop {
                    return self.stop_at(vertex, None);
                }
            }
        }
    }

    /// 深度优先中进入一个顶点：标记、访问、对未标记后继调用 `pre_visit`
    fn enter(&mut self, graph: &Graph<V, E, Ty>, vertex: VertexId) -> DepthStep {
        if !self.marked.insert(vertex) {
            return DepthStep::Done;
        }

        match self.visitor.visit(graph, vertex) {
            VisitFlow::Stop => {
                self.stop_at(vertex, None);
                return DepthStep::Halt;
            }
            VisitFlow::Reject => {
                if self.visitor.post_visit(graph, vertex) == VisitFlow::Stop {
                    self.stop_at(vertex, None);
                    return DepthStep::Halt;
                }
                return DepthStep::Done;
            }
            VisitFlow::Continue => {}
        }

        let mut successors = Vec::new();
        let mut excluded = HashSet::new();
        for edge in graph.out_edges(vertex) {
            let Ok(child) = graph.other_endpoint(edge, vertex) else {
                continue;
            };
            successors.push(child);
            if self.marked.contains(&child) {
                continue;
            }
            match self.visitor.pre_visit(graph, edge, vertex) {
                VisitFlow::Stop => {
                    self.stop_at(vertex, Some(edge));
                    return DepthStep::Halt;
                }
                VisitFlow::Reject => {
                    excluded.insert(child);
                }
                VisitFlow::Continue => {}
            }
        }
        successors.retain(|child| !excluded.contains(child));

        DepthStep::Expand(Frame {
            vertex,
            successors,
            next: 0,
        })
    }

    fn run_breadth_first(&mut self, graph: &'g Graph<V, E, Ty>, start: VertexId) {
        let mut fringe = VecDeque::from([start]);

        while let Some(current) = fringe.pop_front() {
            if self.marked.insert(current) {
                match self.visitor.visit(graph, current) {
                    VisitFlow::Stop => return self.stop_at(current, None),
                    VisitFlow::Reject => {
                        fringe.push_back(current);
                        continue;
                    }
                    VisitFlow::Continue => {}
                }

                for edge in graph.out_edges(current) {
                    let Ok(child) = graph.other_endpoint(edge, current) else {
                        continue;
                    };
                    if self.marked.contains(&child) {
                        continue;
                    }
                    match self.visitor.pre_visit(graph, edge, current) {
                        VisitFlow::Stop => return self.stop_at(current, Some(edge)),
                        VisitFlow::Reject => {}
                        VisitFlow::Continue => fringe.push_back(child),
                    }
                }
                // 第二次出队时调用 post_visit
                fringe.push_back(current);
            } else {
                if self.visitor.post_visit(graph, current) == VisitFlow::Stop {
                    return self.stop_at(current, None);
                }
                fringe.retain(|&v| v != current);
            }
        }
    }
}

impl<V, E, Ty, H: fmt::Debug> fmt::Debug for Traversal<'_, V, E, Ty, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traversal")
            .field("visitor", &self.visitor)
            .field("mode", &self.mode)
            .field("marked", &self.marked.len())
            .field("final_vertex", &self.final_vertex)
            .field("final_edge", &self.final_edge)
            .finish()
    }
}

/// 深度优先栈帧
struct Frame {
    vertex: VertexId,
    successors: Vec<VertexId>,
    next: usize,
}

enum DepthStep {
    /// 顶点已访问，需要展开后继
    Expand(Frame),
    /// 顶点已标记，或被拒绝且已完成 post_visit
    Done,
    /// 遍历已终止
    Halt,
}

/// 一般遍历的边缘元素（BinaryHeap 为最大堆，比较方向取反）
struct OrderedEntry<'a, V> {
    vertex: VertexId,
    label: &'a V,
    seq: usize,
    order: &'a dyn Fn(&V, &V) -> Ordering,
}

impl<'a, V> OrderedEntry<'a, V> {
    fn new<E, Ty: EdgeType>(
        graph: &'a Graph<V, E, Ty>,
        vertex: VertexId,
        seq: usize,
        order: &'a dyn Fn(&V, &V) -> Ordering,
    ) -> Option<Self> {
        Some(Self {
            vertex,
            label: graph.vertex_label(vertex)?,
            seq,
            order,
        })
    }
}

impl<V> PartialEq for OrderedEntry<'_, V> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<V> Eq for OrderedEntry<'_, V> {}

impl<V> PartialOrd for OrderedEntry<'_, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V> Ord for OrderedEntry<'_, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.order)(other.label, self.label).then_with(|| other.seq.cmp(&self.seq))
    }
}

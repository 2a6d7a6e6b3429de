//! A* 最短路径
//!
//! 启发式函数 `h` 需满足可采纳性（从不高估到目标的剩余距离）与一致性
//! （`h(v) <= h(w) + weight(v, w)`），边权非负。`h` 恒为 0 时即为 Dijkstra。
//!
//! 搜索的副作用：所有顶点的暂定距离先被置为 +∞，源点为 0；
//! 搜索结束时被展开过的顶点记录其最优距离，未到达的顶点保持 +∞。

use crate::algorithm::weight::{Distancer, Weightable, Weighted, Weighter, Weighting};
use crate::graph::{EdgeId, EdgeType, Graph, VertexId};
use priority_queue::PriorityQueue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, trace};

/// 路径结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// 路径上的顶点序列（源点到目标）
    pub vertices: Vec<VertexId>,
    /// 路径上的边序列
    pub edges: Vec<EdgeId>,
    /// 路径长度（边数）
    pub length: usize,
    /// 路径总权重
    pub total_weight: f64,
}

impl PathResult {
    fn with_start(start: VertexId) -> Self {
        Self {
            vertices: vec![start],
            edges: Vec::new(),
            length: 0,
            total_weight: 0.0,
        }
    }
}

/// 使用外部访问器的 A* 最短路径
///
/// `vertex_weighter` 保存每个顶点标签的暂定距离，`edge_weighting` 给出边标签的权重。
/// 目标不可达时返回 `None`，此时目标的距离仍为 +∞。
#[tracing::instrument(skip_all, fields(%source, %target))]
pub fn shortest_path<V, E, Ty, D, VW, EW>(
    graph: &Graph<V, E, Ty>,
    source: VertexId,
    target: VertexId,
    h: &D,
    vertex_weighter: &mut VW,
    edge_weighting: &EW,
) -> Option<PathResult>
where
    Ty: EdgeType,
    D: Distancer<V> + ?Sized,
    VW: Weighter<V> + ?Sized,
    EW: Weighting<E> + ?Sized,
{
    let mut book = LabelBook {
        graph,
        weighter: vertex_weighter,
    };
    search(graph, source, target, h, &mut book, |label| {
        Weighting::weight(edge_weighting, label)
    })
}

/// 标签自带权重的 A* 最短路径
///
/// 边权取自边标签的 [`Weighted::weight`]；搜索结束后每个顶点标签通过
/// [`Weightable::set_weight`] 记录其距离。
#[tracing::instrument(skip_all, fields(%source, %target))]
pub fn shortest_path_weighted<V, E, Ty, D>(
    graph: &mut Graph<V, E, Ty>,
    source: VertexId,
    target: VertexId,
    h: &D,
) -> Option<PathResult>
where
    V: Weightable,
    E: Weighted,
    Ty: EdgeType,
    D: Distancer<V> + ?Sized,
{
    let mut book = TableBook::default();
    let result = search(&*graph, source, target, h, &mut book, |label: &E| {
        Weighted::weight(label)
    });

    for (vertex, distance) in book.distances {
        if let Some(label) = graph.vertex_label_mut(vertex) {
            Weightable::set_weight(label, distance);
        }
    }
    result
}

/// 暂定距离的读写位置
trait DistanceBook {
    fn distance(&self, vertex: VertexId) -> f64;
    fn record(&mut self, vertex: VertexId, distance: f64);
}

/// 通过 [`Weighter`] 按顶点标签读写距离
struct LabelBook<'a, V, E, Ty, W: ?Sized> {
    graph: &'a Graph<V, E, Ty>,
    weighter: &'a mut W,
}

impl<V, E, Ty, W> DistanceBook for LabelBook<'_, V, E, Ty, W>
where
    Ty: EdgeType,
    W: Weighter<V> + ?Sized,
{
    fn distance(&self, vertex: VertexId) -> f64 {
        self.graph
            .vertex_label(vertex)
            .map_or(f64::INFINITY, |label| Weighting::weight(&*self.weighter, label))
    }

    fn record(&mut self, vertex: VertexId, distance: f64) {
        if let Some(label) = self.graph.vertex_label(vertex) {
            Weighter::set_weight(&mut *self.weighter, label, distance);
        }
    }
}

/// 按顶点 ID 记录距离，搜索结束后再写回标签
#[derive(Default)]
struct TableBook {
    distances: HashMap<VertexId, f64>,
}

impl DistanceBook for TableBook {
    fn distance(&self, vertex: VertexId) -> f64 {
        self.distances
            .get(&vertex)
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    fn record(&mut self, vertex: VertexId, distance: f64) {
        self.distances.insert(vertex, distance);
    }
}

/// 边缘优先级：估计值越小越先出队，相同时按顶点插入顺序
#[derive(Debug, Clone, Copy)]
struct FringeKey {
    estimate: f64,
    rank: usize,
}

impl PartialEq for FringeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FringeKey {}

impl PartialOrd for FringeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FringeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // PriorityQueue 先弹出最大值，比较方向取反
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

fn search<V, E, Ty, D, B, W>(
    graph: &Graph<V, E, Ty>,
    source: VertexId,
    target: VertexId,
    h: &D,
    book: &mut B,
    edge_weight: W,
) -> Option<PathResult>
where
    Ty: EdgeType,
    D: Distancer<V> + ?Sized,
    B: DistanceBook,
    W: Fn(&E) -> f64,
{
    let target_label = graph.vertex_label(target)?;
    if !graph.contains_vertex(source) {
        return None;
    }

    for vertex in graph.vertices() {
        book.record(vertex, f64::INFINITY);
    }
    book.record(source, 0.0);

    let key = |book: &B, vertex: VertexId| FringeKey {
        estimate: graph
            .vertex_label(vertex)
            .map_or(f64::INFINITY, |label| {
                book.distance(vertex) + h.dist(label, target_label)
            }),
        rank: graph.vertex_rank(vertex).unwrap_or(usize::MAX),
    };

    let mut fringe: PriorityQueue<VertexId, FringeKey> =
        PriorityQueue::with_capacity(graph.vertex_count());
    for vertex in graph.vertices() {
        fringe.push(vertex, key(&*book, vertex));
    }

    let mut parents: HashMap<VertexId, EdgeId> = HashMap::new();
    let mut expanded = 0usize;
    while let Some((vertex, _)) = fringe.pop() {
        if vertex == target {
            break;
        }
        let base = book.distance(vertex);
        if base.is_infinite() {
            continue;
        }
        expanded += 1;

        for edge_id in graph.out_edges(vertex) {
            let Some(edge) = graph.edge(edge_id) else {
                continue;
            };
            let Ok(child) = edge.other(vertex) else {
                continue;
            };
            let candidate = base + edge_weight(edge.label());
            if candidate < book.distance(child) {
                book.record(child, candidate);
                parents.insert(child, edge_id);
                // 已在边缘中则更新优先级，否则重新加入
                fringe.push(child, key(&*book, child));
                trace!(vertex = %child, distance = candidate, via = %edge_id, "松弛");
            }
        }
    }

    let total_weight = book.distance(target);
    if total_weight.is_infinite() {
        debug!(expanded, "目标不可达");
        return None;
    }

    let mut path = PathResult::with_start(target);
    let mut current = target;
    while current != source {
        let edge_id = *parents.get(&current)?;
        current = graph.other_endpoint(edge_id, current).ok()?;
        path.edges.push(edge_id);
        path.vertices.push(current);
        if path.edges.len() > graph.vertex_count() {
            return None;
        }
    }
    path.vertices.reverse();
    path.edges.reverse();
    path.length = path.edges.len();
    path.total_weight = total_weight;

    debug!(expanded, length = path.length, total_weight, "找到最短路径");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::weight::{WeightTable, ZERO_DISTANCER};
    use crate::graph::{DirectedGraph, UndirectedGraph};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn first_char_distance(a: &&'static str, b: &&'static str) -> f64 {
        a.as_bytes()[0] as f64 - b.as_bytes()[0] as f64
    }

    fn edge_weight(w: &i32) -> f64 {
        *w as f64
    }

    #[test]
    fn test_astar_prefers_lighter_path() {
        let mut graph: UndirectedGraph<&'static str, i32> = UndirectedGraph::new();
        let d = graph.add_vertex("D");
        let c = graph.add_vertex("C");
        let b = graph.add_vertex("B");
        let a = graph.add_vertex("A");
        let dc = graph.add_edge(d, c, 1).unwrap();
        graph.add_edge(d, b, 1).unwrap();
        let ca = graph.add_edge(c, a, 1).unwrap();
        graph.add_edge(b, a, 2).unwrap();

        let mut weights = WeightTable::new();
        let path = shortest_path(&graph, d, a, &first_char_distance, &mut weights, &edge_weight)
            .unwrap();

        assert_eq!(path.edges, vec![dc, ca]);
        assert_eq!(path.vertices, vec![d, c, a]);
        assert_eq!(path.length, 2);
        assert_eq!(path.total_weight, 2.0);
        assert_eq!(weights.get("D"), 0.0);
        assert_eq!(weights.get("C"), 1.0);
        assert_eq!(weights.get("A"), 2.0);
    }

    #[test]
    fn test_no_path() {
        let mut graph: DirectedGraph<&'static str, i32> = DirectedGraph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");
        graph.add_edge(a, b, 1).unwrap();
        graph.add_edge(c, a, 1).unwrap();

        let mut weights = WeightTable::new();
        let path = shortest_path(&graph, a, c, &ZERO_DISTANCER, &mut weights, &edge_weight);

        assert_eq!(path, None);
        assert_eq!(weights.get("c"), f64::INFINITY);
        // 可达顶点记录了正确距离
        assert_eq!(weights.get("a"), 0.0);
        assert_eq!(weights.get("b"), 1.0);
    }

    #[test]
    fn test_source_is_target() {
        let mut graph: DirectedGraph<&'static str, i32> = DirectedGraph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        graph.add_edge(a, b, 3).unwrap();

        let mut weights = WeightTable::new();
        let path = shortest_path(&graph, a, a, &ZERO_DISTANCER, &mut weights, &edge_weight)
            .unwrap();

        assert!(path.edges.is_empty());
        assert_eq!(path.vertices, vec![a]);
        assert_eq!(path.total_weight, 0.0);
    }

    #[test]
    fn test_parallel_edges_and_direction() {
        let mut graph: DirectedGraph<&'static str, i32> = DirectedGraph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        graph.add_edge(a, b, 5).unwrap();
        let light = graph.add_edge(a, b, 2).unwrap();
        graph.add_edge(b, a, 1).unwrap();
        graph.add_edge(a, a, 0).unwrap();

        let mut weights = WeightTable::new();
        let path = shortest_path(&graph, a, b, &ZERO_DISTANCER, &mut weights, &edge_weight)
            .unwrap();
        assert_eq!(path.edges, vec![light]);
        assert_eq!(path.total_weight, 2.0);

        let back = shortest_path(&graph, b, a, &ZERO_DISTANCER, &mut weights, &edge_weight)
            .unwrap();
        assert_eq!(back.total_weight, 1.0);
        assert_eq!(back.vertices, vec![b, a]);
    }

    #[test]
    fn test_unknown_vertices() {
        let mut graph: DirectedGraph<&'static str, i32> = DirectedGraph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        graph.remove_vertex(b);

        let mut weights = WeightTable::new();
        assert_eq!(
            shortest_path(&graph, a, b, &ZERO_DISTANCER, &mut weights, &edge_weight),
            None
        );
        assert_eq!(
            shortest_path(&graph, b, a, &ZERO_DISTANCER, &mut weights, &edge_weight),
            None
        );
    }

    /// 自带权重的城市标签
    #[derive(Debug, Clone)]
    struct City {
        name: &'static str,
        x: f64,
        distance: f64,
    }

    impl City {
        fn new(name: &'static str, x: f64) -> Self {
            Self {
                name,
                x,
                distance: -1.0,
            }
        }
    }

    impl Weighted for City {
        fn weight(&self) -> f64 {
            self.distance
        }
    }

    impl Weightable for City {
        fn set_weight(&mut self, weight: f64) {
            self.distance = weight;
        }
    }

    #[test]
    fn test_self_weighted_labels() {
        let mut graph: UndirectedGraph<City, f64> = UndirectedGraph::new();
        let a = graph.add_vertex(City::new("a", 0.0));
        let b = graph.add_vertex(City::new("b", 1.0));
        let c = graph.add_vertex(City::new("c", 2.0));
        let island = graph.add_vertex(City::new("island", 9.0));
        graph.add_edge(a, b, 1.5).unwrap();
        graph.add_edge(b, c, 1.0).unwrap();
        graph.add_edge(a, c, 3.0).unwrap();

        // 坐标差不超过边权，满足可采纳性与一致性
        let h = |from: &City, to: &City| (from.x - to.x).abs();
        let path = shortest_path_weighted(&mut graph, a, c, &h).unwrap();

        assert_eq!(path.vertices, vec![a, b, c]);
        assert_eq!(path.total_weight, 2.5);
        assert_eq!(graph.vertex_label(a).unwrap().distance, 0.0);
        assert_eq!(graph.vertex_label(b).unwrap().distance, 1.5);
        assert_eq!(graph.vertex_label(c).unwrap().distance, 2.5);
        assert_eq!(graph.vertex_label(island).unwrap().distance, f64::INFINITY);
        assert_eq!(graph.vertex_label(island).unwrap().name, "island");

        assert_eq!(shortest_path_weighted(&mut graph, a, island, &ZERO_DISTANCER), None);
        assert_eq!(graph.vertex_label(island).unwrap().distance, f64::INFINITY);
    }

    /// 网格图：坐标为标签，边权不小于 1，曼哈顿距离可作启发式
    fn create_grid(rng: &mut StdRng, size: i32) -> (UndirectedGraph<(i32, i32), u32>, Vec<VertexId>) {
        let mut graph = UndirectedGraph::new();
        let mut ids = Vec::new();
        for y in 0..size {
            for x in 0..size {
                ids.push(graph.add_vertex((x, y)));
            }
        }
        for y in 0..size {
            for x in 0..size {
                let here = ids[(y * size + x) as usize];
                if x + 1 < size {
                    let right = ids[(y * size + x + 1) as usize];
                    graph.add_edge(here, right, rng.gen_range(1..10)).unwrap();
                }
                if y + 1 < size {
                    let down = ids[((y + 1) * size + x) as usize];
                    graph.add_edge(here, down, rng.gen_range(1..10)).unwrap();
                }
            }
        }
        (graph, ids)
    }

    fn path_weight<V, Ty: EdgeType>(graph: &Graph<V, u32, Ty>, path: &PathResult) -> f64 {
        path.edges
            .iter()
            .map(|e| *graph.edge_label(*e).unwrap() as f64)
            .sum()
    }

    #[test]
    fn test_heuristic_matches_dijkstra() {
        let mut rng = StdRng::seed_from_u64(7);
        let manhattan =
            |a: &(i32, i32), b: &(i32, i32)| ((a.0 - b.0).abs() + (a.1 - b.1).abs()) as f64;
        let weigh = |w: &u32| *w as f64;

        for _ in 0..10 {
            let (graph, ids) = create_grid(&mut rng, 8);
            let source = ids[rng.gen_range(0..ids.len())];
            let target = ids[rng.gen_range(0..ids.len())];

            let mut dijkstra_weights = WeightTable::new();
            let dijkstra =
                shortest_path(&graph, source, target, &ZERO_DISTANCER, &mut dijkstra_weights, &weigh)
                    .unwrap();
            let mut astar_weights = WeightTable::new();
            let astar = shortest_path(&graph, source, target, &manhattan, &mut astar_weights, &weigh)
                .unwrap();

            assert_eq!(dijkstra.total_weight, astar.total_weight);
            assert_eq!(path_weight(&graph, &astar), astar.total_weight);
            assert_eq!(astar.vertices.first(), Some(&source));
            assert_eq!(astar.vertices.last(), Some(&target));
        }
    }

    /// Bellman-Ford 参照实现
    fn reference_distances(graph: &DirectedGraph<u32, u32>, source: VertexId) -> HashMap<VertexId, f64> {
        let mut dist: HashMap<VertexId, f64> =
            graph.vertices().map(|v| (v, f64::INFINITY)).collect();
        dist.insert(source, 0.0);
        for _ in 0..graph.vertex_count() {
            for e in graph.edges() {
                let edge = graph.edge(e).unwrap();
                let candidate = dist[&edge.v0()] + *edge.label() as f64;
                if candidate < dist[&edge.v1()] {
                    dist.insert(edge.v1(), candidate);
                }
            }
        }
        dist
    }

    #[test]
    fn test_random_directed_against_reference() {
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..20 {
            let mut graph: DirectedGraph<u32, u32> = DirectedGraph::new();
            let n = rng.gen_range(2..20u32);
            let ids: Vec<VertexId> = (0..n).map(|i| graph.add_vertex(i)).collect();
            for _ in 0..rng.gen_range(0..n * 4) {
                let u = ids[rng.gen_range(0..ids.len())];
                let v = ids[rng.gen_range(0..ids.len())];
                graph.add_edge(u, v, rng.gen_range(0..20)).unwrap();
            }
            let source = ids[0];
            let target = ids[ids.len() - 1];
            let expected = reference_distances(&graph, source);

            let mut weights = WeightTable::new();
            let path = shortest_path(&graph, source, target, &ZERO_DISTANCER, &mut weights, &|w: &u32| *w as f64);

            match path {
                Some(path) => {
                    assert_eq!(path.total_weight, expected[&target]);
                    assert_eq!(path_weight(&graph, &path), path.total_weight);
                }
                None => assert_eq!(expected[&target], f64::INFINITY),
            }
            assert_eq!(weights.get(&(ids.len() as u32 - 1)), expected[&target]);
        }
    }
}

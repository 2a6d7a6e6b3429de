//! GraphKit - 通用多重图与图算法库
//!
//! 提供带标签的有向/无向多重图，支持：
//! - 顶点与边的增删查，按插入顺序稳定迭代
//! - 访问者驱动的遍历（深度优先、广度优先、按标签优先级）
//! - 可插拔启发式与权重的 A* 最短路径

pub mod algorithm;
pub mod error;
pub mod graph;

// 重导出常用类型
pub use algorithm::{
    shortest_path, shortest_path_weighted, Distancer, PathResult, Traversal, TraversalMode,
    VisitFlow, Visitor, WeightTable, Weightable, Weighted, Weighter, Weighting, ZERO_DISTANCER,
};
pub use error::{Error, Result};
pub use graph::{
    Directed, DirectedGraph, Edge, EdgeId, EdgeType, Graph, Undirected, UndirectedGraph, Vertex,
    VertexId,
};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

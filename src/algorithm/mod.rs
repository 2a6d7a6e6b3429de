//! 图算法模块
//!
//! 包含访问者驱动的遍历（DFS、BFS、按标签排序）和 A* 最短路径

mod shortest_path;
mod traversal;
mod weight;

pub use shortest_path::{shortest_path, shortest_path_weighted, PathResult};
pub use traversal::{Traversal, TraversalMode, VisitFlow, Visitor};
pub use weight::{
    Distancer, WeightTable, Weightable, Weighted, Weighter, Weighting, ZeroDistancer,
    ZERO_DISTANCER,
};

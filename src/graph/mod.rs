//! 图核心模块
//!
//! 定义顶点、边和图的核心数据结构

mod edge;
mod graph;
mod index;
mod vertex;

pub use edge::{Edge, EdgeId};
pub use graph::{Directed, DirectedGraph, EdgeType, Graph, Undirected, UndirectedGraph};
pub use index::{AdjacencyIndex, EdgeList};
pub use vertex::{Vertex, VertexId};

//! GraphKit 演示工具
//!
//! 在网格图上运行遍历和 A* 最短路径，并以 JSON 输出结果

use clap::Parser;
use graphkit::algorithm::{
    shortest_path, Traversal, TraversalMode, VisitFlow, Visitor, WeightTable, ZERO_DISTANCER,
};
use graphkit::graph::{EdgeType, Graph, UndirectedGraph, VertexId};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "graphkit-demo")]
#[command(about = "GraphKit 网格图演示")]
struct Args {
    /// 网格行数
    #[arg(short, long, default_value = "6")]
    rows: i32,

    /// 网格列数
    #[arg(short, long, default_value = "6")]
    cols: i32,

    /// 遍历方式: general, dfs, bfs
    #[arg(short, long, default_value = "bfs")]
    mode: String,

    /// 不使用曼哈顿启发式（退化为 Dijkstra）
    #[arg(long)]
    dijkstra: bool,

    /// 日志过滤（默认读取 RUST_LOG）
    #[arg(long)]
    log: Option<String>,
}

type Cell = (i32, i32);

/// 记录访问顺序，到达目标后停止
struct Recorder {
    goal: VertexId,
    order: Vec<Cell>,
}

impl<Ty: EdgeType> Visitor<Cell, u32, Ty> for Recorder {
    fn visit(&mut self, graph: &Graph<Cell, u32, Ty>, vertex: VertexId) -> VisitFlow {
        if let Some(cell) = graph.vertex_label(vertex) {
            self.order.push(*cell);
        }
        if vertex == self.goal {
            VisitFlow::Stop
        } else {
            VisitFlow::Continue
        }
    }
}

#[derive(Serialize)]
struct Report {
    mode: TraversalMode,
    visit_order: Vec<Cell>,
    path: Option<Vec<Cell>>,
    total_weight: Option<f64>,
}

fn build_grid(rows: i32, cols: i32) -> Result<(UndirectedGraph<Cell, u32>, Vec<VertexId>), Box<dyn std::error::Error>> {
    let mut graph = UndirectedGraph::with_capacity((rows * cols) as usize, (2 * rows * cols) as usize);
    let mut ids = Vec::with_capacity((rows * cols) as usize);
    for r in 0..rows {
        for c in 0..cols {
            ids.push(graph.add_vertex((r, c)));
        }
    }
    for r in 0..rows {
        for c in 0..cols {
            let here = ids[(r * cols + c) as usize];
            // 固定的伪随机边权，范围 1..=5
            if c + 1 < cols {
                let weight = ((r * 7 + c * 3) % 5 + 1) as u32;
                graph.add_edge(here, ids[(r * cols + c + 1) as usize], weight)?;
            }
            if r + 1 < rows {
                let weight = ((r * 3 + c * 5) % 5 + 1) as u32;
                graph.add_edge(here, ids[((r + 1) * cols + c) as usize], weight)?;
            }
        }
    }
    Ok((graph, ids))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = match &args.log {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if args.rows <= 0 || args.cols <= 0 {
        eprintln!("网格尺寸必须为正数: {}x{}", args.rows, args.cols);
        std::process::exit(1);
    }
    let mode = match args.mode.as_str() {
        "general" => TraversalMode::General,
        "dfs" => TraversalMode::DepthFirst,
        "bfs" => TraversalMode::BreadthFirst,
        _ => {
            eprintln!("不支持的遍历方式: {}", args.mode);
            std::process::exit(1);
        }
    };

    let (graph, ids) = build_grid(args.rows, args.cols)?;
    let (start, goal) = match (ids.first(), ids.last()) {
        (Some(start), Some(goal)) => (*start, *goal),
        _ => return Ok(()),
    };
    info!(vertices = graph.vertex_count(), edges = graph.edge_count(), "网格已创建");

    let mut traversal = Traversal::new(Recorder {
        goal,
        order: Vec::new(),
    });
    match mode {
        TraversalMode::General => traversal.traverse(&graph, start, |a: &Cell, b: &Cell| a.cmp(b)),
        TraversalMode::DepthFirst => traversal.depth_first_traverse(&graph, start),
        TraversalMode::BreadthFirst => traversal.breadth_first_traverse(&graph, start),
    }
    info!(visited = traversal.marked_count(), "遍历完成");

    let mut weights = WeightTable::new();
    let edge_weight = |w: &u32| *w as f64;
    let manhattan = |a: &Cell, b: &Cell| ((a.0 - b.0).abs() + (a.1 - b.1).abs()) as f64;
    let path = if args.dijkstra {
        shortest_path(&graph, start, goal, &ZERO_DISTANCER, &mut weights, &edge_weight)
    } else {
        shortest_path(&graph, start, goal, &manhattan, &mut weights, &edge_weight)
    };

    let report = Report {
        mode,
        visit_order: traversal.into_visitor().order,
        path: path.as_ref().map(|p| {
            p.vertices
                .iter()
                .filter_map(|v| graph.vertex_label(*v).copied())
                .collect()
        }),
        total_weight: path.as_ref().map(|p| p.total_weight),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

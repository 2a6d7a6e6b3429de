//! 权重与距离抽象
//!
//! 最短路径算法不关心权重存放在哪里：
//! - [`Weighted`] / [`Weightable`]：标签自己携带权重
//! - [`Weighting`] / [`Weighter`]：外部访问器按标签读写权重
//! - [`Distancer`]：两个标签之间的启发式距离

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// 两个标签之间的距离函数
pub trait Distancer<L: ?Sized> {
    /// 从 `from` 到 `to` 的距离
    fn dist(&self, from: &L, to: &L) -> f64;
}

impl<L: ?Sized, F> Distancer<L> for F
where
    F: Fn(&L, &L) -> f64,
{
    fn dist(&self, from: &L, to: &L) -> f64 {
        self(from, to)
    }
}

/// 恒为 0 的距离，A* 因此退化为 Dijkstra
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroDistancer;

impl<L: ?Sized> Distancer<L> for ZeroDistancer {
    fn dist(&self, _from: &L, _to: &L) -> f64 {
        0.0
    }
}

/// 零启发式
pub const ZERO_DISTANCER: ZeroDistancer = ZeroDistancer;

/// 携带权重的对象
pub trait Weighted {
    fn weight(&self) -> f64;
}

/// 可以写入权重的对象
pub trait Weightable: Weighted {
    fn set_weight(&mut self, weight: f64);
}

macro_rules! impl_weighted_for_numbers {
    ($($ty:ty),*) => {
        $(
            impl Weighted for $ty {
                fn weight(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

impl_weighted_for_numbers!(f32, f64, i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl Weightable for f64 {
    fn set_weight(&mut self, weight: f64) {
        *self = weight;
    }
}

/// 按标签读取权重的访问器
pub trait Weighting<L: ?Sized> {
    fn weight(&self, label: &L) -> f64;
}

impl<L: ?Sized, F> Weighting<L> for F
where
    F: Fn(&L) -> f64,
{
    fn weight(&self, label: &L) -> f64 {
        self(label)
    }
}

/// 按标签读写权重的访问器
pub trait Weighter<L: ?Sized>: Weighting<L> {
    fn set_weight(&mut self, label: &L, weight: f64);
}

/// 以标签为键的权重表，未记录的标签权重为 +∞
#[derive(Debug, Clone)]
pub struct WeightTable<L> {
    weights: HashMap<L, f64>,
}

impl<L: Hash + Eq> WeightTable<L> {
    pub fn new() -> Self {
        Self {
            weights: HashMap::new(),
        }
    }

    /// 查询标签的权重
    pub fn get<Q>(&self, label: &Q) -> f64
    where
        L: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.weights.get(label).copied().unwrap_or(f64::INFINITY)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl<L: Hash + Eq> Default for WeightTable<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Hash + Eq> Weighting<L> for WeightTable<L> {
    fn weight(&self, label: &L) -> f64 {
        self.get(label)
    }
}

impl<L: Hash + Eq + Clone> Weighter<L> for WeightTable<L> {
    fn set_weight(&mut self, label: &L, weight: f64) {
        self.weights.insert(label.clone(), weight);
    }
}

mod chebyshev_test;

use std::collections::VecDeque;
use std::sync::Arc;

use crate::core::graph::{GraphBuilder, LaplacianBuilder, SparseOperator, SpectralNormalizer, SphereGraph};
use crate::core::systems::config::LaplacianKind;
use crate::core::types::SphereFloat;

pub(crate) fn graph(nside: u32) -> SphereGraph {
    GraphBuilder::for_nside(nside).unwrap().build().unwrap()
}

/// 정규화 라플라시안을 스케일한 연산자
pub(crate) fn operator<T: SphereFloat>(nside: u32) -> Arc<SparseOperator<T>> {
    let lap = LaplacianBuilder::from_graph(&graph(nside), LaplacianKind::Normalized).unwrap();
    let scaled = SpectralNormalizer::default().normalize(&lap).unwrap();
    Arc::new(scaled.to_operator::<T>().unwrap())
}

/// 그래프 위 홉 거리 (BFS)
pub(crate) fn hop_distances(graph: &SphereGraph, source: usize) -> Vec<usize> {
    let mut dist = vec![usize::MAX; graph.npix()];
    let mut queue = VecDeque::new();
    dist[source] = 0;
    queue.push_back(source);
    while let Some(p) = queue.pop_front() {
        for q in graph.neighbours_of(p) {
            if dist[q] == usize::MAX {
                dist[q] = dist[p] + 1;
                queue.push_back(q);
            }
        }
    }
    dist
}

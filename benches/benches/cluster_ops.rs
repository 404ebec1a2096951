// Copyright 2025 the Imperium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use imperium_cluster::{Block, ClusterManager};

fn gen_grid_blocks(n: i32, size: i32) -> Vec<Block<u32>> {
    let mut out = Vec::with_capacity((n * n) as usize);
    for y in 0..n {
        for x in 0..n {
            out.push(Block::new(x * size, y * size, size, (y * n + x) as u32));
        }
    }
    out
}

/// Rows separated by a gap, so every row is its own cluster until bridged.
fn gen_rows(rows: i32, len: i32) -> Vec<Block<u32>> {
    let mut out = Vec::with_capacity((rows * len) as usize);
    for r in 0..rows {
        for x in 0..len {
            out.push(Block::new(x, r * 2, 1, (r * len + x) as u32));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_i32(&mut self, bound: i32) -> i32 {
        (self.next_u64() % bound as u64) as i32
    }
}

fn gen_scattered_blocks(count: usize, extent: i32) -> Vec<Block<u32>> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for i in 0..count {
        let size = 1 + rng.next_i32(3);
        out.push(Block::new(
            rng.next_i32(extent),
            rng.next_i32(extent),
            size,
            i as u32,
        ));
    }
    out
}

fn filled(blocks: &[Block<u32>]) -> ClusterManager<u32> {
    let mut manager = ClusterManager::new();
    for b in blocks {
        let _ = manager.add_element(b.clone());
    }
    manager
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    for &n in &[8, 16, 32] {
        let blocks = gen_grid_blocks(n, 1);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("fill_grid_n{}", n), |b| {
            b.iter_batched(
                ClusterManager::<u32>::new,
                |mut manager| {
                    for block in blocks.iter().cloned() {
                        let _ = manager.add_element(block);
                    }
                    black_box(manager.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    let blocks = gen_scattered_blocks(2048, 256);
    group.bench_function("scattered_rejecting_overlaps", |b| {
        b.iter_batched(
            ClusterManager::<u32>::new,
            |mut manager| {
                let mut rejected = 0_usize;
                for block in blocks.iter().cloned() {
                    if manager.add_element(block).is_err() {
                        rejected += 1;
                    }
                }
                black_box((manager.len(), rejected));
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for &rows in &[4, 16] {
        let blocks = gen_rows(rows, 32);
        group.bench_function(format!("bridge_rows_r{}", rows), |b| {
            b.iter_batched(
                || filled(&blocks),
                |mut manager| {
                    for r in 0..rows - 1 {
                        let _ = manager.add_element(Block::new(0, r * 2 + 1, 1, u32::MAX));
                    }
                    black_box(manager.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    for &n in &[8, 16, 32] {
        let blocks = gen_grid_blocks(n, 1);
        group.bench_function(format!("cut_column_n{}", n), |b| {
            b.iter_batched(
                || filled(&blocks),
                |mut manager| {
                    // The last removal splits the grid in two.
                    for y in 0..n {
                        black_box(manager.remove_element(n / 2, y));
                    }
                    black_box(manager.len());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("drain_n{}", n), |b| {
            b.iter_batched(
                || filled(&blocks),
                |mut manager| {
                    for block in &blocks {
                        black_box(manager.remove_element(block.x(), block.y()));
                    }
                    black_box(manager.is_empty());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let manager = filled(&gen_scattered_blocks(2048, 256));
    group.bench_function("get_element_scattered", |b| {
        let mut rng = Rng::new(0xBADC_F00D_1234_5678);
        b.iter(|| {
            let x = rng.next_i32(256);
            let y = rng.next_i32(256);
            black_box(manager.get_element(x, y).map(|(_, block)| *block.data()));
        })
    });
    group.finish();
}

criterion_group!(benches, bench_add, bench_merge, bench_remove, bench_query);
criterion_main!(benches);

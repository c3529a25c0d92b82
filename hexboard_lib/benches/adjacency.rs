use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hexboard_lib::{
    adjacency::resolve_adjacency,
    chunks::build_chunks,
    positioning::position,
    world_gen::{generate, hexagon_hex_count},
};

/// Benchmarks territory border detection on a map of the given radius
fn adjacency_for_radius(c: &mut Criterion, radius: usize) {
    let map = generate(hexagon_hex_count(radius), 40.).unwrap();

    c.bench_function(&format!("resolve_adjacency_radius_{radius}"), |b| {
        b.iter(|| resolve_adjacency(black_box(&map.hexes)))
    });
}

fn criterion_benchmark(c: &mut Criterion) {
    adjacency_for_radius(c, 5);
    adjacency_for_radius(c, 50);

    let positioned = position(&generate(hexagon_hex_count(50), 40.).unwrap());
    c.bench_function("build_chunks_radius_50", |b| {
        b.iter(|| build_chunks(black_box(&positioned)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

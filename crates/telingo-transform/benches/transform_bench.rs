use criterion::{black_box, criterion_group, criterion_main, Criterion};
use telingo_transform::{transform, transform_sources, SourceFile};

const DELAYED: &str = include_str!("../../../demos/delayed.lp");
const BLOCKS: &str = include_str!("../../../demos/blocks.lp");

// ---------------------------------------------------------------------------
// Rewriting only
// ---------------------------------------------------------------------------

fn bench_rewrite_blocks(c: &mut Criterion) {
    let statements = telingo_ast::parse(BLOCKS, "blocks.lp").unwrap();
    c.bench_function("rewrite_blocks", |b| {
        b.iter(|| transform([black_box(statements.clone())]).unwrap())
    });
}

fn bench_rewrite_delayed(c: &mut Criterion) {
    let statements = telingo_ast::parse(DELAYED, "delayed.lp").unwrap();
    c.bench_function("rewrite_delayed", |b| {
        b.iter(|| transform([black_box(statements.clone())]).unwrap())
    });
}

// ---------------------------------------------------------------------------
// Parse + rewrite + render
// ---------------------------------------------------------------------------

fn bench_full_blocks(c: &mut Criterion) {
    let sources = [SourceFile::new("blocks.lp", BLOCKS)];
    c.bench_function("transform_and_render_blocks", |b| {
        b.iter(|| transform_sources(black_box(&sources)).unwrap().render())
    });
}

criterion_group!(
    benches,
    bench_rewrite_blocks,
    bench_rewrite_delayed,
    bench_full_blocks
);
criterion_main!(benches);

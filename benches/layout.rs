//! Benchmarks for forum layout and sheet building.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;

use appexcel::forum::{layout, BoardNavItem, ForumSnapshot, PostRow};
use appexcel::normalize::normalize;
use appexcel::sheet::build;

fn snapshot(posts: usize) -> ForumSnapshot {
    ForumSnapshot {
        boards: (0..6)
            .map(|i| BoardNavItem {
                id: format!("board-{i}"),
                name: format!("Board {i}"),
                is_selected: i == 0,
            })
            .collect(),
        posts: (0..posts)
            .map(|i| PostRow {
                post_id: format!("p{i}"),
                board_id: "board-0".to_string(),
                no: i.to_string(),
                title: format!("Post number {i}"),
                author: "author".to_string(),
                date_text: "2026-10-19".to_string(),
                views: (i * 3).to_string(),
                board_label: "Board 0".to_string(),
            })
            .collect(),
        current_board_name: "Board 0".to_string(),
        page: 3,
        total_pages: 12,
        sort_mode: "latest".to_string(),
        view_mode: "all".to_string(),
        can_compose: true,
        ..ForumSnapshot::default()
    }
}

/// Layout + build for increasing page sizes
fn bench_layout_and_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_and_build");
    for posts in [20, 100, 500] {
        let snapshot = snapshot(posts);
        group.throughput(Throughput::Elements(posts as u64));
        group.bench_with_input(BenchmarkId::from_parameter(posts), &snapshot, |b, s| {
            b.iter(|| build(&layout(black_box(s))))
        });
    }
    group.finish();
}

/// Anchor resolution over every coordinate of a built sheet
fn bench_resolve(c: &mut Criterion) {
    let model = build(&layout(&snapshot(100)));
    let coords: Vec<_> = model.entries().map(|(at, _)| at).collect();
    c.bench_function("resolve_all_coords", |b| {
        b.iter(|| {
            coords
                .iter()
                .filter_map(|at| model.resolve(black_box(*at)))
                .count()
        })
    });
}

/// Normalizer on a loosely typed cell
fn bench_normalize(c: &mut Criterion) {
    let raw = json!({
        "kind": "button",
        "text": 42,
        "borderTop": "3.7",
        "mergeAcross": 2.9,
        "actionType": "open-post",
        "actionPayload": {"postId": "p1", "boardId": "free"},
        "trigger": "double-enter",
        "active": "true"
    });
    c.bench_function("normalize_cell", |b| b.iter(|| normalize(black_box(&raw))));
}

criterion_group!(benches, bench_layout_and_build, bench_resolve, bench_normalize);
criterion_main!(benches);

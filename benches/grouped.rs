// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use modalist::list::{
    classify, FilterController, GroupLayout, GroupedLines, ListGeometry, ListRegion, Origin,
    Pickable, SelectionPolicy,
};

mod fixtures;
mod profiler;

// Group names (`grouped.build`, `grouped.hit_test`, `filter.query`) and case ids are kept
// stable so results stay comparable over time.

fn build_lines(items: &[fixtures::Entry], layout: GroupLayout) -> GroupedLines {
    GroupedLines::build(items.iter().map(Pickable::group), layout)
}

fn benches_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouped.build");
    for case in fixtures::Case::ALL {
        let items = fixtures::entries(case);
        group.throughput(Throughput::Elements(items.len() as u64));
        group.bench_function(case.id(), |b| {
            b.iter(|| {
                let lines = build_lines(black_box(&items), GroupLayout::Separators);
                black_box(lines.separator_count())
            })
        });
        group.bench_function(format!("{}_headers", case.id()), |b| {
            b.iter(|| black_box(build_lines(black_box(&items), GroupLayout::Headers).len()))
        });
    }
    group.finish();
}

fn benches_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouped.hit_test");
    let origin = Origin::new(4, 10);
    let geometry = ListGeometry { top: 3, left: 2, prefix_width: 2 };
    for case in fixtures::Case::ALL {
        let items = fixtures::entries(case);
        let lines = build_lines(&items, GroupLayout::Separators);
        let mut region = ListRegion::new();
        region.set_size(60, 20);
        region.set_content(Vec::new(), lines.len());
        region.set_offset(lines.len() / 2);

        group.throughput(Throughput::Elements(20 * 60));
        group.bench_function(case.id(), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for row in 7..27u16 {
                    for col in 12..72u16 {
                        let target = classify(col, row, origin, geometry, &region, &lines);
                        hits += usize::from(matches!(target, modalist::list::HitTarget::Item(_)));
                    }
                }
                black_box(hits)
            })
        });
        group.bench_function(format!("{}_roundtrip", case.id()), |b| {
            b.iter(|| {
                let mut acc = 0usize;
                for item in 0..items.len() {
                    if let Some(line) = lines.item_index_to_line(item) {
                        acc += lines.line_to_item_index(line).item().unwrap_or(0);
                    }
                }
                black_box(acc)
            })
        });
    }
    group.finish();
}

fn benches_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter.query");
    for case in fixtures::Case::ALL {
        let items = fixtures::entries(case);
        group.throughput(Throughput::Elements(items.len() as u64));
        group.bench_function(case.id(), |b| {
            let mut filter = FilterController::new(items.clone(), SelectionPolicy::Sticky);
            b.iter(|| {
                for query in ["e", "ec", "echo", "echo 0", ""] {
                    filter.set_query(black_box(query));
                }
                black_box(filter.filtered_len())
            })
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_build, benches_hit_test, benches_filter
}
criterion_main!(benches);

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use geocluster::{BBox, ClusterIndex, ClusterOptions, PointRecord, Status, StatusTally};

fn grid_records(count: usize) -> Vec<PointRecord> {
    let side = (count as f64).sqrt().ceil() as usize;
    (0..count)
        .map(|i| {
            let lng = -120.0 + (i % side) as f64 * (60.0 / side as f64);
            let lat = 25.0 + (i / side) as f64 * (25.0 / side as f64);
            let status = match i % 3 {
                0 => Status::Visited,
                1 => Status::BucketList,
                _ => Status::Unvisited,
            };
            PointRecord::new(format!("p{}", i), lng, lat, status)
        })
        .collect()
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(20);

    for &size in &[1_000, 10_000, 50_000] {
        let records = grid_records(size);
        group.bench_with_input(BenchmarkId::new("index", size), &records, |b, records| {
            b.iter(|| ClusterIndex::build(black_box(records), ClusterOptions::default()).unwrap())
        });
    }

    group.finish();
}

fn benchmark_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    let index = ClusterIndex::build(grid_records(50_000), ClusterOptions::default()).unwrap();
    let viewport = BBox::new(-100.0, 30.0, -90.0, 40.0);

    for &zoom in &[0.0, 4.0, 8.0, 12.0, 16.0] {
        group.bench_with_input(BenchmarkId::new("world", zoom), &zoom, |b, &zoom| {
            b.iter(|| index.get_clusters(&BBox::world(), black_box(zoom)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("viewport", zoom), &zoom, |b, &zoom| {
            b.iter(|| index.get_clusters(&viewport, black_box(zoom)).unwrap())
        });
    }

    let clusters: Vec<u64> = index
        .get_clusters(&BBox::world(), 3.0)
        .unwrap()
        .iter()
        .filter_map(|f| f.cluster_id())
        .collect();

    group.bench_function("expansion_zoom", |b| {
        b.iter(|| {
            for &id in &clusters {
                black_box(index.get_cluster_expansion_zoom(id).unwrap());
            }
        })
    });

    group.bench_function("leaves_page", |b| {
        b.iter(|| {
            for &id in &clusters {
                black_box(index.get_leaves(id, 10, 20).unwrap());
            }
        })
    });

    group.finish();
}

fn benchmark_tally(c: &mut Criterion) {
    let records = grid_records(100_000);
    c.bench_function("tally_100k", |b| {
        b.iter(|| black_box(records.iter().collect::<StatusTally>()))
    });
}

criterion_group!(benches, benchmark_build, benchmark_queries, benchmark_tally);
criterion_main!(benches);

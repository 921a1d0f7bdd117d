use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kwscan::scan::{aggregate, partition, scan_chunk, Chunk};
use kwscan::{run, KeywordSet, PartialResult, SharedMemoryPool};
use std::{fs::File, io::Write, num::NonZeroUsize, path::PathBuf};
use tempfile::tempdir;

fn create_test_files(
    dir: &tempfile::TempDir,
    file_count: usize,
    lines_per_file: usize,
) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(file_count);
    for i in 0..file_count {
        let file_path = dir.path().join(format!("test_{}.txt", i));
        let mut file = File::create(&file_path)?;
        for j in 0..lines_per_file {
            if i % 3 == 0 {
                writeln!(file, "Line {} in file {}: an error was logged", j, i)?;
            } else {
                writeln!(file, "Line {} in file {}: nothing special", j, i)?;
            }
        }
        if i % 5 == 0 {
            writeln!(file, "keyword test")?;
        }
        paths.push(file_path);
    }
    Ok(paths)
}

fn keywords() -> KeywordSet {
    KeywordSet::new(["error", "keyword", "test"]).unwrap()
}

fn bench_shared_memory_run(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let files = create_test_files(&dir, 60, 200).unwrap();
    let keywords = keywords();

    let mut group = c.benchmark_group("shared_memory_run");
    for workers in [1, 2, 3] {
        let max = NonZeroUsize::new(workers).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(workers), &max, |b, &max| {
            b.iter(|| {
                run(&SharedMemoryPool::new(), black_box(&files), &keywords, max).unwrap()
            })
        });
    }
    group.finish();
}

fn bench_single_chunk_scan(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let files = create_test_files(&dir, 20, 1000).unwrap();
    let keywords = keywords();
    let chunk = Chunk {
        worker_id: 0,
        files,
    };

    c.bench_function("scan_chunk_20_files", |b| {
        b.iter(|| scan_chunk(black_box(&chunk), &keywords, "Bench-0"))
    });
}

fn bench_partition_and_aggregate(c: &mut Criterion) {
    let files: Vec<PathBuf> = (0..10_000)
        .map(|i| PathBuf::from(format!("{}.txt", i)))
        .collect();
    let max = NonZeroUsize::new(3).unwrap();

    c.bench_function("partition_10k", |b| {
        b.iter(|| partition(black_box(&files), max))
    });

    let partials: Vec<PartialResult> = partition(&files, max)
        .into_iter()
        .map(|chunk| {
            let mut partial = PartialResult::new();
            for path in &chunk.files {
                partial.record("error", path);
            }
            partial
        })
        .collect();
    c.bench_function("aggregate_10k", |b| {
        b.iter(|| aggregate(black_box(partials.clone())))
    });
}

criterion_group!(
    benches,
    bench_shared_memory_run,
    bench_single_chunk_scan,
    bench_partition_and_aggregate
);
criterion_main!(benches);

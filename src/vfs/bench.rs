use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;

// Reference the main crate
extern crate feos_vfs;

use feos_vfs::types::{OpenFlags, SyncFlags};
use feos_vfs::{FeosVfs, Vfs};

const PAGE_SIZE: usize = 4096;
const PAGE_COUNT: u64 = 256;

// Generate a page of random bytes
fn generate_page() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..PAGE_SIZE).map(|_| rng.r#gen::<u8>()).collect()
}

// Benchmark page-sized writes and reads through the file handle adapter
pub fn bench_page_io(c: &mut Criterion) {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("bench.db");
    let path = path.to_str().unwrap();

    let vfs = FeosVfs::default();
    let mut file = vfs
        .open(Some(path), OpenFlags::CREATE | OpenFlags::READWRITE)
        .unwrap();

    let page = generate_page();
    for i in 0..PAGE_COUNT {
        file.write(&page, i * PAGE_SIZE as u64).unwrap();
    }
    file.sync(SyncFlags::NORMAL).unwrap();

    let mut group = c.benchmark_group("PageIo");

    group.bench_function("write_page", |b: &mut criterion::Bencher| {
        let mut rng = rand::thread_rng();
        b.iter(|| {
            let offset = rng.gen_range(0..PAGE_COUNT) * PAGE_SIZE as u64;
            file.write(black_box(&page), offset).unwrap();
        })
    });

    let mut buf = vec![0u8; PAGE_SIZE];
    group.bench_function("read_page", |b: &mut criterion::Bencher| {
        let mut rng = rand::thread_rng();
        b.iter(|| {
            let offset = rng.gen_range(0..PAGE_COUNT) * PAGE_SIZE as u64;
            file.read(black_box(&mut buf), offset).unwrap();
        })
    });

    group.bench_function("file_size", |b: &mut criterion::Bencher| {
        b.iter(|| black_box(file.file_size().unwrap()))
    });

    group.finish();

    file.close().unwrap();
}

// Benchmark path canonicalization
pub fn bench_full_pathname(c: &mut Criterion) {
    let vfs = FeosVfs::default();
    let mut out = vec![0u8; vfs.descriptor().max_pathname + 1];

    let mut group = c.benchmark_group("FullPathname");

    group.bench_function("absolute", |b: &mut criterion::Bencher| {
        b.iter(|| vfs.full_pathname(black_box("fat:/data/app.db"), &mut out).unwrap())
    });
    group.bench_function("relative", |b: &mut criterion::Bencher| {
        b.iter(|| vfs.full_pathname(black_box("app.db"), &mut out).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_page_io, bench_full_pathname);
criterion_main!(benches);

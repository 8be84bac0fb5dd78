use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use cp437_codec::{ConversionState, decode, encode, encode_utf16};

fn screen_dump(len: usize) -> Vec<u8> {
    // 80-column rows of ASCII text framed by double box-drawing lines
    let row: Vec<u8> = std::iter::once(0xBA)
        .chain(b"  C:\\> DIR /W  ".iter().copied().cycle().take(78))
        .chain(std::iter::once(0xBA))
        .collect();
    row.iter().copied().cycle().take(len).collect()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for size in [80usize, 4 * 1024, 64 * 1024] {
        let input = screen_dump(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| decode(black_box(input)))
        });
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for size in [80usize, 4 * 1024, 64 * 1024] {
        let text = decode(&screen_dump(size));
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("str", size), &text, |b, text| {
            b.iter(|| {
                let mut state = ConversionState::new();
                encode(black_box(text), &mut state)
            })
        });

        let units: Vec<u16> = text.encode_utf16().collect();
        group.bench_with_input(BenchmarkId::new("utf16", size), &units, |b, units| {
            b.iter(|| {
                let mut state = ConversionState::new();
                encode_utf16(black_box(units), &mut state)
            })
        });
    }
    group.finish();
}

fn bench_encode_lossy(c: &mut Criterion) {
    // Every other character is missing from CP437
    let text: String = "a€".repeat(2048);
    c.bench_function("encode_substituting", |b| {
        b.iter(|| {
            let mut state = ConversionState::new();
            encode(black_box(&text), &mut state)
        })
    });
}

criterion_group!(benches, bench_decode, bench_encode, bench_encode_lossy);
criterion_main!(benches);

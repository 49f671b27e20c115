use criterion::{BenchmarkId, Criterion, Throughput};
use libshelf::network::buffer::ByteBuffer;
use std::hint::black_box;

/// A response whose header block ends after `padding` bytes of extra headers.
fn filled(padding: usize) -> ByteBuffer {
    let mut buffer = ByteBuffer::new();
    buffer.add(b"HTTP/1.1 200 OK\r\n");
    for i in 0..padding / 32 {
        buffer.add(format!("X-Padding-{i:04}: aaaaaaaaaaaaaa\r\n").as_bytes());
    }
    buffer.add(b"Content-Length: 5\r\n\r\nHello");
    buffer
}

pub fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_find");
    for size in [256, 4096, 65536] {
        let buffer = filled(size);
        group.throughput(Throughput::Bytes(buffer.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &buffer, |b, buffer| {
            b.iter(|| buffer.find(black_box(b"\r\n\r\n")))
        });
    }
    group.finish();
}

pub fn bench_find_insensitive(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_find_insensitive");
    for size in [256, 4096, 65536] {
        let buffer = filled(size);
        group.throughput(Throughput::Bytes(buffer.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &buffer, |b, buffer| {
            b.iter(|| buffer.find_insensitive(black_box(b"content-length: ")))
        });
    }
    group.finish();
}

//! Parser benchmarks.
//!
//! Run with: `cargo bench --package gsc-par`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use gsc_lex::StringSource;
use gsc_par::{Node, Parser};
use gsc_util::Handler;

fn parse_source(source: &str) -> Node {
    let handler = Handler::new();
    let mut parser = Parser::new(StringSource::new(source), &handler);
    parser.parse()
}

fn bench_parser_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_simple");

    let source = r#"package "demo"; public int32 main() { return 0; }"#;
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("minimal_module", |b| {
        b.iter(|| parse_source(black_box(source)))
    });

    group.finish();
}

fn bench_parser_spec(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_spec");

    let source = r#"
        package "demo";
        depends "collections";

        public spec Shape {
            float32 area {
                public get;
            }

            public construct() {
            }

            public float32 perimeter() {
                return 0.0;
            }
        }

        public spec Circle {
            internal float32 radius {
                public get;
                public set;
            }

            public construct(float32 r) {
                radius <- r;
                if (radius < 0.0) {
                    radius <- 0.0;
                }
            }
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("two_specs", |b| {
        b.iter(|| parse_source(black_box(source)))
    });

    group.finish();
}

fn bench_parser_expressions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_expressions");

    let source = r#"
        package "demo";
        public int32 compute() {
            x <- 1 + 2 * 3 - 4 / 2 + (5 - 1) * 2;
            if (x < 10 && x > 0 || x = 0) {
                return -x;
            }
            return x;
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("arithmetic_and_control_flow", |b| {
        b.iter(|| parse_source(black_box(source)))
    });

    group.finish();
}

fn bench_parser_generics(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_generics");

    let source = r#"package "demo"; public spec Box<T> { } "#;

    group.bench_function("generic_spec", |b| {
        b.iter(|| parse_source(black_box(source)))
    });

    let nested = r#"package "demo"; public Map<string, List<int32>> build() { return default(Map<string, List<int32>>); }"#;

    group.bench_function("nested_generic_types", |b| {
        b.iter(|| parse_source(black_box(nested)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_simple,
    bench_parser_spec,
    bench_parser_expressions,
    bench_parser_generics
);
criterion_main!(benches);

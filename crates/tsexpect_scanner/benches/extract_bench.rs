use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tsexpect_scanner::{extract_assertions, CommentScanner};

// A typical test file for a declaration package
const TEST_FILE: &str = r#"
import { chunk, debounce, groupBy } from "lodash-like";

// $ExpectType number[][]
chunk([1, 2, 3, 4], 2);

const grouped = groupBy(["one", "two", "three"], (s) => s.length);
grouped; // $ExpectType Record<number, string[]>

const url = "http://example.com/api"; // $ExpectType string
const re = /\/\/[a-z]+/g;
const tpl = `prefix ${url} // not a comment ${`nested ${re.source}`}`;

// $ExpectError
chunk("not an array", 2);

const d = debounce((x: number) => x * 2, 100);
// $ExpectType (x: number) => void
d;

/* block comment with $ExpectType inside is ignored */
function wrap<T>(value: T): { value: T } {
    return { value };
}

// $ExpectType { value: string; }
wrap("s");
"#;

fn bench_scan_comments(c: &mut Criterion) {
    c.bench_function("scan_comments", |b| {
        b.iter(|| CommentScanner::new(black_box(TEST_FILE)).count())
    });
}

fn bench_extract_assertions(c: &mut Criterion) {
    c.bench_function("extract_assertions", |b| {
        b.iter(|| extract_assertions(black_box(TEST_FILE)))
    });

    let large = TEST_FILE.repeat(200);
    c.bench_function("extract_assertions_large", |b| {
        b.iter(|| extract_assertions(black_box(&large)))
    });
}

criterion_group!(benches, bench_scan_comments, bench_extract_assertions);
criterion_main!(benches);

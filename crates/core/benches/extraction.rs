use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pagegrade_core::{Document, PreprocessConfig, extract, preprocess_html};

fn article_html() -> String {
    let paragraph = "<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor.</p>";
    format!(
        "<html><head><title>Bench</title></head><body><header><nav><a href='/'>Home</a></nav></header>\
         <article><h1>Benchmark article</h1>{}</article><footer>Footer text</footer></body></html>",
        paragraph.repeat(500)
    )
}

fn bench_parse(c: &mut Criterion) {
    let html = article_html();
    c.bench_function("parse", |b| b.iter(|| Document::parse(black_box(&html))));
}

fn bench_preprocess(c: &mut Criterion) {
    let html = article_html();
    let config = PreprocessConfig::default();
    c.bench_function("preprocess", |b| b.iter(|| preprocess_html(black_box(&html), &config)));
}

fn bench_full_extraction(c: &mut Criterion) {
    let html = article_html();
    c.bench_function("full_extraction", |b| b.iter(|| extract(black_box(&html))));
}

criterion_group!(benches, bench_parse, bench_preprocess, bench_full_extraction);
criterion_main!(benches);

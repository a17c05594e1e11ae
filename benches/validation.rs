// Validation throughput benchmarks
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use serde_json::{json, Map, Value};
use tensorgate::prelude::*;
use tensorgate::validate_mappings_object;
use tensorgate_index::{split_text, SplitMethod};

fn generate_random_vector(dim: usize) -> Vec<f64> {
    let mut rng = rand::rng();
    (0..dim).map(|_| rng.random_range(-1.0f64..1.0f64)).collect()
}

fn generate_document(id: usize, dim: usize) -> Document {
    let mut doc = Map::new();
    doc.insert("_id".to_string(), json!(format!("doc_{}", id)));
    doc.insert("title".to_string(), json!(format!("document number {}", id)));
    doc.insert("tags".to_string(), json!(["a", "b", "c"]));
    doc.insert(
        "combo".to_string(),
        json!({"caption": "a caption", "image": "https://example.com/image.png"}),
    );
    doc.insert(
        "embedding".to_string(),
        json!({"content": "precomputed", "vector": generate_random_vector(dim)}),
    );
    doc
}

fn mappings_value() -> Value {
    json!({
        "combo": {"type": "multimodal_combination", "weights": {"caption": 0.5, "image": 0.5}},
        "embedding": {"type": "custom_vector"}
    })
}

fn benchmark_validate_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_document");
    let limits = ValidationLimits::default().with_max_doc_bytes(10_000_000);
    let mappings = Mappings::from_json(&mappings_value()).unwrap();
    let non_tensor = vec!["tags".to_string()];

    for dim in [128, 384, 1024].iter() {
        let doc = generate_document(0, *dim);
        let ctx = DocumentContext::new(Some(&mappings), &non_tensor).with_model_dimensions(*dim);
        group.bench_with_input(BenchmarkId::new("custom_vector", dim), dim, |b, _| {
            b.iter(|| validate_document(black_box(&doc), &ctx, &limits).unwrap());
        });
    }

    group.finish();
}

fn benchmark_mappings(c: &mut Criterion) {
    let mappings = mappings_value();
    c.bench_function("validate_mappings_object", |b| {
        b.iter(|| validate_mappings_object(black_box(&mappings)).unwrap());
    });
}

fn benchmark_settings(c: &mut Criterion) {
    let limits = ValidationLimits::default();
    let settings = json!({
        "index_defaults": {
            "model": "ViT-B/32",
            "ann_parameters": {"space_type": "l2", "parameters": {"m": 24}}
        }
    });
    c.bench_function("resolve_index_settings", |b| {
        b.iter(|| resolve_index_settings(black_box(&settings), &limits).unwrap());
    });
}

fn benchmark_split_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_text");
    let mut rng = rand::rng();
    let words = ["tensor", "search", "vector", "index", "field", "query"];
    let text: String = (0..5_000)
        .map(|i| {
            let word = words[rng.random_range(0..words.len())];
            if i % 12 == 11 {
                format!("{}.", word)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    for method in [SplitMethod::Character, SplitMethod::Word, SplitMethod::Sentence] {
        group.bench_with_input(BenchmarkId::new("method", method), &method, |b, &method| {
            b.iter(|| split_text(black_box(&text), method, 6, 1));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_validate_document,
    benchmark_mappings,
    benchmark_settings,
    benchmark_split_text
);
criterion_main!(benches);

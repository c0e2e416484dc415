use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use scriptline::{rename_character, replace, search, LineClassifier, SearchSpec};

const SCENE: &str = "مشهد 1 - ليل/داخلي
غرفة المعيشة
يدخل أحمد ببطء وينظر إلى النافذة.
أحمد:
(بهدوء)
مرحبا يا سارة
سارة:
أين كنت طوال هذا الوقت؟
تقف سارة وتخرج
• أحمد: انتظري قليلا
قطع
";

fn long_script() -> String {
    // WHY: repeat one scene so throughput numbers reflect a feature-length paste
    (1..=200)
        .map(|n| SCENE.replacen("مشهد 1", &format!("مشهد {n}"), 1))
        .collect()
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    group.bench_function("classifier_construction", |b| {
        b.iter(|| black_box(LineClassifier::new().unwrap()));
    });

    let classifier = LineClassifier::new().unwrap();
    let script = long_script();
    group.throughput(Throughput::Bytes(script.len() as u64));

    group.bench_function("classify_lines", |b| {
        b.iter(|| black_box(classifier.classify_lines(black_box(&script))));
    });

    group.bench_function("classify_pasted_text", |b| {
        b.iter(|| black_box(classifier.classify_pasted_text(black_box(&script))));
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let script = long_script();
    let mut group = c.benchmark_group("search_replace");
    group.throughput(Throughput::Bytes(script.len() as u64));

    let literal = SearchSpec::literal("سارة");
    let whole_word = SearchSpec {
        whole_word: true,
        ..SearchSpec::literal("سارة")
    };

    group.bench_function("search_literal", |b| {
        b.iter(|| black_box(search(black_box(&script), &literal)));
    });

    group.bench_function("search_whole_word", |b| {
        b.iter(|| black_box(search(black_box(&script), &whole_word)));
    });

    group.bench_function("replace_all", |b| {
        b.iter(|| black_box(replace(black_box(&script), &whole_word, "ليلى")));
    });

    group.bench_function("rename_character", |b| {
        b.iter(|| black_box(rename_character("أحمد", "خالد", black_box(&script))));
    });

    group.finish();
}

criterion_group!(benches, bench_classification, bench_search);
criterion_main!(benches);

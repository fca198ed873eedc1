use criterion::{Criterion, criterion_group, criterion_main};
use margin_workshop_engine::anchoring::{
    Boundary, SelectionRange, TextTree, compute_selection_anchor,
};
use margin_workshop_engine::annotations::{Annotation, AnnotationId, AnnotationKind};
use margin_workshop_engine::overlay::{render_html, render_segments};
use margin_workshop_engine::text::CharSpan;

fn generate_manuscript(paragraphs: usize) -> String {
    "The river ran brown with the spring melt, and the old mill groaned. ".repeat(paragraphs)
}

/// One annotation every `stride` characters, some overlapping their neighbour
fn generate_annotations(content_len: usize, stride: usize) -> Vec<Annotation> {
    (0..content_len / stride)
        .map(|i| {
            let start = i * stride;
            let end = (start + stride / 2 + (i % 3) * stride / 2).min(content_len);
            let kind = if i % 4 == 0 {
                AnnotationKind::Strikethrough
            } else {
                AnnotationKind::Highlight
            };
            Annotation::new(format!("c{i}"), CharSpan::new(start, end), kind)
        })
        .collect()
}

fn bench_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay");
    group.sample_size(10);

    let content = generate_manuscript(500);
    let annotations = generate_annotations(content.chars().count(), 40);
    let active = AnnotationId::new("c10");

    group.bench_function("render_segments", |b| {
        b.iter(|| {
            let segments = render_segments(
                std::hint::black_box(&content),
                std::hint::black_box(&annotations),
                Some(&active),
                None,
            );
            std::hint::black_box(segments);
        });
    });

    let segments = render_segments(&content, &annotations, Some(&active), None);
    group.bench_function("render_html", |b| {
        b.iter(|| std::hint::black_box(render_html(std::hint::black_box(&segments))));
    });

    group.finish();
}

fn bench_anchoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchoring");
    group.sample_size(10);

    let content = generate_manuscript(500);
    let annotations = generate_annotations(content.chars().count(), 40);
    let segments = render_segments(&content, &annotations, None, None);

    let mut tree = TextTree::new("div");
    let root = tree.root();
    let texts: Vec<_> = segments
        .iter()
        .map(|segment| {
            if segment.is_highlight() {
                let mark = tree.append_element(root, "mark");
                tree.append_text(mark, segment.text())
            } else {
                tree.append_text(root, segment.text())
            }
        })
        .collect();
    let last = texts.len() - 1;
    let range = SelectionRange::new(Boundary::new(texts[1], 2), Boundary::new(texts[last], 1));

    group.bench_function("compute_selection_anchor", |b| {
        b.iter(|| {
            let anchor = compute_selection_anchor(
                Some(&range),
                &tree,
                root,
                std::hint::black_box(&content),
            );
            std::hint::black_box(anchor);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_overlay, bench_anchoring);
criterion_main!(benches);

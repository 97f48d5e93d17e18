use criterion::{Criterion, black_box, criterion_group, criterion_main};
use vellum_engine::serialization::{deserialize, serialize};
use vellum_engine::{Post, PostBuilder};

/// A post with `paragraphs` markup sections plus a list every tenth section,
/// roughly the shape of a long article.
fn build_post(builder: &PostBuilder, paragraphs: usize) -> Post {
    let strong = builder.create_markup("strong", &[]).unwrap();
    let mut sections = Vec::with_capacity(paragraphs);
    for index in 0..paragraphs {
        if index % 10 == 9 {
            let items = (0..3)
                .map(|item| {
                    builder.create_list_item(vec![
                        builder.create_marker(&format!("item {item}"), vec![]).into(),
                    ])
                })
                .collect();
            sections.push(builder.create_list_section(None, items).unwrap());
        } else {
            sections.push(
                builder
                    .create_markup_section(
                        None,
                        vec![
                            builder
                                .create_marker(&format!("paragraph {index} "), vec![])
                                .into(),
                            builder
                                .create_marker("emphasis", vec![strong.clone()])
                                .into(),
                        ],
                    )
                    .unwrap(),
            );
        }
    }
    builder.create_post(sections)
}

fn bench_serialize(c: &mut Criterion) {
    let builder = PostBuilder::new();
    let post = build_post(&builder, 200);
    c.bench_function("serialize_200_sections", |b| {
        b.iter(|| serialize(black_box(&post)))
    });
}

fn bench_deserialize(c: &mut Criterion) {
    let builder = PostBuilder::new();
    let form = serialize(&build_post(&builder, 200));
    c.bench_function("deserialize_200_sections", |b| {
        b.iter(|| deserialize(&builder, black_box(&form)).unwrap())
    });
}

fn bench_leaf_walk(c: &mut Criterion) {
    let builder = PostBuilder::new();
    let post = build_post(&builder, 200);
    c.bench_function("leaf_walk_200_sections", |b| {
        b.iter(|| black_box(&post).leaf_sections().len())
    });
}

criterion_group!(benches, bench_serialize, bench_deserialize, bench_leaf_walk);
criterion_main!(benches);

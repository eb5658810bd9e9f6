//! Fabrik metering benchmarks
//!
//! Covers the synchronous admission path:
//! - Event decoding from raw objects
//! - Relevance classification per kind
//! - Metering record building and document conversion

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fabrik_common::{AdmissionReview, GenericResource, OperationType, ResourceKind, ResourceState};
use fabrik_metering::{Event, UnstructuredDocument};

const DIRECTOR_REVIEW: &str = include_str!("../tests/fixtures/admission_request.json");

fn resource(kind: ResourceKind, state: ResourceState, op: OperationType, plan: &str) -> GenericResource {
    let mut resource = GenericResource {
        kind,
        name: "instance-1".into(),
        ..Default::default()
    };
    resource.status.state = state;
    resource.status.last_operation.op_type = op;
    resource.status.applied_options.plan_id = plan.into();
    resource
}

fn bench_decode(c: &mut Criterion) {
    let review = AdmissionReview::from_slice(DIRECTOR_REVIEW.as_bytes()).expect("fixture");

    c.bench_function("event_from_review", |b| {
        b.iter(|| Event::from_review(black_box(&review)))
    });
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    let cases = [
        (
            "director_update",
            Event::new(
                resource(ResourceKind::Director, ResourceState::Succeeded, OperationType::Update, "new"),
                Some(resource(ResourceKind::Director, ResourceState::InProgress, OperationType::Update, "old")),
            ),
        ),
        (
            "docker_create",
            Event::new(
                resource(ResourceKind::Docker, ResourceState::Succeeded, OperationType::Create, ""),
                Some(resource(ResourceKind::Docker, ResourceState::InProgress, OperationType::Create, "")),
            ),
        ),
        (
            "unchanged",
            Event::new(
                resource(ResourceKind::Director, ResourceState::Succeeded, OperationType::Create, "p"),
                Some(resource(ResourceKind::Director, ResourceState::Succeeded, OperationType::Create, "p")),
            ),
        ),
    ];

    for (name, event) in cases.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), event, |b, event| {
            b.iter(|| black_box(event).classify())
        });
    }

    group.finish();
}

fn bench_build_and_convert(c: &mut Criterion) {
    let event = Event::new(
        resource(ResourceKind::Director, ResourceState::Succeeded, OperationType::Update, "new"),
        Some(resource(ResourceKind::Director, ResourceState::InProgress, OperationType::Update, "old")),
    );

    c.bench_function("update_records_to_documents", |b| {
        b.iter(|| {
            let records = black_box(&event).metering_records().unwrap_or_default();
            records
                .iter()
                .map(UnstructuredDocument::from_record)
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(benches, bench_decode, bench_classify, bench_build_and_convert);
criterion_main!(benches);

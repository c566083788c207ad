use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use wayfare_core::{LinkKeys, Reconciler};
use wayfare_domain::{ApplicationRecord, Identity};

fn build_records(count: usize) -> Vec<ApplicationRecord> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    (0..count)
        .filter_map(|idx| {
            let submitted = start + Duration::days((idx % 730) as i64);
            let owner: Value = if idx % 5 == 0 {
                json!({ "applicant": "Amina Okafor" })
            } else {
                json!({ "client": (idx % 40) as i64 })
            };
            let mut record = json!({
                "id": idx as i64 + 1,
                "offer": { "id": (idx % 25) as i64 },
                "status": "pending",
            });
            if idx % 7 != 0 {
                record["submitted_at"] = json!(submitted.format("%Y-%m-%d").to_string());
            }
            if let (Some(target), Some(extra)) = (record.as_object_mut(), owner.as_object()) {
                target.extend(extra.clone());
            }
            ApplicationRecord::from_value(record)
        })
        .collect()
}

fn bench_select(c: &mut Criterion) {
    let identity = Identity::new("12").with_name("Amina", "Okafor");
    let links = LinkKeys::default();

    for size in [1_000usize, 10_000] {
        let records = build_records(size);
        c.bench_function(&format!("reconcile_select_{size}"), |b| {
            b.iter(|| {
                let found = Reconciler::select(black_box(&records), &identity, "12", &links);
                black_box(found);
            })
        });
    }
}

fn bench_parse_page(c: &mut Criterion) {
    let results: Vec<Value> = build_records(10_000)
        .into_iter()
        .map(|record| Value::Object(record.fields().clone()))
        .collect();
    let envelope = json!({ "count": results.len(), "next": null, "results": results });

    c.bench_function("reconcile_parse_page_10k", |b| {
        b.iter(|| {
            let page = Reconciler::parse_page(black_box(envelope.clone())).expect("parse page");
            black_box(page);
        })
    });
}

criterion_group!(benches, bench_select, bench_parse_page);
criterion_main!(benches);

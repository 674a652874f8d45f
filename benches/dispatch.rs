use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use vhal_mock::{
    GetValueRequest, GetValueResult, GetValuesCallback, MockVehicleHardware, VehicleHardware,
    VehiclePropValue,
};

fn requests(n: i64) -> Vec<GetValueRequest> {
    (0..n)
        .map(|request_id| GetValueRequest {
            request_id,
            prop: VehiclePropValue::key(0x1160_0580, 0),
        })
        .collect()
}

fn bench_inline_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let batch = requests(16);
    let callback: Arc<GetValuesCallback> = Arc::new(|results: Vec<GetValueResult>| {
        criterion::black_box(results);
    });

    group.bench_function("inline_get_values_16", |b| {
        b.iter_batched(
            || {
                let hw = MockVehicleHardware::new();
                hw.add_get_value_responses(vec![GetValueResult::default(); 16]);
                hw
            },
            |hw| {
                let status = hw.get_values(Arc::clone(&callback), &batch);
                criterion::black_box(status);
                // Keep the request log from growing across iterations.
                criterion::black_box(hw.next_get_value_requests());
                hw
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_inline_get);
criterion_main!(benches);

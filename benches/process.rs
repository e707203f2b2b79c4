use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use static_mask::frame::{FrameGeometry, PixelFormat};
use static_mask::source::{FrameSource, PatternSource};
use static_mask::{MaskConfig, StaticMask};

fn process_1080p(c: &mut Criterion) {
    let geometry = FrameGeometry::new(1920, 1080, PixelFormat::Yuv420p);
    let mut source = PatternSource::new(64, 16).with_limit(2);
    source.open(geometry).unwrap();
    let frames: Vec<_> = std::iter::from_fn(|| source.next_frame().unwrap()).collect();

    let mut group = c.benchmark_group("process");
    group.throughput(Throughput::Elements(1));

    for size in [8u32, 20, 64] {
        let config = MaskConfig::default().with_size(size).with_frame_back(2);
        let mut filter = StaticMask::new(config).unwrap();
        filter.configure(geometry).unwrap();

        let mut index = 0;
        group.bench_function(format!("yuv420p_1080p_size{size}"), |b| {
            b.iter(|| {
                let mut frame = frames[index % frames.len()].clone();
                index += 1;
                black_box(filter.process_frame(&mut frame).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, process_1080p);
criterion_main!(benches);

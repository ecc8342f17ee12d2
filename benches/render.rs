use mandeltile::bench::{Benchmark, BenchmarkReport};
use mandeltile::{render, Frame, RenderSettings, Resolution};

fn bench_render(workers: usize) -> Benchmark {
    let settings = RenderSettings {
        frame: Frame::default(),
        resolution: Resolution::new(600, 400),
        iterations: 150,
        workers,
    };
    Benchmark::iter(&format!("render-w{}", workers), 3, move || {
        render(&settings).unwrap();
    })
}

fn main() {
    BenchmarkReport::with_benches(&[
        bench_render(1),
        bench_render(4),
        bench_render(9),
        bench_render(16),
    ])
    .report("render");
}

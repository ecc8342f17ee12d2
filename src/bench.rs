use std::fs;
use std::io::{stdout, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A named closure timed over a fixed number of calls.
#[derive(Clone)]
pub struct Benchmark {
    f: Rc<dyn Fn()>,
    name: String,
    iterations: usize,
}

impl Benchmark {
    pub fn iter<F: Fn() + 'static>(name: &str, n: usize, f: F) -> Self {
        Self {
            f: Rc::new(f),
            name: name.to_string(),
            iterations: n,
        }
    }

    pub fn once<F: Fn() + 'static>(name: &str, f: F) -> Self {
        Self::iter(name, 1, f)
    }

    pub fn run(&self) -> Duration {
        let start = Instant::now();
        for _ in 0..self.iterations {
            (self.f)();
        }
        start.elapsed()
    }
}

pub struct BenchmarkReport {
    benches: Vec<Benchmark>,
    results: Vec<(String, usize, Duration)>,
}

impl BenchmarkReport {
    pub fn with_benches(benches: &[Benchmark]) -> Self {
        Self {
            benches: benches.to_vec(),
            results: vec![],
        }
    }

    pub fn run(&mut self) {
        for bench in &self.benches {
            let t = bench.run();
            self.results.push((bench.name.clone(), bench.iterations, t));
            print!(".");
            stdout().flush().unwrap();
        }
        println!();
    }

    pub fn show(&self) {
        for (name, iterations, t) in &self.results {
            println!(
                "{}: {}us per call, {}ms total",
                name,
                t.as_micros() / *iterations as u128,
                t.as_millis()
            );
        }
    }

    pub fn write_csv(&self, filename: &str) {
        let mut lines = vec!["benchmark,iterations,per_call_us,total_ms".to_string()];
        for (name, iterations, t) in &self.results {
            lines.push(format!(
                "{},{},{},{}",
                name,
                iterations,
                t.as_micros() / *iterations as u128,
                t.as_millis()
            ));
        }
        lines.push(String::new());
        fs::write(filename, lines.join("\n")).unwrap();
    }

    pub fn report(&mut self, name: &str) {
        self.run();
        self.show();
        self.write_csv(&format!("bench-{}.csv", name));
    }
}

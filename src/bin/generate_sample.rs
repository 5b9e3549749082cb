use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG: xoshiro256** (Blackman & Vigna), state seeded
/// from an LCG. Kept dependency-free so sample files are reproducible.
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn sample_size(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo) as f64) as i64
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Builds one table column by column, keeping field order.
#[derive(Default)]
struct Table {
    fields: Vec<Field>,
    columns: Vec<ArrayRef>,
}

impl Table {
    fn text(mut self, name: &str, values: Vec<String>) -> Self {
        self.fields.push(Field::new(name, DataType::Utf8, false));
        self.columns.push(Arc::new(StringArray::from(values)));
        self
    }

    fn int(mut self, name: &str, values: Vec<i64>) -> Self {
        self.fields.push(Field::new(name, DataType::Int64, false));
        self.columns.push(Arc::new(Int64Array::from(values)));
        self
    }

    fn float(mut self, name: &str, values: Vec<f64>) -> Self {
        self.fields.push(Field::new(name, DataType::Float64, false));
        self.columns.push(Arc::new(Float64Array::from(values)));
        self
    }

    fn write(self, path: &str) {
        let schema = Arc::new(Schema::new(self.fields));
        let rows = self.columns.first().map(|c| c.len()).unwrap_or(0);
        let batch = RecordBatch::try_new(schema.clone(), self.columns)
            .expect("Failed to create RecordBatch");
        let file = std::fs::File::create(path).expect("Failed to create output file");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
        writer.write(&batch).expect("Failed to write batch");
        writer.close().expect("Failed to close writer");
        println!("Wrote {rows} studies to {path}");
    }
}

const STUDIES: usize = 12;

fn studlabs() -> Vec<String> {
    (0..STUDIES)
        .map(|i| format!("Study {} ({})", i + 1, 2005 + i))
        .collect()
}

fn continuous(rng: &mut SimpleRng) -> Table {
    let (mut n_e, mut mean_e, mut sd_e) = (vec![], vec![], vec![]);
    let (mut n_c, mut mean_c, mut sd_c) = (vec![], vec![], vec![]);
    for _ in 0..STUDIES {
        n_e.push(rng.sample_size(20, 200));
        n_c.push(rng.sample_size(20, 200));
        mean_e.push(round2(rng.gauss(11.0, 1.0)));
        mean_c.push(round2(rng.gauss(10.0, 1.0)));
        sd_e.push(round2(rng.gauss(2.0, 0.3).abs()));
        sd_c.push(round2(rng.gauss(2.0, 0.3).abs()));
    }
    Table::default()
        .text("studlab", studlabs())
        .int("n.e", n_e)
        .float("mean.e", mean_e)
        .float("sd.e", sd_e)
        .int("n.c", n_c)
        .float("mean.c", mean_c)
        .float("sd.c", sd_c)
}

fn continuous_median(rng: &mut SimpleRng) -> Table {
    let mut t = Table::default().text("studlab", studlabs());
    for arm in ["e", "c"] {
        let (mut n, mut median, mut q1, mut q3) = (vec![], vec![], vec![], vec![]);
        for _ in 0..STUDIES {
            let m = round2(rng.gauss(10.0, 1.0));
            n.push(rng.sample_size(20, 200));
            median.push(m);
            q1.push(round2(m - rng.gauss(1.5, 0.3).abs()));
            q3.push(round2(m + rng.gauss(1.5, 0.3).abs()));
        }
        t = t
            .int(&format!("n.{arm}"), n)
            .float(&format!("median.{arm}"), median)
            .float(&format!("q1.{arm}"), q1)
            .float(&format!("q3.{arm}"), q3);
    }
    t
}

fn binary(rng: &mut SimpleRng) -> Table {
    let (mut event_e, mut n_e, mut event_c, mut n_c) = (vec![], vec![], vec![], vec![]);
    for _ in 0..STUDIES {
        let ne = rng.sample_size(50, 300);
        let nc = rng.sample_size(50, 300);
        event_e.push((ne as f64 * rng.next_f64() * 0.3) as i64);
        event_c.push((nc as f64 * rng.next_f64() * 0.4) as i64);
        n_e.push(ne);
        n_c.push(nc);
    }
    Table::default()
        .text("studlab", studlabs())
        .int("event.e", event_e)
        .int("n.e", n_e)
        .int("event.c", event_c)
        .int("n.c", n_c)
}

fn generic(rng: &mut SimpleRng) -> Table {
    let te = (0..STUDIES).map(|_| round2(rng.gauss(0.3, 0.2))).collect();
    let se = (0..STUDIES)
        .map(|_| round2(0.05 + rng.next_f64() * 0.2))
        .collect();
    Table::default()
        .text("studlab", studlabs())
        .float("TE", te)
        .float("seTE", se)
}

fn correlation(rng: &mut SimpleRng) -> Table {
    let cor = (0..STUDIES)
        .map(|_| round2(rng.gauss(0.45, 0.15).clamp(-0.99, 0.99)))
        .collect();
    let n = (0..STUDIES).map(|_| rng.sample_size(30, 400)).collect();
    Table::default()
        .text("studlab", studlabs())
        .float("cor", cor)
        .int("n", n)
}

fn main() {
    let mut rng = SimpleRng::new(42);

    continuous(&mut rng).write("sample_continuous.parquet");
    continuous_median(&mut rng).write("sample_continuous_median.parquet");
    binary(&mut rng).write("sample_binary.parquet");
    generic(&mut rng).write("sample_generic.parquet");
    correlation(&mut rng).write("sample_correlation.parquet");
}

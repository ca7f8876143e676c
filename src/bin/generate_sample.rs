use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
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

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let genders = ["Male", "Female"];
    let cities = ["New York", "Los Angeles", "Chicago", "Houston", "Phoenix"];
    let satisfaction = ["Unsatisfied", "Neutral", "Satisfied", "Very Satisfied"];
    let intents = ["Yes", "No", "Maybe"];
    let channels = ["Organic", "Social Media", "Email", "Paid Ads", "Referral"];
    let lead_sources = ["Web", "Phone", "In-Store", "Partner"];

    let n_rows = 500usize;

    let mut gender_col = Vec::with_capacity(n_rows);
    let mut city_col = Vec::with_capacity(n_rows);
    let mut age_col = Vec::with_capacity(n_rows);
    let mut sales_col = Vec::with_capacity(n_rows);
    let mut items_col = Vec::with_capacity(n_rows);
    let mut discount_col = Vec::with_capacity(n_rows);
    let mut satisfaction_col = Vec::with_capacity(n_rows);
    let mut engagement_col = Vec::with_capacity(n_rows);
    let mut rating_col = Vec::with_capacity(n_rows);
    let mut intent_col = Vec::with_capacity(n_rows);
    let mut channel_col = Vec::with_capacity(n_rows);
    let mut lead_col = Vec::with_capacity(n_rows);

    for _ in 0..n_rows {
        let age = rng.gauss(38.0, 12.0).clamp(18.0, 75.0).round() as i64;
        let items = (rng.gauss(5.0, 2.5).max(1.0)).round() as i64;
        // Sales correlate with items purchased; discounts eat into sales.
        let discount = (rng.next_f64() * 40.0 * 100.0).round() / 100.0;
        let sales = (items as f64 * rng.gauss(45.0, 12.0).max(5.0) - discount * 0.5)
            .max(10.0);
        let sat = rng.pick(&satisfaction);
        let sat_rank = satisfaction.iter().position(|s| *s == sat).unwrap() as f64;
        let engagement = (rng.gauss(3.0 + sat_rank * 1.5, 1.2)).clamp(0.0, 10.0);
        let rating = (rng.gauss(2.5 + sat_rank * 0.7, 0.5)).clamp(1.0, 5.0);

        gender_col.push(rng.pick(&genders).to_string());
        city_col.push(rng.pick(&cities).to_string());
        age_col.push(age);
        sales_col.push((sales * 100.0).round() / 100.0);
        items_col.push(items);
        discount_col.push(discount);
        satisfaction_col.push(sat.to_string());
        engagement_col.push((engagement * 10.0).round() / 10.0);
        rating_col.push((rating * 10.0).round() / 10.0);
        intent_col.push(rng.pick(&intents).to_string());
        channel_col.push(rng.pick(&channels).to_string());
        lead_col.push(rng.pick(&lead_sources).to_string());
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("Gender", DataType::Utf8, false),
        Field::new("City", DataType::Utf8, false),
        Field::new("Age", DataType::Int64, false),
        Field::new("Net Sales", DataType::Float64, false),
        Field::new("Items Purchased", DataType::Int64, false),
        Field::new("Discount Amount", DataType::Float64, false),
        Field::new("Satisfaction Level", DataType::Utf8, false),
        Field::new("Engagement Score", DataType::Float64, false),
        Field::new("Average Rating", DataType::Float64, false),
        Field::new("Repeat Purchase Intent", DataType::Utf8, false),
        Field::new("Customer Acquisition Channel", DataType::Utf8, false),
        Field::new("Lead Source", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(gender_col)),
            Arc::new(StringArray::from(city_col)),
            Arc::new(Int64Array::from(age_col)),
            Arc::new(Float64Array::from(sales_col)),
            Arc::new(Int64Array::from(items_col)),
            Arc::new(Float64Array::from(discount_col)),
            Arc::new(StringArray::from(satisfaction_col)),
            Arc::new(Float64Array::from(engagement_col)),
            Arc::new(Float64Array::from(rating_col)),
            Arc::new(StringArray::from(intent_col)),
            Arc::new(StringArray::from(channel_col)),
            Arc::new(StringArray::from(lead_col)),
        ],
    )
    .context("building record batch")?;

    let output_path = "sample_customers.parquet";
    let file = std::fs::File::create(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!("Wrote {n_rows} customer records to {output_path}");
    Ok(())
}

/// Cosine of the angle between `a` and `b`, clamped to [-1, 1].
///
/// Each vector is divided by its largest absolute value first so that large
/// ratings cannot overflow when squared. Returns `None` when either vector has
/// zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Option<f64> {
    let a = unit_max(a)?;
    let b = unit_max(b)?;

    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let magnitude_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    Some((dot_product / (magnitude_a * magnitude_b)).clamp(-1.0, 1.0))
}

fn unit_max(v: &[f64]) -> Option<Vec<f64>> {
    let max = v.iter().fold(0.0f64, |max, x| max.max(x.abs()));
    if max == 0.0 || !max.is_finite() {
        return None;
    }
    Some(v.iter().map(|x| x / max).collect())
}

use ndarray::Array1;

use crate::error::{ExtractionError, Result};

/// Burg's method for an all-pole model of `order`.
///
/// Returns `order + 1` prediction-filter coefficients; the first is always 1.
pub fn lpc_burg(samples: &[f32], order: usize) -> Result<Vec<f64>> {
    if order == 0 {
        return Err(ExtractionError::configuration("LPC order must be positive"));
    }
    if samples.len() <= order {
        return Err(ExtractionError::SignalTooShort {
            analysis: "LPC",
            len: samples.len(),
            required: order + 1,
        });
    }

    let signal: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    let mut coeffs = vec![0.0_f64; order + 1];
    coeffs[0] = 1.0;

    // Forward errors start one sample in; backward errors stop one sample short.
    let mut forward = signal[1..].to_vec();
    let mut backward = signal[..signal.len() - 1].to_vec();
    let mut denominator = dot(&forward, &forward) + dot(&backward, &backward);

    for i in 0..order {
        // The regularizer is f64 epsilon since the recursion runs in f64; an
        // f32 formulation would add f32::EPSILON here instead.
        let reflection = -2.0 * dot(&backward, &forward) / (denominator + f64::EPSILON);

        let previous = coeffs.clone();
        for j in 1..=i + 1 {
            coeffs[j] = previous[j] + reflection * previous[i + 1 - j];
        }

        for (f, b) in forward.iter_mut().zip(backward.iter_mut()) {
            let f_prev = *f;
            *f += reflection * *b;
            *b += reflection * f_prev;
        }

        let q = 1.0 - reflection * reflection;
        let last_backward = backward.last().copied().unwrap_or(0.0);
        let first_forward = forward.first().copied().unwrap_or(0.0);
        denominator = q * denominator - last_backward.powi(2) - first_forward.powi(2);

        forward.remove(0);
        backward.pop();
    }

    Ok(coeffs)
}

/// LPC coefficients with the leading unity term dropped; exactly `order` values.
pub fn lpc_coefficients(samples: &[f32], order: usize) -> Result<Array1<f32>> {
    let coeffs = lpc_burg(samples, order)?;
    Ok(coeffs[1..].iter().map(|&c| c as f32).collect())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

//! Nelder-Mead simplex search for unconstrained minimisation.
//!
//! References:
//! - Nelder and Mead (1965), "A Simplex Method for Function Minimization".

/// Simplex coefficients and stopping rules.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SimplexOptions {
    pub(crate) max_iterations: usize,
    pub(crate) initial_step: f64,
    /// Relative spread of objective values at which the search stops
    pub(crate) f_tolerance: f64,
    /// Largest vertex distance from the centroid at which the search stops
    pub(crate) x_tolerance: f64,
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Outcome of a simplex search.
#[derive(Debug, Clone)]
pub(crate) struct SimplexResult {
    pub(crate) x: Vec<f64>,
    pub(crate) value: f64,
    pub(crate) iterations: usize,
    pub(crate) converged: bool,
}

/// Minimise `objective` starting from `initial`.
///
/// Non-finite objective values are treated as +∞, so the objective may
/// signal infeasible points by returning `f64::INFINITY`.
pub(crate) fn minimize<F>(
    initial: &[f64],
    options: SimplexOptions,
    mut objective: F,
) -> SimplexResult
where
    F: FnMut(&[f64]) -> f64,
{
    let dim = initial.len();
    let mut eval = |x: &[f64]| {
        let v = objective(x);
        if v.is_finite() { v } else { f64::INFINITY }
    };

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(initial.to_vec());
    for d in 0..dim {
        let mut vertex = initial.to_vec();
        vertex[d] += options.initial_step;
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|x| eval(x)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iterations {
        iterations += 1;

        let mut order: Vec<usize> = (0..=dim).collect();
        order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        let best = values[0];
        let worst = values[dim];

        let centroid: Vec<f64> = (0..dim)
            .map(|d| simplex[..dim].iter().map(|x| x[d]).sum::<f64>() / dim as f64)
            .collect();

        let max_distance = simplex
            .iter()
            .map(|x| distance(x, &centroid))
            .fold(0.0_f64, f64::max);

        if (worst - best).abs() <= options.f_tolerance * (1.0 + best.abs())
            && max_distance <= options.x_tolerance
        {
            converged = true;
            break;
        }

        let reflected = towards(&centroid, &simplex[dim], -REFLECTION);
        let f_reflected = eval(&reflected);

        if f_reflected < values[0] {
            let expanded = towards(&centroid, &simplex[dim], -EXPANSION);
            let f_expanded = eval(&expanded);
            if f_expanded < f_reflected {
                simplex[dim] = expanded;
                values[dim] = f_expanded;
            } else {
                simplex[dim] = reflected;
                values[dim] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[dim - 1] {
            simplex[dim] = reflected;
            values[dim] = f_reflected;
            continue;
        }

        let contracted = towards(&centroid, &simplex[dim], CONTRACTION);
        let f_contracted = eval(&contracted);
        if f_contracted < values[dim] {
            simplex[dim] = contracted;
            values[dim] = f_contracted;
            continue;
        }

        for i in 1..=dim {
            simplex[i] = towards(&simplex[0], &simplex[i], SHRINK);
            values[i] = eval(&simplex[i]);
        }
    }

    let best = (0..=dim)
        .min_by(|&i, &j| values[i].total_cmp(&values[j]))
        .unwrap_or(0);

    SimplexResult {
        x: simplex[best].clone(),
        value: values[best],
        iterations,
        converged,
    }
}

/// `origin + t * (target - origin)`.
fn towards(origin: &[f64], target: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(target)
        .map(|(o, x)| o + t * (x - o))
        .collect()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

//! Force kernels for the layout simulation.
//!
//! Pure functions over the engine's SoA position/velocity buffers. Three
//! additive contributions, recomputed from scratch every step:
//!
//! - **Repulsion**: inverse-square push between every unordered pair of
//!   nodes, O(n²), independent of edges.
//! - **Attraction**: Hooke-style pull along each edge, linear in distance,
//!   applied once per edge (duplicate edges contribute twice).
//! - **Gravity**: linear pull toward the origin, once per node.
//!
//! Forces are applied as instantaneous velocity deltas; the integrator
//! scales by `dt` only when moving positions.

/// Minimum pair distance used in the repulsion denominator.
///
/// Coincident nodes would otherwise divide by zero and flood the buffers
/// with non-finite values that no later step can recover from.
pub const MIN_REPEL_DISTANCE: f64 = 1e-6;

/// Polar offset of `(x2, y2)` relative to `(x1, y1)`.
///
/// Returns `(distance, angle)` with `distance = sqrt(dx² + dy²)` and
/// `angle = atan2(dy, dx)`. For a zero offset the angle is `atan2(0, 0)`,
/// which is `0.0`.
#[inline]
pub fn polar(x1: f64, y1: f64, x2: f64, y2: f64) -> (f64, f64) {
    let dx = x2 - x1;
    let dy = y2 - y1;

    let distance = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx);

    (distance, angle)
}

/// Apply inverse-square repulsion between every unordered pair of nodes.
///
/// For the pair (i, j) the magnitude is `-repel_const / r²` along the
/// i→j direction; the negative sign makes the contribution push i away
/// from j. The exact negation lands on j (equal and opposite).
pub fn apply_repulsion(
    pos_x: &[f64],
    pos_y: &[f64],
    vel_x: &mut [f64],
    vel_y: &mut [f64],
    repel_const: f64,
) {
    let n = pos_x.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let (r, angle) = polar(pos_x[i], pos_y[i], pos_x[j], pos_y[j]);
            let r = r.max(MIN_REPEL_DISTANCE);

            let f = -repel_const / (r * r);

            let fx = f * angle.cos();
            let fy = f * angle.sin();

            vel_x[i] += fx;
            vel_y[i] += fy;

            vel_x[j] -= fx;
            vel_y[j] -= fy;
        }
    }
}

/// Apply linear attraction along each edge.
///
/// The magnitude is `attract_const * r`, unbounded in distance. Each
/// element of `edges` contributes independently, so duplicate edges
/// double the pull. A self-loop has `r = 0` and contributes nothing.
pub fn apply_attraction(
    pos_x: &[f64],
    pos_y: &[f64],
    vel_x: &mut [f64],
    vel_y: &mut [f64],
    edges: impl Iterator<Item = (usize, usize)>,
    attract_const: f64,
) {
    for (a, b) in edges {
        let (r, angle) = polar(pos_x[a], pos_y[a], pos_x[b], pos_y[b]);

        let f = attract_const * r;

        let fx = f * angle.cos();
        let fy = f * angle.sin();

        vel_x[a] += fx;
        vel_y[a] += fy;

        vel_x[b] -= fx;
        vel_y[b] -= fy;
    }
}

/// Pull every node toward the origin with magnitude `gravity_const * r`.
pub fn apply_gravity(
    pos_x: &[f64],
    pos_y: &[f64],
    vel_x: &mut [f64],
    vel_y: &mut [f64],
    gravity_const: f64,
) {
    let n = pos_x.len();

    for i in 0..n {
        let (r, angle) = polar(pos_x[i], pos_y[i], 0.0, 0.0);

        let f = gravity_const * r;

        vel_x[i] += f * angle.cos();
        vel_y[i] += f * angle.sin();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-12;

    #[test]
    fn test_polar_zero_offset() {
        let (r, angle) = polar(1.5, -2.5, 1.5, -2.5);
        assert_eq!(r, 0.0);
        assert_eq!(angle, 0.0); // atan2(0, 0)
    }

    #[test]
    fn test_polar_axes() {
        let (r, angle) = polar(0.0, 0.0, 1.0, 0.0);
        assert!((r - 1.0).abs() < EPS);
        assert!(angle.abs() < EPS);

        let (r, angle) = polar(0.0, 0.0, 0.0, 1.0);
        assert!((r - 1.0).abs() < EPS);
        assert!((angle - FRAC_PI_2).abs() < EPS);

        let (r, angle) = polar(0.0, 0.0, -1.0, 0.0);
        assert!((r - 1.0).abs() < EPS);
        assert!((angle - PI).abs() < EPS);
    }

    #[test]
    fn test_polar_diagonal() {
        let (r, angle) = polar(1.0, 1.0, 2.0, 2.0);
        assert!((r - 2.0_f64.sqrt()).abs() < EPS);
        assert!((angle - PI / 4.0).abs() < EPS);
    }

    #[test]
    fn test_repulsion_equal_and_opposite() {
        let pos_x = [0.0, 3.0, -1.0];
        let pos_y = [0.0, 1.0, 2.0];
        let mut vel_x = [0.0; 3];
        let mut vel_y = [0.0; 3];

        apply_repulsion(&pos_x, &pos_y, &mut vel_x, &mut vel_y, 150.0);

        // Momentum is conserved: pairwise deltas cancel exactly.
        assert!(vel_x.iter().sum::<f64>().abs() < 1e-9);
        assert!(vel_y.iter().sum::<f64>().abs() < 1e-9);
    }

    #[test]
    fn test_repulsion_pushes_apart() {
        let pos_x = [-1.0, 1.0];
        let pos_y = [0.0, 0.0];
        let mut vel_x = [0.0; 2];
        let mut vel_y = [0.0; 2];

        apply_repulsion(&pos_x, &pos_y, &mut vel_x, &mut vel_y, 150.0);

        assert!(vel_x[0] < 0.0);
        assert!(vel_x[1] > 0.0);
        assert_eq!(vel_x[0], -vel_x[1]);
        assert_eq!(vel_y[0], 0.0);
        assert_eq!(vel_y[1], 0.0);
    }

    #[test]
    fn test_repulsion_inverse_square_scaling() {
        // Doubling the separation quarters the magnitude.
        let mut vx_near = [0.0; 2];
        let mut vy_near = [0.0; 2];
        apply_repulsion(&[0.0, 1.0], &[0.0, 0.0], &mut vx_near, &mut vy_near, 150.0);

        let mut vx_far = [0.0; 2];
        let mut vy_far = [0.0; 2];
        apply_repulsion(&[0.0, 2.0], &[0.0, 0.0], &mut vx_far, &mut vy_far, 150.0);

        assert!((vx_near[0] / vx_far[0] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_repulsion_coincident_nodes_stay_finite() {
        let pos_x = [0.5, 0.5];
        let pos_y = [0.5, 0.5];
        let mut vel_x = [0.0; 2];
        let mut vel_y = [0.0; 2];

        apply_repulsion(&pos_x, &pos_y, &mut vel_x, &mut vel_y, 150.0);

        assert!(vel_x.iter().all(|v| v.is_finite()));
        assert!(vel_y.iter().all(|v| v.is_finite()));
        // The clamped distance still produces an enormous, but paired, kick.
        assert!(vel_x[0].abs() > 0.0);
        assert_eq!(vel_x[0], -vel_x[1]);
    }

    #[test]
    fn test_attraction_linear_scaling() {
        // Doubling the separation doubles the magnitude.
        let mut vx_near = [0.0; 2];
        let mut vy_near = [0.0; 2];
        apply_attraction(
            &[0.0, 1.0],
            &[0.0, 0.0],
            &mut vx_near,
            &mut vy_near,
            [(0usize, 1usize)].into_iter(),
            15.0,
        );

        let mut vx_far = [0.0; 2];
        let mut vy_far = [0.0; 2];
        apply_attraction(
            &[0.0, 2.0],
            &[0.0, 0.0],
            &mut vx_far,
            &mut vy_far,
            [(0usize, 1usize)].into_iter(),
            15.0,
        );

        assert!((vx_far[0] / vx_near[0] - 2.0).abs() < 1e-9);
        // And it pulls the endpoints together.
        assert!(vx_near[0] > 0.0);
        assert!(vx_near[1] < 0.0);
    }

    #[test]
    fn test_attraction_duplicate_edge_doubles() {
        let pos_x = [0.0, 1.0];
        let pos_y = [0.0, 0.0];

        let mut vx_single = [0.0; 2];
        let mut vy_single = [0.0; 2];
        apply_attraction(
            &pos_x,
            &pos_y,
            &mut vx_single,
            &mut vy_single,
            [(0usize, 1usize)].into_iter(),
            15.0,
        );

        let mut vx_double = [0.0; 2];
        let mut vy_double = [0.0; 2];
        apply_attraction(
            &pos_x,
            &pos_y,
            &mut vx_double,
            &mut vy_double,
            [(0usize, 1usize), (0usize, 1usize)].into_iter(),
            15.0,
        );

        assert!((vx_double[0] - 2.0 * vx_single[0]).abs() < 1e-12);
    }

    #[test]
    fn test_attraction_self_loop_is_inert() {
        let mut vel_x = [0.0];
        let mut vel_y = [0.0];
        apply_attraction(
            &[3.0],
            &[4.0],
            &mut vel_x,
            &mut vel_y,
            [(0usize, 0usize)].into_iter(),
            15.0,
        );
        assert_eq!(vel_x[0], 0.0);
        assert_eq!(vel_y[0], 0.0);
    }

    #[test]
    fn test_gravity_points_at_origin() {
        let pos_x = [3.0, -5.0];
        let pos_y = [4.0, 0.0];
        let mut vel_x = [0.0; 2];
        let mut vel_y = [0.0; 2];

        apply_gravity(&pos_x, &pos_y, &mut vel_x, &mut vel_y, 2.0);

        // Node at (3, 4): distance 5, force 10, direction (-3/5, -4/5).
        assert!((vel_x[0] - -6.0).abs() < 1e-9);
        assert!((vel_y[0] - -8.0).abs() < 1e-9);

        // Node at (-5, 0): pulled straight along +x.
        assert!((vel_x[1] - 10.0).abs() < 1e-9);
        assert!(vel_y[1].abs() < 1e-9);
    }

    #[test]
    fn test_gravity_at_origin_is_zero() {
        let mut vel_x = [0.0];
        let mut vel_y = [0.0];
        apply_gravity(&[0.0], &[0.0], &mut vel_x, &mut vel_y, 2.0);
        assert_eq!(vel_x[0], 0.0);
        assert_eq!(vel_y[0], 0.0);
    }
}

use {
    anyhow::{ensure, Result},
    ndarray::Array1,
};

/// Uniform vertical grid for one water column.
///
/// Depths are negative-down with the surface at zero, and everything is
/// packed bottom-to-top: index 0 is the deepest cell. Immutable once built.
#[derive(Debug, Clone)]
pub struct VerticalGrid {
    n: usize,
    dz: f64,
    z_rho: Array1<f64>,
    z_w: Array1<f64>,
}

impl VerticalGrid {
    pub fn new(depth: f64, layers: usize) -> Result<Self> {
        ensure!(
            depth.is_finite() && depth > 0.0,
            "column depth must be positive, got {}",
            depth
        );
        ensure!(layers > 0, "at least one vertical layer is required");

        let dz = depth / layers as f64;
        let z_w = Array1::from_shape_fn(layers + 1, |i| dz * i as f64 - depth);
        let z_rho = Array1::from_shape_fn(layers, |i| dz * (i as f64 + 0.5) - depth);

        Ok(Self { n: layers, dz, z_rho, z_w })
    }

    /// Number of cells.
    pub fn layers(&self) -> usize {
        self.n
    }

    /// Cell thickness [m].
    pub fn dz(&self) -> f64 {
        self.dz
    }

    /// Cell centre depths [m], negative-down.
    pub fn z_rho(&self) -> &Array1<f64> {
        &self.z_rho
    }

    /// Cell edge depths [m]; `z_w[0]` is the sea floor, `z_w[n]` the surface.
    pub fn z_w(&self) -> &Array1<f64> {
        &self.z_w
    }

    /// Total column depth [m], positive.
    pub fn depth(&self) -> f64 {
        -self.z_w[0]
    }
}

#[cfg(test)]
mod test {
    use {super::*, approx::assert_abs_diff_eq};

    #[test]
    fn edges_and_centres() {
        let grid = VerticalGrid::new(50.0, 25).unwrap();

        assert_eq!(grid.layers(), 25);
        assert_abs_diff_eq!(grid.dz(), 2.0);
        assert_abs_diff_eq!(grid.z_w()[0], -50.0);
        assert_abs_diff_eq!(grid.z_w()[25], 0.0);
        assert_abs_diff_eq!(grid.z_rho()[0], -49.0);
        assert_abs_diff_eq!(grid.z_rho()[24], -1.0);
        assert_abs_diff_eq!(grid.depth(), 50.0);

        // Centres sit midway between their edges.
        for i in 0..grid.layers() {
            assert_abs_diff_eq!(
                grid.z_rho()[i],
                0.5 * (grid.z_w()[i] + grid.z_w()[i + 1]),
                epsilon = 1.0e-12
            );
        }
    }

    #[test]
    fn rejects_degenerate_columns() {
        assert!(VerticalGrid::new(0.0, 25).is_err());
        assert!(VerticalGrid::new(-50.0, 25).is_err());
        assert!(VerticalGrid::new(f64::NAN, 25).is_err());
        assert!(VerticalGrid::new(50.0, 0).is_err());
    }
}

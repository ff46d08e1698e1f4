use {crate::grid::VerticalGrid, ndarray::Array1};

/// How irradiance decays on its way down the column.
#[derive(Debug, Clone, PartialEq)]
pub struct Attenuation {
    /// Photosynthetically active fraction of surface shortwave radiation.
    pub par_fraction: f64,
    /// Attenuation by the water itself [1/m].
    pub background: Background,
    /// Additional attenuation per unit of the shading tracer
    /// [1/m per concentration unit].
    pub shade: f64,
}

/// Background attenuation law.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// Constant coefficient [1/m].
    Fixed(f64),
    /// Linear in salinity about a reference value; fresher water attenuates
    /// more.
    Salinity { base: f64, slope: f64, reference: f64 },
}

impl Background {
    pub fn coefficient(&self, salt: f64) -> f64 {
        match *self {
            Background::Fixed(k) => k,
            Background::Salinity { base, slope, reference } => base - slope * (salt - reference),
        }
    }
}

/// Thickness-weighted mean of the overlying profile for every cell. The cell
/// straddling the evaluation point contributes only its upper half.
pub fn mean_overlying(grid: &VerticalGrid, profile: &Array1<f64>) -> Array1<f64> {
    let n = grid.layers();
    let mut mean = Array1::zeros(n);

    // Walk top-down accumulating the full cells already passed; with uniform
    // spacing the cell thickness cancels out of the ratio.
    let mut above = 0.0;
    for i in (0..n).rev() {
        let weight = (n - i) as f64 - 0.5;
        mean[i] = (0.5 * profile[i] + above) / weight;
        above += profile[i];
    }

    mean
}

/// Photosynthetically available radiation at every cell centre [W m-2].
///
/// Beer-Lambert decay of the surface flux through water and through the mean
/// overlying shading tracer. Finite and non-negative for any non-negative
/// input.
pub fn par_profile(
    grid: &VerticalGrid,
    swrad: f64,
    shading: &Array1<f64>,
    salt: &Array1<f64>,
    attenuation: &Attenuation,
) -> Array1<f64> {
    let mean = mean_overlying(grid, shading);

    Array1::from_shape_fn(grid.layers(), |i| {
        let k = attenuation.background.coefficient(salt[i]) + attenuation.shade * mean[i];
        swrad * attenuation.par_fraction * (grid.z_rho()[i] * k).exp()
    })
}

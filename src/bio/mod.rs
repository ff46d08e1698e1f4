pub mod banas;
pub mod banas_fennel;
pub mod fennel;

use {
    crate::{forcing::Forcing, grid::VerticalGrid, parameters::Initial, sinking::BottomBoundary},
    ndarray::Array1,
    serde::{Deserialize, Serialize},
};

/// The closed set of column tracers.
///
/// Concentrations are mmol N m-3 except chlorophyll, which is mg Chl m-3 and
/// therefore excluded from nitrogen accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tracer {
    Phy,
    Chl,
    Zoo,
    SDet,
    LDet,
    NO3,
    NH4,
}

impl Tracer {
    pub const ALL: [Tracer; 7] = [
        Tracer::Phy,
        Tracer::Chl,
        Tracer::Zoo,
        Tracer::SDet,
        Tracer::LDet,
        Tracer::NO3,
        Tracer::NH4,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tracer::Phy => "Phy",
            Tracer::Chl => "Chl",
            Tracer::Zoo => "Zoo",
            Tracer::SDet => "SDet",
            Tracer::LDet => "LDet",
            Tracer::NO3 => "NO3",
            Tracer::NH4 => "NH4",
        }
    }

    /// Chlorophyll is pigment bookkeeping, not nitrogen.
    pub fn carries_nitrogen(self) -> bool {
        !matches!(self, Tracer::Chl)
    }
}

/// Tracer concentrations at cell centres, packed bottom-to-top (index 0 is
/// the deepest cell). All values stay non-negative as long as only the step
/// functions below mutate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fields {
    pub phy: Array1<f64>,
    pub chl: Array1<f64>,
    pub zoo: Array1<f64>,
    pub sdet: Array1<f64>,
    pub ldet: Array1<f64>,
    pub no3: Array1<f64>,
    pub nh4: Array1<f64>,
}

impl Fields {
    pub fn zeros(layers: usize) -> Self {
        Self {
            phy: Array1::zeros(layers),
            chl: Array1::zeros(layers),
            zoo: Array1::zeros(layers),
            sdet: Array1::zeros(layers),
            ldet: Array1::zeros(layers),
            no3: Array1::zeros(layers),
            nh4: Array1::zeros(layers),
        }
    }

    /// Vertically uniform initial condition.
    pub fn uniform(layers: usize, initial: &Initial) -> Self {
        Self {
            phy: Array1::from_elem(layers, initial.phy),
            chl: Array1::from_elem(layers, initial.chl),
            zoo: Array1::from_elem(layers, initial.zoo),
            sdet: Array1::from_elem(layers, initial.sdet),
            ldet: Array1::from_elem(layers, initial.ldet),
            no3: Array1::from_elem(layers, initial.no3),
            nh4: Array1::from_elem(layers, initial.nh4),
        }
    }

    pub fn get(&self, tracer: Tracer) -> &Array1<f64> {
        match tracer {
            Tracer::Phy => &self.phy,
            Tracer::Chl => &self.chl,
            Tracer::Zoo => &self.zoo,
            Tracer::SDet => &self.sdet,
            Tracer::LDet => &self.ldet,
            Tracer::NO3 => &self.no3,
            Tracer::NH4 => &self.nh4,
        }
    }

    pub fn get_mut(&mut self, tracer: Tracer) -> &mut Array1<f64> {
        match tracer {
            Tracer::Phy => &mut self.phy,
            Tracer::Chl => &mut self.chl,
            Tracer::Zoo => &mut self.zoo,
            Tracer::SDet => &mut self.sdet,
            Tracer::LDet => &mut self.ldet,
            Tracer::NO3 => &mut self.no3,
            Tracer::NH4 => &mut self.nh4,
        }
    }

    /// Depth integral of one tracer [concentration * m].
    pub fn inventory(&self, tracer: Tracer, dz: f64) -> f64 {
        self.get(tracer).sum() * dz
    }

    /// Column nitrogen inventory over `tracers` [mmol N m-2]. Chlorophyll is
    /// skipped.
    pub fn nitrogen(&self, tracers: &[Tracer], dz: f64) -> f64 {
        tracers
            .iter()
            .filter(|t| t.carries_nitrogen())
            .map(|&t| self.inventory(t, dz))
            .sum()
    }
}

/// Process parameterization selection.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    Banas,
    Fennel,
    BanasFennel,
}

/// The step contract shared by all parameterization variants.
///
/// `step` applies the fixed chain of donor-implicit updates for one time
/// step; the order of the chain is part of the numerical contract, since
/// each transformation consumes state mutated by the one before it.
/// Given finite, non-negative fields and dt > 0 the result is finite and
/// non-negative; the driver validates those preconditions once per run, and
/// the inner loop never re-checks them.
pub trait BioModel {
    /// Tracers this variant advances.
    fn tracers(&self) -> &'static [Tracer];

    /// Photosynthetically available radiation at cell centres from the
    /// current shading profile.
    fn par_profile(&self, grid: &VerticalGrid, forcing: &Forcing, fields: &Fields)
        -> Array1<f64>;

    /// One reaction step of length `dt` [days] over the whole column.
    fn step(&self, dt: f64, par: &Array1<f64>, forcing: &Forcing, fields: &mut Fields);

    /// Settling velocities [m/day] for the tracers that sink.
    fn settling(&self) -> Vec<(Tracer, f64)>;

    /// How bottom-crossing particle flux is partitioned.
    fn bottom_boundary(&self) -> BottomBoundary;

    /// Dissolved pool credited with the recycled part of the bottom flux.
    fn bottom_pool(&self) -> Tracer;
}

/// Donor-implicit (backward Euler) update: divide the donor by (1 + dt*rate)
/// and return the mass it gave up, to be credited to the receivers. `cff` is
/// dt*rate. Non-negative donors stay non-negative for any cff >= 0.
#[inline]
pub(crate) fn drain(donor: &mut f64, cff: f64) -> f64 {
    *donor /= 1.0 + cff;
    cff * *donor
}

/// Evans & Parslow (1985) photosynthesis-light curve, dimensionless.
/// Zero both in the dark and when the growth ceiling is zero.
pub(crate) fn light_limitation(alpha: f64, e: f64, mu_max: f64) -> f64 {
    let ae = alpha * e;
    let denom = (mu_max * mu_max + ae * ae).sqrt();
    if denom > 0.0 {
        ae / denom
    } else {
        0.0
    }
}

/// Light-inhibited nitrification rate [1/day]; full rate below the
/// inhibition threshold, shut off under bright light.
pub(crate) fn nitrification_rate(rate: f64, threshold: f64, half_sat: f64, e: f64) -> f64 {
    let inhibition = ((e - threshold) / (half_sat + e - threshold)).max(0.0);
    rate * (1.0 - inhibition)
}

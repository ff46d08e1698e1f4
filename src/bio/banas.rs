//! Banas/Davis et al. (2014) parameterization: five tracers and a single
//! dissolved nitrogen pool. No chlorophyll, no ammonium, no nitrification;
//! benthic loss is capped at a fixed areal rate.

use {
    super::{drain, light_limitation, BioModel, Fields, Tracer},
    crate::{
        forcing::Forcing,
        grid::VerticalGrid,
        light::{par_profile, Attenuation, Background},
        sinking::BottomBoundary,
    },
    ndarray::Array1,
};

/// Coefficients, fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct BanasParams {
    /// Maximum instantaneous growth rate [1/day].
    pub mu_0: f64,
    /// Initial slope of the growth-light curve [1/(W m-2 day)].
    pub alpha: f64,
    /// Minimum half-saturation for nitrate uptake [mmol N m-3]; the
    /// apparent half-saturation grows as ks + 2*sqrt(ks*NO3).
    pub k_s: f64,
    /// Maximum ingestion rate [1/day].
    pub graze_max: f64,
    /// Half-saturation (squared) for ingestion [(mmol N m-3)^2].
    pub k_phy: f64,
    /// Zooplankton gross growth efficiency.
    pub assim: f64,
    /// Egested share of the non-assimilated grazing flux; the remainder
    /// dissolves straight back to nitrate.
    pub egest: f64,
    /// Phytoplankton mortality [1/day].
    pub phy_mort: f64,
    /// Zooplankton quadratic mortality [(mmol N m-3)-1 day-1].
    pub zoo_mort: f64,
    /// Coagulation rate of SDet into LDet [(mmol N m-3)-1 day-1].
    pub coag: f64,
    /// Remineralization rate for both detritus pools [1/day].
    pub remin: f64,
    /// Sinking velocities [m/day].
    pub w_sdet: f64,
    pub w_ldet: f64,
    /// Maximum areal loss of nitrogen to the sediments [mmol N m-2 day-1].
    pub chi: f64,
    pub attenuation: Attenuation,
}

impl Default for BanasParams {
    fn default() -> Self {
        Self {
            mu_0: 1.7,
            alpha: 0.07,
            k_s: 0.1,
            graze_max: 4.8,
            k_phy: 9.0,
            assim: 0.3,
            egest: 0.5,
            phy_mort: 0.1,
            zoo_mort: 2.0,
            coag: 0.05,
            remin: 0.1,
            w_sdet: 8.0,
            w_ldet: 80.0,
            chi: 1.2,
            attenuation: Attenuation {
                par_fraction: 0.43,
                background: Background::Salinity { base: 0.05, slope: 0.0065, reference: 32.0 },
                shade: 0.03,
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Banas {
    pub params: BanasParams,
}

impl Banas {
    pub fn new(params: BanasParams) -> Self {
        Self { params }
    }
}

impl BioModel for Banas {
    fn tracers(&self) -> &'static [Tracer] {
        &[Tracer::Phy, Tracer::Zoo, Tracer::SDet, Tracer::LDet, Tracer::NO3]
    }

    fn par_profile(
        &self,
        grid: &VerticalGrid,
        forcing: &Forcing,
        fields: &Fields,
    ) -> Array1<f64> {
        // Phytoplankton self-shading; there is no chlorophyll pool.
        par_profile(grid, forcing.swrad, &fields.phy, &forcing.salt, &self.params.attenuation)
    }

    fn step(&self, dt: f64, par: &Array1<f64>, _forcing: &Forcing, fields: &mut Fields) {
        let p = &self.params;

        for i in 0..fields.phy.len() {
            let f = light_limitation(p.alpha, par[i], p.mu_0);

            // Growth drains the single nitrate pool.
            let ks_app = p.k_s + 2.0 * (p.k_s * fields.no3[i]).sqrt();
            let cff = dt * p.mu_0 * f * fields.phy[i] / (ks_app + fields.no3[i]);
            let uptake = drain(&mut fields.no3[i], cff);
            fields.phy[i] += uptake;

            // Grazing.
            let ing = p.graze_max * fields.phy[i] * fields.zoo[i]
                / (p.k_phy + fields.phy[i] * fields.phy[i]);
            let grazed = drain(&mut fields.phy[i], dt * ing);
            fields.zoo[i] += p.assim * grazed;
            let unassimilated = (1.0 - p.assim) * grazed;
            fields.sdet[i] += p.egest * unassimilated;
            fields.no3[i] += (1.0 - p.egest) * unassimilated;

            // Phytoplankton mortality.
            fields.sdet[i] += drain(&mut fields.phy[i], dt * p.phy_mort);

            // Zooplankton mortality, quadratic closure.
            let cff = dt * p.zoo_mort * fields.zoo[i];
            fields.sdet[i] += drain(&mut fields.zoo[i], cff);

            // Detrital coagulation, quadratic in SDet.
            let cff = dt * p.coag * fields.sdet[i];
            fields.ldet[i] += drain(&mut fields.sdet[i], cff);

            // Remineralization straight back to nitrate.
            fields.no3[i] += drain(&mut fields.sdet[i], dt * p.remin);
            fields.no3[i] += drain(&mut fields.ldet[i], dt * p.remin);
        }
    }

    fn settling(&self) -> Vec<(Tracer, f64)> {
        vec![(Tracer::SDet, self.params.w_sdet), (Tracer::LDet, self.params.w_ldet)]
    }

    fn bottom_boundary(&self) -> BottomBoundary {
        BottomBoundary::CappedLoss { max_rate: self.params.chi }
    }

    fn bottom_pool(&self) -> Tracer {
        Tracer::NO3
    }
}

#[cfg(test)]
mod test {
    use {super::*, approx::assert_abs_diff_eq, ndarray::Array1};

    fn forcing(n: usize, swrad: f64) -> Forcing {
        Forcing {
            temp: Array1::from_elem(n, 10.0),
            salt: Array1::from_elem(n, 30.0),
            swrad,
        }
    }

    #[test]
    fn apparent_half_saturation() {
        // At NO3 = ks the apparent half-saturation is 3*ks, so the
        // limitation factor is 1/4.
        let p = BanasParams::default();
        let ks_app = p.k_s + 2.0 * (p.k_s * p.k_s).sqrt();
        assert_abs_diff_eq!(p.k_s / (ks_app + p.k_s), 0.25, epsilon = 1.0e-12);
    }

    #[test]
    fn reaction_step_conserves_nitrogen() {
        let model = Banas::default();
        let grid = VerticalGrid::new(100.0, 50).unwrap();
        let forcing = forcing(50, 500.0);

        let mut fields = Fields::zeros(50);
        fields.phy.fill(0.01);
        fields.zoo.fill(0.001);
        fields.no3.fill(20.0);

        let before = fields.nitrogen(model.tracers(), grid.dz());
        for _ in 0..200 {
            let par = model.par_profile(&grid, &forcing, &fields);
            model.step(0.01, &par, &forcing, &mut fields);
        }

        assert_abs_diff_eq!(
            fields.nitrogen(model.tracers(), grid.dz()),
            before,
            epsilon = 1.0e-9
        );
        for tracer in model.tracers() {
            for &c in fields.get(*tracer).iter() {
                assert!(c >= 0.0 && c.is_finite());
            }
        }
    }

    #[test]
    fn empty_nitrate_pool_stays_empty_of_uptake() {
        let model = Banas::default();
        let grid = VerticalGrid::new(50.0, 5).unwrap();
        let forcing = forcing(5, 500.0);

        let mut fields = Fields::zeros(5);
        fields.phy.fill(1.0);

        let par = model.par_profile(&grid, &forcing, &fields);
        model.step(0.1, &par, &forcing, &mut fields);

        // Nothing to take up: the only drain on Phy is mortality, and what
        // nitrate appears comes from remineralized detritus, not uptake.
        for i in 0..5 {
            assert_abs_diff_eq!(
                fields.phy[i],
                1.0 / (1.0 + 0.1 * model.params.phy_mort),
                epsilon = 1.0e-12
            );
            assert!(fields.no3[i] >= 0.0);
            assert!(fields.sdet[i] > 0.0);
        }
    }
}

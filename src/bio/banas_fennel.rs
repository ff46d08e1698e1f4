//! Banas coefficients and functional forms run through the two-pool
//! nitrate/ammonium bookkeeping: flat maximum growth rate, the steeper
//! growth-light curve, fast grazing, and a chlorophyll pool carried at a
//! fixed pigment-to-nitrogen ratio.

use {
    super::{drain, light_limitation, nitrification_rate, BioModel, Fields, Tracer},
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
pub struct BanasFennelParams {
    /// Maximum instantaneous growth rate [1/day], temperature-independent.
    pub mu_0: f64,
    /// Initial slope of the growth-light curve [1/(W m-2 day)].
    pub alpha: f64,
    /// Half-saturation for nitrate uptake [mmol N m-3].
    pub k_no3: f64,
    /// Half-saturation for ammonium uptake [mmol N m-3].
    pub k_nh4: f64,
    /// Chlorophyll to nitrogen ratio [mg Chl / mmol N].
    pub chl_to_n: f64,
    /// Maximum ingestion rate [1/day].
    pub graze_max: f64,
    /// Half-saturation (squared) for ingestion [(mmol N m-3)^2].
    pub k_phy: f64,
    /// Zooplankton gross growth efficiency.
    pub assim: f64,
    /// Egested share of the non-assimilated grazing flux; the remainder
    /// dissolves to ammonium.
    pub egest: f64,
    /// Zooplankton basal metabolism [1/day].
    pub metab_base: f64,
    /// Zooplankton specific excretion rate [1/day].
    pub excrete: f64,
    /// Phytoplankton mortality [1/day].
    pub phy_mort: f64,
    /// Zooplankton quadratic mortality [(mmol N m-3)-1 day-1].
    pub zoo_mort: f64,
    /// Coagulation rate [(mmol N m-3)-1 day-1], proportional to Phy.
    pub coag: f64,
    /// Small detritus remineralization [1/day].
    pub sdet_remin: f64,
    /// Large detritus remineralization [1/day].
    pub ldet_remin: f64,
    /// Nitrification rate [1/day].
    pub nitri: f64,
    /// Radiation threshold for nitrification inhibition [W m-2].
    pub nitri_threshold: f64,
    /// Half-saturation radiation for nitrification inhibition [W m-2].
    pub nitri_half_sat: f64,
    /// Sinking velocities [m/day]; phytoplankton does not sink here.
    pub w_sdet: f64,
    pub w_ldet: f64,
    pub attenuation: Attenuation,
}

impl Default for BanasFennelParams {
    fn default() -> Self {
        Self {
            mu_0: 1.7,
            alpha: 0.07,
            k_no3: 0.1,
            k_nh4: 0.1,
            chl_to_n: 2.5,
            graze_max: 4.8,
            k_phy: 9.0,
            assim: 0.3,
            egest: 0.5,
            metab_base: 0.1,
            excrete: 0.1,
            phy_mort: 0.1,
            zoo_mort: 2.0,
            coag: 0.05,
            sdet_remin: 0.1,
            ldet_remin: 0.1,
            nitri: 0.05,
            nitri_threshold: 0.0095,
            nitri_half_sat: 0.1,
            w_sdet: 8.0,
            w_ldet: 80.0,
            attenuation: Attenuation {
                par_fraction: 0.43,
                background: Background::Salinity { base: 0.05, slope: 0.0065, reference: 32.0 },
                shade: 0.03,
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BanasFennel {
    pub params: BanasFennelParams,
}

impl BanasFennel {
    pub fn new(params: BanasFennelParams) -> Self {
        Self { params }
    }
}

impl BioModel for BanasFennel {
    fn tracers(&self) -> &'static [Tracer] {
        &Tracer::ALL
    }

    fn par_profile(
        &self,
        grid: &VerticalGrid,
        forcing: &Forcing,
        fields: &Fields,
    ) -> Array1<f64> {
        // Self-shading works on phytoplankton biomass, not pigment.
        par_profile(grid, forcing.swrad, &fields.phy, &forcing.salt, &self.params.attenuation)
    }

    fn step(&self, dt: f64, par: &Array1<f64>, _forcing: &Forcing, fields: &mut Fields) {
        let p = &self.params;

        for i in 0..fields.phy.len() {
            let e = par[i];
            let f = light_limitation(p.alpha, e, p.mu_0);

            // Growth on both pools, ammonium preferred.
            let inhibit = p.k_nh4 / (p.k_nh4 + fields.nh4[i]);
            let cff3 = dt * p.mu_0 * f * fields.phy[i] / (p.k_no3 + fields.no3[i]) * inhibit;
            let cff4 = dt * p.mu_0 * f * fields.phy[i] / (p.k_nh4 + fields.nh4[i]);
            let uptake = drain(&mut fields.no3[i], cff3) + drain(&mut fields.nh4[i], cff4);
            fields.phy[i] += uptake;

            // Pigment tracks nitrogen uptake at a fixed ratio.
            fields.chl[i] += p.chl_to_n * uptake;

            // Grazing drains Phy, and Chl in proportion.
            let ing = p.graze_max * fields.phy[i] * fields.zoo[i]
                / (p.k_phy + fields.phy[i] * fields.phy[i]);
            let cff = dt * ing;
            let grazed = drain(&mut fields.phy[i], cff);
            fields.chl[i] /= 1.0 + cff;
            fields.zoo[i] += p.assim * grazed;
            let unassimilated = (1.0 - p.assim) * grazed;
            fields.sdet[i] += p.egest * unassimilated;
            fields.nh4[i] += (1.0 - p.egest) * unassimilated;

            // Zooplankton metabolism.
            let phy2 = fields.phy[i] * fields.phy[i];
            let metab = p.metab_base + p.excrete * p.assim * phy2 / (p.k_phy + phy2);
            fields.nh4[i] += drain(&mut fields.zoo[i], dt * metab);

            // Phytoplankton mortality.
            let cff = dt * p.phy_mort;
            fields.sdet[i] += drain(&mut fields.phy[i], cff);
            fields.chl[i] /= 1.0 + cff;

            // Zooplankton mortality, quadratic closure.
            let cff = dt * p.zoo_mort * fields.zoo[i];
            fields.sdet[i] += drain(&mut fields.zoo[i], cff);

            // Coagulation into large detritus, rate proportional to Phy.
            let coag = p.coag * fields.phy[i];
            let cff_p = dt * coag * fields.phy[i];
            let cff_s = dt * coag * fields.sdet[i];
            let mut to_ldet = drain(&mut fields.phy[i], cff_p);
            fields.chl[i] /= 1.0 + cff_p;
            to_ldet += drain(&mut fields.sdet[i], cff_s);
            fields.ldet[i] += to_ldet;

            // Remineralization of both detritus pools.
            fields.nh4[i] += drain(&mut fields.sdet[i], dt * p.sdet_remin);
            fields.nh4[i] += drain(&mut fields.ldet[i], dt * p.ldet_remin);

            // Nitrification, inhibited by light.
            let nitri = nitrification_rate(p.nitri, p.nitri_threshold, p.nitri_half_sat, e);
            fields.no3[i] += drain(&mut fields.nh4[i], dt * nitri);
        }
    }

    fn settling(&self) -> Vec<(Tracer, f64)> {
        vec![(Tracer::SDet, self.params.w_sdet), (Tracer::LDet, self.params.w_ldet)]
    }

    fn bottom_boundary(&self) -> BottomBoundary {
        BottomBoundary::RecycleAll
    }

    fn bottom_pool(&self) -> Tracer {
        Tracer::NH4
    }
}

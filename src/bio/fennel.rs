//! Fennel et al. (2006) parameterization: two dissolved nitrogen pools with
//! preferential ammonium uptake, a dynamic chlorophyll pool, and
//! light-inhibited nitrification.

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

const CARBON_ATOMIC_WEIGHT: f64 = 12.0;

/// Coefficients, fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct FennelParams {
    /// Phytoplankton growth rate at 0 degC [1/day].
    pub mu_0: f64,
    /// Eppley temperature dependence base.
    pub temp_base: f64,
    /// Initial slope of the P-I curve [1/(W m-2 day)].
    pub alpha: f64,
    /// Half-saturation for nitrate uptake [mmol N m-3].
    pub k_no3: f64,
    /// Half-saturation for ammonium uptake [mmol N m-3].
    pub k_nh4: f64,
    /// Phytoplankton carbon:nitrogen ratio [mol C / mol N].
    pub c_to_n: f64,
    /// Maximum chlorophyll-to-carbon ratio [mg Chl / mg C].
    pub chl2c_max: f64,
    /// Maximum grazing rate [1/day].
    pub graze_max: f64,
    /// Half-saturation (squared) for ingestion [(mmol N m-3)^2].
    pub k_phy: f64,
    /// Zooplankton nitrogen assimilation efficiency.
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
    /// Coagulation rate of Phy + SDet into LDet [(mmol N m-3)-1 day-1].
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
    /// Sinking velocities [m/day]; chlorophyll sinks with the phytoplankton.
    pub w_phy: f64,
    pub w_sdet: f64,
    pub w_ldet: f64,
    pub attenuation: Attenuation,
    /// Fraction of the bottom particle flux recycled to ammonium; the rest
    /// is denitrified.
    pub bottom_recycle: f64,
}

impl Default for FennelParams {
    fn default() -> Self {
        Self {
            mu_0: 0.59,
            temp_base: 1.066,
            alpha: 0.025,
            k_no3: 0.5,
            k_nh4: 0.5,
            c_to_n: 6.625,
            chl2c_max: 0.0535,
            graze_max: 0.6,
            k_phy: 2.0,
            assim: 0.75,
            egest: 1.0,
            metab_base: 0.1,
            excrete: 0.1,
            phy_mort: 0.15,
            zoo_mort: 0.025,
            coag: 0.005,
            sdet_remin: 0.03,
            ldet_remin: 0.01,
            nitri: 0.05,
            nitri_threshold: 0.0095,
            nitri_half_sat: 0.1,
            w_phy: 0.1,
            w_sdet: 0.1,
            w_ldet: 1.0,
            attenuation: Attenuation {
                par_fraction: 0.43,
                background: Background::Fixed(0.04),
                shade: 0.02486,
            },
            bottom_recycle: 0.25,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Fennel {
    pub params: FennelParams,
}

impl Fennel {
    pub fn new(params: FennelParams) -> Self {
        Self { params }
    }
}

impl BioModel for Fennel {
    fn tracers(&self) -> &'static [Tracer] {
        &Tracer::ALL
    }

    fn par_profile(
        &self,
        grid: &VerticalGrid,
        forcing: &Forcing,
        fields: &Fields,
    ) -> Array1<f64> {
        par_profile(grid, forcing.swrad, &fields.chl, &forcing.salt, &self.params.attenuation)
    }

    fn step(&self, dt: f64, par: &Array1<f64>, forcing: &Forcing, fields: &mut Fields) {
        let p = &self.params;

        // Every transformation is organized around the pool being drained:
        // divide the donor by (1 + dt*rate), credit the receivers with what
        // came out. Later steps deliberately consume earlier updates.
        for i in 0..fields.phy.len() {
            let e = par[i];
            let mu_max = p.mu_0 * p.temp_base.powf(forcing.temp[i]);
            let f = light_limitation(p.alpha, e, mu_max);

            // Growth: nitrate uptake is inhibited by ammonium, ammonium
            // uptake is not.
            let inhibit = p.k_nh4 / (p.k_nh4 + fields.nh4[i]);
            let cff3 = dt * mu_max * f * fields.phy[i] / (p.k_no3 + fields.no3[i]) * inhibit;
            let cff4 = dt * mu_max * f * fields.phy[i] / (p.k_nh4 + fields.nh4[i]);
            let uptake = drain(&mut fields.no3[i], cff3) + drain(&mut fields.nh4[i], cff4);
            fields.phy[i] += uptake;

            // Chlorophyll synthesis follows the realized growth rate,
            // evaluated on the post-uptake nutrient pools.
            let mu3 = mu_max * f * (fields.no3[i] / (p.k_no3 + fields.no3[i]))
                * (p.k_nh4 / (p.k_nh4 + fields.nh4[i]));
            let mu4 = mu_max * f * (fields.nh4[i] / (p.k_nh4 + fields.nh4[i]));
            let mu = mu3 + mu4;
            if e > 0.0 && fields.phy[i] > 0.0 && fields.chl[i] > 0.0 {
                let rho_chl = p.c_to_n * CARBON_ATOMIC_WEIGHT * p.chl2c_max * mu * fields.phy[i]
                    / (p.alpha * e * fields.chl[i]);
                let chl2phy = fields.chl[i] / fields.phy[i];
                fields.chl[i] += rho_chl * chl2phy * uptake;
            }

            // Grazing: the s-shaped ingestion curve drains Phy, and Chl in
            // proportion.
            let ing = p.graze_max * fields.phy[i] * fields.zoo[i]
                / (p.k_phy + fields.phy[i] * fields.phy[i]);
            let cff = dt * ing;
            let grazed = drain(&mut fields.phy[i], cff);
            fields.chl[i] /= 1.0 + cff;
            fields.zoo[i] += p.assim * grazed;
            let unassimilated = (1.0 - p.assim) * grazed;
            fields.sdet[i] += p.egest * unassimilated;
            fields.nh4[i] += (1.0 - p.egest) * unassimilated;

            // Zooplankton metabolism returns biomass to ammonium.
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

            // Coagulation of phytoplankton and small detritus into large
            // detritus.
            let coag = p.coag * (fields.phy[i] + fields.sdet[i]);
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
        vec![
            (Tracer::Phy, self.params.w_phy),
            (Tracer::Chl, self.params.w_phy),
            (Tracer::SDet, self.params.w_sdet),
            (Tracer::LDet, self.params.w_ldet),
        ]
    }

    fn bottom_boundary(&self) -> BottomBoundary {
        BottomBoundary::RecycleFraction(self.params.bottom_recycle)
    }

    fn bottom_pool(&self) -> Tracer {
        Tracer::NH4
    }
}

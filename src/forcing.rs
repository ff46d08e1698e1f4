use {crate::parameters::Parameters, ndarray::Array1};

/// Physical conditions the column sees during one step. Read-only to the
/// integrator.
#[derive(Debug, Clone, PartialEq)]
pub struct Forcing {
    /// Potential temperature at cell centres [deg C].
    pub temp: Array1<f64>,
    /// Salinity at cell centres [psu].
    pub salt: Array1<f64>,
    /// Surface downward shortwave radiation [W m-2].
    pub swrad: f64,
}

/// Supplies the forcing bundle for each step. Implement this for anything
/// time-varying; the integrator samples it once per step.
pub trait ForcingSupplier {
    fn sample(&self, t: f64) -> Forcing;
}

/// Uniform, time-invariant forcing.
#[derive(Debug, Clone)]
pub struct ConstantForcing {
    forcing: Forcing,
}

impl ConstantForcing {
    pub fn new(layers: usize, temperature: f64, salinity: f64, swrad: f64) -> Self {
        Self {
            forcing: Forcing {
                temp: Array1::from_elem(layers, temperature),
                salt: Array1::from_elem(layers, salinity),
                swrad,
            },
        }
    }

    pub fn from_parameters(parameters: &Parameters) -> Self {
        Self::new(
            parameters.numerical.layers,
            parameters.physical.temperature,
            parameters.physical.salinity,
            parameters.physical.surface_radiation,
        )
    }
}

impl ForcingSupplier for ConstantForcing {
    fn sample(&self, _t: f64) -> Forcing {
        self.forcing.clone()
    }
}

/// Any closure from time to a forcing bundle is a supplier, so time-varying
/// forcing (seasonal light, a river pulse) needs no dedicated type.
impl<F> ForcingSupplier for F
where
    F: Fn(f64) -> Forcing,
{
    fn sample(&self, t: f64) -> Forcing {
        self(t)
    }
}

#[cfg(test)]
mod test {
    use {super::*, approx::assert_abs_diff_eq, std::f64::consts::PI};

    #[test]
    fn constant_forcing_ignores_time() {
        let supplier = ConstantForcing::new(5, 10.0, 32.0, 500.0);
        assert_eq!(supplier.sample(0.0), supplier.sample(17.3));
        assert_eq!(supplier.sample(0.0).temp.len(), 5);
    }

    #[test]
    fn closures_supply_time_varying_forcing() {
        let supplier = |t: f64| Forcing {
            temp: Array1::from_elem(5, 10.0),
            salt: Array1::from_elem(5, 32.0),
            swrad: 250.0 * (1.0 - (2.0 * PI * t).cos()),
        };

        assert_abs_diff_eq!(supplier.sample(0.0).swrad, 0.0, epsilon = 1.0e-12);
        assert_abs_diff_eq!(supplier.sample(0.5).swrad, 500.0, epsilon = 1.0e-12);
    }
}

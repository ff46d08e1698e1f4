use {
    crate::bio::Variant,
    anyhow::{ensure, Result},
    serde::Deserialize,
    std::path::PathBuf,
};

/// Simulation parameters
#[derive(Debug, PartialEq, Default, Deserialize)]
pub struct Parameters {
    pub numerical: Numerical,
    pub physical: Physical,
    pub biology: Biology,
    pub environment: Environment,
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct Numerical {
    /// Water column depth [m]
    pub depth: f64,
    /// Number of vertical grid cells
    pub layers: usize,
    /// Simulation time step [days]
    pub time_step: f64,
    /// Total duration of the simulation [days]
    pub duration: f64,
    /// Interval between saved profiles [days]
    pub profile_save_interval: f64,
    /// Interval between saved reservoir totals [days]
    pub reservoir_save_interval: f64,
}

impl Default for Numerical {
    fn default() -> Self {
        Numerical {
            depth: 50.0,
            layers: 25,
            time_step: 0.01,
            duration: 20.0,
            profile_save_interval: 2.0,
            reservoir_save_interval: 0.2,
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct Physical {
    /// Potential temperature [deg C]
    pub temperature: f64,
    /// Salinity [psu]
    pub salinity: f64,
    /// Surface downward shortwave radiation [W m-2]
    pub surface_radiation: f64,
}

impl Default for Physical {
    fn default() -> Self {
        Physical {
            temperature: 10.0,
            salinity: 32.0,
            surface_radiation: 500.0,
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct Biology {
    /// Process parameterization variant
    pub variant: Variant,
    /// Vertically uniform initial concentrations
    pub initial: Initial,
}

impl Default for Biology {
    fn default() -> Self {
        Biology {
            variant: Variant::Fennel,
            initial: Initial::default(),
        }
    }
}

/// Initial concentrations, mmol N m-3 except chlorophyll [mg Chl m-3].
#[derive(Debug, PartialEq, Deserialize)]
pub struct Initial {
    pub phy: f64,
    pub chl: f64,
    pub zoo: f64,
    pub sdet: f64,
    pub ldet: f64,
    pub no3: f64,
    pub nh4: f64,
}

impl Default for Initial {
    fn default() -> Self {
        Initial {
            phy: 0.01,
            chl: 0.025,
            zoo: 0.001,
            sdet: 0.0,
            ldet: 0.0,
            no3: 20.0,
            nh4: 0.0,
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct Environment {
    /// Directory the output archives are written into
    pub output_directory: PathBuf,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            output_directory: PathBuf::from("output"),
        }
    }
}

impl Parameters {
    /// Reject configurations the integrator cannot run. Called once while
    /// initializing; the inner loop assumes these hold.
    pub fn validate(&self) -> Result<()> {
        let n = &self.numerical;
        ensure!(
            n.depth.is_finite() && n.depth > 0.0,
            "column depth must be positive, got {}",
            n.depth
        );
        ensure!(n.layers > 0, "at least one vertical layer is required");
        ensure!(
            n.time_step.is_finite() && n.time_step > 0.0,
            "time step must be positive, got {}",
            n.time_step
        );
        ensure!(
            n.duration.is_finite() && n.duration >= 0.0,
            "duration must be non-negative, got {}",
            n.duration
        );
        ensure!(
            n.profile_save_interval > 0.0 && n.reservoir_save_interval > 0.0,
            "save intervals must be positive"
        );

        let i = &self.biology.initial;
        for &(name, value) in &[
            ("phy", i.phy),
            ("chl", i.chl),
            ("zoo", i.zoo),
            ("sdet", i.sdet),
            ("ldet", i.ldet),
            ("no3", i.no3),
            ("nh4", i.nh4),
        ] {
            ensure!(
                value.is_finite() && value >= 0.0,
                "initial {} concentration must be non-negative and finite, got {}",
                name,
                value
            );
        }

        ensure!(
            self.physical.surface_radiation.is_finite() && self.physical.surface_radiation >= 0.0,
            "surface radiation must be non-negative, got {}",
            self.physical.surface_radiation
        );

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use {super::*, std::fs::File};

    #[test]
    fn defaults() {
        assert_eq!(
            Parameters::default(),
            serde_yaml::from_reader::<_, Parameters>(
                File::open("src/testdata/defaults.yaml").unwrap()
            )
            .unwrap()
        );
    }

    #[test]
    fn rejects_bad_configurations() {
        let mut params = Parameters::default();
        params.numerical.time_step = 0.0;
        assert!(params.validate().is_err());

        let mut params = Parameters::default();
        params.numerical.depth = -50.0;
        assert!(params.validate().is_err());

        let mut params = Parameters::default();
        params.biology.initial.no3 = -1.0;
        assert!(params.validate().is_err());

        assert!(Parameters::default().validate().is_ok());
    }
}

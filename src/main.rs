#[macro_use]
extern crate clap;

use {
    anyhow::Result,
    log::{error, info},
    npzd_column::{archive, column::run, parameters::Parameters},
    simplelog::{Config as LogConfig, LevelFilter, TermLogger, TerminalMode},
    std::fs::{create_dir_all, File},
};

#[quit::main]
fn main() {
    let matches = clap_app!(npzd_column =>
        (version: crate_version!())
        (about: "Integrates a 1-D NPZD water column forward in time.")
        (@arg PARAMETERS: -p --parameters +takes_value +required "Path to file containing simulation parameters.")
    )
    .get_matches();

    TermLogger::init(
        LevelFilter::Debug,
        LogConfig::default(),
        TerminalMode::Mixed,
    )
    .expect("Failed to initialize logger");

    let params = {
        // Should never panic as clap should return an error if the argument was not supplied
        let path = matches
            .value_of("PARAMETERS")
            .expect("Path to parameters file not supplied");

        let file = File::open(path).unwrap_or_else(|e| {
            error!("Failed to open {}: \"{}\"", path, e);
            quit::with_code(1);
        });

        let params = serde_yaml::from_reader::<_, Parameters>(file).unwrap_or_else(|e| {
            error!("Failed to parse parameters from {}: \"{}\"", path, e);
            quit::with_code(1);
        });

        info!(
            "Successfully loaded simulation parameters from \"{}\": \n{:#?}",
            path, params
        );

        params
    };

    run_column(params).unwrap_or_else(|e| {
        error!("Error: \"{}\"", e);
        quit::with_code(1);
    });
}

fn run_column(params: Parameters) -> Result<()> {
    create_dir_all(&params.environment.output_directory)?;

    info!("Starting {:?} column run", params.biology.variant);

    let output = run(&params)?;
    archive::write(&params.environment.output_directory, &output)?;

    info!(
        "Finished; archives written to {:?}, column mean N {:.7} mmol N m-3",
        params.environment.output_directory, output.mean_nitrogen
    );

    Ok(())
}

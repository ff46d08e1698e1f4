use {
    crate::column::Output,
    anyhow::Result,
    byteorder::{ByteOrder, LittleEndian},
    std::{
        fmt::Write as _,
        fs::File,
        io::Write,
        path::Path,
    },
};

/// Write a run's archives into `directory`.
///
/// Each advanced tracer gets `<name>.r8`: one record per snapshot, the save
/// time followed by the bottom-to-top profile, all little-endian f64. The
/// PAR profile goes to `par.r8` in the same layout, and the reservoir series
/// to `reservoirs.asc` as whitespace-separated text (time, one inventory per
/// tracer, cumulative loss).
pub fn write(directory: &Path, output: &Output) -> Result<()> {
    for &tracer in &output.tracers {
        let path = directory.join(format!("{}.r8", tracer.name().to_lowercase()));
        let mut f = File::create(path)?;
        for snapshot in &output.snapshots {
            write_record(&mut f, snapshot.t, snapshot.fields.get(tracer).iter().cloned())?;
        }
    }

    let mut f = File::create(directory.join("par.r8"))?;
    for snapshot in &output.snapshots {
        write_record(&mut f, snapshot.t, snapshot.par.iter().cloned())?;
    }

    let mut text = String::new();
    for reservoir in &output.reservoirs {
        write!(&mut text, "{:14.6}", reservoir.t)?;
        for inventory in &reservoir.inventories {
            write!(&mut text, " {:14.7}", inventory)?;
        }
        writeln!(&mut text, " {:14.7}", reservoir.lost)?;
    }
    File::create(directory.join("reservoirs.asc"))?.write_all(text.as_bytes())?;

    Ok(())
}

fn write_record<I>(f: &mut File, t: f64, values: I) -> Result<()>
where
    I: Iterator<Item = f64>,
{
    let mut buf = [0u8; 8];
    LittleEndian::write_f64(&mut buf, t);
    f.write_all(&buf)?;
    for v in values {
        LittleEndian::write_f64(&mut buf, v);
        f.write_all(&buf)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::{column::run, parameters::Parameters},
        byteorder::{ByteOrder, LittleEndian},
        std::{fs, io::Read},
        tempdir::TempDir,
    };

    #[test]
    fn archives_round_trip() {
        let tempdir = TempDir::new("npzd-column").unwrap();

        let mut params = Parameters::default();
        params.numerical.layers = 2;
        params.numerical.duration = 0.02;
        params.numerical.profile_save_interval = 0.01;
        params.numerical.reservoir_save_interval = 0.01;

        let output = run(&params).unwrap();
        write(tempdir.path(), &output).unwrap();

        // Three snapshots of (time + two cells) per tracer.
        let mut bytes = Vec::new();
        File::open(tempdir.path().join("no3.r8"))
            .unwrap()
            .read_to_end(&mut bytes)
            .unwrap();
        assert_eq!(bytes.len(), 3 * 3 * 8);

        let no3_bottom_initial = LittleEndian::read_f64(&bytes[8..16]);
        assert!((no3_bottom_initial - 20.0).abs() < 1.0e-12);

        let reservoirs = fs::read_to_string(tempdir.path().join("reservoirs.asc")).unwrap();
        assert_eq!(reservoirs.lines().count(), 3);
        // time + 7 inventories + loss
        assert_eq!(reservoirs.lines().next().unwrap().split_whitespace().count(), 9);

        assert!(tempdir.path().join("par.r8").exists());
        assert!(tempdir.path().join("phy.r8").exists());
    }
}

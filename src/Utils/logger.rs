use crate::settings::Settings;
use csv::Writer;
use simplelog::*;
use std::fs::File;
use std::io;

/// Wires the `log` macros to a terminal logger at the level named in the
/// settings. "off" and "none" leave logging disabled; a second call is a
/// no-op because the global logger is already set.
pub fn init_logging(settings: &Settings) -> Result<(), String> {
    let Some(level) = settings.loglevel.as_deref() else {
        return Ok(());
    };
    if level == "off" || level == "none" {
        return Ok(());
    }
    let log_option = match level {
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => return Err(format!("loglevel must be debug, info, warn or error, got {}", level)),
    };
    let logger_instance = CombinedLogger::init(vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
    match logger_instance {
        Ok(()) => Ok(()),
        Err(_) => Ok(()),
    }
}

/// Dumps sampled curves to CSV, one row per grid point, with the argument
/// column first.
pub fn save_samples_to_csv(
    filename: &str,
    arg: &str,
    headers: &[String],
    x_mesh: &[f64],
    columns: &[Vec<f64>],
) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);

    let mut headers_with_x = Vec::new();
    headers_with_x.push(arg.to_string());
    headers_with_x.extend(headers.iter().cloned());
    writer.write_record(&headers_with_x)?;

    for (i, &x) in x_mesh.iter().enumerate() {
        let mut row_data = Vec::new();
        row_data.push(x.to_string());
        row_data.extend(columns.iter().map(|col| col[i].to_string()));
        writer.write_record(&row_data)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn rejects_unknown_log_levels() {
        let settings = Settings {
            loglevel: Some("loud".to_string()),
            ..Settings::default()
        };
        assert!(init_logging(&settings).is_err());
    }

    #[test]
    fn off_disables_logging_without_error() {
        let settings = Settings {
            loglevel: Some("off".to_string()),
            ..Settings::default()
        };
        assert!(init_logging(&settings).is_ok());
    }

    #[test]
    fn writes_sample_grids_as_csv() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("curves.csv");
        let x_mesh = vec![0.0, 1.0, 2.0];
        let demand = vec![100.0, 98.0, 96.0];
        let supply = vec![5.0, 6.0, 7.0];
        save_samples_to_csv(
            path.to_str().expect("utf8 path"),
            "Q",
            &["P_d".to_string(), "P_s".to_string()],
            &x_mesh,
            &[demand, supply],
        )
        .expect("csv");
        let contents = std::fs::read_to_string(&path).expect("read");
        assert!(contents.starts_with("Q,P_d,P_s"));
        assert!(contents.contains("1,98,6"));
    }
}

use chrono::Local;
use csv::Writer;
use log::debug;
use simplelog::*;
use std::error::Error;
use std::fs::File;
use std::io;

/// Map a loglevel string to a filter: "debug", "info", "warn", "error", "off"/"none"
pub fn parse_loglevel(level: &str) -> Result<LevelFilter, String> {
    match level.to_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" | "none" => Ok(LevelFilter::Off),
        other => Err(format!(
            "loglevel must be debug, info, warn, error or off, got '{}'",
            other
        )),
    }
}

/// Terminal logger plus, if requested, a log_<date>_<time>.txt file logger.
/// A logger that is already installed is kept.
pub fn init_logger(loglevel: Option<&str>, log_to_file: bool) -> Result<(), Box<dyn Error>> {
    let log_option = match loglevel {
        Some(level) => parse_loglevel(level)?,
        None => LevelFilter::Info,
    };
    if log_option == LevelFilter::Off {
        return Ok(());
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        loggers.push(WriteLogger::new(
            log_option,
            Config::default(),
            File::create(name)?,
        ));
    }
    let logger_instance = CombinedLogger::init(loggers);
    match logger_instance {
        Ok(()) => Ok(()),
        Err(_) => {
            debug!("logger already initialized, keeping it");
            Ok(())
        }
    }
}

/// Write a table of string cells to a csv file, headers first
pub fn save_table_to_csv(
    headers: &[String],
    rows: &[Vec<String>],
    filename: &str,
) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_loglevel() {
        assert_eq!(parse_loglevel("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_loglevel("INFO").unwrap(), LevelFilter::Info);
        assert_eq!(parse_loglevel("none").unwrap(), LevelFilter::Off);
        assert!(parse_loglevel("verbose").is_err());
    }

    #[test]
    fn test_init_logger_rejects_unknown_level() {
        assert!(init_logger(Some("loud"), false).is_err());
        assert!(init_logger(Some("off"), false).is_ok());
    }

    #[test]
    fn test_second_init_keeps_first_logger() {
        assert!(init_logger(Some("warn"), false).is_ok());
        assert!(init_logger(Some("debug"), false).is_ok());
    }

    #[test]
    fn test_save_table_to_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let path = path.to_str().unwrap();
        let headers = vec!["variant".to_string(), "B".to_string()];
        let rows = vec![
            vec!["variant_1".to_string(), "29.47".to_string()],
            vec!["variant_2".to_string(), "35.01".to_string()],
        ];
        save_table_to_csv(&headers, &rows, path).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content, "variant,B\nvariant_1,29.47\nvariant_2,35.01\n");
    }
}

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use thiserror::Error;

use super::model::MovementStep;

/// Errors that can occur when importing a sequence CSV file.
#[derive(Clone, Debug, Error)]
pub enum SequenceFileError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("failed to parse '{value}' in column '{column}' at row {row}")]
    BadValue {
        column: &'static str,
        row: usize,
        value: String,
    },
    #[error("too many rows: {actual} (max: {max})")]
    TooManyRows { max: usize, actual: usize },
    #[error("sequence file contains no data rows")]
    Empty,
}

/// Import a movement sequence from a CSV file.
///
/// The header row is required; columns are matched case-insensitively with
/// whitespace trimmed. Required: `distance` (or `distance_mm`), `speed`,
/// `angle`, `angle_speed` (or `angleSpeed`). Optional: `pause` (or
/// `pause_ms`, default 0) and `simultaneous` (true/false/1/0, default
/// false). Row numbers in errors are 1-based data rows.
pub fn load_sequence_from_csv_path(
    path: &Path,
    max_rows: usize,
) -> Result<Vec<MovementStep>, SequenceFileError> {
    let file = std::fs::File::open(path)
        .map_err(|e| SequenceFileError::Io(format!("failed to open {}: {}", path.display(), e)))?;
    load_sequence_from_csv_reader(file, max_rows)
}

fn load_sequence_from_csv_reader<R: Read>(
    reader: R,
    max_rows: usize,
) -> Result<Vec<MovementStep>, SequenceFileError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| SequenceFileError::Csv(format!("failed to read headers: {}", e)))?;

    let distance_idx = find_column_index(headers, &["distance", "distance_mm"])
        .ok_or(SequenceFileError::MissingColumn("distance"))?;
    let speed_idx = find_column_index(headers, &["speed"])
        .ok_or(SequenceFileError::MissingColumn("speed"))?;
    let angle_idx = find_column_index(headers, &["angle"])
        .ok_or(SequenceFileError::MissingColumn("angle"))?;
    let angle_speed_idx = find_column_index(headers, &["angle_speed", "anglespeed"])
        .ok_or(SequenceFileError::MissingColumn("angle_speed"))?;
    let pause_idx = find_column_index(headers, &["pause", "pause_ms"]);
    let simultaneous_idx = find_column_index(headers, &["simultaneous"]);

    let mut steps = Vec::new();
    let mut data_row = 0; // 1-based, excludes header

    for result in reader.records() {
        data_row += 1;

        let record =
            result.map_err(|e| SequenceFileError::Csv(format!("row {}: {}", data_row, e)))?;

        if data_row > max_rows {
            return Err(SequenceFileError::TooManyRows {
                max: max_rows,
                actual: data_row,
            });
        }

        let distance_mm = parse_f32(&record, distance_idx, "distance", data_row)?;
        let speed = parse_percent(&record, speed_idx, "speed", data_row)?;
        let angle = parse_i32(&record, angle_idx, "angle", data_row)?;
        let angle_speed = parse_percent(&record, angle_speed_idx, "angle_speed", data_row)?;
        let pause_ms = match pause_idx {
            Some(idx) => parse_u32(&record, idx, "pause", data_row)?,
            None => 0,
        };
        let simultaneous = match simultaneous_idx {
            Some(idx) => parse_flag(&record, idx, "simultaneous", data_row)?,
            None => false,
        };

        steps.push(MovementStep {
            distance_mm,
            speed,
            angle,
            angle_speed,
            pause_ms,
            simultaneous,
        });
    }

    if steps.is_empty() {
        return Err(SequenceFileError::Empty);
    }

    Ok(steps)
}

/// Find the index of a column matching one of the given names
/// (case-insensitive, trimmed).
fn find_column_index(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.trim();
        names.iter().any(|name| header.eq_ignore_ascii_case(name))
    })
}

fn field<'a>(
    record: &'a csv::StringRecord,
    idx: usize,
    column: &'static str,
    row: usize,
) -> Result<&'a str, SequenceFileError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or(SequenceFileError::BadValue {
            column,
            row,
            value: String::new(),
        })
}

fn parse_f32(
    record: &csv::StringRecord,
    idx: usize,
    column: &'static str,
    row: usize,
) -> Result<f32, SequenceFileError> {
    let value = field(record, idx, column, row)?;
    match value.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SequenceFileError::BadValue {
            column,
            row,
            value: value.to_string(),
        }),
    }
}

fn parse_i32(
    record: &csv::StringRecord,
    idx: usize,
    column: &'static str,
    row: usize,
) -> Result<i32, SequenceFileError> {
    let value = field(record, idx, column, row)?;
    value.parse::<i32>().map_err(|_| SequenceFileError::BadValue {
        column,
        row,
        value: value.to_string(),
    })
}

fn parse_u32(
    record: &csv::StringRecord,
    idx: usize,
    column: &'static str,
    row: usize,
) -> Result<u32, SequenceFileError> {
    let value = field(record, idx, column, row)?;
    value.parse::<u32>().map_err(|_| SequenceFileError::BadValue {
        column,
        row,
        value: value.to_string(),
    })
}

fn parse_percent(
    record: &csv::StringRecord,
    idx: usize,
    column: &'static str,
    row: usize,
) -> Result<u8, SequenceFileError> {
    let value = field(record, idx, column, row)?;
    match value.parse::<u8>() {
        Ok(v) if v <= 100 => Ok(v),
        _ => Err(SequenceFileError::BadValue {
            column,
            row,
            value: value.to_string(),
        }),
    }
}

fn parse_flag(
    record: &csv::StringRecord,
    idx: usize,
    column: &'static str,
    row: usize,
) -> Result<bool, SequenceFileError> {
    let value = field(record, idx, column, row)?;
    match value.to_ascii_lowercase().as_str() {
        "" | "false" | "0" => Ok(false),
        "true" | "1" => Ok(true),
        _ => Err(SequenceFileError::BadValue {
            column,
            row,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_csv(csv_data: &str, max_rows: usize) -> Result<Vec<MovementStep>, SequenceFileError> {
        load_sequence_from_csv_reader(Cursor::new(csv_data.as_bytes()), max_rows)
    }

    #[test]
    fn parses_full_header() {
        let csv = "distance,speed,angle,angle_speed,pause,simultaneous\n\
                   10.0,50,90,30,0,false\n\
                   -5.0,20,45,40,500,true";
        let steps = parse_csv(csv, 100).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].distance_mm, 10.0);
        assert_eq!(steps[0].pause_ms, 0);
        assert!(!steps[0].simultaneous);
        assert_eq!(steps[1].distance_mm, -5.0);
        assert_eq!(steps[1].pause_ms, 500);
        assert!(steps[1].simultaneous);
    }

    #[test]
    fn accepts_header_aliases_and_case() {
        let csv = "Distance_mm, Speed ,ANGLE,angleSpeed\n12.5,80,120,60";
        let steps = parse_csv(csv, 100).unwrap();
        assert_eq!(steps[0].distance_mm, 12.5);
        assert_eq!(steps[0].angle, 120);
        assert_eq!(steps[0].angle_speed, 60);
    }

    #[test]
    fn pause_and_simultaneous_are_optional() {
        let csv = "distance,speed,angle,angle_speed\n1.0,10,0,10";
        let steps = parse_csv(csv, 100).unwrap();
        assert_eq!(steps[0].pause_ms, 0);
        assert!(!steps[0].simultaneous);
    }

    #[test]
    fn numeric_flags_accepted() {
        let csv = "distance,speed,angle,angle_speed,simultaneous\n1.0,10,0,10,1";
        let steps = parse_csv(csv, 100).unwrap();
        assert!(steps[0].simultaneous);
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "distance,speed,angle\n1.0,10,0";
        assert!(matches!(
            parse_csv(csv, 100),
            Err(SequenceFileError::MissingColumn("angle_speed"))
        ));
    }

    #[test]
    fn bad_value_carries_row_and_column() {
        let csv = "distance,speed,angle,angle_speed\n1.0,10,0,10\n2.0,fast,0,10";
        match parse_csv(csv, 100) {
            Err(SequenceFileError::BadValue { column, row, value }) => {
                assert_eq!(column, "speed");
                assert_eq!(row, 2);
                assert_eq!(value, "fast");
            }
            other => panic!("expected BadValue, got {:?}", other),
        }
    }

    #[test]
    fn speed_over_100_rejected() {
        let csv = "distance,speed,angle,angle_speed\n1.0,150,0,10";
        assert!(matches!(
            parse_csv(csv, 100),
            Err(SequenceFileError::BadValue { column: "speed", .. })
        ));
    }

    #[test]
    fn bad_flag_rejected() {
        let csv = "distance,speed,angle,angle_speed,simultaneous\n1.0,10,0,10,maybe";
        assert!(matches!(
            parse_csv(csv, 100),
            Err(SequenceFileError::BadValue {
                column: "simultaneous",
                ..
            })
        ));
    }

    #[test]
    fn enforces_row_cap() {
        let csv = "distance,speed,angle,angle_speed\n1,1,1,1\n2,2,2,2\n3,3,3,3";
        match parse_csv(csv, 2) {
            Err(SequenceFileError::TooManyRows { max, actual }) => {
                assert_eq!(max, 2);
                assert_eq!(actual, 3);
            }
            other => panic!("expected TooManyRows, got {:?}", other),
        }
    }

    #[test]
    fn empty_file_is_an_error() {
        assert!(matches!(
            parse_csv("distance,speed,angle,angle_speed\n", 100),
            Err(SequenceFileError::Empty)
        ));
    }
}

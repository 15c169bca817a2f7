use log::{error, info, warn};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// table of parameter cases: case name -> (parameter name -> value)
pub type CaseMap = BTreeMap<String, HashMap<String, f64>>;

const PARAMETER_HEADERS: [&str; 3] = ["PARAMETERS", "CASES", "PARAMETER CASES"];

/// Parses a document for parameter cases.
///
/// Two layouts are accepted:
/// 1) a plain JSON object `{"case name": {"key": value, ...}, ...}`
/// 2) a text document where the JSON object sits under a "PARAMETERS" or "CASES" header line and
///    runs until the next header (a line of capitals and underscores) or the end of the file.
pub fn load_parameters_from_file(file_name: &str) -> Result<CaseMap, String> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(format!("File '{}' does not exist", file_name));
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return Err(format!("Failed to open file '{}': {}", file_name, e)),
    };

    let reader = BufReader::new(file);
    let lines: Vec<String> = reader.lines().map_while(Result::ok).collect();
    parse_parameter_lines(&lines, file_name)
}

/// same as [`load_parameters_from_file`] for a document already in memory
pub fn load_parameters_from_str(content: &str, source: &str) -> Result<CaseMap, String> {
    let lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
    parse_parameter_lines(&lines, source)
}

fn parse_parameter_lines(lines: &[String], source: &str) -> Result<CaseMap, String> {
    // Find the header, if any
    let mut start_index = None;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim().to_uppercase();
        if PARAMETER_HEADERS.contains(&trimmed.as_str()) {
            start_index = Some(i + 1);
            break;
        }
    }

    let start_index = match start_index {
        Some(index) => index,
        None => {
            let first = lines.iter().find(|l| !l.trim().is_empty());
            match first {
                Some(line) if line.trim_start().starts_with('{') => 0,
                _ => {
                    return Err(format!(
                        "No 'PARAMETERS' or 'CASES' header found in '{}'",
                        source
                    ));
                }
            }
        }
    };

    // Find the end index (next header or end of file)
    let mut end_index = lines.len();
    for (i, line) in lines.iter().enumerate().skip(start_index) {
        let trimmed = line.trim();
        if !trimmed.is_empty()
            && trimmed.chars().any(|c| c.is_alphabetic())
            && trimmed.chars().all(|c| c.is_uppercase() || c == '_' || c == ' ')
        {
            end_index = i;
            break;
        }
    }

    let section = lines[start_index..end_index].join("\n");
    let result: Result<CaseMap, serde_json::Error> = serde_json::from_str(&section);

    match result {
        Ok(data) => {
            if data.is_empty() {
                warn!("No parameter cases found in '{}'", source);
            }
            info!(
                "Successfully parsed {} parameter case(s) from '{}'",
                data.len(),
                source
            );
            Ok(data)
        }
        Err(e) => {
            let error_line = e.line();
            let error_column = e.column();

            // Calculate the actual line number in the file
            let actual_line = start_index + error_line.max(1) - 1;

            let error_msg = format!(
                "Error parsing parameter cases at line {}, column {} (line {} in '{}'): {}",
                error_line,
                error_column,
                actual_line + 1,
                source,
                e
            );
            error!("{}", error_msg);

            if actual_line < lines.len() {
                let problem_line = &lines[actual_line];
                error!("Problematic line: {}", problem_line);

                if error_column >= 1 && error_column <= problem_line.len() {
                    let pointer = " ".repeat(error_column - 1) + "^";
                    error!("{}", pointer);
                }
            }

            Err(error_msg)
        }
    }
}

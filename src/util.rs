//! Helpers for loading candidates.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};

/// Reads a file into a vector of lines
pub fn read_file_lines(filename: &str) -> std::result::Result<Vec<String>, std::io::Error> {
    let file = File::open(filename)?;
    read_lines(file)
}

/// Reads candidates from a reader, one per line
///
/// Trailing `\r` are stripped and empty lines are skipped.
pub fn read_lines<R: Read>(source: R) -> std::result::Result<Vec<String>, std::io::Error> {
    BufReader::new(source)
        .lines()
        .filter_map(|line| match line {
            Ok(l) => {
                let l = l.strip_suffix('\r').map(str::to_string).unwrap_or(l);
                (!l.is_empty()).then_some(Ok(l))
            }
            Err(e) => Some(Err(e)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_non_empty_lines() {
        let lines = read_lines(Cursor::new("Apple\r\n\nBanana\nApricot")).unwrap();
        assert_eq!(lines, vec!["Apple", "Banana", "Apricot"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_file_lines("/this/file/does/not/exist").is_err());
    }
}

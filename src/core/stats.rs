/// Protein and interaction counting for PPI datasets
///
/// A PPI file holds one interaction per line. The first two whitespace-separated
/// tokens of a line are the interacting proteins; any further columns are ignored.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

/// Errors raised while counting a PPI file
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// The file could not be opened or read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line carried a single protein identifier
    #[error("{}:{line}: expected two protein identifiers, found one", .path.display())]
    MalformedLine { path: PathBuf, line: usize },
}

/// Summary counts for one PPI dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PpiStats {
    /// Number of distinct protein identifiers
    pub proteins: usize,
    /// Number of interaction lines
    pub interactions: usize,
}

/// Shape of a single input line
enum Partners<'a> {
    Pair(&'a str, &'a str),
    Blank,
    /// Only one identifier present
    Malformed,
}

fn partners(line: &str) -> Partners<'_> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (None, _) => Partners::Blank,
        (Some(first), Some(second)) => Partners::Pair(first, second),
        (Some(_), None) => Partners::Malformed,
    }
}

/// Count proteins and interactions from a buffered reader.
///
/// # Arguments
///
/// * `reader` - Source of PPI lines
/// * `source` - Path reported in errors and log messages
/// * `lenient` - Skip single-token lines with a warning instead of failing
///
/// # Returns
///
/// The counts for the whole input
pub fn stats_from_reader<R: BufRead>(
    reader: R,
    source: &Path,
    lenient: bool,
) -> Result<PpiStats, StatsError> {
    let mut proteins: HashSet<String> = HashSet::new();
    let mut interactions = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| StatsError::Io {
            path: source.to_path_buf(),
            source: e,
        })?;

        match partners(&line) {
            Partners::Pair(first, second) => {
                // Avoid allocating for proteins we have already seen
                if !proteins.contains(first) {
                    proteins.insert(first.to_string());
                }
                if !proteins.contains(second) {
                    proteins.insert(second.to_string());
                }
                interactions += 1;
            }
            Partners::Blank => continue,
            Partners::Malformed if lenient => {
                warn!(
                    "Skipping {}:{}: expected two protein identifiers",
                    source.display(),
                    index + 1
                );
            }
            Partners::Malformed => {
                return Err(StatsError::MalformedLine {
                    path: source.to_path_buf(),
                    line: index + 1,
                });
            }
        }
    }

    debug!(
        "{}: {} proteins, {} interactions",
        source.display(),
        proteins.len(),
        interactions
    );

    Ok(PpiStats {
        proteins: proteins.len(),
        interactions,
    })
}

/// Count proteins and interactions in a PPI file
pub fn file_stats(path: &Path, lenient: bool) -> Result<PpiStats, StatsError> {
    info!("Counting interactions in {}", path.display());

    let file = File::open(path).map_err(|e| StatsError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    stats_from_reader(BufReader::new(file), path, lenient)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(input: &str, lenient: bool) -> Result<PpiStats, StatsError> {
        stats_from_reader(input.as_bytes(), Path::new("test.txt"), lenient)
    }

    #[test]
    fn test_distinct_pairs() {
        let stats = count("P1 P2\nP3 P4\nP1 P3\n", false).unwrap();
        assert_eq!(stats.interactions, 3);
        assert_eq!(stats.proteins, 4);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let stats = count("P1\tP2\t0.93\tyeast\nP2  P5 1\n", false).unwrap();
        assert_eq!(stats, PpiStats { proteins: 3, interactions: 2 });
    }

    #[test]
    fn test_duplicates_and_self_interactions() {
        let stats = count("A B\nA B\nC C\n", false).unwrap();
        assert_eq!(stats.interactions, 3);
        assert_eq!(stats.proteins, 3);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let stats = count("\nA B\n   \n\t\nB C", false).unwrap();
        assert_eq!(stats, PpiStats { proteins: 3, interactions: 2 });
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(count("", false).unwrap(), PpiStats::default());
    }

    #[test]
    fn test_single_token_line() {
        match count("A B\nC\nD E\n", false) {
            Err(StatsError::MalformedLine { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed line error, got {:?}", other),
        }

        let stats = count("A B\nC\nD E\n", true).unwrap();
        assert_eq!(stats, PpiStats { proteins: 4, interactions: 2 });
    }

    #[test]
    fn test_invalid_utf8() {
        let input: &[u8] = b"A B\n\xff\xfe C\n";
        match stats_from_reader(input, Path::new("bad.txt"), true) {
            Err(StatsError::Io { source, .. }) => {
                assert_eq!(source.kind(), io::ErrorKind::InvalidData)
            }
            other => panic!("expected I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = file_stats(Path::new("does/not/exist.txt"), false).unwrap_err();
        assert!(matches!(err, StatsError::Io { .. }));
        assert!(err.to_string().contains("exist.txt"));
    }
}

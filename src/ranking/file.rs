//! Plain-text ranking files
//!
//! One team per line: `<rank>. <team name> (<rating>)`. Readers recover the
//! name by dropping the first and last whitespace-separated tokens, so any
//! single-token annotation works in place of the rating.

use crate::error::{RatingError, Result};
use crate::ranking::{RankedTeam, Ranking};
use crate::types::Division;
use anyhow::Context;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Write `ranking` in the ranking file format
pub fn write_ranking<W: Write>(ranking: &Ranking, mut writer: W) -> Result<()> {
    for entry in ranking.iter() {
        writeln!(writer, "{}. {} ({:.4})", entry.rank, entry.name, entry.rating)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_ranking_file(ranking: &Ranking, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create ranking file {}", path.display()))?;
    write_ranking(ranking, std::io::BufWriter::new(file))
}

/// Read a ranking; line order defines rank
///
/// Blank lines are skipped. Lines with fewer than three tokens are
/// rejected. A `(<number>)` annotation is kept as the rating, anything else
/// reads as 0.
pub fn read_ranking<R: BufRead>(reader: R) -> Result<Ranking> {
    let mut entries = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(RatingError::MalformedRankingLine {
                line_number: i + 1,
                line,
            }
            .into());
        }

        let annotation = tokens[tokens.len() - 1];
        let rating = annotation
            .trim_start_matches('(')
            .trim_end_matches(')')
            .parse::<f64>()
            .unwrap_or(0.0);

        entries.push(RankedTeam {
            rank: 0,
            name: tokens[1..tokens.len() - 1].join(" "),
            conference: String::new(),
            division: Division::default(),
            rating,
            wins: 0,
            losses: 0,
        });
    }

    Ok(Ranking::from_entries(entries))
}

pub fn read_ranking_file(path: &Path) -> Result<Ranking> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open ranking file {}", path.display()))?;
    read_ranking(BufReader::new(file))
        .with_context(|| format!("Failed to read ranking file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_strips_rank_and_annotation() {
        let text = "1. Ohio State (31.25)\n2. Texas A&M (28.0)\n\n3. San Jose State *\n";
        let ranking = read_ranking(text.as_bytes()).unwrap();

        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking.entries()[0].name, "Ohio State");
        assert_eq!(ranking.entries()[0].rating, 31.25);
        assert_eq!(ranking.rank_of("Texas A&M"), Some(2));
        assert_eq!(ranking.entries()[2].name, "San Jose State");
        assert_eq!(ranking.entries()[2].rating, 0.0);
    }

    #[test]
    fn test_short_line_is_malformed() {
        let err = read_ranking("1. Ohio State (3.0)\n2. Texas\n".as_bytes()).unwrap_err();
        match err.downcast_ref::<RatingError>() {
            Some(RatingError::MalformedRankingLine { line_number, line }) => {
                assert_eq!(*line_number, 2);
                assert_eq!(line, "2. Texas");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_write_then_read_preserves_names() {
        let ranking = Ranking::from_entries(
            ["Miami (OH)", "Notre Dame", "Texas"]
                .into_iter()
                .enumerate()
                .map(|(i, name)| RankedTeam {
                    rank: 0,
                    name: name.to_string(),
                    conference: String::new(),
                    division: Division::Fbs,
                    rating: 10.0 - i as f64,
                    wins: 0,
                    losses: 0,
                })
                .collect(),
        );

        let mut buffer = Vec::new();
        write_ranking(&ranking, &mut buffer).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("1. Miami (OH) (10.0000)\n"));

        let back = read_ranking(buffer.as_slice()).unwrap();
        let names: Vec<&str> = back.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Miami (OH)", "Notre Dame", "Texas"]);
        assert_eq!(back.entries()[2].rating, 8.0);
    }
}

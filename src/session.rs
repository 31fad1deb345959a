//! Line-oriented query loop over a loaded [`Predictor`].
//!
//! Each input line is one query. Tags are lowercased before parsing, a query
//! with no usable tags is reported and skipped, and a blank line or end of
//! input ends the session.

use std::io::{BufRead, Write};

use crate::error::PredictError;
use crate::predict::Predictor;
use crate::report::{Report, ReportFormat};
use crate::types::parse_tags;

pub const PROMPT: &str = "Enter tags > ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub answered: usize,
    pub rejected: usize,
}

/// Answer queries from `input` until a blank line or EOF.
///
/// Reports go to `out`; the prompt and per-query errors go to `err`.
pub fn run_session<R, W, E>(
    predictor: &Predictor,
    mut input: R,
    mut out: W,
    mut err: E,
    tag_delimiter: char,
    format: ReportFormat,
) -> anyhow::Result<SessionStats>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut stats = SessionStats::default();
    let mut line = String::new();
    loop {
        write!(err, "{PROMPT}")?;
        err.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let raw = line.trim().to_lowercase();
        if raw.is_empty() {
            break;
        }

        let query = parse_tags(&raw, tag_delimiter);
        match predictor.predict(&query) {
            Ok(outcome) => {
                let rendered = Report::from(&outcome).render(format)?;
                out.write_all(rendered.as_bytes())?;
                writeln!(out)?;
                out.flush()?;
                stats.answered += 1;
            }
            Err(PredictError::InvalidArgument(msg)) => {
                tracing::debug!(query = %raw, %msg, "query rejected");
                writeln!(err, "error: {msg}")?;
                stats.rejected += 1;
            }
            Err(other) => return Err(other.into()),
        }
    }
    tracing::info!(
        answered = stats.answered,
        rejected = stats.rejected,
        "session finished"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::{run_session, SessionStats};
    use crate::dataset::Dataset;
    use crate::options::PredictOptions;
    use crate::predict::Predictor;
    use crate::report::ReportFormat;
    use crate::types::Record;

    fn predictor() -> Predictor {
        let dataset = Dataset::from_records(vec![
            Record::new("A", ["cat", "dance"], 100, 10, 1),
            Record::new("B", ["cat"], 200, 20, 2),
            Record::new("C", ["dog"], 50, 5, 0),
        ])
        .unwrap();
        let options = PredictOptions {
            k: 2,
            ..Default::default()
        };
        Predictor::new(dataset, options).unwrap()
    }

    fn run(input: &str) -> (SessionStats, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let stats = run_session(
            &predictor(),
            input.as_bytes(),
            &mut out,
            &mut err,
            ';',
            ReportFormat::Text,
        )
        .unwrap();
        (
            stats,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn answers_each_line_until_blank() {
        let (stats, out, _) = run("CAT\ndog;Dance\n\ncat\n");
        assert_eq!((stats.answered, stats.rejected), (2, 0));
        assert_eq!(out.matches("Predicted").count(), 2);
        assert!(out.contains("Views:150 Likes:15 Comments:1"), "out={out}");
    }

    #[test]
    fn rejected_query_does_not_end_session() {
        let (stats, out, err) = run(";;;\ncat\n");
        assert_eq!((stats.answered, stats.rejected), (1, 1));
        assert!(err.contains("at least one tag"), "err={err}");
        assert_eq!(out.matches("Predicted").count(), 1);
    }

    #[test]
    fn eof_ends_session() {
        let (stats, out, err) = run("cat");
        assert_eq!(stats.answered, 1);
        assert!(out.contains("id=B"), "out={out}");
        assert_eq!(err.matches("Enter tags > ").count(), 2);

        let (stats, out, _) = run("");
        assert_eq!(stats, SessionStats::default());
        assert!(out.is_empty());
    }
}

use crate::config::ErrorPolicy;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Query identifier as found in the queries file
pub type QueryId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub id: QueryId,
    pub text: String,
}

/// Read a tab-separated queries file
pub fn read_queries(path: &Path, policy: ErrorPolicy) -> Result<Vec<QueryRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open queries file {}", path.display()))?;
    parse_queries(BufReader::new(file), policy)
        .with_context(|| format!("Invalid queries file {}", path.display()))
}

/// Parse `<QueryId>\t<query string>` lines; blank lines are skipped.
///
/// A line without a tab or with a non-numeric id is an error under
/// [`ErrorPolicy::Abort`] and is logged and dropped under [`ErrorPolicy::Skip`].
pub fn parse_queries<R: BufRead>(reader: R, policy: ErrorPolicy) -> Result<Vec<QueryRecord>> {
    let mut queries = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(line, line_no) {
            Ok(record) => queries.push(record),
            Err(e) if policy == ErrorPolicy::Skip => {
                log::warn!("skipping queries file {:#}", e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(queries)
}

fn parse_line(line: &str, line_no: usize) -> Result<QueryRecord> {
    let Some((id, text)) = line.split_once('\t') else {
        bail!("line {}: expected <id>\\t<query>", line_no);
    };
    let id = id
        .trim()
        .parse()
        .with_context(|| format!("line {}: invalid query id {:?}", line_no, id))?;

    Ok(QueryRecord {
        id,
        text: text.to_string(),
    })
}

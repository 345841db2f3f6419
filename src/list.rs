use std::io::{self, Write};

use crate::summary::IssueSummary;
use crate::types::Issue;
use crate::util::{expand_emoji, format_date};

/// Write the filtered issues as plain text, one per line, followed by the
/// summary.
pub fn write_listing<W: Write>(
    out: &mut W,
    issues: &[&Issue],
    summary: &IssueSummary,
    date_format: &str,
) -> io::Result<()> {
    for issue in issues {
        let repo = issue
            .repo
            .as_ref()
            .map_or_else(|| "-".to_owned(), crate::types::RepoRef::full_name);
        let labels = issue.label_names().collect::<Vec<_>>().join(", ");
        let updated = format_date(issue.updated_at.as_ref(), date_format);
        writeln!(
            out,
            "#{:<6} {repo:<32} [{labels}] {} {updated}",
            issue.number,
            expand_emoji(&issue.title),
        )?;
    }
    writeln!(out, "{}", summary.headline())?;
    for (repo, count) in &summary.repos {
        writeln!(out, "  {count:>4}  {repo}")?;
    }
    Ok(())
}

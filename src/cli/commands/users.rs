//! Users Command
//!
//! List the users available for audit.

use serde::Serialize;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, ConfigOverrides, OutputFormat};
use crate::storage::Dataset;
use crate::types::{AccountType, Result};

#[derive(Debug, Serialize)]
struct UserRow<'a> {
    user_id: &'a str,
    age: i32,
    account_type: &'a AccountType,
    posts: usize,
    interactions: usize,
}

fn rows(dataset: &Dataset) -> Vec<UserRow<'_>> {
    dataset
        .users()
        .iter()
        .map(|u| UserRow {
            user_id: &u.user_id,
            age: u.age,
            account_type: &u.account_type,
            posts: dataset.posts_for(&u.user_id).len(),
            interactions: dataset.interactions_for(&u.user_id).len(),
        })
        .collect()
}

pub fn run(overrides: &ConfigOverrides, format: OutputFormat) -> Result<()> {
    let ctx = CommandContext::load(overrides)?;
    let dataset = Dataset::load(&ctx.config.data.dir)?;
    let rows = rows(&dataset);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let out = Output::new();
    out.header(&format!("Users ({})", rows.len()));
    println!(
        "  {:<16} {:>4}  {:<10} {:>6} {:>6}",
        "USER", "AGE", "ACCOUNT", "POSTS", "DMS"
    );
    for row in &rows {
        println!(
            "  {:<16} {:>4}  {:<10} {:>6} {:>6}",
            row.user_id,
            row.age,
            row.account_type.to_string(),
            row.posts,
            row.interactions
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::profile::fixtures::{dm, post, user};

    #[test]
    fn test_rows_count_activity() {
        let dataset = Dataset::from_records(
            vec![user("a", 30), user("b", 15)],
            vec![post("p1", "b", "x"), post("p2", "b", "y")],
            vec![dm("i1", "a", "b", "hi")],
        );
        let rows = rows(&dataset);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].posts, rows[0].interactions), (0, 1));
        assert_eq!((rows[1].posts, rows[1].interactions), (2, 1));
    }
}

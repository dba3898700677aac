//! Catalog seeding from a JSON array of achievement definitions.

use std::path::Path;

use aarambh_core::{
  achievement::{MAX_POINTS, NewAchievement},
  store::PlatformStore,
};
use anyhow::Context as _;

pub fn parse_catalog(json: &str) -> anyhow::Result<Vec<NewAchievement>> {
  let entries: Vec<NewAchievement> =
    serde_json::from_str(json).context("catalog must be a JSON array of achievements")?;
  for entry in &entries {
    if entry.title.trim().is_empty() || entry.category.trim().is_empty() {
      anyhow::bail!("catalog entries need a title and a category");
    }
    if entry.required_points < 0 || entry.points < 0 {
      anyhow::bail!("catalog entry {:?} has negative points", entry.title);
    }
    if entry.points > MAX_POINTS {
      anyhow::bail!(
        "catalog entry {:?} rewards {} points, more than {MAX_POINTS}",
        entry.title,
        entry.points
      );
    }
  }
  Ok(entries)
}

/// Insert every entry of the catalog at `path`. Entries whose title already
/// exists are left untouched, so seeding twice is harmless.
pub async fn seed_from_file<S>(store: &S, path: &Path) -> anyhow::Result<usize>
where
  S: PlatformStore,
{
  let raw = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read catalog {}", path.display()))?;
  let entries = parse_catalog(&raw)
    .with_context(|| format!("invalid catalog {}", path.display()))?;
  seed(store, entries).await
}

pub async fn seed<S>(store: &S, entries: Vec<NewAchievement>) -> anyhow::Result<usize>
where
  S: PlatformStore,
{
  let count = entries.len();
  for entry in entries {
    let title = entry.title.clone();
    store
      .add_achievement(entry)
      .await
      .with_context(|| format!("failed to seed achievement {title:?}"))?;
  }
  Ok(count)
}

#[cfg(test)]
mod tests {
  use aarambh_store_sqlite::SqliteStore;

  use super::*;

  const CATALOG: &str = r#"[
    { "title": "First Steps", "category": "learning", "required_points": 1, "points": 5 },
    { "title": "Quiz Whiz", "description": "Ten quizzes", "icon": "brain",
      "category": "quiz", "required_points": 10, "points": 20 }
  ]"#;

  #[test]
  fn parses_with_optional_fields() {
    let entries = parse_catalog(CATALOG).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].description, "");
    assert_eq!(entries[1].icon.as_deref(), Some("brain"));
  }

  #[test]
  fn rejects_bad_entries() {
    assert!(parse_catalog("{}").is_err());
    assert!(
      parse_catalog(r#"[{ "title": "", "category": "x", "required_points": 1, "points": 1 }]"#)
        .is_err()
    );
    assert!(
      parse_catalog(r#"[{ "title": "t", "category": "x", "required_points": -1, "points": 1 }]"#)
        .is_err()
    );
  }

  #[test]
  fn rejects_rewards_that_could_overflow_totals() {
    let at_limit = format!(
      r#"[{{ "title": "t", "category": "x", "required_points": 1, "points": {MAX_POINTS} }}]"#
    );
    assert!(parse_catalog(&at_limit).is_ok());

    let err = parse_catalog(
      r#"[{ "title": "Huge", "category": "x", "required_points": 1, "points": 9223372036854775807 }]"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("Huge"), "{err}");
  }

  #[tokio::test]
  async fn seeding_twice_keeps_one_copy() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    seed(&store, parse_catalog(CATALOG).unwrap()).await.unwrap();
    seed(&store, parse_catalog(CATALOG).unwrap()).await.unwrap();
    assert_eq!(store.list_achievements().await.unwrap().len(), 2);
  }
}

use super::{
    clock::timestamp,
    db::Storage,
    models::{Note, NoteCreate, NoteUpdate},
};
use anyhow::{anyhow, Result};
use mockable::Clock;
use sqlx::{query, query_as, Connection};
use std::sync::Arc;
use tracing::debug;

/// All access to the `notes` table goes through here. Each method opens its
/// own connection, and nothing is held between calls; concurrent writers
/// are sequenced by SQLite alone, so the last write wins.
#[derive(Clone)]
pub struct Notes {
    storage: Storage,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl Notes {
    pub fn new(
        storage: Storage,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self { storage, clock }
    }

    /// Most recently updated first; among equal timestamps, the newer id
    /// wins.
    pub async fn list_all(&self) -> Result<Vec<Note>> {
        let mut conn = self.storage.open().await?;
        let notes = query_as::<_, Note>(
            "select id, title, content, created_at, updated_at
            from notes
            order by updated_at desc, id desc",
        )
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;

        debug!(count = notes.len(), "listed notes");
        Ok(notes)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Note>> {
        let mut conn = self.storage.open().await?;
        let note = query_as::<_, Note>(
            "select id, title, content, created_at, updated_at
            from notes
            where id = ?",
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await?;

        Ok(note)
    }

    /// The returned note is read back from the database after the insert,
    /// so it is exactly what was persisted.
    pub async fn create(&self, payload: &NoteCreate) -> Result<Note> {
        let now = timestamp(self.clock.as_ref());
        let mut conn = self.storage.open().await?;
        let id = query(
            "insert into notes (title, content, created_at, updated_at)
            values (?, ?, ?, ?)",
        )
        .bind(&payload.title)
        .bind(&payload.content)
        .bind(&now)
        .bind(&now)
        .execute(&mut conn)
        .await?
        .last_insert_rowid();
        conn.close().await?;

        debug!(id, "created note");
        self.get(id)
            .await?
            .ok_or_else(|| anyhow!("note {id} missing right after insert"))
    }

    /// `Ok(None)` if there is no such note; nothing gets created in that
    /// case. Fields left out of `payload` keep their stored value, and
    /// `updated_at` moves forward either way.
    pub async fn update(
        &self,
        id: i64,
        payload: &NoteUpdate,
    ) -> Result<Option<Note>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let title = payload.title.as_ref().unwrap_or(&existing.title);
        let content = payload.content.as_ref().unwrap_or(&existing.content);
        let now = timestamp(self.clock.as_ref());

        let mut conn = self.storage.open().await?;
        query(
            "update notes
            set title = ?, content = ?, updated_at = ?
            where id = ?",
        )
        .bind(title)
        .bind(content)
        .bind(&now)
        .bind(id)
        .execute(&mut conn)
        .await?;
        conn.close().await?;

        debug!(id, "updated note");
        match self.get(id).await? {
            Some(note) => Ok(Some(note)),
            None => Err(anyhow!("note {id} missing right after update")),
        }
    }

    /// Returns whether a row was actually removed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut conn = self.storage.open().await?;
        let removed = query("delete from notes where id = ?")
            .bind(id)
            .execute(&mut conn)
            .await?
            .rows_affected();
        conn.close().await?;

        debug!(id, removed, "deleted note");
        Ok(removed > 0)
    }
}


#[cfg(test)]
mod tests {
    use super::{test_utils::notes_with_clock, *};
    use chrono::Duration;

    fn create(title: &str, content: &str) -> NoteCreate {
        NoteCreate {
            title: title.into(),
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let (notes, _, _dir) = notes_with_clock().await;
        assert!(notes.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_sets_both_timestamps() {
        let (notes, _, _dir) = notes_with_clock().await;
        let note = notes.create(&create("A", "x")).await.unwrap();

        assert_eq!(note.id, 1);
        assert_eq!(note.title, "A");
        assert_eq!(note.content, "x");
        assert_eq!(note.created_at, "2024-01-02T03:04:05+00:00");
        assert_eq!(note.created_at, note.updated_at);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let (notes, _, _dir) = notes_with_clock().await;
        let created = notes.create(&create("title", "")).await.unwrap();
        let fetched = notes.get(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (notes, _, _dir) = notes_with_clock().await;
        assert_eq!(notes.get(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_title_only_keeps_content() {
        let (notes, clock, _dir) = notes_with_clock().await;
        let before = notes.create(&create("A", "x")).await.unwrap();
        clock.advance(Duration::seconds(5));

        let after = notes
            .update(
                before.id,
                &NoteUpdate {
                    title: Some("B".into()),
                    content: None,
                },
            )
            .await
            .unwrap()
            .expect("note exists");

        assert_eq!(after.title, "B");
        assert_eq!(after.content, "x");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_update_can_clear_content() {
        let (notes, _, _dir) = notes_with_clock().await;
        let note = notes.create(&create("A", "x")).await.unwrap();
        let updated = notes
            .update(
                note.id,
                &NoteUpdate {
                    title: None,
                    content: Some(String::new()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "A");
        assert_eq!(updated.content, "");
    }

    #[tokio::test]
    async fn test_empty_update_still_touches_updated_at() {
        let (notes, clock, _dir) = notes_with_clock().await;
        let note = notes.create(&create("A", "x")).await.unwrap();
        clock.advance(Duration::seconds(1));

        let updated = notes
            .update(note.id, &NoteUpdate::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, note.title);
        assert_eq!(updated.content, note.content);
        assert!(updated.updated_at > note.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_creates_nothing() {
        let (notes, _, _dir) = notes_with_clock().await;
        let res = notes
            .update(
                3,
                &NoteUpdate {
                    title: Some("ghost".into()),
                    content: Some("boo".into()),
                },
            )
            .await
            .unwrap();
        assert!(res.is_none());
        assert!(notes.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let (notes, _, _dir) = notes_with_clock().await;
        let note = notes.create(&create("A", "x")).await.unwrap();

        assert!(!notes.delete(note.id + 1).await.unwrap());
        assert!(notes.delete(note.id).await.unwrap());
        assert_eq!(notes.get(note.id).await.unwrap(), None);
        assert!(!notes.delete(note.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let (notes, _, _dir) = notes_with_clock().await;
        let first = notes.create(&create("A", "")).await.unwrap();
        notes.delete(first.id).await.unwrap();
        let second = notes.create(&create("B", "")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_list_order() {
        let (notes, clock, _dir) = notes_with_clock().await;
        let a = notes.create(&create("a", "")).await.unwrap();
        let b = notes.create(&create("b", "")).await.unwrap();
        clock.advance(Duration::seconds(1));
        let c = notes.create(&create("c", "")).await.unwrap();
        clock.advance(Duration::seconds(1));
        notes
            .update(a.id, &NoteUpdate::default())
            .await
            .unwrap()
            .unwrap();

        let ids: Vec<i64> = notes
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        // a was touched last, c is newer than b
        assert_eq!(ids, vec![a.id, c.id, b.id]);
    }

    #[tokio::test]
    async fn test_list_ties_break_on_id() {
        let (notes, _, _dir) = notes_with_clock().await;
        for title in ["a", "b", "c"] {
            notes.create(&create(title, "")).await.unwrap();
        }
        let ids: Vec<i64> = notes
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_snapshots_are_detached() {
        let (notes, _, _dir) = notes_with_clock().await;
        let mut note = notes.create(&create("A", "x")).await.unwrap();
        note.title = "changed locally".into();
        let stored = notes.get(note.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "A");
    }
}

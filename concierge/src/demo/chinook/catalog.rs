//! Music catalog tools over the Chinook database.

use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use serde_json::{json, Value};

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError, ToolSpec};
use crate::tools::{required_str, AggregateToolSource, Tool};

use super::db::ChinookDb;
use super::{rows_content, spec};

pub const TOOL_ALBUMS_BY_ARTIST: &str = "get_albums_by_artist";
pub const TOOL_TRACKS_BY_ARTIST: &str = "get_tracks_by_artist";
pub const TOOL_SONGS_BY_GENRE: &str = "get_songs_by_genre";
pub const TOOL_CHECK_FOR_SONGS: &str = "check_for_songs";

/// Maximum artists sampled by `get_songs_by_genre`.
pub const GENRE_SAMPLE_LIMIT: i64 = 8;

fn like(term: &str) -> SqlValue {
    SqlValue::Text(format!("%{}%", term.trim()))
}

/// Albums whose artist name contains `artist`.
pub struct AlbumsByArtistTool {
    db: ChinookDb,
}

impl AlbumsByArtistTool {
    pub fn new(db: ChinookDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for AlbumsByArtistTool {
    fn name(&self) -> &str {
        TOOL_ALBUMS_BY_ARTIST
    }

    fn spec(&self) -> ToolSpec {
        spec(
            TOOL_ALBUMS_BY_ARTIST,
            "Get albums by an artist (partial names match).",
            json!({
                "type": "object",
                "properties": {"artist": {"type": "string"}},
                "required": ["artist"]
            }),
        )
    }

    async fn call(
        &self,
        args: Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let artist = required_str(&args, "artist")?;
        let rows = self
            .db
            .query(
                "SELECT Album.Title, Artist.Name \
                 FROM Album JOIN Artist ON Album.ArtistId = Artist.ArtistId \
                 WHERE Artist.Name LIKE ?1 \
                 ORDER BY Artist.Name, Album.Title",
                vec![like(artist)],
            )
            .await
            .map_err(|e| ToolSourceError::Execution(e.to_string()))?;
        Ok(rows_content(
            rows,
            &format!("No albums found for artist '{}'.", artist),
        ))
    }
}

/// Tracks whose artist name contains `artist`.
pub struct TracksByArtistTool {
    db: ChinookDb,
}

impl TracksByArtistTool {
    pub fn new(db: ChinookDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for TracksByArtistTool {
    fn name(&self) -> &str {
        TOOL_TRACKS_BY_ARTIST
    }

    fn spec(&self) -> ToolSpec {
        spec(
            TOOL_TRACKS_BY_ARTIST,
            "Get songs by an artist (or similar artists).",
            json!({
                "type": "object",
                "properties": {"artist": {"type": "string"}},
                "required": ["artist"]
            }),
        )
    }

    async fn call(
        &self,
        args: Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let artist = required_str(&args, "artist")?;
        let rows = self
            .db
            .query(
                "SELECT Track.Name AS SongName, Artist.Name AS ArtistName \
                 FROM Album \
                 LEFT JOIN Artist ON Album.ArtistId = Artist.ArtistId \
                 LEFT JOIN Track ON Track.AlbumId = Album.AlbumId \
                 WHERE Artist.Name LIKE ?1 \
                 ORDER BY Artist.Name, Track.Name",
                vec![like(artist)],
            )
            .await
            .map_err(|e| ToolSourceError::Execution(e.to_string()))?;
        Ok(rows_content(
            rows,
            &format!("No tracks found for artist '{}'.", artist),
        ))
    }
}

/// One sample song per artist for a genre.
pub struct SongsByGenreTool {
    db: ChinookDb,
}

impl SongsByGenreTool {
    pub fn new(db: ChinookDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for SongsByGenreTool {
    fn name(&self) -> &str {
        TOOL_SONGS_BY_GENRE
    }

    fn spec(&self) -> ToolSpec {
        spec(
            TOOL_SONGS_BY_GENRE,
            "Fetch songs from the database that match a specific genre.",
            json!({
                "type": "object",
                "properties": {"genre": {"type": "string"}},
                "required": ["genre"]
            }),
        )
    }

    async fn call(
        &self,
        args: Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let genre = required_str(&args, "genre")?;
        let rows = self
            .db
            .query(
                "SELECT Track.Name AS SongName, Artist.Name AS ArtistName \
                 FROM Track \
                 JOIN Genre ON Track.GenreId = Genre.GenreId \
                 LEFT JOIN Album ON Track.AlbumId = Album.AlbumId \
                 LEFT JOIN Artist ON Album.ArtistId = Artist.ArtistId \
                 WHERE Genre.Name LIKE ?1 \
                 GROUP BY Artist.Name \
                 ORDER BY Artist.Name \
                 LIMIT ?2",
                vec![like(genre), SqlValue::Integer(GENRE_SAMPLE_LIMIT)],
            )
            .await
            .map_err(|e| ToolSourceError::Execution(e.to_string()))?;
        Ok(rows_content(
            rows,
            &format!("No songs found for the genre: {}", genre),
        ))
    }
}

/// Tracks whose title contains `song_title`.
pub struct CheckForSongsTool {
    db: ChinookDb,
}

impl CheckForSongsTool {
    pub fn new(db: ChinookDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for CheckForSongsTool {
    fn name(&self) -> &str {
        TOOL_CHECK_FOR_SONGS
    }

    fn spec(&self) -> ToolSpec {
        spec(
            TOOL_CHECK_FOR_SONGS,
            "Check if a song exists by its name.",
            json!({
                "type": "object",
                "properties": {"song_title": {"type": "string"}},
                "required": ["song_title"]
            }),
        )
    }

    async fn call(
        &self,
        args: Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let title = required_str(&args, "song_title")?;
        let rows = self
            .db
            .query(
                "SELECT Track.Name AS SongName, Album.Title AS AlbumTitle \
                 FROM Track LEFT JOIN Album ON Track.AlbumId = Album.AlbumId \
                 WHERE Track.Name LIKE ?1 \
                 ORDER BY Track.Name",
                vec![like(title)],
            )
            .await
            .map_err(|e| ToolSourceError::Execution(e.to_string()))?;
        Ok(rows_content(
            rows,
            &format!("No songs found matching '{}'.", title),
        ))
    }
}

/// Tool source with the four catalog tools.
pub fn catalog_tools(db: &ChinookDb) -> AggregateToolSource {
    AggregateToolSource::new()
        .with_tool(Box::new(AlbumsByArtistTool::new(db.clone())))
        .with_tool(Box::new(TracksByArtistTool::new(db.clone())))
        .with_tool(Box::new(SongsByGenreTool::new(db.clone())))
        .with_tool(Box::new(CheckForSongsTool::new(db.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::chinook::fixture_db;

    #[tokio::test]
    async fn albums_by_artist_matches_partial_name() {
        let tool = AlbumsByArtistTool::new(fixture_db());
        let out = tool.call(json!({"artist": "ac/dc"}), None).await.unwrap();
        assert!(out.text.contains("For Those About To Rock"), "{}", out.text);
        assert!(!out.text.contains("Jagged Little Pill"), "{}", out.text);
    }

    #[tokio::test]
    async fn songs_by_genre_samples_one_song_per_artist() {
        let tool = SongsByGenreTool::new(fixture_db());
        let out = tool.call(json!({"genre": "Rock"}), None).await.unwrap();
        let rows: Vec<Value> = serde_json::from_str(&out.text).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn unknown_song_reports_no_results() {
        let tool = CheckForSongsTool::new(fixture_db());
        let out = tool
            .call(json!({"song_title": "Nonexistent"}), None)
            .await
            .unwrap();
        assert_eq!(out.text, "No songs found matching 'Nonexistent'.");
    }

    #[tokio::test]
    async fn missing_artist_is_invalid_input() {
        let tool = TracksByArtistTool::new(fixture_db());
        let err = tool.call(json!({}), None).await.unwrap_err();
        assert!(matches!(err, ToolSourceError::InvalidInput(_)));
    }
}

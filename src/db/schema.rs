use rusqlite::Connection;

pub const SCHEMA_VERSION: i64 = 1;

/// Install tables and indexes. Idempotent.
pub fn install(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            display_name TEXT NOT NULL,
            role TEXT NOT NULL CHECK (role IN ('user', 'admin', 'owner')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sessions (
            token_hash TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            expires_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS assets (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            media_type TEXT NOT NULL,
            url TEXT NOT NULL,
            width INTEGER,
            height INTEGER,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS streams (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT,
            creator_id TEXT NOT NULL REFERENCES users(id),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS stream_members (
            stream_id TEXT NOT NULL REFERENCES streams(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            joined_at TEXT NOT NULL,
            PRIMARY KEY (stream_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS stream_assets (
            stream_id TEXT NOT NULL REFERENCES streams(id) ON DELETE CASCADE,
            asset_id TEXT NOT NULL REFERENCES assets(id) ON DELETE CASCADE,
            added_by TEXT NOT NULL,
            added_at TEXT NOT NULL,
            PRIMARY KEY (stream_id, asset_id)
        );

        CREATE TABLE IF NOT EXISTS bookmarks (
            id TEXT PRIMARY KEY,
            stream_id TEXT NOT NULL REFERENCES streams(id) ON DELETE CASCADE,
            url TEXT NOT NULL,
            title TEXT,
            created_by TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS drops (
            id TEXT PRIMARY KEY,
            author_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            stream_id TEXT REFERENCES streams(id) ON DELETE SET NULL,
            uses_blocks INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS blocks (
            id TEXT PRIMARY KEY,
            parent_key TEXT NOT NULL,
            parent_kind TEXT NOT NULL CHECK (parent_kind IN ('drop', 'stream')),
            parent_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            kind TEXT NOT NULL,
            payload TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (parent_key, position)
        );

        CREATE TABLE IF NOT EXISTS gallery_images (
            id TEXT PRIMARY KEY,
            block_id TEXT NOT NULL REFERENCES blocks(id) ON DELETE CASCADE,
            asset_id TEXT NOT NULL REFERENCES assets(id),
            position INTEGER NOT NULL,
            caption TEXT,
            created_at TEXT NOT NULL,
            UNIQUE (block_id, position),
            UNIQUE (block_id, asset_id)
        );

        CREATE TABLE IF NOT EXISTS notifications (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            kind TEXT NOT NULL,
            message TEXT NOT NULL,
            subject_id TEXT,
            read_at TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
        CREATE INDEX IF NOT EXISTS idx_assets_owner ON assets(owner_id);
        CREATE INDEX IF NOT EXISTS idx_stream_assets_asset ON stream_assets(asset_id);
        CREATE INDEX IF NOT EXISTS idx_bookmarks_stream ON bookmarks(stream_id);
        CREATE INDEX IF NOT EXISTS idx_drops_author ON drops(author_id);
        CREATE INDEX IF NOT EXISTS idx_drops_stream ON drops(stream_id);
        CREATE INDEX IF NOT EXISTS idx_blocks_parent ON blocks(parent_kind, parent_id);
        CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, created_at);
        ",
    )?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

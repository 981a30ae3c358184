//! Shape conversions between connector outputs and caller-facing documents.

use std::{
    io::{self, SeekFrom},
    path::Path,
};

use ferry_model::{
    Catalog, CatalogDocument, DestinationSyncMode, JobInfo, Stream,
    StreamAndConfiguration, StreamConfiguration, SyncMode,
};
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt},
};
use tracing::debug;

const TAIL_CHUNK_BYTES: u64 = 8 * 1024;

/// Pairs every discovered stream with its default configuration.
pub fn catalog_to_document(catalog: &Catalog) -> CatalogDocument {
    CatalogDocument {
        streams: catalog
            .streams
            .iter()
            .map(|stream| StreamAndConfiguration {
                config: default_stream_configuration(stream),
                stream: stream.clone(),
            })
            .collect(),
    }
}

fn default_stream_configuration(stream: &Stream) -> StreamConfiguration {
    StreamConfiguration {
        sync_mode: stream
            .supported_sync_modes
            .first()
            .copied()
            .unwrap_or(SyncMode::FullRefresh),
        cursor_field: stream.default_cursor_field.clone(),
        destination_sync_mode: DestinationSyncMode::Append,
        primary_key: stream.source_defined_primary_key.clone(),
        alias_name: alias_name(&stream.name),
        selected: true,
    }
}

/// Stream names become destination-safe identifiers.
pub fn alias_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Fills `log_lines` with at most `max_lines` trailing lines of the job log.
///
/// A missing or unreadable log leaves the info untouched.
pub async fn attach_log_tail(info: &mut JobInfo, max_lines: usize) {
    if max_lines == 0 {
        return;
    }
    let Some(path) = info.log_path.clone() else {
        return;
    };
    match read_tail(&path, max_lines).await {
        Ok(lines) => info.log_lines = lines,
        Err(err) => {
            debug!(job_id = %info.id, path = %path.display(), error = %err, "job log unavailable");
        }
    }
}

/// Reads backwards from the end of the log until `max_lines` full lines are
/// buffered. Invalid UTF-8 is replaced rather than rejected.
async fn read_tail(path: &Path, max_lines: usize) -> io::Result<Vec<String>> {
    let mut file = File::open(path).await?;
    let mut start = file.metadata().await?.len();
    let mut buf: Vec<u8> = Vec::new();

    while start > 0 && newline_count(&buf) <= max_lines {
        let chunk_start = start.saturating_sub(TAIL_CHUNK_BYTES);
        let mut chunk = vec![0; (start - chunk_start) as usize];
        file.seek(SeekFrom::Start(chunk_start)).await?;
        file.read_exact(&mut chunk).await?;
        chunk.extend_from_slice(&buf);
        buf = chunk;
        start = chunk_start;
    }

    let text = String::from_utf8_lossy(&buf);
    let lines: Vec<&str> = text.lines().collect();
    let first = lines.len().saturating_sub(max_lines);
    Ok(lines[first..].iter().map(|line| line.to_string()).collect())
}

fn newline_count(bytes: &[u8]) -> usize {
    bytes.iter().filter(|byte| **byte == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ferry_model::SyncJobConfigType;
    use serde_json::json;
    use std::io::Write;
    use uuid::Uuid;

    fn stream(name: &str, modes: Vec<SyncMode>) -> Stream {
        Stream {
            name: name.to_string(),
            json_schema: json!({ "type": "object" }),
            supported_sync_modes: modes,
            source_defined_cursor: false,
            default_cursor_field: vec!["updated_at".into()],
            source_defined_primary_key: vec![vec!["id".into()]],
        }
    }

    #[test]
    fn default_configuration_prefers_first_supported_mode() {
        let catalog = Catalog {
            streams: vec![
                stream("public.users", vec![SyncMode::Incremental, SyncMode::FullRefresh]),
                stream("events", vec![]),
            ],
        };

        let document = catalog_to_document(&catalog);
        assert_eq!(document.streams.len(), 2);

        let users = &document.streams[0].config;
        assert_eq!(users.sync_mode, SyncMode::Incremental);
        assert_eq!(users.alias_name, "public_users");
        assert_eq!(users.cursor_field, vec!["updated_at".to_string()]);
        assert!(users.selected);

        let events = &document.streams[1].config;
        assert_eq!(events.sync_mode, SyncMode::FullRefresh);
        assert_eq!(events.destination_sync_mode, DestinationSyncMode::Append);
    }

    fn info_with_log(path: Option<std::path::PathBuf>) -> JobInfo {
        let now = Utc::now();
        JobInfo {
            id: Uuid::new_v4(),
            config_type: SyncJobConfigType::DiscoverSchema,
            config_id: None,
            created_at: now,
            ended_at: now,
            succeeded: false,
            log_path: path,
            log_lines: Vec::new(),
        }
    }

    #[tokio::test]
    async fn log_tail_keeps_the_last_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for n in 1..=5 {
            writeln!(file, "line {n}").unwrap();
        }
        let mut info = info_with_log(Some(file.path().to_path_buf()));

        attach_log_tail(&mut info, 2).await;
        assert_eq!(info.log_lines, vec!["line 4", "line 5"]);
    }

    #[tokio::test]
    async fn log_tail_spans_several_chunks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for n in 1..=5_000 {
            writeln!(file, "worker heartbeat {n:05}").unwrap();
        }
        let mut info = info_with_log(Some(file.path().to_path_buf()));

        attach_log_tail(&mut info, 3).await;
        assert_eq!(
            info.log_lines,
            vec![
                "worker heartbeat 04998",
                "worker heartbeat 04999",
                "worker heartbeat 05000"
            ]
        );

        attach_log_tail(&mut info, 1_000).await;
        assert_eq!(info.log_lines.len(), 1_000);
        assert_eq!(info.log_lines[0], "worker heartbeat 04001");
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced_not_dropped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"started\nbad byte \xff here\nfinished\n")
            .unwrap();
        let mut info = info_with_log(Some(file.path().to_path_buf()));

        attach_log_tail(&mut info, 2).await;
        assert_eq!(info.log_lines, vec!["bad byte \u{fffd} here", "finished"]);
    }

    #[tokio::test]
    async fn short_log_returns_every_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "only line").unwrap();
        let mut info = info_with_log(Some(file.path().to_path_buf()));

        attach_log_tail(&mut info, 5).await;
        assert_eq!(info.log_lines, vec!["only line"]);
    }

    #[tokio::test]
    async fn missing_log_is_ignored() {
        let mut info =
            info_with_log(Some("/definitely/not/here/logs.log".into()));
        attach_log_tail(&mut info, 10).await;
        assert!(info.log_lines.is_empty());
    }
}

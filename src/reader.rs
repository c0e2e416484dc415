use anyhow::{anyhow, Result};
use serde::Serialize;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Configuration for script file reading
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Return an error instead of a partial script on read failures
    pub fail_fast: bool,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            fail_fast: true,
            buffer_size: 8192,
        }
    }
}

/// Statistics for one script read
#[derive(Debug, Clone, Serialize)]
pub struct ReadStats {
    pub file_path: String,
    pub lines_read: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_error: Option<String>,
}

/// Async buffered reader for screenplay text files.
///
/// Lines are joined with `\n`, so CRLF files come back with plain line feeds.
pub struct ScriptReader {
    config: ReaderConfig,
}

impl ScriptReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub async fn read_script<P: AsRef<Path>>(&self, file_path: P) -> Result<(String, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of script: {}", path.display());

        let stats_with = |lines_read: u64, bytes_read: u64, read_error: Option<String>| ReadStats {
            file_path: path.display().to_string(),
            lines_read,
            bytes_read,
            duration_ms: start_time.elapsed().as_millis() as u64,
            read_error,
        };

        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) => {
                let error_msg = format!("Failed to open script {}: {}", path.display(), e);
                warn!("{}", error_msg);
                if self.config.fail_fast {
                    return Err(anyhow!(error_msg));
                }
                return Ok((String::new(), stats_with(0, 0, Some(error_msg))));
            }
        };

        let reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut lines = reader.lines();
        let mut text = String::new();
        let mut line_count = 0u64;
        let mut byte_count = 0u64;

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line_count > 0 {
                        text.push('\n');
                    }
                    byte_count += line.len() as u64 + 1;
                    line_count += 1;
                    text.push_str(&line);
                }
                Ok(None) => break,
                Err(e) => {
                    let error_msg = format!(
                        "UTF-8 decoding error in {} at line {}: {}",
                        path.display(),
                        line_count + 1,
                        e
                    );
                    warn!("{}", error_msg);
                    if self.config.fail_fast {
                        return Err(anyhow!(error_msg));
                    }
                    return Ok((text, stats_with(line_count, byte_count, Some(error_msg))));
                }
            }
        }

        let stats = stats_with(line_count, byte_count, None);
        info!(
            "Read script {}: {} lines, {} bytes in {}ms",
            path.display(),
            line_count,
            byte_count,
            stats.duration_ms
        );

        Ok((text, stats))
    }
}

/// Read a whole script with the default configuration
pub async fn read_script_async<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let reader = ScriptReader::new(ReaderConfig::default());
    let (text, _stats) = reader.read_script(file_path).await?;
    Ok(text)
}

//! Line-oriented token reader.
//!
//! Keyboard-wedge RFID readers and USB/serial barcode scanners deliver each
//! credential as one line of text, so a single reader covers stdin and
//! character devices such as `/dev/ttyUSB0`.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::TokenId;
use crate::error::{Error, Result};
use crate::ports::TokenReaderPort;

/// Reads one token per line from a text source.
pub struct LineTokenReader<R> {
    lines: Mutex<Lines<R>>,
}

impl<R: AsyncBufRead + Unpin + Send> LineTokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
        }
    }
}

impl LineTokenReader<BufReader<Stdin>> {
    /// Read tokens typed into the process's stdin.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl LineTokenReader<BufReader<File>> {
    /// Open a reader device node.
    pub async fn open(device: &Path) -> Result<Self> {
        let file = File::open(device).await.map_err(|e| {
            Error::Sensor(format!("Failed to open reader {}: {}", device.display(), e))
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin + Send> TokenReaderPort for LineTokenReader<R> {
    async fn read_token(&self) -> Result<TokenId> {
        let mut lines = self.lines.lock().await;
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match TokenId::parse(&line) {
                    Ok(token) => return Ok(token),
                    Err(_) => debug!("Skipping blank reader line"),
                },
                Ok(None) => return Err(Error::Sensor("reader input closed".to_string())),
                Err(e) => return Err(Error::Sensor(format!("read failed: {}", e))),
            }
        }
    }
}

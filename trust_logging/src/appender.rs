// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use std::{
    env,
    ffi::OsStr,
    fmt,
    io::{self, Write},
    path::Path,
};
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};

const DEFAULT_BINARY_NAME: &str = "mybit-trust";

/// Non-blocking writer into `dir/<binary>.log`, rotated once it grows past `max_bytes`.
///
/// Only `uncompressed_files` rotated files are kept as plain text, the rest are compressed, and
/// at most `max_files` are kept in total.
pub(super) fn file_rotater(
    dir: &Path,
    max_bytes: usize,
    uncompressed_files: usize,
    max_files: usize,
) -> (NonBlocking, WorkerGuard) {
    let binary_name = env::current_exe()
        .map(|path| {
            path.file_stem()
                .unwrap_or(OsStr::new(DEFAULT_BINARY_NAME))
                .to_string_lossy()
                .into_owned()
        })
        .unwrap_or_else(|_| DEFAULT_BINARY_NAME.to_string());

    let writer = FileRotate::new(
        dir.join(format!("{binary_name}.log")),
        AppendTimestamp::default(FileLimit::MaxFiles(max_files)),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::OnRotate(uncompressed_files),
        #[cfg(unix)]
        None,
    );

    // Block rather than drop lines when the writer falls behind.
    NonBlockingBuilder::default()
        .lossy(false)
        .finish(RotatingWriter { writer })
}

struct RotatingWriter {
    writer: FileRotate<AppendTimestamp>,
}

impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl fmt::Debug for RotatingWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingWriter").finish()
    }
}

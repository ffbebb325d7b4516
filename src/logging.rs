//! Logger setup for the binaries.
//!
//! Records go to stderr as `timestamp - LEVEL - message`. When a log file is
//! given, every record is appended there as well. `RUST_LOG` overrides the
//! default `info` filter.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Env, Target};

struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} - {} - {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            record.level(),
            record.args()
        )
    });
    builder
}

/// Install the global logger. Calling it twice is harmless; the second call is ignored.
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = builder();
    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(Tee { file })));
    }
    if builder.try_init().is_err() {
        log::debug!("Logger already initialised");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.log");
        init(Some(&path)).unwrap();
        init(None).unwrap();
        assert!(path.exists());
    }
}

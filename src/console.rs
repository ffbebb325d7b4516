//! Line-based terminal I/O shared by the blogging loop and the chat binary.

use std::io::{self, Write};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented terminal the interactive binaries talk through.
#[async_trait]
pub trait Console: Send {
    /// Show `prompt` and read one line. `Ok(None)` means end of input.
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn print(&mut self, text: &str);
}

pub struct StdConsole {
    lines: Lines<BufReader<Stdin>>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for StdConsole {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;
        self.lines.next_line().await
    }

    fn print(&mut self, text: &str) {
        println!("{}", text);
    }
}

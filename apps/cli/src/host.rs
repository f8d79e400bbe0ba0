//! Console host: stdout for progress, stderr for errors.

use std::path::PathBuf;

use bitspring_publish::Host;

pub struct ConsoleHost;

impl Host for ConsoleHost {
    fn write_message(&self, text: &str) {
        println!("{text}");
    }

    fn show_error(&self, text: &str) {
        eprintln!("Error: {text}");
    }

    fn open_in_browser(&self, url: &str) -> std::io::Result<()> {
        open::that(url)
    }

    fn temp_directory(&self) -> PathBuf {
        std::env::temp_dir()
    }
}

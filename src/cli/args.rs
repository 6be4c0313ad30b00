//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Assignment collector CLI.
///
/// Every option is optional; anything not given on the command line is asked
/// for interactively.
#[derive(Parser, Debug, Default)]
#[command(
    name = "assignment-collector",
    version,
    about = "Collect student assignment files into one folder, renamed per student",
    long_about = "Copies files from a synced submissions folder laid out as\n\
                  <Root>/<Student Name>/<Assignment Name>/<files>\n\
                  into a flat output folder, naming each copy after its student.\n\n\
                  Optionally writes the new file name into the header of .docx documents."
)]
pub struct Args {
    /// Folder containing one subfolder per student.
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Assignment subfolder to collect, by number or exact name.
    #[arg(short, long)]
    pub assignment: Option<String>,

    /// Output folder (defaults to <downloads>/<assignment>).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Text placed before the student name.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Text placed after the student name.
    #[arg(long)]
    pub suffix: Option<String>,

    /// Write the file name into the header of .docx documents.
    #[arg(long)]
    pub stamp_headers: bool,

    /// Folder under which default output folders are created.
    #[arg(long = "downloads-dir", env = "COLLECTOR_DOWNLOADS_DIR")]
    pub downloads_directory: Option<PathBuf>,

    /// Font size of the stamped header label, in points.
    #[arg(long)]
    pub font_size: Option<f32>,

    /// Path to configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Never prompt; unanswered options take their defaults.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(dir) = &self.downloads_directory {
            config.output.downloads_directory = Some(dir.clone());
        }

        if let Some(size) = self.font_size {
            config.header.font_size_pt = size;
        }

        if self.stamp_headers {
            config.header.stamp_by_default = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let args = Args::try_parse_from([
            "assignment-collector",
            "--source",
            "/data/turned_in",
            "-a",
            "Essay",
            "--prefix",
            "HW1",
            "--suffix",
            "Final",
            "--stamp-headers",
            "--font-size",
            "11",
            "-y",
        ])
        .unwrap();

        assert_eq!(args.source, Some(PathBuf::from("/data/turned_in")));
        assert_eq!(args.assignment.as_deref(), Some("Essay"));
        assert_eq!(args.prefix.as_deref(), Some("HW1"));
        assert_eq!(args.suffix.as_deref(), Some("Final"));
        assert!(args.stamp_headers);
        assert!(args.yes);
        assert_eq!(args.font_size, Some(11.0));
    }

    #[test]
    fn test_parse_no_arguments() {
        let args = Args::try_parse_from(["assignment-collector"]).unwrap();
        assert!(args.source.is_none());
        assert!(!args.yes);
        assert!(!args.stamp_headers);
    }

    #[test]
    fn test_downloads_dir_reads_environment() {
        use clap::CommandFactory;
        use std::ffi::OsStr;

        let command = Args::command();
        let arg = command
            .get_arguments()
            .find(|arg| arg.get_id() == "downloads_directory")
            .unwrap();

        assert_eq!(arg.get_long(), Some("downloads-dir"));
        assert_eq!(arg.get_env(), Some(OsStr::new("COLLECTOR_DOWNLOADS_DIR")));
    }

    #[test]
    fn test_merge_into_config() {
        let args = Args {
            downloads_directory: Some(PathBuf::from("/tmp/grading")),
            font_size: Some(9.0),
            stamp_headers: true,
            ..Default::default()
        };
        let mut config = Config::default();

        args.merge_into_config(&mut config);

        assert_eq!(config.downloads_directory(), PathBuf::from("/tmp/grading"));
        assert_eq!(config.header.font_size_pt, 9.0);
        assert!(config.header.stamp_by_default);
    }

    #[test]
    fn test_merge_keeps_config_values() {
        let mut config = Config::default();
        config.header.font_size_pt = 14.0;

        Args::default().merge_into_config(&mut config);

        assert_eq!(config.header.font_size_pt, 14.0);
        assert!(!config.header.stamp_by_default);
    }
}

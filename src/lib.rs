//! Assignment Collector - gather student submissions into one folder.
//!
//! Reads a locally synced submissions tree laid out as
//! `<Root>/<Student Name>/[<Assignment Name>/]<files>` and copies every file
//! into a flat output folder, named after its student.
//!
//! # Features
//!
//! - Assignment folder discovery across all students
//! - Prefix/suffix naming with filesystem-safe names
//! - Collision-free output names (`Jane Doe (2).pdf`)
//! - Optional file-name stamping in `.docx` headers
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use assignment_collector::{CollectOptions, Collector, DocxHeaderStamper, NamingTemplate};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stamper = DocxHeaderStamper::default();
//!     let options = CollectOptions {
//!         source: PathBuf::from("Turned in"),
//!         output: PathBuf::from("downloads/Essay"),
//!         assignment: Some("Essay".to_string()),
//!         naming: NamingTemplate::new(Some("HW1".to_string()), None),
//!         stamp_headers: true,
//!     };
//!
//!     let stats = Collector::new(options).with_stamper(&stamper).run()?;
//!     println!("found {}, copied {}", stats.found, stats.copied);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod collect;
pub mod config;
pub mod error;
pub mod fs;
pub mod header;
pub mod output;

// Re-exports for convenience
pub use collect::{discover_assignments, CollectOptions, CollectStats, Collector};
pub use config::Config;
pub use error::{Error, Result};
pub use fs::{sanitize_name, unique_destination, NamingTemplate};
pub use header::{DocxHeaderStamper, HeaderStamper};

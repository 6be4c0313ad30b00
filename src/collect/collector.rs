//! Copying student submissions into the output folder.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::collect::stats::CollectStats;
use crate::error::{Error, Result};
use crate::fs::{
    copy_with_metadata, ensure_dir, extension_of, sanitize_name, unique_destination,
    NamingTemplate,
};
use crate::header::{is_stampable, HeaderStamper};

/// Settings for one collection run.
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Folder holding one subfolder per student.
    pub source: PathBuf,
    /// Flat folder receiving the renamed copies.
    pub output: PathBuf,
    /// Exact name of the assignment subfolder to take from each student.
    /// `None` takes everything under the student folder.
    pub assignment: Option<String>,
    /// Prefix and suffix wrapped around the student name.
    pub naming: NamingTemplate,
    /// Stamp the file name into `.docx` headers.
    pub stamp_headers: bool,
}

/// Walks student folders and copies their files, renamed, into one folder.
pub struct Collector<'a> {
    options: CollectOptions,
    stamper: Option<&'a dyn HeaderStamper>,
}

impl<'a> Collector<'a> {
    /// Create a collector without header stamping capability.
    pub fn new(options: CollectOptions) -> Self {
        Self {
            options,
            stamper: None,
        }
    }

    /// Provide the stamper used when header stamping is enabled.
    pub fn with_stamper(mut self, stamper: &'a dyn HeaderStamper) -> Self {
        self.stamper = Some(stamper);
        self
    }

    /// Run one full pass over the source folder.
    ///
    /// Fails before touching the output folder when the source is not a
    /// directory. Any later I/O error aborts the run; files copied up to that
    /// point stay where they are.
    pub fn run(&self) -> Result<CollectStats> {
        let source = &self.options.source;
        if !source.is_dir() {
            return Err(Error::SourceNotFound(source.clone()));
        }

        ensure_dir(&self.options.output)?;

        if self.options.stamp_headers && self.stamper.is_none() {
            tracing::warn!(
                "Header stamping requested but unavailable; headers will not be modified"
            );
        }

        let mut students: Vec<(String, PathBuf)> = Vec::new();
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                students.push((entry.file_name().to_string_lossy().into_owned(), path));
            }
        }
        students.sort();

        tracing::info!(
            "Collecting from {} student folder(s) in {}",
            students.len(),
            source.display()
        );

        let mut stats = CollectStats::default();
        for (raw_name, student_dir) in &students {
            let student_stats = self.collect_student(raw_name, student_dir)?;
            stats.add(&student_stats);
        }

        tracing::info!(
            "Collection complete: {} found, {} copied",
            stats.found,
            stats.copied
        );

        Ok(stats)
    }

    fn collect_student(&self, raw_name: &str, student_dir: &Path) -> Result<CollectStats> {
        let mut stats = CollectStats::default();

        let student = sanitize_name(raw_name);
        let base_name = self.options.naming.base_name(&student);

        let walk_root = match &self.options.assignment {
            Some(assignment) => {
                let candidate = student_dir.join(assignment);
                if !candidate.is_dir() {
                    tracing::debug!("{} has no '{}' folder, skipping", raw_name, assignment);
                    return Ok(stats);
                }
                candidate
            }
            None => student_dir.to_path_buf(),
        };

        for entry in WalkDir::new(&walk_root).sort_by_file_name() {
            let entry = entry?;
            // Directories and dangling links are not files
            if !entry.path().is_file() {
                continue;
            }
            stats.increment_found();

            let ext = extension_of(entry.file_name());
            let destination = unique_destination(&self.options.output, &base_name, &ext);

            copy_with_metadata(entry.path(), &destination)?;
            tracing::debug!(
                "Copied {} -> {}",
                entry.path().display(),
                destination.display()
            );

            if self.options.stamp_headers && is_stampable(&ext) {
                if let Some(stamper) = self.stamper {
                    if !stamper.stamp(&destination, &base_name) {
                        tracing::warn!(
                            "Header not updated for {}; file was copied unchanged",
                            destination.display()
                        );
                    }
                }
            }

            stats.increment_copied();
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records every stamp request and answers with a fixed outcome.
    struct RecordingStamper {
        calls: RefCell<Vec<(PathBuf, String)>>,
        succeed: bool,
    }

    impl RecordingStamper {
        fn new(succeed: bool) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                succeed,
            }
        }
    }

    impl HeaderStamper for RecordingStamper {
        fn stamp(&self, path: &Path, label: &str) -> bool {
            self.calls
                .borrow_mut()
                .push((path.to_path_buf(), label.to_string()));
            self.succeed
        }
    }

    fn write_file(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn output_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn options(tmp: &TempDir) -> CollectOptions {
        CollectOptions {
            source: tmp.path().join("turned_in"),
            output: tmp.path().join("out"),
            ..Default::default()
        }
    }

    fn two_students(tmp: &TempDir) {
        let root = tmp.path().join("turned_in");
        write_file(&root.join("Jane_Doe/x.txt"), "jane");
        write_file(&root.join("Bob Smith/x.txt"), "bob");
    }

    #[test]
    fn test_collect_renames_to_student() {
        let tmp = TempDir::new().unwrap();
        two_students(&tmp);
        let opts = options(&tmp);

        let stats = Collector::new(opts.clone()).run().unwrap();

        assert_eq!(stats, CollectStats { found: 2, copied: 2 });
        assert_eq!(output_names(&opts.output), vec!["Bob Smith.txt", "Jane Doe.txt"]);
        assert_eq!(fs::read_to_string(opts.output.join("Jane Doe.txt")).unwrap(), "jane");
    }

    #[test]
    fn test_collect_with_prefix_and_suffix() {
        let tmp = TempDir::new().unwrap();
        two_students(&tmp);
        let opts = CollectOptions {
            naming: NamingTemplate::new(Some("HW1".into()), Some("Final".into())),
            ..options(&tmp)
        };

        Collector::new(opts.clone()).run().unwrap();

        assert_eq!(
            output_names(&opts.output),
            vec!["HW1 Bob Smith Final.txt", "HW1 Jane Doe Final.txt"]
        );
    }

    #[test]
    fn test_collect_resolves_collisions() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("turned_in");
        write_file(&root.join("Jane_Doe/a.txt"), "first");
        write_file(&root.join("Jane_Doe/nested/b.txt"), "second");
        let opts = options(&tmp);

        let stats = Collector::new(opts.clone()).run().unwrap();

        assert_eq!(stats, CollectStats { found: 2, copied: 2 });
        assert_eq!(output_names(&opts.output), vec!["Jane Doe (2).txt", "Jane Doe.txt"]);
        assert_eq!(fs::read_to_string(opts.output.join("Jane Doe.txt")).unwrap(), "first");
        assert_eq!(fs::read_to_string(opts.output.join("Jane Doe (2).txt")).unwrap(), "second");
    }

    #[test]
    fn test_collect_keeps_existing_output() {
        let tmp = TempDir::new().unwrap();
        two_students(&tmp);
        let opts = options(&tmp);
        write_file(&opts.output.join("Jane Doe.txt"), "old run");

        Collector::new(opts.clone()).run().unwrap();

        assert_eq!(
            output_names(&opts.output),
            vec!["Bob Smith.txt", "Jane Doe (2).txt", "Jane Doe.txt"]
        );
        assert_eq!(fs::read_to_string(opts.output.join("Jane Doe.txt")).unwrap(), "old run");
    }

    #[test]
    fn test_collect_assignment_selector() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("turned_in");
        write_file(&root.join("Jane_Doe/Essay/draft/essay.pdf"), "essay");
        write_file(&root.join("Jane_Doe/Quiz/quiz.pdf"), "quiz");
        write_file(&root.join("Jane_Doe/loose.txt"), "loose");
        write_file(&root.join("Bob Smith/Quiz/quiz.pdf"), "quiz");
        let opts = CollectOptions {
            assignment: Some("Essay".into()),
            ..options(&tmp)
        };

        let stats = Collector::new(opts.clone()).run().unwrap();

        assert_eq!(stats, CollectStats { found: 1, copied: 1 });
        assert_eq!(output_names(&opts.output), vec!["Jane Doe.pdf"]);
    }

    #[test]
    fn test_collect_ignores_loose_files_in_root() {
        let tmp = TempDir::new().unwrap();
        two_students(&tmp);
        write_file(&tmp.path().join("turned_in/readme.txt"), "not a student");
        let opts = options(&tmp);

        let stats = Collector::new(opts).run().unwrap();

        assert_eq!(stats.found, 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_follows_file_symlinks_and_skips_dangling() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let student = tmp.path().join("turned_in/Jane");
        fs::create_dir_all(&student).unwrap();
        write_file(&tmp.path().join("outside.txt"), "linked");
        symlink(tmp.path().join("outside.txt"), student.join("link.txt")).unwrap();
        symlink(tmp.path().join("missing.txt"), student.join("dangling.txt")).unwrap();
        let opts = options(&tmp);

        let stats = Collector::new(opts.clone()).run().unwrap();

        assert_eq!(stats, CollectStats { found: 1, copied: 1 });
        assert_eq!(output_names(&opts.output), vec!["Jane.txt"]);
        assert_eq!(fs::read_to_string(opts.output.join("Jane.txt")).unwrap(), "linked");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_collect_keeps_non_utf8_extension() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let student = tmp.path().join("turned_in/Jane");
        fs::create_dir_all(&student).unwrap();
        fs::write(student.join(OsStr::from_bytes(b"essay.d\xffc")), "raw").unwrap();
        let opts = options(&tmp);

        Collector::new(opts.clone()).run().unwrap();

        let expected = opts.output.join(OsStr::from_bytes(b"Jane.d\xffc"));
        assert_eq!(fs::read_to_string(expected).unwrap(), "raw");
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_unreadable_folder_aborts_and_keeps_copies() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("turned_in");
        write_file(&root.join("Alice/a.txt"), "alice");
        let locked = root.join("Bob/sub");
        write_file(&locked.join("b.txt"), "bob");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // privileged user; permissions are not enforced
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }
        let opts = options(&tmp);

        let result = Collector::new(opts.clone()).run();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(Error::Walk(_))));
        assert_eq!(output_names(&opts.output), vec!["Alice.txt"]);
    }

    #[test]
    fn test_collect_missing_source() {
        let tmp = TempDir::new().unwrap();
        let opts = options(&tmp);

        let err = Collector::new(opts.clone()).run().unwrap_err();

        assert!(matches!(err, Error::SourceNotFound(_)));
        assert!(!opts.output.exists());
    }

    #[test]
    fn test_collect_source_is_file() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("turned_in"), "file");
        let opts = options(&tmp);

        let err = Collector::new(opts.clone()).run().unwrap_err();

        assert!(matches!(err, Error::SourceNotFound(_)));
        assert!(!opts.output.exists());
    }

    #[test]
    fn test_collect_stamps_docx_only() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("turned_in");
        write_file(&root.join("Jane_Doe/essay.DOCX"), "doc");
        write_file(&root.join("Jane_Doe/notes.txt"), "txt");
        let opts = CollectOptions {
            naming: NamingTemplate::new(Some("HW1".into()), None),
            stamp_headers: true,
            ..options(&tmp)
        };
        let stamper = RecordingStamper::new(false);

        let stats = Collector::new(opts.clone())
            .with_stamper(&stamper)
            .run()
            .unwrap();

        assert_eq!(stats, CollectStats { found: 2, copied: 2 });
        let calls = stamper.calls.borrow();
        assert_eq!(
            *calls,
            vec![(opts.output.join("HW1 Jane Doe.DOCX"), "HW1 Jane Doe".to_string())]
        );
    }

    #[test]
    fn test_collect_no_stamping_when_disabled() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("turned_in/Jane/essay.docx"), "doc");
        let stamper = RecordingStamper::new(true);

        Collector::new(options(&tmp))
            .with_stamper(&stamper)
            .run()
            .unwrap();

        assert!(stamper.calls.borrow().is_empty());
    }

    #[test]
    fn test_collect_stamping_without_capability() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("turned_in/Jane/essay.docx"), "doc");
        let opts = CollectOptions {
            stamp_headers: true,
            ..options(&tmp)
        };

        let stats = Collector::new(opts.clone()).run().unwrap();

        assert_eq!(stats.copied, 1);
        assert_eq!(fs::read_to_string(opts.output.join("Jane.docx")).unwrap(), "doc");
    }
}

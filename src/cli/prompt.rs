//! Interactive questions asked before a collection run.

use std::path::{Path, PathBuf};

use console::style;
use dialoguer::{Confirm, Input};

use crate::cli::Args;
use crate::collect::{discover_assignments, CollectOptions};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fs::{default_output_dir, NamingTemplate};
use crate::output::{print_info, print_warning};

/// Everything needed to start a run, as answered by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Answers {
    pub source: PathBuf,
    pub assignment: Option<String>,
    pub output: PathBuf,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub stamp_headers: bool,
}

impl Answers {
    /// Turn the answers into collector options.
    pub fn into_options(self) -> CollectOptions {
        CollectOptions {
            source: self.source,
            output: self.output,
            assignment: self.assignment,
            naming: NamingTemplate::new(self.prefix, self.suffix),
            stamp_headers: self.stamp_headers,
        }
    }
}

/// Ask for every value the command line left open.
///
/// With `--yes` nothing is asked: the source must be given and open values
/// take their defaults.
pub fn gather_answers(args: &Args, config: &Config, stamping_available: bool) -> Result<Answers> {
    let source = match &args.source {
        Some(path) => {
            validate_source(path)?;
            path.clone()
        }
        None if args.yes => {
            return Err(Error::Config("--source is required with --yes".into()));
        }
        None => ask_source()?,
    };

    let assignments = discover_assignments(&source);
    let assignment = choose_assignment(args, &assignments)?;

    let default_output = default_output_dir(&config.downloads_directory(), assignment.as_deref());
    let output = match &args.output {
        Some(path) => path.clone(),
        None if args.yes => default_output,
        None => PathBuf::from(
            Input::<String>::new()
                .with_prompt("Enter output folder path")
                .default(default_output.display().to_string())
                .interact_text()?
                .trim(),
        ),
    };

    let prefix = match &args.prefix {
        Some(prefix) => normalize_optional(prefix),
        None if args.yes => None,
        None => ask_optional(
            "Enter prefix to add before student name (optional, press Enter to skip)",
        )?,
    };
    let suffix = match &args.suffix {
        Some(suffix) => normalize_optional(suffix),
        None if args.yes => None,
        None => ask_optional(
            "Enter suffix to add after student name (optional, press Enter to skip)",
        )?,
    };

    let wants_stamping = if args.stamp_headers {
        true
    } else if args.yes {
        config.header.stamp_by_default
    } else {
        let prompt = if stamping_available {
            "Add filename to DOCX document headers?"
        } else {
            "Add filename to DOCX document headers? (unavailable)"
        };
        Confirm::new()
            .with_prompt(prompt)
            .default(config.header.stamp_by_default)
            .interact()?
    };

    let stamp_headers = wants_stamping && stamping_available;
    if wants_stamping && !stamping_available {
        print_warning("Header stamping is not available. Headers will not be modified.");
    }

    Ok(Answers {
        source,
        assignment,
        output,
        prefix,
        suffix,
        stamp_headers,
    })
}

/// Check that the submissions root is an existing directory.
pub fn validate_source(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::SourceNotFound(path.to_path_buf()))
    }
}

/// Treat blank answers as "not given".
pub fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Match a menu answer against the detected assignments.
///
/// An exact name from the list wins, so a folder called `2024` can be picked
/// by name. Otherwise a purely numeric answer picks by 1-based position.
pub fn resolve_assignment_choice(
    input: &str,
    assignments: &[String],
) -> std::result::Result<String, String> {
    let input = input.trim();

    if input.is_empty() {
        return Err("A selection is required.".to_string());
    }

    if let Some(name) = assignments.iter().find(|name| name.as_str() == input) {
        return Ok(name.clone());
    }

    if input.chars().all(|c| c.is_ascii_digit()) {
        return input
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=assignments.len()).contains(n))
            .map(|n| assignments[n - 1].clone())
            .ok_or_else(|| format!("Choose a number between 1 and {}.", assignments.len()));
    }

    Err("Name not found in detected list. Please choose a number or exact name.".to_string())
}

fn ask_source() -> Result<PathBuf> {
    println!("Provide the path to the submitted files root. Structure:");
    println!("  <Root>/<Student Name>/<Assignment Name>/<files>");

    let answer: String = Input::new()
        .with_prompt("Enter path to submitted files folder")
        .validate_with(|input: &String| -> std::result::Result<(), &'static str> {
            if Path::new(input.trim()).is_dir() {
                Ok(())
            } else {
                Err("That path does not exist or is not a directory. Try again.")
            }
        })
        .interact_text()?;

    Ok(PathBuf::from(answer.trim()))
}

fn choose_assignment(args: &Args, assignments: &[String]) -> Result<Option<String>> {
    if let Some(choice) = &args.assignment {
        return resolve_assignment_choice(choice, assignments)
            .map(Some)
            .map_err(|message| Error::ConfigValidation {
                field: "assignment".to_string(),
                message,
            });
    }

    if assignments.is_empty() {
        print_info(
            "No assignment subfolders detected; will copy files directly under each student folder.",
        );
        return Ok(None);
    }

    if args.yes {
        return Err(Error::Config(
            "--assignment is required with --yes when assignment folders exist".into(),
        ));
    }

    println!("Detected assignment folders:");
    for (index, name) in assignments.iter().enumerate() {
        println!("  {}. {}", style(index + 1).bold(), name);
    }

    let answer: String = Input::new()
        .with_prompt("Select assignment number to extract (or type exact name)")
        .validate_with(|input: &String| resolve_assignment_choice(input, assignments).map(|_| ()))
        .interact_text()?;

    resolve_assignment_choice(&answer, assignments)
        .map(Some)
        .map_err(|message| Error::ConfigValidation {
            field: "assignment".to_string(),
            message,
        })
}

fn ask_optional(prompt: &str) -> Result<Option<String>> {
    let answer: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(normalize_optional(&answer))
}

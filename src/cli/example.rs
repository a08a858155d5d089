//! Code related to the example models and the CLI commands for interacting with them.
use super::{RunOpts, handle_run_command};
use crate::settings::Settings;
use anyhow::{Context, Result, bail, ensure};
use clap::Subcommand;
use include_dir::{Dir, DirEntry, include_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The directory containing the example models.
static EXAMPLES_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/demos");

/// The available subcommands for managing example models.
#[derive(Subcommand)]
pub enum ExampleSubcommands {
    /// List available examples.
    List,
    /// Provide information about the specified example.
    Info {
        /// The name of the example.
        name: String,
    },
    /// Extract an example model configuration to a new directory.
    Extract {
        /// The name of the example to extract.
        name: String,
        /// The destination folder for the example.
        new_path: Option<PathBuf>,
    },
    /// Run an example.
    Run {
        /// The name of the example to run.
        name: String,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
}

impl ExampleSubcommands {
    /// Execute the supplied example subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => handle_example_list_command(),
            Self::Info { name } => handle_example_info_command(&name)?,
            Self::Extract {
                name,
                new_path: dest,
            } => handle_example_extract_command(&name, dest.as_deref())?,
            Self::Run { name, opts } => handle_example_run_command(&name, &opts, None)?,
        }

        Ok(())
    }
}

/// Names of the bundled example models
pub fn example_names() -> impl Iterator<Item = &'static str> {
    EXAMPLES_DIR
        .dirs()
        .filter_map(|dir| dir.path().file_name()?.to_str())
}

/// Handle the `example list` command.
fn handle_example_list_command() {
    for name in example_names() {
        println!("{name}");
    }
}

/// Get the README for the specified example
fn example_readme(name: &str) -> Result<&'static str> {
    let path: PathBuf = [name, "README.txt"].iter().collect();
    EXAMPLES_DIR
        .get_file(path)
        .context("Example not found.")?
        .contents_utf8()
        .context("README.txt is not UTF-8 encoded")
}

/// Handle the `example info` command.
fn handle_example_info_command(name: &str) -> Result<()> {
    println!("{}", example_readme(name)?);

    Ok(())
}

/// Handle the `example extract` command
fn handle_example_extract_command(name: &str, dest: Option<&Path>) -> Result<()> {
    let dest = dest.unwrap_or(Path::new(name));
    extract_example(name, dest)
}

/// Extract the specified example to a new directory
fn extract_example(name: &str, new_path: &Path) -> Result<()> {
    let sub_dir = EXAMPLES_DIR.get_dir(name).context("Example not found.")?;

    ensure!(
        !new_path.exists(),
        "Destination directory {} already exists",
        new_path.display()
    );

    // Copy the contents of the subdirectory to the destination
    fs::create_dir(new_path)?;
    for entry in sub_dir.entries() {
        match entry {
            DirEntry::Dir(_) => bail!("Subdirectories in examples not supported"),
            DirEntry::File(f) => {
                let file_name = f
                    .path()
                    .file_name()
                    .context("Example file has no name")?;
                fs::write(new_path.join(file_name), f.contents())?;
            }
        }
    }

    Ok(())
}

/// Handle the `example run` command.
pub fn handle_example_run_command(
    name: &str,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    let model_path = temp_dir.path().join(name);
    extract_example(name, &model_path)?;
    handle_run_command(&model_path, opts, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MODEL_FILE_NAME, Model};
    use tempfile::tempdir;

    #[test]
    fn test_example_names() {
        let names: Vec<_> = example_names().collect();
        for name in ["exponential", "halving", "linear", "logarithmic"] {
            assert!(names.contains(&name), "Missing example: {name}");
        }
    }

    #[test]
    fn test_example_readme() {
        assert!(!example_readme("linear").unwrap().is_empty());
        assert!(example_readme("missing").is_err());
    }

    #[test]
    fn test_extract_example() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("halving");
        extract_example("halving", &dest).unwrap();
        assert!(dest.join(MODEL_FILE_NAME).is_file());
        assert!(dest.join("README.txt").is_file());

        // Can't extract over an existing directory
        assert!(extract_example("halving", &dest).is_err());
    }

    #[test]
    fn test_all_examples_load() {
        for name in example_names() {
            let dir = tempdir().unwrap();
            let dest = dir.path().join(name);
            extract_example(name, &dest).unwrap();
            Model::from_path(&dest).unwrap();
        }
    }
}

use anyhow::Context;
use std::fs;

pub mod cli;
pub mod collector;
pub mod config;
pub mod console;
pub mod decode;
pub mod error;
pub mod sink;
pub mod walker;
pub mod worker;

use cli::{CollectArgs, Commands, InitArgs};
use collector::CollectionStatus;
use config::{FileConfig, Settings};
use console::ConsoleSink;

pub use collector::{CollectOptions, CollectionResult, collect, collect_with};
pub use error::CollectError;
pub use sink::{Progress, Sink};

/// The core logic of the application.
pub fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Collect(args) => run_collect(args),
        Commands::Init(args) => run_init(args),
    }
}

/// The logic for the 'collect' command.
fn run_collect(args: CollectArgs) -> anyhow::Result<()> {
    let file_config = FileConfig::discover(args.config.as_deref())?;
    let settings = Settings::resolve(&args, file_config);
    let options = settings.options;

    log::info!(
        "collecting '{}' files from {} into {}",
        options.suffix,
        options.root.display(),
        options.output.display()
    );

    if settings.create_dirs
        && let Some(parent) = options.output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
        log::info!("created output directory {}", parent.display());
    }

    let mut console = ConsoleSink::stdio(args.quiet);
    // The collection runs on a worker thread; rendering stays here.
    let handle = worker::spawn(options.clone()).context("failed to start collection thread")?;
    for event in handle.events() {
        event.replay(&mut console);
    }
    let result = handle.join()?;

    match result.status {
        CollectionStatus::Success => {
            let mut message = format!(
                "Collected {} file(s) into {}",
                result.processed,
                options.output.display()
            );
            if result.failures > 0 {
                message.push_str(&format!(", {} could not be read", result.failures));
            }
            if result.skipped > 0 {
                message.push_str(&format!(", {} binary file(s) skipped", result.skipped));
            }
            console.summary(&message, true);
            Ok(())
        }
        CollectionStatus::NoFilesFound => {
            console.summary("Nothing to collect.", true);
            Ok(())
        }
        CollectionStatus::Failed(err) => {
            console.finish();
            Err(anyhow::Error::new(err).context("collection failed"))
        }
    }
}

/// The logic for the 'init' command.
fn run_init(args: InitArgs) -> anyhow::Result<()> {
    if args.path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists, use --force to overwrite it",
            args.path.display()
        );
    }
    fs::write(&args.path, config::default_config_toml())
        .with_context(|| format!("failed to write {}", args.path.display()))?;
    println!("Wrote default configuration to {}", args.path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use std::fs::File;
    use std::io::Read;
    use std::path::Path;

    fn get_test_args(root: &Path, output_file: &Path) -> CollectArgs {
        CollectArgs {
            root: Some(root.to_path_buf()),
            output: Some(output_file.to_path_buf()),
            quiet: true,
            ..CollectArgs::default()
        }
    }

    #[test]
    fn test_collect_default_suffix() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let src = dir.child("src");
        src.child("Program.cs").write_str("class Program {}")?;
        src.child("notes.md").write_str("# Notes")?;
        let output_file = dir.path().join("result.txt");

        let mut args = get_test_args(src.path(), &output_file);
        args.config = Some(dir.path().join("none.toml"));
        // An explicit config that does not exist is an error.
        assert!(run(Commands::Collect(args.clone())).is_err());

        args.config = None;
        run(Commands::Collect(args))?;

        let mut result = String::new();
        File::open(&output_file)?.read_to_string(&mut result)?;
        assert_eq!(result, "Program.cs-------------\nclass Program {}\n\n");
        Ok(())
    }

    #[test]
    fn test_collect_with_config_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        dir.child("src/lib.rs").write_str("pub fn f() {}")?;
        dir.child("src/Skip.cs").write_str("class Skip {}")?;
        let output_file = dir.path().join("out").join("all.txt");
        let config = dir.child("collect.toml");
        config.write_str("suffix = \".rs\"\ncreate_dirs = true\n")?;

        let mut args = get_test_args(&dir.path().join("src"), &output_file);
        args.config = Some(config.path().to_path_buf());
        run(Commands::Collect(args))?;

        let result = fs::read_to_string(&output_file)?;
        assert_eq!(result, "lib.rs-------------\npub fn f() {}\n\n");
        Ok(())
    }

    #[test]
    fn test_missing_root_is_an_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let output_file = dir.path().join("result.txt");
        let args = get_test_args(&dir.path().join("nope"), &output_file);

        let err = run(Commands::Collect(args)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CollectError>(),
            Some(CollectError::DirectoryNotFound(_))
        ));
        assert!(!output_file.exists());
        Ok(())
    }

    #[test]
    fn test_no_files_is_not_an_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        dir.child("readme.txt").write_str("nothing")?;
        let args = get_test_args(dir.path(), &dir.path().join("result.txt"));
        run(Commands::Collect(args))?;
        Ok(())
    }

    #[test]
    fn test_init_refuses_to_overwrite() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("collect-code.toml");

        run(Commands::Init(InitArgs {
            path: path.clone(),
            force: false,
        }))?;
        let written = fs::read_to_string(&path)?;
        assert!(FileConfig::from_toml(&written).is_ok());

        let again = run(Commands::Init(InitArgs {
            path: path.clone(),
            force: false,
        }));
        assert!(again.is_err());

        fs::write(&path, "suffix = \".x\"")?;
        run(Commands::Init(InitArgs {
            path: path.clone(),
            force: true,
        }))?;
        assert_eq!(fs::read_to_string(&path)?, written);
        Ok(())
    }
}

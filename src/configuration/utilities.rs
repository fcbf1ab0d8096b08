use std::{env::current_dir, path::{Path, PathBuf}};

use miette::{miette, Context, IntoDiagnostic, Result};


/// Returns the default configuration filepath, which is at
/// `{current directory}/data/configuration.toml`.
///
/// The file itself does not need to exist; loading creates it.
pub fn get_default_configuration_file_path() -> Result<PathBuf> {
    let mut configuration_filepath = current_dir()
        .into_diagnostic()
        .wrap_err_with(|| miette!("Could not get the current directory."))?;
    configuration_filepath.push("data/configuration.toml");

    Ok(configuration_filepath)
}

/// Creates the directory that will contain `file_path`, if it is missing.
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    let Some(parent_directory) = file_path.parent() else {
        return Ok(());
    };

    if parent_directory.as_os_str().is_empty() || parent_directory.is_dir() {
        return Ok(());
    }

    std::fs::create_dir_all(parent_directory)
        .into_diagnostic()
        .wrap_err_with(|| {
            miette!(
                "Failed to create missing configuration directory at {}.",
                parent_directory.display()
            )
        })
}

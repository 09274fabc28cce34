//! Package operations.
//!
//! A vRO package travels as a zip archive of `elements/<id>/...` directories.
//! This module resolves where a named package lives on disk (from the
//! configuration registry) and implements the four movements between its
//! forms:
//!
//! - [`Package::unzip`]: archive -> expanded element tree
//! - [`Package::expand`]: element tree -> per-category module files
//! - [`Package::build`]: module files -> regenerated element `data` files
//! - [`Package::rebuild`]: element tree -> archive
//!
//! Elements are processed in sorted id order and module files are written
//! whole, so repeated runs over the same input produce identical output.

use crate::action::stub::render_js;
use crate::action::xml::{
    decode_data_bytes, encode_utf16be, parse_categories, parse_element, render_element,
};
use crate::action::{Action, ResultType};
use crate::config::Config;
use crate::error::{Result, VrocliError};
use crate::fs::{atomic_write, atomic_write_file};
use crate::module_file::{module_header, StubExtractor};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// A configured package and its resolved on-disk locations.
#[derive(Debug, Clone)]
pub struct Package {
    /// Package name as configured (and as known to the server).
    pub name: String,
    /// Source `.package` archive (pull writes here, expand reads from here).
    pub src_package: PathBuf,
    /// Directory the archive is expanded into.
    pub expand_target: PathBuf,
    /// Directory holding the editable module files.
    pub working_dir: PathBuf,
    /// Rebuilt `.package` archive (build writes here, push reads from here).
    pub build_target: PathBuf,
}

/// What `expand` did, for reporting and event details.
#[derive(Debug)]
pub struct ExpandSummary {
    /// Actions rendered into module files.
    pub actions: usize,
    /// Categories (module files) written, in name order.
    pub categories: Vec<String>,
    /// Elements skipped because they are not vRO actions.
    pub ignored: usize,
}

/// What `build` did, for reporting and event details.
#[derive(Debug)]
pub struct BuildSummary {
    /// Actions whose element data was regenerated.
    pub actions: usize,
    /// Module files processed.
    pub modules: usize,
}

impl Package {
    /// Resolve a package's paths from the configuration.
    ///
    /// The package must be listed in the `packages` registry; per-package
    /// overrides win over the derived default-path layout.
    pub fn resolve(name: &str, config: &Config) -> Result<Self> {
        let overrides = config.packages.get(name).ok_or_else(|| {
            VrocliError::UserError(format!(
                "package '{}' is not configured. Add it under packages in {} before using it.",
                name,
                crate::config::CONFIG_FILE,
            ))
        })?;

        let defaults = &config.default_paths;
        Ok(Self {
            name: name.to_string(),
            src_package: overrides
                .package
                .clone()
                .unwrap_or_else(|| defaults.packages.join(format!("{}.package", name))),
            expand_target: overrides
                .expand_target
                .clone()
                .unwrap_or_else(|| defaults.expand_target.join(name)),
            working_dir: overrides
                .working_dir
                .clone()
                .unwrap_or_else(|| defaults.working_dir.join(name)),
            build_target: overrides
                .build_target
                .clone()
                .unwrap_or_else(|| defaults.build_target.join(format!("{}.package", name))),
        })
    }

    /// Extract the source archive into the expand target.
    pub fn unzip(&self) -> Result<()> {
        if !self.src_package.is_file() {
            return Err(VrocliError::PackageError(format!(
                "package archive not found at '{}'. Pull it first.",
                self.src_package.display()
            )));
        }

        let file = File::open(&self.src_package).map_err(|e| {
            VrocliError::PackageError(format!(
                "failed to open archive '{}': {}",
                self.src_package.display(),
                e
            ))
        })?;
        let mut archive = ZipArchive::new(file).map_err(|e| {
            VrocliError::PackageError(format!(
                "failed to read archive '{}': {}",
                self.src_package.display(),
                e
            ))
        })?;
        archive.extract(&self.expand_target).map_err(|e| {
            VrocliError::PackageError(format!(
                "failed to extract archive into '{}': {}",
                self.expand_target.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Convert the expanded element tree into per-category module files.
    ///
    /// Elements that are not script modules (workflows, resources,
    /// configuration elements) are counted and skipped; a `--verbose` caller
    /// can report them. Each category becomes one `<category>.js` file in the
    /// working directory, containing the module header and one rendered stub
    /// per action.
    pub fn expand(&self, verbose: bool) -> Result<ExpandSummary> {
        let elements = self.expand_target.join("elements");
        if !elements.is_dir() {
            return Err(VrocliError::PackageError(format!(
                "no elements directory at '{}'. Unzip the package first.",
                elements.display()
            )));
        }

        let mut ids: Vec<String> = fs::read_dir(&elements)
            .map_err(|e| {
                VrocliError::PackageError(format!(
                    "failed to read '{}': {}",
                    elements.display(),
                    e
                ))
            })?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        ids.sort();

        let mut modules: BTreeMap<String, String> = BTreeMap::new();
        let mut actions = 0usize;
        let mut ignored = 0usize;

        for id in ids {
            let element_dir = elements.join(&id);
            match read_action(&element_dir, &id) {
                Some(action) => {
                    let content = modules
                        .entry(action.category.clone())
                        .or_insert_with(|| module_header(&action.category));
                    content.push('\n');
                    content.push_str(&render_js(&action)?);
                    actions += 1;
                }
                None => {
                    if verbose {
                        println!("Item with id {} ignored: not a vRO action", id);
                    }
                    ignored += 1;
                }
            }
        }

        for (category, content) in &modules {
            let path = self.working_dir.join(format!("{}.js", category));
            atomic_write_file(&path, content)?;
        }

        Ok(ExpandSummary {
            actions,
            categories: modules.into_keys().collect(),
            ignored,
        })
    }

    /// Regenerate element `data` files from the module files.
    ///
    /// Each action found in a module file is re-rendered as its XML document
    /// and written (UTF-16BE with BOM) to `elements/<id>/data` under the
    /// expand target, creating the element directory when the module file
    /// introduced a new action id.
    pub fn build(&self) -> Result<BuildSummary> {
        let extractor = StubExtractor::new()?;
        let modules = extractor.list_modules(&self.working_dir)?;

        let mut actions = 0usize;
        for module in &modules {
            for action in extractor.extract_actions(&module.category, &module.content)? {
                let xml = render_element(&action)?;
                let data_path = self
                    .expand_target
                    .join("elements")
                    .join(&action.id)
                    .join("data");
                atomic_write(&data_path, &encode_utf16be(&xml))?;
                actions += 1;
            }
        }

        Ok(BuildSummary {
            actions,
            modules: modules.len(),
        })
    }

    /// Zip the expand target back into the build target archive.
    pub fn rebuild(&self) -> Result<()> {
        if !self.expand_target.is_dir() {
            return Err(VrocliError::PackageError(format!(
                "nothing to rebuild: '{}' does not exist",
                self.expand_target.display()
            )));
        }

        if let Some(parent) = self.build_target.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                VrocliError::PackageError(format!(
                    "failed to create '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = File::create(&self.build_target).map_err(|e| {
            VrocliError::PackageError(format!(
                "failed to create archive '{}': {}",
                self.build_target.display(),
                e
            ))
        })?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut files = Vec::new();
        collect_files(&self.expand_target, &mut files)?;
        files.sort();

        for path in files {
            let relative = path
                .strip_prefix(&self.expand_target)
                .map_err(|_| {
                    VrocliError::PackageError(format!(
                        "file '{}' escaped the expand target",
                        path.display()
                    ))
                })?;
            let entry_name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            writer.start_file(entry_name, options).map_err(|e| {
                VrocliError::PackageError(format!("failed to add archive entry: {}", e))
            })?;
            let bytes = fs::read(&path).map_err(|e| {
                VrocliError::PackageError(format!("failed to read '{}': {}", path.display(), e))
            })?;
            writer.write_all(&bytes).map_err(|e| {
                VrocliError::PackageError(format!("failed to write archive entry: {}", e))
            })?;
        }

        writer.finish().map_err(|e| {
            VrocliError::PackageError(format!(
                "failed to finish archive '{}': {}",
                self.build_target.display(),
                e
            ))
        })?;

        Ok(())
    }
}

/// Read one element directory into an [`Action`].
///
/// Anything that stops the element from being a usable script module (no
/// data file, undecodable or malformed XML, a non-action root, no category)
/// yields `None`: packages routinely carry workflows, resources, and
/// configuration elements that expand must step over.
fn read_action(element_dir: &Path, id: &str) -> Option<Action> {
    let bytes = fs::read(element_dir.join("data")).ok()?;
    let xml = decode_data_bytes(&bytes).ok()?;
    let element = parse_element(&xml).ok().flatten()?;

    let categories_bytes = fs::read(element_dir.join("categories")).ok()?;
    let categories_xml = decode_data_bytes(&categories_bytes).ok()?;
    let category = parse_categories(&categories_xml).ok()?.into_iter().next()?;

    Some(Action::new(
        id,
        element.name,
        element.description,
        element.params,
        element.script,
        category,
        ResultType::from_element(&element.result_type),
    ))
}

/// Collect every regular file under `dir`, depth first.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| {
        VrocliError::PackageError(format!("failed to read '{}': {}", dir.display(), e))
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| {
            VrocliError::PackageError(format!("failed to read '{}': {}", dir.display(), e))
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

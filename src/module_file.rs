//! Module files.
//!
//! The editable source form of a package is one JavaScript file per category,
//! written into the package working directory. A module file starts with a
//! `/** @module <category> */` header and then carries one rendered stub per
//! action, each bracketed by the sentinel markers. This module owns the
//! header format, module discovery, and the extraction that turns a module
//! file back into [`Action`] records for the build path.
//!
//! Extraction is regex-based and deliberately mirrors what the stub renderer
//! emits; it also tolerates hand-edited whitespace around the markers and
//! doc tags, since module files are meant to be edited.

use crate::action::{Action, ActionParam, ResultType};
use crate::error::{Result, VrocliError};
use regex::Regex;
use std::fs;
use std::path::Path;

/// A recognized module file: its category and full content.
#[derive(Debug, Clone)]
pub struct Module {
    pub category: String,
    pub content: String,
}

/// Render the header line that begins every module file.
pub fn module_header(category: &str) -> String {
    format!("/** @module {} */\n", category)
}

/// Compiled extraction patterns.
///
/// Compile once per command run and reuse across module files.
pub struct StubExtractor {
    /// One sentinel-bracketed block, markers excluded.
    block: Regex,
    /// The `/* id:... */` comment inside a block.
    id: Regex,
    /// Doc comment, function name, and body of a stub.
    stub: Regex,
    /// One `@param {type} name desc?` doc line.
    param: Regex,
    /// The `@return {type}` doc line.
    ret: Regex,
    /// Module header on the first line of a file.
    header: Regex,
}

impl StubExtractor {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                VrocliError::PackageError(format!("internal extraction pattern failed: {}", e))
            })
        };
        Ok(Self {
            block: compile(
                r"(?s)/\*\s*VRO\s+ACTION\s+START\s*\*/(?P<block>.*?)/\*\s*VRO\s+ACTION\s+END\s*\*/",
            )?,
            id: compile(r"/\*\s*id:(?P<id>[\w-]+)")?,
            stub: compile(
                r"(?s)/\*\*(?P<comments>.*?)\*/\s*function\s+(?P<name>[\w$-]+)\s*\(\s*\)\s*\{(?P<code>.*?)\n\};",
            )?,
            param: compile(
                r"(?m)^\s*\*\s*@param\s+\{(?P<type>[^}]*)\}\s+(?P<name>[\w$]+)[ \t]*(?P<desc>.*)$",
            )?,
            ret: compile(r"\*\s*@return\s+\{(?P<type>[^}]*)\}")?,
            header: compile(r"^/\*\*\s*@module\s+(?P<category>[\w.-]+)\s*\*/")?,
        })
    }

    /// Category of a module file, judged by its first line.
    pub fn module_category(&self, first_line: &str) -> Option<String> {
        self.header
            .captures(first_line)
            .map(|c| c["category"].to_string())
    }

    /// Scan a working directory for module files.
    ///
    /// Only `.js` files whose first line is a module header count; anything
    /// else in the directory is left alone. Files are visited in name order
    /// so repeated builds behave identically.
    pub fn list_modules(&self, dir: &Path) -> Result<Vec<Module>> {
        let entries = fs::read_dir(dir).map_err(|e| {
            VrocliError::PackageError(format!(
                "failed to read working directory '{}': {}",
                dir.display(),
                e
            ))
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "js"))
            .collect();
        paths.sort();

        let mut modules = Vec::new();
        for path in paths {
            let content = fs::read_to_string(&path).map_err(|e| {
                VrocliError::PackageError(format!(
                    "failed to read module file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            let first_line = content.lines().next().unwrap_or("");
            if let Some(category) = self.module_category(first_line) {
                modules.push(Module { category, content });
            }
        }
        Ok(modules)
    }

    /// Pull every action out of a module file's content.
    ///
    /// A block that does not parse fails the whole extraction; a build from a
    /// broken module file would silently drop actions otherwise.
    pub fn extract_actions(&self, category: &str, content: &str) -> Result<Vec<Action>> {
        let mut actions = Vec::new();
        for caps in self.block.captures_iter(content) {
            actions.push(self.extract_one(category, &caps["block"])?);
        }
        Ok(actions)
    }

    fn extract_one(&self, category: &str, block: &str) -> Result<Action> {
        let id = self
            .id
            .captures(block)
            .map(|c| c["id"].to_string())
            .ok_or_else(|| {
                VrocliError::PackageError(format!(
                    "action block has no id comment: {}",
                    snippet(block)
                ))
            })?;

        let stub = self.stub.captures(block).ok_or_else(|| {
            VrocliError::PackageError(format!(
                "action block is not a documented function stub: {}",
                snippet(block)
            ))
        })?;

        let comments = &stub["comments"];
        let name = stub["name"].to_string();
        let script = stub["code"].trim().to_string();

        let result_js = self
            .ret
            .captures(comments)
            .map(|c| c["type"].to_string())
            .ok_or_else(|| {
                VrocliError::PackageError(format!(
                    "action '{}' has no @return tag in its doc comment",
                    name
                ))
            })?;

        let params = self
            .param
            .captures_iter(comments)
            .map(|c| {
                let desc = c["desc"].trim().to_string();
                ActionParam::new(
                    c["name"].to_string(),
                    c["type"].to_string(),
                    (!desc.is_empty()).then_some(desc),
                )
            })
            .collect();

        Ok(Action::new(
            id,
            name,
            description_from_comments(comments),
            params,
            script,
            category,
            ResultType::from_js(&result_js),
        ))
    }
}

/// Description lines of a doc comment: every content line before the first
/// `@` tag, with the leading ` * ` scaffolding stripped.
fn description_from_comments(comments: &str) -> Option<String> {
    let mut lines = Vec::new();
    for line in comments.lines() {
        let stripped = line.trim_start().trim_start_matches('*').trim_start();
        if stripped.starts_with('@') {
            break;
        }
        if !stripped.is_empty() {
            lines.push(stripped.to_string());
        }
    }
    let description = lines.join("\n");
    (!description.trim().is_empty()).then_some(description)
}

/// Leading fragment of a block for error messages.
fn snippet(block: &str) -> String {
    let trimmed = block.trim();
    let head: String = trimmed.chars().take(60).collect();
    if head.len() < trimmed.len() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::stub::render_js;
    use std::fs;
    use tempfile::TempDir;

    fn extractor() -> StubExtractor {
        StubExtractor::new().unwrap()
    }

    fn sample_action() -> Action {
        Action::new(
            "8a7b64",
            "findThing",
            Some("Looks up a thing.".to_string()),
            vec![
                ActionParam::new("name", "string", Some("what to look for".to_string())),
                ActionParam::new("strict", "boolean", None),
            ],
            "return thing;",
            "com.corp.tools",
            ResultType::from_js("Properties[]"),
        )
    }

    #[test]
    fn header_round_trips_through_category_check() {
        let x = extractor();
        let header = module_header("com.corp.tools");
        assert_eq!(
            x.module_category(header.lines().next().unwrap()),
            Some("com.corp.tools".to_string())
        );
    }

    #[test]
    fn non_header_first_line_is_not_a_module() {
        let x = extractor();
        assert!(x.module_category("// just a comment").is_none());
        assert!(x.module_category("var a = 1;").is_none());
    }

    #[test]
    fn rendered_stub_round_trips_through_extraction() {
        let x = extractor();
        let action = sample_action();
        let content = format!("{}\n{}", module_header("com.corp.tools"), render_js(&action).unwrap());

        let extracted = x.extract_actions("com.corp.tools", &content).unwrap();
        assert_eq!(extracted.len(), 1);

        let got = &extracted[0];
        assert_eq!(got.id, action.id);
        assert_eq!(got.name, action.name);
        assert_eq!(got.description, action.description);
        assert_eq!(got.params, action.params);
        assert_eq!(got.script, action.script);
        assert_eq!(got.result.js(), "Properties[]");
        assert_eq!(got.result.element(), "Array/Properties");
    }

    #[test]
    fn multiline_script_survives_extraction() {
        let x = extractor();
        let mut action = sample_action();
        action.script = "var a = 1;\nif (a) {\n  return a;\n}\nreturn 0;".to_string();
        let content = render_js(&action).unwrap();

        let extracted = x.extract_actions("cat", &content).unwrap();
        assert_eq!(extracted[0].script, action.script);
    }

    #[test]
    fn multiple_blocks_extract_in_order() {
        let x = extractor();
        let mut first = sample_action();
        first.id = "id-one".to_string();
        first.name = "first".to_string();
        let mut second = sample_action();
        second.id = "id-two".to_string();
        second.name = "second".to_string();

        let content = format!(
            "{}\n{}\n{}",
            module_header("cat"),
            render_js(&first).unwrap(),
            render_js(&second).unwrap()
        );

        let extracted = x.extract_actions("cat", &content).unwrap();
        assert_eq!(extracted.len(), 2);
        assert_eq!(extracted[0].name, "first");
        assert_eq!(extracted[1].name, "second");
    }

    #[test]
    fn action_without_description_extracts_none() {
        let x = extractor();
        let mut action = sample_action();
        action.description = None;
        let content = render_js(&action).unwrap();

        let extracted = x.extract_actions("cat", &content).unwrap();
        assert!(extracted[0].description.is_none());
    }

    #[test]
    fn missing_id_comment_is_an_error() {
        let x = extractor();
        let block = "/* VRO ACTION START */\n/**\n * @method f\n *\n * @return {void}\n */\nfunction f () {\n    return;\n};\n/* VRO ACTION END */";
        let err = x.extract_actions("cat", block).unwrap_err();
        assert!(err.to_string().contains("no id comment"));
    }

    #[test]
    fn missing_return_tag_is_an_error() {
        let x = extractor();
        let block = "/* VRO ACTION START */\n/* id:a1 */\n/**\n * @method f\n */\nfunction f () {\n    return;\n};\n/* VRO ACTION END */";
        let err = x.extract_actions("cat", block).unwrap_err();
        assert!(err.to_string().contains("@return"));
    }

    #[test]
    fn garbled_block_is_an_error() {
        let x = extractor();
        let block =
            "/* VRO ACTION START */\n/* id:a1 */\nthis is not a stub\n/* VRO ACTION END */";
        assert!(x.extract_actions("cat", block).is_err());
    }

    #[test]
    fn content_outside_markers_is_ignored() {
        let x = extractor();
        let action = sample_action();
        let content = format!(
            "{}\n// stray comment\n{}\nvar trailing = true;\n",
            module_header("cat"),
            render_js(&action).unwrap()
        );
        let extracted = x.extract_actions("cat", &content).unwrap();
        assert_eq!(extracted.len(), 1);
    }

    #[test]
    fn list_modules_finds_only_module_files() {
        let x = extractor();
        let dir = TempDir::new().unwrap();

        fs::write(
            dir.path().join("com.corp.tools.js"),
            format!("{}\n", module_header("com.corp.tools")),
        )
        .unwrap();
        fs::write(dir.path().join("scratch.js"), "var not = 'a module';\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "/** @module fake */\n").unwrap();

        let modules = x.list_modules(dir.path()).unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].category, "com.corp.tools");
    }

    #[test]
    fn list_modules_is_sorted_by_file_name() {
        let x = extractor();
        let dir = TempDir::new().unwrap();
        for category in ["zeta", "alpha", "mid"] {
            fs::write(
                dir.path().join(format!("{}.js", category)),
                module_header(category),
            )
            .unwrap();
        }

        let modules = x.list_modules(dir.path()).unwrap();
        let categories: Vec<_> = modules.iter().map(|m| m.category.as_str()).collect();
        assert_eq!(categories, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn list_modules_missing_dir_is_an_error() {
        let x = extractor();
        let dir = TempDir::new().unwrap();
        assert!(x.list_modules(&dir.path().join("absent")).is_err());
    }
}

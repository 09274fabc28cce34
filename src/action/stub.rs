//! JavaScript stub rendering.
//!
//! Turns an [`Action`] into the source text of a documented function
//! declaration, bracketed by the fixed sentinel markers that let the build
//! path (and any external tool) locate and replace a generated block
//! idempotently:
//!
//! ```text
//! /* VRO ACTION START */
//! /* id:8a7b... */
//! /**
//!  * Looks up a thing.
//!  *
//!  * @method findThing
//!  * @param {string} name what to look for
//!  *
//!  * @return {Properties}
//!  */
//! function findThing () {
//!     return thing;
//! };
//! /* VRO ACTION END */
//! ```
//!
//! Rendering is a pure function of the action: no state, no side effects,
//! and identical input always produces byte-identical output. Field contents
//! are inserted verbatim, without escaping; a script that itself contains a
//! sentinel token will confuse downstream extraction, and that is the
//! caller's problem to avoid.

use crate::action::Action;
use crate::error::Result;

/// Start marker line. Fixed wire-format constant; downstream tooling matches
/// it literally.
pub const ACTION_START: &str = "/* VRO ACTION START */";

/// End marker line. Fixed wire-format constant.
pub const ACTION_END: &str = "/* VRO ACTION END */";

/// Render the documented function stub for an action.
///
/// Fails with [`InvalidSpec`](crate::error::VrocliError::InvalidSpec) before
/// producing any output when `name` or `script` is missing, since neither the
/// declaration line nor the body can be emitted without them. All other
/// fields are optional or copied through unchecked.
pub fn render_js(action: &Action) -> Result<String> {
    action.validate()?;

    let mut out = String::new();
    out.push_str(ACTION_START);
    out.push('\n');
    out.push_str(&format!("/* id:{} */\n", action.id));

    out.push_str("/**\n");
    if let Some(description) = &action.description {
        // A multi-line description continues the doc block line by line.
        for line in description.lines() {
            out.push_str(&format!(" * {}\n", line));
        }
        out.push_str(" *\n");
    }
    out.push_str(&format!(" * @method {}\n", action.name));
    for param in &action.params {
        match &param.desc {
            Some(desc) => out.push_str(&format!(
                " * @param {{{}}} {} {}\n",
                param.param_type, param.name, desc
            )),
            None => out.push_str(&format!(
                " * @param {{{}}} {}\n",
                param.param_type, param.name
            )),
        }
    }
    out.push_str(" *\n");
    out.push_str(&format!(" * @return {{{}}}\n", action.result.js()));
    out.push_str(" */\n");

    out.push_str(&format!("function {} () {{\n", action.name));
    out.push_str("    ");
    out.push_str(&action.script);
    out.push_str("\n};\n");
    out.push_str(ACTION_END);
    out.push('\n');

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionParam, ResultType};
    use crate::error::VrocliError;

    fn sample() -> Action {
        Action::new(
            "42",
            "doThing",
            None,
            vec![ActionParam::new("x", "string", None)],
            "return null;",
            "com.corp.tools",
            ResultType::from_js("void"),
        )
    }

    #[test]
    fn render_is_deterministic() {
        let action = sample();
        assert_eq!(render_js(&action).unwrap(), render_js(&action).unwrap());
    }

    #[test]
    fn output_is_bracketed_by_markers_exactly_once() {
        let out = render_js(&sample()).unwrap();
        assert!(out.starts_with(ACTION_START));
        assert!(out.ends_with(&format!("{}\n", ACTION_END)));
        assert_eq!(out.matches(ACTION_START).count(), 1);
        assert_eq!(out.matches(ACTION_END).count(), 1);
    }

    #[test]
    fn id_is_embedded_verbatim() {
        let out = render_js(&sample()).unwrap();
        assert!(out.contains("/* id:42 */"));
    }

    #[test]
    fn minimal_action_renders_expected_lines() {
        let out = render_js(&sample()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines.contains(&"function doThing () {"));
        assert!(lines.contains(&" * @param {string} x"));
        assert!(lines.contains(&" * @return {void}"));

        // Body literally included before the closing brace.
        let body_pos = out.find("return null;").unwrap();
        let close_pos = out.find("};").unwrap();
        assert!(body_pos < close_pos);
    }

    #[test]
    fn omitted_description_leaves_no_blank_doc_line() {
        let out = render_js(&sample()).unwrap();
        // The doc block opens directly onto @method.
        assert!(out.contains("/**\n * @method doThing\n"));
    }

    #[test]
    fn description_renders_before_a_blank_doc_line() {
        let mut action = sample();
        action.description = Some("Does the thing.".to_string());
        let out = render_js(&action).unwrap();
        assert!(out.contains("/**\n * Does the thing.\n *\n * @method doThing\n"));
    }

    #[test]
    fn multiline_description_continues_the_doc_block() {
        let mut action = sample();
        action.description = Some("First line.\nSecond line.".to_string());
        let out = render_js(&action).unwrap();
        assert!(out.contains(" * First line.\n * Second line.\n *\n"));
    }

    #[test]
    fn params_appear_in_input_order() {
        let mut action = sample();
        action.params = vec![
            ActionParam::new("first", "string", None),
            ActionParam::new("second", "number", None),
            ActionParam::new("third", "boolean", None),
        ];
        let out = render_js(&action).unwrap();
        let a = out.find("@param {string} first").unwrap();
        let b = out.find("@param {number} second").unwrap();
        let c = out.find("@param {boolean} third").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn no_params_renders_no_param_lines() {
        let mut action = sample();
        action.params.clear();
        let out = render_js(&action).unwrap();
        assert!(!out.contains("@param"));
    }

    #[test]
    fn param_without_desc_has_no_trailing_whitespace() {
        let out = render_js(&sample()).unwrap();
        let line = out.lines().find(|l| l.contains("@param")).unwrap();
        assert_eq!(line, " * @param {string} x");
        assert_eq!(line.trim_end(), line);
    }

    #[test]
    fn param_desc_is_appended_after_a_single_space() {
        let mut action = sample();
        action.params = vec![ActionParam::new(
            "x",
            "string",
            Some("the input value".to_string()),
        )];
        let out = render_js(&action).unwrap();
        assert!(out.contains(" * @param {string} x the input value\n"));
    }

    #[test]
    fn array_result_uses_annotation_form() {
        let mut action = sample();
        action.result = ResultType::from_element("Array/String");
        let out = render_js(&action).unwrap();
        assert!(out.contains(" * @return {String[]}\n"));
    }

    #[test]
    fn empty_name_fails_without_output() {
        let mut action = sample();
        action.name = String::new();
        let err = render_js(&action).unwrap_err();
        assert!(matches!(err, VrocliError::InvalidSpec { field: "name" }));
    }

    #[test]
    fn empty_script_fails_without_output() {
        let mut action = sample();
        action.script = String::new();
        let err = render_js(&action).unwrap_err();
        assert!(matches!(err, VrocliError::InvalidSpec { field: "script" }));
    }

    #[test]
    fn script_is_inserted_unmodified() {
        let mut action = sample();
        action.script = "var a = 1;\nif (a) {\n  return a;\n}\nreturn 0;".to_string();
        let out = render_js(&action).unwrap();
        // Continuation lines keep their own indentation; only the template's
        // four-space lead-in precedes the first line.
        assert!(out.contains("    var a = 1;\nif (a) {\n  return a;\n}\nreturn 0;\n};"));
    }

    #[test]
    fn opaque_types_are_copied_through() {
        let mut action = sample();
        action.params = vec![ActionParam::new("vm", "VC:VirtualMachine", None)];
        action.result = ResultType::from_js("VC:VirtualMachine");
        let out = render_js(&action).unwrap();
        assert!(out.contains("@param {VC:VirtualMachine} vm"));
        assert!(out.contains("@return {VC:VirtualMachine}"));
    }
}

//! Turns a scriptlet implementation into injectable source text

use super::builtin::{self, Body};
use super::helpers;
use super::registry::ScriptletKind;
use crate::source::Source;

/// Marker stored on `Window.prototype.toString` once a scriptlet ran
const DONE_FLAG: &str = "done";

/// Self-contained function body for a scriptlet.
///
/// The body expects `source` and `args` in scope. It skips itself when the
/// page already carries the done flag for this `uniqueId + name + args`,
/// declares the implementation with every helper it needs, runs it, and
/// sets the flag after a successful run. Errors are logged, never rethrown.
pub fn function_body(kind: ScriptletKind) -> String {
    let body = builtin::body(kind);
    let mut out = String::with_capacity(body.code.len() * 2);

    out.push_str(&format!(
        r#"const flag = '{flag}';
const uniqueIdentifier = source.uniqueId + source.name + '_' + (Array.isArray(args) ? args.join('_') : '');
if (source.uniqueId) {{
    if (Window.prototype.toString[uniqueIdentifier] === flag) {{
        return;
    }}
}}
"#,
        flag = DONE_FLAG
    ));

    out.push_str(body.code);
    out.push('\n');
    for helper in helpers::resolve(body.helpers) {
        out.push_str(helper.code());
        out.push('\n');
    }

    out.push_str(&invocation(body));
    out
}

fn invocation(body: &Body) -> String {
    format!(
        r#"const updatedArgs = args ? [].concat(source).concat(args) : [source];
try {{
    {ident}.apply(this, updatedArgs);
    if (source.uniqueId) {{
        Object.defineProperty(Window.prototype.toString, uniqueIdentifier, {{
            value: flag,
            enumerable: false,
            writable: false,
            configurable: false,
        }});
    }}
}} catch (e) {{
    console.log(e);
}}"#,
        ident = body.ident
    )
}

/// Anonymous function expression around a body, for hosts that call the
/// function themselves
pub fn wrap_in_noname_func(code: &str) -> String {
    format!("function(source, args){{\n{}\n}}", code)
}

/// Self-invoking expression passing `source` and its args as JSON literals
pub fn pass_source_and_props(source: &Source, code: &str) -> Result<String, serde_json::Error> {
    let source_json = script_safe(serde_json::to_string(source)?);
    let args_json = script_safe(serde_json::to_string(&source.args)?);

    Ok(format!(
        "(function(source, args){{\n{}\n}})({}, {});",
        code, source_json, args_json
    ))
}

/// Keep JSON from closing an enclosing `<script>` element
fn script_safe(json: String) -> String {
    if json.contains("</") {
        json.replace("</", "<\\/")
    } else {
        json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_guards_and_marks() {
        let body = function_body(ScriptletKind::SetConstant);
        assert!(body.starts_with("const flag = 'done';"));
        assert!(body.contains("Window.prototype.toString[uniqueIdentifier] === flag"));
        assert!(body.contains("function setConstant(source, property, value"));
        assert!(body.contains("setConstant.apply(this, updatedArgs);"));
        assert!(body.contains("Object.defineProperty(Window.prototype.toString, uniqueIdentifier"));
        assert!(body.contains("configurable: false"));
        assert!(body.trim_end().ends_with("console.log(e);\n}"));
    }

    #[test]
    fn test_body_inlines_transitive_helpers_once() {
        let body = function_body(ScriptletKind::AbortOnPropertyRead);
        // matchStackTrace pulls in toRegExp, which pulls in escapeRegExp
        for ident in ["matchStackTrace", "toRegExp", "escapeRegExp", "randomId", "hit"] {
            let decl = format!("function {}(", ident);
            assert_eq!(body.matches(&decl).count(), 1, "{}", ident);
        }
    }

    #[test]
    fn test_guard_precedes_implementation() {
        let body = function_body(ScriptletKind::Log);
        let guard = body.find("=== flag").unwrap();
        let call = body.find("log.apply(this, updatedArgs)").unwrap();
        assert!(guard < call);
    }

    #[test]
    fn test_wrap_in_noname_func() {
        assert_eq!(wrap_in_noname_func("x();"), "function(source, args){\nx();\n}");
    }

    #[test]
    fn test_pass_source_and_props() {
        let source = Source::new("log").with_args(["hello"]);
        let code = pass_source_and_props(&source, "x();").unwrap();
        assert_eq!(
            code,
            "(function(source, args){\nx();\n})({\"name\":\"log\",\"args\":[\"hello\"],\"verbose\":false}, [\"hello\"]);"
        );
    }

    #[test]
    fn test_pass_source_and_props_escapes_script_close() {
        let source = Source::new("log").with_args(["</script><script>alert(1)"]);
        let code = pass_source_and_props(&source, "").unwrap();
        assert!(!code.contains("</script>"));
        assert!(code.contains(r#"<\/script>"#));
    }

    #[test]
    fn test_quotes_are_json_escaped() {
        let source = Source::new("log").with_args(["it's \"quoted\""]);
        let code = pass_source_and_props(&source, "").unwrap();
        assert!(code.contains(r#"["it's \"quoted\""]"#));
    }
}

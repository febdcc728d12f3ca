//! JavaScript expressions evaluated in the page to answer DOM
//! queries. Selectors and property names are JSON-escaped before
//! being spliced in.

use serde::Deserialize;

const TEXT_OVERRIDE_STYLE_ID: &str = "__pagecheck_text_override__";

/// Result of probing one element property in the page.
#[derive(Debug, Deserialize)]
pub struct PropertyProbe {
    pub found: bool,
    pub value: Option<String>,
}

pub fn count_expr(selector: &str) -> Result<String, serde_json::Error> {
    let sel = serde_json::to_string(selector)?;
    Ok(format!("document.querySelectorAll({sel}).length"))
}

/// Reads `name` from the first element matching `selector`. Values
/// are serialized with `String(...)` so numeric pixel measurements
/// compare as strings.
pub fn property_expr(selector: &str, name: &str) -> Result<String, serde_json::Error> {
    let sel = serde_json::to_string(selector)?;
    let name = serde_json::to_string(name)?;
    Ok(format!(
        "(() => {{ \
           const el = document.querySelector({sel}); \
           if (!el) {{ return JSON.stringify({{ found: false, value: null }}); }} \
           return JSON.stringify({{ found: true, value: String(el[{name}]) }}); \
         }})()"
    ))
}

/// Installs or removes the transparent-text style override. Text is
/// painted transparent while rendering is off so layout measurements
/// are unaffected.
pub fn text_override_expr(visible: bool) -> String {
    format!(
        "(() => {{ \
           const id = '{TEXT_OVERRIDE_STYLE_ID}'; \
           let style = document.getElementById(id); \
           if ({visible}) {{ if (style) {{ style.remove(); }} return true; }} \
           if (!style) {{ \
             style = document.createElement('style'); \
             style.id = id; \
             style.textContent = '* {{ color: rgba(0,0,0,0) !important; }}'; \
             document.head.appendChild(style); \
           }} \
           return true; \
         }})()"
    )
}

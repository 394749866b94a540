//! Collapses numbered prefix aliases (`schema1:`) back to the configured
//! prefix name across a rendered page.

use std::collections::BTreeSet;

use regex::{Captures, Regex};

/// Rewrites `<name><digits>:` to `<name>:` for every configured `name`,
/// unless `<name><digits>` is itself a configured prefix.
///
/// # Errors
///
/// Returns an error if a pattern built from a prefix name fails to compile.
pub fn repair_prefixes<'a>(
    html: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<String, regex::Error> {
    let names: BTreeSet<&str> = names.into_iter().collect();
    let mut repaired = html.to_string();
    for name in &names {
        let pattern = Regex::new(&format!(r"\b{}([0-9]+):", regex::escape(name)))?;
        repaired = pattern
            .replace_all(&repaired, |caps: &Captures<'_>| {
                let numbered = format!("{name}{}", &caps[1]);
                if names.contains(numbered.as_str()) {
                    caps[0].to_string()
                } else {
                    format!("{name}:")
                }
            })
            .into_owned();
    }
    Ok(repaired)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn numbered_aliases_collapse() {
        let html = r#"<a href="https://schema.org/name">schema1:name</a>, schema12:Text"#;
        assert_eq!(
            repair_prefixes(html, ["schema"]).unwrap(),
            r#"<a href="https://schema.org/name">schema:name</a>, schema:Text"#
        );
    }

    #[test]
    fn configured_numbered_prefixes_survive() {
        let html = "ex2:Thing ex3:Other";
        assert_eq!(repair_prefixes(html, ["ex", "ex2"]).unwrap(), "ex2:Thing ex:Other");
    }

    #[test]
    fn longer_names_are_not_touched() {
        let html = "myschema1:x schema1";
        assert_eq!(repair_prefixes(html, ["schema"]).unwrap(), html);
    }
}

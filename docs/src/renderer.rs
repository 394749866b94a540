//! Renders a [`Document`] as one ReSpec HTML page.
//!
//! Record cells are already formatted HTML fragments (hyperlinks or literal
//! text) and are inserted as-is. Anchor ids and attribute values are escaped.

use pulldown_cmark::{html, Options, Parser};
use serde_json::{json, Value};

use respecter_extract::format::escape_html;
use respecter_extract::{ClassRecord, Document, GroupedEnumerations, Ontology, PropertyRecord};

/// Where the ReSpec script is loaded from.
pub const RESPEC_SCRIPT: &str = "https://www.w3.org/Tools/respec/respec-w3c";

/// Markdown extensions accepted in ontology abstracts and descriptions.
fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH
}

/// Renders ontology prose (abstract, description) written in Markdown.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut rendered, Parser::new_ext(markdown, markdown_options()));
    rendered
}

/// The `respecConfig` object for an ontology.
pub fn respec_config(ontology: &Ontology) -> Value {
    let people = |names: &[String]| -> Vec<Value> {
        names.iter().map(|name| json!({ "name": name })).collect()
    };
    let mut config = json!({
        "specStatus": "unofficial",
        "shortName": short_name(&ontology.title),
        "editors": people(&ontology.creators),
        "authors": people(&ontology.contributors),
    });
    if !ontology.title.is_empty() {
        config["title"] = json!(ontology.title);
    }
    if !ontology.publish_date.is_empty() {
        config["publishDate"] = json!(ontology.publish_date);
    }
    config
}

/// Lowercase, hyphen-separated form of a title.
fn short_name(title: &str) -> String {
    let slug = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "ontology".to_string()
    } else {
        slug
    }
}

/// Renders the complete page.
pub fn render_document(document: &Document) -> String {
    let ontology = &document.ontology;
    // `</` would close the surrounding script element.
    let config = respec_config(ontology).to_string().replace("</", "<\\/");

    let mut body = String::new();
    body.push_str(&format!(
        "<section id=\"abstract\">\n{}</section>\n<section id=\"sotd\"></section>\n",
        markdown_to_html(&ontology.abstract_text)
    ));
    if !ontology.introduction.is_empty() {
        body.push_str(&format!(
            "<section id=\"introduction\" class=\"informative\">\n<h2>Introduction</h2>\n{}</section>\n",
            markdown_to_html(&ontology.introduction)
        ));
    }
    if !document.classes.is_empty() {
        body.push_str(&render_section(
            "classes",
            "Classes",
            document.classes.iter().map(render_class),
        ));
    }
    if !document.properties.is_empty() {
        body.push_str(&render_section(
            "properties",
            "Properties",
            document.properties.iter().map(render_property),
        ));
    }
    if !document.enumerations.is_empty() {
        body.push_str(&render_section(
            "enumerations",
            "Enumerations",
            document.enumerations.values().map(render_enumeration_group),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{script}" class="remove" defer></script>
<script class="remove">
var respecConfig = {config};
</script>
</head>
<body>
{body}</body>
</html>
"#,
        title = escape_html(&ontology.title),
        script = RESPEC_SCRIPT,
        config = config,
        body = body,
    )
}

fn render_section(id: &str, heading: &str, items: impl Iterator<Item = String>) -> String {
    let mut html = format!("<section id=\"{id}\">\n<h2>{heading}</h2>\n");
    for item in items {
        html.push_str(&item);
    }
    html.push_str("</section>\n");
    html
}

fn definition_table(rows: &[(&str, &str)]) -> String {
    let mut html = String::from("<table class=\"def\">\n");
    for (name, cell) in rows {
        if !cell.is_empty() {
            html.push_str(&format!("<tr><th>{name}</th><td>{cell}</td></tr>\n"));
        }
    }
    html.push_str("</table>\n");
    html
}

/// One sub-section per class, anchored by its fragment identifier.
pub fn render_class(class: &ClassRecord) -> String {
    format!(
        "<section id=\"{id}\">\n<h3>{label}</h3>\n<p>{definition}</p>\n{table}</section>\n",
        id = escape_html(&class.fragment_identifier),
        label = class.label,
        definition = class.definition,
        table = definition_table(&[
            ("Term", class.term.as_str()),
            ("Properties", class.property.as_str()),
        ]),
    )
}

/// One sub-section per property, anchored by its fragment identifier.
pub fn render_property(property: &PropertyRecord) -> String {
    format!(
        "<section id=\"{id}\">\n<h3>{label}</h3>\n<p>{definition}</p>\n{table}</section>\n",
        id = escape_html(&property.fragment_identifier),
        label = property.label,
        definition = property.definition,
        table = definition_table(&[
            ("Property", property.property.as_str()),
            ("Domain", property.domain.as_str()),
            ("Range", property.range.as_str()),
            ("Example", property.example.as_str()),
        ]),
    )
}

/// One sub-section per group, with a row per member anchored by the
/// member's fragment identifier.
pub fn render_enumeration_group(group: &GroupedEnumerations) -> String {
    let mut rows = String::new();
    for value in &group.enumerations {
        rows.push_str(&format!(
            "<tr id=\"{id}\"><td>{label}</td><td>{term}</td><td>{definition}</td><td>{property}</td></tr>\n",
            id = escape_html(&value.fragment_identifier),
            label = value.label,
            term = value.term,
            definition = value.definition,
            property = value.property,
        ));
    }
    format!(
        r#"<section id="{id}">
<h3>{label}</h3>
<p>{definition}</p>
<p>Term: {term}</p>
<table class="data">
<thead><tr><th>Label</th><th>Term</th><th>Definition</th><th>Used by</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
</section>
"#,
        id = escape_html(&group.fragment_identifier),
        label = group.label,
        definition = group.definition,
        term = group.term,
        rows = rows,
    )
}

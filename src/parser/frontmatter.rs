//! YAML frontmatter parsing and generation for published pages.

use crate::models::PageFrontmatter;
use anyhow::{Context, Result};

/// Frontmatter block located in a Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterBlock<'a> {
    /// YAML between the `---` markers
    pub yaml: String,
    /// Body lines after the closing marker
    pub body: Vec<&'a str>,
    /// 1-based line number of the first body line
    pub body_line: usize,
}

/// Splits a Markdown document into its frontmatter and body.
///
/// The opening `---` must be the first non-blank line. Returns `Ok(None)`
/// when the document has no frontmatter.
///
/// # Errors
///
/// Returns an error when the opening marker has no matching closing marker.
pub fn split_frontmatter(content: &str) -> Result<Option<FrontmatterBlock<'_>>> {
    let lines: Vec<&str> = content.lines().collect();

    let Some(start) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return Ok(None);
    };
    if lines[start].trim() != "---" {
        return Ok(None);
    }

    let end = lines[start + 1..]
        .iter()
        .position(|line| line.trim() == "---")
        .map(|offset| start + 1 + offset)
        .ok_or_else(|| anyhow::anyhow!("Missing frontmatter end marker (---)"))?;

    Ok(Some(FrontmatterBlock {
        yaml: lines[start + 1..end].join("\n"),
        body: lines[end + 1..].to_vec(),
        body_line: end + 2,
    }))
}

/// Parses the frontmatter of a page.
///
/// Returns `Ok(None)` when the page has no frontmatter block.
///
/// # Errors
///
/// Returns an error for an unterminated block or invalid YAML.
pub fn parse_page_frontmatter(content: &str) -> Result<Option<PageFrontmatter>> {
    let Some(block) = split_frontmatter(content)? else {
        return Ok(None);
    };

    if block.yaml.trim().is_empty() {
        return Ok(Some(PageFrontmatter::default()));
    }

    let frontmatter: PageFrontmatter =
        serde_yml::from_str(&block.yaml).context("Failed to parse YAML frontmatter")?;

    Ok(Some(frontmatter))
}

/// Generates a frontmatter block, including both `---` markers.
///
/// Tags are written one per line as `  - tag`, the layout the site
/// generator's tag plugin expects. Each scalar is emitted by `serde_yml`.
///
/// # Errors
///
/// Returns an error if a value cannot be serialized.
pub fn generate_frontmatter(frontmatter: &PageFrontmatter) -> Result<String> {
    let mut out = String::from("---\n");
    out.push_str(&format!("title: {}\n", yaml_scalar(&frontmatter.title)?));

    if let Some(icon) = &frontmatter.icon {
        out.push_str(&format!("icon: {}\n", yaml_scalar(icon)?));
    }

    if !frontmatter.extra_css.is_empty() {
        out.push_str("extra_css:\n");
        for css in &frontmatter.extra_css {
            out.push_str(&format!("  - {}\n", yaml_scalar(css)?));
        }
    }

    out.push_str("tags:\n");
    for tag in &frontmatter.tags {
        out.push_str(&format!("  - {}\n", yaml_scalar(tag)?));
    }

    out.push_str("---\n");
    Ok(out)
}

/// Serializes one string as a single-line YAML scalar.
///
/// # Errors
///
/// Returns an error if `serde_yml` rejects the value.
pub fn yaml_scalar(value: &str) -> Result<String> {
    // YAML 1.1 booleans
    const YAML11_BOOLS: &[&str] = &["y", "n", "yes", "no", "on", "off"];

    let single_line = value.replace(['\r', '\n'], " ");
    let emitted = serde_yml::to_string(&single_line)
        .with_context(|| format!("Failed to serialize YAML value: {single_line}"))?;
    let emitted = emitted.trim_end().to_string();

    // Long values come back folded over several lines; a JSON string is a
    // valid double-quoted YAML scalar.
    if emitted.contains('\n') {
        return serde_json::to_string(&single_line).context("Failed to serialize YAML value");
    }
    if emitted == single_line && YAML11_BOOLS.contains(&single_line.to_ascii_lowercase().as_str()) {
        return Ok(format!("'{single_line}'"));
    }
    Ok(emitted)
}

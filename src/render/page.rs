//! Theme page generation.

// Allow format! appended to String - more readable for building pages
#![allow(clippy::format_push_string)]

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::config::RenderConfig;
use crate::constants::THEME_PAGE_MARKER;
use crate::github::{DateStyle, RepoCreated};
use crate::models::{PageFrontmatter, ThemeEntry};
use crate::parser::generate_frontmatter;

const SHIELDS: &str = "https://img.shields.io";

/// Escapes text placed inside HTML elements or attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Value of the `Created on` badge, URL-encoded.
///
/// Uses the repository creation date, then the catalog release date, then
/// `Unknown`.
#[must_use]
pub fn created_badge_value(entry: &ThemeEntry, created: Option<&RepoCreated>) -> String {
    if let Some(created) = created {
        return created.encoded(DateStyle::Readable);
    }
    if let Some(released) = entry.released {
        return urlencoding::encode(&released.format("%B %Y").to_string()).into_owned();
    }
    "Unknown".to_string()
}

/// Renders the complete Markdown page of a theme.
///
/// # Errors
///
/// Returns an error if the frontmatter cannot be serialized.
pub fn render_page(
    entry: &ThemeEntry,
    created: Option<&RepoCreated>,
    config: &RenderConfig,
    generated_at: DateTime<Local>,
) -> Result<String> {
    let frontmatter = PageFrontmatter {
        title: entry.title.clone(),
        icon: config.icon.clone(),
        extra_css: config.extra_css.clone(),
        tags: entry.tags.clone(),
    };

    let repo_url = entry.repo.web_url();
    let title_html = escape_html(&entry.title);

    let mut page = generate_frontmatter(&frontmatter)?;
    page.push_str(&format!("<div style=\"{THEME_PAGE_MARKER}\"> </div>\n\n"));

    page.push_str("<h1>\n");
    page.push_str(&format!("    <a href=\"{repo_url}\">{title_html}</a>\n"));
    page.push_str(&format!(
        "    <sub>By <a href=\"{}\">{}</a></sub>\n",
        entry.repo.owner_url(),
        escape_html(entry.author_display())
    ));
    page.push_str("</h1>\n\n");

    page.push_str(&format!(
        "[![{} Theme Screenshot]({})]({repo_url})\n",
        entry.title, entry.main_screenshot
    ));
    page.push_str(&images_block(&entry.additional_images));
    page.push_str("\n\n");

    if let Some(excerpt) = &entry.excerpt {
        for line in excerpt.trim().lines() {
            page.push_str(&format!("> {line}\n"));
        }
        page.push('\n');
    }

    page.push_str(&info_row(entry, created, &config.badge_color));
    page.push('\n');

    let details = details_list(entry);
    if !details.is_empty() {
        page.push_str(&details);
        page.push('\n');
    }

    page.push_str(&generated_at.format("Generated on %B %d, %Y at %I:%M %p").to_string());
    page.push('\n');
    Ok(page)
}

fn images_block(urls: &[String]) -> String {
    if urls.is_empty() {
        return String::new();
    }

    let mut cells = String::new();
    for url in urls {
        cells.push_str(&format!(
            "    <td><img src=\"{}\" alt=\"Additional Screenshot\" style=\"max-width: 200px; height: auto;\"></td>\n",
            escape_html(url)
        ));
    }

    format!(
        "<table style=\"width: 100%; border-collapse: collapse; margin-top: 10px;\">\n  <tr>\n{cells}  </tr>\n</table>"
    )
}

fn info_row(entry: &ThemeEntry, created: Option<&RepoCreated>, color: &str) -> String {
    let repo = &entry.repo;
    let style = format!("color={color}&amp;logo=github&amp;style=for-the-badge");
    let badges = [
        format!("{SHIELDS}/github/stars/{repo}?{style}"),
        format!("{SHIELDS}/github/issues/{repo}?{style}"),
        format!("{SHIELDS}/github/issues-pr/{repo}?{style}"),
        format!(
            "{SHIELDS}/badge/Created%20on-{}-blue?{style}",
            created_badge_value(entry, created)
        ),
        format!(
            "{SHIELDS}/github/last-commit/{repo}?color={color}&amp;label=last%20update&amp;logo=github&amp;style=for-the-badge"
        ),
    ];

    let mut out = String::from("<div class=\"inforow\">\n    <table>\n        <tbody>\n            <tr>\n");
    for badge in badges {
        out.push_str(&format!("                <td><img src=\"{badge}\"></td>\n"));
    }
    out.push_str("            </tr>\n        </tbody>\n    </table>\n</div>\n");
    out
}

fn details_list(entry: &ThemeEntry) -> String {
    let mut items = Vec::new();

    if !entry.modes.is_empty() {
        items.push(format!("- **Modes**: {}", entry.modes.join(", ")));
    }
    if let Some(palettes) = entry.palettes {
        items.push(format!("- **Palettes**: {palettes}"));
    }
    if let Some(style_settings) = entry.style_settings {
        let answer = if style_settings { "Yes" } else { "No" };
        items.push(format!("- **Style Settings**: {answer}"));
    }
    if let Some(accessibility) = &entry.accessibility {
        items.push(format!("- **Accessibility**: {}", accessibility.trim()));
    }
    if let Some(released) = entry.released {
        items.push(format!("- **Released**: {}", released.format("%B %d, %Y")));
    }

    if items.is_empty() {
        String::new()
    } else {
        format!("{}\n", items.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddonEntry, OfficialTheme};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn entry() -> ThemeEntry {
        let official = OfficialTheme {
            name: "Atom".to_string(),
            author: "kognise".to_string(),
            repo: "kognise/obsidian-atom".to_string(),
            screenshot: "screenshot.png".to_string(),
            modes: vec![],
        };
        let addon = AddonEntry {
            tags: vec!["dark".to_string(), "minimalistic".to_string()],
            ..AddonEntry::new("kognise/obsidian-atom")
        };
        ThemeEntry::from_catalog(&official, &addon).unwrap()
    }

    fn generated_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 1, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_render_page_exact_layout() {
        let created = RepoCreated(Utc.with_ymd_and_hms(2020, 3, 4, 0, 0, 0).unwrap());
        let page =
            render_page(&entry(), Some(&created), &RenderConfig::default(), generated_at()).unwrap();

        let expected = "---
title: Atom
tags:
  - dark
  - minimalistic
---
<div style=\"theme_page_template_version_1\"> </div>

<h1>
    <a href=\"https://github.com/kognise/obsidian-atom\">Atom</a>
    <sub>By <a href=\"https://github.com/kognise\">kognise</a></sub>
</h1>

[![Atom Theme Screenshot](https://raw.githubusercontent.com/kognise/obsidian-atom/HEAD/screenshot.png)](https://github.com/kognise/obsidian-atom)


<div class=\"inforow\">
    <table>
        <tbody>
            <tr>
                <td><img src=\"https://img.shields.io/github/stars/kognise/obsidian-atom?color=573E7A&amp;logo=github&amp;style=for-the-badge\"></td>
                <td><img src=\"https://img.shields.io/github/issues/kognise/obsidian-atom?color=573E7A&amp;logo=github&amp;style=for-the-badge\"></td>
                <td><img src=\"https://img.shields.io/github/issues-pr/kognise/obsidian-atom?color=573E7A&amp;logo=github&amp;style=for-the-badge\"></td>
                <td><img src=\"https://img.shields.io/badge/Created%20on-March%202020-blue?color=573E7A&amp;logo=github&amp;style=for-the-badge\"></td>
                <td><img src=\"https://img.shields.io/github/last-commit/kognise/obsidian-atom?color=573E7A&amp;label=last%20update&amp;logo=github&amp;style=for-the-badge\"></td>
            </tr>
        </tbody>
    </table>
</div>

Generated on June 01, 2024 at 02:05 PM
";
        assert_eq!(page, expected);
    }

    #[test]
    fn test_render_page_optional_sections() {
        let mut theme = entry();
        theme.additional_images = vec!["https://x/1.png".to_string()];
        theme.excerpt = Some("A calm theme.".to_string());
        theme.modes = vec!["dark".to_string(), "light".to_string()];
        theme.palettes = Some(3);
        theme.style_settings = Some(true);
        theme.released = NaiveDate::from_ymd_opt(2021, 7, 9);

        let mut config = RenderConfig::default();
        config.icon = Some("material/palette".to_string());
        config.extra_css = vec!["assets/atom.css".to_string()];

        let page = render_page(&theme, None, &config, generated_at()).unwrap();

        assert!(page.starts_with(
            "---\ntitle: Atom\nicon: material/palette\nextra_css:\n  - assets/atom.css\ntags:\n"
        ));
        assert!(page.contains("<td><img src=\"https://x/1.png\" alt=\"Additional Screenshot\" style=\"max-width: 200px; height: auto;\"></td>"));
        assert!(page.contains("\n> A calm theme.\n\n<div class=\"inforow\">"));
        assert!(page.contains("Created%20on-July%202021-blue"));
        assert!(page.contains("- **Modes**: dark, light\n- **Palettes**: 3\n- **Style Settings**: Yes\n- **Released**: July 09, 2021\n"));
    }

    #[test]
    fn test_created_badge_unknown() {
        assert_eq!(created_badge_value(&entry(), None), "Unknown");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Tom & \"Jerry\" <3"), "Tom &amp; &quot;Jerry&quot; &lt;3");
    }
}

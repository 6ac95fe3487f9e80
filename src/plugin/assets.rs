use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const PLACEHOLDER_CANVAS_PX: u32 = 144;

const GITIGNORE: &str = "node_modules/\n*.log\n.DS_Store\n*.streamDeckPlugin\n.env\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    pub name: &'static str,
    /// Standard-density edge length in pixels; the high-density variant is twice this.
    pub base_size: u32,
    pub color: &'static str,
    pub glyph: Option<&'static str>,
}

pub const ICON_CATALOG: [IconSpec; 7] = [
    IconSpec {
        name: "pluginIcon",
        base_size: 256,
        color: "#4CAF50",
        glyph: None,
    },
    IconSpec {
        name: "categoryIcon",
        base_size: 28,
        color: "#2196F3",
        glyph: None,
    },
    IconSpec {
        name: "clockin",
        base_size: 72,
        color: "#4CAF50",
        glyph: Some("▶"),
    },
    IconSpec {
        name: "clockout",
        base_size: 72,
        color: "#F44336",
        glyph: Some("■"),
    },
    IconSpec {
        name: "pause",
        base_size: 72,
        color: "#FF9800",
        glyph: Some("❚❚"),
    },
    IconSpec {
        name: "resume",
        base_size: 72,
        color: "#4CAF50",
        glyph: Some("▶"),
    },
    IconSpec {
        name: "status",
        base_size: 72,
        color: "#2196F3",
        glyph: Some("ℹ"),
    },
];

impl IconSpec {
    pub fn svg_file_name(&self) -> String {
        format!("{}.svg", self.name)
    }
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn placeholder_svg(spec: &IconSpec) -> String {
    let px = PLACEHOLDER_CANVAS_PX;
    let mut svg = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <svg width=\"{px}\" height=\"{px}\" viewBox=\"0 0 {px} {px}\" xmlns=\"http://www.w3.org/2000/svg\">\n    \
         <rect width=\"{px}\" height=\"{px}\" fill=\"{}\" rx=\"20\"/>\n",
        escape_xml(spec.color)
    );
    if let Some(glyph) = spec.glyph {
        svg.push_str(&format!(
            "    <text x=\"{}\" y=\"95\" font-family=\"Arial\" font-size=\"72\" fill=\"white\" text-anchor=\"middle\">{}</text>\n",
            px / 2,
            escape_xml(glyph)
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

pub fn ensure_images_dir(images_dir: &Path) -> Result<bool> {
    if images_dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(images_dir)
        .with_context(|| format!("failed to create {}", images_dir.display()))?;
    Ok(true)
}

#[derive(Debug, Clone, Default)]
pub struct PlaceholderOutcome {
    pub created: Vec<String>,
    pub existing: Vec<String>,
}

/// Write a placeholder SVG for every catalog icon that has none. Existing
/// files are never touched, hand-crafted or not.
pub fn materialize_placeholders(
    images_dir: &Path,
    catalog: &[IconSpec],
) -> Result<PlaceholderOutcome> {
    ensure_images_dir(images_dir)?;
    let mut outcome = PlaceholderOutcome::default();
    for spec in catalog {
        let file_name = spec.svg_file_name();
        let path = images_dir.join(&file_name);
        if path.exists() {
            outcome.existing.push(file_name);
            continue;
        }
        fs::write(&path, placeholder_svg(spec))
            .with_context(|| format!("failed to write {}", path.display()))?;
        outcome.created.push(file_name);
    }
    Ok(outcome)
}

#[derive(Debug, Clone, Default)]
pub struct RequiredFilesOutcome {
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

pub fn check_required_files(plugin_dir: &Path, names: &[String]) -> RequiredFilesOutcome {
    let mut outcome = RequiredFilesOutcome::default();
    for name in names {
        if plugin_dir.join(name).exists() {
            outcome.present.push(name.clone());
        } else {
            outcome.missing.push(name.clone());
        }
    }
    outcome
}

pub fn ensure_gitignore(project_root: &Path) -> Result<bool> {
    let path = project_root.join(".gitignore");
    if path.exists() {
        return Ok(false);
    }
    fs::write(&path, GITIGNORE).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

//! Column-aligned rendering for `sk search`, `sk category` and `sk list`.

use crossterm::style::Stylize;
use sk_core::{LocalEntry, Provenance, Repository};
use sk_schema::CatalogEntry;

use super::theme::{Theme, truncate};

/// Header for registry listings
pub fn print_catalog_header() {
    let theme = Theme::default();
    let header = format!(
        "  {:<nw$} {:<cw$} {}",
        "name",
        "category",
        "description",
        nw = theme.layout.name_width,
        cw = theme.layout.category_width,
    );
    println!("{}", header.with(theme.colors.header));
}

/// One registry entry
pub fn print_catalog_row(entry: &CatalogEntry) {
    let theme = Theme::default();
    let name = format!("{:<w$}", entry.name, w = theme.layout.name_width);
    let category = format!(
        "{:<w$}",
        truncate(&entry.category, theme.layout.category_width),
        w = theme.layout.category_width
    );
    println!(
        "  {} {} {}",
        name.with(theme.colors.name),
        category.with(theme.colors.secondary),
        truncate(&entry.description, theme.layout.description_width)
    );
}

/// Footer naming the result count and where the data came from
pub fn print_catalog_footer(count: usize, provenance: Provenance) {
    let noun = if count == 1 { "skill" } else { "skills" };
    println!();
    println!("{}", format!("  {count} {noun} ({provenance})").dark_grey());
}

/// One GitHub repository with its star count and install hint
pub fn print_repository_row(index: usize, repo: &Repository) {
    let theme = Theme::default();
    let rank = format!("{index:>2}.");
    println!(
        "  {} {}  {}",
        rank.with(theme.colors.success),
        repo.full_name.as_str().with(theme.colors.name),
        format!("★ {}", repo.stars).with(theme.colors.secondary)
    );
    if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
        println!(
            "      {}",
            truncate(description, theme.layout.description_width)
        );
    }
    println!(
        "      {}",
        format!("sk install {}", repo.full_name).with(theme.colors.secondary)
    );
}

/// Header for `sk list`
pub fn print_installed_header() {
    let theme = Theme::default();
    let header = format!(
        "  {:<nw$} {:<10} {}",
        "name",
        "installed",
        "description",
        nw = theme.layout.name_width,
    );
    println!("{}", header.with(theme.colors.header));
}

/// One installed skill
pub fn print_installed_row(entry: &LocalEntry) {
    let theme = Theme::default();
    let name = format!("{:<w$}", entry.name, w = theme.layout.name_width);
    let date = entry.installed_at.format("%Y-%m-%d").to_string();
    println!(
        "  {} {} {}",
        name.with(theme.colors.name),
        date.with(theme.colors.secondary),
        truncate(&entry.description, theme.layout.description_width)
    );
}

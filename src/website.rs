use std::io::ErrorKind;
use std::path::Path;

use crate::error::ReportError;
use crate::model::movie::{Catalog, Movie};

pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn movie_item(movie: &Movie) -> String {
    let title = escape_html(&movie.title);
    format!(
        r#"
        <li class="movie">
            <img class="movie-poster" src="{}" alt="{} poster"/>
            <div class="movie-title">{}</div>
            <div class="movie-year">{}</div>
        </li>
"#,
        escape_html(&movie.poster),
        title,
        title,
        escape_html(&movie.year)
    )
}

/// One list item per movie goes into the movie-grid placeholder.
pub fn render_page(template: &str, catalog: &Catalog, page_title: &str) -> String {
    let grid: String = catalog.iter().map(movie_item).collect();
    template
        .replace(TITLE_PLACEHOLDER, &escape_html(page_title))
        .replace(GRID_PLACEHOLDER, &grid)
}

pub fn generate_website(
    catalog: &Catalog,
    template_path: &Path,
    output_path: &Path,
    page_title: &str,
) -> Result<(), ReportError> {
    let template = std::fs::read_to_string(template_path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ReportError::TemplateNotFound(template_path.to_path_buf())
        } else {
            ReportError::Io {
                path: template_path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let page = render_page(&template, catalog, page_title);
    std::fs::write(output_path, page).map_err(|e| ReportError::Io {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    log::info!(
        "Wrote page with {} movies to {}",
        catalog.len(),
        output_path.display()
    );
    Ok(())
}

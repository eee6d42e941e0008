use crate::model::movie::{Catalog, Movie};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatedTitle<'a> {
    pub title: &'a str,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats<'a> {
    pub average: f64,
    pub median: f64,
    pub best: RatedTitle<'a>,
    pub worst: RatedTitle<'a>,
    pub counted: usize,
}

/// Statistics over the movies with a known rating, `None` if there are none.
///
/// Ratings are ordered by `(rating, title)`: on a tie the best movie is the
/// greatest title and the worst movie the smallest one.
pub fn compute_stats(catalog: &Catalog) -> Option<CatalogStats<'_>> {
    let mut rated: Vec<RatedTitle> = catalog
        .iter()
        .filter_map(|m| {
            m.rating.stat_value().map(|rating| RatedTitle {
                title: m.title.as_str(),
                rating,
            })
        })
        .collect();

    if rated.is_empty() {
        return None;
    }

    rated.sort_by(|a, b| {
        a.rating
            .total_cmp(&b.rating)
            .then_with(|| a.title.cmp(b.title))
    });

    let count = rated.len();
    let average = rated.iter().map(|r| r.rating).sum::<f64>() / count as f64;
    let median = if count % 2 == 1 {
        rated[count / 2].rating
    } else {
        (rated[count / 2 - 1].rating + rated[count / 2].rating) / 2.0
    };

    Some(CatalogStats {
        average,
        median,
        best: rated[count - 1],
        worst: rated[0],
        counted: count,
    })
}

/// All movies, highest rating first. Movies without a numeric rating sort as
/// zero; equal ratings keep catalog order.
pub fn sorted_by_rating(catalog: &Catalog) -> Vec<&Movie> {
    let mut movies: Vec<&Movie> = catalog.iter().collect();
    movies.sort_by(|a, b| {
        b.rating.sort_value().total_cmp(&a.rating.sort_value())
    });
    movies
}

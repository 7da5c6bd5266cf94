//! TMDB movie genre ids.
//!
//! Users' movies carry genre names; discover queries need ids.

const GENRES: [(&str, u32); 18] = [
    ("Action", 28),
    ("Adventure", 12),
    ("Animation", 16),
    ("Comedy", 35),
    ("Crime", 80),
    ("Documentary", 99),
    ("Drama", 18),
    ("Family", 10751),
    ("Fantasy", 14),
    ("History", 36),
    ("Horror", 27),
    ("Music", 10402),
    ("Mystery", 9648),
    ("Romance", 10749),
    ("Science Fiction", 878),
    ("Thriller", 53),
    ("War", 10752),
    ("Western", 37),
];

/// Catalog id for a genre name, `None` for names the catalog doesn't know
pub fn genre_id(name: &str) -> Option<u32> {
    GENRES
        .iter()
        .find(|(genre, _)| *genre == name)
        .map(|(_, id)| *id)
}

/// Ids for every known name, in input order
pub fn genre_ids<S: AsRef<str>>(names: &[S]) -> Vec<u32> {
    names.iter().filter_map(|n| genre_id(n.as_ref())).collect()
}

/// Genre name for a catalog id
pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRES
        .iter()
        .find(|(_, genre_id)| *genre_id == id)
        .map(|(name, _)| *name)
}

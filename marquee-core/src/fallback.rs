//! Compiled-in movies served while the upstream API is unreachable.
//!
//! Ids are local (1-6) and never reconciled with upstream ids.

use marquee_model::Movie;
use once_cell::sync::Lazy;

struct Seed {
    id: u64,
    title: &'static str,
    original_title: &'static str,
    year: i32,
    rating: f64,
    director: &'static str,
    actors: &'static [&'static str],
    genres: &'static [&'static str],
    summary: &'static str,
    poster: &'static str,
    minutes: u32,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: 1,
        title: "The Shawshank Redemption",
        original_title: "The Shawshank Redemption",
        year: 1994,
        rating: 9.7,
        director: "Frank Darabont",
        actors: &["Tim Robbins", "Morgan Freeman", "Bob Gunton"],
        genres: &["Drama", "Crime"],
        summary: "Two imprisoned men bond over a number of years, finding solace \
                  and eventual redemption through acts of common decency.",
        poster: "q6y0Go1tsGEsmtFryDOJo3dEmqu.jpg",
        minutes: 142,
    },
    Seed {
        id: 2,
        title: "Farewell My Concubine",
        original_title: "霸王别姬",
        year: 1993,
        rating: 9.6,
        director: "Chen Kaige",
        actors: &["Leslie Cheung", "Zhang Fengyi", "Gong Li", "Ge You"],
        genres: &["Drama", "Romance"],
        summary: "Two Peking opera performers share a bond that spans half a \
                  century of love, betrayal and political upheaval.",
        poster: "1UJJmJpH1gzx8MxkHJsGpbspXAj.jpg",
        minutes: 171,
    },
    Seed {
        id: 3,
        title: "Forrest Gump",
        original_title: "Forrest Gump",
        year: 1994,
        rating: 9.5,
        director: "Robert Zemeckis",
        actors: &["Tom Hanks", "Robin Wright", "Gary Sinise"],
        genres: &["Drama", "Romance"],
        summary: "A kind-hearted man with a low IQ drifts through decades of \
                  history and lives an extraordinary life.",
        poster: "saHP97rTPS5eLmrLQEcANmKrsFl.jpg",
        minutes: 142,
    },
    Seed {
        id: 4,
        title: "Léon: The Professional",
        original_title: "Léon",
        year: 1994,
        rating: 9.4,
        director: "Luc Besson",
        actors: &["Jean Reno", "Natalie Portman", "Gary Oldman"],
        genres: &["Drama", "Action", "Crime"],
        summary: "A professional hitman reluctantly takes in a twelve-year-old \
                  girl after her family is murdered.",
        poster: "3AGkAgnie7UQCnpFE7LgXYv6j4q.jpg",
        minutes: 110,
    },
    Seed {
        id: 5,
        title: "Titanic",
        original_title: "Titanic",
        year: 1997,
        rating: 9.4,
        director: "James Cameron",
        actors: &["Leonardo DiCaprio", "Kate Winslet", "Billy Zane"],
        genres: &["Drama", "Romance", "Disaster"],
        summary: "Two passengers from different classes fall in love aboard the \
                  ill-fated maiden voyage of the Titanic.",
        poster: "9xjZS2rlVxm8SFx8kPC3aIGCOYQ.jpg",
        minutes: 194,
    },
    Seed {
        id: 6,
        title: "Spirited Away",
        original_title: "千と千尋の神隠し",
        year: 2001,
        rating: 9.4,
        director: "Hayao Miyazaki",
        actors: &["Rumi Hiiragi", "Miyu Irino", "Mari Natsuki"],
        genres: &["Drama", "Animation", "Fantasy"],
        summary: "A young girl wanders into a world of spirits and must work \
                  there to free her parents.",
        poster: "39wmItIWsg5sZMyRUHLkWBcuVCM.jpg",
        minutes: 125,
    },
];

const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500/";

static FALLBACK_MOVIES: Lazy<Vec<Movie>> = Lazy::new(|| {
    SEEDS
        .iter()
        .map(|seed| Movie {
            id: seed.id,
            title: seed.title.to_string(),
            original_title: seed.original_title.to_string(),
            year: seed.year,
            rating: seed.rating,
            director: seed.director.to_string(),
            actors: seed.actors.iter().map(|a| a.to_string()).collect(),
            genres: seed.genres.iter().map(|g| g.to_string()).collect(),
            summary: seed.summary.to_string(),
            poster_url: format!("{POSTER_BASE}{}", seed.poster),
            duration: format!("{} minutes", seed.minutes),
            ..Movie::default()
        })
        .collect()
});

/// Every fallback movie, in display order.
pub fn all() -> &'static [Movie] {
    FALLBACK_MOVIES.as_slice()
}

pub fn find(id: u64) -> Option<&'static Movie> {
    FALLBACK_MOVIES.iter().find(|movie| movie.id == id)
}

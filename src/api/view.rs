use serde::Serialize;

use crate::model::{MovieCard, TrendingMovie};
use crate::page::Page;

#[derive(Debug, Serialize)]
pub struct TrendingItem {
    pub rank: usize,
    pub title: String,
    pub poster_url: String,
    pub searches: Option<u32>,
}

/// Everything the page template renders.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub trending: Vec<TrendingItem>,
    pub query: String,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub movies: Vec<MovieCard>,
}

impl PageView {
    pub fn of(page: &Page) -> Self {
        let search = page.search();

        let trending = page
            .trending()
            .iter()
            .enumerate()
            .map(|(index, movie)| trending_item(index + 1, movie))
            .collect();

        Self {
            trending,
            query: search.query,
            is_loading: search.is_loading,
            error_message: search.error_message,
            movies: search.movies.iter().map(MovieCard::from).collect(),
        }
    }
}

fn trending_item(rank: usize, movie: &TrendingMovie) -> TrendingItem {
    TrendingItem {
        rank,
        title: movie.title.clone().unwrap_or_default(),
        poster_url: movie.poster_url(),
        searches: movie.searches,
    }
}

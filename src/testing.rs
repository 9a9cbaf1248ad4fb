//! In-memory stand-ins for the remote services.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use axum::Router;
use futures::future::BoxFuture;
use futures::FutureExt as _;
use reqwest::StatusCode;
use url::Url;

use crate::model::{Movie, MovieId, SearchLogEntry};
use crate::service::backend::{Account, BackendError, Identity, LogStore};
use crate::service::tmdb::{FetchError, Listing, MovieSource};

/// Serves `router` on a free local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    format!("http://{address}")
}

pub fn movie(id: i64, title: &str) -> Movie {
    Movie::new(MovieId::new(id), Some(title.to_string()))
}

pub fn entry(term: &str, movie_id: Option<i64>) -> SearchLogEntry {
    SearchLogEntry::new(
        term.to_string(),
        movie_id.map(MovieId::new),
        movie_id.map(|id| format!("movie {id}")),
        None,
        None,
    )
}

fn unavailable(status: StatusCode) -> BackendError {
    BackendError::Status {
        url: Url::parse("memory://backend").unwrap(),
        status,
    }
}

/// An append-only log kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<SearchLogEntry>>,
    failing: bool,
}

impl MemoryLog {
    /// A log whose remote calls all fail. [MemoryLog::push] still works.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn push(&self, entry: SearchLogEntry) {
        self.entries.lock().unwrap().push(entry);
    }

    /// Oldest first.
    pub fn entries(&self) -> Vec<SearchLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl LogStore for MemoryLog {
    fn append<'a>(&'a self, entry: &'a SearchLogEntry) -> BoxFuture<'a, Result<(), BackendError>> {
        let result = if self.failing {
            Err(unavailable(StatusCode::SERVICE_UNAVAILABLE))
        } else {
            self.push(entry.clone());
            Ok(())
        };
        futures::future::ready(result).boxed()
    }

    fn recent(&self, limit: usize) -> BoxFuture<'_, Result<Vec<SearchLogEntry>, BackendError>> {
        let result = if self.failing {
            Err(unavailable(StatusCode::SERVICE_UNAVAILABLE))
        } else {
            let entries = self.entries.lock().unwrap();
            Ok(entries.iter().rev().take(limit).cloned().collect())
        };
        futures::future::ready(result).boxed()
    }
}

/// Answers every listing with `default` unless told otherwise.
#[derive(Debug, Default)]
pub struct FakeMovies {
    default: Vec<Movie>,
    listings: HashMap<String, Vec<Movie>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeMovies {
    pub fn new(default: Vec<Movie>) -> Self {
        Self {
            default,
            ..Default::default()
        }
    }

    pub fn with(mut self, path: &str, movies: Vec<Movie>) -> Self {
        self.listings.insert(path.to_string(), movies);
        self
    }

    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    /// Paths of every listing asked for, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl MovieSource for FakeMovies {
    fn movies<'a>(&'a self, listing: Listing<'a>) -> BoxFuture<'a, Result<Vec<Movie>, FetchError>> {
        let path = listing.path();
        self.calls.lock().unwrap().push(path.clone());

        let result = if self.failing.contains(&path) {
            Err(FetchError::Status {
                url: path,
                status: StatusCode::INTERNAL_SERVER_ERROR,
            })
        } else {
            Ok(self.listings.get(&path).unwrap_or(&self.default).clone())
        };
        futures::future::ready(result).boxed()
    }
}

#[derive(Debug)]
pub struct FakeIdentity {
    account: Mutex<Option<Account>>,
    available: bool,
    hanging: bool,
    created: AtomicUsize,
}

impl FakeIdentity {
    pub fn signed_in(id: &str) -> Self {
        Self {
            account: Mutex::new(Some(Account::new(id.to_string()))),
            available: true,
            hanging: false,
            created: AtomicUsize::new(0),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            account: Mutex::new(None),
            available: true,
            hanging: false,
            created: AtomicUsize::new(0),
        }
    }

    /// Nobody is signed in and nobody can sign in.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::signed_out()
        }
    }

    /// Never answers, like a backend that does not respond.
    pub fn hanging() -> Self {
        Self {
            hanging: true,
            ..Self::signed_out()
        }
    }

    /// How many anonymous sessions have been created.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl Identity for FakeIdentity {
    fn current(&self) -> BoxFuture<'_, Result<Account, BackendError>> {
        if self.hanging {
            return futures::future::pending().boxed();
        }

        let account = self.account.lock().unwrap().clone();
        futures::future::ready(account.ok_or_else(|| unavailable(StatusCode::UNAUTHORIZED))).boxed()
    }

    fn create_anonymous(&self) -> BoxFuture<'_, Result<Account, BackendError>> {
        let result = if self.available {
            let account = Account::new("anonymous".to_string());
            *self.account.lock().unwrap() = Some(account.clone());
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(account)
        } else {
            Err(unavailable(StatusCode::SERVICE_UNAVAILABLE))
        };
        futures::future::ready(result).boxed()
    }
}

use serde::de::IgnoredAny;
use serde_json::{json, Value};
use snafu::OptionExt as _;
use tracing::instrument;

use super::*;

/// Anyone may read the log, signed-in users may write to it.
const PERMISSIONS: [&str; 4] = [
    r#"read("any")"#,
    r#"update("user:*")"#,
    r#"delete("user:*")"#,
    r#"create("user:*")"#,
];

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<Value>,
}

impl DocumentList {
    /// Documents that do not read as a log entry are left out, the rest of
    /// the window still counts.
    fn entries(self) -> Vec<SearchLogEntry> {
        self.documents
            .into_iter()
            .filter_map(|document| {
                serde_json::from_value(document)
                    .map_err(|error| tracing::warn!(%error, "skipping malformed search log document"))
                    .ok()
            })
            .collect()
    }
}

impl Backend {
    fn documents_url(&self) -> Result<Url> {
        let collection = self.collection.as_ref().context(ConfigMissingSnafu {
            names: self.missing.clone(),
        })?;

        Ok(self.url(&[
            "databases",
            &collection.database_id,
            "collections",
            &collection.collection_id,
            "documents",
        ]))
    }

    #[instrument(skip(self, entry), fields(search_term = %entry.search_term, movie_id = ?entry.movie_id))]
    pub async fn create_document(&self, entry: &SearchLogEntry) -> Result<()> {
        let url = self.documents_url()?;
        let payload = json!({
            "documentId": "unique()",
            "data": entry,
            "permissions": PERMISSIONS,
        });

        let request = self.request(Method::POST, url.clone()).json(&payload);
        self.send::<IgnoredAny>(request, url).await?;

        tracing::debug!("appended search log entry");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_documents(&self, limit: usize) -> Result<Vec<SearchLogEntry>> {
        let url = self.documents_url()?;
        let queries = [
            json!({ "method": "orderDesc", "attribute": "createdAt" }).to_string(),
            json!({ "method": "limit", "values": [limit] }).to_string(),
        ];

        let request = self
            .request(Method::GET, url.clone())
            .query(&[("queries[]", &queries[0]), ("queries[]", &queries[1])]);
        let list: DocumentList = self.send(request, url).await?;
        let entries = list.entries();

        tracing::debug!(count = entries.len(), "read search log");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;

    use super::*;
    use crate::model::MovieId;
    use crate::testing::serve;

    #[derive(Debug, Clone, Default)]
    struct Seen {
        bodies: Arc<Mutex<Vec<Value>>>,
        queries: Arc<Mutex<Vec<(String, String)>>>,
        projects: Arc<Mutex<Vec<String>>>,
    }

    async fn create(
        State(seen): State<Seen>, headers: HeaderMap, axum::Json(body): axum::Json<Value>,
    ) -> (StatusCode, axum::Json<Value>) {
        remember_project(&seen, &headers);
        seen.bodies.lock().unwrap().push(body);
        (StatusCode::CREATED, axum::Json(json!({ "$id": "generated" })))
    }

    async fn list(
        State(seen): State<Seen>, headers: HeaderMap,
        Query(queries): Query<Vec<(String, String)>>,
    ) -> axum::Json<Value> {
        remember_project(&seen, &headers);
        seen.queries.lock().unwrap().extend(queries);
        axum::Json(json!({
            "total": 2,
            "documents": [
                { "$id": "b", "searchTerm": "alien", "movieId": 348, "title": "Alien",
                  "posterPath": "/alien.jpg", "voteAverage": 8.1,
                  "createdAt": "2024-05-02T10:00:00.000+00:00" },
                { "$id": "a", "searchTerm": "zzz", "movieId": null,
                  "createdAt": "2024-05-01T10:00:00.000+00:00" }
            ]
        }))
    }

    fn remember_project(seen: &Seen, headers: &HeaderMap) {
        if let Some(project) = headers.get(PROJECT_HEADER).and_then(|v| v.to_str().ok()) {
            seen.projects.lock().unwrap().push(project.to_string());
        }
    }

    async fn fake_backend() -> (Backend, Seen) {
        let seen = Seen::default();
        let router = Router::new()
            .route(
                "/v1/databases/main/collections/searches/documents",
                post(create).get(list),
            )
            .with_state(seen.clone());

        let endpoint = format!("{}/v1", serve(router).await);
        let backend = Backend::from_config(&super::super::tests::config(&endpoint)).unwrap();
        (backend, seen)
    }

    #[tokio::test]
    async fn appends_a_document_with_permissions() {
        let (backend, seen) = fake_backend().await;
        let entry = SearchLogEntry::new(
            "alien".to_string(),
            Some(MovieId::new(348)),
            Some("Alien".to_string()),
            None,
            Some(8.1),
        );

        backend.append(&entry).await.unwrap();

        let bodies = seen.bodies.lock().unwrap();
        let body = &bodies[0];
        assert_eq!(body["documentId"], "unique()");
        assert_eq!(body["data"]["searchTerm"], "alien");
        assert_eq!(body["data"]["movieId"], 348);
        assert!(body["data"]["posterPath"].is_null());
        assert_eq!(body["permissions"][0], r#"read("any")"#);
        assert_eq!(*seen.projects.lock().unwrap(), vec!["movies".to_string()]);
    }

    #[tokio::test]
    async fn lists_recent_documents_newest_first() {
        let (backend, seen) = fake_backend().await;

        let entries = backend.recent(200).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].movie_id, Some(MovieId::new(348)));
        assert_eq!(entries[1].movie_id, None);

        let queries = seen.queries.lock().unwrap();
        let values: Vec<Value> = queries
            .iter()
            .map(|(key, value)| {
                assert_eq!(key, "queries[]");
                serde_json::from_str(value).unwrap()
            })
            .collect();
        assert_eq!(
            values,
            vec![
                json!({ "method": "orderDesc", "attribute": "createdAt" }),
                json!({ "method": "limit", "values": [200] }),
            ]
        );
    }

    #[tokio::test]
    async fn malformed_documents_do_not_hide_the_rest() {
        let router = Router::new().route(
            "/v1/databases/main/collections/searches/documents",
            axum::routing::get(|| async {
                axum::Json(json!({
                    "total": 4,
                    "documents": [
                        { "$id": "d", "searchTerm": "alien", "movieId": 348,
                          "createdAt": "2024-05-03T10:00:00.000+00:00" },
                        { "$id": "c", "searchTerm": "legacy", "movieId": 348 },
                        { "$id": "b", "searchTerm": "odd", "movieId": "not a number",
                          "createdAt": "2024-05-02T10:00:00.000+00:00" },
                        { "$id": "a", "searchTerm": "alien 1979", "movieId": 348,
                          "createdAt": "2024-05-01T10:00:00.000+00:00" }
                    ]
                }))
            }),
        );
        let endpoint = format!("{}/v1", serve(router).await);
        let backend = Backend::from_config(&super::super::tests::config(&endpoint)).unwrap();

        let entries = backend.recent(200).await.unwrap();
        let terms: Vec<&str> = entries.iter().map(|entry| entry.search_term.as_str()).collect();
        assert_eq!(terms, vec!["alien", "alien 1979"]);

        let trending = crate::service::trending::compute_trending(&backend, 10).await;
        assert_eq!(trending.len(), 1);
        assert_eq!(trending[0].movie_id, MovieId::new(348));
        assert_eq!(trending[0].count, 2);
    }

    #[tokio::test]
    async fn store_errors_surface_as_status() {
        let router = Router::new().route(
            "/v1/databases/main/collections/searches/documents",
            post(|| async { StatusCode::UNAUTHORIZED }),
        );
        let endpoint = format!("{}/v1", serve(router).await);
        let backend = Backend::from_config(&super::super::tests::config(&endpoint)).unwrap();

        let entry = SearchLogEntry::new("x".to_string(), None, None, None, None);
        let error = backend.append(&entry).await.unwrap_err();
        assert!(matches!(error, BackendError::Status { status, .. } if status == StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn documents_need_a_collection() {
        let mut config = super::super::tests::config("https://cloud.appwrite.io/v1");
        config.collection_id = None;
        let backend = Backend::from_config(&config).unwrap();

        let error = backend.recent(200).await.unwrap_err();
        assert!(
            matches!(&error, BackendError::ConfigMissing { names } if names == &vec!["APPWRITE_COLLECTION_ID"])
        );
    }
}

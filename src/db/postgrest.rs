use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::store::{TableQuery, TableStore};
use crate::error::PortfolioError;

const REST_PATH: &str = "rest/v1/";

/// Hosted table store reached through PostgREST (`{url}/rest/v1/{table}`).
#[derive(Clone)]
pub struct PostgrestStore {
    client: reqwest::Client,
    rest_base: Url,
}

impl PostgrestStore {
    /// Build a store client for `base_url` authenticated with `anon_key`.
    pub fn new(
        base_url: &Url,
        anon_key: &str,
        proxy: Option<&Url>,
    ) -> Result<Self, PortfolioError> {
        let mut headers = HeaderMap::new();
        let mut apikey = HeaderValue::from_str(anon_key)
            .map_err(|_| PortfolioError::MissingConfig("SUPABASE_ANON_KEY"))?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {anon_key}"))
            .map_err(|_| PortfolioError::MissingConfig("SUPABASE_ANON_KEY"))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("folio-nexus/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);
        // Only the configured proxy is used; `HTTP(S)_PROXY` is ignored.
        builder = match proxy {
            Some(proxy_url) => builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?),
            None => builder.no_proxy(),
        };
        let client = builder.build()?;

        Ok(Self {
            client,
            rest_base: rest_base(base_url)?,
        })
    }

    /// Full request URL for `query`.
    pub fn request_url(&self, query: &TableQuery) -> Result<Url, PortfolioError> {
        let mut url = self.rest_base.join(&query.table)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            if let Some(column) = query.order_by.as_deref() {
                pairs.append_pair("order", &format!("{column}.asc"));
            }
            if query.single {
                pairs.append_pair("limit", "1");
            }
        }
        Ok(url)
    }
}

/// `https://x.supabase.co` and `https://x.supabase.co/` both map to
/// `https://x.supabase.co/rest/v1/`.
fn rest_base(base_url: &Url) -> Result<Url, PortfolioError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(REST_PATH)?)
}

#[async_trait]
impl TableStore for PostgrestStore {
    async fn select(&self, query: &TableQuery) -> Result<Vec<Value>, PortfolioError> {
        let url = self.request_url(query)?;
        debug!(table = %query.table, url = %url, "store select");

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PortfolioError::UpstreamStatus(status));
        }
        let rows: Vec<Value> = resp.json().await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PortfolioApi;
    use axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap as RequestHeaders, StatusCode, Uri},
    };
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Debug, Clone)]
    struct SeenRequest {
        path_and_query: String,
        apikey: Option<String>,
        authorization: Option<String>,
    }

    #[derive(Clone)]
    struct Upstream {
        status: StatusCode,
        body: Value,
        seen: Arc<Mutex<Vec<SeenRequest>>>,
    }

    async fn record(
        State(upstream): State<Upstream>,
        uri: Uri,
        headers: RequestHeaders,
    ) -> (StatusCode, Json<Value>) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        upstream
            .seen
            .lock()
            .expect("seen lock poisoned")
            .push(SeenRequest {
                path_and_query: uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_default(),
                apikey: header("apikey"),
                authorization: header("authorization"),
            });
        (upstream.status, Json(upstream.body.clone()))
    }

    /// Local HTTP upstream answering every request with `status` and `body`.
    async fn spawn_upstream(
        status: StatusCode,
        body: Value,
    ) -> (Url, Arc<Mutex<Vec<SeenRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(record).with_state(Upstream {
            status,
            body,
            seen: seen.clone(),
        });
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind local upstream");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        let url = Url::parse(&format!("http://{addr}")).expect("valid url");
        (url, seen)
    }

    fn store(base: &str) -> PostgrestStore {
        let url = Url::parse(base).expect("valid url");
        PostgrestStore::new(&url, "anon-key", None).expect("client builds")
    }

    #[test]
    fn ordered_query_url() {
        let url = store("https://abc.supabase.co")
            .request_url(&TableQuery::table("projects").order_asc("order_index"))
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/rest/v1/projects?select=*&order=order_index.asc"
        );
    }

    #[test]
    fn single_row_query_url() {
        let url = store("https://abc.supabase.co/")
            .request_url(&TableQuery::table("profile").single())
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/rest/v1/profile?select=*&limit=1"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let url = store("http://localhost:54321/proxy")
            .request_url(&TableQuery::table("skills"))
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:54321/proxy/rest/v1/skills?select=*"
        );
    }

    #[test]
    fn rejects_key_with_control_characters() {
        let url = Url::parse("https://abc.supabase.co").expect("valid url");
        assert!(PostgrestStore::new(&url, "bad\nkey", None).is_err());
    }

    #[tokio::test]
    async fn select_sends_auth_headers_and_decodes_rows() {
        let rows = json!([
            { "id": "s1", "name": "Rust", "order_index": 1, "created_at": "2024-01-01T00:00:00Z" },
            { "id": "s2", "name": "SQL", "order_index": 2, "created_at": "2024-01-01T00:00:00Z" },
        ]);
        let (url, seen) = spawn_upstream(StatusCode::OK, rows.clone()).await;
        let store = PostgrestStore::new(&url, "anon-key", None).expect("client builds");

        let got = store
            .select(&TableQuery::table("skills").order_asc("order_index"))
            .await
            .expect("select succeeds");
        assert_eq!(Value::Array(got), rows);

        let seen = seen.lock().expect("seen lock poisoned").clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].path_and_query,
            "/rest/v1/skills?select=*&order=order_index.asc"
        );
        assert_eq!(seen[0].apikey.as_deref(), Some("anon-key"));
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer anon-key"));
    }

    #[tokio::test]
    async fn server_error_becomes_upstream_status() {
        let (url, _seen) =
            spawn_upstream(StatusCode::INTERNAL_SERVER_ERROR, json!({ "message": "boom" })).await;
        let store = PostgrestStore::new(&url, "anon-key", None).expect("client builds");

        let err = store
            .select(&TableQuery::table("skills"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PortfolioError::UpstreamStatus(StatusCode::INTERNAL_SERVER_ERROR)
        ));

        let api = PortfolioApi::new(Arc::new(store));
        assert!(api.get_skills().await.is_empty());
    }
}

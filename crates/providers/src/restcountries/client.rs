use crate::restcountries::config::RestCountriesConfig;
use atlas_core::country::{
    sort_by_common_name, BorderLink, Country, CountryQuery, CountrySource, LookupError,
};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

#[derive(Clone)]
pub struct RestCountriesClient {
    http: Client,
    cfg: RestCountriesConfig,
}

impl RestCountriesClient {
    pub fn new(cfg: RestCountriesConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .use_rustls_tls()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(2)
            .timeout(cfg.timeout);
        if let Some(p) = &cfg.proxy {
            builder = builder.proxy(reqwest::Proxy::all(p)?);
        }
        let http = builder.build()?;
        Ok(Self { http, cfg })
    }

    /// Resolve border codes to display names, one alpha lookup per code.
    /// Codes the API refuses are skipped so a single stale code does not
    /// take down the whole detail view.
    pub async fn resolve_borders(&self, codes: &[String]) -> Vec<BorderLink> {
        let mut links = Vec::with_capacity(codes.len());
        for code in codes {
            match self.fetch_by_code(code).await {
                Ok(c) => links.push(BorderLink {
                    code: code.clone(),
                    name: c.name.common,
                }),
                Err(e) => {
                    warn!(target:"providers::restcountries","border {} skipped: {}", code, e);
                }
            }
        }
        links
    }
}

impl CountrySource for RestCountriesClient {
    async fn fetch_countries(
        &self,
        query: &CountryQuery,
    ) -> Result<Vec<Country>, LookupError> {
        let url = query_url(&self.cfg.base_url, query)?;
        info!(target:"providers::restcountries","GET {}", url);
        let resp = self.http.get(url).send().await.map_err(map_reqwest_err)?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.ok();
            warn!(target:"providers::restcountries","non-200 status={} body={:?}", status, body);
            return Err(map_status_err(status, body));
        }
        let all: Vec<Country> = resp
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))?;
        nonempty_sorted(all)
    }

    async fn fetch_by_code(&self, code: &str) -> Result<Country, LookupError> {
        let found = self
            .fetch_countries(&CountryQuery::Alpha(code.to_string()))
            .await?;
        found.into_iter().next().ok_or(LookupError::NotFound)
    }
}

/// The API answers an empty array for some otherwise-OK responses;
/// that counts as not found, and anything plural renders sorted.
fn nonempty_sorted(mut all: Vec<Country>) -> Result<Vec<Country>, LookupError> {
    if all.is_empty() {
        return Err(LookupError::NotFound);
    }
    sort_by_common_name(&mut all);
    Ok(all)
}

fn query_url(base: &str, query: &CountryQuery) -> Result<Url, LookupError> {
    let mut url = Url::parse(base).map_err(|e| LookupError::Other(e.to_string()))?;
    let (head, tail) = query.segments();
    {
        let mut segs = url
            .path_segments_mut()
            .map_err(|_| LookupError::Other("base url cannot be a base".into()))?;
        segs.pop_if_empty();
        segs.push(head);
        if let Some(t) = tail {
            segs.push(t);
        }
    }
    Ok(url)
}

fn map_reqwest_err(e: reqwest::Error) -> LookupError {
    if e.is_timeout() {
        LookupError::Timeout(e.to_string())
    } else if e.is_request() || e.is_connect() {
        LookupError::Network(e.to_string())
    } else {
        LookupError::Other(e.to_string())
    }
}

fn map_status_err(status: StatusCode, body: Option<String>) -> LookupError {
    let s = format!("{} {}", status.as_u16(), body.unwrap_or_default());
    match status {
        // The API reports unknown names/regions/codes as 404 and some
        // malformed segments as 400; both read as "no such country".
        StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => LookupError::NotFound,
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => LookupError::Network(s),
        _ => LookupError::Other(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::country::CountryQuery;

    const BASE: &str = "https://restcountries.com/v3.1";

    #[test]
    fn query_urls_cover_the_four_shapes() {
        let url = |q: &CountryQuery| query_url(BASE, q).unwrap().to_string();
        assert_eq!(url(&CountryQuery::All), format!("{BASE}/all"));
        assert_eq!(
            url(&CountryQuery::Name("germany".into())),
            format!("{BASE}/name/germany")
        );
        assert_eq!(
            url(&CountryQuery::Region("europe".into())),
            format!("{BASE}/region/europe")
        );
        assert_eq!(
            url(&CountryQuery::Alpha("DEU".into())),
            format!("{BASE}/alpha/DEU")
        );
    }

    #[test]
    fn query_url_percent_encodes_user_input() {
        let url = query_url(BASE, &CountryQuery::Name("costa rica".into())).unwrap();
        assert_eq!(url.as_str(), format!("{BASE}/name/costa%20rica"));
    }

    #[test]
    fn query_url_tolerates_trailing_slash_in_base() {
        let url = query_url("https://restcountries.com/v3.1/", &CountryQuery::All).unwrap();
        assert_eq!(url.as_str(), format!("{BASE}/all"));
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            map_status_err(StatusCode::NOT_FOUND, None),
            LookupError::NotFound
        ));
        assert!(matches!(
            map_status_err(StatusCode::BAD_REQUEST, None),
            LookupError::NotFound
        ));
        assert!(matches!(
            map_status_err(StatusCode::BAD_GATEWAY, Some("oops".into())),
            LookupError::Network(_)
        ));
        assert!(matches!(
            map_status_err(StatusCode::IM_A_TEAPOT, None),
            LookupError::Other(_)
        ));
    }

    #[test]
    fn empty_payload_maps_to_not_found() {
        assert!(matches!(nonempty_sorted(Vec::new()), Err(LookupError::NotFound)));
    }

    #[test]
    fn plural_payload_comes_back_sorted() {
        let mk = |common: &str| -> Country {
            serde_json::from_value(serde_json::json!({
                "name": { "common": common, "official": common },
                "cca3": "XXX",
            }))
            .unwrap()
        };
        let sorted = nonempty_sorted(vec![mk("Norway"), mk("Iceland")]).unwrap();
        let names: Vec<&str> = sorted.iter().map(|c| c.name.common.as_str()).collect();
        assert_eq!(names, ["Iceland", "Norway"]);
    }
}

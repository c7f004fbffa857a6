// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::de::DeserializeOwned;

use crate::constants::{
    API_BASE_URL, API_STATUS_OK, API_VERSION, AUDIO_TYPE, AUDIOS_ENDPOINT, CACHE_SECONDS,
    PROGRAM_RADIO_ID,
};
use crate::error::ApiError;
use crate::http::HttpClient;

use super::model::{ItemResponse, ListResponse};

/// Listing URL for one page of the En Guàrdia program
pub fn listing_url(page: u32) -> String {
    format!(
        "{API_BASE_URL}{AUDIOS_ENDPOINT}?_format=json&ordre=-data_publicacio&origen=llistat\
         &programaradio_id={PROGRAM_RADIO_ID}&tipus_audio={AUDIO_TYPE}&pagina={page}\
         &sdom=img&version={API_VERSION}&cache={CACHE_SECONDS}&https=true&master=yes"
    )
}

/// Single-item URL, used as audio-URL fallback
pub fn item_url(id: i64) -> String {
    format!(
        "{API_BASE_URL}{AUDIOS_ENDPOINT}?_format=json&id={id}&origen=item&pagina=1\
         &sdom=img&version={API_VERSION}&cache={CACHE_SECONDS}&https=true&master=yes"
    )
}

/// Fetch one listing page and decode it, enforcing the "OK" status sentinel
pub async fn fetch_listing_page<C: HttpClient>(
    client: &C,
    page: u32,
) -> Result<ListResponse, ApiError> {
    let url = listing_url(page);
    let response: ListResponse = fetch_json(client, &url).await?;

    if response.resposta.status != API_STATUS_OK {
        return Err(ApiError::BadStatus {
            url,
            status: response.resposta.status,
        });
    }

    Ok(response)
}

/// Fetch one item by identifier and decode it, enforcing the "OK" status
/// sentinel
pub async fn fetch_item<C: HttpClient>(client: &C, id: i64) -> Result<ItemResponse, ApiError> {
    let url = item_url(id);
    let response: ItemResponse = fetch_json(client, &url).await?;

    if response.resposta.status != API_STATUS_OK {
        return Err(ApiError::BadStatus {
            url,
            status: response.resposta.status,
        });
    }

    Ok(response)
}

async fn fetch_json<C: HttpClient, T: DeserializeOwned>(
    client: &C,
    url: &str,
) -> Result<T, ApiError> {
    let body = client
        .get_bytes(url)
        .await
        .map_err(|e| ApiError::FetchFailed {
            url: url.to_string(),
            source: e,
        })?;

    if body.status != 200 {
        return Err(ApiError::HttpStatus {
            url: url.to_string(),
            status: body.status,
        });
    }

    serde_json::from_slice(&body.bytes).map_err(|e| ApiError::ParseFailed {
        url: url.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpBody, HttpResponse};
    use async_trait::async_trait;
    use bytes::Bytes;

    struct StaticClient {
        status: u16,
        body: String,
    }

    #[async_trait]
    impl HttpClient for StaticClient {
        async fn get_bytes(&self, _url: &str) -> Result<HttpBody, reqwest::Error> {
            Ok(HttpBody {
                status: self.status,
                bytes: Bytes::from(self.body.clone()),
            })
        }

        async fn get_stream(&self, _url: &str) -> Result<HttpResponse, reqwest::Error> {
            unimplemented!("not used by API fetches")
        }
    }

    #[test]
    fn listing_url_carries_fixed_parameters() {
        let url = listing_url(3);

        assert!(url.starts_with("https://api.3cat.cat/audios?"));
        assert!(url.contains("programaradio_id=944"));
        assert!(url.contains("tipus_audio=CRTAPROG"));
        assert!(url.contains("pagina=3"));
        assert!(url.contains("version=2.0"));
        assert!(url.contains("cache=180"));
        assert!(url.contains("origen=llistat"));
    }

    #[test]
    fn item_url_carries_identifier() {
        let url = item_url(1057561);

        assert!(url.contains("id=1057561"));
        assert!(url.contains("origen=item"));
        assert!(!url.contains("programaradio_id"));
    }

    #[tokio::test]
    async fn listing_fetch_rejects_http_errors() {
        let client = StaticClient {
            status: 503,
            body: String::new(),
        };

        let result = fetch_listing_page(&client, 1).await;
        match result {
            Err(ApiError::HttpStatus { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected HttpStatus error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn listing_fetch_rejects_malformed_body() {
        let client = StaticClient {
            status: 200,
            body: "not json".to_string(),
        };

        assert!(matches!(
            fetch_listing_page(&client, 1).await,
            Err(ApiError::ParseFailed { .. })
        ));
    }

    #[tokio::test]
    async fn listing_fetch_rejects_non_ok_status_field() {
        let client = StaticClient {
            status: 200,
            body: r#"{"resposta": {"status": "KO"}}"#.to_string(),
        };

        match fetch_listing_page(&client, 1).await {
            Err(ApiError::BadStatus { status, .. }) => assert_eq!(status, "KO"),
            other => panic!("expected BadStatus error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn item_fetch_accepts_ok_response() {
        let client = StaticClient {
            status: 200,
            body: r#"{"resposta": {"status": "OK", "item": {"titol": "t"}}}"#.to_string(),
        };

        let response = fetch_item(&client, 7).await.unwrap();
        assert_eq!(response.resposta.item.titol, "t");
    }
}

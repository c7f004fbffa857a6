// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::api::{ListItem, fetch_item, fetch_listing_page};
use crate::constants::{
    BASE_URL, EPISODE_URL_PATTERN, JSON_EXTENSION, MP3_EXTENSION, PAGE_REQUEST_DELAY,
};
use crate::episode::Episode;
use crate::error::ApiError;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

use super::filename::safe_filename;
use super::text::{clean_description, clean_title};
use super::urls::{fallback_audio_url, image_extension, resolve_audio_url, resolve_image_url};

/// Scrape every episode of the program
pub async fn scrape_episodes<C: HttpClient>(
    client: &C,
    reporter: &SharedProgressReporter,
) -> Result<Vec<Episode>, ApiError> {
    scrape_episodes_with_limit(client, 0, reporter).await
}

/// Scrape episodes from the paginated listing API, at most `max_pages` pages
/// (0 = unlimited).
///
/// Pages are fetched sequentially with a fixed delay in between. Any listing
/// failure aborts the whole scrape and discards partial results; only the
/// per-item audio fallback is allowed to fail softly, recording a
/// placeholder URL.
pub async fn scrape_episodes_with_limit<C: HttpClient>(
    client: &C,
    max_pages: u32,
    reporter: &SharedProgressReporter,
) -> Result<Vec<Episode>, ApiError> {
    let mut episodes = Vec::new();
    let mut page = 1u32;

    loop {
        reporter.report(ProgressEvent::FetchingPage { page });

        let listing = fetch_listing_page(client, page).await?;
        let reply = listing.resposta;

        if page == 1 {
            reporter.report(ProgressEvent::PaginationInfo {
                current_page: reply.paginacio.pagina_actual,
                total_pages: reply.paginacio.total_pagines,
                total_items: reply.paginacio.total_items,
            });
        }

        let page_episodes = reply.items.item.len();
        for item in &reply.items.item {
            episodes.push(build_episode(client, item, reporter).await);
        }

        reporter.report(ProgressEvent::PageProcessed {
            page,
            page_episodes,
            total_episodes: episodes.len(),
        });

        if page >= reply.paginacio.total_pagines {
            break;
        }
        if max_pages > 0 && page >= max_pages {
            break;
        }
        // Safety stop: a non-final page without items means the pagination
        // metadata can no longer be trusted.
        if page_episodes == 0 {
            break;
        }

        page += 1;
        tokio::time::sleep(PAGE_REQUEST_DELAY).await;
    }

    Ok(episodes)
}

/// Normalize one listing item into an episode record
async fn build_episode<C: HttpClient>(
    client: &C,
    item: &ListItem,
    reporter: &SharedProgressReporter,
) -> Episode {
    let title = clean_title(&item.titol);
    let stem = safe_filename(&title);

    let image = item
        .imatges
        .first()
        .filter(|media| !media.text.is_empty())
        .map(|media| resolve_image_url(&media.text));
    let image_filename = image
        .as_ref()
        .map(|url| format!("{stem}{}", image_extension(url)));

    let audio_url = match item.audios.first().filter(|media| !media.text.is_empty()) {
        Some(media) => resolve_audio_url(&media.text),
        None => match extract_audio_url(client, item.id).await {
            Ok(url) => url,
            Err(e) => {
                reporter.report(ProgressEvent::AudioFallbackFailed {
                    episode_title: title.clone(),
                    item_id: item.id,
                    error: e.to_string(),
                });
                fallback_audio_url(item.id)
            }
        },
    };

    Episode {
        title,
        description: clean_description(&item.entradeta),
        duration: item.durada.clone(),
        date: item.data_publicacio.clone(),
        link: format!("{BASE_URL}{EPISODE_URL_PATTERN}/{}/", item.id),
        audio_url,
        image: image.unwrap_or_default(),
        filename: format!("{stem}{MP3_EXTENSION}"),
        image_filename,
        json_file: format!("{stem}{JSON_EXTENSION}"),
    }
}

/// Fetch the real audio URL for one item via the single-item API
async fn extract_audio_url<C: HttpClient>(client: &C, id: i64) -> Result<String, ApiError> {
    let response = fetch_item(client, id).await?;

    let audio = response
        .resposta
        .item
        .audios
        .first()
        .filter(|media| !media.text.is_empty())
        .ok_or(ApiError::MissingAudio { id })?;

    Ok(resolve_audio_url(&audio.text))
}

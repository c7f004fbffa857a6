use serde::Deserialize;

/// Response envelope of the paginated listing endpoint.
///
/// Field names mirror the 3Cat API JSON (Catalan). Everything inside the
/// envelope defaults, because the API omits empty collections instead of
/// sending them as `[]`.
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    pub resposta: ListReply,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListReply {
    pub status: String,
    pub items: ItemList,
    pub paginacio: Pagination,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemList {
    pub num: u32,
    pub item: Vec<ListItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListItem {
    pub id: i64,
    pub titol: String,
    pub entradeta: String,
    pub data_publicacio: String,
    pub durada: String,
    pub imatges: Vec<MediaRef>,
    pub audios: Vec<MediaRef>,
}

/// One entry of the `imatges`/`audios` arrays; only `text` (the URL or
/// media-relative path) is load-bearing here
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct MediaRef {
    pub text: String,
    pub format: String,
    pub durada: String,
    pub mida: String,
    pub alt: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub total_items: u32,
    pub items_pagina: u32,
    pub pagina_actual: u32,
    pub total_pagines: u32,
}

/// Response envelope of the single-item endpoint, used as audio-URL fallback
#[derive(Debug, Deserialize)]
pub struct ItemResponse {
    pub resposta: ItemReply,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemReply {
    pub status: String,
    pub item: ItemDetail,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemDetail {
    pub titol: String,
    pub entradeta: String,
    pub durada: String,
    pub data_publicacio: String,
    pub audios: Vec<MediaRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LISTING: &str = r#"{
        "resposta": {
            "status": "OK",
            "items": {
                "num": 2,
                "item": [
                    {
                        "id": 1057561,
                        "titol": "792. La batalla de l'Ebre",
                        "entradeta": "Parlem de la batalla.",
                        "data_publicacio": "30/06/2024 06:00:00",
                        "durada": "54:21",
                        "imatges": [{"text": "jpg/6/2/1472799754526.jpg", "mida": "670x378"}],
                        "audios": [{"text": "mp3/8/1/1719914131118.mp3", "format": "MP3"}]
                    },
                    {
                        "id": 1057562,
                        "titol": "791. El setge de 1714",
                        "entradeta": "",
                        "data_publicacio": "23/06/2024 06:00:00",
                        "durada": "53:02"
                    }
                ]
            },
            "paginacio": {
                "total_items": 792,
                "items_pagina": 20,
                "pagina_actual": 1,
                "total_pagines": 40
            }
        }
    }"#;

    #[test]
    fn parses_listing_response() {
        let parsed: ListResponse = serde_json::from_str(SAMPLE_LISTING).unwrap();
        let reply = parsed.resposta;

        assert_eq!(reply.status, "OK");
        assert_eq!(reply.items.num, 2);
        assert_eq!(reply.items.item.len(), 2);
        assert_eq!(reply.paginacio.total_pagines, 40);

        let first = &reply.items.item[0];
        assert_eq!(first.id, 1057561);
        assert_eq!(first.audios[0].text, "mp3/8/1/1719914131118.mp3");
        assert_eq!(first.imatges[0].text, "jpg/6/2/1472799754526.jpg");
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let parsed: ListResponse = serde_json::from_str(SAMPLE_LISTING).unwrap();
        let second = &parsed.resposta.items.item[1];

        assert!(second.audios.is_empty());
        assert!(second.imatges.is_empty());
        assert!(second.entradeta.is_empty());
    }

    #[test]
    fn parses_item_response() {
        let raw = r#"{
            "resposta": {
                "status": "OK",
                "item": {
                    "titol": "792. La batalla de l'Ebre",
                    "durada": "54:21",
                    "audios": [{"text": "mp3/8/1/1719914131118.mp3", "format": "MP3"}]
                }
            }
        }"#;

        let parsed: ItemResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.resposta.status, "OK");
        assert_eq!(
            parsed.resposta.item.audios[0].text,
            "mp3/8/1/1719914131118.mp3"
        );
    }
}

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One book object as it appears in a snapshot file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub life_span: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    pub genres: Vec<String>,
    #[serde(default)]
    pub goodreads: Option<GoodreadsMeta>,
}

/// Goodreads rating metadata nested inside a snapshot record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodreadsMeta {
    #[serde(default)]
    pub num_pages: Option<i64>,
    /// Goodreads serves this as a string ("4.25") in autocomplete results
    /// and as a number elsewhere, so accept both.
    #[serde(default, deserialize_with = "rating_from_string_or_number")]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub ratings_count: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub book_url: Option<String>,
}

fn rating_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => Ok(s.trim().parse().ok()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid avgRating: {other}"
        ))),
    }
}

/// A normalized book record ready to be merged into the library.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub life_span: Option<String>,
    pub isbn: Option<String>,
    pub pages: Option<i64>,
    pub avg_rating: Option<f64>,
    pub ratings_count: Option<i64>,
    pub image_id: Option<String>,
    pub book_url: Option<String>,
    pub genres: Vec<String>,
}

impl From<RawBook> for NewBook {
    fn from(raw: RawBook) -> Self {
        let goodreads = raw.goodreads;
        let image_id = goodreads
            .as_ref()
            .and_then(|g| g.image_url.as_deref())
            .and_then(image_id);

        Self {
            title: raw.title,
            author: raw.author,
            life_span: raw.life_span,
            isbn: raw.isbn,
            pages: goodreads.as_ref().and_then(|g| g.num_pages),
            avg_rating: goodreads.as_ref().and_then(|g| g.avg_rating),
            ratings_count: goodreads.as_ref().and_then(|g| g.ratings_count),
            image_id,
            book_url: goodreads.and_then(|g| g.book_url),
            genres: raw.genres,
        }
    }
}

/// Derive a compact image identifier from a Goodreads cover URL.
///
/// Keeps the last two path segments and strips the file extension, so
/// `https://.../covers/12345/67890.jpg` becomes `12345/67890`. URLs sharing
/// the same last two segments always map to the same identifier.
pub fn image_id(image_url: &str) -> Option<String> {
    if image_url.is_empty() {
        return None;
    }

    let segments: Vec<&str> = image_url.split('/').collect();
    let start = segments.len().saturating_sub(2);
    let tail = segments[start..].join("/");

    let id = match tail.rfind('.') {
        Some(dot) => tail[..dot].to_string(),
        None => tail,
    };

    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_id_strips_extension() {
        let id = image_id("https://images.gr-assets.com/books/covers/12345/67890.jpg");
        assert_eq!(id.as_deref(), Some("12345/67890"));
    }

    #[test]
    fn test_image_id_same_tail_same_id() {
        let a = image_id("https://cdn-a.example.com/x/y/12345/67890.jpg");
        let b = image_id("https://cdn-b.example.com/other/12345/67890.png");
        assert_eq!(a, b);
    }

    #[test]
    fn test_image_id_without_extension() {
        let id = image_id("https://example.com/covers/12345/67890");
        assert_eq!(id.as_deref(), Some("12345/67890"));
    }

    #[test]
    fn test_image_id_empty_url() {
        assert_eq!(image_id(""), None);
    }

    #[test]
    fn test_parse_full_record() {
        let raw: RawBook = serde_json::from_value(json!({
            "title": "Aniara",
            "author": "Harry Martinson",
            "lifeSpan": "1904-1978",
            "isbn": "9789100575663",
            "genres": ["Poetry", "Science Fiction"],
            "goodreads": {
                "numPages": 129,
                "avgRating": "4.05",
                "ratingsCount": 5214,
                "imageUrl": "https://images.gr-assets.com/books/1388200305/1715247.jpg",
                "bookUrl": "/book/show/1715247.Aniara"
            }
        }))
        .unwrap();

        let book = NewBook::from(raw);
        assert_eq!(book.title, "Aniara");
        assert_eq!(book.author, "Harry Martinson");
        assert_eq!(book.life_span.as_deref(), Some("1904-1978"));
        assert_eq!(book.pages, Some(129));
        assert_eq!(book.avg_rating, Some(4.05));
        assert_eq!(book.ratings_count, Some(5214));
        assert_eq!(book.image_id.as_deref(), Some("1388200305/1715247"));
        assert_eq!(book.book_url.as_deref(), Some("/book/show/1715247.Aniara"));
        assert_eq!(book.genres, vec!["Poetry", "Science Fiction"]);
    }

    #[test]
    fn test_parse_minimal_record() {
        let raw: RawBook = serde_json::from_value(json!({
            "title": "Okänd bok",
            "author": "Okänd författare",
            "genres": []
        }))
        .unwrap();

        let book = NewBook::from(raw);
        assert_eq!(book.isbn, None);
        assert_eq!(book.pages, None);
        assert_eq!(book.image_id, None);
        assert!(book.genres.is_empty());
    }

    #[test]
    fn test_parse_record_missing_title_fails() {
        let result = serde_json::from_value::<RawBook>(json!({
            "author": "Anon",
            "genres": ["Fiction"]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_avg_rating_accepts_number() {
        let meta: GoodreadsMeta = serde_json::from_value(json!({ "avgRating": 3.9 })).unwrap();
        assert_eq!(meta.avg_rating, Some(3.9));
    }

    #[test]
    fn test_avg_rating_unparseable_string_is_none() {
        let meta: GoodreadsMeta =
            serde_json::from_value(json!({ "avgRating": "n/a" })).unwrap();
        assert_eq!(meta.avg_rating, None);
    }

    #[test]
    fn test_no_image_id_without_goodreads() {
        let raw: RawBook = serde_json::from_value(json!({
            "title": "T",
            "author": "A",
            "genres": ["Fiction"]
        }))
        .unwrap();
        assert_eq!(NewBook::from(raw).image_id, None);
    }

    #[test]
    fn test_no_image_id_without_image_url() {
        let raw: RawBook = serde_json::from_value(json!({
            "title": "T",
            "author": "A",
            "genres": ["Fiction"],
            "goodreads": { "numPages": 100 }
        }))
        .unwrap();
        let book = NewBook::from(raw);
        assert_eq!(book.image_id, None);
        assert_eq!(book.pages, Some(100));
    }
}

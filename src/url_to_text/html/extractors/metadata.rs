use scraper::{Html, Selector};

/// Page-level title and image, read from `<meta>` tags and `<title>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub image_url: Option<String>,
}

const IMAGE_SELECTORS: [&str; 4] = [
    "meta[property='og:image']",
    "meta[name='og:image']",
    "meta[name='twitter:image']",
    "meta[property='twitter:image']",
];

const TITLE_SELECTORS: [&str; 2] = ["meta[property='og:title']", "meta[name='twitter:title']"];

impl PageMetadata {
    pub fn from_document(document: &Html) -> PageMetadata {
        let title = TITLE_SELECTORS
            .iter()
            .find_map(|css| meta_content(document, css))
            .or_else(|| {
                let selector = Selector::parse("title").ok()?;
                document
                    .select(&selector)
                    .next()
                    .map(|el| el.text().collect::<String>().trim().to_string())
                    .filter(|t| !t.is_empty())
            });

        PageMetadata {
            title,
            image_url: IMAGE_SELECTORS
                .iter()
                .find_map(|css| meta_content(document, css)),
        }
    }
}

fn meta_content(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

use serde::Deserialize;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    /// Page is 1-based; page size is clamped to 1..=MAX_PER_PAGE.
    pub fn resolve(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }
}

/// RFC 8288 `Link` value with first/prev/next/last relations.
pub fn link_header(path: &str, page: u32, per_page: u32, last_page: u32) -> String {
    let link = |target: u32, rel: &str| {
        format!("<{}?page={}&perPage={}>; rel=\"{}\"", path, target, per_page, rel)
    };

    let mut links = vec![link(1, "first")];
    if page > 1 {
        links.push(link((page - 1).min(last_page), "prev"));
    }
    if page < last_page {
        links.push(link(page + 1, "next"));
    }
    links.push(link(last_page, "last"));

    links.join(", ")
}

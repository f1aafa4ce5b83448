use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{error::*, http::Client};

pub fn parse_url(url: impl AsRef<str>) -> Result<Url> {
    match Url::parse(url.as_ref()) {
        Ok(url) => Ok(url),
        Err(e) => Err(Error::InvalidSyntaxUrl {
            url: url.as_ref().to_owned(),
            source: e,
        }),
    }
}

pub fn selector_must_parsed(sel: &'static str) -> Selector {
    Selector::parse(sel).expect("Failed to parse  `&'static str`  selector")
}

pub async fn fetch_html(c: &Client, url: Url) -> Result<Html> {
    let url_str = url.to_string();
    let resp = c.get(url).await?;

    let status = resp.status();
    if status != StatusCode::OK {
        return Err(Error::UnexpectedResponseCode {
            got: status,
            expected: StatusCode::OK,
            requested_url: url_str,
        });
    }

    let html = resp.text().await?;
    Ok(Html::parse_document(&html))
}

pub trait DocExt {
    fn select_first(&self, sel: &Selector) -> Result<ElementRef>;
}

impl DocExt for Html {
    fn select_first(&self, sel: &Selector) -> Result<ElementRef> {
        match self.select(sel).next() {
            Some(el) => Ok(el),
            None => Err(Error::NoSuchElementMatchesToSelector(sel.to_owned())),
        }
    }
}

pub trait ElementRefExt {
    fn text_lines(&self) -> Vec<&str>;
}

impl<'a> ElementRefExt for ElementRef<'a> {
    /// Every line of every text node below this element.
    /// `<br>`-separated and `<div>`-per-line markup both come out one line per entry.
    fn text_lines(&self) -> Vec<&str> {
        self.text().flat_map(str::lines).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn text_lines_of_div_per_line_markup() {
        let html = Html::parse_fragment(
            r#"<pre><div class="test-example-line">3</div><div class="test-example-line">1 2 3</div></pre>"#,
        );
        let sel = selector_must_parsed("pre");
        let pre = html.select_first(&sel).unwrap();
        assert_eq!(pre.text_lines(), vec!["3", "1 2 3"]);
    }

    #[test]
    fn text_lines_of_br_separated_markup() {
        let html = Html::parse_fragment("<pre>3<br>1 2 3<br></pre>");
        let sel = selector_must_parsed("pre");
        let pre = html.select_first(&sel).unwrap();
        assert_eq!(crate::strip_blank_lines(pre.text_lines()), "3\n1 2 3\n");
    }
}

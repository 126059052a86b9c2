// src/scrape/parser.rs
//! Listing-page parser for the python.org jobs board markup.
//!
//! A listing page nests its items as `#content > div.row >
//! ol.list-recent-jobs > li`. Each item carries the job title and apply link
//! inside `span.listing-company-name`, the company's display name as sibling
//! text after that anchor, and the remaining fields in labeled spans. A page
//! whose container chain is missing, or an item missing any required field,
//! aborts the whole page: partial rows are worse than a loud failure when the
//! upstream markup changes shape.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use scraper::{ElementRef, Html, Selector};

use super::JobListing;
use crate::error::EtlError;

struct Selectors {
    content: Selector,
    row: Selector,
    listings: Selector,
    item: Selector,
    company_span: Selector,
    location_span: Selector,
    job_type_span: Selector,
    posted_time: Selector,
    category_span: Selector,
    apply_anchor: Selector,
    anchor: Selector,
}

impl Selectors {
    fn new() -> Self {
        Self {
            content: parse_selector("#content"),
            row: parse_selector("div.row"),
            listings: parse_selector("ol.list-recent-jobs"),
            item: parse_selector("li"),
            company_span: parse_selector("h2.listing-company span.listing-company-name"),
            location_span: parse_selector("h2.listing-company span.listing-location"),
            job_type_span: parse_selector("span.listing-job-type"),
            posted_time: parse_selector("span.listing-posted time"),
            category_span: parse_selector("span.listing-company-category"),
            apply_anchor: parse_selector("h2.listing-company a"),
            anchor: parse_selector("a"),
        }
    }
}

fn parse_selector(css: &str) -> Selector {
    Selector::parse(css).expect("Failed to parse listing selector")
}

/// Extract all job listings from one page body, in document order
pub fn parse_listings(
    body: &str,
    page: u32,
    origin: &str,
) -> Result<Vec<JobListing>, EtlError> {
    let selectors = Selectors::new();
    let document = Html::parse_document(body);

    let content = document
        .select(&selectors.content)
        .next()
        .ok_or_else(|| EtlError::malformed(page, "missing #content region"))?;
    let row = content
        .select(&selectors.row)
        .next()
        .ok_or_else(|| EtlError::malformed(page, "missing content row"))?;
    let listings_container = row
        .select(&selectors.listings)
        .next()
        .ok_or_else(|| EtlError::malformed(page, "missing recent-jobs listing container"))?;

    let mut listings = Vec::new();
    for (index, item) in listings_container.select(&selectors.item).enumerate() {
        listings.push(parse_item(item, &selectors, page, index, origin)?);
    }

    Ok(listings)
}

fn parse_item(
    item: ElementRef<'_>,
    selectors: &Selectors,
    page: u32,
    index: usize,
    origin: &str,
) -> Result<JobListing, EtlError> {
    let missing = |field: &str| EtlError::malformed(page, format!("listing {}: missing {}", index + 1, field));

    let company_span = item
        .select(&selectors.company_span)
        .next()
        .ok_or_else(|| missing("company name span"))?;
    let title = company_span
        .select(&selectors.anchor)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| missing("title anchor"))?;

    // The company's display name is the text node trailing the title anchor,
    // not part of the anchor itself.
    let company = trailing_text(company_span).ok_or_else(|| missing("company name text"))?;

    let location = item
        .select(&selectors.location_span)
        .next()
        .and_then(|span| span.select(&selectors.anchor).next())
        .map(element_text)
        .ok_or_else(|| missing("location"))?;

    let job_types = item
        .select(&selectors.job_type_span)
        .next()
        .ok_or_else(|| missing("job type span"))?
        .select(&selectors.anchor)
        .map(element_text)
        .collect();

    let time_el = item
        .select(&selectors.posted_time)
        .next()
        .ok_or_else(|| missing("posted time element"))?;
    let posted_raw = time_el
        .value()
        .attr("datetime")
        .ok_or_else(|| missing("posted datetime attribute"))?;
    let posted_date = parse_posted_date(posted_raw).ok_or_else(|| {
        EtlError::malformed(
            page,
            format!("listing {}: unparseable posted date {:?}", index + 1, posted_raw),
        )
    })?;
    let posted_display = element_text(time_el);

    let category = item
        .select(&selectors.category_span)
        .next()
        .and_then(|span| span.select(&selectors.anchor).next())
        .map(element_text)
        .ok_or_else(|| missing("category"))?;

    let apply_href = item
        .select(&selectors.apply_anchor)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .ok_or_else(|| missing("apply link"))?;

    Ok(JobListing {
        title,
        company,
        location,
        job_types,
        posted_date,
        posted_display,
        category,
        apply_url: absolutize(origin, apply_href),
    })
}

/// Collapse an element's text content to single-space-separated words
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Last non-empty direct-child text node, trimmed
fn trailing_text(element: ElementRef<'_>) -> Option<String> {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .last()
}

/// Parse the machine-readable ISO datetime attribute down to a calendar date
fn parse_posted_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|dt| dt.date())
                .ok()
        })
}

fn absolutize(origin: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", origin.trim_end_matches('/'), href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://www.python.org";

    fn item_html(
        title: &str,
        company: &str,
        location: &str,
        types: &[&str],
        datetime: &str,
        display: &str,
        category: &str,
        href: &str,
    ) -> String {
        let type_anchors = types
            .iter()
            .map(|t| format!("<a href=\"/jobs/type/x/\">{}</a>", t))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"<li>
                <h2 class="listing-company">
                    <span class="listing-company-name">
                        <a href="{href}">{title}</a><br>
                        {company}
                    </span>
                    <span class="listing-location"><a href="/jobs/location/x/">{location}</a></span>
                </h2>
                <span class="listing-job-type">{type_anchors}</span>
                <span class="listing-posted">Posted: <time datetime="{datetime}">{display}</time></span>
                <span class="listing-company-category"><a href="/jobs/category/x/">{category}</a></span>
            </li>"#
        )
    }

    fn page_html(items: &[String]) -> String {
        format!(
            r#"<html><body><div id="content"><div class="row">
                <ol class="list-recent-jobs list-row-container menu">{}</ol>
            </div></div></body></html>"#,
            items.join("\n")
        )
    }

    fn sample_page() -> String {
        page_html(&[
            item_html(
                "Senior Backend Engineer",
                "Acme Corp",
                "Berlin, Germany",
                &["Full-time", "Remote"],
                "2026-08-01T10:15:00+00:00",
                "01 August 2026",
                "Engineering",
                "/jobs/7801/",
            ),
            item_html(
                "Data Analyst",
                "Widget GmbH",
                "Amsterdam, Netherlands",
                &[],
                "2026-07-28T09:00:00+00:00",
                "28 July 2026",
                "Data",
                "/jobs/7802/",
            ),
        ])
    }

    #[test]
    fn test_parse_extracts_all_listings_in_document_order() {
        let listings = parse_listings(&sample_page(), 1, ORIGIN).unwrap();
        assert_eq!(listings.len(), 2);

        let first = &listings[0];
        assert_eq!(first.title, "Senior Backend Engineer");
        assert_eq!(first.company, "Acme Corp");
        assert_eq!(first.location, "Berlin, Germany");
        assert_eq!(first.job_types, vec!["Full-time", "Remote"]);
        assert_eq!(
            first.posted_date,
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
        );
        assert_eq!(first.posted_display, "01 August 2026");
        assert_eq!(first.category, "Engineering");
        assert_eq!(first.apply_url, "https://www.python.org/jobs/7801/");

        assert_eq!(listings[1].title, "Data Analyst");
        assert!(listings[1].job_types.is_empty());
    }

    #[test]
    fn test_every_apply_url_is_absolute() {
        let listings = parse_listings(&sample_page(), 1, ORIGIN).unwrap();
        for listing in &listings {
            assert!(listing.apply_url.starts_with(ORIGIN), "{}", listing.apply_url);
        }
    }

    #[test]
    fn test_missing_listing_container_is_malformed_page() {
        let body = "<html><body><div id=\"content\"><div class=\"row\"></div></div></body></html>";
        let err = parse_listings(body, 3, ORIGIN).unwrap_err();
        assert!(matches!(err, EtlError::MalformedPage { page: 3, .. }));
    }

    #[test]
    fn test_missing_required_field_aborts_whole_page() {
        // Second item has no time element: the first, valid item must not leak through
        let broken = r##"<li>
            <h2 class="listing-company">
                <span class="listing-company-name"><a href="/jobs/1/">Role</a><br>Corp</span>
                <span class="listing-location"><a href="#">Paris, France</a></span>
            </h2>
            <span class="listing-job-type"><a href="#">Contract</a></span>
            <span class="listing-posted">Posted: yesterday</span>
            <span class="listing-company-category"><a href="#">Other</a></span>
        </li>"##;
        let body = page_html(&[
            item_html(
                "Fine Role",
                "Fine Corp",
                "Oslo, Norway",
                &["Full-time"],
                "2026-08-02T08:00:00+00:00",
                "02 August 2026",
                "Engineering",
                "/jobs/1/",
            ),
            broken.to_string(),
        ]);
        assert!(parse_listings(&body, 1, ORIGIN).is_err());
    }

    #[test]
    fn test_empty_job_type_span_yields_empty_sequence() {
        let listings = parse_listings(&sample_page(), 1, ORIGIN).unwrap();
        assert_eq!(listings[1].job_types, Vec::<String>::new());
    }

    #[test]
    fn test_posted_date_accepts_naive_iso_datetime() {
        assert_eq!(
            parse_posted_date("2026-08-01T10:15:00"),
            NaiveDate::from_ymd_opt(2026, 8, 1)
        );
        assert_eq!(
            parse_posted_date("2026-08-01T10:15:00.123456+00:00"),
            NaiveDate::from_ymd_opt(2026, 8, 1)
        );
        assert_eq!(parse_posted_date("not-a-date"), None);
    }

    #[test]
    fn test_absolutize_keeps_already_absolute_links() {
        assert_eq!(
            absolutize(ORIGIN, "/jobs/42/"),
            "https://www.python.org/jobs/42/"
        );
        assert_eq!(
            absolutize(ORIGIN, "https://example.com/apply"),
            "https://example.com/apply"
        );
    }
}
